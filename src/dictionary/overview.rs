//! Dictionaries overview page listing all four dictionaries.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    dictionary::{
        DictionaryKind,
        db::{OverviewEntry, list_dictionary_entries},
    },
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the dictionaries overview page.
#[derive(Debug, Clone)]
pub struct DictionariesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DictionariesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the dictionaries overview with one section per kind.
pub async fn get_dictionaries_page(
    State(state): State<DictionariesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let mut sections = Vec::with_capacity(DictionaryKind::ALL.len());

    for kind in DictionaryKind::ALL {
        let entries = list_dictionary_entries(kind, &connection).inspect_err(|error| {
            tracing::error!("Failed to retrieve {}: {error}", kind.display_name_plural())
        })?;

        sections.push((kind, entries));
    }

    Ok(dictionaries_view(&sections).into_response())
}

fn dictionaries_view(sections: &[(DictionaryKind, Vec<OverviewEntry>)]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DICTIONARIES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-8 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                @for (kind, entries) in sections {
                    (dictionary_section_view(*kind, entries))
                }
            }
        }
    );

    base("Dictionaries", &[], &content)
}

fn dictionary_section_view(kind: DictionaryKind, entries: &[OverviewEntry]) -> Markup {
    let new_item_route = endpoints::format_kind_endpoint(endpoints::NEW_DICTIONARY_ITEM_VIEW, kind);
    let parent_header = kind.parent_kind().map(DictionaryKind::display_name);

    let table_row = |entry: &OverviewEntry| {
        let edit_url = endpoints::format_endpoint(
            &endpoints::format_kind_endpoint(endpoints::EDIT_DICTIONARY_ITEM_VIEW, kind),
            entry.id,
        );
        let delete_url = endpoints::format_endpoint(
            &endpoints::format_kind_endpoint(endpoints::DICTIONARY_ITEM, kind),
            entry.id,
        );
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? \
            This is blocked while any transaction still uses it.",
            entry.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (entry.name)
                }

                @if parent_header.is_some() {
                    td class=(TABLE_CELL_STYLE)
                    {
                        (entry.parent_name.as_deref().unwrap_or_default())
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let column_count = if parent_header.is_some() { "3" } else { "2" };

    html!(
        section class="space-y-4 dark:bg-gray-800"
        {
            header class="flex justify-between flex-wrap items-end"
            {
                h2 class="text-xl font-bold" { (kind.display_name_plural()) }

                a href=(new_item_route) class=(LINK_STYLE)
                {
                    "Create " (kind.display_name())
                }
            }

            table class="w-full text-sm text-left rtl:text-right
                text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE)
                        {
                            "Name"
                        }
                        @if let Some(parent_header) = parent_header {
                            th scope="col" class=(TABLE_CELL_STYLE)
                            {
                                (parent_header)
                            }
                        }
                        th scope="col" class=(TABLE_CELL_STYLE)
                        {
                            "Actions"
                        }
                    }
                }

                tbody
                {
                    @for entry in entries {
                        (table_row(entry))
                    }

                    @if entries.is_empty() {
                        tr
                        {
                            td
                                colspan=(column_count)
                                class="px-6 py-4 text-center
                                    text-gray-500 dark:text-gray-400"
                            {
                                "Nothing here yet. "
                                a href=(new_item_route) class=(LINK_STYLE)
                                {
                                    "Create the first one"
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}
