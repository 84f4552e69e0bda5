//! Dictionary item editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    dictionary::{
        DictionaryItemId, DictionaryKind, DictionaryName, EntryOption,
        db::{dictionary_name_exists, get_dictionary_item, parent_options, update_dictionary_item},
        domain::DictionaryItemFormData,
        form::{FormMethod, dictionary_item_form_view},
    },
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for the edit dictionary item page.
#[derive(Debug, Clone)]
pub struct EditDictionaryItemPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditDictionaryItemPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a dictionary item.
#[derive(Debug, Clone)]
pub struct UpdateDictionaryItemEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateDictionaryItemEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the dictionary item editing page.
pub async fn get_edit_dictionary_item_page(
    Path((kind_slug, item_id)): Path<(String, DictionaryItemId)>,
    State(state): State<EditDictionaryItemPageState>,
) -> Result<Response, Error> {
    let Some(kind) = DictionaryKind::from_slug(&kind_slug) else {
        return Ok(Redirect::to(endpoints::DICTIONARIES_VIEW).into_response());
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let parents = parent_options(kind, &connection).inspect_err(|error| {
        tracing::error!(
            "Failed to retrieve parent options for {}: {error}",
            kind.display_name()
        )
    })?;

    match get_dictionary_item(kind, item_id, &connection) {
        Ok(item) => Ok(edit_dictionary_item_view(
            kind,
            item_id,
            item.name.as_ref(),
            &parents,
            item.parent_id,
            "",
        )
        .into_response()),
        Err(error) => {
            let error_message = match error {
                Error::NotFound => format!("{} not found", kind.display_name()),
                _ => {
                    tracing::error!(
                        "Failed to retrieve {} {item_id}: {error}",
                        kind.display_name()
                    );
                    format!("Failed to load {}", kind.display_name().to_lowercase())
                }
            };

            Ok(
                edit_dictionary_item_view(kind, item_id, "", &parents, None, &error_message)
                    .into_response(),
            )
        }
    }
}

/// Handle dictionary item update form submission.
pub async fn update_dictionary_item_endpoint(
    Path((kind_slug, item_id)): Path<(String, DictionaryItemId)>,
    State(state): State<UpdateDictionaryItemEndpointState>,
    Form(form_data): Form<DictionaryItemFormData>,
) -> Response {
    let Some(kind) = DictionaryKind::from_slug(&kind_slug) else {
        return (
            HxRedirect(endpoints::DICTIONARIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let parents = match parent_options(kind, &connection) {
        Ok(parents) => parents,
        Err(error) => {
            tracing::error!(
                "Failed to retrieve parent options for {}: {error}",
                kind.display_name()
            );
            return error.into_alert_response();
        }
    };

    let name = match DictionaryName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return edit_dictionary_item_form_view(
                kind,
                item_id,
                &form_data.name,
                &parents,
                form_data.parent_id,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let name_taken = match dictionary_name_exists(
        kind,
        name.as_ref(),
        form_data.parent_id,
        Some(item_id),
        &connection,
    ) {
        Ok(name_taken) => name_taken,
        Err(error) => return error.into_alert_response(),
    };

    if name_taken {
        let error = Error::DuplicateDictionaryName(name.to_string());

        return edit_dictionary_item_form_view(
            kind,
            item_id,
            name.as_ref(),
            &parents,
            form_data.parent_id,
            &format!("Error: {error}"),
        )
        .into_response();
    }

    match update_dictionary_item(kind, item_id, name, form_data.parent_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::DICTIONARIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingDictionaryItem) => {
            Error::UpdateMissingDictionaryItem.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating {} {item_id}: {error}",
                kind.display_name()
            );
            error.into_alert_response()
        }
    }
}

fn edit_dictionary_item_view(
    kind: DictionaryKind,
    item_id: DictionaryItemId,
    name: &str,
    parents: &[EntryOption],
    selected_parent: Option<DictionaryItemId>,
    error_message: &str,
) -> Markup {
    let edit_route = endpoints::format_endpoint(
        &endpoints::format_kind_endpoint(endpoints::EDIT_DICTIONARY_ITEM_VIEW, kind),
        item_id,
    );
    let nav_bar = NavBar::new(&edit_route).into_html();
    let form =
        edit_dictionary_item_form_view(kind, item_id, name, parents, selected_parent, error_message);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base(&format!("Edit {}", kind.display_name()), &[], &content)
}

fn edit_dictionary_item_form_view(
    kind: DictionaryKind,
    item_id: DictionaryItemId,
    name: &str,
    parents: &[EntryOption],
    selected_parent: Option<DictionaryItemId>,
    error_message: &str,
) -> Markup {
    let update_endpoint = endpoints::format_endpoint(
        &endpoints::format_kind_endpoint(endpoints::DICTIONARY_ITEM, kind),
        item_id,
    );

    dictionary_item_form_view(
        kind,
        &update_endpoint,
        FormMethod::Put,
        name,
        parents,
        selected_parent,
        error_message,
        &format!("Update {}", kind.display_name()),
    )
}
