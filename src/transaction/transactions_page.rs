//! Transactions listing page with its filter form.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Query since that parses an empty string as None
// instead of rejecting the request like axum's.
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links, select_field,
    },
    navigation::NavBar,
    transaction::{
        filter::{TransactionFilter, TransactionListRow, list_transactions},
        form::DictionaryOptions,
    },
};

/// The state needed for the transactions listing page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transactions listing, filtered by the query string.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rows = list_transactions(&filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    let options = DictionaryOptions::load(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve dictionary options for filter form: {error}")
    })?;

    Ok(transactions_view(&rows, &filter, &options).into_response())
}

fn transactions_view(
    rows: &[TransactionListRow],
    filter: &TransactionFilter,
    options: &DictionaryOptions,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-6xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                (filter_form_view(filter, options))

                (transactions_table_view(rows))
            }
        }
    );

    base("Transactions", &[], &content)
}

fn filter_form_view(filter: &TransactionFilter, options: &DictionaryOptions) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid gap-4 md:grid-cols-3 lg:grid-cols-4 items-end"
        {
            div
            {
                label for="date_from" class=(FORM_LABEL_STYLE) { "From" }

                input
                    name="date_from"
                    id="date_from"
                    type="date"
                    value=[filter.date_from.map(|date| date.to_string())]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date_to" class=(FORM_LABEL_STYLE) { "To" }

                input
                    name="date_to"
                    id="date_to"
                    type="date"
                    value=[filter.date_to.map(|date| date.to_string())]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (select_field("Status", "status", &options.statuses, filter.status, "All statuses", false))
            (select_field(
                "Transaction Type",
                "transaction_type",
                &options.transaction_types,
                filter.transaction_type,
                "All transaction types",
                false,
            ))
            (select_field("Category", "category", &options.categories, filter.category, "All categories", false))
            (select_field(
                "Subcategory",
                "subcategory",
                &options.subcategories,
                filter.subcategory,
                "All subcategories",
                false,
            ))

            div class="flex gap-4 items-center"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply Filters" }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Reset" }
            }
        }
    )
}

fn transactions_table_view(rows: &[TransactionListRow]) -> Markup {
    let table_row = |row: &TransactionListRow| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, row.id);
        let delete_url = endpoints::format_endpoint(endpoints::TRANSACTION, row.id);
        let confirm_message = format!(
            "Are you sure you want to delete the transaction of {:.2} on {}?",
            row.amount, row.date
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (row.date) }
                td class=(TABLE_CELL_STYLE) { (row.status_name) }
                td class=(TABLE_CELL_STYLE) { (row.transaction_type_name) }
                td class=(TABLE_CELL_STYLE) { (row.category_name) }
                td class=(TABLE_CELL_STYLE) { (row.subcategory_name) }
                td class=(TABLE_CELL_STYLE) { (format!("{:.2}", row.amount)) }
                td class=(TABLE_CELL_STYLE) { (row.comment) }
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

    html!(
        section class="dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right
                text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Subcategory" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Comment" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for row in rows {
                        (table_row(row))
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td
                                colspan="8"
                                class="px-6 py-4 text-center
                                    text-gray-500 dark:text-gray-400"
                            {
                                "No transactions match. "
                                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                                {
                                    "Record the first one"
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}
