//! The page for editing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    transaction::{
        TransactionId,
        core::get_transaction,
        form::{DictionaryOptions, TransactionFormDefaults, transaction_form_fields},
    },
    validation::Violation,
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a transaction.
///
/// An unknown transaction ID renders the 404 page.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection).inspect_err(|error| {
        if !matches!(error, Error::NotFound) {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
        }
    })?;

    let options = DictionaryOptions::load(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve dictionary options for edit page: {error}")
    })?;

    let defaults = TransactionFormDefaults {
        date: transaction.date,
        status_id: Some(transaction.status_id),
        transaction_type_id: Some(transaction.transaction_type_id),
        category_id: Some(transaction.category_id),
        subcategory_id: Some(transaction.subcategory_id),
        amount: Some(transaction.amount),
        comment: &transaction.comment,
    };

    Ok(edit_transaction_view(transaction_id, &defaults, &options).into_response())
}

fn edit_transaction_view(
    transaction_id: TransactionId,
    defaults: &TransactionFormDefaults<'_>,
    options: &DictionaryOptions,
) -> Markup {
    let edit_route = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);
    let nav_bar = NavBar::new(&edit_route).into_html();
    let form = edit_transaction_form_view(transaction_id, defaults, options, &[]);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Transaction", &[], &content)
}

/// The form fragment, also re-rendered by the update endpoint when the
/// submitted hierarchy is inconsistent.
pub(crate) fn edit_transaction_form_view(
    transaction_id: TransactionId,
    defaults: &TransactionFormDefaults<'_>,
    options: &DictionaryOptions,
    violations: &[Violation],
) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::TRANSACTION, transaction_id);

    html! {
        form
            hx-put=(update_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (transaction_form_fields(defaults, options, violations))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Transaction" }
        }
    }
}
