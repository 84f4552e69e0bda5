//! Defines the endpoint for replacing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints,
    timezone::get_local_offset,
    transaction::{
        TransactionId,
        core::update_transaction,
        create_endpoint::TransactionForm,
        edit_page::edit_transaction_form_view,
        form::{DictionaryOptions, TransactionFormDefaults},
    },
    validation::check_hierarchy,
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionEndpointState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing all fields of a transaction.
///
/// Redirects to the transactions view on success. Hierarchy violations
/// re-render the form with the violations shown inline.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<UpdateTransactionEndpointState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let violations = match check_hierarchy(&form.hierarchy_selection(), &connection) {
        Ok(violations) => violations,
        Err(error) => {
            tracing::error!("could not validate transaction hierarchy: {error}");
            return error.into_alert_response();
        }
    };

    if !violations.is_empty() {
        let options = match DictionaryOptions::load(&connection) {
            Ok(options) => options,
            Err(error) => return error.into_alert_response(),
        };
        let defaults = TransactionFormDefaults {
            date: form.date.unwrap_or(today),
            status_id: Some(form.status_id),
            transaction_type_id: Some(form.transaction_type_id),
            category_id: Some(form.category_id),
            subcategory_id: Some(form.subcategory_id),
            amount: Some(form.amount),
            comment: form.comment.as_deref().unwrap_or_default(),
        };

        return edit_transaction_form_view(transaction_id, &defaults, &options, &violations)
            .into_response();
    }

    match update_transaction(transaction_id, form.into_transaction_data(today), &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingTransaction) => {
            Error::UpdateMissingTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
