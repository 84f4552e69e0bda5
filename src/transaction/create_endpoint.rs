//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    dictionary::DictionaryItemId,
    timezone::get_local_offset,
    transaction::{
        TransactionData,
        core::create_transaction,
        form::{DictionaryOptions, TransactionFormDefaults},
        new_transaction_page::new_transaction_form_view,
    },
    validation::{HierarchySelection, check_hierarchy},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionEndpointState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or replacing a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// When the transaction happened. Defaults to today when omitted.
    #[serde(default)]
    pub date: Option<Date>,
    pub status_id: DictionaryItemId,
    pub transaction_type_id: DictionaryItemId,
    pub category_id: DictionaryItemId,
    pub subcategory_id: DictionaryItemId,
    /// The amount of money moved, rounded to two fractional digits on entry.
    pub amount: Decimal,
    #[serde(default)]
    pub comment: Option<String>,
}

impl TransactionForm {
    pub(crate) fn hierarchy_selection(&self) -> HierarchySelection {
        HierarchySelection {
            transaction_type_id: Some(self.transaction_type_id),
            category_id: Some(self.category_id),
            subcategory_id: Some(self.subcategory_id),
        }
    }

    pub(crate) fn into_transaction_data(self, default_date: Date) -> TransactionData {
        TransactionData {
            date: self.date.unwrap_or(default_date),
            status_id: self.status_id,
            transaction_type_id: self.transaction_type_id,
            category_id: self.category_id,
            subcategory_id: self.subcategory_id,
            amount: self.amount,
            comment: self.comment.unwrap_or_default(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Redirects to the transactions view on success. Hierarchy violations
/// re-render the form with the violations shown inline.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionEndpointState>,
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

        return new_transaction_form_view(&defaults, &options, &violations).into_response();
    }

    if let Err(error) = create_transaction(form.into_transaction_data(today), &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
