//! Transaction deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    transaction::{TransactionId, core::delete_transaction},
};

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle transaction deletion. Returns a success alert or an error.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<DeleteTransactionEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingTransaction) => {
            Error::DeleteMissingTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting transaction {transaction_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            TransactionData, create_transaction, get_transaction, test_utils::seed_hierarchy,
        },
    };

    use super::{DeleteTransactionEndpointState, delete_transaction_endpoint};

    fn get_delete_state() -> (DeleteTransactionEndpointState, i64) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let hierarchy = seed_hierarchy(&connection);
        let transaction = create_transaction(
            TransactionData {
                date: date!(2026 - 01 - 15),
                status_id: hierarchy.status.id,
                transaction_type_id: hierarchy.transaction_type.id,
                category_id: hierarchy.category.id,
                subcategory_id: hierarchy.subcategory.id,
                amount: dec!(1000.00),
                comment: String::new(),
            },
            &connection,
        )
        .expect("Could not create test transaction");

        (
            DeleteTransactionEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            transaction.id,
        )
    }

    #[tokio::test]
    async fn delete_transaction_endpoint_succeeds() {
        let (state, transaction_id) = get_delete_state();

        let response = delete_transaction_endpoint(Path(transaction_id), State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_transaction(transaction_id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_transaction_endpoint_with_invalid_id_returns_not_found() {
        let (state, _) = get_delete_state();

        let response = delete_transaction_endpoint(Path(999999), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
