//! Dictionary item deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    dictionary::{DictionaryItemId, DictionaryKind, db::delete_dictionary_item},
    endpoints,
};

/// The state needed for deleting a dictionary item.
#[derive(Debug, Clone)]
pub struct DeleteDictionaryItemEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteDictionaryItemEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle dictionary item deletion. Returns a success alert or an error.
///
/// Deletion is refused while any transaction references the item, directly or
/// through a dependent category or subcategory.
pub async fn delete_dictionary_item_endpoint(
    Path((kind_slug, item_id)): Path<(String, DictionaryItemId)>,
    State(state): State<DeleteDictionaryItemEndpointState>,
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

    match delete_dictionary_item(kind, item_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: format!("{} deleted successfully", kind.display_name()),
        }
        .into_response(),
        Err(error @ (Error::DeleteMissingDictionaryItem | Error::DictionaryItemInUse)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting {} {item_id}: {error}",
                kind.display_name()
            );
            error.into_alert_response()
        }
    }
}
