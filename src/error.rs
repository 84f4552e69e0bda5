//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    internal_server_error::{generic_internal_server_error_response, internal_server_error_response},
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a dictionary item name.
    #[error("Name cannot be empty")]
    EmptyDictionaryName,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to update a dictionary item that does not exist
    #[error("tried to update a dictionary item that is not in the database")]
    UpdateMissingDictionaryItem,

    /// Tried to delete a dictionary item that does not exist
    #[error("tried to delete a dictionary item that is not in the database")]
    DeleteMissingDictionaryItem,

    /// The specified name already exists within the dictionary's uniqueness scope.
    #[error("the name \"{0}\" already exists in the database")]
    DuplicateDictionaryName(String),

    /// Tried to delete a dictionary item that is still referenced by at least
    /// one transaction, either directly or through a dependent category or
    /// subcategory.
    #[error("the dictionary item is still referenced by one or more transactions")]
    DictionaryItemInUse,

    /// A referenced dictionary item does not exist in the database.
    #[error("a referenced dictionary item does not exist")]
    InvalidReference,

    /// The combination of transaction type, category and subcategory does not
    /// form a consistent hierarchy.
    ///
    /// Handlers validate the hierarchy before calling into the database layer,
    /// so this error indicates data changed between validation and commit or a
    /// handler skipped validation.
    #[error("inconsistent dictionary hierarchy: {0}")]
    InconsistentHierarchy(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => internal_server_error_response(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::DatabaseLockError => generic_internal_server_error_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                generic_internal_server_error_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingDictionaryItem => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update dictionary item".to_owned(),
                    details: "The dictionary item could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingDictionaryItem => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete dictionary item".to_owned(),
                    details: "The dictionary item could not be found. \
                    Try refreshing the page to see if the item has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DuplicateDictionaryName(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate Name".to_owned(),
                    details: format!(
                        "The name {name} already exists in the database. \
                        Choose a different name, or edit or delete the existing item.",
                    ),
                },
            ),
            Error::DictionaryItemInUse => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Dictionary item in use".to_owned(),
                    details: "This item is referenced by one or more transactions. \
                    Delete or reassign those transactions first."
                        .to_owned(),
                },
            ),
            Error::InvalidReference => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid selection".to_owned(),
                    details: "One of the selected dictionary items no longer exists. \
                    Refresh the page and try again."
                        .to_owned(),
                },
            ),
            Error::InconsistentHierarchy(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Inconsistent selection".to_owned(),
                    details,
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
