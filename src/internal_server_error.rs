//! The page shown when the server cannot finish handling a request.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Render a 500 response explaining what went wrong and how to remedy it.
pub(crate) fn internal_server_error_response(description: &str, remedy: &str) -> Response {
    let page = error_view("Internal Server Error", "500", description, remedy);

    (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
}

/// The catch-all 500 response for errors with no client-facing detail.
pub(crate) fn generic_internal_server_error_response() -> Response {
    internal_server_error_response(
        "The server ran into an unexpected problem while handling your request.",
        "Try again in a moment, or check debug.log for details",
    )
}

/// A route handler that displays the internal server error page.
pub async fn get_internal_server_error_page() -> Response {
    generic_internal_server_error_response()
}
