//! Out-of-band alert fragments swapped into the `#alert-container` div.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const ALERT_SUCCESS_STYLE: &str = "p-4 mb-4 text-sm rounded-lg shadow-lg \
    text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400";

const ALERT_ERROR_STYLE: &str = "p-4 mb-4 text-sm rounded-lg shadow-lg \
    text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400";

/// An alert message displayed at the bottom of the page via an htmx
/// out-of-band swap.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success alert with a bold message and extra details.
    #[allow(dead_code)]
    Success {
        /// The headline of the alert.
        message: String,
        /// Extra detail displayed under the headline.
        details: String,
    },
    /// A success alert with a message only.
    SuccessSimple {
        /// The headline of the alert.
        message: String,
    },
    /// An error alert with a bold message and extra details.
    Error {
        /// The headline of the alert.
        message: String,
        /// Extra detail displayed under the headline.
        details: String,
    },
    /// An error alert with a message only.
    #[allow(dead_code)]
    ErrorSimple {
        /// The headline of the alert.
        message: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band fragment targeting `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (ALERT_SUCCESS_STYLE, message, Some(details)),
            Alert::SuccessSimple { message } => (ALERT_SUCCESS_STYLE, message, None),
            Alert::Error { message, details } => (ALERT_ERROR_STYLE, message, Some(details)),
            Alert::ErrorSimple { message } => (ALERT_ERROR_STYLE, message, None),
        };

        html! {
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(style) role="alert"
                {
                    span class="font-medium" { (message) }

                    @if let Some(details) = details {
                        p { (details) }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_html()).into_response()
    }
}
