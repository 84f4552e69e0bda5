//! The page for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::form::{DictionaryOptions, TransactionFormDefaults, transaction_form_fields},
    validation::Violation,
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the new transaction page with the date defaulting to today in the
/// configured local timezone.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };

    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let options = DictionaryOptions::load(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve dictionary options for new transaction page: {error}")
    })?;

    let defaults = TransactionFormDefaults {
        date: today,
        status_id: None,
        transaction_type_id: None,
        category_id: None,
        subcategory_id: None,
        amount: None,
        comment: "",
    };

    Ok(new_transaction_view(&defaults, &options).into_response())
}

fn new_transaction_view(
    defaults: &TransactionFormDefaults<'_>,
    options: &DictionaryOptions,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form = new_transaction_form_view(defaults, options, &[]);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("New Transaction", &[], &content)
}

/// The form fragment, also re-rendered by the create endpoint when the
/// submitted hierarchy is inconsistent.
pub(crate) fn new_transaction_form_view(
    defaults: &TransactionFormDefaults<'_>,
    options: &DictionaryOptions,
    violations: &[Violation],
) -> Markup {
    html! {
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (transaction_form_fields(defaults, options, violations))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Transaction" }
        }
    }
}

#[cfg(test)]
mod new_transaction_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
        transaction::test_utils::seed_hierarchy,
    };

    use super::{NewTransactionPageState, get_new_transaction_page};

    fn get_page_state() -> NewTransactionPageState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        seed_hierarchy(&connection);

        NewTransactionPageState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn render_page() {
        let state = get_page_state();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "date", "date");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "comment", "text");
        assert_form_submit_button(&form);
    }
}
