//! Dictionary item creation page and endpoint.
//!
//! The dictionary kind arrives as a URL slug. An unrecognized slug is not an
//! error, the client is sent back to the dictionaries overview instead.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    dictionary::{
        DictionaryKind, DictionaryName, EntryOption,
        db::{create_dictionary_item, dictionary_name_exists, parent_options},
        domain::DictionaryItemFormData,
        form::{FormMethod, dictionary_item_form_view},
    },
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for the new dictionary item page.
#[derive(Debug, Clone)]
pub struct NewDictionaryItemPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewDictionaryItemPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for creating a dictionary item.
#[derive(Debug, Clone)]
pub struct CreateDictionaryItemEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateDictionaryItemEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the dictionary item creation page.
pub async fn get_new_dictionary_item_page(
    Path(kind_slug): Path<String>,
    State(state): State<NewDictionaryItemPageState>,
) -> Result<Response, Error> {
    let Some(kind) = DictionaryKind::from_slug(&kind_slug) else {
        return Ok(Redirect::to(endpoints::DICTIONARIES_VIEW).into_response());
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let parents = parent_options(kind, &connection).inspect_err(|error| {
        tracing::error!(
            "Failed to retrieve parent options for new {}: {error}",
            kind.display_name()
        )
    })?;

    Ok(new_dictionary_item_view(kind, &parents).into_response())
}

/// Handle dictionary item creation form submission.
pub async fn create_dictionary_item_endpoint(
    Path(kind_slug): Path<String>,
    State(state): State<CreateDictionaryItemEndpointState>,
    Form(form_data): Form<DictionaryItemFormData>,
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

    let parents = match parent_options(kind, &connection) {
        Ok(parents) => parents,
        Err(error) => {
            tracing::error!(
                "Failed to retrieve parent options for new {}: {error}",
                kind.display_name()
            );
            return error.into_alert_response();
        }
    };

    let name = match DictionaryName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return new_dictionary_item_form_view(
                kind,
                &parents,
                form_data.parent_id,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let name_taken = match dictionary_name_exists(
        kind,
        name.as_ref(),
        form_data.parent_id,
        None,
        &connection,
    ) {
        Ok(name_taken) => name_taken,
        Err(error) => return error.into_alert_response(),
    };

    if name_taken {
        let error = Error::DuplicateDictionaryName(name.to_string());

        return new_dictionary_item_form_view(
            kind,
            &parents,
            form_data.parent_id,
            &format!("Error: {error}"),
        )
        .into_response();
    }

    match create_dictionary_item(kind, name, form_data.parent_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::DICTIONARIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while creating a {}: {error}",
                kind.display_name()
            );

            error.into_alert_response()
        }
    }
}

fn new_dictionary_item_view(kind: DictionaryKind, parents: &[EntryOption]) -> Markup {
    let new_item_route = endpoints::format_kind_endpoint(endpoints::NEW_DICTIONARY_ITEM_VIEW, kind);
    let nav_bar = NavBar::new(&new_item_route).into_html();
    let form = new_dictionary_item_form_view(kind, parents, None, "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base(&format!("Create {}", kind.display_name()), &[], &content)
}

fn new_dictionary_item_form_view(
    kind: DictionaryKind,
    parents: &[EntryOption],
    selected_parent: Option<i64>,
    error_message: &str,
) -> Markup {
    let create_endpoint = endpoints::format_kind_endpoint(endpoints::POST_DICTIONARY_ITEM, kind);

    dictionary_item_form_view(
        kind,
        &create_endpoint,
        FormMethod::Post,
        "",
        parents,
        selected_parent,
        error_message,
        &format!("Create {}", kind.display_name()),
    )
}
