//! JSON lookup endpoints backing the cascading dictionary dropdowns.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
// Must use axum_extra's Query since that parses an empty string as None
// instead of rejecting the request like axum's.
use axum_extra::extract::Query;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    dictionary::{
        DictionaryItemId, EntryOption,
        db::{get_categories_for_type, get_subcategories_for_category},
    },
};

/// The state needed for the lookup endpoints.
#[derive(Debug, Clone)]
pub struct LookupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LookupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoriesByTypeQuery {
    #[serde(default)]
    pub transaction_type_id: Option<DictionaryItemId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubcategoriesByCategoryQuery {
    #[serde(default)]
    pub category_id: Option<DictionaryItemId>,
}

/// The categories of a transaction type as a JSON array of `{id, name}`,
/// ordered by name.
///
/// An absent or unmatched `transaction_type_id` yields an empty array.
pub async fn get_categories_by_type(
    State(state): State<LookupState>,
    Query(query): Query<CategoriesByTypeQuery>,
) -> Result<Json<Vec<EntryOption>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let options = match query.transaction_type_id {
        Some(transaction_type_id) => get_categories_for_type(transaction_type_id, &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?,
        None => Vec::new(),
    };

    Ok(Json(options))
}

/// The subcategories of a category as a JSON array of `{id, name}`, ordered
/// by name.
///
/// An absent or unmatched `category_id` yields an empty array.
pub async fn get_subcategories_by_category(
    State(state): State<LookupState>,
    Query(query): Query<SubcategoriesByCategoryQuery>,
) -> Result<Json<Vec<EntryOption>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let options = match query.category_id {
        Some(category_id) => get_subcategories_for_category(category_id, &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve subcategories: {error}"))?,
        None => Vec::new(),
    };

    Ok(Json(options))
}
