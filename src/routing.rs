//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dictionary::{
        create_dictionary_item_endpoint, delete_dictionary_item_endpoint, get_dictionaries_page,
        get_edit_dictionary_item_page, get_new_dictionary_item_page,
        update_dictionary_item_endpoint,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    lookup::{get_categories_by_type, get_subcategories_by_category},
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, get_transactions_page, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::DICTIONARIES_VIEW, get(get_dictionaries_page))
        .route(
            endpoints::NEW_DICTIONARY_ITEM_VIEW,
            get(get_new_dictionary_item_page),
        )
        .route(
            endpoints::EDIT_DICTIONARY_ITEM_VIEW,
            get(get_edit_dictionary_item_page),
        )
        .route(
            endpoints::POST_DICTIONARY_ITEM,
            post(create_dictionary_item_endpoint),
        )
        .route(
            endpoints::DICTIONARY_ITEM,
            put(update_dictionary_item_endpoint).delete(delete_dictionary_item_endpoint),
        )
        .route(endpoints::CATEGORIES_BY_TYPE, get(get_categories_by_type))
        .route(
            endpoints::SUBCATEGORIES_BY_CATEGORY,
            get(get_subcategories_by_category),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}
