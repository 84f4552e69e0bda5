//! The API endpoints URIs.
//!
//! For endpoints that take an ID parameter, e.g., '/api/transactions/{transaction_id}',
//! use [format_endpoint]. For endpoints that take a dictionary kind, use
//! [format_kind_endpoint].

use crate::dictionary::DictionaryKind;

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page for listing and filtering transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The overview page listing all four dictionaries.
pub const DICTIONARIES_VIEW: &str = "/dictionaries";
/// The page for creating a new dictionary item of a given kind.
pub const NEW_DICTIONARY_ITEM_VIEW: &str = "/dictionaries/{kind}/new";
/// The page for editing an existing dictionary item.
pub const EDIT_DICTIONARY_ITEM_VIEW: &str = "/dictionaries/{kind}/{item_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create a dictionary item.
pub const POST_DICTIONARY_ITEM: &str = "/api/dictionaries/{kind}";
/// The route to update or delete a dictionary item.
pub const DICTIONARY_ITEM: &str = "/api/dictionaries/{kind}/{item_id}";
/// The route serving categories of a transaction type as JSON.
pub const CATEGORIES_BY_TYPE: &str = "/api/categories/by-type";
/// The route serving subcategories of a category as JSON.
pub const SUBCATEGORIES_BY_CATEGORY: &str = "/api/subcategories/by-category";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/transactions/{transaction_id}',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Replace the '{kind}' parameter in `endpoint_path` with the slug of `kind`.
///
/// Paths that also carry an ID parameter can be passed through
/// [format_endpoint] afterwards.
pub fn format_kind_endpoint(endpoint_path: &str, kind: DictionaryKind) -> String {
    endpoint_path.replacen("{kind}", kind.slug(), 1)
}
