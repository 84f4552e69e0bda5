//! Management of the four reference dictionaries that classify a transaction:
//! statuses, transaction types, categories and subcategories.
//!
//! Categories belong to a transaction type and subcategories to a category,
//! so the module also owns the parent relationships that the transaction
//! hierarchy validation checks against.

mod create;
mod delete;
pub mod db;
mod domain;
mod edit;
mod form;
mod overview;

pub use create::{
    CreateDictionaryItemEndpointState, NewDictionaryItemPageState, create_dictionary_item_endpoint,
    get_new_dictionary_item_page,
};
pub use delete::{DeleteDictionaryItemEndpointState, delete_dictionary_item_endpoint};
pub use db::{
    create_dictionary_item, create_dictionary_tables, delete_dictionary_item,
    dictionary_name_exists, get_all_categories, get_all_statuses, get_all_subcategories,
    get_all_transaction_types, get_categories_for_type, get_dictionary_item,
    get_subcategories_for_category, list_dictionary_entries, update_dictionary_item,
};
pub use domain::{
    DictionaryItem, DictionaryItemFormData, DictionaryItemId, DictionaryKind, DictionaryName,
    EntryOption,
};
pub use edit::{
    EditDictionaryItemPageState, UpdateDictionaryItemEndpointState, get_edit_dictionary_item_page,
    update_dictionary_item_endpoint,
};
pub use overview::{DictionariesPageState, get_dictionaries_page};
