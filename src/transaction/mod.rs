//! Recording, listing, editing and deleting transactions.

pub mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
pub mod filter;
mod form;
mod new_transaction_page;
#[cfg(test)]
pub(crate) mod test_utils;
mod transactions_page;

pub use self::core::{
    Transaction, TransactionData, TransactionId, create_transaction, create_transaction_table,
    delete_transaction, get_transaction, update_transaction,
};
pub use create_endpoint::{
    CreateTransactionEndpointState, TransactionForm, create_transaction_endpoint,
};
pub use delete_endpoint::{DeleteTransactionEndpointState, delete_transaction_endpoint};
pub use edit_endpoint::{UpdateTransactionEndpointState, update_transaction_endpoint};
pub use edit_page::{EditTransactionPageState, get_edit_transaction_page};
pub use filter::{TransactionFilter, TransactionListRow, list_transactions};
pub use form::{DictionaryOptions, TransactionFormDefaults, transaction_form_fields};
pub use new_transaction_page::{NewTransactionPageState, get_new_transaction_page};
pub use transactions_page::{TransactionsPageState, get_transactions_page};
