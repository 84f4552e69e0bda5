//! Shared fixtures for the transaction module's tests.

use rusqlite::Connection;

use crate::dictionary::{DictionaryItem, DictionaryKind, DictionaryName, create_dictionary_item};

/// A fully populated dictionary hierarchy plus an unrelated second chain for
/// inconsistency tests.
pub struct Hierarchy {
    pub status: DictionaryItem,
    pub transaction_type: DictionaryItem,
    pub category: DictionaryItem,
    pub subcategory: DictionaryItem,
    pub other_type: DictionaryItem,
    pub other_category: DictionaryItem,
}

/// Insert the scenario dictionaries (Бизнес/Списание/Маркетинг/Avito) plus a
/// second, unrelated type and category.
pub fn seed_hierarchy(connection: &Connection) -> Hierarchy {
    let status = must_create(DictionaryKind::Status, "Бизнес", None, connection);
    let transaction_type = must_create(DictionaryKind::TransactionType, "Списание", None, connection);
    let category = must_create(
        DictionaryKind::Category,
        "Маркетинг",
        Some(transaction_type.id),
        connection,
    );
    let subcategory = must_create(
        DictionaryKind::Subcategory,
        "Avito",
        Some(category.id),
        connection,
    );
    let other_type = must_create(DictionaryKind::TransactionType, "Поступление", None, connection);
    let other_category = must_create(
        DictionaryKind::Category,
        "Продажи",
        Some(other_type.id),
        connection,
    );

    Hierarchy {
        status,
        transaction_type,
        category,
        subcategory,
        other_type,
        other_category,
    }
}

fn must_create(
    kind: DictionaryKind,
    name: &str,
    parent_id: Option<i64>,
    connection: &Connection,
) -> DictionaryItem {
    create_dictionary_item(kind, DictionaryName::new_unchecked(name), parent_id, connection)
        .expect("Could not create test dictionary item")
}
