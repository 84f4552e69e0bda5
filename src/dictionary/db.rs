//! Database operations for the four dictionaries.
//!
//! The operations are dispatched on [DictionaryKind] so the HTTP handlers can
//! stay generic over the kind they were routed with.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    dictionary::{DictionaryItem, DictionaryItemId, DictionaryKind, DictionaryName, EntryOption},
};

/// A row of the dictionaries overview, with the owning item's name resolved
/// for categories and subcategories.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewEntry {
    pub id: DictionaryItemId,
    pub name: String,
    pub parent_name: Option<String>,
}

fn table(kind: DictionaryKind) -> &'static str {
    match kind {
        DictionaryKind::Status => "status",
        DictionaryKind::TransactionType => "transaction_type",
        DictionaryKind::Category => "category",
        DictionaryKind::Subcategory => "subcategory",
    }
}

fn parent_column(kind: DictionaryKind) -> Option<&'static str> {
    match kind {
        DictionaryKind::Status | DictionaryKind::TransactionType => None,
        DictionaryKind::Category => Some("transaction_type_id"),
        DictionaryKind::Subcategory => Some("category_id"),
    }
}

/// Create a dictionary item and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidReference] if the kind requires a parent and none was
///   given, or `parent_id` does not refer to an existing row,
/// - or [Error::DuplicateDictionaryName] if the name already exists within
///   the kind's uniqueness scope,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_dictionary_item(
    kind: DictionaryKind,
    name: DictionaryName,
    parent_id: Option<DictionaryItemId>,
    connection: &Connection,
) -> Result<DictionaryItem, Error> {
    let result = match (parent_column(kind), parent_id) {
        (None, _) => connection.execute(
            &format!("INSERT INTO {} (name) VALUES (?1)", table(kind)),
            (name.as_ref(),),
        ),
        (Some(column), Some(parent_id)) => connection.execute(
            &format!(
                "INSERT INTO {} (name, {column}) VALUES (?1, ?2)",
                table(kind)
            ),
            (name.as_ref(), parent_id),
        ),
        (Some(_), None) => return Err(Error::InvalidReference),
    };

    match result {
        Ok(_) => Ok(DictionaryItem {
            id: connection.last_insert_rowid(),
            parent_id: parent_column(kind).and(parent_id),
            name,
        }),
        Err(error) => Err(map_constraint_error(error, name.as_ref())),
    }
}

/// Retrieve a single dictionary item by ID.
pub fn get_dictionary_item(
    kind: DictionaryKind,
    item_id: DictionaryItemId,
    connection: &Connection,
) -> Result<DictionaryItem, Error> {
    let sql = match parent_column(kind) {
        Some(column) => format!(
            "SELECT id, name, {column} FROM {} WHERE id = :id",
            table(kind)
        ),
        None => format!("SELECT id, name, NULL FROM {} WHERE id = :id", table(kind)),
    };

    connection
        .prepare(&sql)?
        .query_one(&[(":id", &item_id)], map_item_row)
        .map_err(|error| error.into())
}

/// Update a dictionary item's name and, for kinds with a parent, its parent.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingDictionaryItem] if `item_id` does not refer to an
///   existing row,
/// - or [Error::InvalidReference] if the kind requires a parent and none was
///   given, or `parent_id` does not refer to an existing row,
/// - or [Error::DuplicateDictionaryName] if the new name collides within the
///   kind's uniqueness scope,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_dictionary_item(
    kind: DictionaryKind,
    item_id: DictionaryItemId,
    name: DictionaryName,
    parent_id: Option<DictionaryItemId>,
    connection: &Connection,
) -> Result<(), Error> {
    let result = match (parent_column(kind), parent_id) {
        (None, _) => connection.execute(
            &format!("UPDATE {} SET name = ?1 WHERE id = ?2", table(kind)),
            (name.as_ref(), item_id),
        ),
        (Some(column), Some(parent_id)) => connection.execute(
            &format!(
                "UPDATE {} SET name = ?1, {column} = ?2 WHERE id = ?3",
                table(kind)
            ),
            (name.as_ref(), parent_id, item_id),
        ),
        (Some(_), None) => return Err(Error::InvalidReference),
    };

    let rows_affected = result.map_err(|error| map_constraint_error(error, name.as_ref()))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingDictionaryItem);
    }

    Ok(())
}

/// Delete a dictionary item by ID.
///
/// Deleting a transaction type or category cascades to its dependents, but
/// the whole statement is refused if any row in the chain is still referenced
/// by a transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingDictionaryItem] if `item_id` does not refer to an
///   existing row,
/// - or [Error::DictionaryItemInUse] if the item or one of its dependents is
///   referenced by a transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_dictionary_item(
    kind: DictionaryKind,
    item_id: DictionaryItemId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            &format!("DELETE FROM {} WHERE id = ?1", table(kind)),
            [item_id],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code:
                        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER,
                },
                _,
            ) => Error::DictionaryItemInUse,
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingDictionaryItem);
    }

    Ok(())
}

/// Check whether `name` is already taken within the kind's uniqueness scope.
///
/// Statuses and transaction types are unique by name; categories by
/// (name, transaction type) and subcategories by (name, category).
/// `exclude_id` skips the row being edited so an unchanged name does not
/// count as a collision.
pub fn dictionary_name_exists(
    kind: DictionaryKind,
    name: &str,
    parent_id: Option<DictionaryItemId>,
    exclude_id: Option<DictionaryItemId>,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = match parent_column(kind) {
        None => connection
            .prepare(&format!(
                // `id IS NOT NULL` when no row is excluded.
                "SELECT COUNT(1) FROM {} WHERE name = ?1 AND id IS NOT ?2",
                table(kind)
            ))?
            .query_one((name, exclude_id), |row| row.get(0))?,
        Some(column) => connection
            .prepare(&format!(
                "SELECT COUNT(1) FROM {} WHERE name = ?1 AND {column} IS ?2 AND id IS NOT ?3",
                table(kind)
            ))?
            .query_one((name, parent_id, exclude_id), |row| row.get(0))?,
    };

    Ok(count > 0)
}

/// Retrieve all items of a kind for the overview page.
///
/// Statuses and transaction types are ordered by name; categories and
/// subcategories by their owning item's name and then their own.
pub fn list_dictionary_entries(
    kind: DictionaryKind,
    connection: &Connection,
) -> Result<Vec<OverviewEntry>, Error> {
    let sql = match kind {
        DictionaryKind::Status => "SELECT id, name, NULL FROM status ORDER BY name ASC",
        DictionaryKind::TransactionType => {
            "SELECT id, name, NULL FROM transaction_type ORDER BY name ASC"
        }
        DictionaryKind::Category => {
            "SELECT category.id, category.name, transaction_type.name
             FROM category
             JOIN transaction_type ON transaction_type.id = category.transaction_type_id
             ORDER BY transaction_type.name ASC, category.name ASC"
        }
        DictionaryKind::Subcategory => {
            "SELECT subcategory.id, subcategory.name, category.name
             FROM subcategory
             JOIN category ON category.id = subcategory.category_id
             ORDER BY category.name ASC, subcategory.name ASC"
        }
    };

    connection
        .prepare(sql)?
        .query_map([], |row| {
            Ok(OverviewEntry {
                id: row.get(0)?,
                name: row.get(1)?,
                parent_name: row.get(2)?,
            })
        })?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// The options for the parent select of a kind's add/edit form.
///
/// Returns an empty list for kinds without a parent.
pub fn parent_options(
    kind: DictionaryKind,
    connection: &Connection,
) -> Result<Vec<EntryOption>, Error> {
    match kind.parent_kind() {
        None => Ok(Vec::new()),
        Some(DictionaryKind::TransactionType) => get_all_transaction_types(connection),
        Some(DictionaryKind::Category) => get_all_categories(connection),
        Some(kind) => {
            unreachable!("kind {kind:?} cannot be a parent kind")
        }
    }
}

/// Retrieve all statuses ordered alphabetically by name.
pub fn get_all_statuses(connection: &Connection) -> Result<Vec<EntryOption>, Error> {
    select_options("SELECT id, name FROM status ORDER BY name ASC", connection)
}

/// Retrieve all transaction types ordered alphabetically by name.
pub fn get_all_transaction_types(connection: &Connection) -> Result<Vec<EntryOption>, Error> {
    select_options(
        "SELECT id, name FROM transaction_type ORDER BY name ASC",
        connection,
    )
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<EntryOption>, Error> {
    select_options(
        "SELECT id, name FROM category ORDER BY name ASC",
        connection,
    )
}

/// Retrieve all subcategories ordered alphabetically by name.
pub fn get_all_subcategories(connection: &Connection) -> Result<Vec<EntryOption>, Error> {
    select_options(
        "SELECT id, name FROM subcategory ORDER BY name ASC",
        connection,
    )
}

/// Retrieve the categories belonging to a transaction type, ordered by name.
///
/// An unknown `transaction_type_id` yields an empty list, not an error.
pub fn get_categories_for_type(
    transaction_type_id: DictionaryItemId,
    connection: &Connection,
) -> Result<Vec<EntryOption>, Error> {
    connection
        .prepare(
            "SELECT id, name FROM category WHERE transaction_type_id = :id ORDER BY name ASC",
        )?
        .query_map(&[(":id", &transaction_type_id)], map_option_row)?
        .map(|maybe_option| maybe_option.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the subcategories belonging to a category, ordered by name.
///
/// An unknown `category_id` yields an empty list, not an error.
pub fn get_subcategories_for_category(
    category_id: DictionaryItemId,
    connection: &Connection,
) -> Result<Vec<EntryOption>, Error> {
    connection
        .prepare("SELECT id, name FROM subcategory WHERE category_id = :id ORDER BY name ASC")?
        .query_map(&[(":id", &category_id)], map_option_row)?
        .map(|maybe_option| maybe_option.map_err(|error| error.into()))
        .collect()
}

/// Initialize the dictionary tables and indexes.
pub fn create_dictionary_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS status (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS transaction_type (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            transaction_type_id INTEGER NOT NULL,
            FOREIGN KEY(transaction_type_id) REFERENCES transaction_type(id)
                ON UPDATE CASCADE ON DELETE CASCADE,
            UNIQUE(name, transaction_type_id)
        );

        CREATE TABLE IF NOT EXISTS subcategory (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id)
                ON UPDATE CASCADE ON DELETE CASCADE,
            UNIQUE(name, category_id)
        );

        CREATE INDEX IF NOT EXISTS idx_category_type ON category(transaction_type_id);
        CREATE INDEX IF NOT EXISTS idx_subcategory_category ON subcategory(category_id);",
    )?;

    Ok(())
}

fn map_item_row(row: &Row) -> Result<DictionaryItem, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = DictionaryName::new_unchecked(&raw_name);
    let parent_id = row.get(2)?;

    Ok(DictionaryItem {
        id,
        name,
        parent_id,
    })
}

fn map_option_row(row: &Row) -> Result<EntryOption, rusqlite::Error> {
    Ok(EntryOption {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn select_options(sql: &str, connection: &Connection) -> Result<Vec<EntryOption>, Error> {
    connection
        .prepare(sql)?
        .query_map([], map_option_row)?
        .map(|maybe_option| maybe_option.map_err(|error| error.into()))
        .collect()
}

fn map_constraint_error(error: rusqlite::Error, name: &str) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateDictionaryName(name.to_string()),
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidReference,
        error => error.into(),
    }
}

#[cfg(test)]
mod dictionary_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        dictionary::{
            DictionaryItem, DictionaryKind, DictionaryName, create_dictionary_item,
            delete_dictionary_item, dictionary_name_exists, get_dictionary_item,
            update_dictionary_item,
        },
    };

    use super::{get_categories_for_type, get_subcategories_for_category, list_dictionary_entries};

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
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

    #[test]
    fn create_and_get_item_succeeds() {
        let connection = get_test_db_connection();

        let status = must_create(DictionaryKind::Status, "Бизнес", None, &connection);

        assert!(status.id > 0);
        assert_eq!(status.parent_id, None);
        assert_eq!(
            get_dictionary_item(DictionaryKind::Status, status.id, &connection),
            Ok(status)
        );
    }

    #[test]
    fn get_item_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let result = get_dictionary_item(DictionaryKind::Status, 999999, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn create_category_without_parent_fails() {
        let connection = get_test_db_connection();

        let result = create_dictionary_item(
            DictionaryKind::Category,
            DictionaryName::new_unchecked("Маркетинг"),
            None,
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidReference));
    }

    #[test]
    fn create_category_with_dangling_parent_fails() {
        let connection = get_test_db_connection();

        let result = create_dictionary_item(
            DictionaryKind::Category,
            DictionaryName::new_unchecked("Маркетинг"),
            Some(42),
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidReference));
    }

    #[test]
    fn duplicate_name_in_scope_fails() {
        let connection = get_test_db_connection();
        let transaction_type =
            must_create(DictionaryKind::TransactionType, "Списание", None, &connection);
        must_create(
            DictionaryKind::Category,
            "Маркетинг",
            Some(transaction_type.id),
            &connection,
        );

        let result = create_dictionary_item(
            DictionaryKind::Category,
            DictionaryName::new_unchecked("Маркетинг"),
            Some(transaction_type.id),
            &connection,
        );

        assert_eq!(
            result,
            Err(Error::DuplicateDictionaryName("Маркетинг".to_owned()))
        );
    }

    #[test]
    fn same_name_under_different_parent_succeeds() {
        let connection = get_test_db_connection();
        let expense =
            must_create(DictionaryKind::TransactionType, "Списание", None, &connection);
        let income =
            must_create(DictionaryKind::TransactionType, "Поступление", None, &connection);
        must_create(DictionaryKind::Category, "Прочее", Some(expense.id), &connection);

        let result = create_dictionary_item(
            DictionaryKind::Category,
            DictionaryName::new_unchecked("Прочее"),
            Some(income.id),
            &connection,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn name_exists_respects_scope_and_exclusion() {
        let connection = get_test_db_connection();
        let transaction_type =
            must_create(DictionaryKind::TransactionType, "Списание", None, &connection);
        let category = must_create(
            DictionaryKind::Category,
            "Маркетинг",
            Some(transaction_type.id),
            &connection,
        );

        assert_eq!(
            dictionary_name_exists(
                DictionaryKind::Category,
                "Маркетинг",
                Some(transaction_type.id),
                None,
                &connection,
            ),
            Ok(true)
        );
        // Another scope does not collide.
        assert_eq!(
            dictionary_name_exists(
                DictionaryKind::Category,
                "Маркетинг",
                Some(transaction_type.id + 1),
                None,
                &connection,
            ),
            Ok(false)
        );
        // The row being edited does not collide with itself.
        assert_eq!(
            dictionary_name_exists(
                DictionaryKind::Category,
                "Маркетинг",
                Some(transaction_type.id),
                Some(category.id),
                &connection,
            ),
            Ok(false)
        );
    }

    #[test]
    fn update_item_succeeds() {
        let connection = get_test_db_connection();
        let status = must_create(DictionaryKind::Status, "Черновик", None, &connection);

        let result = update_dictionary_item(
            DictionaryKind::Status,
            status.id,
            DictionaryName::new_unchecked("Проведено"),
            None,
            &connection,
        );

        assert!(result.is_ok());

        let updated = get_dictionary_item(DictionaryKind::Status, status.id, &connection)
            .expect("Could not get updated item");
        assert_eq!(updated.name.as_ref(), "Проведено");
    }

    #[test]
    fn update_item_with_invalid_id_returns_missing() {
        let connection = get_test_db_connection();

        let result = update_dictionary_item(
            DictionaryKind::Status,
            999999,
            DictionaryName::new_unchecked("Проведено"),
            None,
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingDictionaryItem));
    }

    #[test]
    fn delete_item_succeeds() {
        let connection = get_test_db_connection();
        let status = must_create(DictionaryKind::Status, "Черновик", None, &connection);

        let result = delete_dictionary_item(DictionaryKind::Status, status.id, &connection);

        assert!(result.is_ok());
        assert_eq!(
            get_dictionary_item(DictionaryKind::Status, status.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_item_with_invalid_id_returns_missing() {
        let connection = get_test_db_connection();

        let result = delete_dictionary_item(DictionaryKind::Status, 999999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingDictionaryItem));
    }

    #[test]
    fn delete_type_cascades_to_unreferenced_dependents() {
        let connection = get_test_db_connection();
        let transaction_type =
            must_create(DictionaryKind::TransactionType, "Списание", None, &connection);
        let category = must_create(
            DictionaryKind::Category,
            "Маркетинг",
            Some(transaction_type.id),
            &connection,
        );
        let subcategory = must_create(
            DictionaryKind::Subcategory,
            "Avito",
            Some(category.id),
            &connection,
        );

        let result = delete_dictionary_item(
            DictionaryKind::TransactionType,
            transaction_type.id,
            &connection,
        );

        assert!(result.is_ok());
        assert_eq!(
            get_dictionary_item(DictionaryKind::Category, category.id, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(
            get_dictionary_item(DictionaryKind::Subcategory, subcategory.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn overview_orders_categories_by_type_then_name() {
        let connection = get_test_db_connection();
        let expense =
            must_create(DictionaryKind::TransactionType, "Списание", None, &connection);
        let income =
            must_create(DictionaryKind::TransactionType, "Поступление", None, &connection);
        must_create(DictionaryKind::Category, "Маркетинг", Some(expense.id), &connection);
        must_create(DictionaryKind::Category, "Аренда", Some(expense.id), &connection);
        must_create(DictionaryKind::Category, "Продажи", Some(income.id), &connection);

        let entries = list_dictionary_entries(DictionaryKind::Category, &connection)
            .expect("Could not list categories");

        let got: Vec<(&str, &str)> = entries
            .iter()
            .map(|entry| {
                (
                    entry.name.as_str(),
                    entry.parent_name.as_deref().unwrap_or_default(),
                )
            })
            .collect();
        assert_eq!(
            got,
            vec![
                ("Продажи", "Поступление"),
                ("Аренда", "Списание"),
                ("Маркетинг", "Списание"),
            ]
        );
    }

    #[test]
    fn categories_for_type_are_scoped_and_ordered() {
        let connection = get_test_db_connection();
        let expense =
            must_create(DictionaryKind::TransactionType, "Списание", None, &connection);
        let income =
            must_create(DictionaryKind::TransactionType, "Поступление", None, &connection);
        must_create(DictionaryKind::Category, "Маркетинг", Some(expense.id), &connection);
        must_create(DictionaryKind::Category, "Аренда", Some(expense.id), &connection);
        must_create(DictionaryKind::Category, "Продажи", Some(income.id), &connection);

        let options = get_categories_for_type(expense.id, &connection)
            .expect("Could not get categories for type");

        let names: Vec<&str> = options.iter().map(|option| option.name.as_str()).collect();
        assert_eq!(names, vec!["Аренда", "Маркетинг"]);
    }

    #[test]
    fn categories_for_unknown_type_are_empty() {
        let connection = get_test_db_connection();

        let options = get_categories_for_type(999999, &connection)
            .expect("Could not get categories for type");

        assert!(options.is_empty());
    }

    #[test]
    fn subcategories_for_unknown_category_are_empty() {
        let connection = get_test_db_connection();

        let options = get_subcategories_for_category(999999, &connection)
            .expect("Could not get subcategories for category");

        assert!(options.is_empty());
    }
}
