//! Defines the core data models and database queries for transactions.

use std::str::FromStr;

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    dictionary::DictionaryItemId,
    validation::{HierarchySelection, check_hierarchy},
};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// A recorded movement of money, classified by the four dictionaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    pub status_id: DictionaryItemId,
    pub transaction_type_id: DictionaryItemId,
    pub category_id: DictionaryItemId,
    pub subcategory_id: DictionaryItemId,
    /// The amount of money moved, exact to two fractional digits.
    ///
    /// The sign is not constrained.
    pub amount: Decimal,
    /// Free-form note, may be empty.
    pub comment: String,
    /// When the transaction was first recorded (UTC). Set once.
    pub created_at: OffsetDateTime,
    /// When the transaction was last modified (UTC). Refreshed on every write.
    pub updated_at: OffsetDateTime,
}

/// The caller-supplied fields of a transaction, used for create and full
/// replace on update.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionData {
    pub date: Date,
    pub status_id: DictionaryItemId,
    pub transaction_type_id: DictionaryItemId,
    pub category_id: DictionaryItemId,
    pub subcategory_id: DictionaryItemId,
    pub amount: Decimal,
    pub comment: String,
}

impl TransactionData {
    fn hierarchy_selection(&self) -> HierarchySelection {
        HierarchySelection {
            transaction_type_id: Some(self.transaction_type_id),
            category_id: Some(self.category_id),
            subcategory_id: Some(self.subcategory_id),
        }
    }
}

/// Create a new transaction in the database.
///
/// The amount is rounded to two fractional digits. The hierarchy is
/// re-checked here so a row can never be committed with a category outside
/// its transaction type or a subcategory outside its category, even if the
/// form boundary was bypassed.
///
/// # Errors
/// This function will return a:
/// - [Error::InconsistentHierarchy] if the selected category or subcategory
///   does not belong to its selected owner,
/// - or [Error::InvalidReference] if a referenced dictionary item does not
///   exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    data: TransactionData,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let violations = check_hierarchy(&data.hierarchy_selection(), connection)?;

    if !violations.is_empty() {
        return Err(Error::InconsistentHierarchy(join_violations(&violations)));
    }

    let amount = data.amount.round_dp(2);
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\"
             (date, status_id, transaction_type_id, category_id, subcategory_id, amount, comment, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING id, date, status_id, transaction_type_id, category_id, subcategory_id, amount, comment, created_at, updated_at",
        )?
        .query_row(
            (
                data.date,
                data.status_id,
                data.transaction_type_id,
                data.category_id,
                data.subcategory_id,
                amount.to_string(),
                data.comment,
                now,
                now,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidReference,
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, date, status_id, transaction_type_id, category_id, subcategory_id, amount, comment, created_at, updated_at
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Replace all caller-supplied fields of a transaction and refresh its
/// `updated_at` timestamp. `created_at` is left untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid
///   transaction,
/// - or [Error::InconsistentHierarchy] if the selected category or
///   subcategory does not belong to its selected owner,
/// - or [Error::InvalidReference] if a referenced dictionary item does not
///   exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    data: TransactionData,
    connection: &Connection,
) -> Result<(), Error> {
    let violations = check_hierarchy(&data.hierarchy_selection(), connection)?;

    if !violations.is_empty() {
        return Err(Error::InconsistentHierarchy(join_violations(&violations)));
    }

    let amount = data.amount.round_dp(2);

    let rows_affected = connection
        .execute(
            "UPDATE \"transaction\"
             SET date = ?1, status_id = ?2, transaction_type_id = ?3, category_id = ?4,
                 subcategory_id = ?5, amount = ?6, comment = ?7, updated_at = ?8
             WHERE id = ?9",
            (
                data.date,
                data.status_id,
                data.transaction_type_id,
                data.category_id,
                data.subcategory_id,
                amount.to_string(),
                data.comment,
                OffsetDateTime::now_utc(),
                id,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidReference,
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid
///   transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                status_id INTEGER NOT NULL,
                transaction_type_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                subcategory_id INTEGER NOT NULL,
                amount TEXT NOT NULL,
                comment TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(status_id) REFERENCES status(id) ON UPDATE CASCADE ON DELETE RESTRICT,
                FOREIGN KEY(transaction_type_id) REFERENCES transaction_type(id) ON UPDATE CASCADE ON DELETE RESTRICT,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT,
                FOREIGN KEY(subcategory_id) REFERENCES subcategory(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index matching the listing page's default ordering.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_created
         ON \"transaction\"(date, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_amount: String = row.get(6)?;
    let amount = Decimal::from_str(&raw_amount).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        status_id: row.get(2)?,
        transaction_type_id: row.get(3)?,
        category_id: row.get(4)?,
        subcategory_id: row.get(5)?,
        amount,
        comment: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn join_violations(violations: &[crate::validation::Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            TransactionData, create_transaction, delete_transaction, get_transaction,
            test_utils::seed_hierarchy, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn create_succeeds_and_rounds_amount() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);

        let transaction = create_transaction(
            TransactionData {
                date: date!(2026 - 01 - 15),
                status_id: hierarchy.status.id,
                transaction_type_id: hierarchy.transaction_type.id,
                category_id: hierarchy.category.id,
                subcategory_id: hierarchy.subcategory.id,
                amount: dec!(1000.239),
                comment: "Реклама на Avito".to_owned(),
            },
            &connection,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.amount, dec!(1000.24));
        assert_eq!(transaction.created_at, transaction.updated_at);
        assert_eq!(Ok(transaction.clone()), get_transaction(transaction.id, &connection));
    }

    #[test]
    fn create_fails_on_category_of_other_type() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);

        let result = create_transaction(
            TransactionData {
                date: date!(2026 - 01 - 15),
                status_id: hierarchy.status.id,
                transaction_type_id: hierarchy.other_type.id,
                category_id: hierarchy.category.id,
                subcategory_id: hierarchy.subcategory.id,
                amount: dec!(1000.00),
                comment: String::new(),
            },
            &connection,
        );

        assert!(
            matches!(result, Err(Error::InconsistentHierarchy(_))),
            "want InconsistentHierarchy, got {result:?}"
        );
    }

    #[test]
    fn create_fails_on_dangling_status() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);

        let result = create_transaction(
            TransactionData {
                date: date!(2026 - 01 - 15),
                status_id: 999999,
                transaction_type_id: hierarchy.transaction_type.id,
                category_id: hierarchy.category.id,
                subcategory_id: hierarchy.subcategory.id,
                amount: dec!(1000.00),
                comment: String::new(),
            },
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidReference));
    }

    #[test]
    fn update_replaces_fields_and_keeps_created_at() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);
        let transaction = create_transaction(
            TransactionData {
                date: date!(2026 - 01 - 15),
                status_id: hierarchy.status.id,
                transaction_type_id: hierarchy.transaction_type.id,
                category_id: hierarchy.category.id,
                subcategory_id: hierarchy.subcategory.id,
                amount: dec!(1000.00),
                comment: String::new(),
            },
            &connection,
        )
        .expect("Could not create transaction");

        update_transaction(
            transaction.id,
            TransactionData {
                date: date!(2026 - 02 - 01),
                status_id: hierarchy.status.id,
                transaction_type_id: hierarchy.transaction_type.id,
                category_id: hierarchy.category.id,
                subcategory_id: hierarchy.subcategory.id,
                amount: dec!(2500.50),
                comment: "Продление кампании".to_owned(),
            },
            &connection,
        )
        .expect("Could not update transaction");

        let updated =
            get_transaction(transaction.id, &connection).expect("Could not get transaction");
        assert_eq!(updated.date, date!(2026 - 02 - 01));
        assert_eq!(updated.amount, dec!(2500.50));
        assert_eq!(updated.comment, "Продление кампании");
        assert_eq!(updated.created_at, transaction.created_at);
    }

    #[test]
    fn update_fails_on_missing_transaction() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);

        let result = update_transaction(
            999999,
            TransactionData {
                date: date!(2026 - 01 - 15),
                status_id: hierarchy.status.id,
                transaction_type_id: hierarchy.transaction_type.id,
                category_id: hierarchy.category.id,
                subcategory_id: hierarchy.subcategory.id,
                amount: dec!(1.00),
                comment: String::new(),
            },
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_succeeds() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);
        let transaction = create_transaction(
            TransactionData {
                date: date!(2026 - 01 - 15),
                status_id: hierarchy.status.id,
                transaction_type_id: hierarchy.transaction_type.id,
                category_id: hierarchy.category.id,
                subcategory_id: hierarchy.subcategory.id,
                amount: dec!(1000.00),
                comment: String::new(),
            },
            &connection,
        )
        .expect("Could not create transaction");

        delete_transaction(transaction.id, &connection).expect("Could not delete transaction");

        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_fails_on_missing_transaction() {
        let connection = get_test_connection();

        let result = delete_transaction(999999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }
}
