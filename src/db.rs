//! Database setup shared by the server binary and the tests.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, dictionary::create_dictionary_tables, transaction::create_transaction_table,
};

/// Create the application tables if they do not exist yet.
///
/// Foreign key enforcement is switched on for the connection so that
/// referential integrity (delete protection on transactions, cascades within
/// the dictionary hierarchy) is checked by the store at write time.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_dictionary_tables(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Load the starter dictionaries so that a fresh database is usable right
/// away: three statuses, the two transaction types, and a small expense and
/// income category hierarchy.
///
/// Rows that already exist with the same names are left alone, so running
/// this repeatedly is safe.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn seed_initial_data(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    for name in ["Бизнес", "Личное", "Налог"] {
        transaction.execute("INSERT OR IGNORE INTO status (name) VALUES (?1)", (name,))?;
    }

    let income = seed_transaction_type("Пополнение", &transaction)?;
    let expense = seed_transaction_type("Списание", &transaction)?;

    let infrastructure = seed_category("Инфраструктура", expense, &transaction)?;
    seed_subcategories(&["VPS", "Proxy"], infrastructure, &transaction)?;

    let marketing = seed_category("Маркетинг", expense, &transaction)?;
    seed_subcategories(&["Farpost", "Avito"], marketing, &transaction)?;

    let sales = seed_category("Продажи", income, &transaction)?;
    seed_subcategories(&["Онлайн", "Оффлайн"], sales, &transaction)?;

    transaction.commit()?;

    Ok(())
}

fn seed_transaction_type(name: &str, connection: &Connection) -> Result<i64, Error> {
    connection.execute(
        "INSERT OR IGNORE INTO transaction_type (name) VALUES (?1)",
        (name,),
    )?;

    let id = connection.query_one(
        "SELECT id FROM transaction_type WHERE name = ?1",
        (name,),
        |row| row.get(0),
    )?;

    Ok(id)
}

fn seed_category(
    name: &str,
    transaction_type_id: i64,
    connection: &Connection,
) -> Result<i64, Error> {
    connection.execute(
        "INSERT OR IGNORE INTO category (name, transaction_type_id) VALUES (?1, ?2)",
        (name, transaction_type_id),
    )?;

    let id = connection.query_one(
        "SELECT id FROM category WHERE name = ?1 AND transaction_type_id = ?2",
        (name, transaction_type_id),
        |row| row.get(0),
    )?;

    Ok(id)
}

fn seed_subcategories(
    names: &[&str],
    category_id: i64,
    connection: &Connection,
) -> Result<(), Error> {
    for name in names {
        connection.execute(
            "INSERT OR IGNORE INTO subcategory (name, category_id) VALUES (?1, ?2)",
            (name, category_id),
        )?;
    }

    Ok(())
}
