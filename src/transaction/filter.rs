//! Filtered, ordered listing of transactions.
//!
//! The filter is deserialized straight from the listing page's query string.
//! Absent parameters are identity predicates, present ones are combined with
//! AND, so any subset may be applied in any order with the same result.

use std::str::FromStr;

use rusqlite::{Connection, Row, ToSql, params_from_iter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, dictionary::DictionaryItemId, transaction::TransactionId};

/// The optional predicates of the transactions listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Inclusive lower bound on the transaction date.
    #[serde(default)]
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the transaction date.
    #[serde(default)]
    pub date_to: Option<Date>,
    #[serde(default)]
    pub status: Option<DictionaryItemId>,
    #[serde(default)]
    pub transaction_type: Option<DictionaryItemId>,
    #[serde(default)]
    pub category: Option<DictionaryItemId>,
    #[serde(default)]
    pub subcategory: Option<DictionaryItemId>,
}

impl TransactionFilter {
    /// Build the WHERE conditions and their parameters, in matching order.
    fn predicates(&self) -> (Vec<&'static str>, Vec<Box<dyn ToSql>>) {
        let mut conditions: Vec<&'static str> = Vec::new();
        let mut parameters: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(date_from) = self.date_from {
            conditions.push("t.date >= ?");
            parameters.push(Box::new(date_from));
        }

        if let Some(date_to) = self.date_to {
            conditions.push("t.date <= ?");
            parameters.push(Box::new(date_to));
        }

        if let Some(status) = self.status {
            conditions.push("t.status_id = ?");
            parameters.push(Box::new(status));
        }

        if let Some(transaction_type) = self.transaction_type {
            conditions.push("t.transaction_type_id = ?");
            parameters.push(Box::new(transaction_type));
        }

        if let Some(category) = self.category {
            conditions.push("t.category_id = ?");
            parameters.push(Box::new(category));
        }

        if let Some(subcategory) = self.subcategory {
            conditions.push("t.subcategory_id = ?");
            parameters.push(Box::new(subcategory));
        }

        (conditions, parameters)
    }
}

/// A transaction row joined with its four dictionary names for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListRow {
    pub id: TransactionId,
    pub date: Date,
    pub status_name: String,
    pub transaction_type_name: String,
    pub category_name: String,
    pub subcategory_name: String,
    pub amount: Decimal,
    pub comment: String,
}

/// Retrieve the transactions matching `filter`, newest first.
///
/// Ordering is date, then creation time, then id, all descending; the id is
/// the stable tie-break for rows created within the same timestamp
/// resolution. Filter ids that match nothing yield an empty list, not an
/// error.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<TransactionListRow>, Error> {
    let (conditions, parameters) = filter.predicates();

    let mut sql = String::from(
        "SELECT t.id, t.date, status.name, transaction_type.name, category.name, subcategory.name,
                t.amount, t.comment
         FROM \"transaction\" t
         JOIN status ON status.id = t.status_id
         JOIN transaction_type ON transaction_type.id = t.transaction_type_id
         JOIN category ON category.id = t.category_id
         JOIN subcategory ON subcategory.id = t.subcategory_id",
    );

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(" ORDER BY t.date DESC, t.created_at DESC, t.id DESC");

    connection
        .prepare(&sql)?
        .query_map(params_from_iter(parameters), map_list_row)?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

fn map_list_row(row: &Row) -> Result<TransactionListRow, rusqlite::Error> {
    let raw_amount: String = row.get(6)?;
    let amount = Decimal::from_str(&raw_amount).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(TransactionListRow {
        id: row.get(0)?,
        date: row.get(1)?,
        status_name: row.get(2)?,
        transaction_type_name: row.get(3)?,
        category_name: row.get(4)?,
        subcategory_name: row.get(5)?,
        amount,
        comment: row.get(7)?,
    })
}

#[cfg(test)]
mod list_transactions_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, macros::date};

    use crate::{
        db::initialize,
        transaction::{
            TransactionData, create_transaction,
            test_utils::{Hierarchy, seed_hierarchy},
        },
    };

    use super::{TransactionFilter, list_transactions};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn must_create(
        hierarchy: &Hierarchy,
        transaction_date: Date,
        amount: Decimal,
        connection: &Connection,
    ) -> i64 {
        create_transaction(
            TransactionData {
                date: transaction_date,
                status_id: hierarchy.status.id,
                transaction_type_id: hierarchy.transaction_type.id,
                category_id: hierarchy.category.id,
                subcategory_id: hierarchy.subcategory.id,
                amount,
                comment: String::new(),
            },
            connection,
        )
        .expect("Could not create test transaction")
        .id
    }

    #[test]
    fn unfiltered_list_is_newest_first_with_id_tie_break() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);
        let oldest = must_create(&hierarchy, date!(2026 - 01 - 10), dec!(1.00), &connection);
        let same_day_first = must_create(&hierarchy, date!(2026 - 01 - 20), dec!(2.00), &connection);
        let same_day_second = must_create(&hierarchy, date!(2026 - 01 - 20), dec!(3.00), &connection);

        let rows = list_transactions(&TransactionFilter::default(), &connection)
            .expect("Could not list transactions");

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![same_day_second, same_day_first, oldest]);
    }

    #[test]
    fn filters_combine_conjunctively() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);
        must_create(&hierarchy, date!(2026 - 01 - 10), dec!(1.00), &connection);
        let in_range = must_create(&hierarchy, date!(2026 - 01 - 20), dec!(2.00), &connection);
        must_create(&hierarchy, date!(2026 - 02 - 05), dec!(3.00), &connection);

        let filter = TransactionFilter {
            date_from: Some(date!(2026 - 01 - 15)),
            date_to: Some(date!(2026 - 01 - 31)),
            status: Some(hierarchy.status.id),
            ..Default::default()
        };

        let rows = list_transactions(&filter, &connection).expect("Could not list transactions");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, in_range);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);
        let on_lower_bound = must_create(&hierarchy, date!(2026 - 01 - 15), dec!(1.00), &connection);

        let filter = TransactionFilter {
            date_from: Some(date!(2026 - 01 - 15)),
            date_to: Some(date!(2026 - 01 - 15)),
            ..Default::default()
        };

        let rows = list_transactions(&filter, &connection).expect("Could not list transactions");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, on_lower_bound);
    }

    #[test]
    fn unknown_filter_id_yields_empty_list() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);
        must_create(&hierarchy, date!(2026 - 01 - 10), dec!(1.00), &connection);

        let filter = TransactionFilter {
            category: Some(999999),
            ..Default::default()
        };

        let rows = list_transactions(&filter, &connection).expect("Could not list transactions");

        assert!(rows.is_empty());
    }

    #[test]
    fn rows_carry_dictionary_names() {
        let connection = get_test_connection();
        let hierarchy = seed_hierarchy(&connection);
        must_create(&hierarchy, date!(2026 - 01 - 10), dec!(1000.00), &connection);

        let rows = list_transactions(&TransactionFilter::default(), &connection)
            .expect("Could not list transactions");

        assert_eq!(rows[0].status_name, "Бизнес");
        assert_eq!(rows[0].transaction_type_name, "Списание");
        assert_eq!(rows[0].category_name, "Маркетинг");
        assert_eq!(rows[0].subcategory_name, "Avito");
        assert_eq!(rows[0].amount, dec!(1000.00));
    }
}
