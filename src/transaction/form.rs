//! The form fields shared by the transaction creation and editing pages.

use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    dictionary::{
        EntryOption,
        db::{
            get_all_categories, get_all_statuses, get_all_subcategories,
            get_all_transaction_types,
        },
    },
    html::{FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, select_field},
    validation::Violation,
};

/// The options for the four dictionary selects, each ordered by name.
#[derive(Debug, Clone, Default)]
pub struct DictionaryOptions {
    pub statuses: Vec<EntryOption>,
    pub transaction_types: Vec<EntryOption>,
    pub categories: Vec<EntryOption>,
    pub subcategories: Vec<EntryOption>,
}

impl DictionaryOptions {
    /// Load all four option lists.
    ///
    /// The full category and subcategory lists are rendered so an edited
    /// transaction's current selection is always present; the cascading
    /// lookup endpoints narrow them client-side.
    pub fn load(connection: &Connection) -> Result<Self, Error> {
        Ok(Self {
            statuses: get_all_statuses(connection)?,
            transaction_types: get_all_transaction_types(connection)?,
            categories: get_all_categories(connection)?,
            subcategories: get_all_subcategories(connection)?,
        })
    }
}

/// The values the form fields are pre-filled with.
pub struct TransactionFormDefaults<'a> {
    pub date: Date,
    pub status_id: Option<i64>,
    pub transaction_type_id: Option<i64>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub comment: &'a str,
}

/// Render the transaction form fields with any hierarchy violations shown
/// under the field they concern.
pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    options: &DictionaryOptions,
    violations: &[Violation],
) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        (select_field(
            "Status",
            "status_id",
            &options.statuses,
            defaults.status_id,
            "Select status",
            true,
        ))

        (select_field(
            "Transaction Type",
            "transaction_type_id",
            &options.transaction_types,
            defaults.transaction_type_id,
            "Select transaction type",
            true,
        ))
        (field_violation_message(violations, "transaction type"))

        (select_field(
            "Category",
            "category_id",
            &options.categories,
            defaults.category_id,
            "Select category",
            true,
        ))
        (field_violation_message(violations, "category"))

        (select_field(
            "Subcategory",
            "subcategory_id",
            &options.subcategories,
            defaults.subcategory_id,
            "Select subcategory",
            true,
        ))
        (field_violation_message(violations, "subcategory"))

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                placeholder="0.00"
                value=[amount_str.as_deref()]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="comment"
                class=(FORM_LABEL_STYLE)
            {
                "Comment"
            }

            input
                name="comment"
                id="comment"
                type="text"
                placeholder="Comment"
                value=(defaults.comment)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn field_violation_message(violations: &[Violation], field: &str) -> Markup {
    html! {
        @for violation in violations {
            @if violation.field == field {
                p class=(FORM_ERROR_STYLE)
                {
                    (violation)
                }
            }
        }
    }
}
