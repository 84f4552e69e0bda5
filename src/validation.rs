//! Cross-field consistency checks for the dictionary hierarchy.
//!
//! A transaction's category must belong to its transaction type and its
//! subcategory to its category. The same check runs at the form boundary,
//! where violations re-render the form, and again in the transaction db layer
//! immediately before a write, where a violation is an integrity error.

use rusqlite::{Connection, OptionalExtension};

use crate::{Error, dictionary::DictionaryItemId};

/// The dictionary references picked by a caller, any of which may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchySelection {
    pub transaction_type_id: Option<DictionaryItemId>,
    pub category_id: Option<DictionaryItemId>,
    pub subcategory_id: Option<DictionaryItemId>,
}

/// Why a selection was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The category does not belong to the selected transaction type.
    InconsistentCategoryType,
    /// The subcategory does not belong to the selected category.
    InconsistentSubcategoryCategory,
    /// The referenced dictionary item does not exist.
    DanglingReference,
}

/// A single rejected field and the reason it was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// The form field the violation should be reported against.
    pub field: &'static str,
    pub kind: ViolationKind,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ViolationKind::InconsistentCategoryType => write!(
                f,
                "The selected category does not belong to the selected transaction type."
            ),
            ViolationKind::InconsistentSubcategoryCategory => write!(
                f,
                "The selected subcategory does not belong to the selected category."
            ),
            ViolationKind::DanglingReference => {
                write!(f, "The selected {} no longer exists.", self.field)
            }
        }
    }
}

/// Check that the selected references exist and form a consistent chain.
///
/// An empty result means the selection is consistent. Absent fields are
/// skipped, so partial selections (e.g. only a category) never fail the
/// pairwise rules.
///
/// # Errors
/// Returns an [Error::SqlError] if one of the lookups fails.
pub fn check_hierarchy(
    selection: &HierarchySelection,
    connection: &Connection,
) -> Result<Vec<Violation>, Error> {
    let mut violations = Vec::new();

    if let Some(transaction_type_id) = selection.transaction_type_id {
        let exists: Option<DictionaryItemId> = connection
            .query_row(
                "SELECT id FROM transaction_type WHERE id = ?1",
                [transaction_type_id],
                |row| row.get(0),
            )
            .optional()?;

        if exists.is_none() {
            violations.push(Violation {
                field: "transaction type",
                kind: ViolationKind::DanglingReference,
            });
        }
    }

    if let Some(category_id) = selection.category_id {
        let owning_type: Option<DictionaryItemId> = connection
            .query_row(
                "SELECT transaction_type_id FROM category WHERE id = ?1",
                [category_id],
                |row| row.get(0),
            )
            .optional()?;

        match owning_type {
            None => violations.push(Violation {
                field: "category",
                kind: ViolationKind::DanglingReference,
            }),
            Some(owning_type) => {
                if selection
                    .transaction_type_id
                    .is_some_and(|transaction_type_id| transaction_type_id != owning_type)
                {
                    violations.push(Violation {
                        field: "category",
                        kind: ViolationKind::InconsistentCategoryType,
                    });
                }
            }
        }
    }

    if let Some(subcategory_id) = selection.subcategory_id {
        let owning_category: Option<DictionaryItemId> = connection
            .query_row(
                "SELECT category_id FROM subcategory WHERE id = ?1",
                [subcategory_id],
                |row| row.get(0),
            )
            .optional()?;

        match owning_category {
            None => violations.push(Violation {
                field: "subcategory",
                kind: ViolationKind::DanglingReference,
            }),
            Some(owning_category) => {
                if selection
                    .category_id
                    .is_some_and(|category_id| category_id != owning_category)
                {
                    violations.push(Violation {
                        field: "subcategory",
                        kind: ViolationKind::InconsistentSubcategoryCategory,
                    });
                }
            }
        }
    }

    Ok(violations)
}
