//! Core dictionary domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The four reference dictionaries that classify a transaction.
///
/// Routing uses the kind's slug as a path parameter; an unrecognized slug is
/// not an error but redirects to the dictionaries overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionaryKind {
    Status,
    TransactionType,
    Category,
    Subcategory,
}

impl DictionaryKind {
    /// All kinds in the order they appear on the overview page.
    pub const ALL: [DictionaryKind; 4] = [
        DictionaryKind::Status,
        DictionaryKind::TransactionType,
        DictionaryKind::Category,
        DictionaryKind::Subcategory,
    ];

    /// Parse a URL slug into a kind. Returns `None` for unknown slugs.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "statuses" => Some(DictionaryKind::Status),
            "transaction-types" => Some(DictionaryKind::TransactionType),
            "categories" => Some(DictionaryKind::Category),
            "subcategories" => Some(DictionaryKind::Subcategory),
            _ => None,
        }
    }

    /// The URL slug identifying the kind.
    pub fn slug(self) -> &'static str {
        match self {
            DictionaryKind::Status => "statuses",
            DictionaryKind::TransactionType => "transaction-types",
            DictionaryKind::Category => "categories",
            DictionaryKind::Subcategory => "subcategories",
        }
    }

    /// The singular display name, e.g. for form titles and alerts.
    pub fn display_name(self) -> &'static str {
        match self {
            DictionaryKind::Status => "Status",
            DictionaryKind::TransactionType => "Transaction Type",
            DictionaryKind::Category => "Category",
            DictionaryKind::Subcategory => "Subcategory",
        }
    }

    /// The plural display name used for overview section headers.
    pub fn display_name_plural(self) -> &'static str {
        match self {
            DictionaryKind::Status => "Statuses",
            DictionaryKind::TransactionType => "Transaction Types",
            DictionaryKind::Category => "Categories",
            DictionaryKind::Subcategory => "Subcategories",
        }
    }

    /// The kind this kind's items belong to, if any.
    ///
    /// Categories belong to a transaction type and subcategories to a
    /// category; statuses and transaction types stand alone.
    pub fn parent_kind(self) -> Option<DictionaryKind> {
        match self {
            DictionaryKind::Status | DictionaryKind::TransactionType => None,
            DictionaryKind::Category => Some(DictionaryKind::TransactionType),
            DictionaryKind::Subcategory => Some(DictionaryKind::Category),
        }
    }
}

/// A validated, non-empty dictionary item name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct DictionaryName(String);

impl DictionaryName {
    /// Create a dictionary name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyDictionaryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyDictionaryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a dictionary name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for DictionaryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DictionaryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DictionaryName::new(s)
    }
}

impl Display for DictionaryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a dictionary item.
pub type DictionaryItemId = i64;

/// A row of one of the four dictionaries.
///
/// `parent_id` is the owning transaction type for categories and the owning
/// category for subcategories; it is `None` for statuses and transaction
/// types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct DictionaryItem {
    pub id: DictionaryItemId,
    pub name: DictionaryName,
    pub parent_id: Option<DictionaryItemId>,
}

/// An id/name pair used for select options and the JSON lookup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOption {
    pub id: DictionaryItemId,
    pub name: String,
}

/// Form data for dictionary item creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryItemFormData {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<DictionaryItemId>,
}


#[cfg(test)]
mod dictionary_name_tests {
    use crate::{Error, dictionary::DictionaryName};

    #[test]
    fn new_fails_on_empty_string() {
        let name = DictionaryName::new("");

        assert_eq!(name, Err(Error::EmptyDictionaryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let name = DictionaryName::new("\n\t \r");

        assert_eq!(name, Err(Error::EmptyDictionaryName));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let name = DictionaryName::new("Списание");

        assert!(name.is_ok())
    }
}
