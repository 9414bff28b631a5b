//! Category registry.
//!
//! Categories are process-wide configuration: loaded once, never mutated.
//! Declaration order is kept because it drives the order of summary
//! breakdowns and of the category keyboard.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// How a category is budgeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Shares the weekday/weekend daily pool.
    Daily,
    /// Has its own fixed monthly cap.
    Monthly,
    /// Uncapped, tracked for information only.
    Other,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Builds the registry, rejecting empty or duplicated names.
    ///
    /// Names are case-sensitive: `Meals` and `meals` are two categories.
    /// Chat input is trimmed and `/...` is read as a command, so names with
    /// surrounding whitespace or a leading `/` are rejected too.
    pub fn new(categories: Vec<Category>) -> ResultEngine<Self> {
        let mut seen = HashSet::new();
        for category in &categories {
            let name = category.name.as_str();
            if name.trim().is_empty() {
                return Err(EngineError::InvalidConfig(
                    "category name must not be empty".to_string(),
                ));
            }
            if name.trim() != name {
                return Err(EngineError::InvalidConfig(format!(
                    "category \"{name}\" has leading or trailing whitespace"
                )));
            }
            if name.starts_with('/') {
                return Err(EngineError::InvalidConfig(format!(
                    "category \"{name}\" must not start with '/'"
                )));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(EngineError::InvalidConfig(format!(
                    "category \"{}\" declared twice",
                    category.name
                )));
            }
        }
        Ok(Self { categories })
    }

    pub fn kind_of(&self, name: &str) -> ResultEngine<CategoryKind> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.kind)
            .ok_or_else(|| EngineError::UnknownCategory(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    pub fn categories_of_kind(&self, kind: CategoryKind) -> Vec<String> {
        self.categories
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn all_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    /// Category names grouped in rows of `per_row`, for selection menus.
    pub fn rows(&self, per_row: usize) -> Vec<Vec<String>> {
        self.all_names()
            .chunks(per_row.max(1))
            .map(<[String]>::to_vec)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CategoryRegistry {
        CategoryRegistry::new(vec![
            Category::new("Meals", CategoryKind::Daily),
            Category::new("Groceries", CategoryKind::Monthly),
            Category::new("Transport", CategoryKind::Daily),
            Category::new("Gifts", CategoryKind::Other),
            Category::new("Rent", CategoryKind::Monthly),
        ])
        .unwrap()
    }

    #[test]
    fn kind_lookup_is_case_sensitive() {
        let registry = registry();
        assert_eq!(registry.kind_of("Meals").unwrap(), CategoryKind::Daily);
        assert_eq!(
            registry.kind_of("meals"),
            Err(EngineError::UnknownCategory("meals".to_string()))
        );
    }

    #[test]
    fn kinds_keep_declaration_order() {
        let registry = registry();
        assert_eq!(
            registry.categories_of_kind(CategoryKind::Daily),
            vec!["Meals", "Transport"]
        );
        assert_eq!(
            registry.categories_of_kind(CategoryKind::Monthly),
            vec!["Groceries", "Rent"]
        );
        assert!(
            CategoryRegistry::new(vec![])
                .unwrap()
                .categories_of_kind(CategoryKind::Other)
                .is_empty()
        );
    }

    #[test]
    fn rows_of_three() {
        let rows = registry().rows(3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Meals", "Groceries", "Transport"]);
        assert_eq!(rows[1], vec!["Gifts", "Rent"]);
    }

    #[test]
    #[should_panic(expected = "InvalidConfig(\"category \\\"Meals\\\" declared twice\")")]
    fn fail_duplicate_category() {
        CategoryRegistry::new(vec![
            Category::new("Meals", CategoryKind::Daily),
            Category::new("Meals", CategoryKind::Other),
        ])
        .unwrap();
    }

    #[test]
    fn rejects_names_chat_input_cannot_select() {
        for name in [" Meals", "Meals ", "\tRent", "/add", ""] {
            let err = CategoryRegistry::new(vec![Category::new(name, CategoryKind::Daily)])
                .unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfig(_)), "{name:?}");
        }
        assert!(CategoryRegistry::new(vec![Category::new("Eating out", CategoryKind::Daily)]).is_ok());
    }
}
