use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryDescription, CategoryId, CategoryName};

/// Product grouping. Categories are only ever created, never edited.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: Option<CategoryDescription>,
    pub is_active: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub description: Option<CategoryDescription>,
    pub is_active: bool,
}

impl NewCategory {
    #[must_use]
    pub fn new(
        name: CategoryName,
        description: Option<CategoryDescription>,
        is_active: bool,
    ) -> Self {
        Self {
            name,
            description,
            is_active,
        }
    }
}
