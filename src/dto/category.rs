use serde::{Deserialize, Serialize};

use crate::domain::category::Category;

/// JSON shape of a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.get(),
            name: category.name.as_str().to_string(),
            description: category
                .description
                .as_ref()
                .map(|description| description.as_str().to_string()),
            is_active: category.is_active,
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self::from(&category)
    }
}
