use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::category::NewCategory;
use crate::domain::types::{CategoryDescription, CategoryName, TypeConstraintError};
use crate::forms::{blank_to_none, require_text};

fn default_active() -> bool {
    true
}

fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    require_text(name, "Category name is required")
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /api/category`. Any `id` sent by the client is ignored.
pub struct CategoryForm {
    #[serde(default)]
    #[validate(
        custom(function = "validate_category_name"),
        length(max = 200, message = "Category name cannot exceed 200 characters")
    )]
    pub name: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl CategoryForm {
    /// Converts a validated form into a domain value.
    pub fn into_new_category(self) -> Result<NewCategory, TypeConstraintError> {
        let description = blank_to_none(self.description)
            .map(CategoryDescription::new)
            .transpose()?;

        Ok(NewCategory::new(
            CategoryName::new(self.name)?,
            description,
            self.is_active,
        ))
    }
}
