use diesel::prelude::*;

use crate::domain::{
    category::{Category as DomainCategory, NewCategory as DomainNewCategory},
    types::{CategoryDescription, CategoryId, CategoryName, TypeConstraintError},
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
/// Diesel model for [`crate::domain::category::Category`].
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::categories)]
/// Insertable form of [`Category`].
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_active: bool,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(category.id)?,
            name: CategoryName::new(category.name)?,
            description: category
                .description
                .map(CategoryDescription::new)
                .transpose()?,
            is_active: category.is_active,
        })
    }
}

impl<'a> From<&'a DomainNewCategory> for NewCategory<'a> {
    fn from(category: &'a DomainNewCategory) -> Self {
        Self {
            name: category.name.as_str(),
            description: category.description.as_ref().map(|d| d.as_str()),
            is_active: category.is_active,
        }
    }
}
