use validator::Validate;

use crate::domain::types::CategoryId;
use crate::dto::category::CategoryDto;
use crate::forms::category::CategoryForm;
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult};

/// Lists every category, active or not, ordered by id.
pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader + ?Sized,
{
    let categories = repo.list_categories().map_err(ServiceError::from)?;
    Ok(categories.iter().map(CategoryDto::from).collect())
}

/// Fetches a category; `None` when the id is unknown.
pub fn get_category<R>(repo: &R, id: i32) -> ServiceResult<Option<CategoryDto>>
where
    R: CategoryReader + ?Sized,
{
    let Ok(id) = CategoryId::new(id) else {
        return Ok(None);
    };

    let category = repo.get_category_by_id(id).map_err(ServiceError::from)?;
    Ok(category.as_ref().map(CategoryDto::from))
}

/// Validates the form and stores a new category.
pub fn create_category<R>(repo: &R, form: CategoryForm) -> ServiceResult<CategoryDto>
where
    R: CategoryWriter + ?Sized,
{
    form.validate()?;

    let new_category = form.into_new_category()?;
    let category = repo
        .create_category(&new_category)
        .map_err(ServiceError::from)?;

    log::info!("Created category {}", category.id);
    Ok(CategoryDto::from(&category))
}
