//! Repository implementation for product categories.

use diesel::prelude::*;

use crate::{
    domain::{
        category::{Category, NewCategory},
        types::CategoryId,
    },
    models::category::{Category as DbCategory, NewCategory as DbNewCategory},
    repository::{
        CategoryReader, CategoryWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category = categories::table
            .find(id.get())
            .select(DbCategory::as_select())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        db_category
            .map(|category| Category::try_from(category).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        categories::table
            .order(categories::id.asc())
            .select(DbCategory::as_select())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(|category| Category::try_from(category).map_err(RepositoryError::from))
            .collect()
    }

    fn category_exists(&self, id: CategoryId) -> RepositoryResult<bool> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(
            categories::table.filter(categories::id.eq(id.get())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let insertable: DbNewCategory = new_category.into();

        let db_category = diesel::insert_into(categories::table)
            .values(&insertable)
            .returning(DbCategory::as_returning())
            .get_result::<DbCategory>(&mut conn)?;

        Category::try_from(db_category).map_err(RepositoryError::from)
    }
}
