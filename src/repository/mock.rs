//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::category::{Category, NewCategory};
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::types::{CategoryId, ProductId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CategoryReader, CategoryWriter, ProductReader, ProductSearchQuery, ProductWriter,
};

mock! {
    pub Repository {}

    impl CategoryReader for Repository {
        fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
        fn category_exists(&self, id: CategoryId) -> RepositoryResult<bool>;
    }

    impl CategoryWriter for Repository {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
        fn get_stored_product(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
        fn search_products(
            &self,
            query: &ProductSearchQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(
            &self,
            id: ProductId,
            updates: &UpdateProduct,
        ) -> RepositoryResult<Option<Product>>;
        fn deactivate_product(&self, id: ProductId) -> RepositoryResult<bool>;
    }
}
