use rust_decimal::Decimal;

use crate::{
    db::{DbConnection, DbPool},
    domain::{
        category::{Category, NewCategory},
        product::{NewProduct, Product, ProductSort, UpdateProduct},
        types::{CategoryId, ProductId},
    },
    repository::errors::RepositoryResult,
};

pub mod category;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod product;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        self.pool.get().map_err(|err| {
            log::error!("Failed to get connection from pool: {err}");
            err.into()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number; `0` is read as the first page.
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of rows to skip.
    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Filters, ordering and paging for a product search.
///
/// Every filter is optional and they combine with AND. Only active products
/// are ever matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSearchQuery {
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub sort: ProductSort,
    pub pagination: Option<Pagination>,
}

impl ProductSearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn min_price(mut self, price: Decimal) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: Decimal) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = Some(in_stock);
        self
    }

    pub fn sort(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    /// Whitespace separated words of the search term; each must match.
    pub fn search_words(&self) -> Vec<&str> {
        self.search
            .as_deref()
            .map(|term| term.split_whitespace().collect())
            .unwrap_or_default()
    }
}

pub trait CategoryReader {
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    fn category_exists(&self, id: CategoryId) -> RepositoryResult<bool>;
}

pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
}

pub trait ProductReader {
    /// Active product with its category, `None` if missing or soft-deleted.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// Raw storage lookup that also returns soft-deleted rows.
    fn get_stored_product(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// Returns the total number of matches and the requested page.
    fn search_products(&self, query: &ProductSearchQuery)
    -> RepositoryResult<(usize, Vec<Product>)>;
}

pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    /// Overwrites an active product, `None` if no active product has `id`.
    fn update_product(
        &self,
        id: ProductId,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Option<Product>>;
    /// Soft-deletes an active product, returning whether a row changed.
    fn deactivate_product(&self, id: ProductId) -> RepositoryResult<bool>;
}
