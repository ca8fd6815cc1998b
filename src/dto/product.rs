use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::dto::category::CategoryDto;
use crate::pagination::DEFAULT_PAGE_SIZE;

/// JSON shape of a product, with its category embedded when loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub category_id: i32,
    pub category: Option<CategoryDto>,
    pub stock_quantity: i32,
    pub created_date: NaiveDateTime,
    pub is_active: bool,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.get(),
            name: product.name.as_str().to_string(),
            description: product
                .description
                .as_ref()
                .map(|description| description.as_str().to_string()),
            price: product.price.get(),
            category_id: product.category_id.get(),
            category: product.category.as_ref().map(CategoryDto::from),
            stock_quantity: product.stock_quantity.get(),
            created_date: product.created_date,
            is_active: product.is_active,
        }
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self::from(&product)
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Query parameters of `GET /api/product`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ProductListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Query parameters of `GET /api/product/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchParams {
    pub search_term: Option<String>,
    pub category_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ProductSearchParams {
    fn default() -> Self {
        Self {
            search_term: None,
            category_id: None,
            min_price: None,
            max_price: None,
            in_stock: None,
            sort_by: None,
            sort_order: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}
