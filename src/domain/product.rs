use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::{
    CategoryId, Price, ProductDescription, ProductId, ProductName, StockQuantity,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub price: Price,
    pub category_id: CategoryId,
    /// Owning category when it was loaded alongside the product.
    pub category: Option<Category>,
    pub stock_quantity: StockQuantity,
    pub created_date: NaiveDateTime,
    /// `false` once the product has been soft-deleted.
    pub is_active: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub price: Price,
    pub category_id: CategoryId,
    pub stock_quantity: StockQuantity,
}

impl NewProduct {
    #[must_use]
    pub fn new(
        name: ProductName,
        description: Option<ProductDescription>,
        price: Price,
        category_id: CategoryId,
        stock_quantity: StockQuantity,
    ) -> Self {
        Self {
            name,
            description,
            price,
            category_id,
            stock_quantity,
        }
    }
}

/// Mutable product fields. The creation date and active flag are never touched
/// by an update.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UpdateProduct {
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub price: Price,
    pub category_id: CategoryId,
    pub stock_quantity: StockQuantity,
}

impl UpdateProduct {
    #[must_use]
    pub fn new(
        name: ProductName,
        description: Option<ProductDescription>,
        price: Price,
        category_id: CategoryId,
        stock_quantity: StockQuantity,
    ) -> Self {
        Self {
            name,
            description,
            price,
            category_id,
            stock_quantity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductSortField {
    Name,
    Price,
    CreatedDate,
    StockQuantity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ordering applied to a product search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductSort {
    pub field: ProductSortField,
    pub direction: SortDirection,
}

impl Default for ProductSort {
    /// Newest products first.
    fn default() -> Self {
        Self {
            field: ProductSortField::CreatedDate,
            direction: SortDirection::Desc,
        }
    }
}

impl ProductSort {
    pub fn new(field: ProductSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Interprets the raw `sortBy`/`sortOrder` request values.
    ///
    /// Both are matched case-insensitively. An unknown or missing field falls
    /// back to [`ProductSort::default`] regardless of the requested order;
    /// for a known field only `desc` selects descending order.
    pub fn from_params(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        let Some(field) = sort_by.and_then(ProductSortField::parse) else {
            return Self::default();
        };

        let direction = match sort_order {
            Some(order) if order.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };

        Self { field, direction }
    }
}

impl ProductSortField {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "createddate" => Some(Self::CreatedDate),
            "stockquantity" => Some(Self::StockQuantity),
            _ => None,
        }
    }
}

impl Display for ProductSortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductSortField::Name => write!(f, "name"),
            ProductSortField::Price => write!(f, "price"),
            ProductSortField::CreatedDate => write!(f, "createdDate"),
            ProductSortField::StockQuantity => write!(f, "stockQuantity"),
        }
    }
}
