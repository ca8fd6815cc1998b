//! Domain aggregates exposed by the catalog service layer.

pub mod category;
pub mod product;
pub mod types;
