//! Transfer objects exchanged with API clients and their mapping from domain
//! entities.

pub mod category;
pub mod product;
