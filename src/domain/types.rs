//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (positive identifiers, bounded
//! trimmed names, strictly positive prices) so that once a value reaches the
//! domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided string is longer than the column allows.
    #[error("value cannot exceed {0} characters")]
    TooLong(usize),
    /// Provided price is zero or negative.
    #[error("price must be greater than zero")]
    NonPositivePrice,
    /// Provided price does not fit the stored precision.
    #[error("price cannot exceed {}", Price::MAX)]
    PriceTooLarge,
    /// Provided price has fractions of a cent.
    #[error("price cannot have more than two decimal places")]
    PriceTooPrecise,
    /// Provided stock quantity is negative.
    #[error("stock quantity must be zero or greater")]
    NegativeStock,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(CategoryId, "Unique identifier for a category.");
id_newtype!(ProductId, "Unique identifier for a product.");

/// Trims `value` and rejects it when empty or longer than `max_len` characters.
fn bounded(value: String, max_len: usize) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    if trimmed.chars().count() > max_len {
        return Err(TypeConstraintError::TooLong(max_len));
    }
    Ok(trimmed.to_string())
}

macro_rules! bounded_string_newtype {
    ($name:ident, $max:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Maximum number of characters accepted.
            pub const MAX_LEN: usize = $max;

            /// Constructs a trimmed, non-empty value within the length limit.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                bounded(value.into(), Self::MAX_LEN).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

bounded_string_newtype!(CategoryName, 200, "Category name, at most 200 characters.");
bounded_string_newtype!(
    CategoryDescription,
    1000,
    "Category description, at most 1000 characters."
);
bounded_string_newtype!(ProductName, 300, "Product name, at most 300 characters.");
bounded_string_newtype!(
    ProductDescription,
    2000,
    "Product description, at most 2000 characters."
);

/// Strictly positive monetary amount with two fractional digits.
///
/// Bounded by [`Price::MAX`], so the amount in cents always fits an `i64`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Largest accepted amount, `9999999999999999.99`.
    pub const MAX: Decimal = Decimal::from_parts(0xA763_FFFF, 0x0DE0_B6B3, 0, false, 2);

    /// Rejects zero or negative amounts, amounts above [`Price::MAX`] and
    /// fractions of a cent.
    pub fn new(value: Decimal) -> Result<Self, TypeConstraintError> {
        if value <= Decimal::ZERO {
            return Err(TypeConstraintError::NonPositivePrice);
        }
        if value > Self::MAX {
            return Err(TypeConstraintError::PriceTooLarge);
        }
        if value.normalize().scale() > 2 {
            return Err(TypeConstraintError::PriceTooPrecise);
        }

        let mut cents = value;
        cents.rescale(2);
        Ok(Self(cents))
    }

    /// Builds a price from an integer amount of cents.
    pub fn from_cents(cents: i64) -> Result<Self, TypeConstraintError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Integer amount of cents, as stored in the database.
    pub fn cents(self) -> i64 {
        // Scale is always 2 and the value is at most `MAX`.
        self.0.mantissa() as i64
    }

    pub const fn get(self) -> Decimal {
        self.0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = TypeConstraintError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// Number of units on hand; never negative.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StockQuantity(i32);

impl StockQuantity {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeStock)
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub const fn in_stock(self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<i32> for StockQuantity {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StockQuantity> for i32 {
    fn from(value: StockQuantity) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert_eq!(CategoryId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ProductId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ProductId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        let name = CategoryName::new("  Tools ").unwrap();
        assert_eq!(name.as_str(), "Tools");

        assert_eq!(
            CategoryName::new("   "),
            Err(TypeConstraintError::EmptyString)
        );
        assert_eq!(
            CategoryName::new("x".repeat(201)),
            Err(TypeConstraintError::TooLong(200))
        );
        assert!(ProductName::new("x".repeat(300)).is_ok());
        assert_eq!(
            ProductName::new("x".repeat(301)),
            Err(TypeConstraintError::TooLong(300))
        );
    }

    #[test]
    fn length_limit_counts_characters_not_bytes() {
        assert!(CategoryName::new("ж".repeat(200)).is_ok());
    }

    #[test]
    fn price_rejects_non_positive_amounts() {
        assert_eq!(
            Price::new(Decimal::ZERO),
            Err(TypeConstraintError::NonPositivePrice)
        );
        assert_eq!(
            Price::new(Decimal::from_str("-1.00").unwrap()),
            Err(TypeConstraintError::NonPositivePrice)
        );
    }

    #[test]
    fn price_rejects_fractions_of_a_cent() {
        assert_eq!(
            Price::new(Decimal::from_str("0.001").unwrap()),
            Err(TypeConstraintError::PriceTooPrecise)
        );
        assert_eq!(
            Price::new(Decimal::from_str("10.005").unwrap()),
            Err(TypeConstraintError::PriceTooPrecise)
        );
        assert_eq!(
            Price::new(Decimal::from_str("10.500").unwrap()).unwrap().cents(),
            1050
        );
    }

    #[test]
    fn price_is_bounded_by_max() {
        assert_eq!(Price::MAX, Decimal::from_str("9999999999999999.99").unwrap());
        assert_eq!(
            Price::new(Price::MAX).unwrap().cents(),
            999_999_999_999_999_999
        );
        assert_eq!(
            Price::new(Decimal::MAX),
            Err(TypeConstraintError::PriceTooLarge)
        );
        assert_eq!(
            Price::new(Decimal::from_str("100000000000000000").unwrap()),
            Err(TypeConstraintError::PriceTooLarge)
        );
        assert_eq!(
            Price::from_cents(i64::MAX),
            Err(TypeConstraintError::PriceTooLarge)
        );
    }

    #[test]
    fn price_converts_to_and_from_cents() {
        let price = Price::new(Decimal::from_str("15.50").unwrap()).unwrap();
        assert_eq!(price.cents(), 1550);
        assert_eq!(Price::from_cents(1550).unwrap(), price);
        assert_eq!(price.to_string(), "15.50");
    }

    #[test]
    fn stock_quantity_is_non_negative() {
        assert_eq!(
            StockQuantity::new(-1),
            Err(TypeConstraintError::NegativeStock)
        );
        assert!(!StockQuantity::new(0).unwrap().in_stock());
        assert!(StockQuantity::new(3).unwrap().in_stock());
    }
}
