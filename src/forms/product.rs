use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::domain::types::{
    CategoryId, Price, ProductDescription, ProductName, StockQuantity, TypeConstraintError,
};
use crate::forms::{blank_to_none, require_text};

fn validate_product_name(name: &str) -> Result<(), ValidationError> {
    require_text(name, "Product name is required")
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let (code, message) = match Price::new(*price) {
        Ok(_) => return Ok(()),
        Err(TypeConstraintError::PriceTooLarge) => {
            ("range", "Price cannot exceed 9999999999999999.99")
        }
        Err(TypeConstraintError::PriceTooPrecise) => {
            ("precision", "Price cannot have more than 2 decimal places")
        }
        Err(_) => ("range", "Price must be greater than 0"),
    };
    Err(ValidationError::new(code).with_message(Cow::Borrowed(message)))
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /api/product` and `PUT /api/product`.
///
/// Missing fields deserialize to defaults so they surface as validation
/// errors instead of a parse failure. `id` is only read on update; read-only
/// fields sent back by clients (`category`, `createdDate`, `isActive`) are
/// ignored.
pub struct ProductForm {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    #[validate(
        custom(function = "validate_product_name"),
        length(max = 300, message = "Product name cannot exceed 300 characters")
    )]
    pub name: String,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 1, message = "Category ID is required"))]
    pub category_id: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock quantity must be 0 or greater"))]
    pub stock_quantity: i32,
}

struct ProductFields {
    name: ProductName,
    description: Option<ProductDescription>,
    price: Price,
    category_id: CategoryId,
    stock_quantity: StockQuantity,
}

impl ProductForm {
    fn fields(self) -> Result<ProductFields, TypeConstraintError> {
        Ok(ProductFields {
            name: ProductName::new(self.name)?,
            description: blank_to_none(self.description)
                .map(ProductDescription::new)
                .transpose()?,
            price: Price::new(self.price)?,
            category_id: CategoryId::new(self.category_id)?,
            stock_quantity: StockQuantity::new(self.stock_quantity)?,
        })
    }

    /// Converts a validated form into a product to insert.
    pub fn into_new_product(self) -> Result<NewProduct, TypeConstraintError> {
        let f = self.fields()?;
        Ok(NewProduct::new(
            f.name,
            f.description,
            f.price,
            f.category_id,
            f.stock_quantity,
        ))
    }

    /// Converts a validated form into the set of overwritten fields.
    pub fn into_update_product(self) -> Result<UpdateProduct, TypeConstraintError> {
        let f = self.fields()?;
        Ok(UpdateProduct::new(
            f.name,
            f.description,
            f.price,
            f.category_id,
            f.stock_quantity,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            id: 0,
            name: "Red shirt".to_string(),
            description: Some("Cotton, size M".to_string()),
            price: Decimal::from_str("10.00").unwrap(),
            category_id: 1,
            stock_quantity: 3,
        }
    }

    #[test]
    fn valid_form_converts_to_domain() {
        let form = valid_form();
        assert!(form.validate().is_ok());

        let new_product = form.into_new_product().unwrap();
        assert_eq!(new_product.name.as_str(), "Red shirt");
        assert_eq!(new_product.price.cents(), 1000);
        assert_eq!(new_product.category_id.get(), 1);
    }

    #[test]
    fn empty_body_reports_every_required_field() {
        let form: ProductForm = serde_json::from_str("{}").unwrap();
        let errors = form.validate().unwrap_err();
        let field_errors = errors.field_errors();

        assert_eq!(field_errors.get("name").unwrap()[0].code, "required");
        assert_eq!(field_errors.get("price").unwrap()[0].code, "range");
        assert_eq!(field_errors.get("category_id").unwrap()[0].code, "range");
        assert!(field_errors.get("stock_quantity").is_none());
    }

    #[test]
    fn negative_stock_and_price_are_rejected() {
        let form = ProductForm {
            price: Decimal::from_str("-1").unwrap(),
            stock_quantity: -5,
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        let field_errors = errors.field_errors();

        assert!(field_errors.contains_key("price"));
        assert!(field_errors.contains_key("stock_quantity"));
        assert!(!field_errors.contains_key("name"));
    }

    #[test]
    fn price_errors_are_reported_on_the_price_field() {
        for (raw, code) in [
            ("0.001", "precision"),
            ("10.005", "precision"),
            ("10000000000000000", "range"),
            ("79228162514264337593543950335", "range"),
        ] {
            let form = ProductForm {
                price: Decimal::from_str(raw).unwrap(),
                ..valid_form()
            };
            let errors = form.validate().unwrap_err();
            let field_errors = errors.field_errors();

            assert_eq!(field_errors.len(), 1, "{raw}");
            assert_eq!(field_errors.get("price").unwrap()[0].code, code, "{raw}");
        }
    }

    #[test]
    fn largest_price_is_accepted() {
        let form = ProductForm {
            price: Decimal::from_str("9999999999999999.99").unwrap(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
        assert_eq!(
            form.into_new_product().unwrap().price.cents(),
            999_999_999_999_999_999
        );
    }

    #[test]
    fn accepts_client_echo_of_read_only_fields() {
        let form: ProductForm = serde_json::from_str(
            r#"{
                "id": 5,
                "name": "Red shirt",
                "price": 15.5,
                "categoryId": 1,
                "category": {"id": 1, "name": "Apparel", "isActive": true},
                "stockQuantity": 2,
                "createdDate": "2025-01-01T00:00:00",
                "isActive": true
            }"#,
        )
        .unwrap();

        assert_eq!(form.id, 5);
        assert!(form.validate().is_ok());
        let update = form.into_update_product().unwrap();
        assert_eq!(update.price.cents(), 1550);
        assert_eq!(update.description, None);
    }
}
