use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::{
    category::Category as DomainCategory,
    product::{
        NewProduct as DomainNewProduct, Product as DomainProduct,
        UpdateProduct as DomainUpdateProduct,
    },
    types::{
        CategoryId, Price, ProductDescription, ProductId, ProductName, StockQuantity,
        TypeConstraintError,
    },
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
/// Diesel model for [`crate::domain::product::Product`].
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: i32,
    pub stock_quantity: i32,
    pub created_date: NaiveDateTime,
    pub is_active: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
/// Insertable form of [`Product`].
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub category_id: i32,
    pub stock_quantity: i32,
    pub created_date: NaiveDateTime,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Product`] record.
pub struct UpdateProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub category_id: i32,
    pub stock_quantity: i32,
}

impl Product {
    /// Converts the row into a domain product, embedding `category` if given.
    pub fn into_domain(
        self,
        category: Option<DomainCategory>,
    ) -> Result<DomainProduct, TypeConstraintError> {
        Ok(DomainProduct {
            id: ProductId::new(self.id)?,
            name: ProductName::new(self.name)?,
            description: self
                .description
                .map(ProductDescription::new)
                .transpose()?,
            price: Price::from_cents(self.price_cents)?,
            category_id: CategoryId::new(self.category_id)?,
            category,
            stock_quantity: StockQuantity::new(self.stock_quantity)?,
            created_date: self.created_date,
            is_active: self.is_active,
        })
    }
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        product.into_domain(None)
    }
}

impl<'a> NewProduct<'a> {
    /// Builds an active row stamped with `created_date`.
    pub fn from_domain(product: &'a DomainNewProduct, created_date: NaiveDateTime) -> Self {
        Self {
            name: product.name.as_str(),
            description: product.description.as_ref().map(|d| d.as_str()),
            price_cents: product.price.cents(),
            category_id: product.category_id.get(),
            stock_quantity: product.stock_quantity.get(),
            created_date,
            is_active: true,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(product: &'a DomainUpdateProduct) -> Self {
        Self {
            name: product.name.as_str(),
            description: product.description.as_ref().map(|d| d.as_str()),
            price_cents: product.price.cents(),
            category_id: product.category_id.get(),
            stock_quantity: product.stock_quantity.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::types::{CategoryDescription, CategoryName};

    fn sample_domain_new() -> DomainNewProduct {
        DomainNewProduct::new(
            ProductName::new("Red shirt").unwrap(),
            None,
            Price::new(Decimal::from_str("10.00").unwrap()).unwrap(),
            CategoryId::new(2).unwrap(),
            StockQuantity::new(5).unwrap(),
        )
    }

    #[test]
    fn from_domain_new_creates_active_row() {
        let domain = sample_domain_new();
        let now = Utc::now().naive_utc();
        let new = NewProduct::from_domain(&domain, now);
        assert_eq!(new.name, "Red shirt");
        assert_eq!(new.description, None);
        assert_eq!(new.price_cents, 1000);
        assert_eq!(new.category_id, 2);
        assert_eq!(new.stock_quantity, 5);
        assert_eq!(new.created_date, now);
        assert!(new.is_active);
    }

    #[test]
    fn from_domain_update_creates_changeset() {
        let domain = DomainUpdateProduct::new(
            ProductName::new("Blue shirt").unwrap(),
            Some(ProductDescription::new("Cotton").unwrap()),
            Price::new(Decimal::from_str("15.50").unwrap()).unwrap(),
            CategoryId::new(3).unwrap(),
            StockQuantity::new(0).unwrap(),
        );
        let update: UpdateProduct = (&domain).into();
        assert_eq!(update.name, "Blue shirt");
        assert_eq!(update.description, Some("Cotton"));
        assert_eq!(update.price_cents, 1550);
        assert_eq!(update.category_id, 3);
        assert_eq!(update.stock_quantity, 0);
    }

    #[test]
    fn product_into_domain_embeds_category() {
        let now = Utc::now().naive_utc();
        let db_product = Product {
            id: 9,
            name: "Hammer".to_string(),
            description: Some("Steel".to_string()),
            price_cents: 1999,
            category_id: 1,
            stock_quantity: 12,
            created_date: now,
            is_active: true,
        };
        let category = DomainCategory {
            id: CategoryId::new(1).unwrap(),
            name: CategoryName::new("Tools").unwrap(),
            description: Some(CategoryDescription::new("Hand tools").unwrap()),
            is_active: true,
        };

        let domain = db_product.into_domain(Some(category.clone())).unwrap();
        assert_eq!(domain.id.get(), 9);
        assert_eq!(domain.price.get(), Decimal::from_str("19.99").unwrap());
        assert_eq!(domain.stock_quantity.get(), 12);
        assert_eq!(domain.created_date, now);
        assert_eq!(domain.category, Some(category));
    }
}
