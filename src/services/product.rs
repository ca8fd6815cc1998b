use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::product::ProductSort;
use crate::domain::types::{CategoryId, ProductId};
use crate::dto::product::{ProductDto, ProductListParams, ProductSearchParams};
use crate::forms::product::ProductForm;
use crate::pagination::PaginatedResult;
use crate::repository::errors::RepositoryError;
use crate::repository::{CategoryReader, ProductReader, ProductSearchQuery, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

fn missing_category() -> ServiceError {
    let mut errors = ValidationErrors::new();
    errors.add(
        "category_id",
        ValidationError::new("exists").with_message(Cow::Borrowed("Category does not exist")),
    );
    ServiceError::Validation(errors)
}

fn ensure_category_exists<R>(repo: &R, category_id: CategoryId) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    if repo
        .category_exists(category_id)
        .map_err(ServiceError::from)?
    {
        Ok(())
    } else {
        Err(missing_category())
    }
}

fn write_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::ForeignKeyViolation(_) => missing_category(),
        other => ServiceError::from(other),
    }
}

/// Translates raw search parameters into a repository query.
///
/// Returns `None` when the parameters can never match anything, such as a
/// non-positive category id.
pub fn build_search_query(params: &ProductSearchParams) -> Option<ProductSearchQuery> {
    let mut query = ProductSearchQuery::new()
        .sort(ProductSort::from_params(
            params.sort_by.as_deref(),
            params.sort_order.as_deref(),
        ))
        .paginate(params.page, params.page_size);

    if let Some(term) = params
        .search_term
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
    {
        query = query.search(term);
    }

    if let Some(category_id) = params.category_id {
        query = query.category(CategoryId::new(category_id).ok()?);
    }

    if let Some(min_price) = params.min_price {
        query = query.min_price(min_price);
    }

    if let Some(max_price) = params.max_price {
        query = query.max_price(max_price);
    }

    if let Some(in_stock) = params.in_stock {
        query = query.in_stock(in_stock);
    }

    Some(query)
}

/// Searches active products, returning one page plus the total match count.
pub fn search_products<R>(
    repo: &R,
    params: ProductSearchParams,
) -> ServiceResult<PaginatedResult<ProductDto>>
where
    R: ProductReader + ?Sized,
{
    let Some(query) = build_search_query(&params) else {
        return Ok(PaginatedResult::new(
            Vec::new(),
            0,
            params.page,
            params.page_size,
        ));
    };

    let (total, products) = repo.search_products(&query).map_err(ServiceError::from)?;

    Ok(
        PaginatedResult::new(products, total, params.page, params.page_size)
            .map(|product| ProductDto::from(&product)),
    )
}

/// Lists active products, newest first.
pub fn list_products<R>(
    repo: &R,
    params: ProductListParams,
) -> ServiceResult<PaginatedResult<ProductDto>>
where
    R: ProductReader + ?Sized,
{
    search_products(
        repo,
        ProductSearchParams {
            page: params.page,
            page_size: params.page_size,
            ..ProductSearchParams::default()
        },
    )
}

/// Fetches an active product; `None` when missing or soft-deleted.
pub fn get_product<R>(repo: &R, id: i32) -> ServiceResult<Option<ProductDto>>
where
    R: ProductReader + ?Sized,
{
    let Ok(id) = ProductId::new(id) else {
        return Ok(None);
    };

    let product = repo.get_product_by_id(id).map_err(ServiceError::from)?;
    Ok(product.as_ref().map(ProductDto::from))
}

/// Validates the form, checks the category and stores an active product.
pub fn create_product<R>(repo: &R, form: ProductForm) -> ServiceResult<ProductDto>
where
    R: CategoryReader + ProductWriter + ?Sized,
{
    form.validate()?;

    let new_product = form.into_new_product()?;
    ensure_category_exists(repo, new_product.category_id)?;

    let product = repo.create_product(&new_product).map_err(write_error)?;

    log::info!("Created product {}", product.id);
    Ok(ProductDto::from(&product))
}

/// Overwrites the mutable fields of the active product `form.id`.
///
/// Returns `None` when no active product has that id. The creation date is
/// preserved. Concurrent updates are last-writer-wins.
pub fn update_product<R>(repo: &R, form: ProductForm) -> ServiceResult<Option<ProductDto>>
where
    R: CategoryReader + ProductReader + ProductWriter + ?Sized,
{
    form.validate()?;

    let Ok(id) = ProductId::new(form.id) else {
        return Ok(None);
    };

    if repo
        .get_product_by_id(id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Ok(None);
    }

    let updates = form.into_update_product()?;
    ensure_category_exists(repo, updates.category_id)?;

    let product = repo.update_product(id, &updates).map_err(write_error)?;
    if let Some(product) = &product {
        log::info!("Updated product {}", product.id);
    }

    Ok(product.as_ref().map(ProductDto::from))
}

/// Soft-deletes an active product; `false` when there was nothing to delete.
pub fn delete_product<R>(repo: &R, id: i32) -> ServiceResult<bool>
where
    R: ProductWriter + ?Sized,
{
    let Ok(id) = ProductId::new(id) else {
        return Ok(false);
    };

    let deleted = repo.deactivate_product(id).map_err(ServiceError::from)?;
    if deleted {
        log::info!("Soft-deleted product {id}");
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::product::{Product, ProductSortField, SortDirection};
    use crate::domain::types::{Price, ProductName, StockQuantity};
    use crate::repository::mock::MockRepository;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            name: ProductName::new(format!("Product #{id}")).unwrap(),
            description: None,
            price: Price::new(Decimal::from_str("10.00").unwrap()).unwrap(),
            category_id: CategoryId::new(1).unwrap(),
            category: None,
            stock_quantity: StockQuantity::new(1).unwrap(),
            created_date: Utc::now().naive_utc(),
            is_active: true,
        }
    }

    fn form(id: i32) -> ProductForm {
        ProductForm {
            id,
            name: "Red shirt".to_string(),
            description: None,
            price: Decimal::from_str("15.50").unwrap(),
            category_id: 1,
            stock_quantity: 2,
        }
    }

    #[test]
    fn build_search_query_maps_every_parameter() {
        let params = ProductSearchParams {
            search_term: Some("  red shirt ".to_string()),
            category_id: Some(3),
            min_price: Some(Decimal::from(10)),
            max_price: Some(Decimal::from(20)),
            in_stock: Some(true),
            sort_by: Some("price".to_string()),
            sort_order: Some("DESC".to_string()),
            page: 2,
            page_size: 25,
        };

        let query = build_search_query(&params).unwrap();

        assert_eq!(query.search.as_deref(), Some("red shirt"));
        assert_eq!(query.category_id, Some(CategoryId::new(3).unwrap()));
        assert_eq!(query.min_price, Some(Decimal::from(10)));
        assert_eq!(query.max_price, Some(Decimal::from(20)));
        assert_eq!(query.in_stock, Some(true));
        assert_eq!(
            query.sort,
            ProductSort::new(ProductSortField::Price, SortDirection::Desc)
        );
        let pagination = query.pagination.unwrap();
        assert_eq!((pagination.page, pagination.per_page), (2, 25));
    }

    #[test]
    fn blank_search_term_is_dropped() {
        let params = ProductSearchParams {
            search_term: Some("   ".to_string()),
            ..ProductSearchParams::default()
        };
        assert_eq!(build_search_query(&params).unwrap().search, None);
    }

    #[test]
    fn non_positive_category_matches_nothing_without_querying() {
        let mut repo = MockRepository::new();
        repo.expect_search_products().never();

        let params = ProductSearchParams {
            category_id: Some(0),
            ..ProductSearchParams::default()
        };
        let result = search_products(&repo, params).unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 0);
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn search_wraps_page_in_envelope() {
        let mut repo = MockRepository::new();
        repo.expect_search_products()
            .withf(|query| query.pagination.map(|p| p.offset()) == Some(2))
            .returning(|_| Ok((5, vec![product(3), product(4)])));

        let params = ProductSearchParams {
            page: 2,
            page_size: 2,
            ..ProductSearchParams::default()
        };
        let result = search_products(&repo, params).unwrap();

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.total_count, 5);
        assert_eq!(result.total_pages, 3);
        assert!(result.has_previous_page);
        assert!(result.has_next_page);
    }

    #[test]
    fn list_uses_default_sort() {
        let mut repo = MockRepository::new();
        repo.expect_search_products()
            .withf(|query| query.sort == ProductSort::default() && query.search.is_none())
            .returning(|_| Ok((0, vec![])));

        let result = list_products(&repo, ProductListParams::default()).unwrap();
        assert_eq!(result.page_size, 50);
    }

    #[test]
    fn create_rejects_unknown_category() {
        let mut repo = MockRepository::new();
        repo.expect_category_exists().returning(|_| Ok(false));
        repo.expect_create_product().never();

        let Err(ServiceError::Validation(errors)) = create_product(&repo, form(0)) else {
            panic!("expected a validation error");
        };
        assert!(errors.field_errors().contains_key("category_id"));
    }

    #[test]
    fn create_maps_foreign_key_race_to_validation_error() {
        let mut repo = MockRepository::new();
        repo.expect_category_exists().returning(|_| Ok(true));
        repo.expect_create_product()
            .returning(|_| Err(RepositoryError::ForeignKeyViolation("FOREIGN KEY".into())));

        assert!(matches!(
            create_product(&repo, form(0)),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn update_of_missing_product_is_absent() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .with(eq(ProductId::new(9).unwrap()))
            .returning(|_| Ok(None));
        repo.expect_update_product().never();

        assert_eq!(update_product(&repo, form(9)).unwrap(), None);
    }

    #[test]
    fn update_without_id_is_absent() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id().never();

        assert_eq!(update_product(&repo, form(0)).unwrap(), None);
    }

    #[test]
    fn update_validates_before_lookup() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id().never();

        let invalid = ProductForm {
            name: String::new(),
            ..form(9)
        };
        assert!(matches!(
            update_product(&repo, invalid),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn update_returns_stored_product() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(product(id.get()))));
        repo.expect_category_exists().returning(|_| Ok(true));
        repo.expect_update_product()
            .withf(|id, updates| id.get() == 9 && updates.price.cents() == 1550)
            .returning(|id, _| Ok(Some(product(id.get()))));

        let updated = update_product(&repo, form(9)).unwrap().unwrap();
        assert_eq!(updated.id, 9);
    }

    #[test]
    fn delete_reports_whether_anything_changed() {
        let mut repo = MockRepository::new();
        repo.expect_deactivate_product()
            .with(eq(ProductId::new(5).unwrap()))
            .returning(|_| Ok(true));
        repo.expect_deactivate_product()
            .with(eq(ProductId::new(6).unwrap()))
            .returning(|_| Ok(false));

        assert!(delete_product(&repo, 5).unwrap());
        assert!(!delete_product(&repo, 6).unwrap());
        assert!(!delete_product(&repo, -1).unwrap());
    }
}
