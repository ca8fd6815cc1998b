//! Repository implementation for products, including the search query builder.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{
    db::unicode_lower,
    domain::{
        category::Category,
        product::{NewProduct, Product, ProductSortField, SortDirection, UpdateProduct},
        types::ProductId,
    },
    models::{
        category::Category as DbCategory,
        product::{
            NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
        },
    },
    repository::{
        DieselRepository, ProductReader, ProductSearchQuery, ProductWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{categories, products},
};

const LIKE_ESCAPE: char = '\\';

/// Wraps `word` in `%` wildcards, escaping LIKE metacharacters inside it.
fn like_pattern(word: &str) -> String {
    let mut pattern = String::with_capacity(word.len() + 2);
    pattern.push('%');
    for ch in word.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Where a price filter puts its cut-off in cents.
#[derive(Debug, PartialEq, Eq)]
enum CentBound {
    At(i64),
    /// Lies beyond every storable price on the permissive side.
    Open,
    /// Lies beyond every storable price on the restrictive side.
    Unreachable,
}

fn to_cents(price: Decimal, round: fn(Decimal) -> Decimal) -> Option<i64> {
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(round)
        .and_then(|cents| cents.to_i64())
}

/// Smallest cent amount that is `>= price`.
fn lower_bound(price: Decimal) -> CentBound {
    match to_cents(price, |cents| cents.ceil()) {
        Some(cents) => CentBound::At(cents),
        None if price.is_sign_negative() => CentBound::Open,
        None => CentBound::Unreachable,
    }
}

/// Largest cent amount that is `<= price`.
fn upper_bound(price: Decimal) -> CentBound {
    match to_cents(price, |cents| cents.floor()) {
        Some(cents) => CentBound::At(cents),
        None if price.is_sign_negative() => CentBound::Unreachable,
        None => CentBound::Open,
    }
}

/// Active products matching every filter of `query`, without ordering or
/// paging. `None` when no product can match.
fn filtered(query: &ProductSearchQuery) -> Option<products::BoxedQuery<'static, Sqlite>> {
    let mut items = products::table
        .filter(products::is_active.eq(true))
        .into_boxed::<Sqlite>();

    for word in query.search_words() {
        let pattern = like_pattern(&word.to_lowercase());
        items = items.filter(
            unicode_lower(products::name.nullable())
                .like(pattern.clone())
                .escape(LIKE_ESCAPE)
                .or(unicode_lower(products::description)
                    .like(pattern)
                    .escape(LIKE_ESCAPE)),
        );
    }

    if let Some(category_id) = query.category_id {
        items = items.filter(products::category_id.eq(category_id.get()));
    }

    if let Some(min_price) = query.min_price {
        match lower_bound(min_price) {
            CentBound::At(cents) => items = items.filter(products::price_cents.ge(cents)),
            CentBound::Open => {}
            CentBound::Unreachable => return None,
        }
    }

    if let Some(max_price) = query.max_price {
        match upper_bound(max_price) {
            CentBound::At(cents) => items = items.filter(products::price_cents.le(cents)),
            CentBound::Open => {}
            CentBound::Unreachable => return None,
        }
    }

    match query.in_stock {
        Some(true) => items = items.filter(products::stock_quantity.gt(0)),
        Some(false) => items = items.filter(products::stock_quantity.eq(0)),
        None => {}
    }

    Some(items)
}

/// Applies the requested ordering; `id` breaks ties so pages are stable.
fn ordered(
    items: products::BoxedQuery<'static, Sqlite>,
    query: &ProductSearchQuery,
) -> products::BoxedQuery<'static, Sqlite> {
    use ProductSortField as Field;
    use SortDirection as Dir;

    let items = match (query.sort.field, query.sort.direction) {
        (Field::Name, Dir::Asc) => items.order_by(products::name.asc()),
        (Field::Name, Dir::Desc) => items.order_by(products::name.desc()),
        (Field::Price, Dir::Asc) => items.order_by(products::price_cents.asc()),
        (Field::Price, Dir::Desc) => items.order_by(products::price_cents.desc()),
        (Field::CreatedDate, Dir::Asc) => items.order_by(products::created_date.asc()),
        (Field::CreatedDate, Dir::Desc) => items.order_by(products::created_date.desc()),
        (Field::StockQuantity, Dir::Asc) => items.order_by(products::stock_quantity.asc()),
        (Field::StockQuantity, Dir::Desc) => items.order_by(products::stock_quantity.desc()),
    };

    items.then_order_by(products::id.asc())
}

fn load_category(
    conn: &mut SqliteConnection,
    category_id: i32,
) -> RepositoryResult<Option<Category>> {
    categories::table
        .find(category_id)
        .select(DbCategory::as_select())
        .first::<DbCategory>(conn)
        .optional()?
        .map(|category| Category::try_from(category).map_err(RepositoryError::from))
        .transpose()
}

/// Loads the categories for a page of products with a single `IN` query.
fn load_categories(
    conn: &mut SqliteConnection,
    db_products: &[DbProduct],
) -> RepositoryResult<HashMap<i32, Category>> {
    let category_ids: Vec<i32> = db_products
        .iter()
        .map(|product| product.category_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    categories::table
        .filter(categories::id.eq_any(category_ids))
        .select(DbCategory::as_select())
        .load::<DbCategory>(conn)?
        .into_iter()
        .map(|db_category| {
            let id = db_category.id;
            Category::try_from(db_category)
                .map(|category| (id, category))
                .map_err(RepositoryError::from)
        })
        .collect()
}

fn with_category(
    conn: &mut SqliteConnection,
    db_product: DbProduct,
) -> RepositoryResult<Product> {
    let category = load_category(conn, db_product.category_id)?;
    db_product
        .into_domain(category)
        .map_err(RepositoryError::from)
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;
        let db_product = products::table
            .filter(products::id.eq(id.get()))
            .filter(products::is_active.eq(true))
            .select(DbProduct::as_select())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        db_product
            .map(|product| with_category(&mut conn, product))
            .transpose()
    }

    fn get_stored_product(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;
        let db_product = products::table
            .find(id.get())
            .select(DbProduct::as_select())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        db_product
            .map(|product| with_category(&mut conn, product))
            .transpose()
    }

    fn search_products(
        &self,
        query: &ProductSearchQuery,
    ) -> RepositoryResult<(usize, Vec<Product>)> {
        let mut conn = self.conn()?;

        log::debug!(
            "Searching products: words={:?} category={:?} price={:?}..{:?} in_stock={:?} sort={} {:?}",
            query.search_words(),
            query.category_id,
            query.min_price,
            query.max_price,
            query.in_stock,
            query.sort.field,
            query.sort.direction,
        );

        let (Some(count_query), Some(page_query)) = (filtered(query), filtered(query)) else {
            return Ok((0, Vec::new()));
        };

        // Count the filtered set before paging is applied.
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = ordered(page_query, query);
        if let Some(pagination) = &query.pagination {
            let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);
            let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
            items = items.offset(offset).limit(limit);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;
        let category_map = load_categories(&mut conn, &db_products)?;

        let products = db_products
            .into_iter()
            .map(|db_product| {
                let category = category_map.get(&db_product.category_id).cloned();
                db_product.into_domain(category)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)?;

        Ok((total, products))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;
        let insertable = DbNewProduct::from_domain(new_product, Utc::now().naive_utc());

        let db_product = diesel::insert_into(products::table)
            .values(&insertable)
            .returning(DbProduct::as_returning())
            .get_result::<DbProduct>(&mut conn)?;

        with_category(&mut conn, db_product)
    }

    fn update_product(
        &self,
        id: ProductId,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;
        let changeset: DbUpdateProduct = updates.into();

        let db_product = diesel::update(
            products::table
                .filter(products::id.eq(id.get()))
                .filter(products::is_active.eq(true)),
        )
        .set(&changeset)
        .returning(DbProduct::as_returning())
        .get_result::<DbProduct>(&mut conn)
        .optional()?;

        db_product
            .map(|product| with_category(&mut conn, product))
            .transpose()
    }

    fn deactivate_product(&self, id: ProductId) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let affected = diesel::update(
            products::table
                .filter(products::id.eq(id.get()))
                .filter(products::is_active.eq(true)),
        )
        .set(products::is_active.eq(false))
        .execute(&mut conn)?;

        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("shirt"), "%shirt%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }

    #[test]
    fn price_bounds_round_toward_the_inside() {
        let bound = Decimal::from_str("10.005").unwrap();
        assert_eq!(lower_bound(bound), CentBound::At(1001));
        assert_eq!(upper_bound(bound), CentBound::At(1000));

        let exact = Decimal::from_str("20").unwrap();
        assert_eq!(lower_bound(exact), CentBound::At(2000));
        assert_eq!(upper_bound(exact), CentBound::At(2000));
    }

    #[test]
    fn overflowing_price_bounds_do_not_panic() {
        assert_eq!(lower_bound(Decimal::MAX), CentBound::Unreachable);
        assert_eq!(upper_bound(Decimal::MAX), CentBound::Open);
        assert_eq!(lower_bound(Decimal::MIN), CentBound::Open);
        assert_eq!(upper_bound(Decimal::MIN), CentBound::Unreachable);

        let beyond_i64 = Decimal::from_str("100000000000000000000").unwrap();
        assert_eq!(lower_bound(beyond_i64), CentBound::Unreachable);
        assert_eq!(upper_bound(beyond_i64), CentBound::Open);
    }

    #[test]
    fn overflowing_min_price_matches_nothing() {
        let query = ProductSearchQuery::new().min_price(Decimal::MAX);
        assert!(filtered(&query).is_none());

        let query = ProductSearchQuery::new().max_price(Decimal::MAX);
        assert!(filtered(&query).is_some());
    }
}
