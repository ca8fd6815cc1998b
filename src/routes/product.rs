use actix_web::http::header;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::dto::product::{ProductListParams, ProductSearchParams};
use crate::forms::product::ProductForm;
use crate::repository::DieselRepository;
use crate::routes::{error_response, not_found};
use crate::services::product as product_service;

#[get("/product")]
pub async fn list_products(
    params: web::Query<ProductListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match product_service::list_products(repo.get_ref(), params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(&err),
    }
}

#[get("/product/search")]
pub async fn search_products(
    params: web::Query<ProductSearchParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match product_service::search_products(repo.get_ref(), params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(&err),
    }
}

#[get("/product/{id}")]
pub async fn get_product(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match product_service::get_product(repo.get_ref(), id.into_inner()) {
        Ok(Some(product)) => HttpResponse::Ok().json(product),
        Ok(None) => not_found(),
        Err(err) => error_response(&err),
    }
}

#[post("/product")]
pub async fn create_product(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    match product_service::create_product(repo.get_ref(), form) {
        Ok(product) => HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/api/product/{}", product.id)))
            .json(product),
        Err(err) => error_response(&err),
    }
}

#[put("/product")]
pub async fn update_product(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> impl Responder {
    match product_service::update_product(repo.get_ref(), form) {
        Ok(Some(product)) => HttpResponse::Ok().json(product),
        Ok(None) => not_found(),
        Err(err) => error_response(&err),
    }
}

#[delete("/product/{id}")]
pub async fn delete_product(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match product_service::delete_product(repo.get_ref(), id.into_inner()) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => not_found(),
        Err(err) => error_response(&err),
    }
}
