use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, web};

use crate::forms::category::CategoryForm;
use crate::repository::DieselRepository;
use crate::routes::{error_response, not_found};
use crate::services::category as category_service;

#[get("/category")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match category_service::list_categories(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(&err),
    }
}

#[get("/category/{id}")]
pub async fn get_category(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match category_service::get_category(repo.get_ref(), id.into_inner()) {
        Ok(Some(category)) => HttpResponse::Ok().json(category),
        Ok(None) => not_found(),
        Err(err) => error_response(&err),
    }
}

#[post("/category")]
pub async fn create_category(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    match category_service::create_category(repo.get_ref(), form) {
        Ok(category) => HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/api/category/{}", category.id)))
            .json(category),
        Err(err) => error_response(&err),
    }
}
