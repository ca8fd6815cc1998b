//! HTTP handlers for the `/api` surface.

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error, web};
use serde::Serialize;
use validator::ValidationErrors;

use crate::services::ServiceError;

pub mod category;
pub mod product;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ProblemDetails {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            errors: BTreeMap::new(),
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn into_response(self) -> HttpResponse {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status)
            .content_type("application/problem+json")
            .json(self)
    }
}

/// `category_id` -> `categoryId`, matching the JSON field names.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// One message per violated constraint, keyed by the camelCase field name.
pub fn validation_problem(errors: &ValidationErrors) -> ProblemDetails {
    let mut problem = ProblemDetails::new(
        StatusCode::BAD_REQUEST,
        "One or more validation errors occurred.",
    );

    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string())
            })
            .collect();
        problem.errors.insert(camel_case(&field), messages);
    }

    problem
}

/// Maps a service failure to its HTTP response without leaking internals.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => {
            ProblemDetails::new(StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        ServiceError::Validation(errors) => validation_problem(errors).into_response(),
        ServiceError::TypeConstraint(message) => {
            ProblemDetails::new(StatusCode::BAD_REQUEST, "Invalid value")
                .detail(message.as_str())
                .into_response()
        }
        ServiceError::Conflict(message) => {
            ProblemDetails::new(StatusCode::CONFLICT, "Conflict")
                .detail(message.as_str())
                .into_response()
        }
        ServiceError::Internal => ProblemDetails::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred.",
        )
        .into_response(),
    }
}

fn not_found() -> HttpResponse {
    ProblemDetails::new(StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn bad_request<E>(err: E, req: &HttpRequest) -> error::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    log::warn!("Rejected malformed request to {}: {err}", req.path());
    let response = ProblemDetails::new(StatusCode::BAD_REQUEST, "Bad Request")
        .detail(err.to_string())
        .into_response();
    error::InternalError::from_response(err, response).into()
}

/// JSON body extractor settings answering parse failures with a problem body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(bad_request)
}

/// Query string extractor settings answering parse failures with a problem body.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(bad_request)
}

/// Registers every `/api` endpoint on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                .service(category::list_categories)
                .service(category::get_category)
                .service(category::create_category)
                .service(product::list_products)
                // Must precede `/product/{id}`.
                .service(product::search_products)
                .service(product::get_product)
                .service(product::create_product)
                .service(product::update_product)
                .service(product::delete_product),
        );
}
