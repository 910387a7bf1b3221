//! Element API handlers
//!
//! - GET  /elements          - Page through elements from `source` (json or db)
//! - POST /elements          - Create an element, assigning an id when it is 0
//! - PUT  /elements          - Update an element by id, inserting when unknown
//! - POST /elements/saveall  - Overwrite the JSON document with the body

use actix_web::{HttpResponse, get, http::header, post, put, web};
use tracing::debug;

use periodica_persistence::{Element, StorageMode};

use crate::{
    error::AppError,
    model::{
        AppState,
        constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE},
    },
};

use super::model::{ElementQuery, SaveAllResponse};

/// List elements
///
/// GET /elements?source=json|db&page=1&pageSize=10
#[get("")]
pub async fn list_elements(
    data: web::Data<AppState>,
    params: web::Query<ElementQuery>,
) -> Result<HttpResponse, AppError> {
    let params = params.into_inner();
    let mode = StorageMode::from_source(params.source.as_deref());
    debug!(%mode, page = ?params.page, page_size = ?params.page_size, "Listing elements");

    let page = data
        .element_service
        .read(mode, params.page, params.page_size)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Create an element
///
/// POST /elements
///
/// Responds 201 with a `Location` pointing at the first page of the backend
/// that received the write.
#[post("")]
pub async fn create_element(
    data: web::Data<AppState>,
    body: web::Json<Option<Element>>,
) -> Result<HttpResponse, AppError> {
    let service = &data.element_service;
    let created = service.create(body.into_inner()).await?;

    let location = format!(
        "{}/elements?source={}&page={}&pageSize={}",
        data.configuration.server_context_path(),
        service.write_mode(),
        DEFAULT_PAGE,
        DEFAULT_PAGE_SIZE
    );

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(created))
}

/// Update or insert an element
///
/// PUT /elements
#[put("")]
pub async fn upsert_element(
    data: web::Data<AppState>,
    body: web::Json<Option<Element>>,
) -> Result<HttpResponse, AppError> {
    let upserted = data.element_service.upsert(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(upserted))
}

/// Overwrite the JSON document
///
/// POST /elements/saveall
#[post("/saveall")]
pub async fn save_all_elements(
    data: web::Data<AppState>,
    body: web::Json<Option<Vec<Element>>>,
) -> Result<HttpResponse, AppError> {
    let saved = data.element_service.save_all(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SaveAllResponse { saved }))
}
