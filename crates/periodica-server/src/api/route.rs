//! Element API routing configuration

use actix_web::{HttpRequest, Scope, web};

use periodica_common::PeriodicaError;

use crate::error::AppError;

use super::element;

/// Create the element routes under `context_path`
///
/// Routes:
/// - GET /{ctx}/elements - List elements
/// - POST /{ctx}/elements - Create element
/// - PUT /{ctx}/elements - Upsert element
/// - POST /{ctx}/elements/saveall - Overwrite the JSON document
pub fn routes(context_path: &str) -> Scope {
    web::scope(context_path).service(
        web::scope("/elements")
            .service(element::save_all_elements)
            .service(element::list_elements)
            .service(element::create_element)
            .service(element::upsert_element),
    )
}

fn bad_request(message: String, _req: &HttpRequest) -> actix_web::Error {
    AppError::from(PeriodicaError::IllegalArgument(message)).into()
}

/// Malformed or missing JSON bodies answer with the 400 envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| bad_request(err.to_string(), req))
}

/// Unparseable query strings answer with the 400 envelope
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| bad_request(err.to_string(), req))
}
