//! HTTP server setup.

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{
    api::route::{json_config, query_config, routes},
    model::AppState,
};

/// Creates and binds the element HTTP server.
pub fn main_server(
    app_state: Arc<AppState>,
    context_path: String,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(app_state.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .service(routes(&context_path))
    })
    .bind((address, port))?
    .run())
}
