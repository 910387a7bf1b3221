//! Main entry point for the Periodica element server.

use std::sync::Arc;

use periodica_server::{
    model::{AppState, Configuration},
    startup,
};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();
    let context_path = configuration.server_context_path();

    let app_state = Arc::new(AppState::from_configuration(configuration).await);

    info!(
        address = %server_address,
        port = server_port,
        context_path = %context_path,
        write_mode = %app_state.element_service.write_mode(),
        "Starting Periodica server"
    );

    startup::main_server(app_state, context_path, server_address, server_port)?.await?;

    info!("Periodica server stopped");
    Ok(())
}
