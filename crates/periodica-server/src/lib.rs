// Periodica server - a chemical element catalog backed by a SQL table or a JSON document

pub mod api; // HTTP handlers and routes
pub mod error; // Error handling and HTTP mapping
pub mod model; // Configuration, state and response types
pub mod service; // Persistence gateway
pub mod startup; // Logging and server bootstrap

pub use error::AppError;
pub use model::{AppState, Configuration};
