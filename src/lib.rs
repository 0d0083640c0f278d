pub mod app;
pub mod config;
pub mod counts;
pub mod errors;
pub mod handlers;
pub mod image_store;
pub mod log_store;
pub mod models;
pub mod paths;
pub mod session;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use session::Session;
pub use state::AppState;
