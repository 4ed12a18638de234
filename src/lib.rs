pub mod asr;
pub mod config;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::build_app;
pub use state::AppState;
