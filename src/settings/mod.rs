pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::SettingsRepo;
pub use repo_types::Settings;

pub fn router() -> Router<AppState> {
    handlers::settings_routes()
}
