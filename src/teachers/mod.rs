pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::TeacherRepo;
pub use repo_types::{NewTeacher, Teacher};

pub fn router() -> Router<AppState> {
    handlers::teacher_routes()
}
