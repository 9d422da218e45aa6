/// API routes and handlers
pub mod gallery;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new().merge(gallery::routes())
}
