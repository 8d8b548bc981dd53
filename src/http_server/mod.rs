//! # HTTP Server Module
//!
//! JSON API over the data engine.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/auth/*` - Login and current user
//! - `/api/content-type*` - Content type management
//! - `/api/content/*` - Record CRUD
//! - `/api/users*` - User management

pub mod auth_routes;
pub mod config;
pub mod content_routes;
pub mod content_type_routes;
pub mod health_routes;
pub mod response;
pub mod server;
pub mod state;
pub mod user_routes;

pub use config::HttpServerConfig;
pub use response::{ApiError, ApiResponse, ApiResult};
pub use server::HttpServer;
pub use state::AppState;
