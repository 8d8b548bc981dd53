//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::auth_routes::auth_routes;
use super::config::HttpServerConfig;
use super::content_routes::content_routes;
use super::content_type_routes::content_type_routes;
use super::health_routes::health_routes;
use super::state::AppState;
use super::user_routes::user_routes;

/// HTTP server for the content API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, Arc::new(state));
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| match s.parse() {
                    Ok(origin) => Some(origin),
                    Err(_) => {
                        warn!(origin = %s, "ignoring unparsable CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let api = Router::new()
            .merge(content_type_routes(state.clone()))
            .merge(content_routes(state.clone()))
            .merge(user_routes(state.clone()));

        Router::new()
            .merge(health_routes())
            .nest("/auth", auth_routes(state))
            .nest("/api", api)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "content API listening");
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
