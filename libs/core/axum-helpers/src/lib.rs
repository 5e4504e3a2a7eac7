//! # Axum Helpers
//!
//! Shared building blocks for the catalog HTTP services.
//!
//! - **[`errors`]**: [`AppError`] and the JSON [`ErrorResponse`] envelope
//! - **[`extractors`]**: JSON, path and query extractors that reject with [`AppError`]
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown
//! - **[`http`]**: security headers and CORS
//! - **[`audit`]**: audit trail for data-changing requests
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router(api_routes, &config.server)?.merge(health_router(app_info!()));
//! create_production_app(router, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{IdPath, JsonBody, ParsedPath, QueryParams};
pub use http::{cors_layer, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};
