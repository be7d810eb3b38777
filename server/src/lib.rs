// Library exports for the binary and the integration tests

pub mod auth_token;
pub mod challenges;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod session;
pub mod store;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{from_fn, Logger},
    web, App, Error,
};

use config::ServerConfig;
use session::SessionRegistry;

/// Builds the application with every route and middleware in place.
///
/// Middleware order, outermost first: request logging, method override,
/// challenge tracking, payload ceiling.
pub fn build_app(
    sessions: web::Data<SessionRegistry>,
    config: web::Data<ServerConfig>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
> {
    App::new()
        .app_data(sessions)
        .app_data(config)
        .configure(handlers::configure)
        .default_service(web::to(handlers::unknown_route))
        .wrap(from_fn(middleware::payload_limit_middleware))
        .wrap(from_fn(middleware::challenge_tracker_middleware))
        .wrap(from_fn(middleware::method_override_middleware))
        .wrap(Logger::default())
}
