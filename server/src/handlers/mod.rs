pub mod challenger;
pub mod challenges;
pub mod heartbeat;
pub mod respond;
pub mod secret;
pub mod todos;

use actix_web::{http::Method, middleware::from_fn, web, HttpRequest, HttpResponse};

use crate::error::{ApiError, Result};
use crate::middleware::{auth_middleware, challenger_middleware};

/// Fallback for paths no resource claims.
pub async fn unknown_route(req: HttpRequest) -> Result<HttpResponse> {
    Err(ApiError::NotFound(format!(
        "No such endpoint {} {}",
        req.method(),
        req.path()
    )))
}

/// Fallback for known resources called with a method they do not serve.
pub async fn method_not_allowed() -> Result<HttpResponse> {
    Err(ApiError::MethodNotAllowed)
}

/// Registers every route of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/challenger")
            .route(web::post().to(challenger::create_challenger))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/challenger/database/{id}")
            .route(web::get().to(challenger::get_database))
            .route(web::put().to(challenger::restore_database))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/challenger/{id}")
            .route(web::get().to(challenger::get_progress))
            .route(web::put().to(challenger::restore_progress))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/challenges")
            .route(web::get().to(challenges::list_challenges))
            .default_service(web::to(method_not_allowed)),
    )
    .service(web::resource("/heartbeat").route(web::route().to(heartbeat::heartbeat)))
    .service(
        web::scope("/todos")
            .service(
                web::resource("")
                    .wrap(from_fn(challenger_middleware))
                    .route(web::get().to(todos::list_todos))
                    .route(web::head().to(todos::head_todos))
                    .route(web::post().to(todos::create_todo))
                    .route(web::method(Method::OPTIONS).to(todos::options_todos))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{id}")
                    .wrap(from_fn(challenger_middleware))
                    .route(web::get().to(todos::get_todo))
                    .route(web::post().to(todos::amend_todo))
                    .route(web::put().to(todos::replace_todo))
                    .route(web::delete().to(todos::delete_todo))
                    .route(web::method(Method::OPTIONS).to(todos::options_todo))
                    .default_service(web::to(method_not_allowed)),
            )
            .default_service(web::to(unknown_route)),
    )
    .service(
        web::scope("/secret")
            .service(
                web::resource("/token")
                    .wrap(from_fn(challenger_middleware))
                    .route(web::post().to(secret::create_token))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/note")
                    .wrap(from_fn(auth_middleware))
                    .wrap(from_fn(challenger_middleware))
                    .route(web::get().to(secret::get_note))
                    .route(web::post().to(secret::update_note))
                    .default_service(web::to(method_not_allowed)),
            )
            .default_service(web::to(unknown_route)),
    );
}
