mod common;

use actix_web::{
    http::{Method, StatusCode},
    test,
};
use server::build_app;

use common::{config, sessions};

async fn heartbeat_status(method: Method, method_override: Option<&str>) -> StatusCode {
    let app = test::init_service(build_app(sessions(), config())).await;

    let mut req = test::TestRequest::default().method(method).uri("/heartbeat");
    if let Some(value) = method_override {
        req = req.insert_header(("X-HTTP-Method-Override", value));
    }
    test::call_service(&app, req.to_request()).await.status()
}

#[actix_web::test]
async fn test_heartbeat_fixed_statuses() {
    assert_eq!(heartbeat_status(Method::GET, None).await, StatusCode::NO_CONTENT);
    assert_eq!(heartbeat_status(Method::HEAD, None).await, StatusCode::NO_CONTENT);
    assert_eq!(heartbeat_status(Method::DELETE, None).await, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        heartbeat_status(Method::PATCH, None).await,
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(heartbeat_status(Method::TRACE, None).await, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(heartbeat_status(Method::PUT, None).await, StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn test_heartbeat_options_lists_methods() {
    let app = test::init_service(build_app(sessions(), config())).await;

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/heartbeat")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("allow").unwrap(), "GET, HEAD, OPTIONS");
}

#[actix_web::test]
async fn test_override_behaves_like_native_method() {
    assert_eq!(
        heartbeat_status(Method::POST, Some("DELETE")).await,
        StatusCode::METHOD_NOT_ALLOWED
    );
    assert_eq!(
        heartbeat_status(Method::POST, Some("PATCH")).await,
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        heartbeat_status(Method::POST, Some("TRACE")).await,
        StatusCode::NOT_IMPLEMENTED
    );
    assert_eq!(
        heartbeat_status(Method::POST, Some("GET")).await,
        StatusCode::NO_CONTENT
    );
}

#[actix_web::test]
async fn test_unknown_override_is_ignored() {
    assert_eq!(
        heartbeat_status(Method::POST, Some("BREW")).await,
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[actix_web::test]
async fn test_override_applies_to_todo_routes() {
    let sessions = sessions();
    let id = sessions.create().unwrap().x_challenger;
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::post()
        .uri("/todos/1")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .insert_header(("X-HTTP-Method-Override", "DELETE"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert!(sessions
        .with_challenger(&id, |state| state.todos.get(1).is_none())
        .unwrap());
}
