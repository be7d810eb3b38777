mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use server::build_app;

use common::{challenger, config, error_messages, sessions};

#[actix_web::test]
async fn test_new_challenger_sees_seeded_todos() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::get()
        .uri("/todos")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 10);
    assert_eq!(todos[0]["id"], 1);
    assert_eq!(todos[0]["title"], "scan paperwork");
    assert_eq!(todos[0]["doneStatus"], false);
}

#[actix_web::test]
async fn test_missing_or_unknown_challenger_is_unauthorized() {
    let sessions = sessions();
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::get().uri("/todos").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/todos")
        .insert_header(("X-CHALLENGER", "not-a-session"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_singular_path_is_not_found() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::get()
        .uri("/todo")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(error_messages(&body).len(), 1);
}

#[actix_web::test]
async fn test_unknown_nested_paths_are_not_found_without_challenger() {
    let app = test::init_service(build_app(sessions(), config())).await;

    for uri in ["/todos/1/x", "/secret/unknown"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "uri {}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            error_messages(&body),
            vec![format!("No such endpoint GET {}", uri)]
        );
    }

    let req = test::TestRequest::get().uri("/todos/1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_get_single_todo_and_not_found() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::get()
        .uri("/todos/3")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["todos"][0]["id"], 3);
    assert_eq!(body["todos"][0]["title"], "process payments");

    let req = test::TestRequest::get()
        .uri("/todos/99999")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        error_messages(&body),
        vec!["Could not find an instance with todos/99999"]
    );

    let req = test::TestRequest::get()
        .uri("/todos/abc")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_filter_by_done_status() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::post()
        .uri("/todos/2")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"doneStatus": true}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/todos?doneStatus=true")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert!(todos.iter().all(|todo| todo["doneStatus"] == true));

    let req = test::TestRequest::get()
        .uri("/todos?doneStatus=maybe")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_head_and_options() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::HEAD)
        .uri("/todos")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(test::read_body(resp).await.is_empty());

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/todos")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("allow").unwrap(),
        "OPTIONS, GET, HEAD, POST"
    );
}

#[actix_web::test]
async fn test_unsupported_method_on_collection() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::patch()
        .uri("/todos")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn test_create_with_maximum_lengths() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::post()
        .uri("/todos")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({
            "title": "a".repeat(50),
            "doneStatus": false,
            "description": "b".repeat(200)
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers().get("location").unwrap(), "/todos/11");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 11);
    assert_eq!(body["title"].as_str().unwrap().len(), 50);
    assert_eq!(body["description"].as_str().unwrap().len(), 200);
}

#[actix_web::test]
async fn test_create_reports_every_violation() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::post()
        .uri("/todos")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({
            "title": "t".repeat(51),
            "doneStatus": "yes",
            "extraField": "x"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let messages = error_messages(&test::read_body_json(resp).await);
    assert_eq!(messages.len(), 3);
    assert!(messages.contains(&"Could not find field: extraField".to_string()));
    assert!(messages
        .contains(&"Failed Validation: doneStatus should be BOOLEAN but was STRING".to_string()));
    assert!(messages.contains(
        &"Failed Validation: Maximum allowable length exceeded for title - maximum allowed is 50"
            .to_string()
    ));
}

#[actix_web::test]
async fn test_twenty_first_todo_is_rejected() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    for i in 11..=20 {
        let req = test::TestRequest::post()
            .uri("/todos")
            .insert_header(("X-CHALLENGER", id.as_str()))
            .set_json(json!({"title": format!("Todo {}", i)}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/todos")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"title": "Extra todo"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_messages(&test::read_body_json(resp).await),
        vec!["ERROR: Cannot add instance, maximum limit of 20 reached"]
    );

    let count = sessions
        .with_challenger(&id, |state| state.todos.len())
        .unwrap();
    assert_eq!(count, 20);
}

#[actix_web::test]
async fn test_put_rules() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::put()
        .uri("/todos/1")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"doneStatus": true, "description": "no title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_messages(&test::read_body_json(resp).await),
        vec!["title : field is mandatory"]
    );

    let req = test::TestRequest::put()
        .uri("/todos/1")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"id": 2, "title": "moved"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_messages(&test::read_body_json(resp).await),
        vec!["Can not amend id from 1 to 2"]
    );

    let req = test::TestRequest::put()
        .uri("/todos/1")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"id": "1", "title": "quoted id"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_messages(&test::read_body_json(resp).await),
        vec!["Failed Validation: id should be NUMERIC but was STRING"]
    );

    let req = test::TestRequest::put()
        .uri("/todos/99999")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"title": "new", "doneStatus": false}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_messages(&test::read_body_json(resp).await),
        vec!["Cannot create todo with PUT due to Auto fields id"]
    );

    let unchanged = sessions
        .with_challenger(&id, |state| state.todos.get(1).cloned())
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.title, "scan paperwork");
}

#[actix_web::test]
async fn test_put_full_then_partial() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::put()
        .uri("/todos/4")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"title": "full", "doneStatus": true, "description": "everything"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["doneStatus"], true);

    let req = test::TestRequest::put()
        .uri("/todos/4")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"title": "partial"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["id"], 4);
    assert_eq!(body["title"], "partial");
    assert_eq!(body["doneStatus"], false);
    assert_eq!(body["description"], "");
}

#[actix_web::test]
async fn test_post_amend_and_missing_target() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::post()
        .uri("/todos/5")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"description": "amended"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["title"], "pay invoices");
    assert_eq!(body["description"], "amended");

    let req = test::TestRequest::post()
        .uri("/todos/99999")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .set_json(json!({"title": "ghost"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        error_messages(&test::read_body_json(resp).await),
        vec!["No such todo entity instance with id == 99999 found"]
    );
}

#[actix_web::test]
async fn test_delete_every_todo() {
    let sessions = sessions();
    let (id, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    for todo_id in 1..=10 {
        let req = test::TestRequest::delete()
            .uri(&format!("/todos/{}", todo_id))
            .insert_header(("X-CHALLENGER", id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/todos/1")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/todos")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(body["todos"].as_array().unwrap().is_empty());

    let req = test::TestRequest::delete()
        .uri("/todos/1")
        .insert_header(("X-CHALLENGER", id.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_sessions_do_not_share_todos() {
    let sessions = sessions();
    let (first, _) = challenger(&sessions);
    let (second, _) = challenger(&sessions);
    let app = test::init_service(build_app(sessions.clone(), config())).await;

    let req = test::TestRequest::delete()
        .uri("/todos/1")
        .insert_header(("X-CHALLENGER", first.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/todos/1")
        .insert_header(("X-CHALLENGER", second.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
