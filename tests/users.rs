#[macro_use]
mod common;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;
use taskboard::email::EmailMessage;
use taskboard::models::{AuthResponse, Task, TaskQuery, User};
use tokio::sync::mpsc::UnboundedReceiver;

use common::{bearer, register_user, test_state};

async fn next_email(emails: &mut UnboundedReceiver<EmailMessage>) -> EmailMessage {
    tokio::time::timeout(Duration::from_secs(2), emails.recv())
        .await
        .expect("timed out waiting for email")
        .expect("email channel closed")
}

#[actix_rt::test]
async fn test_register_login_and_profile() {
    let (state, mut emails) = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "name": "Ada",
            "email": "Ada@Example.com",
            "password": "Lovelace1815"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let welcome = next_email(&mut emails).await;
    assert_eq!(welcome.to, "ada@example.com");
    assert_eq!(welcome.from, "tasks@example.com");
    assert_eq!(welcome.subject, "Thanks for joining in!");
    assert_eq!(
        welcome.text,
        "Welcome to the app, Ada. Let me know how you get along with the app."
    );

    // Same email again
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "name": "Imposter",
            "email": "ada@example.com",
            "password": "Lovelace1815"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/users/login")
        .set_json(json!({ "email": "ada@example.com", "password": "Lovelace1815" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(login.user.name, "Ada");

    let req = test::TestRequest::get()
        .uri("/users/me")
        .append_header(bearer(&login.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: User = test::read_body_json(resp).await;
    assert_eq!(me.id, login.user.id);
}

#[actix_rt::test]
async fn test_login_failures() {
    let (state, _emails) = test_state();
    let app = init_app!(state);
    register_user(&app, "Grace", "grace@example.com")
        .await
        .unwrap();

    let cases = [
        json!({ "email": "grace@example.com", "password": "wrong-one" }),
        json!({ "email": "nobody@example.com", "password": "Red12345!" }),
        json!({ "email": "not-an-email", "password": "Red12345!" }),
    ];
    for payload in cases {
        let req = test::TestRequest::post()
            .uri("/users/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);
    }
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let (state, _emails) = test_state();
    let app = init_app!(state);

    let cases = [
        json!({ "email": "x@example.com", "password": "Red12345!" }),
        json!({ "name": "X", "email": "bad-email", "password": "Red12345!" }),
        json!({ "name": "X", "email": "x@example.com", "password": "short" }),
        json!({ "name": "X", "email": "x@example.com", "password": "mypassword1" }),
        json!({ "name": "", "email": "x@example.com", "password": "Red12345!" }),
    ];
    for payload in cases {
        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);
    }
}

#[actix_rt::test]
async fn test_delete_account_removes_tasks_and_says_goodbye() {
    let (state, mut emails) = test_state();
    let tasks = state.tasks.clone();
    let app = init_app!(state);

    let user = register_user(&app, "Linus", "linus@example.com")
        .await
        .unwrap();
    next_email(&mut emails).await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .append_header(bearer(&user.token))
        .set_json(json!({ "description": "ship it" }))
        .to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri("/users/me")
        .append_header(bearer(&user.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: User = test::read_body_json(resp).await;
    assert_eq!(deleted.id, user.id);

    let goodbye = next_email(&mut emails).await;
    assert_eq!(goodbye.to, "linus@example.com");
    assert_eq!(goodbye.subject, "Sorry to see you go");

    assert!(tasks.get_by_id(user.id, task.id).await.is_err());
}

#[actix_rt::test]
async fn test_token_stops_working_after_account_deletion() {
    let (state, _emails) = test_state();
    let tasks = state.tasks.clone();
    let app = init_app!(state);

    let user = register_user(&app, "Ghost", "ghost@example.com")
        .await
        .unwrap();

    let req = test::TestRequest::delete()
        .uri("/users/me")
        .append_header(bearer(&user.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The token still verifies, but its subject is gone.
    let req = test::TestRequest::post()
        .uri("/tasks")
        .append_header(bearer(&user.token))
        .set_json(json!({ "description": "orphan" }))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("token of a deleted account should be rejected");
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);

    let left = tasks.list(user.id, &TaskQuery::default()).await.unwrap();
    assert!(left.is_empty());

    let req = test::TestRequest::get()
        .uri("/users/me")
        .append_header(bearer(&user.token))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("profile of a deleted account should be rejected");
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
}
