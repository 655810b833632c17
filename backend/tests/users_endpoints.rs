//! End-to-end behaviour of the user endpoints through the assembled app.

mod support;

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use user_service::domain::ports::UserRepository;
use user_service::inbound::http::problem::DetailMode;
use user_service::outbound::persistence::InMemoryUserRepository;
use user_service::server::build_app;

use support::dependencies;

const PROBLEM_FIELDS: [&str; 6] = [
    "type",
    "title",
    "status",
    "detail",
    "instance",
    "correlation_id",
];

#[fixture]
fn repository() -> Arc<InMemoryUserRepository> {
    Arc::new(InMemoryUserRepository::new())
}

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: Value,
}

async fn send(repository: &Arc<InMemoryUserRepository>, request: test::TestRequest) -> Reply {
    let app = test::init_service(build_app(dependencies(
        repository.clone(),
        DetailMode::Production,
    )))
    .await;
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(response).await;
    Reply {
        status,
        content_type,
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    }
}

fn create(body: Value) -> test::TestRequest {
    test::TestRequest::post().uri("/users").set_json(body)
}

fn misha() -> Value {
    json!({"name": "Misha", "email": "d@mail.ru", "password": "Abcdef12"})
}

async fn stored_count(repository: &Arc<InMemoryUserRepository>) -> usize {
    repository.list().await.expect("list users").len()
}

#[rstest]
#[actix_web::test]
async fn create_with_name_alias_returns_the_user(repository: Arc<InMemoryUserRepository>) {
    let reply = send(&repository, create(misha())).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["username"], "Misha");
    assert_eq!(reply.body["email"], "d@mail.ru");
    assert!(reply.body["id"].is_i64());
    assert!(reply.body.get("password").is_none());
}

#[rstest]
#[actix_web::test]
async fn creating_the_same_user_twice_is_rejected(repository: Arc<InMemoryUserRepository>) {
    send(&repository, create(misha())).await;
    let reply = send(&repository, create(misha())).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["title"], "existing user");
    assert_eq!(stored_count(&repository).await, 1);
}

#[rstest]
#[case(json!({"username": "Misha", "email": "other@mail.ru", "password": "Abcdef12"}))]
#[case(json!({"username": "Grisha", "email": "d@mail.ru", "password": "Abcdef12"}))]
#[actix_web::test]
async fn shared_username_or_email_is_a_conflict(
    repository: Arc<InMemoryUserRepository>,
    #[case] second: Value,
) {
    send(&repository, create(misha())).await;
    let reply = send(&repository, create(second)).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(stored_count(&repository).await, 1);
}

#[rstest]
#[actix_web::test]
async fn missing_user_is_a_complete_problem_document(repository: Arc<InMemoryUserRepository>) {
    let reply = send(&repository, test::TestRequest::get().uri("/users/999999")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.content_type.as_deref(), Some("application/problem+json"));
    for field in PROBLEM_FIELDS {
        assert!(reply.body.get(field).is_some(), "{field} missing");
    }
    assert_eq!(reply.body["title"], "non existing user");
    assert_eq!(reply.body["status"], 404);
    assert_eq!(reply.body["detail"], "An error occurred");
    assert_eq!(reply.body["instance"], "http://localhost:8080/users/999999");
}

#[rstest]
#[actix_web::test]
async fn every_missing_id_operation_is_not_found_with_fresh_correlation_ids(
    repository: Arc<InMemoryUserRepository>,
) {
    let requests = [
        test::TestRequest::get().uri("/users/41"),
        test::TestRequest::put()
            .uri("/users/42")
            .set_json(json!({"email": "x@mail.ru"})),
        test::TestRequest::delete().uri("/users/43"),
        test::TestRequest::get().uri("/users/41"),
    ];

    let mut seen = HashSet::new();
    for request in requests {
        let reply = send(&repository, request).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body["title"], "non existing user");
        let id = reply.body["correlation_id"]
            .as_str()
            .expect("correlation id")
            .to_owned();
        assert!(seen.insert(id), "correlation id reused");
    }
}

#[rstest]
#[case("weak")]
#[case("lowercase123")]
#[case("UPPERCASE123")]
#[case("NoDigitsHere")]
#[actix_web::test]
async fn weak_passwords_are_never_persisted(
    repository: Arc<InMemoryUserRepository>,
    #[case] password: &str,
) {
    let reply = send(
        &repository,
        create(json!({"username": "Misha", "email": "d@mail.ru", "password": password})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["title"], "Validation Error");
    assert_eq!(stored_count(&repository).await, 0);

    send(&repository, create(misha())).await;
    let reply = send(
        &repository,
        test::TestRequest::put()
            .uri("/users/1")
            .set_json(json!({"password": password})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    let stored = repository.list().await.expect("list users");
    assert_eq!(stored[0].password().expose(), "Abcdef12");
}

#[rstest]
#[actix_web::test]
async fn conflicting_update_leaves_target_unchanged(repository: Arc<InMemoryUserRepository>) {
    send(&repository, create(misha())).await;
    send(
        &repository,
        create(json!({"username": "Grisha", "email": "g@mail.ru", "password": "Abcdef12"})),
    )
    .await;

    let reply = send(
        &repository,
        test::TestRequest::put()
            .uri("/users/2")
            .set_json(json!({"username": "Grisha_2", "email": "d@mail.ru"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&repository, test::TestRequest::get().uri("/users/2")).await;
    assert_eq!(
        reply.body,
        json!({"id": 2, "username": "Grisha", "email": "g@mail.ru"})
    );
}

#[rstest]
#[actix_web::test]
async fn updating_with_own_values_is_not_a_conflict(repository: Arc<InMemoryUserRepository>) {
    send(&repository, create(misha())).await;

    let reply = send(
        &repository,
        test::TestRequest::put()
            .uri("/users/1")
            .set_json(json!({"username": "Misha", "email": "d@mail.ru"})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn delete_returns_the_removed_user(repository: Arc<InMemoryUserRepository>) {
    send(&repository, create(misha())).await;

    let reply = send(&repository, test::TestRequest::delete().uri("/users/1")).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.body,
        json!({"id": 1, "username": "Misha", "email": "d@mail.ru"})
    );
    assert_eq!(stored_count(&repository).await, 0);
}

#[rstest]
#[case(test::TestRequest::get().uri("/users/abc"))]
#[case(test::TestRequest::post().uri("/users").set_payload("not json").insert_header(("content-type", "application/json")))]
#[actix_web::test]
async fn malformed_requests_are_validation_problems(
    repository: Arc<InMemoryUserRepository>,
    #[case] request: test::TestRequest,
) {
    let reply = send(&repository, request).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["type"], "https://example.com/errors/validation");
    assert_eq!(reply.body["detail"], "An error occurred");
}

#[rstest]
#[actix_web::test]
async fn unknown_routes_are_http_errors(repository: Arc<InMemoryUserRepository>) {
    let reply = send(&repository, test::TestRequest::get().uri("/does-not-exist")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["title"], "HTTP Error");
    assert_eq!(reply.body["type"], "about:blank");
}

#[rstest]
#[actix_web::test]
async fn openapi_document_lists_user_paths(repository: Arc<InMemoryUserRepository>) {
    let reply = send(&repository, test::TestRequest::get().uri("/openapi.json")).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["paths"].get("/users").is_some());
    assert!(reply.body["paths"].get("/health").is_none());
}
