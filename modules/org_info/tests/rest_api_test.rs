use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use org_info::config::OrgInfoConfig;
use org_info::infra::storage::InMemoryStore;
use org_info::{OrgInfo, StoreBackend};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    let module = OrgInfo::init(
        OrgInfoConfig::default(),
        StoreBackend::Memory(InMemoryStore::new()),
    );
    module.register_rest(Router::new())
}

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: Value,
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Reply {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    Reply {
        status,
        content_type,
        body,
    }
}

async fn create_department(app: &Router, name: &str) -> String {
    let reply = call(
        app,
        Method::POST,
        "/api/v1/departments",
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body["id"].as_str().unwrap().to_string()
}

async fn create_employee(app: &Router, name: &str, email: &str, department_id: &str) -> Reply {
    call(
        app,
        Method::POST,
        "/api/v1/employees",
        Some(json!({ "name": name, "email": email, "department_id": department_id })),
    )
    .await
}

#[tokio::test]
async fn health_is_ok() {
    let reply = call(&app(), Method::GET, "/health", None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let reply = call(&app(), Method::GET, "/api/v1/openapi.json", None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["paths"]["/api/v1/departments"].is_object());
}

#[tokio::test]
async fn department_crud_over_http() {
    let app = app();

    let id = create_department(&app, "Engineering").await;
    let fetched = call(&app, Method::GET, &format!("/api/v1/departments/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Engineering");

    let renamed = call(
        &app,
        Method::PUT,
        &format!("/api/v1/departments/{id}"),
        Some(json!({ "name": "R&D" })),
    )
    .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["name"], "R&D");

    let listed = call(&app, Method::GET, "/api/v1/departments", None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);

    let deleted = call(&app, Method::DELETE, &format!("/api/v1/departments/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = call(&app, Method::GET, &format!("/api/v1/departments/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_collections_are_empty_arrays() {
    let app = app();

    for uri in ["/api/v1/departments", "/api/v1/employees", "/api/v1/projects"] {
        let reply = call(&app, Method::GET, uri, None).await;
        assert_eq!(reply.status, StatusCode::OK, "{uri}");
        assert_eq!(reply.body, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn malformed_id_is_a_400_problem() {
    let reply = call(&app(), Method::GET, "/api/v1/departments/not-a-uuid", None).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.content_type.as_deref(),
        Some("application/problem+json")
    );
    assert_eq!(reply.body["code"], "INVALID_INPUT");
    assert_eq!(reply.body["instance"], "/api/v1/departments/not-a-uuid");
    assert_eq!(reply.body["errors"][0]["pointer"], "/id");
}

#[tokio::test]
async fn unknown_id_is_a_404_problem() {
    let id = Uuid::new_v4();
    let reply = call(&app(), Method::GET, &format!("/api/v1/employees/{id}"), None).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "NOT_FOUND");
    assert_eq!(reply.body["retryable"], false);
    assert!(reply.body["detail"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn employee_with_unknown_department_is_rejected() {
    let reply = create_employee(
        &app(),
        "Ada",
        "ada@example.com",
        &Uuid::new_v4().to_string(),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["errors"][0]["pointer"], "/department_id");
}

#[tokio::test]
async fn duplicate_email_is_a_409() {
    let app = app();
    let dept = create_department(&app, "Engineering").await;
    let first = create_employee(&app, "Ada", "ada@example.com", &dept).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = create_employee(&app, "Ada Two", "ada@example.com", &dept).await;

    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["code"], "CONFLICT");
}

#[tokio::test]
async fn broken_json_body_is_a_400() {
    let app = app();
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/departments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn department_delete_cascades_to_employees() {
    let app = app();
    let dept = create_department(&app, "Engineering").await;
    let ada = create_employee(&app, "Ada", "ada@example.com", &dept).await;
    let ada_id = ada.body["id"].as_str().unwrap().to_string();

    let staff = call(
        &app,
        Method::GET,
        &format!("/api/v1/departments/{dept}/employees"),
        None,
    )
    .await;
    assert_eq!(staff.body.as_array().unwrap().len(), 1);

    let deleted = call(&app, Method::DELETE, &format!("/api/v1/departments/{dept}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let ada_after = call(&app, Method::GET, &format!("/api/v1/employees/{ada_id}"), None).await;
    assert_eq!(ada_after.status, StatusCode::NOT_FOUND);
    let again = call(&app, Method::DELETE, &format!("/api/v1/departments/{dept}"), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_team_over_http() {
    let app = app();
    let dept = create_department(&app, "Engineering").await;
    let ada = create_employee(&app, "Ada", "ada@example.com", &dept).await;
    let ada_id = ada.body["id"].as_str().unwrap().to_string();

    let created = call(
        &app,
        Method::POST,
        "/api/v1/projects",
        Some(json!({
            "name": "Apollo",
            "start_date": "2024-01-01",
            "end_date": "2024-12-31",
            "budget": 1000.0
        })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["status"], "ACTIVE");
    assert_eq!(created.body["priority"], "MEDIUM");
    let project_id = created.body["id"].as_str().unwrap().to_string();

    let member_uri = format!("/api/v1/projects/{project_id}/members/{ada_id}");
    let added = call(&app, Method::PUT, &member_uri, None).await;
    assert_eq!(added.status, StatusCode::OK);
    assert_eq!(added.body["team_member_ids"], json!([ada_id]));

    let ada_projects = call(
        &app,
        Method::GET,
        &format!("/api/v1/employees/{ada_id}/projects"),
        None,
    )
    .await;
    assert_eq!(ada_projects.body.as_array().unwrap().len(), 1);

    let removed = call(&app, Method::DELETE, &member_uri, None).await;
    assert_eq!(removed.body["team_member_ids"], json!([]));

    let deleted = call(&app, Method::DELETE, &format!("/api/v1/projects/{project_id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn invalid_project_dates_are_a_400() {
    let reply = call(
        &app(),
        Method::POST,
        "/api/v1/projects",
        Some(json!({
            "name": "Backwards",
            "start_date": "2024-12-31",
            "end_date": "2024-01-01",
            "budget": 1000.0
        })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["errors"][0]["pointer"], "/end_date");
}
