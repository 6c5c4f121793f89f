mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Request, http::StatusCode, Router};
use common::memory_stores;
use org_info::api::rest::routes::register_routes;
use org_info::ctx::OpCtx;
use org_info::domain::error::{DomainError, ErrorKind};
use org_info::domain::repo::DepartmentRepository;
use org_info::domain::service::{Service, ServiceConfig};
use org_info::model::Department;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// Department store that never answers in time.
struct StalledDepartments;

#[async_trait]
impl DepartmentRepository for StalledDepartments {
    async fn save(&self, _department: Department) -> Result<(), DomainError> {
        stall().await
    }

    async fn find_by_id(&self, _id: &str) -> Result<Department, DomainError> {
        stall().await
    }

    async fn find_all(&self) -> Result<Vec<Department>, DomainError> {
        stall().await
    }

    async fn update(&self, _department: Department) -> Result<Department, DomainError> {
        stall().await
    }

    async fn delete(&self, _id: &str) -> Result<(), DomainError> {
        stall().await
    }
}

async fn stall<T>() -> Result<T, DomainError> {
    tokio::time::sleep(Duration::from_secs(3600)).await;
    Err(DomainError::store_unavailable("stalled store finally answered"))
}

fn stalled_service() -> Arc<Service> {
    let s = memory_stores();
    Arc::new(Service::new(
        Arc::new(StalledDepartments),
        s.employees,
        s.projects,
        ServiceConfig::default(),
    ))
}

#[tokio::test(start_paused = true)]
async fn deadline_surfaces_as_timed_out_store_unavailable() {
    let svc = stalled_service();
    let ctx = OpCtx::with_timeout(Duration::from_millis(200));

    let err = svc.list_departments(&ctx).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert!(err.is_retryable());
    match err {
        DomainError::StoreUnavailable { timed_out, message } => {
            assert!(timed_out);
            assert!(message.contains("department.find_all"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_aborts_the_cascade() {
    let svc = stalled_service();
    let token = CancellationToken::new();
    let ctx = OpCtx::new().with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });
    let err = svc
        .delete_department(&ctx, &uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    canceller.await.unwrap();

    match err {
        DomainError::StoreUnavailable { timed_out, message } => {
            assert!(!timed_out);
            assert!(message.contains("cancelled"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn already_cancelled_context_never_reaches_the_store() {
    let svc = stalled_service();
    let token = CancellationToken::new();
    token.cancel();
    let ctx = OpCtx::new().with_cancellation(token);

    let err = svc.get_department(&ctx, "whatever").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
}

#[tokio::test(start_paused = true)]
async fn rest_request_past_its_deadline_is_503() {
    let app = register_routes(Router::new(), stalled_service(), Duration::from_millis(100));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/departments")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let problem: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(problem["code"], "STORE_TIMEOUT");
    assert_eq!(problem["retryable"], true);
}
