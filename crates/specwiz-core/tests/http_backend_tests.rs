use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;
use specwiz_core::{
    backend::{HttpBackend, JobBackend, WizardBackend},
    models::{ApprovalStatus, ItemType, JobStatus, StepStatus, StepType},
    EngineBuilder, WizardError,
};

fn backend(server: &Server) -> HttpBackend {
    HttpBackend::new(server.url(), Duration::from_secs(5)).expect("Failed to create client")
}

#[tokio::test]
async fn test_load_decodes_summary_and_detail() {
    let mut server = Server::new_async().await;
    let summary = server
        .mock("GET", "/projects/4/spec-wizard/summary")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "project_id": 4,
                "steps": [
                    {
                        "step_type": "objective",
                        "status": "completed",
                        "approval_status": "approved",
                        "item_count": 1,
                        "summary": null,
                        "last_ai_run_at": "2026-03-01T09:30:00Z",
                        "last_approved_at": "2026-03-01T10:00:00Z"
                    },
                    {
                        "step_type": "dod",
                        "status": "stale",
                        "item_count": 0
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let detail = server
        .mock("GET", "/projects/4/spec-wizard/detail")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "project_id": 4,
                "objectives": [{"id": 1, "is_selected": true, "title": "Ship it"}],
                "features": [{
                    "id": 9,
                    "is_selected": false,
                    "name": "Dark mode",
                    "recommendation_type": "optional",
                    "advantages": null,
                    "effort": "small"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let engine = EngineBuilder::new()
        .with_api_url(Some(server.url()))
        .build()
        .expect("Failed to build engine");
    let state = engine
        .load_wizard_state(4)
        .await
        .expect("Failed to load state");

    summary.assert_async().await;
    detail.assert_async().await;
    assert!(state.is_approved(StepType::Objective));
    assert_eq!(state.status(StepType::Quality), StepStatus::Stale);
    assert_eq!(state.status(StepType::Features), StepStatus::Planned);

    let features = state.items(ItemType::Feature);
    assert_eq!(features[0].label(), "Dark mode");
    assert!(features[0].advantages.is_empty());
    assert_eq!(features[0].extra["effort"], "small");
}

#[tokio::test]
async fn test_step_endpoints_use_their_own_spellings() {
    let mut server = Server::new_async().await;
    let run = server
        .mock("POST", "/projects/1/steps/tech-stack/run")
        .with_status(200)
        .with_body(r#"{"status": "completed"}"#)
        .create_async()
        .await;
    let reject = server
        .mock("POST", "/projects/1/steps/dod/reject")
        .match_body(Matcher::Json(json!({"feedback": "Add a load test"})))
        .with_status(200)
        .with_body(
            json!({
                "project_id": 1,
                "step_type": "dod",
                "approval_status": "rejected",
                "last_approved_at": null,
                "message": "Step dod rejected with feedback"
            })
            .to_string(),
        )
        .create_async()
        .await;
    let regenerate = server
        .mock("POST", "/projects/1/steps/tech_stack/regenerate")
        .match_body(Matcher::Json(json!({})))
        .with_status(200)
        .with_body(
            json!({
                "project_id": 1,
                "step_type": "tech_stack",
                "approval_status": "pending",
                "message": "Step tech_stack regenerated successfully (now PENDING approval)"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let backend = backend(&server);
    backend
        .run_step(1, StepType::TechStack)
        .await
        .expect("Failed to run step");
    let ack = backend
        .reject_step(1, StepType::Quality, "Add a load test")
        .await
        .expect("Failed to reject step");
    assert_eq!(ack.step_type, StepType::Quality);
    assert_eq!(ack.approval_status, Some(ApprovalStatus::Rejected));
    let ack = backend
        .regenerate_step(1, StepType::TechStack, None)
        .await
        .expect("Failed to regenerate step");
    assert_eq!(ack.approval_status, Some(ApprovalStatus::Pending));

    run.assert_async().await;
    reject.assert_async().await;
    regenerate.assert_async().await;
}

#[tokio::test]
async fn test_item_endpoints() {
    let mut server = Server::new_async().await;
    let toggle = server
        .mock("POST", "/items/nfr/12/toggle-select")
        .match_body(Matcher::Json(json!({"project_id": 3})))
        .with_status(200)
        .with_body(
            json!({
                "project_id": 3,
                "item_type": "nfr",
                "item_id": 12,
                "is_selected": true,
                "message": "Item selection toggled"
            })
            .to_string(),
        )
        .create_async()
        .await;
    let select_all = server
        .mock("POST", "/projects/3/items/risk/select-all")
        .with_status(200)
        .with_body(
            json!({
                "project_id": 3,
                "item_type": "risk",
                "updated_count": 2,
                "selected_count": 4,
                "total_count": 4
            })
            .to_string(),
        )
        .create_async()
        .await;

    let backend = backend(&server);
    let ack = backend
        .toggle_item(3, ItemType::Nfr, 12)
        .await
        .expect("Failed to toggle item");
    assert!(ack.is_selected);
    let ack = backend
        .select_all_items(3, ItemType::Risk)
        .await
        .expect("Failed to select all");
    assert_eq!(ack.updated_count, 2);

    toggle.assert_async().await;
    select_all.assert_async().await;
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/projects/1/steps/features/approve")
        .with_status(400)
        .with_body(r#"{"detail": "At least one item must be selected to approve this step"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/jobs/5")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let backend = backend(&server);
    let err = backend
        .approve_step(1, StepType::Features)
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::Backend { status: Some(400), .. }));
    assert_eq!(
        err.to_string(),
        "At least one item must be selected to approve this step"
    );

    let err = backend.get_job(5).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "Bad Gateway");
}

#[tokio::test]
async fn test_jobs_decode() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/projects/2/jobs")
        .with_status(200)
        .with_body(
            json!([
                {
                    "id": 8,
                    "type": "task_pipeline_for_sprint",
                    "status": "running",
                    "progress_pct": 55.0,
                    "current_step": "estimating",
                    "created_at": "2026-03-02T08:00:00Z"
                },
                {
                    "id": 6,
                    "type": "task_pipeline",
                    "status": "failed",
                    "error_message": "LLM quota exceeded",
                    "finished_at": "2026-03-01T08:00:00Z"
                }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let jobs = backend(&server)
        .list_jobs(2)
        .await
        .expect("Failed to list jobs");
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].kind, "task_pipeline_for_sprint");
    assert_eq!(jobs[0].status, JobStatus::Running);
    assert_eq!(jobs[1].error_message.as_deref(), Some("LLM quota exceeded"));
    assert!(jobs[1].status.is_terminal());
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(2))
        .expect("Failed to create client");
    let err = backend.get_summary(1).await.unwrap_err();
    assert!(matches!(err, WizardError::Http { .. }));
    assert!(err.to_string().contains("Failed to reach http://127.0.0.1:9"));
}
