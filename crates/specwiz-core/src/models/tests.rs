//! Tests for the models module.

use std::str::FromStr;

use serde_json::json;

use super::*;

fn summary_json() -> serde_json::Value {
    json!({
        "project_id": 7,
        "steps": [
            {"step_type": "objective", "status": "completed", "approval_status": "approved",
             "last_ai_run_at": "2025-03-01T10:00:00", "last_approved_at": "2025-03-01T10:05:00+00:00",
             "summary": "Ship an MVP", "item_count": 2},
            {"step_type": "tech_stack", "status": "planned", "approval_status": null,
             "last_ai_run_at": null, "last_approved_at": null, "summary": "", "item_count": 0},
            {"step_type": "features", "status": "stale", "summary": null, "item_count": 0},
            {"step_type": "architecture", "status": "failed", "item_count": 0},
            {"step_type": "dod", "status": "completed", "approval_status": "rejected",
             "summary": "Tests pass", "item_count": 4}
        ]
    })
}

fn detail_json() -> serde_json::Value {
    json!({
        "project_id": 7,
        "objectives": [
            {"id": 1, "title": "Ship an MVP", "text": "Get to users fast", "is_selected": true,
             "priority_score": 5, "recommendation_type": "critical",
             "advantages": ["focus"], "disadvantages": null, "conflicts_with": null,
             "requires": [2], "category_exclusive": false},
            {"id": 2, "title": "Collect feedback", "text": null, "is_selected": false}
        ],
        "tech_stack": [
            {"id": 3, "frontend": {"name": "Next.js"}, "backend": {"name": "FastAPI"},
             "database": null, "infra": null, "analytics": null, "ci_cd": null,
             "is_selected": false, "rationale": "Team knows it"}
        ],
        "features": [],
        "architecture": [
            {"id": 4, "name": "API Gateway", "layer": "backend", "description": "Routes calls",
             "is_selected": true}
        ],
        "dod_items": [
            {"id": 5, "description": "Tests pass", "category": "testing", "is_selected": true,
             "category_exclusive": true},
            {"id": 6, "description": "Docs written", "category": "testing", "is_selected": false}
        ],
        "nfr_items": [{"id": 7, "type": "performance", "description": "p95 < 200ms", "is_selected": false}],
        "risk_items": [{"id": 8, "description": "Vendor lock-in", "is_selected": true}]
    })
}

fn state() -> WizardState {
    let summary: WizardSummary = serde_json::from_value(summary_json()).expect("summary decodes");
    let detail: WizardDetail = serde_json::from_value(detail_json()).expect("detail decodes");
    WizardState::new(summary, detail)
}

#[test]
fn test_summary_decodes_dod_as_quality() {
    let summary: WizardSummary = serde_json::from_value(summary_json()).expect("summary decodes");
    assert_eq!(summary.steps.len(), 5);

    let quality = summary.step(StepType::Quality).expect("quality present");
    assert_eq!(quality.approval_status, Some(ApprovalStatus::Rejected));
    assert_eq!(quality.item_count, 4);

    let features = summary.step(StepType::Features).expect("features present");
    assert_eq!(features.status, StepStatus::Stale);
    assert_eq!(features.summary, "");
    assert_eq!(features.approval_status, None);

    let objective = summary.step(StepType::Objective).expect("objective present");
    assert!(objective.last_ai_run_at.is_some());
    assert!(objective.is_approved());
}

#[test]
fn test_detail_decodes_nulls_and_extra_fields() {
    let detail: WizardDetail = serde_json::from_value(detail_json()).expect("detail decodes");

    let objective = &detail.objectives[0];
    assert_eq!(objective.recommendation_type, Some(RecommendationType::Critical));
    assert_eq!(objective.priority_score, Some(5));
    assert!(objective.disadvantages.is_empty());
    assert!(objective.conflicts_with.is_empty());
    assert_eq!(objective.requires, vec![2]);

    let component = &detail.architecture[0];
    assert_eq!(component.extra.get("layer"), Some(&json!("backend")));

    let nfr = &detail.nfr_items[0];
    assert_eq!(nfr.extra.get("type"), Some(&json!("performance")));
    assert!(detail.dod_items[0].category_exclusive);
}

#[test]
fn test_item_labels() {
    let detail: WizardDetail = serde_json::from_value(detail_json()).expect("detail decodes");

    assert_eq!(detail.objectives[0].label(), "Ship an MVP");
    assert_eq!(detail.objectives[0].body(), Some("Get to users fast"));
    assert_eq!(detail.tech_stack[0].label(), "Next.js, FastAPI");
    assert_eq!(detail.tech_stack[0].body(), Some("Team knows it"));
    assert_eq!(detail.architecture[0].body(), Some("Routes calls"));
    assert_eq!(detail.risk_items[0].label(), "Vendor lock-in");
    assert_eq!(detail.risk_items[0].body(), None);
    assert_eq!(Item::new(42, false).label(), "Item 42");
}

#[test]
fn test_step_type_keys_preserve_backend_spelling() {
    assert_eq!(StepType::Quality.api_key(), "dod");
    assert_eq!(StepType::Quality.run_segment(), "quality");
    assert_eq!(StepType::TechStack.api_key(), "tech_stack");
    assert_eq!(StepType::TechStack.run_segment(), "tech-stack");
    assert_eq!(StepType::Features.item_types(), &[ItemType::Feature]);
    assert_eq!(ItemType::Feature.as_str(), "feature");
    assert_eq!(ItemType::Feature.step_type(), StepType::Features);
}

#[test]
fn test_step_type_from_str() {
    assert_eq!(StepType::from_str("dod"), Ok(StepType::Quality));
    assert_eq!(StepType::from_str("Tech-Stack"), Ok(StepType::TechStack));
    assert!(StepType::from_str("epics").is_err());
    assert!(ItemType::from_str("features").is_err());
    assert_eq!(ItemType::from_str("RISK"), Ok(ItemType::Risk));
}

#[test]
fn test_every_item_type_maps_back_to_its_step() {
    for step_type in StepType::ALL {
        for item_type in step_type.item_types() {
            assert_eq!(item_type.step_type(), step_type);
        }
    }
    let covered: usize = StepType::ALL.iter().map(|s| s.item_types().len()).sum();
    assert_eq!(covered, ItemType::ALL.len());
}

#[test]
fn test_quality_item_count_sums_three_types() {
    let mut detail = WizardDetail::empty(1);
    detail.dod_items = vec![Item::new(1, false), Item::new(2, false)];
    detail.nfr_items = vec![Item::new(3, false)];
    detail.risk_items = vec![Item::new(4, false)];
    let state = WizardState::new(
        WizardSummary {
            project_id: 1,
            steps: vec![],
        },
        detail,
    );
    assert_eq!(state.derived_item_count(StepType::Quality), 4);
}

#[test]
fn test_selection_counts_are_derived() {
    let state = state();
    assert_eq!(
        state.selection(StepType::Objective),
        SelectionCount {
            selected: 1,
            total: 2
        }
    );
    assert_eq!(
        state.selection(StepType::Quality),
        SelectionCount {
            selected: 2,
            total: 4
        }
    );
    assert_eq!(state.item_selection(ItemType::Nfr).selected, 0);
    assert!(state.selection(StepType::Features).is_empty());
}

#[test]
fn test_views_follow_wizard_order() {
    let state = state();
    let views = state.views(Some(StepType::Architecture));
    let order: Vec<StepType> = views.iter().map(|v| v.step_type).collect();
    assert_eq!(order, StepType::ALL.to_vec());

    let objective = &views[0];
    assert!(!objective.locked);
    assert!(objective.approved);
    assert!(!objective.can_approve());

    let architecture = &views[3];
    assert!(architecture.running);
    assert!(!architecture.can_run());

    let quality = &views[4];
    assert!(!quality.approved);
    assert!(quality.can_approve());
}

#[test]
fn test_view_of_unreported_step_is_planned() {
    let state = WizardState::new(
        WizardSummary {
            project_id: 3,
            steps: vec![],
        },
        WizardDetail::empty(3),
    );
    let view = state.view(StepType::Features, None);
    assert_eq!(view.status, StepStatus::Planned);
    assert!(view.locked);
    assert!(!view.can_run());
}

#[test]
fn test_job_status_terminal() {
    let job: Job = serde_json::from_value(json!({
        "id": 9, "type": "task_pipeline_for_sprint", "status": "running",
        "progress_pct": 40, "current_step": "pass2", "created_at": "2025-03-01T10:00:00Z"
    }))
    .expect("job decodes");
    assert_eq!(job.kind, "task_pipeline_for_sprint");
    assert_eq!(job.progress_pct, Some(40.0));
    assert!(!job.status.is_terminal());
    assert!(JobStatus::Cancelled.is_terminal());
}

#[test]
fn test_approval_ack_decodes_dod_step() {
    let ack: ApprovalAck = serde_json::from_value(json!({
        "project_id": 7, "step_type": "dod", "approval_status": "approved",
        "last_approved_at": "2025-03-01T10:05:00.123456+00:00",
        "message": "Step dod approved successfully"
    }))
    .expect("ack decodes");
    assert_eq!(ack.step_type, StepType::Quality);
    assert_eq!(ack.approval_status, Some(ApprovalStatus::Approved));
}

#[test]
fn test_item_recommendation_decodes_leniently() {
    let detail: WizardDetail = serde_json::from_value(json!({
        "project_id": 7,
        "objectives": [
            {"id": 1, "is_selected": false, "recommendation_type": "Recommended"},
            {"id": 2, "is_selected": false, "recommendation_type": " CRITICAL "}
        ],
        "features": [
            {"id": 3, "is_selected": true, "recommendation_type": "nice_to_have"},
            {"id": 4, "is_selected": false, "recommendation_type": 3},
            {"id": 5, "is_selected": false, "recommendation_type": null}
        ]
    }))
    .expect("detail decodes");

    assert_eq!(
        detail.objectives[0].recommendation_type,
        Some(RecommendationType::Recommended)
    );
    assert!(detail.objectives[1].is_critical());
    for feature in &detail.features {
        assert_eq!(feature.recommendation_type, None, "item {}", feature.id);
    }
}

#[test]
fn test_item_priority_score_is_not_range_checked() {
    let detail: WizardDetail = serde_json::from_value(json!({
        "project_id": 7,
        "features": [
            {"id": 3, "is_selected": false, "priority_score": 300},
            {"id": 4, "is_selected": false, "priority_score": -1}
        ]
    }))
    .expect("detail decodes");

    assert_eq!(detail.features[0].priority_score, Some(300));
    assert_eq!(detail.features[1].priority_score, Some(-1));
}

#[test]
fn test_odd_item_metadata_keeps_state_loadable() {
    let mut detail = detail_json();
    detail["features"] = json!([
        {"id": 9, "is_selected": true, "name": "Export", "priority_score": 999,
         "recommendation_type": "Nice To Have"}
    ]);
    let summary: WizardSummary = serde_json::from_value(summary_json()).expect("summary decodes");
    let detail: WizardDetail = serde_json::from_value(detail).expect("detail decodes");
    let state = WizardState::new(summary, detail);

    let features = state.items(ItemType::Feature);
    assert_eq!(features.len(), 1);
    assert!(!features[0].is_critical());
}
