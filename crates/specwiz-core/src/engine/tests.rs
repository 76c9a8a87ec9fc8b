//! Tests for the engine module.

use std::sync::Arc;

use super::*;
use crate::{
    backend::memory::{BackendCall, FeedbackRecord, MemoryBackend, Operation},
    models::{ApprovalStatus, Item, ItemType, RecommendationType, StepStatus, StepSummary},
    params::{ItemCommand, ListItems, ProjectId, RejectStep, StepCommand},
    selection::{ItemFilter, SmartSelection},
};

const PROJECT: u64 = 1;

fn completed(step_type: StepType) -> StepSummary {
    StepSummary {
        status: StepStatus::Completed,
        approval_status: Some(ApprovalStatus::Pending),
        ..StepSummary::planned(step_type)
    }
}

fn approved(step_type: StepType) -> StepSummary {
    StepSummary {
        approval_status: Some(ApprovalStatus::Approved),
        ..completed(step_type)
    }
}

fn items(ids: &[(u64, bool)]) -> Vec<Item> {
    ids.iter()
        .map(|(id, selected)| Item::new(*id, *selected).with_name(format!("Item {id}")))
        .collect()
}

/// Helper function to create an engine over a seeded memory backend
fn create_test_engine(backend: MemoryBackend) -> (Arc<MemoryBackend>, WizardEngine) {
    let backend = Arc::new(backend);
    let engine = EngineBuilder::new()
        .with_backend(Arc::clone(&backend))
        .build()
        .expect("Failed to build engine");
    (backend, engine)
}

/// Objective approved and features completed with three selected items.
fn features_project() -> MemoryBackend {
    MemoryBackend::new(PROJECT)
        .with_step(approved(StepType::Objective))
        .with_step(completed(StepType::Features))
        .with_items(ItemType::Objective, items(&[(1, true)]))
        .with_items(ItemType::Feature, items(&[(10, true), (20, true), (30, true)]))
}

fn selected_ids(state: &WizardState, item_type: ItemType) -> Vec<u64> {
    state
        .items(item_type)
        .iter()
        .filter(|item| item.is_selected)
        .map(|item| item.id)
        .collect()
}

#[tokio::test]
async fn test_load_replaces_snapshot() {
    let (_backend, engine) = create_test_engine(features_project());
    assert!(engine.state().await.is_none());
    assert!(engine.views().await.is_none());

    let state = engine
        .load_wizard_state(PROJECT)
        .await
        .expect("Failed to load state");

    assert_eq!(state.project_id, PROJECT);
    assert_eq!(state.status(StepType::Features), StepStatus::Completed);
    assert_eq!(state.status(StepType::Quality), StepStatus::Planned);
    assert_eq!(engine.views().await.expect("views").len(), 5);
}

#[tokio::test]
async fn test_load_failure_keeps_previous_snapshot() {
    let (backend, engine) = create_test_engine(features_project());
    let before = engine.load_wizard_state(PROJECT).await.unwrap();

    backend
        .fail_after(Operation::GetDetail, 0, 500, "database unavailable")
        .await;
    let err = engine.load_wizard_state(PROJECT).await.unwrap_err();

    assert!(matches!(err, WizardError::Load { project_id: 1, .. }));
    assert!(err.to_string().contains("database unavailable"));
    let after = engine.state().await.expect("snapshot kept");
    assert!(Arc::ptr_eq(&before, &after));
}

#[tokio::test]
async fn test_unknown_project_fails_to_load() {
    let (_backend, engine) = create_test_engine(features_project());
    let err = engine.run_step(99, StepType::Objective).await.unwrap_err();
    assert!(matches!(err, WizardError::Load { project_id: 99, .. }));
    assert!(err.to_string().contains("Project not found"));
}

#[tokio::test]
async fn test_locked_step_does_not_reach_backend() {
    let (backend, engine) = create_test_engine(MemoryBackend::new(PROJECT));

    for step_type in &StepType::ALL[1..] {
        let err = engine.run_step(PROJECT, *step_type).await.unwrap_err();
        assert!(matches!(err, WizardError::LockedStep { .. }));
        assert!(err.is_client_guard());
    }
    assert!(backend.mutations().await.is_empty());
    assert_eq!(engine.running_step(), None);
}

#[tokio::test]
async fn test_objective_scenario() {
    let backend = MemoryBackend::new(PROJECT)
        .with_staged_items(ItemType::Objective, items(&[(1, false), (2, false)]))
        .with_staged_items(ItemType::TechStack, items(&[(5, false)]));
    let (backend, engine) = create_test_engine(backend);

    let state = engine.run_step(PROJECT, StepType::Objective).await.unwrap();
    assert_eq!(state.status(StepType::Objective), StepStatus::Completed);
    assert!(!state.is_locked(StepType::TechStack));

    let err = engine
        .approve_step(PROJECT, StepType::Objective)
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::NoSelection { .. }));
    assert!(!backend
        .calls()
        .await
        .contains(&BackendCall::ApproveStep(StepType::Objective)));

    let ack = engine
        .toggle_item(PROJECT, ItemType::Objective, 1)
        .await
        .unwrap();
    assert!(ack.is_selected);

    let ack = engine
        .approve_step(PROJECT, StepType::Objective)
        .await
        .unwrap();
    assert_eq!(ack.approval_status, Some(ApprovalStatus::Approved));
    assert_eq!(ack.message, "Step objective approved successfully");

    let state = engine
        .run_step(PROJECT, StepType::TechStack)
        .await
        .unwrap();
    assert!(state.is_approved(StepType::Objective));
    assert_eq!(state.status(StepType::TechStack), StepStatus::Completed);
    assert_eq!(state.items(ItemType::TechStack).len(), 1);
}

#[tokio::test]
async fn test_approve_requires_selection_regardless_of_item_count() {
    let backend = MemoryBackend::new(PROJECT)
        .with_step(completed(StepType::Objective))
        .with_step(completed(StepType::Quality))
        .with_items(ItemType::Dod, items(&[(1, false), (2, false)]))
        .with_items(ItemType::Nfr, items(&[(3, false)]))
        .with_items(ItemType::Risk, items(&[(4, false)]));
    let (backend, engine) = create_test_engine(backend);

    let state = engine.load_wizard_state(PROJECT).await.unwrap();
    assert_eq!(state.derived_item_count(StepType::Quality), 4);

    let err = engine
        .approve_step(PROJECT, StepType::Quality)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WizardError::NoSelection {
            step_type: StepType::Quality
        }
    ));
    assert!(backend.mutations().await.is_empty());
}

#[tokio::test]
async fn test_approve_reloads_summary_only() {
    let (backend, engine) = create_test_engine(features_project());
    engine.load_wizard_state(PROJECT).await.unwrap();
    backend.clear_calls().await;

    engine
        .approve_step(PROJECT, StepType::Features)
        .await
        .unwrap();

    assert_eq!(
        backend.calls().await,
        vec![
            BackendCall::ApproveStep(StepType::Features),
            BackendCall::GetSummary
        ]
    );
    let state = engine.state().await.unwrap();
    assert!(state.is_approved(StepType::Features));
}

#[tokio::test]
async fn test_run_reloads_both_slices_after_mutation() {
    let (backend, engine) = create_test_engine(features_project());
    engine.load_wizard_state(PROJECT).await.unwrap();
    backend.clear_calls().await;

    engine
        .run_step(PROJECT, StepType::Architecture)
        .await
        .unwrap();

    let calls = backend.calls().await;
    assert_eq!(calls[0], BackendCall::RunStep(StepType::Architecture));
    assert_eq!(calls.len(), 3);
    assert!(calls[1..].contains(&BackendCall::GetSummary));
    assert!(calls[1..].contains(&BackendCall::GetDetail));
    assert_eq!(engine.running_step(), None);
}

#[tokio::test]
async fn test_backend_failure_keeps_snapshot() {
    let (backend, engine) = create_test_engine(features_project());
    let before = engine.load_wizard_state(PROJECT).await.unwrap();

    backend
        .fail_next(Operation::ApproveStep, "Step is already approved")
        .await;
    let err = engine
        .approve_step(PROJECT, StepType::Features)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Step is already approved");
    assert_eq!(err.status(), Some(400));
    let after = engine.state().await.unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

#[tokio::test]
async fn test_run_failure_clears_running_step() {
    let (backend, engine) = create_test_engine(features_project());
    backend
        .fail_after(Operation::RunStep, 0, 502, "Model provider timed out")
        .await;

    let err = engine
        .run_step(PROJECT, StepType::Features)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(engine.running_step(), None);
}

#[tokio::test]
async fn test_second_run_is_rejected_while_busy() {
    let (backend, engine) = create_test_engine(features_project());
    engine.load_wizard_state(PROJECT).await.unwrap();

    let guard = engine.begin_run(StepType::Features).unwrap();
    assert_eq!(engine.running_step(), Some(StepType::Features));
    let views = engine.views().await.unwrap();
    assert!(views[StepType::Features.position()].running);

    let err = engine
        .run_step(PROJECT, StepType::Architecture)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WizardError::StepBusy {
            running: StepType::Features,
            requested: StepType::Architecture
        }
    ));
    let err = engine
        .regenerate_step(PROJECT, StepType::Objective, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::StepBusy { .. }));
    assert!(backend.mutations().await.is_empty());

    drop(guard);
    assert_eq!(engine.running_step(), None);
}

#[tokio::test]
async fn test_toggle_twice_restores_selection() {
    let (_backend, engine) = create_test_engine(features_project());

    engine.toggle_item(PROJECT, ItemType::Feature, 20).await.unwrap();
    let state = engine.state().await.unwrap();
    assert_eq!(selected_ids(&state, ItemType::Feature), vec![10, 30]);

    engine.toggle_item(PROJECT, ItemType::Feature, 20).await.unwrap();
    let state = engine.state().await.unwrap();
    assert_eq!(selected_ids(&state, ItemType::Feature), vec![10, 20, 30]);
}

#[tokio::test]
async fn test_select_all_and_deselect_all() {
    let backend = features_project()
        .with_items(ItemType::Feature, items(&[(10, true), (20, false), (30, false)]));
    let (_backend, engine) = create_test_engine(backend);

    let ack = engine
        .select_all_items(PROJECT, ItemType::Feature)
        .await
        .unwrap();
    assert_eq!(ack.updated_count, 2);
    let state = engine.state().await.unwrap();
    let count = state.item_selection(ItemType::Feature);
    assert_eq!(count.selected, count.total);

    let ack = engine
        .deselect_all_items(PROJECT, ItemType::Feature)
        .await
        .unwrap();
    assert_eq!(ack.updated_count, 3);
    assert_eq!(ack.selected_count, 0);
    let state = engine.state().await.unwrap();
    assert_eq!(state.item_selection(ItemType::Feature).selected, 0);
}

#[tokio::test]
async fn test_approved_step_is_read_only() {
    let (backend, engine) = create_test_engine(features_project());
    engine.load_wizard_state(PROJECT).await.unwrap();
    backend.clear_calls().await;

    let results = [
        engine
            .toggle_item(PROJECT, ItemType::Objective, 1)
            .await
            .map(|_| ()),
        engine
            .select_all_items(PROJECT, ItemType::Objective)
            .await
            .map(|_| ()),
        engine
            .deselect_all_items(PROJECT, ItemType::Objective)
            .await
            .map(|_| ()),
        engine
            .bulk_smart_select(PROJECT, ItemType::Objective, &[1], BulkSelectOptions::replace())
            .await
            .map(|_| ()),
    ];

    for result in results {
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            WizardError::ApprovedStep {
                step_type: StepType::Objective,
                item_type: ItemType::Objective
            }
        ));
    }
    assert!(backend.calls().await.is_empty());
}

#[tokio::test]
async fn test_rejected_step_is_writable_again() {
    let (backend, engine) = create_test_engine(features_project());
    engine
        .approve_step(PROJECT, StepType::Features)
        .await
        .unwrap();

    let err = engine
        .toggle_item(PROJECT, ItemType::Feature, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::ApprovedStep { .. }));

    let ack = engine
        .reject_step(PROJECT, StepType::Features, "  Missing offline support  ")
        .await
        .unwrap();
    assert_eq!(ack.approval_status, Some(ApprovalStatus::Rejected));
    assert_eq!(ack.last_approved_at, None);

    engine
        .toggle_item(PROJECT, ItemType::Feature, 10)
        .await
        .unwrap();
    assert_eq!(
        backend.feedback().await,
        vec![FeedbackRecord {
            step_type: StepType::Features,
            regenerate: false,
            text: "Missing offline support".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_reject_requires_feedback() {
    let (backend, engine) = create_test_engine(features_project());

    let err = engine
        .reject_step(PROJECT, StepType::Features, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::InvalidInput { .. }));
    assert!(backend.calls().await.is_empty());
}

#[tokio::test]
async fn test_regenerate_resets_approval_and_items() {
    let backend = features_project()
        .with_step(approved(StepType::Features))
        .with_staged_items(ItemType::Feature, items(&[(40, false), (50, false)]));
    let (backend, engine) = create_test_engine(backend);

    let ack = engine
        .regenerate_step(PROJECT, StepType::Features, Some(" focus on mobile "))
        .await
        .unwrap();
    assert_eq!(
        ack.message,
        "Step features regenerated successfully (now PENDING approval)"
    );

    let state = engine.state().await.unwrap();
    assert!(!state.is_approved(StepType::Features));
    assert_eq!(
        state.step(StepType::Features).unwrap().approval_status,
        Some(ApprovalStatus::Pending)
    );
    assert_eq!(state.item_selection(ItemType::Feature).total, 2);
    assert_eq!(backend.feedback().await[0].text, "focus on mobile");
    assert!(backend.feedback().await[0].regenerate);
}

#[tokio::test]
async fn test_regenerate_without_feedback_sends_none() {
    let (backend, engine) = create_test_engine(features_project());

    engine
        .regenerate_step(PROJECT, StepType::Features, Some("   "))
        .await
        .unwrap();
    assert!(backend.feedback().await.is_empty());
}

#[tokio::test]
async fn test_bulk_select_replaces_selection() {
    let (backend, engine) = create_test_engine(features_project());
    engine.load_wizard_state(PROJECT).await.unwrap();
    backend.clear_calls().await;

    let outcome = engine
        .bulk_smart_select(
            PROJECT,
            ItemType::Feature,
            &[10, 20],
            BulkSelectOptions::replace(),
        )
        .await
        .unwrap();

    assert!(outcome.cleared);
    assert_eq!(outcome.toggled, vec![10, 20]);
    let state = engine.state().await.unwrap();
    assert_eq!(selected_ids(&state, ItemType::Feature), vec![10, 20]);
    assert_eq!(
        backend.calls().await,
        vec![
            BackendCall::DeselectAll(ItemType::Feature),
            BackendCall::ToggleItem(ItemType::Feature, 10),
            BackendCall::ToggleItem(ItemType::Feature, 20),
            BackendCall::GetDetail,
        ]
    );
}

#[tokio::test]
async fn test_bulk_select_preserving_skips_selected_targets() {
    let backend = features_project()
        .with_items(ItemType::Feature, items(&[(10, true), (20, false), (30, false)]));
    let (backend, engine) = create_test_engine(backend);
    engine.load_wizard_state(PROJECT).await.unwrap();
    backend.clear_calls().await;

    let outcome = engine
        .bulk_smart_select(
            PROJECT,
            ItemType::Feature,
            &[10, 20, 20],
            BulkSelectOptions::preserve(),
        )
        .await
        .unwrap();

    assert!(!outcome.cleared);
    assert_eq!(outcome.toggled, vec![20]);
    assert_eq!(outcome.already_selected, vec![10]);
    let state = engine.state().await.unwrap();
    assert_eq!(selected_ids(&state, ItemType::Feature), vec![10, 20]);
    assert!(!backend
        .calls()
        .await
        .contains(&BackendCall::DeselectAll(ItemType::Feature)));
}

#[tokio::test]
async fn test_partial_bulk_failure_still_reloads() {
    let (backend, engine) = create_test_engine(features_project());
    engine.load_wizard_state(PROJECT).await.unwrap();
    backend
        .fail_after(Operation::ToggleItem, 1, 404, "Item not found")
        .await;

    let err = engine
        .bulk_smart_select(
            PROJECT,
            ItemType::Feature,
            &[10, 99, 30],
            BulkSelectOptions::replace(),
        )
        .await
        .unwrap_err();

    match &err {
        WizardError::BulkSelect {
            applied, requested, ..
        } => {
            assert_eq!(*applied, 1);
            assert_eq!(*requested, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.status(), Some(404));
    assert_eq!(backend.calls().await.last(), Some(&BackendCall::GetDetail));

    let state = engine.state().await.unwrap();
    assert_eq!(selected_ids(&state, ItemType::Feature), vec![10]);
}

#[tokio::test]
async fn test_smart_select_recommended_keeps_existing() {
    let backend = features_project().with_items(
        ItemType::Feature,
        vec![
            Item::new(10, false).with_recommendation(RecommendationType::Critical),
            Item::new(20, true).with_recommendation(RecommendationType::Recommended),
            Item::new(30, true).with_recommendation(RecommendationType::Optional),
            Item::new(40, false),
        ],
    );
    let (_backend, engine) = create_test_engine(backend);

    let outcome = engine
        .smart_select(PROJECT, ItemType::Feature, SmartSelection::Recommended)
        .await
        .unwrap();

    assert_eq!(outcome.toggled, vec![10]);
    assert_eq!(outcome.already_selected, vec![20]);
    let state = engine.state().await.unwrap();
    assert_eq!(selected_ids(&state, ItemType::Feature), vec![10, 20, 30]);
}

#[tokio::test]
async fn test_smart_select_all_replaces() {
    let backend = features_project()
        .with_items(ItemType::Feature, items(&[(10, true), (20, false)]));
    let (_backend, engine) = create_test_engine(backend);

    let outcome = engine
        .smart_select(PROJECT, ItemType::Feature, SmartSelection::All)
        .await
        .unwrap();

    assert!(outcome.cleared);
    let state = engine.state().await.unwrap();
    assert_eq!(selected_ids(&state, ItemType::Feature), vec![10, 20]);
}

#[tokio::test]
async fn test_selection_summary_is_server_side() {
    let (backend, engine) = create_test_engine(features_project());

    let summary = engine
        .selection_summary(PROJECT, ItemType::Feature)
        .await
        .unwrap();
    assert_eq!((summary.selected_count, summary.total_count), (3, 3));
    assert_eq!(
        backend.calls().await,
        vec![BackendCall::SelectionSummary(ItemType::Feature)]
    );
}

#[tokio::test]
async fn test_validation_is_advisory() {
    let mut first = Item::new(10, true);
    first.conflicts_with = vec![20];
    let backend = features_project()
        .with_items(ItemType::Feature, vec![first, Item::new(20, true)]);
    let (_backend, engine) = create_test_engine(backend);

    let report = engine
        .validate_selection(PROJECT, ItemType::Feature)
        .await
        .unwrap();
    assert_eq!(report.conflicts, vec![20]);

    engine
        .approve_step(PROJECT, StepType::Features)
        .await
        .expect("validation never blocks approval");
}

#[tokio::test]
async fn test_handlers_render_refreshed_state() {
    let (_backend, engine) = create_test_engine(features_project());

    let views = engine
        .show_wizard(&ProjectId {
            project_id: PROJECT,
        })
        .await
        .unwrap();
    assert_eq!(views.len(), 5);

    let result = engine
        .approve_wizard_step(&StepCommand {
            project_id: PROJECT,
            step_type: StepType::Features,
        })
        .await
        .unwrap();
    assert!(result.view.approved);
    assert!(result.to_string().contains("Step features approved successfully"));

    let result = engine
        .reject_wizard_step(&RejectStep {
            project_id: PROJECT,
            step_type: StepType::Features,
            feedback: "Too broad".to_string(),
        })
        .await
        .unwrap();
    assert!(!result.view.approved);
    assert!(result.changes.contains(&"Feedback: Too broad".to_string()));

    let check = engine
        .check_wizard_selection(&ItemCommand {
            project_id: PROJECT,
            item_type: ItemType::Feature,
        })
        .await
        .unwrap();
    assert_eq!(check.stats.selected, 3);
    assert!(check.report.is_clean());
}

#[tokio::test]
async fn test_list_items_applies_filter_without_storing_it() {
    let backend = features_project()
        .with_items(ItemType::Feature, items(&[(10, true), (20, false), (30, true)]));
    let (_backend, engine) = create_test_engine(backend);

    let groups = engine
        .list_wizard_items(&ListItems {
            project_id: PROJECT,
            item_type: Some(ItemType::Feature),
            filter: ItemFilter {
                recommendation: None,
                selected_only: true,
            },
        })
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);

    let all = engine
        .list_wizard_items(&ListItems {
            project_id: PROJECT,
            item_type: None,
            filter: ItemFilter::default(),
        })
        .await
        .unwrap();
    assert_eq!(all.len(), ItemType::ALL.len());
    let features = all
        .iter()
        .find(|group| group.item_type == ItemType::Feature)
        .expect("feature group");
    assert_eq!(features.len(), 3);
}

#[test]
fn test_builder_validates_overrides() {
    let err = EngineBuilder::new()
        .with_timeout_secs(Some(0))
        .build()
        .err()
        .expect("override rejected");
    assert!(matches!(err, WizardError::Configuration { .. }));
    assert!(err.to_string().contains("timeout_secs"));

    let err = EngineBuilder::new()
        .with_api_url(Some("ftp://specs.example.com"))
        .build()
        .err()
        .expect("override rejected");
    assert!(err.to_string().contains("api_url must be an http(s) URL"));

    assert!(EngineBuilder::new()
        .with_api_url(Some("https://specs.example.com"))
        .with_timeout_secs(Some(5))
        .build()
        .is_ok());
}
