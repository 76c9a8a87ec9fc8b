use std::sync::Arc;

use specwiz_core::{
    backend::MemoryBackend,
    models::{Item, ItemType, RecommendationType},
    EngineBuilder, WizardEngine,
};

pub const PROJECT: u64 = 1;

/// Helper function to create an engine over a memory backend
pub fn create_test_engine(backend: MemoryBackend) -> (Arc<MemoryBackend>, WizardEngine) {
    let backend = Arc::new(backend);
    let engine = EngineBuilder::new()
        .with_backend(Arc::clone(&backend))
        .build()
        .expect("Failed to create engine");
    (backend, engine)
}

fn item(id: u64, name: &str, recommendation: RecommendationType) -> Item {
    Item::new(id, false)
        .with_name(name)
        .with_recommendation(recommendation)
}

/// A project where nothing has run yet, with the output of every step staged.
pub fn staged_project() -> MemoryBackend {
    use RecommendationType::{Critical, Optional, Recommended};

    MemoryBackend::new(PROJECT)
        .with_staged_items(
            ItemType::Objective,
            vec![Item {
                title: Some("Launch a self-serve billing portal".into()),
                ..Item::new(1, true)
            }],
        )
        .with_staged_items(
            ItemType::TechStack,
            vec![
                item(1, "Rust + Postgres", Recommended),
                item(2, "Node + MongoDB", Optional),
            ],
        )
        .with_staged_items(
            ItemType::Feature,
            vec![
                item(10, "Invoice history", Critical),
                item(11, "Card updates", Recommended),
                item(12, "PDF export", Optional),
            ],
        )
        .with_staged_items(
            ItemType::Architecture,
            vec![
                item(20, "API gateway", Recommended),
                item(21, "Billing worker", Recommended),
            ],
        )
        .with_staged_items(ItemType::Dod, vec![item(30, "Unit tests pass", Critical)])
        .with_staged_items(ItemType::Nfr, vec![item(40, "p95 under 300ms", Optional)])
        .with_staged_items(ItemType::Risk, vec![item(50, "PCI scope creep", Critical)])
}
