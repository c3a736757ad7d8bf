use std::sync::Arc;

use tasker_onboarding::config::{ApiConfig, EngineConfig};
use tasker_onboarding::engine::OnboardingEngine;
use tasker_onboarding::record::TOTAL_STEPS;
use tasker_onboarding::store::{DraftStore, LibSqlDraftStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let engine_config = EngineConfig::from_env();
    let api_config = ApiConfig::from_env();

    eprintln!("Tasker onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", api_config.base_url);
    eprintln!("   Draft DB: {}", engine_config.db_path);

    let store: Arc<dyn DraftStore> = Arc::new(
        LibSqlDraftStore::new_local(std::path::Path::new(&engine_config.db_path)).await?,
    );

    let engine = OnboardingEngine::rehydrate(store).await;
    let record = engine.snapshot().await;

    eprintln!(
        "   Draft: step {}/{} ({})",
        record.current_step.number(),
        TOTAL_STEPS,
        record.current_step
    );

    let sections = [
        ("bio", !record.bio.trim().is_empty()),
        ("phone", !record.phone.trim().is_empty()),
        (
            "location",
            !record.location.region.trim().is_empty()
                && !record.location.city.trim().is_empty(),
        ),
        ("skills", !record.skills.is_empty()),
        ("profile photo", !record.profile_image.is_empty()),
        ("identity document", !record.id_card.file.is_empty()),
    ];
    for (name, filled) in sections {
        eprintln!("   {} {name}", if filled { "✓" } else { "·" });
    }

    Ok(())
}
