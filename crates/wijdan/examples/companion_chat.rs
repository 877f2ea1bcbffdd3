//! # Companion Chat Demo
//!
//! Runs a short scripted conversation through the affect subsystem:
//!
//! - Emotion, topic and cultural register of each message
//! - Recall of relevant earlier turns
//! - Empathetic replies with quality metadata
//! - Memory statistics and emotional analytics
//! - Snapshot save and reload
//!
//! ## Run This Example
//!
//! ```bash
//! RUST_LOG=info cargo run --example companion_chat
//!
//! # Keep the snapshot somewhere else
//! WIJDAN_SNAPSHOT_PATH=/tmp/wijdan.json cargo run --example companion_chat
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;
use wijdan::prelude::*;

const SCRIPT: [&str; 6] = [
    "السلام عليكم، اسمي سارة",
    "والله فرحان مبسوط سعيد! حصلت على وظيفة أحلامي",
    "بس خايف من أول يوم دوام ومتوتر",
    "أمي تقول لا تخاف، الله معك",
    "أحس إني حزين ومتضايق شوي",
    "فرحان مبسوط بالوظيفة الجديدة",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("=== Wijdan Companion Chat Demo ===\n");

    let config = AffectConfig::from_env()?;
    let mut manager = AffectManager::new(config)?.with_file_snapshots();

    if manager.load_snapshot().await? {
        info!(turns = manager.memory().len(), "Resumed earlier conversation");
    }

    for message in SCRIPT {
        let reply = manager.respond(message);

        info!("👤 {}", message);
        info!(
            emotion = %reply.state.primary_emotion,
            intensity = reply.state.intensity,
            context = %reply.state.cultural_context,
            dominant = %reply.state.dominant_emotion,
            "State"
        );
        for turn in &reply.relevant {
            info!(emotion = %turn.emotion, "  ↺ {}", turn.user_text);
        }
        info!(
            template = reply.response.metadata.template.as_deref().unwrap_or("default"),
            quality = reply.response.metadata.response_quality,
            resonance = reply.response.metadata.emotional_resonance,
            "🤖 {}",
            reply.response.text
        );
        info!("");
    }

    let hints = manager.response_hints("فرحان بالوظيفة");
    info!(
        tone = %hints.suggested_tone,
        triggers = hints.memory_triggers.len(),
        "Hints for a follow-up message"
    );

    let stats = manager.memory().stats();
    info!(
        total = stats.total_conversations,
        emotion = stats.most_common_emotion.as_deref().unwrap_or("-"),
        topic = stats.most_discussed_topic.as_deref().unwrap_or("-"),
        important = stats.high_importance_memories,
        "Memory statistics"
    );

    if let Some(analytics) = manager.engine().analytics() {
        info!(
            interactions = analytics.total_interactions,
            average_quality = analytics.average_response_quality,
            effectiveness = analytics.empathy_effectiveness,
            "Emotional analytics"
        );
    }

    manager.save_snapshot().await?;
    info!(path = %manager.config().snapshot_path.display(), "Snapshot saved");

    Ok(())
}
