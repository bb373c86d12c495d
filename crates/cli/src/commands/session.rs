//! `edumentor history` / `edumentor reset` — session housekeeping.

use edumentor_config::AppConfig;
use edumentor_core::session::{Role, SessionId};
use edumentor_core::store::SessionStore;
use edumentor_store::FileStore;

pub async fn history(session: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = FileStore::new(config.memory_path());
    let stored = store.get(&SessionId::from(session)).await;

    if stored.turns.is_empty() && stored.quiz.is_none() {
        println!("  No stored state for session {session:?}.");
        return Ok(());
    }

    println!();
    println!("  Session {session} — {} turns", stored.turns.len());
    println!();
    for turn in &stored.turns {
        let speaker = match turn.role {
            Role::User => "you",
            Role::Assistant => "mentor",
        };
        let local = turn.timestamp.with_timezone(&chrono::Local);
        println!(
            "  [{}] {speaker:>6} | {}",
            local.format("%Y-%m-%d %H:%M:%S"),
            turn.text
        );
    }

    if let Some(quiz) = stored.quiz.as_ref().filter(|q| !q.is_complete()) {
        println!();
        println!(
            "  Quiz in progress: {} (question {}/{})",
            quiz.topic,
            quiz.index + 1,
            quiz.total
        );
    }
    println!();

    Ok(())
}

pub async fn reset(session: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = FileStore::new(config.memory_path());
    store.clear_session(&SessionId::from(session)).await?;
    println!("  Session {session:?} wiped.");
    Ok(())
}
