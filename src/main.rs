use anyhow::Context;
use poker_client::{config, create_session, replay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load config; a path argument overrides POKER_TRANSCRIPT
    let config = config::ClientConfig::from_env();
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.transcript_path.clone());
    tracing::info!(
        "Replaying {} as {} in room {}",
        path,
        config.session.user,
        config.session.room
    );

    let transcript = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read transcript {}", path))?;

    // Mount a headless session and feed it the transcript
    let mut session = create_session(config.session.clone());
    session.mount()?;
    let summary = replay::replay(&mut session, &transcript);

    // Print what the client would have pushed
    for message in session.channel().pushes() {
        let line = serde_json::to_string(message)?;
        println!("{}", line);
    }
    // Followed by the state the table ended in
    println!("{}", serde_json::to_string(session.snapshot())?);

    tracing::info!(
        "Applied {} events, skipped {}, {} surface mutations",
        summary.applied,
        summary.skipped,
        session.surface().mutation_count()
    );

    session.unmount();
    Ok(())
}
