//! The `quizdesk serve` command.

use std::sync::Arc;

use anyhow::{Context, Result};

use quizdesk_core::config::{QuizdeskConfig, TunnelConfig};
use quizdesk_core::results::ResultWriter;
use quizdesk_core::session::{SessionService, TimePolicy};
use quizdesk_server::launcher::{launch, Exposure, LocalOnly};

pub async fn execute(
    mut config: QuizdeskConfig,
    name: &str,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let quiz = super::store(&config).load(name)?;
    let title = quiz.title.clone();
    let question_count = quiz.questions.len();

    let writer = ResultWriter::new(&config.results_dir);
    let service = Arc::new(
        SessionService::new(Arc::new(writer)).with_policy(TimePolicy::from_config(&config)),
    );
    service
        .activate(quiz)
        .with_context(|| format!("quiz {name:?} cannot be served"))?;

    let exposure: Arc<dyn Exposure> = Arc::new(LocalOnly);
    if let Some(notice) = tunnel_notice(&config.tunnel) {
        tracing::warn!("{notice}");
    }

    let handle = launch(&config.bind_address(), service.clone(), exposure).await?;

    println!("Serving {title:?} ({question_count} questions)");
    println!("  Local:  {}", handle.local_url());
    if let Some(url) = handle.public_url() {
        println!("  Public: {url}");
    }
    println!(
        "  Results: {}",
        config.results_dir.join(name).display()
    );
    if config.enforce_time_limit {
        println!(
            "  Late submissions are rejected after {}s of grace.",
            config.grace_seconds
        );
    }
    println!("\nPress Ctrl+C to stop.");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    if let Some(summary) = service.active_summary() {
        println!(
            "\n{} session(s) started, {} submission(s) received.",
            summary.sessions, summary.submitted
        );
    }
    service.deactivate();
    handle.stop().await;
    Ok(())
}

/// Explain why tunnel settings have no effect, if any are set.
fn tunnel_notice(tunnel: &TunnelConfig) -> Option<String> {
    let token = if tunnel.auth_token.is_some() {
        " (tunnel.auth_token is set but unused)"
    } else {
        ""
    };
    if tunnel.enabled {
        Some(format!(
            "a public tunnel was requested but no tunnel provider is available; serving locally{token}"
        ))
    } else if !token.is_empty() {
        Some("tunnel.auth_token is set but unused: no tunnel provider is available".to_string())
    } else {
        None
    }
}
