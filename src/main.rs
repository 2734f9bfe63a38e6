use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::time::Duration;

use dth_client::api_client::ApiClient;
use dth_client::config::AppConfig;
use dth_client::logging;
use dth_client::poller::Poller;
use dth_client::session_state::SessionState;

/// Diagnostics front-end for the Dream Team House backend: resolves the
/// service addresses, takes a snapshot of document, edits, chat and
/// analytics, and optionally keeps polling.
#[derive(Parser, Debug)]
#[command(name = "dth-client", version, about = "Dream Team House backend diagnostics")]
struct Args {
    /// Override Text API base URL
    #[arg(short = 'u', long = "api-url", value_name = "url")]
    api_url: Option<String>,

    /// Override Chat API base URL
    #[arg(short = 'c', long = "chat-url", value_name = "url")]
    chat_url: Option<String>,

    /// Override Analytics API base URL
    #[arg(short = 'a', long = "analytics-url", value_name = "url")]
    analytics_url: Option<String>,

    /// Analytics period to query (1h, 24h, 7d)
    #[arg(long, default_value = "1h")]
    period: String,

    /// Document to inspect; empty means whatever the backend considers current
    #[arg(long, default_value = "")]
    document_id: String,

    /// Create a document with this topic before the first snapshot
    #[arg(long, value_name = "topic")]
    init: Option<String>,

    /// Initial text for --init
    #[arg(long, default_value = "")]
    initial_text: String,

    /// Repeat the snapshot every N seconds until interrupted
    #[arg(long, value_name = "seconds")]
    watch: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing();

    let mut config = AppConfig::load();
    if let Some(url) = args.api_url {
        config.text_api_url = url;
    }
    if let Some(url) = args.chat_url {
        config.chat_api_url = url;
    }
    if let Some(url) = args.analytics_url {
        config.analytics_api_url = url;
    }

    let client = ApiClient::new(&config)?;
    let state = SessionState::new();
    state.set_document_id(&args.document_id);

    println!("dth-client {}", config.version);
    println!("  text api:      {}", client.text_api_base());
    println!("  chat api:      {}", client.chat_api_base());
    println!("  analytics api: {}", client.analytics_api_base());

    if let Some(topic) = &args.init {
        match client.init_document(topic, &args.initial_text).await {
            Ok(init) => {
                println!("created document {} ({})", init.document_id, init.status);
                state.set_document_id(&init.document_id);
            }
            Err(err) => println!("init failed: {}", err),
        }
    }

    match args.watch {
        Some(seconds) => {
            let interval = Duration::from_secs(seconds.max(1));
            let client = client.clone();
            let state = state.clone();
            let period = args.period.clone();
            let _poller = Poller::spawn(interval, move || {
                let client = client.clone();
                let state = state.clone();
                let period = period.clone();
                async move {
                    snapshot(&client, &state, &period).await;
                }
            });
            tokio::signal::ctrl_c().await?;
        }
        None => snapshot(&client, &state, &args.period).await,
    }

    Ok(())
}

/// One round of the polling cycle the desktop windows run on a timer:
/// current document, recent edits, unread chat, analytics. Failures are
/// printed the way a status line would show them and never stop the run.
async fn snapshot(client: &ApiClient, state: &SessionState, period: &str) {
    let document_id = state.document_id();
    println!("--- {} ---", Local::now().format("%H:%M:%S"));

    match client.fetch_document(&document_id).await {
        Ok(doc) => println!(
            "document {} v{} \"{}\" ({} chars, updated {})",
            doc.document_id,
            doc.version,
            doc.topic,
            doc.text.len(),
            doc.timestamp
        ),
        Err(err) => println!("document: {}", err),
    }

    match client.fetch_edits(&document_id, 0, 20).await {
        Ok(edits) => {
            println!("edits: {}", edits.len());
            for edit in edits.iter().take(5) {
                println!(
                    "  {} {} {} [{}] {} tokens",
                    edit.created_at, edit.agent_id, edit.operation, edit.status, edit.tokens_used
                );
            }
        }
        Err(err) => println!("edits: {}", err),
    }

    match client
        .fetch_chat_messages(&document_id, &state.last_chat_since(), 100)
        .await
    {
        Ok(messages) => {
            println!("chat: {} new", messages.len());
            for message in &messages {
                println!("  {} {}: {}", message.timestamp, message.agent_id, message.message);
            }
            state.advance_chat_watermark(&messages);
        }
        Err(err) => println!("chat: {}", err),
    }

    match client.fetch_analytics(period).await {
        Ok(metrics) => println!(
            "analytics[{}]: {} edits, {} tokens, {} agents, {:.1} ms avg, {:.2} edits/min, {} samples",
            period,
            metrics.total_edits,
            metrics.total_tokens,
            metrics.active_agents,
            metrics.avg_latency_ms,
            metrics.edits_per_minute,
            metrics.token_usage_by_time.len()
        ),
        Err(err) => println!("analytics: {}", err),
    }
}
