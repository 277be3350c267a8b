//! Datachat - Conversational data analysis client
//!
#![doc = "Main entry point for the Datachat terminal client."]

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use datachat::backend::HttpBackend;
use datachat::cli::Cli;
use datachat::config::Config;
use datachat::coordinator::{RequestCoordinator, Submission};
use datachat::display;
use datachat::progress::ProgressChannel;
use datachat::session::{Role, Session};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let session = Arc::new(Mutex::new(Session::new()));
    let session_id = session.lock().await.id().to_string();
    tracing::info!(%session_id, "Session started");

    let backend = HttpBackend::new(&config.backend)?;
    let coordinator =
        RequestCoordinator::new(Arc::clone(&session), backend, config.display.clone());

    // The progress stream is advisory; run without it if it cannot connect
    let mut progress = match ProgressChannel::connect(&config.backend, &session_id).await {
        Ok(channel) => Some(channel),
        Err(e) => {
            tracing::warn!(error = %e, "Progress stream unavailable, continuing without it");
            None
        }
    };

    if cli.session_greeting {
        print_greeting(&config);
    }

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline(&"datachat> ".green().bold().to_string()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match trimmed {
                    "exit" | "quit" => break,
                    "help" => {
                        print_help();
                        continue;
                    }
                    "data" => {
                        show_dataset(&session, &config).await;
                        continue;
                    }
                    "charts" => {
                        show_charts(&session, &config).await;
                        continue;
                    }
                    _ => {}
                }

                let submission =
                    run_request(&coordinator, progress.as_mut(), trimmed).await?;
                match submission {
                    Submission::Accepted => {
                        show_reply(&session).await;
                        show_dataset(&session, &config).await;
                        show_charts(&session, &config).await;
                    }
                    Submission::RejectedBusy => {
                        println!("{}", "A request is already in flight.".yellow());
                    }
                    Submission::RejectedEmpty => {}
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                tracing::error!(error = %e, "Readline failure");
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Drive one request while relaying progress events as they arrive
async fn run_request<B: datachat::AnalysisBackend>(
    coordinator: &RequestCoordinator<B>,
    mut progress: Option<&mut ProgressChannel>,
    text: &str,
) -> Result<Submission> {
    // Events that arrived while the REPL sat at the prompt are stale; route
    // them through the coordinator's filter now, before the new request
    // starts, so they cannot be replayed into the coming cycle.
    if let Some(channel) = progress.as_deref_mut() {
        for event in channel.drain() {
            coordinator.apply_progress(&event).await;
        }
    }

    let submit = coordinator.submit(text);
    tokio::pin!(submit);

    loop {
        let event = match progress.as_deref_mut() {
            Some(channel) => {
                tokio::select! {
                    result = &mut submit => return Ok(result?),
                    event = channel.recv() => event,
                }
            }
            None => return Ok(submit.await?),
        };

        match event {
            Some(event) => {
                coordinator.apply_progress(&event).await;
                let session = coordinator.session();
                let session = session.lock().await;
                if session.in_flight() && !session.progress_text().is_empty() {
                    println!("{}", session.progress_text().dimmed());
                }
            }
            None => {
                tracing::debug!("Progress stream ended");
                progress = None;
            }
        }
    }
}

async fn show_reply(session: &Arc<Mutex<Session>>) {
    let session = session.lock().await;
    if let Some(message) = session
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::Bot)
    {
        println!("{} {}", "bot:".cyan().bold(), message.content);
    }
}

async fn show_dataset(session: &Arc<Mutex<Session>>, config: &Config) {
    let session = session.lock().await;
    if let Some(dataset) = session.dataset() {
        display::print_dataset(dataset, &config.display);
    }
}

async fn show_charts(session: &Arc<Mutex<Session>>, config: &Config) {
    let session = session.lock().await;
    let specs = session.charts().rendered_specs(config.display.max_charts);
    display::print_charts(&specs);
}

fn print_greeting(config: &Config) {
    println!("{}", "Datachat".cyan().bold());
    println!("Connected to {}", config.backend.url.cyan());
    println!("Ask a question about your data, or type 'help'.\n");
}

fn print_help() {
    println!("Commands:");
    println!("  data     Show the current dataset");
    println!("  charts   Show the current chart summaries");
    println!("  help     Show this help");
    println!("  exit     Quit");
    println!("Anything else is sent to the analysis backend as a question.");
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("datachat=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
