//! FairGo Dashboard - terminal front-end
//!
//! Polls the kernel's `/api/live` endpoint, re-renders the live operations
//! panel on every state change, and routes typed transcripts through the
//! voice dispatcher while a listening session is active.

use anyhow::{Context, Result};
use fairgo_dashboard::config::DashboardConfig;
use fairgo_dashboard::console::{route_line, ConsoleInput, HELP};
use fairgo_dashboard::recognizer::ConsoleRecognizer;
use fairgo_dashboard::surface::TerminalSurface;
use fairgo_dashboard::{view, DispatcherState, RecognizerSettings, SnapshotPoller, VoiceDispatcher};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fairgo_dashboard=info".into()),
        )
        .init();

    let config = DashboardConfig::load().await.unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {:#}", e);
        DashboardConfig::default()
    });
    info!("Polling {} every {}s", config.endpoint, config.refresh_secs);

    let poller = SnapshotPoller::new(config.endpoint.clone(), Duration::from_secs(config.refresh_secs))
        .context("Failed to build snapshot poller")?;
    let handle = poller.spawn();

    // Re-render on every state change
    let mut changes = poller.subscribe();
    let render_poller = poller.clone();
    let render_task = tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            println!("\n{}", view::render(&render_poller.state(), &chrono::Local));
        }
    });

    let recognizer = ConsoleRecognizer::probe(config.voice.enabled);
    let mic = recognizer.clone();
    let settings = RecognizerSettings {
        locale: config.voice.locale.clone(),
        ..RecognizerSettings::default()
    };
    let mut dispatcher = VoiceDispatcher::new(recognizer, TerminalSurface::new(config.sections()), &settings);

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                match route_line(&line, mic.as_ref()) {
                    ConsoleInput::Voice(events) => {
                        for event in events {
                            dispatcher.handle_event(event);
                        }
                        if let Some(status) = dispatcher.last_command() {
                            println!("{}", status);
                        }
                    }
                    ConsoleInput::Refresh => {
                        let poller = poller.clone();
                        tokio::spawn(async move { poller.refresh().await });
                    }
                    ConsoleInput::ToggleVoice => {
                        dispatcher.toggle();
                        match dispatcher.state() {
                            DispatcherState::Listening => println!("Listening… say where to go ([v] to stop)"),
                            DispatcherState::Unsupported => println!("Voice navigation is not supported here."),
                            _ => println!("Voice navigation idle"),
                        }
                    }
                    ConsoleInput::Quit => break,
                    ConsoleInput::Empty => {}
                    ConsoleInput::Help => println!("{}", HELP),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    handle.shutdown().await;
    render_task.abort();
    drop(dispatcher);
    info!("Dashboard stopped");
    Ok(())
}
