use std::{path::PathBuf, time::Duration};

use ambient_core::{
    AmbientAudioController, ControllerEvent, ControllerStatus, ToggleOutcome, ToggleView,
};
use anyhow::{Context, Result};
use audio_output::{SimulatedAudioBackend, SimulatedBehavior};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

/// Mounts the ambient music toggle against a simulated audio output, clicks it
/// a few times, and unmounts.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    asset_path: Option<PathBuf>,
    #[arg(long)]
    probe_timeout_ms: Option<u64>,
    #[arg(long)]
    log_filter: Option<String>,
    /// Simulate an environment that requires a user gesture before playback.
    #[arg(long)]
    autoplay_denied: bool,
    #[arg(long)]
    load_fails: bool,
    #[arg(long)]
    reject_play: bool,
    #[arg(long, default_value_t = 0)]
    probe_delay_ms: u64,
    #[arg(long, default_value_t = 250)]
    load_delay_ms: u64,
    #[arg(long, default_value_t = 0)]
    play_delay_ms: u64,
    #[arg(long, default_value_t = 2)]
    toggles: u32,
    #[arg(long, default_value_t = 500)]
    toggle_interval_ms: u64,
    /// Print one JSON object per line instead of text.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn behavior(&self) -> SimulatedBehavior {
        SimulatedBehavior {
            autoplay_allowed: !self.autoplay_denied,
            load_fails: self.load_fails,
            reject_play: self.reject_play,
            probe_delay: Duration::from_millis(self.probe_delay_ms),
            load_delay: Duration::from_millis(self.load_delay_ms),
            play_delay: Duration::from_millis(self.play_delay_ms),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Line {
    StatusChanged {
        status: ControllerStatus,
        view: ToggleView,
    },
    Toggled {
        click: u32,
        outcome: ToggleOutcome,
        view: ToggleView,
    },
    Unmounted,
}

fn emit(line: &Line, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(line).context("failed to encode line")?);
        return Ok(());
    }

    match line {
        Line::StatusChanged { status, view } => println!(
            "status: load={:?} autoplay={:?} muted={} volume={} playing={} -> {}",
            status.load_state,
            status.autoplay_permission,
            status.muted,
            status.volume,
            status.playing,
            describe(view)
        ),
        Line::Toggled {
            click,
            outcome,
            view,
        } => println!("click #{click}: {outcome:?} -> {}", describe(view)),
        Line::Unmounted => println!("unmounted"),
    }
    Ok(())
}

fn describe(view: &ToggleView) -> String {
    let mut out = format!(
        "[{:?}] icon={:?} label={}",
        view.affordance,
        view.icon,
        view.label.unwrap_or("-")
    );
    if !view.interactive {
        out.push_str(" (disabled)");
    }
    if let Some(tooltip) = view.tooltip {
        out.push_str(&format!(" tooltip=\"{tooltip}\""));
    }
    out
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(path) = &args.asset_path {
        settings.asset_path = path.display().to_string();
    }
    if let Some(ms) = args.probe_timeout_ms {
        settings.probe_timeout_ms = ms;
    }
    if let Some(filter) = &args.log_filter {
        settings.log_filter = filter.clone();
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let backend = SimulatedAudioBackend::new(args.behavior());
    let controller = AmbientAudioController::mount(backend, settings.controller_options());

    let json = args.json;
    let mut events = controller.subscribe_events();
    let printer = tokio::spawn(async move {
        while let Ok(ControllerEvent::StatusChanged(status)) = events.recv().await {
            let line = Line::StatusChanged {
                view: ToggleView::from_status(&status),
                status,
            };
            if let Err(err) = emit(&line, json) {
                tracing::warn!("demo: {err:#}");
            }
        }
    });

    controller.settled().await;
    info!(view = ?controller.view(), "demo: controller settled");

    for click in 1..=args.toggles {
        tokio::time::sleep(Duration::from_millis(args.toggle_interval_ms)).await;
        let outcome = controller.toggle().await;
        emit(
            &Line::Toggled {
                click,
                outcome,
                view: controller.view(),
            },
            json,
        )?;
    }

    controller.unmount();
    let _ = tokio::time::timeout(Duration::from_secs(1), printer).await;
    emit(&Line::Unmounted, json)?;

    Ok(())
}
