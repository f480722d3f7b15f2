//! Headless demo: drives an item through the two-thread host against the
//! mock engine and logs every notification.
//!
//! ```text
//! cargo run --bin headless_demo -- --frames 30 --verbose
//! RUST_LOG=marionette_rendering=trace cargo run --bin headless_demo
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use marionette::core::EventBus;
use marionette::rendering::{MockEngine, MockFramework, MockModel};
use marionette::shared::{PointerButton, Priority, MODEL_MANIFEST_SUFFIX};
use marionette::{FrontendItem, Host, MarionetteConfig, Notification};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Headless MARIONETTE run against the mock engine
#[derive(Parser, Debug)]
#[command(name = "headless_demo", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model directory (overrides config; a scratch model is created if
    /// neither names one)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Frames to pump after the scripted input
    #[arg(short, long, default_value_t = 10)]
    frames: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => MarionetteConfig::from_file(path)?,
        None => MarionetteConfig::default(),
    };
    if let Some(model) = &args.model {
        config.item.model_path = model.display().to_string();
    }
    if config.item.model_path.is_empty() {
        config.item.model_path = scratch_model()?.display().to_string();
    }
    config.validate()?;
    info!(model = %config.item.model_path, "starting headless demo");

    let (notifier, notifications) = EventBus::create_pair();
    let mut item = FrontendItem::with_config(config.item.clone(), notifier.clone());
    item.set_size(config.surface.width, config.surface.height);

    let host = Host::spawn(
        || MockEngine::new(MockModel::sample()),
        Arc::new(MockFramework::new()),
        &config,
        notifier,
    )?;

    // First frame builds the scene.
    host.pump(&mut item)?;
    info!(
        hit_areas = ?item.hit_areas(),
        expressions = ?item.expressions(),
        motion_groups = ?item.motion_groups(),
        "model catalog"
    );

    // Tap the head, then the body.
    let (width, height) = (f64::from(config.surface.width), f64::from(config.surface.height));
    let head = (width / 2.0, height / 2.0 - 0.5 * width / 2.0);
    let body = (width / 2.0, height / 2.0 + 0.3 * width / 2.0);
    for (x, y) in [head, body] {
        item.hover_move(x, y);
        item.mouse_press(PointerButton::Primary, x, y);
        item.mouse_release(PointerButton::Primary, x, y);
        host.pump(&mut item)?;
    }

    item.set_expression("F01");
    item.start_motion("TapBody", "TapBody_0", Priority::Normal);
    item.set_lip_sync_enabled(true);
    item.set_lip_sync_value(0.8);

    for _ in 0..args.frames {
        item.request_frame();
        host.pump(&mut item)?;
        thread::sleep(config.host.frame_interval());
    }

    for notification in notifications.drain() {
        log_notification(&notification);
    }

    let stats = host.shutdown()?;
    info!(
        syncs = stats.syncs,
        frames = stats.frames,
        scene_rebuilds = stats.scene_rebuilds,
        fps = stats.last_frame.fps(),
        "demo finished"
    );
    Ok(())
}

/// Creates an empty model directory in the temp dir.
fn scratch_model() -> anyhow::Result<PathBuf> {
    let directory = std::env::temp_dir().join("marionette-demo").join("Hiyori");
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("creating {}", directory.display()))?;
    std::fs::write(directory.join(format!("Hiyori{MODEL_MANIFEST_SUFFIX}")), "{}")
        .context("writing model manifest")?;
    Ok(directory)
}

fn log_notification(notification: &Notification) {
    match notification {
        Notification::ModelReady => info!("model ready"),
        Notification::ModelLoadFailed(err) => info!("model load failed: {err}"),
        Notification::Tap { phase, x, y } => info!(?phase, x, y, "tap"),
        Notification::HitAreas { phase, names } => info!(?phase, ?names, "hit areas"),
        Notification::CursorMoved { x, y } => info!(x, y, "cursor moved"),
        Notification::MotionFinished { motion, group, name } => {
            info!(?motion, %group, %name, "motion finished");
        }
        Notification::PropertyChanged(change) => info!(?change, "property changed"),
    }
}
