// SPDX-License-Identifier: MIT OR Apache-2.0
//! Folio - headless driver for a scroll-choreographed portfolio page
//!
//! Lays the page out, mounts every section, plays an input script frame by
//! frame and prints a JSON snapshot of the final presentation state:
//! - Viewport observer and trigger binder for scroll choreography
//! - Section controllers for hero, about, projects, tech stack, contact and
//!   navigation
//! - Pointer parallax, contact form and hero typewriter
//!
//! ## Architecture
//!
//! The animation core lives in `folio_motion` (timelines) and
//! `folio_trigger` (observer, binder, parallax). This binary owns the page
//! lifecycle and the inputs. Logs go to stderr; stdout carries only the
//! snapshot.

mod blueprint;
mod config;
mod contact_form;
mod content;
mod page;
mod script;
mod sections;
mod typewriter;

use clap::Parser;
use config::{ConfigError, SiteConfig, CONFIG_FILE_NAME};
use content::{Content, CONTENT_FILE_NAME};
use page::Page;
use script::{Script, ScriptError, SCRIPT_FILE_NAME};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Play a scripted session against the portfolio page", long_about = None)]
struct Args {
    /// Site configuration (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page content (RON)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Input script (RON)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Override the configured frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Print the snapshot on one line
    #[arg(long)]
    compact: bool,

    /// Write the built-in configuration, content and script into a
    /// directory and exit
    #[arg(long, value_name = "DIR")]
    write_defaults: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Script(#[from] ScriptError),

    #[error("Failed to write snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn write_defaults(dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(dir)?;
    SiteConfig::default().save(&dir.join(CONFIG_FILE_NAME))?;
    config::save_ron(&Content::default(), &dir.join(CONTENT_FILE_NAME))?;
    Script::default().save(&dir.join(SCRIPT_FILE_NAME))?;
    tracing::info!("Wrote default files to {:?}", dir);
    Ok(())
}

fn run(args: Args) -> Result<(), AppError> {
    if let Some(dir) = &args.write_defaults {
        return write_defaults(dir);
    }

    let mut config = SiteConfig::load_or_default(args.config.as_deref())?;
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    let content = Content::load_or_default(args.content.as_deref())?;
    let script = Script::load_or_default(args.script.as_deref())?;

    let mut page = Page::new(config, content);
    let report = page.mount_all();
    for (section, reason) in &report.failed {
        tracing::warn!(section = section.name(), "section unavailable: {reason}");
    }
    script.run(&mut page)?;

    let snapshot = page.snapshot();
    let released = page.unmount_all();
    tracing::debug!(released, "page torn down");
    let json = if args.compact {
        serde_json::to_string(&snapshot)?
    } else {
        serde_json::to_string_pretty(&snapshot)?
    };
    println!("{json}");
    Ok(())
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("folio_app=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(Args::parse()) {
        tracing::error!("Folio failed: {e}");
        std::process::exit(1);
    }
}
