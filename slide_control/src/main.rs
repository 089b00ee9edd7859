//! slide_control: interactive entry point.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use slide_control::app::{run, AppConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "slide_control", about = "Hands-free slide presenter")]
struct Cli {
    /// Folder of PNG slides (prompted for when omitted)
    #[arg(long)]
    slides: Option<PathBuf>,

    /// Initial gesture threshold, camera pixels from the top
    #[arg(long)]
    threshold: Option<i32>,

    /// Frames ignored after a slide change or erase
    #[arg(long)]
    cooldown: Option<u32>,

    /// Root folder for the per-session slide copy
    #[arg(long, default_value = "SlideImages")]
    output_folder: PathBuf,

    /// Present the slide folder in place instead of staging a copy
    #[arg(long)]
    no_stage: bool,

    /// Never prompt; fail when something is missing
    #[arg(long)]
    quick: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slide_control=info,gesture_core=info".into()),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Slide Control — hands-free gesture presenter          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse + keyboard simulation  (use --features leap for hardware)");
    println!();

    let slides = match cli.slides {
        Some(dir) => dir,
        None if cli.quick => bail!("--quick needs --slides <FOLDER>"),
        None => prompt_slides()?,
    };

    let mut cfg = AppConfig {
        slides,
        stage: !cli.no_stage,
        output_folder: cli.output_folder,
        ..AppConfig::default()
    };
    if let Some(t) = cli.threshold {
        cfg.session.threshold = t;
    }
    if let Some(c) = cli.cooldown {
        cfg.session.cooldown_frames = c;
    }

    println!("  Opening presentation window…");
    println!();
    info!(slides = %cfg.slides.display(), stage = cfg.stage, "starting presentation");

    let summary = run(cfg)?;

    println!();
    println!("  Presentation ended on slide {}/{}", summary.final_slide + 1, summary.slide_count);
    println!("  {} frames, {} slide changes, {} strokes drawn, {} erased",
             summary.frames, summary.slide_changes, summary.strokes_drawn, summary.strokes_erased);
    if summary.skipped_frames > 0 {
        println!("  {} frames skipped (unreadable hand)", summary.skipped_frames);
    }
    Ok(())
}

fn prompt_slides() -> Result<PathBuf> {
    loop {
        let line = read_line("  Slide folder: ")?;
        let path = PathBuf::from(line.trim());
        if path.is_dir() {
            return Ok(path);
        }
        println!("    ⚠  not a folder: {}", path.display());
    }
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        bail!("no slide folder given");
    }
    Ok(buf)
}
