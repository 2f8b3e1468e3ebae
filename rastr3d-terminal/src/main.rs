/// rastr3d Terminal Viewer
///
/// Loads OBJ models given on the command line and shows their projected
/// vertices in the terminal.
/// Controls:
///   - +/-: Zoom in / out
///   - WASD / Arrow Keys: Rotate the models
///   - E/R: Roll rotation
///   - P: Toggle projection mode
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rastr3d_core::{Scene, SceneConfig};
use rastr3d_terminal::{save_snapshot, status_message, TerminalApp};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rastr3d-terminal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// OBJ model files to load, in order
    models: Vec<PathBuf>,

    /// TOML scene configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raster width override
    #[arg(long)]
    width: Option<u32>,

    /// Raster height override
    #[arg(long)]
    height: Option<u32>,

    /// Render once to this image file and exit
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }

    let mut scene = Scene::new(config).context("invalid scene configuration")?;
    let mut failures = Vec::new();
    for path in &cli.models {
        let status = scene.open(path);
        if let Some(message) = status_message(path, status) {
            warn!("{message}");
            failures.push(message);
        }
    }
    info!("{} of {} models loaded", scene.models().len(), cli.models.len());

    if let Some(snapshot) = &cli.snapshot {
        for message in &failures {
            eprintln!("{message}");
        }
        let raster = scene.render()?;
        save_snapshot(&raster, snapshot)?;
        println!("Wrote {}", snapshot.display());
        return Ok(());
    }

    let mut app = TerminalApp::new(scene)?;
    if let Some(message) = failures.last() {
        app.set_status(message.clone());
    }
    app.run()?;

    Ok(())
}
