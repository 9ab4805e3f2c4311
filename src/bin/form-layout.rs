use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use formlayout::common::config::Config;
use formlayout::common::log::init_logging;
use formlayout::scene::SceneFile;
use tracing::warn;

#[derive(Parser)]
#[command(name = "form-layout")]
#[command(about = "Solve form attachment layouts described in scene files")]
struct Cli {
    /// Config file supplying default layout settings and the log filter
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a scene and print every control's bounds as JSON
    Solve { scene: PathBuf },
    /// Print the preferred size of a scene's container
    Size {
        scene: PathBuf,
        #[arg(long)]
        width: Option<i32>,
        #[arg(long)]
        height: Option<i32>,
    },
    /// Print the attachment dependency tree of a scene
    Tree { scene: PathBuf },
    /// Validate a scene and the active config without printing a layout
    Check { scene: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::read(path),
        None => Ok(Config::builtin()),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref());
    init_logging(config.as_ref().map_or("warn", |c| c.log.filter.as_str()));
    let mut config = config?;
    for issue in config.validate() {
        warn!("{issue}");
    }
    config.auto_fix_values();

    match cli.command {
        Commands::Solve { scene } => {
            let mut scene = SceneFile::read(&scene)?.build(config.layout)?;
            let placements = scene.solve().context("laying out scene")?;
            println!("{}", serde_json::to_string_pretty(&placements)?);
        }
        Commands::Size { scene, width, height } => {
            let mut scene = SceneFile::read(&scene)?.build(config.layout)?;
            let size = scene.preferred_size(width, height).context("computing preferred size")?;
            println!("{}", serde_json::to_string_pretty(&size)?);
        }
        Commands::Tree { scene } => {
            let scene = SceneFile::read(&scene)?.build(config.layout)?;
            print!("{}", scene.draw_tree());
        }
        Commands::Check { scene } => {
            let file = SceneFile::read(&scene)?;
            if let Some(layout) = &file.layout {
                let issues = layout.validate();
                if !issues.is_empty() {
                    anyhow::bail!("invalid [layout] in {}: {}", scene.display(), issues.join("; "));
                }
            }
            let mut built = file.build(config.layout)?;
            built.solve().context("laying out scene")?;
            println!("{}: ok ({} controls)", scene.display(), file.controls.len());
        }
    }
    Ok(())
}
