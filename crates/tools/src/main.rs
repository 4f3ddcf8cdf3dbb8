use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use runtime::input::{PointerSample, Viewport};
use scene::SceneConfig;
use tools::{RunOptions, SvgSurface, mesh_stats};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orbis", version, about = "Wireframe globe tooling")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a geodesic sphere and print its statistics as JSON
    Mesh {
        #[arg(long, default_value_t = 1.0)]
        radius: f64,

        /// Subdivision depth
        #[arg(long, default_value_t = 1)]
        depth: u32,
    },

    /// Print the default scene config as JSON
    Config,

    /// Run the frame loop headlessly and write the last frame as SVG
    Render {
        #[arg(long, default_value_t = 120)]
        frames: u64,

        #[arg(long, default_value_t = 1280.0)]
        width: f64,

        #[arg(long, default_value_t = 720.0)]
        height: f64,

        /// Scene config JSON; defaults are used for missing fields
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Pointer position as `x,y` in CSS pixels
        #[arg(long)]
        pointer: Option<String>,

        #[arg(long, default_value = "globe.svg")]
        out: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    match Args::parse().command {
        Command::Mesh { radius, depth } => cmd_mesh(radius, depth),
        Command::Config => cmd_config(),
        Command::Render {
            frames,
            width,
            height,
            config,
            seed,
            pointer,
            out,
        } => {
            let pointer = pointer.as_deref().map(parse_pointer).transpose()?;
            let options = RunOptions {
                viewport: Viewport::new(width, height, 1.0),
                seed,
                frames,
                pointer,
            };
            cmd_render(config, &options, out)
        }
    }
}

fn cmd_mesh(radius: f64, depth: u32) -> Result<(), String> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(format!("radius must be positive, got {radius}"));
    }
    if depth > scene::config::MAX_MESH_DEPTH {
        return Err(format!(
            "depth {depth} exceeds maximum {}",
            scene::config::MAX_MESH_DEPTH
        ));
    }
    let stats = mesh_stats(radius, depth);
    let json = serde_json::to_string_pretty(&stats).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn cmd_config() -> Result<(), String> {
    let json = SceneConfig::default()
        .to_json_pretty()
        .map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn cmd_render(config: Option<PathBuf>, options: &RunOptions, out: PathBuf) -> Result<(), String> {
    let config = match config {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|e| format!("read {path:?}: {e}"))?;
            SceneConfig::from_json(&text).map_err(|e| format!("{path:?}: {e}"))?
        }
        None => SceneConfig::default(),
    };

    let mut svg = SvgSurface::new(options.viewport.width, options.viewport.height);
    let result = tools::run(config, options, &mut svg).map_err(|e| e.to_string())?;
    fs::write(&out, svg.finish()).map_err(|e| format!("write {out:?}: {e}"))?;

    let metrics = serde_json::to_string(result.frame_loop.metrics()).map_err(|e| e.to_string())?;
    info!(out = %out.display(), "frame written");
    println!("{metrics}");
    Ok(())
}

fn parse_pointer(s: &str) -> Result<PointerSample, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("pointer must be x,y: {s}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("pointer x: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("pointer y: {e}"))?;
    Ok(PointerSample::new(x, y))
}
