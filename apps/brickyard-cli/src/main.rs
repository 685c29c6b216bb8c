use anyhow::Context;
use brickyard_input::{HeadlessCapture, InputEvent};
use brickyard_kernel::{AppConfig, Session};
use brickyard_render::DebugTextRenderer;
use brickyard_tools::{EngineInspector, FrameStats};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brickyard-cli", about = "Headless runner for the brickyard simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file; missing fields take their defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Simulate the playground without a window
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: u32,
        /// Projectiles to fire, one per frame from the first frame on
        #[arg(short, long, default_value = "0")]
        shots: u32,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0, value_parser = parse_frame_time)]
        dt: f32,
        /// Seed for brick materials
        #[arg(long)]
        seed: Option<u64>,
        /// Print the scene dump of the final frame
        #[arg(long)]
        dump: bool,
    },
    /// Print the effective configuration as JSON
    Config,
}

fn parse_frame_time(s: &str) -> Result<f32, String> {
    let dt: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if dt.is_finite() && dt >= 0.0 {
        Ok(dt)
    } else {
        Err(format!("frame time must be a non-negative number of seconds, got {s}"))
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("brickyard-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("physics: {}", brickyard_physics::crate_info());
            println!("render: {}", brickyard_render::crate_info());
            println!("input: {}", brickyard_input::crate_info());
            println!("kernel: {}", brickyard_kernel::crate_info());
            println!("tools: {}", brickyard_tools::crate_info());
        }
        Commands::Run {
            frames,
            shots,
            dt,
            seed,
            dump,
        } => {
            if seed.is_some() {
                config.playground.material_seed = seed;
            }
            let mut session = Session::assemble(&config)?;
            let mut capture = HeadlessCapture::new();
            let mut renderer = DebugTextRenderer::new();
            let mut stats = FrameStats::new();

            // The first primary action only acquires capture.
            session.push_input(InputEvent::PrimaryAction);
            let mut last_dump = String::new();
            for frame in 0..frames {
                if frame < shots {
                    session.push_input(InputEvent::PrimaryAction);
                }
                let report = session.frame_by(dt, &mut renderer, &mut capture)?;
                stats.record(report.delta);
                last_dump = report.output;
            }

            println!("Run: frames={frames} dt={dt:.4} shots={}", session.spawner().fired());
            println!("{}", EngineInspector::summary(session.engine()));
            println!("Timing: {stats}");
            for id in session.playground().bricks.iter().take(3) {
                if let Some(info) = EngineInspector::inspect_object(session.engine(), *id) {
                    println!("  {info}");
                }
            }
            if dump {
                print!("{last_dump}");
            }
        }
        Commands::Config => {
            println!("{}", config.to_json_pretty()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_time_rejects_negative_and_nan() {
        assert!(parse_frame_time("-1").is_err());
        assert!(parse_frame_time("NaN").is_err());
        assert!(parse_frame_time("inf").is_err());
        assert_eq!(parse_frame_time("0.02"), Ok(0.02));
    }

    #[test]
    fn run_parses_dt() {
        let cli = Cli::try_parse_from(["brickyard-cli", "run", "--dt", "0.05"]).unwrap();
        match cli.command {
            Commands::Run { dt, .. } => assert_eq!(dt, 0.05),
            _ => panic!("expected run"),
        }
        assert!(Cli::try_parse_from(["brickyard-cli", "run", "--dt", "-0.5"]).is_err());
    }
}
