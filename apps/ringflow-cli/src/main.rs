use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use ringflow_anim::{AnimationConfig, AnimationContext};
use ringflow_render::{DebugTextRenderer, RenderView, Renderer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ringflow-cli", about = "CLI tool for ringflow operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Step the animation headlessly and print each frame
    Simulate {
        /// Stop after this many milliseconds
        #[arg(long, default_value = "40000")]
        until_ms: f64,
        /// Milliseconds between printed frames
        #[arg(long, default_value = "5000")]
        step_ms: f64,
        /// Animation config file (.yaml, .yml or .json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default animation config
    Config {
        #[arg(long, value_enum, default_value = "yaml")]
        format: Format,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AnimationConfig> {
    match path {
        Some(path) => AnimationConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(AnimationConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("ringflow-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("anim: {}", ringflow_anim::crate_info());
            println!("render: {}", ringflow_render::crate_info());
            let config = AnimationConfig::default();
            println!(
                "defaults: rings={}, loop={:.3}s, interval={:.3}ms",
                config.ring_count(),
                config.loop_duration_secs(),
                config.interval_ms()
            );
        }
        Commands::Simulate {
            until_ms,
            step_ms,
            config,
        } => {
            if !step_ms.is_finite() || step_ms <= 0.0 {
                anyhow::bail!("--step-ms must be positive, got {step_ms}");
            }
            let config = load_config(config.as_ref())?;
            tracing::debug!(until_ms, step_ms, rings = config.ring_count(), "simulating");
            let camera_z = config.camera_z as f32;
            let view = RenderView {
                eye: Vec3::new(0.0, 0.0, camera_z),
                target: Vec3::new(0.0, 0.0, camera_z - 1.0),
                ..RenderView::default()
            };
            let mut anim = AnimationContext::new(config)?;
            let renderer = DebugTextRenderer::new();

            let mut now_ms = 0.0;
            while now_ms <= until_ms {
                let stats = anim.frame(now_ms);
                println!("t={:.0}ms dt={:.3}s", stats.now_ms, stats.delta_secs);
                print!("{}", renderer.render(&anim, &view));
                now_ms += step_ms;
            }
        }
        Commands::Config { format } => {
            let config = AnimationConfig::default();
            let text = match format {
                Format::Yaml => serde_yaml::to_string(&config)?,
                Format::Json => serde_json::to_string_pretty(&config)?,
            };
            println!("{text}");
        }
    }

    Ok(())
}
