//! Sphere Break entry point
//!
//! Runs the simulation headless with the logging renderer: the autopilot
//! plays a full game and the final state is printed at the end.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use sphere_break::renderer::{LogRenderer, Renderer, hud_text, render_world};
use sphere_break::sim::{GameEvent, GameWorld, TickInput, tick};
use sphere_break::{GameConfig, GameMode};

#[derive(Parser)]
#[command(name = "sphere-break")]
#[command(about = "Billiard-style ball breaking game, played headless by the autopilot")]
struct Args {
    /// Game mode: classic, rack, billiards (pool) or arcade
    #[arg(long, default_value = "classic", value_parser = parse_mode)]
    mode: GameMode,

    /// JSON config file; overrides --mode
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for target layout and bonus rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames even if the game is still running
    #[arg(long, default_value_t = 36_000)]
    frames: u64,

    /// Frame delta in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Leave the control ball alone instead of playing
    #[arg(long)]
    no_autopilot: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
}

fn parse_mode(s: &str) -> Result<GameMode, String> {
    GameMode::from_str(s).ok_or_else(|| {
        let known: Vec<&str> = GameMode::ALL.iter().map(GameMode::as_str).collect();
        format!("unknown mode '{}' (expected one of: {})", s, known.join(", "))
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::for_mode(args.mode),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if !(args.dt.is_finite() && args.dt > 0.0) {
        bail!("--dt must be a positive number of seconds, got {}", args.dt);
    }

    log::info!("Sphere Break ({}) starting...", config.mode.as_str());

    let mut renderer = LogRenderer::new();
    renderer.setup().context("Renderer setup failed")?;
    let mut world = GameWorld::new(config).context("Failed to set up the game")?;

    let input = TickInput {
        autopilot: !args.no_autopilot,
        ..Default::default()
    };

    for _ in 0..args.frames {
        let events = tick(&mut world, &input, args.dt).context("Simulation failed")?;
        for event in &events {
            match event {
                GameEvent::TargetDestroyed { .. } | GameEvent::Launched | GameEvent::Rearmed => {
                    log::debug!("{:?}", event)
                }
                _ => log::info!("{:?}", event),
            }
        }
        render_world(&world, &mut renderer);

        if world.quit_requested || world.state.phase.is_terminal() {
            break;
        }
    }

    for (_, text) in hud_text(&world) {
        log::info!("{}", text.replace('\n', ", "));
    }
    log::info!(
        "Finished after {} ticks, {} frames drawn",
        world.state.time_ticks,
        renderer.frames
    );

    if args.json {
        let summary = serde_json::to_string_pretty(&world.state)
            .context("Failed to serialize final state")?;
        println!("{}", summary);
    } else {
        println!(
            "{:?}: level {}, score {}, lives {}",
            world.state.phase, world.state.level, world.state.score, world.state.lives
        );
    }

    Ok(())
}
