//! Continual-learning simulator CLI
//!
//! 시즌별 학습을 터미널에서 실행하고 naive / EWC 정확도를 비교한다.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cl_core::simulator::{check_trials, config_from_env, ModeComparison};
use cl_core::state::ThreadPacer;
use cl_core::{
    AugmentationSettings, MetricSimulator, Season, SimulationState, SimulatorConfig,
    TrainingMode, TrainingSession,
};

#[derive(Parser)]
#[command(name = "cl_cli")]
#[command(about = "Simulate seasonal continual learning (naive vs EWC)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Enabled augmentations, e.g. "rotation,flip", "all" or "none"
    #[arg(long, default_value = "none")]
    aug: AugmentationSettings,

    /// Simulator config file (.json / .yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Config preset: realistic, harsh, gentle, deterministic
    #[arg(long, conflicts_with = "config")]
    preset: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run train steps season by season
    Run {
        #[command(flatten)]
        common: CommonArgs,

        /// Number of train steps (stops after season 4)
        #[arg(long, default_value_t = 4)]
        steps: u8,

        /// Override the delay between progress updates
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Print the final state as JSON instead of a table
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Evaluate one season once
    Evaluate {
        #[command(flatten)]
        common: CommonArgs,

        /// Season to evaluate (1-4)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        season: u8,

        /// Highest trained season (1-4)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        trained_up_to: u8,

        /// naive | ewc
        #[arg(long, default_value = "naive")]
        mode: TrainingMode,
    },

    /// Monte-Carlo mean accuracy of both modes
    Compare {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        season: u8,

        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        trained_up_to: u8,

        #[arg(long, default_value_t = 1000)]
        trials: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { common, steps, delay_ms, json } => {
            let mut config = load_config(&common)?;
            if let Some(delay) = delay_ms {
                config.tick_delay_ms = delay;
            }

            tracing::debug!(seed = common.seed, steps, delay_ms = config.tick_delay_ms, "starting run");
            let rng = ChaCha8Rng::seed_from_u64(common.seed);
            let mut session = TrainingSession::new(config, rng, ThreadPacer)
                .with_state(SimulationState::with_augmentations(common.aug));

            if !json {
                println!("🌱 Seasonal continual-learning run");
                println!("   Seed:          {}", common.seed);
                println!("   Augmentations: {}", describe_augs(&common.aug));
            }

            for _ in 0..steps {
                let Some(season) = session.state().next_season() else {
                    if !json {
                        println!("\n⚠️  All seasons trained, remaining steps skipped");
                    }
                    break;
                };
                if !json {
                    println!("\n🔨 Training {}", season.display_name());
                }
                session.train_step_with(|state| {
                    if !json {
                        print_progress(state.progress);
                    }
                });
                if !json {
                    println!();
                }
            }

            let state = session.into_state();
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print_state(&state);
            }
        }

        Commands::Evaluate { common, season, trained_up_to, mode } => {
            let season = Season::try_from(season)?;
            let trained_up_to = Season::try_from(trained_up_to)?;
            let simulator = MetricSimulator::new(load_config(&common)?);
            let mut rng = ChaCha8Rng::seed_from_u64(common.seed);

            let acc = simulator.accuracy(season, trained_up_to, mode, &common.aug, &mut rng);
            println!(
                "{} evaluated after training through {} ({}): {:.2}%",
                season,
                trained_up_to,
                mode.display_name(),
                acc
            );
        }

        Commands::Compare { common, season, trained_up_to, trials } => {
            let cmp = compare(&common, season, trained_up_to, trials)?;
            println!(
                "📊 {} after training through {} ({} trials)",
                cmp.season, cmp.trained_up_to, cmp.trials
            );
            println!("   Naive mean: {:.2}%", cmp.naive_mean);
            println!("   EWC mean:   {:.2}%", cmp.ewc_mean);
            println!("   Gap:        {:+.2} pts", cmp.retention_gap());
        }
    }

    Ok(())
}

fn compare(common: &CommonArgs, season: u8, trained_up_to: u8, trials: u32) -> Result<ModeComparison> {
    let trials = check_trials(trials)?;
    let season = Season::try_from(season)?;
    let trained_up_to = Season::try_from(trained_up_to)?;
    let simulator = MetricSimulator::new(load_config(common)?);

    simulator
        .compare_modes(season, trained_up_to, &common.aug, trials, common.seed)
        .context("No trials to compare")
}

fn load_config(common: &CommonArgs) -> Result<SimulatorConfig> {
    if let Some(path) = &common.config {
        return SimulatorConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    if let Some(name) = &common.preset {
        return SimulatorConfig::by_name(name)
            .with_context(|| format!("Unknown preset '{}'", name));
    }
    config_from_env().context("Failed to load config from environment")
}

fn describe_augs(augs: &AugmentationSettings) -> String {
    let names: Vec<&str> = augs.enabled().map(|aug| aug.as_str()).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn print_progress(percent: u8) {
    let filled = usize::from(percent) / 5;
    print!("\r   [{}{}] {:>3}%", "#".repeat(filled), ".".repeat(20 - filled), percent);
    let _ = std::io::stdout().flush();
}

fn print_state(state: &SimulationState) {
    println!("\n✅ Trained through: {}", state.trained_up_to.map_or("-".to_string(), |s| s.to_string()));
    println!("\n   Season | Naive   | EWC");
    println!("   -------+---------+--------");
    for point in state.comparison() {
        println!("   {:<6} | {:<7} | {}", point.season.to_string(), fmt_pct(point.naive), fmt_pct(point.ewc));
    }

    for mode in TrainingMode::BOTH {
        let summary = state.summary(mode);
        println!(
            "\n   {}: {} entries, avg {}",
            mode.display_name(),
            summary.entries,
            fmt_pct(summary.average_accuracy)
        );
    }
    if let Some(gap) = state.retention_gap() {
        println!("   Retention gap (EWC - naive): {:+.2} pts", gap);
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or("-".to_string(), |v| format!("{:.1}%", v))
}
