use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use multirando::games::{GAME_NAMES, game_options};
use multirando::randomize::generate;
use multirando::settings::{OptionKind, load_generation_settings};
use multirando::spoiler_log::write_spoiler_log;
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    random_seed: Option<u64>,

    #[arg(long)]
    max_attempts: Option<usize>,

    #[arg(long)]
    output_spoiler_log: Option<PathBuf>,

    // Print the option schema of a game and exit.
    #[arg(long)]
    print_options: Option<String>,
}

fn print_options(game: &str) -> Result<()> {
    let specs = game_options(game)
        .with_context(|| format!("known games: {}", GAME_NAMES.join(", ")))?;
    println!("{game}:");
    for spec in specs {
        let kind = match spec.kind {
            OptionKind::Toggle { default } => format!("toggle, default {default}"),
            OptionKind::Range { min, max, default } => {
                format!("range {min}..={max}, default {default}")
            }
            OptionKind::Choice { choices, default } => {
                format!("one of [{}], default {}", choices.join(", "), choices[default])
            }
        };
        println!("  {} ({}): {}", spec.name, kind, spec.description);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    if let Some(game) = &args.print_options {
        return print_options(game);
    }
    let Some(settings_path) = &args.settings else {
        bail!("--settings is required unless --print-options is given");
    };
    let settings = load_generation_settings(settings_path)?;

    let seed = match (args.random_seed, settings.seed) {
        (Some(s), _) => s,
        (None, Some(s)) => s,
        (None, None) => rand::random::<u64>(),
    };
    let max_attempts = args.max_attempts.unwrap_or(10);
    info!(
        "Generating for {} players with seed {seed}",
        settings.players.len()
    );

    let randomization = generate(&settings, seed, max_attempts)
        .with_context(|| format!("Failed to generate seed {seed}"))?;
    info!(
        "Placed {} items (placement seed {})",
        randomization.placements.len(),
        randomization.placement_seed
    );

    if let Some(output_spoiler_log_path) = &args.output_spoiler_log {
        println!(
            "Writing spoiler log to {}",
            output_spoiler_log_path.display()
        );
        write_spoiler_log(&randomization.spoiler_log, output_spoiler_log_path)?;
    }

    Ok(())
}
