mod player;
mod render;

use clap::{Parser, Subcommand};
use lowimpact_core::config::store_path_in;
use lowimpact_core::*;
use player::PlayOutcome;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lowimpact")]
#[command(about = "Low impact daily trainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override today's day index (days since 1970-01-01 UTC)
    #[arg(long, global = true, allow_negative_numbers = true)]
    day: Option<i64>,

    /// Use this category instead of today's rotation
    /// (tai-chi, chair-yoga, walking, balance, mobility, core, restorative)
    #[arg(long, global = true)]
    category: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's session (default)
    Today {
        /// Print the session as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play today's session step by step
    Start {
        /// Auto-complete (for testing) - advance through every step without input
        #[arg(long)]
        auto_complete: bool,
    },

    /// Mark today's session as done without playing it
    Complete,

    /// Skip today; resets the streak
    Skip,

    /// Lower the difficulty by one level
    Easier,

    /// Raise the difficulty by one level
    Harder,

    /// Show level, streak and last completed day
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    lowimpact_core::logging::init(cli.verbose);

    let config = Config::load()?;
    let store_path = match cli.data_dir.as_deref() {
        Some(dir) => store_path_in(dir),
        None => config.data.store_path(),
    };

    let today = cli.day.unwrap_or_else(lowimpact_core::today);

    let category = cli.category.as_deref().and_then(|c| match c.parse::<Category>() {
        Ok(category) => Some(category),
        Err(_) => {
            eprintln!("Unknown category: {}. Using today's rotation.", c);
            None
        }
    });

    let store = FileStore::new(store_path);
    tracing::debug!("Day {} using store {:?}", today, store.path());
    let mut trainer = Trainer::new(ProgressTracker::load(store)).with_category(category);

    match cli.command.unwrap_or(Commands::Today { json: false }) {
        Commands::Today { json } => cmd_today(&trainer, today, json, &config)?,
        Commands::Start { auto_complete } => {
            cmd_start(&mut trainer, today, auto_complete, &config)?
        }
        Commands::Complete => {
            let completion = trainer.complete(today);
            println!("✓ Session logged!");
            render::render_progress_change(&completion);
        }
        Commands::Skip => {
            let state = trainer.skip(today);
            println!("Skipped today. Streak: {}", state.streak_label());
        }
        Commands::Easier => {
            let level = trainer.easier();
            println!("Difficulty: {} / {}", level, Level::MAX);
        }
        Commands::Harder => {
            let level = trainer.harder();
            println!("Difficulty: {} / {}", level, Level::MAX);
        }
        Commands::Status => render::render_status(trainer.progress(), today),
    }

    Ok(())
}

fn cmd_today<S: KeyValueStore>(
    trainer: &Trainer<S>,
    today: DayIndex,
    json: bool,
    config: &Config,
) -> Result<()> {
    let overview = trainer.overview(today);

    if json {
        println!("{}", serde_json::to_string_pretty(&overview.session)?);
        return Ok(());
    }

    render::render_overview(&overview);
    println!("Run `lowimpact start` to begin, `lowimpact skip` to skip today.");
    if config.playback.show_disclaimer {
        println!("\n{}", render::DISCLAIMER);
    }
    Ok(())
}

fn cmd_start<S: KeyValueStore>(
    trainer: &mut Trainer<S>,
    today: DayIndex,
    auto_complete: bool,
    config: &Config,
) -> Result<()> {
    if config.playback.show_disclaimer {
        println!("{}", render::DISCLAIMER);
    }

    let outcome = if auto_complete {
        player::play_auto(trainer, today)?
    } else {
        player::play_interactive(trainer, today, config.playback.tick_interval())?
    };

    if outcome == PlayOutcome::Finished {
        println!("\n✓ Session logged!");
    }
    Ok(())
}
