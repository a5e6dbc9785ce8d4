use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, Clear, ClearType},
};
use env_logger::TimestampPrecision;
use log::{info, LevelFilter};
use tile_env::{
    Encoding, EnvConfig, Environment, Move, Observation, OutOfBoundsPolicy, Puzzle, RewardScheme,
    Step, TileEnv,
};

#[derive(Parser)]
#[command(version, about = "Sliding-tile puzzle environment")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML file with environment options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible scrambles
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a random solvable board
    Scramble {
        #[arg(long, default_value_t = 4)]
        size: usize,
        /// Scramble with this many random slides instead of a random permutation
        #[arg(long)]
        walk: Option<usize>,
    },
    /// Build a board from row-major values and report on it
    Check {
        #[arg(required = true, num_args = 1..)]
        values: Vec<u32>,
    },
    /// Play interactively with the arrow keys
    Play {
        #[arg(long, default_value_t = 4)]
        size: usize,
        #[arg(long, value_enum)]
        reward: Option<RewardScheme>,
        #[arg(long, value_enum)]
        encoding: Option<Encoding>,
        /// Fail on moves off the board instead of ignoring them
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let mut config = match &cli.config {
        Some(path) => EnvConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EnvConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    match cli.command {
        Commands::Scramble { size, walk } => {
            let mut env = TileEnv::new(size, config)?;
            if let Some(moves) = walk {
                env.scramble_by_walk(moves);
            }
            print!("{}", env.render());
            println!("{:?}", env.to_permutation());
        }
        Commands::Check { values } => {
            let puzzle = Puzzle::from_permutation(&values)?;
            print!("{puzzle}");
            println!("solvable: {}", puzzle.is_solvable());
            println!("solved:   {}", puzzle.is_solved());
        }
        Commands::Play {
            size,
            reward,
            encoding,
            strict,
        } => {
            if let Some(reward) = reward {
                config.reward = reward;
            }
            if let Some(encoding) = encoding {
                config.encoding = encoding;
            }
            if strict {
                config.out_of_bounds = OutOfBoundsPolicy::Strict;
            }
            let mut env = TileEnv::new(size, config)?;
            info!("starting {size}x{size} game");

            terminal::enable_raw_mode().context("enabling raw terminal mode")?;
            let outcome = play(&mut env);
            terminal::disable_raw_mode().context("restoring terminal mode")?;
            outcome?;
        }
    }

    Ok(())
}

fn play(env: &mut TileEnv) -> Result<()> {
    let mut stdout = io::stdout();
    let mut status = String::from("arrows/wasd move the blank, r resets, q quits");

    loop {
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        // raw mode needs explicit carriage returns
        write!(stdout, "{}\r\n{}\r\n", env.render().replace('\n', "\r\n"), status)?;
        stdout.flush()?;

        let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }

        let action = match code {
            KeyCode::Up | KeyCode::Char('w') => Move::Up,
            KeyCode::Down | KeyCode::Char('s') => Move::Down,
            KeyCode::Left | KeyCode::Char('a') => Move::Left,
            KeyCode::Right | KeyCode::Char('d') => Move::Right,
            KeyCode::Char('r') => {
                env.reset();
                status = "reset".to_string();
                continue;
            }
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            _ => continue,
        };

        status = match env.step(action) {
            Ok(step) => describe(action, &step),
            Err(e) => e.to_string(),
        };
    }
}

fn describe(action: Move, step: &Step<Observation>) -> String {
    let observed = match &step.observation {
        Observation::Grid(_) => "grid".to_string(),
        Observation::OneHot(bits) => format!("one-hot[{}]", bits.len()),
    };
    format!(
        "{action}: reward {} done {} moved {} ({observed})",
        step.reward, step.done, step.info.moved
    )
}
