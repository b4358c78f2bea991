use clap::{Parser, ValueEnum};
use colored::Colorize;
use oldmaid_rs::games::oldmaid::{
    ai::{play_out, DEFAULT_MAX_TURNS},
    decks::{pick_pairs, ANIMAL_PAIRS},
    DealStrategy, GameConfig, GameRng, OldMaidGame,
};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Auto,
    Balanced,
    Tiered,
    Constrained,
}

/// Self-play Old Maid games and report who ends up holding the joker.
#[derive(Debug, Parser)]
#[command(name = "oldmaid")]
struct Args {
    /// Game config JSON; when absent the built-in animal deck is used
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pairs drawn from the built-in deck
    #[arg(long, default_value_t = 22)]
    pair_count: usize,

    #[arg(long, default_value_t = 4)]
    players: usize,

    #[arg(long, default_value_t = 1000)]
    games: usize,

    /// Seed prefix; game i is dealt from "<seed>-<i>"
    #[arg(long)]
    seed: Option<String>,

    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    strategy: StrategyArg,

    /// Difficulty tier for the tiered deal
    #[arg(long, default_value_t = 0)]
    tier: u32,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn deal_strategy(&self) -> Option<DealStrategy> {
        match self.strategy {
            StrategyArg::Auto => None,
            StrategyArg::Balanced => Some(DealStrategy::Balanced),
            StrategyArg::Tiered => Some(DealStrategy::Tiered { tier: self.tier }),
            StrategyArg::Constrained => Some(DealStrategy::Constrained),
        }
    }

    fn game_seed(&self, game: usize) -> Option<String> {
        self.seed.as_ref().map(|prefix| format!("{}-{}", prefix, game))
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn base_config(args: &Args) -> Result<GameConfig, Box<dyn Error>> {
    if let Some(path) = &args.config {
        return Ok(GameConfig::from_json_file(path)?);
    }
    let mut rng = GameRng::from_seed(args.seed.as_deref());
    let pairs = pick_pairs(&ANIMAL_PAIRS, args.pair_count, &mut rng);
    Ok(GameConfig::new(pairs, args.players))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let base = base_config(&args)?;
    let strategy = args.deal_strategy().or(base.strategy);
    info!(
        pairs = base.pairs.len(),
        players = base.player_count,
        games = args.games,
        strategy = ?strategy.unwrap_or(base.resolved_strategy()),
        "starting simulation"
    );

    let mut losses = vec![0usize; base.player_count];
    let mut unfinished = 0;
    let mut total_turns = 0;
    let start = Instant::now();
    for game_number in 0..args.games {
        let mut config = base.clone();
        config.seed = args.game_seed(game_number).or_else(|| base.seed.clone());
        config.strategy = strategy;

        let mut rng = GameRng::from_seed(config.seed.as_deref());
        let mut game = OldMaidGame::new_with_rng(&config, &mut rng)?;
        let summary = play_out(&mut game, &mut rng, DEFAULT_MAX_TURNS)?;
        total_turns += summary.turns;
        match summary.loser {
            Some(seat) if summary.finished => losses[seat] += 1,
            _ => {
                unfinished += 1;
                warn!(game = game_number, "game did not finish");
            }
        }
    }
    let duration = start.elapsed();

    println!("{}", "Losses by seat".bold());
    for (seat, count) in losses.iter().enumerate() {
        let share = if args.games == 0 {
            0.0
        } else {
            *count as f64 / args.games as f64 * 100.0
        };
        let name = if seat == 0 {
            "You".to_string()
        } else {
            format!("AI{}", seat)
        };
        let line = format!("{:>5}: {:>6} ({:5.1}%)", name, count, share);
        if seat == 0 {
            println!("{}", line.red());
        } else {
            println!("{}", line.green());
        }
    }
    if unfinished > 0 {
        println!("{}", format!("unfinished: {}", unfinished).yellow());
    }
    if args.games > 0 {
        println!(
            "average turns: {:.1}",
            total_turns as f64 / args.games as f64
        );
    }
    println!("Time elapsed for {} games: {:?}", args.games, duration);
    Ok(())
}
