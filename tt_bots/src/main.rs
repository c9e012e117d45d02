//! Bot-vs-bot Ten Thousand simulator.
//!
//! Plays a batch of matches between computer opponents and prints how often
//! each difficulty wins.

mod config;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::{Context, Error};
use ctrlc::set_handler;
use log::{debug, info, warn};
use pico_args::Arguments;
use ten_thousand::{
    Match, MatchPhase, MemoryStore, TurnOutcome, bot::BotDifficulty, rng::RngSource,
};

use config::{Overrides, SimConfig};

const HELP: &str = "\
Run bot-vs-bot Ten Thousand matches

USAGE:
  tt_bots [OPTIONS]

OPTIONS:
  --matches    N           Number of matches to play   [default: env TT_MATCHES or 100]
  --target     N           Score to land on exactly    [default: env TT_TARGET_SCORE or 10000]
  --entry      N           Points to get on the board  [default: env TT_ENTRY_THRESHOLD or 500]
  --seed       N           Base RNG seed               [default: env TT_SEED or random]
  --bots       LIST        Comma separated difficulties (beginner, intermediate, expert)
                           [default: env TT_BOTS or beginner,intermediate,expert]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log level (e.g., info, debug)
  (A .env file in the working directory is loaded if present)
";

/// Results for one seat across every match.
#[derive(Debug, Default)]
struct SeatStats {
    wins: usize,
    turns: usize,
    busts: usize,
    overshoots: usize,
    banked_points: u64,
}

fn play_match(config: &SimConfig, index: usize, store: &MemoryStore) -> Result<Match, Error> {
    let seed = config.seed.wrapping_add(index as u64);
    let mut game = Match::new(
        config.match_config(index),
        store,
        RngSource::seeded(seed),
        store.clone(),
    )
    .context("failed to create match")?;
    game.start()?;

    while game.phase() == MatchPhase::InProgress {
        game.play_bot_turn()
            .with_context(|| format!("bot turn failed in match {}", game.id()))?;
        for event in game.drain_events() {
            debug!("{event}");
        }
    }
    Ok(game)
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    env_logger::builder().format_target(false).init();

    let overrides = Overrides {
        matches: pargs.opt_value_from_str("--matches")?,
        target_score: pargs.opt_value_from_str("--target")?,
        entry_threshold: pargs.opt_value_from_str("--entry")?,
        seed: pargs.opt_value_from_str("--seed")?,
        bots: pargs.opt_value_from_str("--bots")?,
    };
    let remaining = pargs.finish();
    if !remaining.is_empty() {
        warn!("ignoring unexpected arguments: {remaining:?}");
    }

    let config = SimConfig::from_env(overrides)?;
    config.validate()?;

    // Stop between matches on Ctrl-C.
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    set_handler(move || flag.store(false, Ordering::SeqCst))?;

    info!(
        "playing {} matches to {} (seed {})",
        config.matches, config.target_score, config.seed
    );

    let store = MemoryStore::new();
    for (i, difficulty) in config.bots.iter().enumerate() {
        store.add_player(i as i64 + 1, format!("{difficulty} #{}", i + 1));
    }

    let mut played = 0;
    let mut rounds = 0u64;
    for index in 0..config.matches {
        if !running.load(Ordering::SeqCst) {
            warn!("interrupted after {played} matches");
            break;
        }
        let game = play_match(&config, index, &store)?;
        rounds += u64::from(game.state().current_round);
        played += 1;
    }

    let mut stats: Vec<SeatStats> = config.bots.iter().map(|_| SeatStats::default()).collect();
    for (i, seat) in stats.iter_mut().enumerate() {
        let player_id = i as i64 + 1;
        seat.wins = store.wins_for(player_id);
        for record in store.turns_for(player_id) {
            seat.turns += 1;
            seat.banked_points += u64::from(record.turn_score);
            match record.outcome {
                TurnOutcome::Busted => seat.busts += 1,
                TurnOutcome::Overshot => seat.overshoots += 1,
                TurnOutcome::Banked | TurnOutcome::Won => {}
            }
        }
    }

    print_report(&config.bots, &stats, played, rounds);
    Ok(())
}

fn print_report(bots: &[BotDifficulty], stats: &[SeatStats], played: usize, rounds: u64) {
    if played == 0 {
        println!("no matches played");
        return;
    }
    println!(
        "{played} matches, {:.1} rounds on average\n",
        rounds as f64 / played as f64
    );
    println!(
        "{:<18} {:>6} {:>7} {:>7} {:>10} {:>12}",
        "bot", "wins", "win %", "bust %", "overshoot", "pts/turn"
    );
    for (i, (difficulty, seat)) in bots.iter().zip(stats).enumerate() {
        let turns = seat.turns.max(1) as f64;
        println!(
            "{:<18} {:>6} {:>6.1}% {:>6.1}% {:>10} {:>12.1}",
            format!("{difficulty} #{}", i + 1),
            seat.wins,
            100.0 * seat.wins as f64 / played as f64,
            100.0 * seat.busts as f64 / turns,
            seat.overshoots,
            seat.banked_points as f64 / turns,
        );
    }
}
