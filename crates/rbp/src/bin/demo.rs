//! Smoke-test harness for the match driver.
//!
//! Runs a match between built-in idle bots on a generated board and
//! prints the resulting ranking. This is not the bot/map selection CLI;
//! it exists to exercise the engine end to end.
use std::time::Duration;

use arena_driver::{run_match, Bot, MatchConfig, StillBot};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Run a demo match between built-in idle bots")]
struct Args {
    #[arg(long, default_value_t = 20)]
    width: u16,

    #[arg(long, default_value_t = 20)]
    height: u16,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long, default_value_t = 2)]
    bots: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    arena_core::init_logging();
    let args = Args::parse();

    let bots: Vec<Box<dyn Bot>> = (1..=args.bots)
        .map(|id| Box::new(StillBot::new(id, format!("bot-{id}"))) as Box<dyn Bot>)
        .collect();

    let config = MatchConfig {
        init_timeout: Duration::from_secs(5),
        frame_timeout: Duration::from_millis(500),
    };

    let result = run_match(bots, args.width, args.height, args.seed, &config).await?;

    log::info!(
        "match finished: {} frames, board {}x{}",
        result.replay.num_frames,
        result.replay.width,
        result.replay.height,
    );
    for (idx, name) in result.replay.player_names.iter().enumerate() {
        println!(
            "{:<12} rank {:>2}  last_alive {:>4}",
            name, result.ranking.ranks[idx], result.ranking.last_alive[idx],
        );
    }

    Ok(())
}
