use canon_othello::Player;
use canon_player::autoplay::{self, Tally};
use canon_player::endgame::{EndgameOperator, ENDGAME_TURN};
use canon_player::operator::{Operator, RandomOperator};
use clap::Parser;
use indicatif::ProgressIterator;

/// Play seeded random operators against each other, alternating colors.
#[derive(Parser)]
#[command(name = "autoplay")]
#[command(about, long_about = None)]
struct Args {
    /// Number of game pairs; each pair plays both color assignments.
    #[arg(long, default_value_t = 50)]
    pairs: u32,

    /// Seed of the first operator.
    #[arg(long, default_value_t = 0)]
    first_seed: u64,

    /// Seed of the second operator.
    #[arg(long, default_value_t = 1)]
    second_seed: u64,

    /// Let the first operator solve the rest of the game exactly once it is late enough.
    #[arg(long)]
    endgame: bool,

    /// First turn the endgame search takes over.
    #[arg(long, default_value_t = ENDGAME_TURN)]
    endgame_turn: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let random = RandomOperator::new(args.first_seed);
    let mut first: Box<dyn Operator> = if args.endgame {
        println!("First operator solves endgames from turn {}.", args.endgame_turn);
        Box::new(EndgameOperator::new(random).from_turn(args.endgame_turn))
    } else {
        Box::new(random)
    };
    let mut second: Box<dyn Operator> = Box::new(RandomOperator::new(args.second_seed));
    let mut tally = Tally::default();

    for _ in (0..args.pairs).progress() {
        let score = autoplay::play_game(first.as_mut(), second.as_mut())?;
        tally.record(score, Player::Black);

        let score = autoplay::play_game(second.as_mut(), first.as_mut())?;
        tally.record(score, Player::White);
    }

    println!(
        "First operator over {} games: {} wins, {} losses, {} draws.",
        tally.games(),
        tally.wins,
        tally.losses,
        tally.draws
    );
    Ok(())
}
