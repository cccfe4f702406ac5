use anyhow::{Context, Result};
use movie_hangman::cli::{CliInterface, display_ranking, parse_cli};
use movie_hangman::logging::{LogTarget, default_log_path, init_logging};
use movie_hangman::tui::TuiInterface;
use movie_hangman::{GuessGame, RankingStore, SessionOutcome, load_titles, pick_random, run_session};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::io;

fn main() -> Result<()> {
    let cli = parse_cli();

    let log_target = if cli.tui {
        LogTarget::File(default_log_path())
    } else {
        LogTarget::Stderr
    };
    init_logging(&log_target, cli.verbose).context("failed to initialize logging")?;

    if cli.show_ranking {
        let ranking = RankingStore::open(&cli.ranking_path)?;
        display_ranking(ranking.entries(), None);
        return Ok(());
    }

    let titles = load_titles(&cli.titles_path);
    let mut rng = match cli.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };
    let Some(title) = pick_random(&titles, &mut rng) else {
        println!(
            "The movie list '{}' is empty or missing. Check its contents.",
            cli.titles_path.display()
        );
        return Ok(());
    };

    let mut ranking = RankingStore::open(&cli.ranking_path)?;
    let mut game = GuessGame::new(title);

    let outcome = if cli.tui {
        let mut interface = TuiInterface::new().context("failed to start the terminal interface")?;
        let outcome = run_session(&mut game, &mut ranking, &mut interface);
        interface.cleanup().context("failed to restore the terminal")?;
        outcome?
    } else {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        run_session(&mut game, &mut ranking, &mut interface)?
    };

    match outcome {
        SessionOutcome::Ranked { nickname, rank, .. } => {
            log::info!("Session finished: {nickname} ranked {rank:?}");
        }
        SessionOutcome::NotRanked { status, score } => {
            log::info!("Session finished: {status:?} with {score} points, not ranked");
        }
    }
    Ok(())
}
