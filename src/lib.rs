// Library interface for movie-hangman
// This allows integration tests to access internal modules

pub mod catalog;
pub mod cli;
pub mod game;
pub mod game_state;
pub mod logging;
pub mod ranking;
pub mod tui;

// Re-export commonly used items for easier testing
pub use catalog::{Title, load_titles, load_titles_from_file, load_titles_from_str, pick_random};
pub use game::{GameStatus, GuessError, GuessGame, LetterOutcome, TitleOutcome};
pub use game_state::{GameInterface, SessionOutcome, UserAction, game_loop, run_session};
pub use ranking::{RankingEntry, RankingError, RankingStore};
