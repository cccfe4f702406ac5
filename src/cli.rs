use crate::catalog::DEFAULT_TITLES_PATH;
use crate::game::{GameStatus, GuessError, LetterOutcome, TitleOutcome};
use crate::game_state::{GameInterface, GameSummary, TurnView, UserAction};
use crate::ranking::{DEFAULT_RANKING_PATH, RankingEntry};
use clap::{ArgAction, Parser};
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Guess the movie title one letter at a time
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited list of movie titles
    #[arg(short = 'i', long = "input", default_value = DEFAULT_TITLES_PATH)]
    pub titles_path: PathBuf,

    /// Path to the persisted high score table
    #[arg(short = 'r', long = "ranking", default_value = DEFAULT_RANKING_PATH)]
    pub ranking_path: PathBuf,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,

    /// Seed for picking the title, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the high score table and exit
    #[arg(long)]
    pub show_ranking: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

/// Menu choice read from one input line.
#[derive(Debug, PartialEq, Eq)]
pub enum MenuChoice {
    GuessLetter,
    GuessTitle,
    Quit,
    Invalid,
}

fn parse_menu_choice(input: &str) -> MenuChoice {
    match input.trim() {
        "1" => MenuChoice::GuessLetter,
        "2" => MenuChoice::GuessTitle,
        "3" => MenuChoice::Quit,
        _ => MenuChoice::Invalid,
    }
}

/// One line of console input.
#[derive(Debug, PartialEq, Eq)]
enum LineInput {
    Line(String),
    /// The line was not valid UTF-8. It has been consumed.
    Unreadable,
    /// End of input, or a read error that would repeat.
    Closed,
}

fn read_line<R: BufRead>(reader: &mut R) -> LineInput {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) => LineInput::Closed,
        Ok(_) => LineInput::Line(input.trim().to_string()),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            log::warn!("Ignoring input line that is not valid UTF-8");
            LineInput::Unreadable
        }
        Err(e) => {
            log::warn!("Failed to read from input: {e}");
            LineInput::Closed
        }
    }
}

fn format_letters(letters: &[char]) -> String {
    let joined: Vec<String> = letters.iter().map(char::to_string).collect();
    format!("[{}]", joined.join(", "))
}

pub fn display_turn(view: &TurnView) {
    println!("\nProgress: {}", view.reveal);
    println!("Attempts left: {}", view.attempts_remaining);
    println!("Wrong letters: {}", format_letters(&view.wrong_letters));
    println!("[1] Guess a letter");
    println!("[2] Guess the title");
    println!("[3] Quit");
}

/// Reads the menu line and, for guesses, the follow-up line.
///
/// End of input at either prompt is treated as quitting so a closed stdin
/// cannot spin the loop. A line that cannot be decoded counts as an invalid
/// option.
pub fn read_action<R: BufRead>(reader: &mut R) -> Option<UserAction> {
    let line = match read_line(reader) {
        LineInput::Line(line) => line,
        LineInput::Unreadable => return None,
        LineInput::Closed => return Some(UserAction::Quit),
    };
    let guess: fn(String) -> UserAction = match parse_menu_choice(&line) {
        MenuChoice::GuessLetter => {
            println!("\nEnter a letter:");
            UserAction::GuessLetter
        }
        MenuChoice::GuessTitle => {
            println!("\nEnter the full title:");
            UserAction::GuessTitle
        }
        MenuChoice::Quit => return Some(UserAction::Quit),
        MenuChoice::Invalid => return None,
    };
    match read_line(reader) {
        LineInput::Line(text) => Some(guess(text)),
        LineInput::Unreadable => None,
        LineInput::Closed => Some(UserAction::Quit),
    }
}

pub fn display_letter_outcome(outcome: &LetterOutcome) {
    match outcome {
        LetterOutcome::Hit { .. } => println!("Correct!"),
        LetterOutcome::Miss { .. } => println!("Wrong."),
    }
}

pub fn display_title_outcome(outcome: &TitleOutcome) {
    match outcome {
        TitleOutcome::Correct => println!("\nCorrect! You guessed the title."),
        TitleOutcome::Wrong => println!("\nWrong title. You lost."),
    }
}

pub fn display_rejected_guess(error: &GuessError) {
    match error {
        GuessError::Invalid(_) => println!("Please enter a single valid letter."),
        GuessError::AlreadyTried(_) => println!("You already tried that letter."),
        GuessError::AlreadyRevealed(_) => println!("That letter is already revealed."),
        GuessError::GameOver => println!("The game is already over."),
    }
}

pub fn status_message(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Won => "Congratulations! You guessed the title.",
        GameStatus::LostByAttempts => "You ran out of attempts.",
        GameStatus::LostByWrongTitleGuess => "Better luck next time.",
        GameStatus::QuitEarly => "Game abandoned.",
        GameStatus::InProgress => "Game in progress.",
    }
}

pub fn display_game_over(summary: &GameSummary) {
    // Wrong title and quit already printed their own message.
    if matches!(summary.status, GameStatus::Won | GameStatus::LostByAttempts) {
        println!("\n{}", status_message(summary.status));
    }
    println!("\nThe title was: {}", summary.title);
    println!("Your final score: {}", summary.score);
}

pub fn display_ranking(entries: &[RankingEntry], rank: Option<usize>) {
    if let Some(rank) = rank {
        println!("\nYou placed #{rank}!");
    }
    println!("\nRanking:");
    if entries.is_empty() {
        println!("(no scores yet)");
    }
    for (i, entry) in entries.iter().enumerate() {
        println!("{}. {}: {}", i + 1, entry.nickname, entry.score);
    }
}

/// CLI implementation of the `GameInterface` trait
/// This struct wraps a `BufRead` reader and prints to stdout
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_turn(&mut self, view: &TurnView) {
        display_turn(view);
    }

    fn read_action(&mut self) -> Option<UserAction> {
        read_action(&mut self.reader)
    }

    fn display_invalid_option(&mut self) {
        println!("Invalid option.");
    }

    fn display_letter_outcome(&mut self, outcome: &LetterOutcome) {
        display_letter_outcome(outcome);
    }

    fn display_title_outcome(&mut self, outcome: &TitleOutcome) {
        display_title_outcome(outcome);
    }

    fn display_rejected_guess(&mut self, error: &GuessError) {
        display_rejected_guess(error);
    }

    fn display_quit_message(&mut self) {
        println!("You left the game.");
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        display_game_over(summary);
    }

    fn read_nickname(&mut self) -> Option<String> {
        println!("\nEnter your nickname for the ranking:");
        match read_line(&mut self.reader) {
            LineInput::Line(nickname) => Some(nickname),
            // Rejected as blank, so the player is asked again.
            LineInput::Unreadable => Some(String::new()),
            LineInput::Closed => None,
        }
    }

    fn display_invalid_nickname(&mut self) {
        println!("The nickname cannot be empty.");
    }

    fn display_nickname_taken(&mut self, nickname: &str) {
        println!("The nickname '{nickname}' is already taken, pick another one:");
    }

    fn display_ranking(&mut self, entries: &[RankingEntry], rank: Option<usize>) {
        display_ranking(entries, rank);
    }

    fn display_not_ranked(&mut self) {
        println!("\nYou did not make the ranking.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["movie-hangman"]).unwrap();
        assert_eq!(cli.titles_path, PathBuf::from("peliculas.txt"));
        assert_eq!(cli.ranking_path, PathBuf::from("ranking.bin"));
        assert!(!cli.tui);
        assert!(!cli.show_ranking);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_with_options() {
        let cli = Cli::try_parse_from([
            "movie-hangman",
            "-i",
            "films.txt",
            "--ranking",
            "/tmp/scores.bin",
            "--tui",
            "--seed",
            "42",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.titles_path, PathBuf::from("films.txt"));
        assert_eq!(cli.ranking_path, PathBuf::from("/tmp/scores.bin"));
        assert!(cli.tui);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_bad_seed() {
        assert!(Cli::try_parse_from(["movie-hangman", "--seed", "abc"]).is_err());
    }

    #[test]
    fn test_parse_menu_choice() {
        assert_eq!(parse_menu_choice("1"), MenuChoice::GuessLetter);
        assert_eq!(parse_menu_choice(" 2 "), MenuChoice::GuessTitle);
        assert_eq!(parse_menu_choice("3"), MenuChoice::Quit);
        assert_eq!(parse_menu_choice("4"), MenuChoice::Invalid);
        assert_eq!(parse_menu_choice(""), MenuChoice::Invalid);
        assert_eq!(parse_menu_choice("quit"), MenuChoice::Invalid);
    }

    #[test]
    fn test_read_action_letter() {
        let mut reader = Cursor::new("1\na\n");
        assert_eq!(
            read_action(&mut reader),
            Some(UserAction::GuessLetter("a".to_string()))
        );
    }

    #[test]
    fn test_read_action_title_keeps_inner_spaces() {
        let mut reader = Cursor::new("2\n  Star Wars \n");
        assert_eq!(
            read_action(&mut reader),
            Some(UserAction::GuessTitle("Star Wars".to_string()))
        );
    }

    #[test]
    fn test_read_action_quit() {
        let mut reader = Cursor::new("3\n");
        assert_eq!(read_action(&mut reader), Some(UserAction::Quit));
    }

    #[test]
    fn test_read_action_invalid() {
        let mut reader = Cursor::new("9\n");
        assert_eq!(read_action(&mut reader), None);
    }

    #[test]
    fn test_read_action_end_of_input_quits() {
        let mut reader = Cursor::new("");
        assert_eq!(read_action(&mut reader), Some(UserAction::Quit));
    }

    #[test]
    fn test_read_action_end_of_input_after_choice_quits() {
        let mut reader = Cursor::new("1\n");
        assert_eq!(read_action(&mut reader), Some(UserAction::Quit));
        let mut reader = Cursor::new("2\n");
        assert_eq!(read_action(&mut reader), Some(UserAction::Quit));
    }

    #[test]
    fn test_read_action_blank_follow_up_is_still_a_guess() {
        let mut reader = Cursor::new("1\n\n");
        assert_eq!(
            read_action(&mut reader),
            Some(UserAction::GuessLetter(String::new()))
        );
    }

    #[test]
    fn test_read_action_invalid_utf8_is_invalid_option() {
        let mut reader = Cursor::new(&b"\xff\n2\n\xfe\n3\n"[..]);
        assert_eq!(read_action(&mut reader), None);
        // The bad follow-up line is consumed and reported as invalid too.
        assert_eq!(read_action(&mut reader), None);
        assert_eq!(read_action(&mut reader), Some(UserAction::Quit));
    }

    #[test]
    fn test_read_line_distinguishes_closed_from_unreadable() {
        let mut reader = Cursor::new(&b"\xff\nok\n"[..]);
        assert_eq!(read_line(&mut reader), LineInput::Unreadable);
        assert_eq!(read_line(&mut reader), LineInput::Line("ok".to_string()));
        assert_eq!(read_line(&mut reader), LineInput::Closed);
    }

    #[test]
    fn test_read_nickname() {
        let mut ui = CliInterface::new(Cursor::new("ana\n"));
        assert_eq!(ui.read_nickname(), Some("ana".to_string()));
        assert_eq!(ui.read_nickname(), None);
    }

    #[test]
    fn test_read_nickname_invalid_utf8_is_blank() {
        let mut ui = CliInterface::new(Cursor::new(&b"\xff\nana\n"[..]));
        assert_eq!(ui.read_nickname(), Some(String::new()));
        assert_eq!(ui.read_nickname(), Some("ana".to_string()));
    }

    #[test]
    fn test_format_letters() {
        assert_eq!(format_letters(&[]), "[]");
        assert_eq!(format_letters(&['b', 'q']), "[b, q]");
    }

    #[test]
    fn test_status_messages_differ() {
        assert_ne!(
            status_message(GameStatus::Won),
            status_message(GameStatus::LostByAttempts)
        );
    }
}
