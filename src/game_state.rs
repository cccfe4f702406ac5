//! Session controller: drives a [`GuessGame`] through a [`GameInterface`]
//! and records a positive final score in the [`RankingStore`].

use crate::game::{GameStatus, GuessError, GuessGame, LetterOutcome, TitleOutcome};
use crate::ranking::{RankingEntry, RankingError, RankingStore};
use crate::{debug_log, info_log};

/// One command chosen by the player on an in-progress turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    GuessLetter(String),
    GuessTitle(String),
    Quit,
}

/// What the player sees at the start of every turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub reveal: String,
    pub attempts_remaining: u32,
    pub wrong_letters: Vec<char>,
    pub score: i32,
}

impl From<&GuessGame> for TurnView {
    fn from(game: &GuessGame) -> Self {
        Self {
            reveal: game.reveal(),
            attempts_remaining: game.attempts_remaining(),
            wrong_letters: game.wrong_letters(),
            score: game.score(),
        }
    }
}

/// Shown once the game reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub title: String,
    pub status: GameStatus,
    pub score: i32,
}

impl From<&GuessGame> for GameSummary {
    fn from(game: &GuessGame) -> Self {
        Self {
            title: game.title(),
            status: game.status(),
            score: game.score(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Score was not positive, or the player abandoned the nickname prompt.
    NotRanked { status: GameStatus, score: i32 },
    Ranked {
        status: GameStatus,
        score: i32,
        nickname: String,
        rank: Option<usize>,
    },
}

/// Input/output capability the session runs against.
///
/// `read_action` returns `None` for an unrecognized command; the loop reports
/// it and asks again.
pub trait GameInterface {
    fn display_turn(&mut self, view: &TurnView);
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_invalid_option(&mut self);
    fn display_letter_outcome(&mut self, outcome: &LetterOutcome);
    fn display_title_outcome(&mut self, outcome: &TitleOutcome);
    fn display_rejected_guess(&mut self, error: &GuessError);
    fn display_quit_message(&mut self);
    fn display_game_over(&mut self, summary: &GameSummary);
    /// `None` means the player gave up on entering a nickname.
    fn read_nickname(&mut self) -> Option<String>;
    fn display_invalid_nickname(&mut self);
    fn display_nickname_taken(&mut self, nickname: &str);
    fn display_ranking(&mut self, entries: &[RankingEntry], rank: Option<usize>);
    fn display_not_ranked(&mut self);
}

/// Runs turns until the game reaches a terminal state.
pub fn game_loop<I: GameInterface + ?Sized>(game: &mut GuessGame, interface: &mut I) -> GameStatus {
    while !game.status().is_terminal() {
        interface.display_turn(&TurnView::from(&*game));

        let Some(action) = interface.read_action() else {
            interface.display_invalid_option();
            continue;
        };
        debug_log!("game_loop() - action {:?}", action);

        match action {
            UserAction::GuessLetter(input) => match game.guess_letter(&input) {
                Ok(outcome) => interface.display_letter_outcome(&outcome),
                Err(e) => interface.display_rejected_guess(&e),
            },
            UserAction::GuessTitle(text) => match game.guess_title(&text) {
                Ok(outcome) => interface.display_title_outcome(&outcome),
                Err(e) => interface.display_rejected_guess(&e),
            },
            UserAction::Quit => match game.quit() {
                Ok(()) => interface.display_quit_message(),
                Err(e) => interface.display_rejected_guess(&e),
            },
        }
    }

    interface.display_game_over(&GameSummary::from(&*game));
    game.status()
}

fn prompt_nickname<I: GameInterface + ?Sized>(
    ranking: &RankingStore,
    interface: &mut I,
) -> Option<String> {
    loop {
        let raw = interface.read_nickname()?;
        let nickname = raw.trim();
        if nickname.is_empty() {
            interface.display_invalid_nickname();
        } else if ranking.nickname_exists(nickname) {
            interface.display_nickname_taken(nickname);
        } else {
            return Some(nickname.to_string());
        }
    }
}

/// Plays one game, then offers the ranking to a positive score.
///
/// Ranking persistence errors are returned to the caller; the in-memory
/// table may already hold the new entry.
pub fn run_session<I: GameInterface + ?Sized>(
    game: &mut GuessGame,
    ranking: &mut RankingStore,
    interface: &mut I,
) -> Result<SessionOutcome, RankingError> {
    let status = game_loop(game, interface);
    let score = game.score();

    if score <= 0 {
        interface.display_not_ranked();
        return Ok(SessionOutcome::NotRanked { status, score });
    }

    let Some(nickname) = prompt_nickname(ranking, interface) else {
        info_log!("Nickname prompt abandoned, score {} not recorded", score);
        interface.display_not_ranked();
        return Ok(SessionOutcome::NotRanked { status, score });
    };

    let rank = ranking.add_score(&nickname, score)?;
    interface.display_ranking(ranking.entries(), rank);
    Ok(SessionOutcome::Ranked {
        status,
        score,
        nickname,
        rank,
    })
}
