//! Hangman state machine over a single movie title.
//!
//! A [`GuessGame`] starts `InProgress` and moves to exactly one terminal
//! [`GameStatus`]. Every operation on a terminal game is rejected with
//! [`GuessError::GameOver`] and leaves the state untouched.

use crate::catalog::Title;
use crate::{debug_log, info_log};
use std::collections::BTreeSet;
use thiserror::Error;

pub const MAX_ATTEMPTS: u32 = 10;
pub const MASK_CHAR: char = '*';

pub const LETTER_POINTS: i32 = 10;
pub const MISS_PENALTY: i32 = 10;
/// Charged once more when the last attempt is spent.
pub const EXHAUSTED_PENALTY: i32 = 10;
pub const TITLE_POINTS: i32 = 20;
pub const WRONG_TITLE_PENALTY: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    LostByAttempts,
    LostByWrongTitleGuess,
    QuitEarly,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Result of an accepted letter guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterOutcome {
    Hit { letter: char, revealed: usize },
    Miss { letter: char },
}

/// Result of a full-title guess. Both variants end the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleOutcome {
    Correct,
    Wrong,
}

/// A guess that was refused without touching the game state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("'{0}' is not a single letter")]
    Invalid(String),
    #[error("letter '{0}' was already tried")]
    AlreadyTried(char),
    #[error("letter '{0}' is already revealed")]
    AlreadyRevealed(char),
    #[error("the game is already over")]
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GuessGame {
    title: Vec<char>,
    reveal: Vec<char>,
    attempts_remaining: u32,
    correct_letters: BTreeSet<char>,
    wrong_letters: BTreeSet<char>,
    score: i32,
    status: GameStatus,
}

fn is_maskable(c: char) -> bool {
    c.is_alphabetic()
}

/// Builds the initial reveal mask: letters hidden, everything else visible.
pub fn mask_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if is_maskable(c) { MASK_CHAR } else { c })
        .collect()
}

impl GuessGame {
    pub fn new(title: &Title) -> Self {
        let reveal: Vec<char> = mask_title(title.as_str()).chars().collect();
        let title: Vec<char> = title.as_str().chars().collect();
        // A title without letters has nothing left to guess.
        let status = if reveal == title {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        };
        info_log!("New game: {} characters, status {:?}", title.len(), status);
        Self {
            title,
            reveal,
            attempts_remaining: MAX_ATTEMPTS,
            correct_letters: BTreeSet::new(),
            wrong_letters: BTreeSet::new(),
            score: 0,
            status,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    pub fn reveal(&self) -> String {
        self.reveal.iter().collect()
    }

    pub fn title(&self) -> String {
        self.title.iter().collect()
    }

    pub fn wrong_letters(&self) -> Vec<char> {
        self.wrong_letters.iter().copied().collect()
    }

    pub fn correct_letters(&self) -> Vec<char> {
        self.correct_letters.iter().copied().collect()
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.reveal == self.title
    }

    fn ensure_in_progress(&self) -> Result<(), GuessError> {
        if self.status.is_terminal() {
            Err(GuessError::GameOver)
        } else {
            Ok(())
        }
    }

    /// Applies a single-letter guess. The input is lowercased first.
    pub fn guess_letter(&mut self, input: &str) -> Result<LetterOutcome, GuessError> {
        self.ensure_in_progress()?;

        let lowered = input.to_lowercase();
        let mut chars = lowered.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_alphabetic() => c,
            _ => return Err(GuessError::Invalid(input.to_string())),
        };

        if self.correct_letters.contains(&letter) || self.wrong_letters.contains(&letter) {
            return Err(GuessError::AlreadyTried(letter));
        }

        let outcome = if self.title.contains(&letter) {
            let mut revealed = 0;
            for (slot, &c) in self.reveal.iter_mut().zip(&self.title) {
                if c == letter && *slot != letter {
                    *slot = letter;
                    revealed += 1;
                }
            }
            if revealed == 0 {
                return Err(GuessError::AlreadyRevealed(letter));
            }
            self.correct_letters.insert(letter);
            self.score += LETTER_POINTS;
            LetterOutcome::Hit { letter, revealed }
        } else {
            self.wrong_letters.insert(letter);
            self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
            self.score -= MISS_PENALTY;
            LetterOutcome::Miss { letter }
        };
        debug_log!(
            "guess_letter: {:?}, attempts={}, score={}",
            outcome,
            self.attempts_remaining,
            self.score
        );

        if self.is_fully_revealed() {
            self.status = GameStatus::Won;
        } else if self.attempts_remaining == 0 {
            self.status = GameStatus::LostByAttempts;
            self.score -= EXHAUSTED_PENALTY;
        }
        if self.status.is_terminal() {
            info_log!("Game over: {:?}, score {}", self.status, self.score);
        }

        Ok(outcome)
    }

    /// Compares a full-title guess case-insensitively. Always ends the game.
    pub fn guess_title(&mut self, text: &str) -> Result<TitleOutcome, GuessError> {
        self.ensure_in_progress()?;

        let guess: Vec<char> = text.to_lowercase().chars().collect();
        let outcome = if guess == self.title {
            self.status = GameStatus::Won;
            self.score += TITLE_POINTS;
            TitleOutcome::Correct
        } else {
            self.status = GameStatus::LostByWrongTitleGuess;
            self.score -= WRONG_TITLE_PENALTY;
            TitleOutcome::Wrong
        };
        self.attempts_remaining = 0;
        info_log!("Title guess {:?}, final score {}", outcome, self.score);
        Ok(outcome)
    }

    pub fn quit(&mut self) -> Result<(), GuessError> {
        self.ensure_in_progress()?;
        self.status = GameStatus::QuitEarly;
        self.attempts_remaining = 0;
        info_log!("Player quit with score {}", self.score);
        Ok(())
    }
}
