//! TUI (Terminal User Interface) module for Movie Hangman
//!
//! This module provides a full-screen terminal interface using Ratatui.
//!
//! # State Machine
//! The UI follows these state transitions:
//! - `ChoosingAction` → `EnteringLetter` | `EnteringTitle` → back to `ChoosingAction`
//! - After the game: `EnteringNickname` (positive scores only) → `Finished`

use crate::game::{GuessError, LetterOutcome, TitleOutcome};
use crate::game_state::{GameInterface, GameSummary, TurnView, UserAction};
use crate::ranking::RankingEntry;
use crate::{cli, debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const MAX_INPUT_LEN: usize = 64;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const REVEAL_STYLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    ChoosingAction,
    EnteringLetter,
    EnteringTitle,
    EnteringNickname,
    /// Game and ranking are done; any key leaves.
    Finished,
}

/// Outcome of feeding one key to the action prompt.
#[derive(Debug, PartialEq, Eq)]
enum KeyResult {
    Pending,
    Action(UserAction),
    Unrecognized,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    view: Option<&'a TurnView>,
    summary: Option<&'a GameSummary>,
    current_input: &'a str,
    state: TuiState,
    ranking: &'a [RankingEntry],
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Spaces the reveal out so single masked letters are easy to count.
fn spaced(reveal: &str) -> String {
    reveal
        .chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_modifier_keys(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Applies a line-editing key (typing or Backspace) to `input`.
fn edit_line(input: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if input.chars().count() < MAX_INPUT_LEN => input.push(c),
        KeyCode::Backspace => {
            input.pop();
        }
        _ => {}
    }
}

/// Maps one key press on the action prompt to the next UI state and result.
fn action_for_key(state: TuiState, key: KeyEvent, input: &mut String) -> (TuiState, KeyResult) {
    if has_modifier_keys(&key) {
        debug_log!("action_for_key() - Ignoring key with modifier: {:?}", key.modifiers);
        return (state, KeyResult::Pending);
    }

    match state {
        TuiState::ChoosingAction => match key.code {
            KeyCode::Char('1') => (TuiState::EnteringLetter, KeyResult::Pending),
            KeyCode::Char('2') => {
                input.clear();
                (TuiState::EnteringTitle, KeyResult::Pending)
            }
            KeyCode::Char('3') | KeyCode::Esc => (state, KeyResult::Action(UserAction::Quit)),
            KeyCode::Char(_) => (state, KeyResult::Unrecognized),
            _ => (state, KeyResult::Pending),
        },
        TuiState::EnteringLetter => match key.code {
            KeyCode::Esc => (TuiState::ChoosingAction, KeyResult::Pending),
            KeyCode::Char(c) => (
                TuiState::ChoosingAction,
                KeyResult::Action(UserAction::GuessLetter(c.to_string())),
            ),
            _ => (state, KeyResult::Pending),
        },
        TuiState::EnteringTitle => match key.code {
            KeyCode::Esc => {
                input.clear();
                (TuiState::ChoosingAction, KeyResult::Pending)
            }
            KeyCode::Enter => (
                TuiState::ChoosingAction,
                KeyResult::Action(UserAction::GuessTitle(std::mem::take(input))),
            ),
            _ => {
                edit_line(input, key);
                (state, KeyResult::Pending)
            }
        },
        TuiState::EnteringNickname | TuiState::Finished => (state, KeyResult::Pending),
    }
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    state: TuiState,
    view: Option<TurnView>,
    summary: Option<GameSummary>,
    current_input: String,
    ranking: Vec<RankingEntry>,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let terminal = match Self::setup_terminal() {
            Ok(terminal) => terminal,
            Err(e) => {
                // Leave the shell usable even though the interface never started.
                let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
                let _ = disable_raw_mode();
                return Err(e);
            }
        };
        info_log!("Terminal setup complete");

        Ok(Self {
            terminal,
            state: TuiState::ChoosingAction,
            view: None,
            summary: None,
            current_input: String::new(),
            ranking: Vec::new(),
            message: String::new(),
            error_message: String::new(),
            status: "Guess the movie!".to_string(),
        })
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        Terminal::new(CrosstermBackend::new(stdout))
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            view: self.view.as_ref(),
            summary: self.summary.as_ref(),
            current_input: &self.current_input,
            state: self.state,
            ranking: &self.ranking,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(5), // Masked movie title
                Constraint::Min(8),    // Info panel
                Constraint::Length(3), // Input line
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_board(f, chunks[1], ctx.view, ctx.summary);
        Self::render_info(f, chunks[2], ctx);
        Self::render_input(f, chunks[3], ctx.state, ctx.current_input);
        Self::render_status(f, chunks[4], ctx.status);
        Self::render_instructions(f, chunks[5], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("MOVIE HANGMAN")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(
        f: &mut Frame,
        area: Rect,
        view: Option<&TurnView>,
        summary: Option<&GameSummary>,
    ) {
        // Once the game is over the real title replaces the mask.
        let text = match (summary, view) {
            (Some(summary), _) => spaced(&summary.title),
            (None, Some(view)) => spaced(&view.reveal),
            (None, None) => String::new(),
        };
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, REVEAL_STYLE))])
            .alignment(Alignment::Center)
            .block(Block::default().title("Movie").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();

        if let Some(view) = ctx.view {
            lines.push(Line::from(vec![
                Span::raw("Attempts left: "),
                Span::styled(view.attempts_remaining.to_string(), INFO_STYLE),
            ]));
            let wrong: Vec<String> = view.wrong_letters.iter().map(char::to_string).collect();
            lines.push(Line::from(vec![
                Span::raw("Wrong letters: "),
                Span::styled(wrong.join(" "), ERROR_STYLE),
            ]));
            lines.push(Line::from(format!("Score: {}", view.score)));
        }

        if let Some(summary) = ctx.summary {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                cli::status_message(summary.status),
                SUCCESS_STYLE,
            )));
            lines.push(Line::from(format!("Final score: {}", summary.score)));
        }

        if !ctx.ranking.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Ranking", HEADER_STYLE)));
            for (i, entry) in ctx.ranking.iter().enumerate() {
                lines.push(Line::from(format!("{}. {}: {}", i + 1, entry.nickname, entry.score)));
            }
        }

        if !ctx.message.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(ctx.message, MESSAGE_STYLE)));
        }
        if !ctx.error_message.is_empty() {
            lines.push(Line::from(Span::styled(ctx.error_message, ERROR_STYLE)));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_input(f: &mut Frame, area: Rect, state: TuiState, current_input: &str) {
        let label = match state {
            TuiState::EnteringTitle => "Title",
            TuiState::EnteringNickname => "Nickname",
            TuiState::EnteringLetter => "Letter",
            TuiState::ChoosingAction | TuiState::Finished => "",
        };
        let text = if matches!(state, TuiState::EnteringTitle | TuiState::EnteringNickname) {
            format!("{current_input}_")
        } else {
            String::new()
        };
        let paragraph =
            Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(label));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::ChoosingAction => "1: Guess a letter | 2: Guess the title | 3/ESC: Quit",
            TuiState::EnteringLetter => "Press a letter | ESC: Back",
            TuiState::EnteringTitle => "Type the title | ENTER: Submit | ESC: Back",
            TuiState::EnteringNickname => "Type your nickname | ENTER: Submit | ESC: Skip",
            TuiState::Finished => "Press any key to exit",
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    /// Blocks until a key press arrives, skipping every other event.
    fn next_key() -> Result<KeyEvent, io::Error> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(key),
                other => {
                    debug_log!("next_key() - Ignoring event: {:?}", other);
                }
            }
        }
    }

    fn handle_action_key(&mut self, key: KeyEvent) -> KeyResult {
        let (next, result) = action_for_key(self.state, key, &mut self.current_input);
        if next != self.state {
            match next {
                TuiState::EnteringLetter => {
                    self.status = "Press the letter you want to try".to_string();
                }
                TuiState::EnteringTitle => {
                    self.status = "Type the full title - a wrong guess ends the game".to_string();
                }
                _ => {}
            }
        }
        self.state = next;
        result
    }

    fn wait_for_exit_key(&mut self) {
        self.state = TuiState::Finished;
        self.status = "Thanks for playing".to_string();
        self.draw_or_log();
        if let Err(e) = Self::next_key() {
            debug_log!("wait_for_exit_key() - {}", e);
        }
    }
}

impl GameInterface for TuiInterface {
    fn display_turn(&mut self, view: &TurnView) {
        self.view = Some(view.clone());
    }

    fn read_action(&mut self) -> Option<UserAction> {
        self.state = TuiState::ChoosingAction;
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Quit");
                return Some(UserAction::Quit);
            }
            let key = match Self::next_key() {
                Ok(key) => key,
                Err(e) => {
                    info_log!("read_action() - Input error {}, returning Quit", e);
                    return Some(UserAction::Quit);
                }
            };
            self.message.clear();
            self.error_message.clear();
            match self.handle_action_key(key) {
                KeyResult::Pending => {}
                KeyResult::Action(action) => return Some(action),
                KeyResult::Unrecognized => return None,
            }
        }
    }

    fn display_invalid_option(&mut self) {
        self.error_message = "Invalid option.".to_string();
    }

    fn display_letter_outcome(&mut self, outcome: &LetterOutcome) {
        self.message = match outcome {
            LetterOutcome::Hit { letter, revealed } => {
                format!("Correct! '{letter}' appears {revealed} time(s).")
            }
            LetterOutcome::Miss { letter } => format!("Wrong, there is no '{letter}'."),
        };
    }

    fn display_title_outcome(&mut self, outcome: &TitleOutcome) {
        self.message = match outcome {
            TitleOutcome::Correct => "Correct! You guessed the title.".to_string(),
            TitleOutcome::Wrong => "Wrong title. You lost.".to_string(),
        };
    }

    fn display_rejected_guess(&mut self, error: &GuessError) {
        self.error_message = format!("Rejected: {error}");
    }

    fn display_quit_message(&mut self) {
        self.message = "You left the game.".to_string();
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        self.summary = Some(summary.clone());
        self.status = format!("The title was: {}", summary.title);
        self.draw_or_log();
    }

    fn read_nickname(&mut self) -> Option<String> {
        self.state = TuiState::EnteringNickname;
        self.current_input.clear();
        self.status = "You made it! Enter a nickname for the ranking".to_string();
        loop {
            if self.draw().is_err() {
                return None;
            }
            let key = Self::next_key().ok()?;
            if has_modifier_keys(&key) {
                continue;
            }
            match key.code {
                KeyCode::Esc => return None,
                KeyCode::Enter => return Some(std::mem::take(&mut self.current_input)),
                _ => edit_line(&mut self.current_input, key),
            }
        }
    }

    fn display_invalid_nickname(&mut self) {
        self.error_message = "The nickname cannot be empty.".to_string();
    }

    fn display_nickname_taken(&mut self, nickname: &str) {
        self.error_message = format!("'{nickname}' is already taken, pick another one.");
    }

    fn display_ranking(&mut self, entries: &[RankingEntry], rank: Option<usize>) {
        self.ranking = entries.to_vec();
        self.error_message.clear();
        self.message = match rank {
            Some(rank) => format!("You placed #{rank}!"),
            None => "Your score did not make the top of the table.".to_string(),
        };
        self.wait_for_exit_key();
    }

    fn display_not_ranked(&mut self) {
        self.message = "You did not make the ranking.".to_string();
        self.wait_for_exit_key();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced_reveal() {
        assert_eq!(spaced("*a* *"), "* a *   *");
        assert_eq!(spaced(""), "");
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_menu_keys_choose_mode() {
        let mut input = "stale".to_string();
        assert_eq!(
            action_for_key(TuiState::ChoosingAction, press(KeyCode::Char('1')), &mut input),
            (TuiState::EnteringLetter, KeyResult::Pending)
        );
        assert_eq!(
            action_for_key(TuiState::ChoosingAction, press(KeyCode::Char('2')), &mut input),
            (TuiState::EnteringTitle, KeyResult::Pending)
        );
        assert!(input.is_empty());
        for code in [KeyCode::Char('3'), KeyCode::Esc] {
            assert_eq!(
                action_for_key(TuiState::ChoosingAction, press(code), &mut input),
                (TuiState::ChoosingAction, KeyResult::Action(UserAction::Quit))
            );
        }
        assert_eq!(
            action_for_key(TuiState::ChoosingAction, press(KeyCode::Char('x')), &mut input),
            (TuiState::ChoosingAction, KeyResult::Unrecognized)
        );
        assert_eq!(
            action_for_key(TuiState::ChoosingAction, press(KeyCode::Enter), &mut input),
            (TuiState::ChoosingAction, KeyResult::Pending)
        );
    }

    #[test]
    fn test_letter_mode_guesses_one_key() {
        let mut input = String::new();
        assert_eq!(
            action_for_key(TuiState::EnteringLetter, press(KeyCode::Char('Q')), &mut input),
            (
                TuiState::ChoosingAction,
                KeyResult::Action(UserAction::GuessLetter("Q".to_string()))
            )
        );
        assert_eq!(
            action_for_key(TuiState::EnteringLetter, press(KeyCode::Esc), &mut input),
            (TuiState::ChoosingAction, KeyResult::Pending)
        );
    }

    #[test]
    fn test_title_mode_edits_and_submits() {
        let mut input = String::new();
        for code in [
            KeyCode::Char('u'),
            KeyCode::Char('p'),
            KeyCode::Char('s'),
            KeyCode::Backspace,
        ] {
            assert_eq!(
                action_for_key(TuiState::EnteringTitle, press(code), &mut input),
                (TuiState::EnteringTitle, KeyResult::Pending)
            );
        }
        assert_eq!(input, "up");
        assert_eq!(
            action_for_key(TuiState::EnteringTitle, press(KeyCode::Enter), &mut input),
            (
                TuiState::ChoosingAction,
                KeyResult::Action(UserAction::GuessTitle("up".to_string()))
            )
        );
        assert!(input.is_empty());
    }

    #[test]
    fn test_title_mode_escape_discards_input() {
        let mut input = "ali".to_string();
        assert_eq!(
            action_for_key(TuiState::EnteringTitle, press(KeyCode::Esc), &mut input),
            (TuiState::ChoosingAction, KeyResult::Pending)
        );
        assert!(input.is_empty());
    }

    #[test]
    fn test_modified_keys_are_ignored() {
        let mut input = String::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            action_for_key(TuiState::EnteringLetter, ctrl_c, &mut input),
            (TuiState::EnteringLetter, KeyResult::Pending)
        );
    }

    #[test]
    fn test_edit_line_caps_length() {
        let mut input = "a".repeat(MAX_INPUT_LEN);
        edit_line(&mut input, press(KeyCode::Char('b')));
        assert_eq!(input.chars().count(), MAX_INPUT_LEN);
        edit_line(&mut input, press(KeyCode::Backspace));
        assert_eq!(input.chars().count(), MAX_INPUT_LEN - 1);
    }

    #[test]
    fn test_modifier_keys_detected() {
        let plain = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        let ctrl = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!has_modifier_keys(&plain));
        assert!(!has_modifier_keys(&shifted));
        assert!(has_modifier_keys(&ctrl));
    }
}
