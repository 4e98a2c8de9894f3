//! # Prompts
//!
//! The two questions the menu asks: "which entry?" and "press Enter to
//! continue". [`Prompter`] is the seam the session loop talks to, so the loop
//! can be driven by a script of answers in tests. [`TerminalPrompter`] is the
//! real implementation: a ratatui select list on the alternate screen,
//! followed by a plain line read from stdin once a script has run.
//!
//! ## Key Bindings
//!
//! - `↑` / `k`, `↓` / `j` - move the highlight (wrapping)
//! - `Home` / `g`, `End` / `G` - jump to the first / last entry
//! - `Enter` - select
//! - `Esc` / `q` / `Ctrl+c` - cancel

use crate::ui::app::Menu;
use crate::ui::choices::ChoiceValue;
use crate::ui::render;
use crate::ui::theme::Theme;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::ListState, Terminal};
use std::io::{self, BufRead, Write};

/// Asks the user questions on behalf of the session loop.
pub trait Prompter {
    /// Show `menu` and return the chosen value, or `None` if cancelled.
    fn select(&mut self, menu: &Menu) -> Result<Option<ChoiceValue>>;

    /// Wait for the user to acknowledge. Returns `false` when input is closed.
    fn acknowledge(&mut self, message: &str) -> Result<bool>;
}

/// Trait for reading terminal events (allows dependency injection for testing)
pub trait EventReader {
    fn read_event(&mut self) -> Result<Event>;
}

/// Production event reader backed by crossterm.
pub struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self) -> Result<Event> {
        event::read().context("Failed to read keyboard event")
    }
}

/// Outcome of a single key press in the select list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStep {
    Continue,
    Submit(usize),
    Cancel,
}

/// Highlight position within a select list.
#[derive(Debug, Clone, Default)]
pub struct SelectState {
    pub list_state: ListState,
    len: usize,
}

impl SelectState {
    pub fn new(len: usize) -> Self {
        let mut list_state = ListState::default();
        if len > 0 {
            list_state.select(Some(0));
        }
        Self { list_state, len }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            let next = self.selected().map_or(0, |i| (i + 1) % self.len);
            self.list_state.select(Some(next));
        }
    }

    pub fn previous(&mut self) {
        if self.len > 0 {
            let previous = match self.selected() {
                Some(0) | None => self.len - 1,
                Some(i) => i - 1,
            };
            self.list_state.select(Some(previous));
        }
    }

    pub fn first(&mut self) {
        if self.len > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.list_state.select(Some(self.len - 1));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptStep {
        if key.kind != KeyEventKind::Press {
            return PromptStep::Continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                PromptStep::Cancel
            }
            KeyCode::Esc | KeyCode::Char('q') => PromptStep::Cancel,
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                PromptStep::Continue
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                PromptStep::Continue
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.first();
                PromptStep::Continue
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.last();
                PromptStep::Continue
            }
            KeyCode::Enter => match self.selected() {
                Some(index) => PromptStep::Submit(index),
                None => PromptStep::Continue,
            },
            _ => PromptStep::Continue,
        }
    }
}

type MenuTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Interactive prompter drawing on the real terminal.
pub struct TerminalPrompter<R: EventReader> {
    events: R,
    theme: &'static Theme,
}

impl<R: EventReader> TerminalPrompter<R> {
    pub fn new(events: R, theme: &'static Theme) -> Self {
        Self { events, theme }
    }

    fn select_loop(
        &mut self,
        terminal: &mut MenuTerminal,
        menu: &Menu,
    ) -> Result<Option<ChoiceValue>> {
        let mut state = SelectState::new(menu.choices.len());

        loop {
            terminal
                .draw(|frame| render::render(frame, menu, &mut state, self.theme))
                .context("Failed to draw menu")?;

            let Event::Key(key) = self.events.read_event()? else {
                continue;
            };

            match state.handle_key(key) {
                PromptStep::Continue => {}
                PromptStep::Cancel => return Ok(None),
                PromptStep::Submit(index) => {
                    return Ok(menu.choices.get(index).map(|c| c.value.clone()));
                }
            }
        }
    }
}

impl<R: EventReader> Prompter for TerminalPrompter<R> {
    fn select(&mut self, menu: &Menu) -> Result<Option<ChoiceValue>> {
        let mut terminal = setup_terminal()?;

        // Restore the terminal even if the loop failed
        let result = self.select_loop(&mut terminal, menu);
        let cleanup_result = restore_terminal(&mut terminal);

        let answer = result?;
        cleanup_result?;
        Ok(answer)
    }

    fn acknowledge(&mut self, message: &str) -> Result<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{} ", message).context("Failed to write prompt")?;
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        Ok(read > 0)
    }
}

fn setup_terminal() -> Result<MenuTerminal> {
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut MenuTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Best-effort terminal restore for the panic hook.
pub fn force_restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Mock event reader for testing that returns a predetermined sequence of events
    struct MockEventReader {
        events: VecDeque<Event>,
    }

    impl MockEventReader {
        fn new(events: Vec<Event>) -> Self {
            Self {
                events: VecDeque::from(events),
            }
        }
    }

    impl EventReader for MockEventReader {
        fn read_event(&mut self) -> Result<Event> {
            self.events
                .pop_front()
                .context("No more events in mock reader")
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_mock_event_reader() {
        let mut reader = MockEventReader::new(vec![Event::Key(key(KeyCode::Enter))]);
        assert!(matches!(
            reader.read_event().unwrap(),
            Event::Key(KeyEvent {
                code: KeyCode::Enter,
                ..
            })
        ));
        assert!(reader.read_event().is_err());
    }

    #[test]
    fn test_new_state_selects_first() {
        assert_eq!(SelectState::new(3).selected(), Some(0));
        assert_eq!(SelectState::new(0).selected(), None);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = SelectState::new(3);
        state.handle_key(key(KeyCode::Up));
        assert_eq!(state.selected(), Some(2));
        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(state.selected(), Some(0));
        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Down));
        assert_eq!(state.selected(), Some(2));
    }

    #[test]
    fn test_home_and_end() {
        let mut state = SelectState::new(5);
        state.handle_key(key(KeyCode::End));
        assert_eq!(state.selected(), Some(4));
        state.handle_key(key(KeyCode::Char('g')));
        assert_eq!(state.selected(), Some(0));
        state.handle_key(key(KeyCode::Char('G')));
        assert_eq!(state.selected(), Some(4));
    }

    #[test]
    fn test_enter_submits_highlighted() {
        let mut state = SelectState::new(3);
        state.handle_key(key(KeyCode::Down));
        assert_eq!(state.handle_key(key(KeyCode::Enter)), PromptStep::Submit(1));
    }

    #[test]
    fn test_enter_on_empty_list_does_nothing() {
        let mut state = SelectState::new(0);
        assert_eq!(state.handle_key(key(KeyCode::Enter)), PromptStep::Continue);
    }

    #[test]
    fn test_cancel_keys() {
        let mut state = SelectState::new(2);
        assert_eq!(state.handle_key(key(KeyCode::Esc)), PromptStep::Cancel);
        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), PromptStep::Cancel);
        assert_eq!(
            state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            PromptStep::Cancel
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let mut state = SelectState::new(2);
        let mut release = key(KeyCode::Down);
        release.kind = KeyEventKind::Release;
        assert_eq!(state.handle_key(release), PromptStep::Continue);
        assert_eq!(state.selected(), Some(0));
    }
}
