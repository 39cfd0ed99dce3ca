//! Terminal form state and key handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::application::form::QuoteForm;
use crate::infrastructure::client::zerox::PriceSource;

/// Which input receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sell,
    Buy,
}

impl Focus {
    fn toggle(self) -> Self {
        match self {
            Focus::Sell => Focus::Buy,
            Focus::Buy => Focus::Sell,
        }
    }
}

pub struct FormApp<S> {
    pub form: QuoteForm<S>,
    pub focus: Focus,
    pub should_quit: bool,
}

impl<S: PriceSource> FormApp<S> {
    pub fn new(form: QuoteForm<S>) -> Self {
        Self {
            form,
            focus: Focus::Sell,
            should_quit: false,
        }
    }

    /// Pull in anything the fetcher published since the last frame
    pub fn tick(&mut self) -> bool {
        self.form.sync()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('r') => {
                    self.form.revalidate();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = self.focus.toggle();
            }
            KeyCode::Backspace => {
                match self.focus {
                    Focus::Sell => self.form.pop_sell_char(),
                    Focus::Buy => self.form.pop_buy_char(),
                };
            }
            KeyCode::Char(c) => {
                match self.focus {
                    Focus::Sell => self.form.push_sell_char(c),
                    Focus::Buy => self.form.push_buy_char(c),
                };
            }
            _ => {}
        }
    }
}
