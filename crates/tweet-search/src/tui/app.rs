//! Application state and event loop

use anyhow::{Context, Result};
use crossterm::{
    cursor::SetCursorStyle,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::ListState, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use super::input::TextInput;
use super::ui;
use crate::controller::Controller;

/// Rows moved by PageUp/PageDown
const PAGE: usize = 10;

pub struct App {
    pub input: TextInput,
    pub controller: Controller,
    /// Selection and scroll offset of the results list
    pub list_state: ListState,
    /// Endpoint shown in the results title
    pub endpoint: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: Controller, endpoint: impl Into<String>) -> Self {
        Self {
            input: TextInput::new(),
            controller,
            list_state: ListState::default(),
            endpoint: endpoint.into(),
            should_quit: false,
        }
    }

    /// Search for the current input text
    pub fn submit(&mut self) {
        if self.controller.submit(&self.input.text).is_none() {
            log::debug!("Ignoring blank search input");
        }
    }

    /// Apply finished searches; called once per frame
    pub fn tick(&mut self) {
        if self.controller.poll() {
            self.reset_selection();
        }
    }

    fn reset_selection(&mut self) {
        self.list_state = ListState::default();
        if !self.controller.results().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.controller.results().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.list_state.select(Some(next));
    }

    fn select_first(&mut self) {
        if !self.controller.results().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        let len = self.controller.results().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            (KeyCode::Enter, _) => self.submit(),
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                self.move_selection(-1)
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::CONTROL) => {
                self.move_selection(1)
            }
            (KeyCode::PageUp, _) => self.move_selection(-(PAGE as isize)),
            (KeyCode::PageDown, _) => self.move_selection(PAGE as isize),
            (KeyCode::Home, KeyModifiers::CONTROL) => self.select_first(),
            (KeyCode::End, KeyModifiers::CONTROL) => self.select_last(),
            _ => {
                self.input.handle_key(key.code, key.modifiers);
            }
        }
    }
}

/// Run the terminal UI until the user quits
pub fn run(controller: Controller, endpoint: &str) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw terminal mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetCursorStyle::BlinkingBar)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller, endpoint);

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        SetCursorStyle::DefaultUserShape
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // ~60Hz keeps the spinner smooth without spinning the CPU
    const FRAME_TIME: Duration = Duration::from_micros(16_667);

    loop {
        let frame_start = Instant::now();

        let mut events_processed = 0usize;
        while event::poll(Duration::from_millis(0))? && events_processed < 100 {
            app.handle_event(event::read()?);
            events_processed += 1;
            if app.should_quit {
                break;
            }
        }

        if app.should_quit {
            break;
        }

        app.tick();

        terminal.draw(|f| ui::render(f, app))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    Ok(())
}
