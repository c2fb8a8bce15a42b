use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::persist::{self, LoadOutcome};
use crate::io::recovery;
use crate::io::store::{FileStore, KeyValueStore};
use crate::model::{Board, NodePath, ThemeName, UiConfig};

use super::input;
use super::render;
use super::theme::Theme;
use super::view::{self, RowKind, ViewRow};

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Editing a title in place
    Edit,
    /// Waiting for y/n on a destructive action
    Confirm,
}

/// What to do if the user confirms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteObjective { objective: usize },
    DeleteTask { objective: usize, task: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// An in-progress title edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub path: NodePath,
    pub buffer: String,
    /// Byte offset into `buffer`
    pub cursor: usize,
    /// Title when the edit began, restored on cancel
    pub original: String,
    /// The whole buffer is "selected": the first typed character replaces it
    pub is_fresh: bool,
}

/// Main application state
pub struct App {
    pub board: Board,
    pub store: Box<dyn KeyValueStore>,
    /// Where the recovery log lives. `None` disables logging.
    pub data_dir: Option<PathBuf>,
    pub theme_name: ThemeName,
    pub theme: Theme,
    pub ui_config: UiConfig,
    pub mode: Mode,
    /// Visible rows, rebuilt after every change
    pub rows: Vec<ViewRow>,
    /// Cursor index into `rows`
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    /// Where the board was last drawn, for mapping mouse positions
    pub content_area: Rect,
    pub edit: Option<EditState>,
    pub confirm_state: Option<ConfirmState>,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        board: Board,
        store: Box<dyn KeyValueStore>,
        theme_name: ThemeName,
        ui_config: UiConfig,
    ) -> Self {
        let theme = Theme::from_config(theme_name, &ui_config);
        let rows = view::build_rows(&board);
        App {
            board,
            store,
            data_dir: None,
            theme_name,
            theme,
            ui_config,
            mode: Mode::Navigate,
            rows,
            cursor: 0,
            scroll_offset: 0,
            content_area: Rect::default(),
            edit: None,
            confirm_state: None,
            show_help: false,
            status_message: None,
            status_is_error: false,
            should_quit: false,
        }
    }

    pub fn with_data_dir(mut self, data_dir: &Path) -> Self {
        self.data_dir = Some(data_dir.to_path_buf());
        self
    }

    /// Re-derive the rows from the board and keep the cursor on a selectable row
    pub fn rebuild_rows(&mut self) {
        self.rows = view::build_rows(&self.board);
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
        if !self.rows.get(self.cursor).is_some_and(ViewRow::is_selectable) {
            self.move_cursor(1);
        }
    }

    pub fn cursor_row(&self) -> Option<&ViewRow> {
        self.rows.get(self.cursor)
    }

    /// Put the cursor on the row showing `kind` at `path`, if visible
    pub fn select(&mut self, kind: RowKind, path: NodePath) -> bool {
        match view::find_row(&self.rows, kind, path) {
            Some(idx) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    /// Move by `delta` selectable rows, stopping at either end
    pub fn move_cursor(&mut self, delta: isize) {
        let step = delta.signum();
        if step == 0 {
            return;
        }
        let mut remaining = delta.unsigned_abs();
        let mut idx = self.cursor;
        while remaining > 0 {
            let mut next = idx as isize + step;
            while next >= 0
                && (next as usize) < self.rows.len()
                && !self.rows[next as usize].is_selectable()
            {
                next += step;
            }
            if next < 0 || next as usize >= self.rows.len() {
                break;
            }
            idx = next as usize;
            remaining -= 1;
        }
        self.cursor = idx;
    }

    pub fn cursor_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_bottom(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    /// Write the board to the store. A failure keeps the session going with
    /// the in-memory board and logs the unsaved blob for recovery.
    pub fn persist(&mut self) {
        if let Err(e) = persist::save_board(self.store.as_mut(), &self.board) {
            self.set_error(format!("save failed: {}", e));
            if let Some(dir) = &self.data_dir {
                let blob = serde_json::to_string(&self.board).unwrap_or_default();
                let _ = recovery::log_failed_save(dir, &blob, &e.to_string());
            }
        }
    }

    /// Switch between night and light and remember the choice
    pub fn toggle_theme(&mut self) {
        self.theme_name = self.theme_name.toggled();
        self.theme = Theme::from_config(self.theme_name, &self.ui_config);
        if let Err(e) = persist::save_theme(self.store.as_mut(), self.theme_name) {
            self.set_error(format!("could not save theme: {}", e));
        }
    }

    /// Keep the cursor inside the visible window of `height` rows
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
        let max_offset = self.rows.len().saturating_sub(height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}

/// Load the app from the store in `data_dir`.
///
/// Unreadable stored data is written to the recovery log here, before
/// anything can save over it.
fn open_app(data_dir: &Path, ui_config: UiConfig) -> App {
    let store = FileStore::in_dir(data_dir);
    let outcome = persist::load_board(&store);
    let theme_name = persist::load_theme(&store, ui_config.default_theme);

    // Still outside raw mode, so stderr is visible
    if let LoadOutcome::Recovered { raw, .. } = &outcome
        && let Err(e) = recovery::log_unreadable_board(data_dir, raw)
    {
        eprintln!("warning: could not write recovery log: {}", e);
    }

    App::new(outcome.into_board(), Box::new(store), theme_name, ui_config)
        .with_data_dir(data_dir)
}

/// Run the TUI application against the store in `data_dir`
pub fn run(data_dir: &Path, ui_config: UiConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app(data_dir, ui_config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
