mod confirm;
mod edit;
mod mouse;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::NodePath;

use super::app::{App, Mode};
use super::dispatch::{self, Action};

// Import all submodule functions into this module's namespace
// so that submodules can access cross-module functions via `use super::*;`
#[allow(unused_imports)]
use confirm::*;
#[allow(unused_imports)]
use edit::*;
#[allow(unused_imports)]
use navigate::*;

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// Handle a bracketed paste event. Only active while editing a title;
/// line breaks and tabs become spaces.
pub fn handle_paste(app: &mut App, text: &str) {
    if app.mode != Mode::Edit || text.is_empty() {
        return;
    }
    let clean = text.replace(['\n', '\t'], " ").replace('\r', "");
    if let Some(edit) = &mut app.edit {
        insert_text(edit, &clean);
    }
}

/// Normalize key events from terminals using the kitty keyboard protocol,
/// which sends `Char(lowercase) + SHIFT` instead of `Char(UPPERCASE)` and
/// `Char('/') + SHIFT` instead of `Char('?')`.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if c == '/' {
            key.code = KeyCode::Char('?');
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::persist::load_board;
    use crate::tui::render::test_helpers::{app_with_board, trip_board};
    use crate::tui::view::RowKind;
    use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
    use pretty_assertions::assert_eq;
    use ratatui::layout::Rect;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            handle_key(app, key(c));
        }
    }

    fn click_at(app: &mut App, x: u16, y: u16) {
        handle_mouse(
            app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: x,
                row: y,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    /// Board area as drawn on a 40-column screen below a one-line header
    fn laid_out(board: crate::model::Board) -> App {
        let mut app = app_with_board(board);
        app.content_area = Rect::new(0, 1, 40, 20);
        app
    }

    #[test]
    fn add_task_type_and_commit() {
        let mut app = app_with_board(trip_board());
        handle_key(&mut app, key('o'));
        assert_eq!(app.mode, Mode::Edit);
        type_str(&mut app, "Buy adapters");
        handle_key(&mut app, code(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.task(0, 2).unwrap().title, "Buy adapters");
        assert_eq!(app.cursor_row().unwrap().path, NodePath::task(0, 2));
        assert_eq!(load_board(app.store.as_ref()).into_board(), app.board);
    }

    #[test]
    fn tab_commits_and_esc_abandons() {
        let mut app = app_with_board(trip_board());
        handle_key(&mut app, key('e'));
        type_str(&mut app, "!");
        handle_key(&mut app, code(KeyCode::Tab));
        assert_eq!(app.board.objective(0).unwrap().title, "Plan trip!");

        handle_key(&mut app, key('e'));
        type_str(&mut app, "??");
        handle_key(&mut app, code(KeyCode::Esc));
        assert_eq!(app.board.objective(0).unwrap().title, "Plan trip!");
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn clearing_a_title_gives_untitled() {
        let mut app = app_with_board(trip_board());
        handle_key(&mut app, key('O'));
        assert_eq!(app.board.len(), 2);
        handle_key(&mut app, code(KeyCode::Backspace));
        handle_key(&mut app, code(KeyCode::Enter));
        assert_eq!(app.board.objective(1).unwrap().title, "Untitled");
    }

    #[test]
    fn kitty_shift_letters_are_uppercased() {
        let mut app = app_with_board(trip_board());
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('o'), KeyModifiers::SHIFT));
        assert_eq!(app.board.len(), 2);
        handle_key(&mut app, code(KeyCode::Esc));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('/'), KeyModifiers::SHIFT));
        assert!(app.show_help);
    }

    #[test]
    fn space_toggles_completion_and_activates() {
        let mut app = app_with_board(trip_board());
        app.select(RowKind::Task, NodePath::task(0, 1));
        handle_key(&mut app, key(' '));
        let bags = app.board.task(0, 1).unwrap();
        assert!(!bags.completed);
        assert!(bags.active);
        assert!(!app.board.task(0, 0).unwrap().active);

        app.select(RowKind::Subtask, NodePath::subtask(0, 0, 1));
        handle_key(&mut app, key('x'));
        assert!(app.board.subtask(0, 0, 1).unwrap().completed);
    }

    #[test]
    fn a_toggles_active() {
        let mut app = app_with_board(trip_board());
        app.select(RowKind::Task, NodePath::task(0, 0));
        handle_key(&mut app, key('a'));
        assert!(!app.board.task(0, 0).unwrap().active);
        handle_key(&mut app, key('a'));
        assert!(app.board.task(0, 0).unwrap().active);
    }

    #[test]
    fn expand_and_collapse() {
        let mut app = app_with_board(trip_board());
        app.select(RowKind::Subtask, NodePath::subtask(0, 0, 1));
        handle_key(&mut app, key('h'));
        assert!(!app.board.task(0, 0).unwrap().expanded);
        assert_eq!(app.cursor_row().unwrap().path, NodePath::task(0, 0));
        handle_key(&mut app, key('h'));
        assert!(!app.board.task(0, 0).unwrap().expanded);
        handle_key(&mut app, code(KeyCode::Right));
        assert!(app.board.task(0, 0).unwrap().expanded);
        handle_key(&mut app, key('z'));
        assert!(!app.board.task(0, 0).unwrap().expanded);
    }

    #[test]
    fn add_subtask_from_task_row() {
        let mut app = app_with_board(trip_board());
        app.select(RowKind::Task, NodePath::task(0, 1));
        handle_key(&mut app, key('s'));
        type_str(&mut app, "Socks");
        handle_key(&mut app, code(KeyCode::Enter));
        let bags = app.board.task(0, 1).unwrap();
        assert!(bags.expanded);
        assert_eq!(bags.subtasks[0].title, "Socks");
    }

    #[test]
    fn enter_on_add_row_adds() {
        let mut app = app_with_board(trip_board());
        app.cursor_to_bottom();
        handle_key(&mut app, code(KeyCode::Enter));
        assert_eq!(app.board.len(), 2);
        assert_eq!(app.mode, Mode::Edit);
    }

    #[test]
    fn delete_objective_needs_y() {
        let mut app = app_with_board(trip_board());
        handle_key(&mut app, key('d'));
        assert_eq!(app.mode, Mode::Confirm);
        handle_key(&mut app, key('n'));
        assert_eq!(app.board, trip_board());

        handle_key(&mut app, code(KeyCode::Delete));
        handle_key(&mut app, key('j'));
        assert_eq!(app.mode, Mode::Confirm);
        handle_key(&mut app, key('y'));
        assert!(app.board.is_empty());
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn delete_subtask_is_immediate() {
        let mut app = app_with_board(trip_board());
        app.select(RowKind::Subtask, NodePath::subtask(0, 0, 0));
        handle_key(&mut app, key('d'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.task(0, 0).unwrap().subtasks.len(), 1);
        assert_eq!(app.board.subtask(0, 0, 0).unwrap().title, "Pick seat");
    }

    #[test]
    fn help_theme_and_quit() {
        let mut app = app_with_board(trip_board());
        handle_key(&mut app, key('?'));
        assert!(app.show_help);
        handle_key(&mut app, key('j'));
        assert_eq!(app.cursor, 0);
        handle_key(&mut app, code(KeyCode::Esc));
        assert!(!app.show_help);

        handle_key(&mut app, key('t'));
        assert_eq!(app.theme_name, crate::model::ThemeName::Night);

        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn paste_inserts_single_line() {
        let mut app = app_with_board(trip_board());
        handle_key(&mut app, key('o'));
        handle_paste(&mut app, "Renew\npassport");
        handle_key(&mut app, code(KeyCode::Enter));
        assert_eq!(app.board.task(0, 2).unwrap().title, "Renew passport");

        handle_paste(&mut app, "ignored");
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn click_check_toggles_and_activates() {
        let mut app = laid_out(trip_board());
        // "Pack bags" is row 5; its check box spans content columns 4..7
        click_at(&mut app, 6, 6);
        let bags = app.board.task(0, 1).unwrap();
        assert!(!bags.completed);
        assert!(bags.active);
        assert_eq!(app.cursor, 5);
    }

    #[test]
    fn click_on_blank_task_space_activates() {
        let mut app = laid_out(trip_board());
        click_at(&mut app, 30, 6);
        let bags = app.board.task(0, 1).unwrap();
        assert!(bags.active);
        assert!(bags.completed);
        // The cursor marker column belongs to the row too
        click_at(&mut app, 0, 2);
        assert!(app.board.task(0, 0).unwrap().active);
    }

    #[test]
    fn click_delete_asks_and_blocks_clicks() {
        let mut app = laid_out(trip_board());
        click_at(&mut app, 39, 1);
        assert_eq!(app.mode, Mode::Confirm);
        // Clicks are ignored while the prompt is up
        click_at(&mut app, 6, 6);
        assert!(app.board.task(0, 1).unwrap().completed);
        handle_key(&mut app, code(KeyCode::Esc));
        assert_eq!(app.board, trip_board());
    }

    #[test]
    fn click_title_edits_and_click_elsewhere_commits() {
        let mut app = laid_out(trip_board());
        // "Pick seat" title starts at content column 10
        click_at(&mut app, 12, 4);
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.edit.as_ref().unwrap().path, NodePath::subtask(0, 0, 1));
        type_str(&mut app, "s");
        // Clicking inside the title moves the cursor without committing
        click_at(&mut app, 11, 4);
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.edit.as_ref().unwrap().cursor, 0);
        type_str(&mut app, "P");
        // Clicking the subtask check elsewhere blurs, then toggles
        click_at(&mut app, 8, 3);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.subtask(0, 0, 1).unwrap().title, "PPick seats");
        assert!(!app.board.subtask(0, 0, 0).unwrap().completed);
    }

    #[test]
    fn clicks_outside_rows_do_nothing() {
        let mut app = laid_out(trip_board());
        click_at(&mut app, 5, 8); // spacer
        click_at(&mut app, 5, 15); // below the last row
        click_at(&mut app, 5, 0); // header bar
        assert_eq!(app.board, trip_board());
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn wheel_moves_cursor() {
        let mut app = laid_out(trip_board());
        let scroll = |kind| MouseEvent {
            kind,
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut app, scroll(MouseEventKind::ScrollDown));
        handle_mouse(&mut app, scroll(MouseEventKind::ScrollDown));
        assert_eq!(app.cursor, 2);
        handle_mouse(&mut app, scroll(MouseEventKind::ScrollUp));
        assert_eq!(app.cursor, 1);
    }
}
