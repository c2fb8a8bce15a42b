use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, EditState};
use crate::util::unicode::{
    next_grapheme_boundary, prev_grapheme_boundary, word_boundary_left, word_boundary_right,
};

use super::*;

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Commit: the field loses focus
        (_, KeyCode::Enter) | (_, KeyCode::Tab) => dispatch::commit_edit(app),
        (_, KeyCode::Esc) => dispatch::cancel_edit(app),
        // Quitting mid-edit keeps what was typed
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => {
            dispatch::commit_edit(app);
            app.should_quit = true;
        }
        _ => {
            if let Some(edit) = &mut app.edit {
                edit_key(edit, key);
            }
        }
    }
}

/// Apply a text-editing key to the buffer
fn edit_key(edit: &mut EditState, key: KeyEvent) {
    let word_jump = key.modifiers.contains(KeyModifiers::ALT)
        || key.modifiers.contains(KeyModifiers::CONTROL);
    match (key.modifiers, key.code) {
        // Home / Ctrl+A
        (_, KeyCode::Home) => move_to(edit, 0),
        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => move_to(edit, 0),
        // End / Ctrl+E
        (_, KeyCode::End) => move_to(edit, edit.buffer.len()),
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => {
            move_to(edit, edit.buffer.len())
        }
        // Kill to start of line
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            take_selection(edit);
            edit.buffer.drain(..edit.cursor);
            edit.cursor = 0;
        }
        (_, KeyCode::Left) if word_jump => {
            move_to(edit, word_boundary_left(&edit.buffer, edit.cursor))
        }
        (_, KeyCode::Right) if word_jump => {
            move_to(edit, word_boundary_right(&edit.buffer, edit.cursor))
        }
        (_, KeyCode::Left) => {
            if let Some(prev) = prev_grapheme_boundary(&edit.buffer, edit.cursor) {
                move_to(edit, prev);
            } else {
                edit.is_fresh = false;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = next_grapheme_boundary(&edit.buffer, edit.cursor) {
                move_to(edit, next);
            } else {
                edit.is_fresh = false;
            }
        }
        (_, KeyCode::Backspace) => {
            if take_selection(edit) {
                return;
            }
            if let Some(prev) = prev_grapheme_boundary(&edit.buffer, edit.cursor) {
                edit.buffer.drain(prev..edit.cursor);
                edit.cursor = prev;
            }
        }
        (_, KeyCode::Delete) => {
            if take_selection(edit) {
                return;
            }
            if let Some(next) = next_grapheme_boundary(&edit.buffer, edit.cursor) {
                edit.buffer.drain(edit.cursor..next);
            }
        }
        (m, KeyCode::Char(c))
            if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
        {
            let mut tmp = [0u8; 4];
            insert_text(edit, c.encode_utf8(&mut tmp));
        }
        _ => {}
    }
}

/// Insert at the cursor, replacing the whole buffer if it is still selected
pub(super) fn insert_text(edit: &mut EditState, text: &str) {
    take_selection(edit);
    edit.buffer.insert_str(edit.cursor, text);
    edit.cursor += text.len();
}

fn move_to(edit: &mut EditState, cursor: usize) {
    edit.is_fresh = false;
    edit.cursor = cursor;
}

/// Clear a fresh buffer. Returns whether anything was selected.
fn take_selection(edit: &mut EditState) -> bool {
    if !edit.is_fresh {
        return false;
    }
    edit.is_fresh = false;
    edit.buffer.clear();
    edit.cursor = 0;
    true
}
