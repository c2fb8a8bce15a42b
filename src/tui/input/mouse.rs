use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tui::app::{App, Mode};
use crate::tui::view::{self, Control};
use crate::util::unicode::display_col_to_byte_offset;

use super::*;

/// Handle a mouse event: left clicks go through the dispatcher, the wheel moves the cursor
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_click(app, mouse.column, mouse.row),
        MouseEventKind::ScrollDown if app.mode == Mode::Navigate && !app.show_help => {
            app.move_cursor(1)
        }
        MouseEventKind::ScrollUp if app.mode == Mode::Navigate && !app.show_help => {
            app.move_cursor(-1)
        }
        _ => {}
    }
}

fn handle_click(app: &mut App, x: u16, y: u16) {
    if app.show_help {
        app.show_help = false;
        return;
    }
    // The confirmation prompt is modal
    if app.mode == Mode::Confirm {
        return;
    }

    let target = row_at(app, x, y);

    if app.mode == Mode::Edit {
        if let Some((row, col)) = target
            && click_in_edited_title(app, row, col)
        {
            return;
        }
        // Anywhere else blurs the field
        dispatch::commit_edit(app);
    }

    let Some((row, col)) = target.filter(|&(row, _)| row < app.rows.len()) else {
        return;
    };
    if app.rows[row].is_selectable() {
        app.cursor = row;
    }

    // Column 0 is the cursor marker, outside every control
    let control = match col.checked_sub(1) {
        Some(content_col) => {
            view::hit_test(&app.board, &app.rows[row], content_width(app), content_col)
        }
        None => app.rows[row].container(),
    };
    if let Some(control) = control {
        dispatch::click(app, row, control);
    }
}

/// Row index and column within the board area for a screen position
fn row_at(app: &App, x: u16, y: u16) -> Option<(usize, usize)> {
    let area = app.content_area;
    if x < area.x || x >= area.x + area.width || y < area.y || y >= area.y + area.height {
        return None;
    }
    let row = app.scroll_offset + (y - area.y) as usize;
    (row < app.rows.len()).then_some((row, (x - area.x) as usize))
}

fn content_width(app: &App) -> usize {
    (app.content_area.width as usize).saturating_sub(1)
}

/// A click on the title being edited moves the edit cursor instead of blurring
fn click_in_edited_title(app: &mut App, row: usize, col: usize) -> bool {
    let width = content_width(app);
    let Some(edit) = app.edit.as_mut() else {
        return false;
    };
    let view_row = &app.rows[row];
    if view_row.path != edit.path || !view_row.has_title() || col == 0 {
        return false;
    }
    let hit = view::segment_at(&app.board, view_row, width, col - 1, Some(edit.buffer.as_str()));
    match hit {
        Some((start, segment))
            if matches!(
                segment.control,
                Some(Control::ObjectiveTitle | Control::TaskTitle | Control::SubtaskTitle)
            ) =>
        {
            edit.cursor = display_col_to_byte_offset(&edit.buffer, col - 1 - start);
            edit.is_fresh = false;
            true
        }
        _ => false,
    }
}
