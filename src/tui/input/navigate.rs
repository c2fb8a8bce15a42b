use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;
use crate::tui::view::{Control, RowKind, ViewRow};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts everything; ? / Esc / q close it
    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')
        ) {
            app.show_help = false;
        }
        return;
    }

    let Some(row) = app.cursor_row().cloned() else {
        return;
    };
    let cursor = app.cursor;

    match (key.modifiers, key.code) {
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (_, KeyCode::Char('?')) => app.show_help = true,
        (_, KeyCode::Esc) => app.clear_status(),

        // Movement
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.cursor_to_top(),
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => app.cursor_to_bottom(),

        // Expand / collapse
        (_, KeyCode::Char('l')) | (_, KeyCode::Right) => set_expanded(app, &row, true),
        (_, KeyCode::Char('h')) | (_, KeyCode::Left) => set_expanded(app, &row, false),
        (_, KeyCode::Char('z')) if row.kind == RowKind::Task => {
            dispatch::click(app, cursor, Control::TaskToggle)
        }

        // Completion and activity
        (_, KeyCode::Char(' ')) | (_, KeyCode::Char('x')) => match row.kind {
            RowKind::Task => dispatch::click(app, cursor, Control::TaskCheck),
            RowKind::Subtask => dispatch::click(app, cursor, Control::SubtaskCheck),
            _ => {}
        },
        (_, KeyCode::Char('a')) => {
            if let (RowKind::Task, Some(task)) = (row.kind, row.path.task) {
                app.clear_status();
                dispatch::apply(
                    app,
                    &[Action::ToggleActive {
                        objective: row.path.objective,
                        task,
                    }],
                );
            }
        }

        // Titles and add rows
        (_, KeyCode::Enter) => match row.container() {
            Some(control @ (Control::AddObjective | Control::AddTask | Control::AddSubtask)) => {
                dispatch::click(app, cursor, control)
            }
            _ if row.has_title() => dispatch::begin_edit(app, row.path, false),
            _ => {}
        },
        (_, KeyCode::Char('e')) if row.has_title() => dispatch::begin_edit(app, row.path, false),

        // Adding
        (_, KeyCode::Char('o')) if row.kind != RowKind::AddObjective => {
            dispatch::click(app, cursor, Control::AddTask)
        }
        (_, KeyCode::Char('O')) => dispatch::click(app, cursor, Control::AddObjective),
        (_, KeyCode::Char('s')) if row.path.task.is_some() => {
            dispatch::click(app, cursor, Control::AddSubtask)
        }

        // Deleting
        (_, KeyCode::Char('d')) | (_, KeyCode::Delete) if row.has_title() => {
            app.clear_status();
            dispatch::request_delete(app, row.path);
        }

        (_, KeyCode::Char('t')) => app.toggle_theme(),
        _ => {}
    }
}

/// Expand or collapse the task under the cursor. Collapsing from a subtask
/// collapses its task and moves the cursor up to it.
fn set_expanded(app: &mut App, row: &ViewRow, expanded: bool) {
    let Some(task) = row.path.task else {
        return;
    };
    let objective = row.path.objective;
    let is_expanded = app
        .board
        .task(objective, task)
        .is_ok_and(|t| t.expanded);
    if is_expanded != expanded {
        dispatch::apply(app, &[Action::ToggleExpanded { objective, task }]);
    }
    if !expanded && row.kind != RowKind::Task {
        app.select(RowKind::Task, NodePath::task(objective, task));
    }
}
