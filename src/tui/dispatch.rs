//! Every change to the board goes through here.
//!
//! Keys and clicks are turned into [`Action`]s, applied to the board in
//! order, then the board is saved and the rows rebuilt. Interactions that
//! need confirmation or title input switch the app's mode instead.

use crate::io::recovery;
use crate::model::{NodePath, TreeError};
use crate::ops::tree_ops;

use super::app::{App, ConfirmAction, ConfirmState, EditState, Mode};
use super::view::{Control, RowKind};

/// A single mutation of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddObjective,
    DeleteObjective { objective: usize },
    AddTask { objective: usize },
    DeleteTask { objective: usize, task: usize },
    ToggleExpanded { objective: usize, task: usize },
    ToggleCompleted { objective: usize, task: usize },
    ToggleActive { objective: usize, task: usize },
    ActivateTask { objective: usize, task: usize },
    AddSubtask { objective: usize, task: usize },
    DeleteSubtask { objective: usize, task: usize, subtask: usize },
    ToggleSubtask { objective: usize, task: usize, subtask: usize },
    EditTitle { path: NodePath, title: String },
}

/// Row to focus after an action created something
type Focus = (RowKind, NodePath);

/// Apply `actions` in order, then save and rebuild once.
///
/// Stops at the first action whose target no longer exists. Returns the row
/// of the last entity created, if any.
pub fn apply(app: &mut App, actions: &[Action]) -> Option<Focus> {
    let mut focus = None;
    for action in actions {
        match apply_one(app, action) {
            Ok(Some(f)) => focus = Some(f),
            Ok(None) => {}
            Err(e) => {
                app.set_error(e.to_string());
                break;
            }
        }
    }
    app.persist();
    app.rebuild_rows();
    if let Some((kind, path)) = focus {
        app.select(kind, path);
    }
    focus
}

fn apply_one(app: &mut App, action: &Action) -> Result<Option<Focus>, TreeError> {
    let board = &mut app.board;
    match *action {
        Action::AddObjective => {
            let o = tree_ops::add_objective(board);
            return Ok(Some((RowKind::ObjectiveHeader, NodePath::objective(o))));
        }
        Action::DeleteObjective { objective } => {
            let removed = tree_ops::delete_objective(board, objective)?;
            let json = serde_json::to_string_pretty(&removed).unwrap_or_default();
            log_deletion(app, NodePath::objective(objective), &removed.title, &json);
        }
        Action::AddTask { objective } => {
            let t = tree_ops::add_task(board, objective)?;
            return Ok(Some((RowKind::Task, NodePath::task(objective, t))));
        }
        Action::DeleteTask { objective, task } => {
            let removed = tree_ops::delete_task(board, objective, task)?;
            let json = serde_json::to_string_pretty(&removed).unwrap_or_default();
            log_deletion(app, NodePath::task(objective, task), &removed.title, &json);
        }
        Action::ToggleExpanded { objective, task } => {
            tree_ops::toggle_task_expanded(board, objective, task)?
        }
        Action::ToggleCompleted { objective, task } => {
            tree_ops::toggle_task_completed(board, objective, task)?
        }
        Action::ToggleActive { objective, task } => {
            tree_ops::toggle_task_active(board, objective, task)?
        }
        Action::ActivateTask { objective, task } => {
            tree_ops::activate_task(board, objective, task)?
        }
        Action::AddSubtask { objective, task } => {
            let s = tree_ops::add_subtask(board, objective, task)?;
            return Ok(Some((
                RowKind::Subtask,
                NodePath::subtask(objective, task, s),
            )));
        }
        Action::DeleteSubtask {
            objective,
            task,
            subtask,
        } => {
            tree_ops::delete_subtask(board, objective, task, subtask)?;
        }
        Action::ToggleSubtask {
            objective,
            task,
            subtask,
        } => tree_ops::toggle_subtask(board, objective, task, subtask)?,
        Action::EditTitle { path, ref title } => tree_ops::edit_title(board, path, title)?,
    }
    Ok(None)
}

/// Keep a deleted objective or task in the recovery log
fn log_deletion(app: &mut App, path: NodePath, title: &str, json: &str) {
    let Some(dir) = &app.data_dir else {
        return;
    };
    if recovery::log_deletion(dir, path, title, json).is_ok() {
        app.set_status(format!("deleted \"{}\" (kept in `focus recovery`)", title));
    }
}

/// Handle an interaction with `control` on row `row`.
///
/// This is the one entry point for clicks; keyboard shortcuts that mirror a
/// click call it too.
pub fn click(app: &mut App, row: usize, control: Control) {
    let Some(path) = app.rows.get(row).map(|r| r.path) else {
        return;
    };
    app.clear_status();
    let objective = path.objective;

    match control {
        Control::ObjectiveTitle | Control::TaskTitle | Control::SubtaskTitle => {
            app.cursor = row;
            begin_edit(app, path, false);
        }
        Control::ObjectiveDelete => request_delete(app, path),
        Control::AddObjective => add_and_edit(app, Action::AddObjective),
        Control::AddTask => add_and_edit(app, Action::AddTask { objective }),
        _ => {}
    }

    let Some(task) = path.task else {
        return;
    };
    match control {
        Control::TaskMain => {
            apply(app, &[Action::ActivateTask { objective, task }]);
        }
        Control::TaskToggle => {
            apply(
                app,
                &[
                    Action::ToggleExpanded { objective, task },
                    Action::ActivateTask { objective, task },
                ],
            );
        }
        Control::TaskCheck => {
            apply(
                app,
                &[
                    Action::ToggleCompleted { objective, task },
                    Action::ActivateTask { objective, task },
                ],
            );
        }
        Control::TaskDelete => request_delete(app, path),
        Control::AddSubtask => add_and_edit(app, Action::AddSubtask { objective, task }),
        _ => {}
    }

    let Some(subtask) = path.subtask else {
        return;
    };
    match control {
        Control::SubtaskCheck => {
            apply(
                app,
                &[Action::ToggleSubtask {
                    objective,
                    task,
                    subtask,
                }],
            );
        }
        Control::SubtaskDelete => {
            apply(
                app,
                &[Action::DeleteSubtask {
                    objective,
                    task,
                    subtask,
                }],
            );
        }
        _ => {}
    }
}

/// Create an entity and open its title for editing with the default selected
fn add_and_edit(app: &mut App, action: Action) {
    if let Some((_, path)) = apply(app, &[action]) {
        begin_edit(app, path, true);
    }
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// Delete the node at `path`. Objectives and tasks ask first; subtasks go at once.
pub fn request_delete(app: &mut App, path: NodePath) {
    let Some(title) = app.board.title_at(path).map(str::to_string) else {
        return;
    };
    let (message, action) = match (path.task, path.subtask) {
        (None, _) => (
            format!("Delete objective \"{}\" and all its tasks?", title),
            ConfirmAction::DeleteObjective {
                objective: path.objective,
            },
        ),
        (Some(task), None) => (
            format!("Delete task \"{}\"?", title),
            ConfirmAction::DeleteTask {
                objective: path.objective,
                task,
            },
        ),
        (Some(task), Some(subtask)) => {
            apply(
                app,
                &[Action::DeleteSubtask {
                    objective: path.objective,
                    task,
                    subtask,
                }],
            );
            return;
        }
    };
    app.confirm_state = Some(ConfirmState { message, action });
    app.mode = Mode::Confirm;
}

/// The user said yes
pub fn confirm(app: &mut App) {
    app.mode = Mode::Navigate;
    let Some(state) = app.confirm_state.take() else {
        return;
    };
    let action = match state.action {
        ConfirmAction::DeleteObjective { objective } => Action::DeleteObjective { objective },
        ConfirmAction::DeleteTask { objective, task } => Action::DeleteTask { objective, task },
    };
    apply(app, &[action]);
}

/// The user said no; nothing changes
pub fn cancel_confirm(app: &mut App) {
    app.confirm_state = None;
    app.mode = Mode::Navigate;
}

// ---------------------------------------------------------------------------
// Title editing
// ---------------------------------------------------------------------------

/// Start editing the title at `path`. With `is_fresh` the first typed
/// character replaces the whole title.
pub fn begin_edit(app: &mut App, path: NodePath, is_fresh: bool) {
    let Some(title) = app.board.title_at(path).map(str::to_string) else {
        return;
    };
    let kind = match (path.task, path.subtask) {
        (None, _) => RowKind::ObjectiveHeader,
        (Some(_), None) => RowKind::Task,
        (Some(_), Some(_)) => RowKind::Subtask,
    };
    app.select(kind, path);
    app.edit = Some(EditState {
        path,
        cursor: title.len(),
        buffer: title.clone(),
        original: title,
        is_fresh,
    });
    app.mode = Mode::Edit;
}

/// Commit the edit buffer, as when the field loses focus
pub fn commit_edit(app: &mut App) {
    app.mode = Mode::Navigate;
    let Some(edit) = app.edit.take() else {
        return;
    };
    apply(
        app,
        &[Action::EditTitle {
            path: edit.path,
            title: edit.buffer,
        }],
    );
}

/// Abandon the edit and keep the title as it was
pub fn cancel_edit(app: &mut App) {
    app.edit = None;
    app.mode = Mode::Navigate;
}
