//! The view model: a flat list of rows derived from the board.
//!
//! Rows are rebuilt from scratch after every mutation. Each row carries the
//! positional path of the node it shows, so an interaction on a row can be
//! mapped straight back to the board. The same segment layout is used for
//! drawing and for hit-testing clicks.

use crate::model::{Board, NodePath, Objective, Task};
use crate::ops::progress::objective_progress;
use crate::util::unicode::{display_width, truncate_to_width};

/// Width of the progress bar in an objective header
pub const BAR_WIDTH: usize = 10;
/// Bar + percentage + gap + delete button
const HEADER_RIGHT_WIDTH: usize = BAR_WIDTH + 5 + 2 + 1;
const TASK_INDENT: &str = "  ";
const SUBTASK_INDENT: &str = "      ";
const DELETE_GLYPH: &str = "\u{2715}"; // ✕

/// Every interactive element a row can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ObjectiveTitle,
    ObjectiveDelete,
    AddTask,
    /// Anywhere on a task's main line not covered by another control
    TaskMain,
    TaskToggle,
    TaskCheck,
    TaskTitle,
    TaskDelete,
    AddSubtask,
    SubtaskCheck,
    SubtaskTitle,
    SubtaskDelete,
    AddObjective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    ObjectiveHeader,
    Task,
    Subtask,
    AddSubtask,
    AddTask,
    Spacer,
    AddObjective,
}

/// One visible line of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub kind: RowKind,
    /// Position in the board. For add rows this is the parent the add targets.
    pub path: NodePath,
}

impl ViewRow {
    /// Control that receives clicks landing outside every explicit control
    pub fn container(&self) -> Option<Control> {
        match self.kind {
            RowKind::Task => Some(Control::TaskMain),
            RowKind::AddSubtask => Some(Control::AddSubtask),
            RowKind::AddTask => Some(Control::AddTask),
            RowKind::AddObjective => Some(Control::AddObjective),
            RowKind::ObjectiveHeader | RowKind::Subtask | RowKind::Spacer => None,
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.kind != RowKind::Spacer
    }

    /// Whether this row shows an editable title
    pub fn has_title(&self) -> bool {
        matches!(
            self.kind,
            RowKind::ObjectiveHeader | RowKind::Task | RowKind::Subtask
        )
    }
}

/// Flatten the board into its visible rows
pub fn build_rows(board: &Board) -> Vec<ViewRow> {
    let mut rows = Vec::new();
    for (o, objective) in board.objectives().iter().enumerate() {
        rows.push(ViewRow {
            kind: RowKind::ObjectiveHeader,
            path: NodePath::objective(o),
        });
        for (t, task) in objective.tasks.iter().enumerate() {
            rows.push(ViewRow {
                kind: RowKind::Task,
                path: NodePath::task(o, t),
            });
            if task.expanded {
                for s in 0..task.subtasks.len() {
                    rows.push(ViewRow {
                        kind: RowKind::Subtask,
                        path: NodePath::subtask(o, t, s),
                    });
                }
                rows.push(ViewRow {
                    kind: RowKind::AddSubtask,
                    path: NodePath::task(o, t),
                });
            }
        }
        rows.push(ViewRow {
            kind: RowKind::AddTask,
            path: NodePath::objective(o),
        });
        rows.push(ViewRow {
            kind: RowKind::Spacer,
            path: NodePath::objective(o),
        });
    }
    rows.push(ViewRow {
        kind: RowKind::AddObjective,
        path: NodePath::objective(board.len()),
    });
    rows
}

/// Index of the first row of `kind` at `path`
pub fn find_row(rows: &[ViewRow], kind: RowKind, path: NodePath) -> Option<usize> {
    rows.iter().position(|r| r.kind == kind && r.path == path)
}

// ---------------------------------------------------------------------------
// Segment layout
// ---------------------------------------------------------------------------

/// What a segment shows, used by the renderer to pick a style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Plain,
    ObjectiveTitle,
    Title,
    ActiveTitle,
    CompletedTitle,
    ActiveMarker,
    Toggle,
    Check,
    Count,
    BarFilled,
    BarEmpty,
    Percent,
    Delete,
    Add,
}

/// A run of text on a row, optionally bound to a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub role: Role,
    pub control: Option<Control>,
}

impl Segment {
    fn new(text: impl Into<String>, role: Role, control: Option<Control>) -> Self {
        Segment {
            text: text.into(),
            role,
            control,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Segment::new(text, Role::Plain, None)
    }

    pub fn width(&self) -> usize {
        display_width(&self.text)
    }
}

/// Lay a row out into segments for a content area `width` cells wide.
///
/// `editing` replaces the row's title with the text being edited (shown in
/// full, never truncated).
pub fn layout_row(
    board: &Board,
    row: &ViewRow,
    width: usize,
    editing: Option<&str>,
) -> Vec<Segment> {
    let path = row.path;
    match row.kind {
        RowKind::ObjectiveHeader => match board.objective(path.objective) {
            Ok(objective) => layout_objective_header(objective, width, editing),
            Err(_) => Vec::new(),
        },
        RowKind::Task => match path.task.map(|t| board.task(path.objective, t)) {
            Some(Ok(task)) => layout_task(task, width, editing),
            _ => Vec::new(),
        },
        RowKind::Subtask => {
            let (Some(t), Some(s)) = (path.task, path.subtask) else {
                return Vec::new();
            };
            let Ok(subtask) = board.subtask(path.objective, t, s) else {
                return Vec::new();
            };
            let mut segments = vec![
                Segment::plain(SUBTASK_INDENT),
                Segment::new(
                    check_glyph(subtask.completed),
                    Role::Check,
                    Some(Control::SubtaskCheck),
                ),
                Segment::plain(" "),
            ];
            let title_role = if subtask.completed {
                Role::CompletedTitle
            } else {
                Role::Title
            };
            push_title_and_delete(
                &mut segments,
                &subtask.title,
                title_role,
                Control::SubtaskTitle,
                Control::SubtaskDelete,
                None,
                width,
                editing,
            );
            segments
        }
        RowKind::AddSubtask => vec![
            Segment::plain(SUBTASK_INDENT),
            Segment::new("+ Add subtask", Role::Add, Some(Control::AddSubtask)),
        ],
        RowKind::AddTask => vec![
            Segment::plain(TASK_INDENT),
            Segment::new("+ Add task", Role::Add, Some(Control::AddTask)),
        ],
        RowKind::AddObjective => vec![Segment::new(
            "+ Add objective",
            Role::Add,
            Some(Control::AddObjective),
        )],
        RowKind::Spacer => Vec::new(),
    }
}

fn check_glyph(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn layout_objective_header(
    objective: &Objective,
    width: usize,
    editing: Option<&str>,
) -> Vec<Segment> {
    let percent = objective_progress(objective).percent() as usize;
    let filled = (percent * BAR_WIDTH + 50) / 100;

    let title = match editing {
        Some(text) => text.to_string(),
        None => truncate_to_width(
            &objective.title,
            width.saturating_sub(HEADER_RIGHT_WIDTH + 1),
        ),
    };
    let fill = width.saturating_sub(display_width(&title) + HEADER_RIGHT_WIDTH);

    vec![
        Segment::new(title, Role::ObjectiveTitle, Some(Control::ObjectiveTitle)),
        Segment::plain(" ".repeat(fill)),
        Segment::new("\u{2588}".repeat(filled), Role::BarFilled, None),
        Segment::new("\u{2591}".repeat(BAR_WIDTH - filled), Role::BarEmpty, None),
        Segment::new(format!(" {:>3}%", percent), Role::Percent, None),
        Segment::plain("  "),
        Segment::new(DELETE_GLYPH, Role::Delete, Some(Control::ObjectiveDelete)),
    ]
}

fn layout_task(task: &Task, width: usize, editing: Option<&str>) -> Vec<Segment> {
    let toggle = if task.expanded { "\u{25BC}" } else { "\u{25B6}" }; // ▼ / ▶
    let mut segments = vec![
        Segment::plain(TASK_INDENT),
        Segment::new(toggle, Role::Toggle, Some(Control::TaskToggle)),
        Segment::plain(" "),
        Segment::new(check_glyph(task.completed), Role::Check, Some(Control::TaskCheck)),
        Segment::plain(" "),
    ];
    if task.active {
        segments.push(Segment::new("\u{00BB} ", Role::ActiveMarker, None)); // »
    }
    let count = (!task.subtasks.is_empty()).then(|| {
        let done = task.subtasks.iter().filter(|s| s.completed).count();
        Segment::new(
            format!(" {}/{}", done, task.subtasks.len()),
            Role::Count,
            None,
        )
    });
    let title_role = if task.completed {
        Role::CompletedTitle
    } else if task.active {
        Role::ActiveTitle
    } else {
        Role::Title
    };
    push_title_and_delete(
        &mut segments,
        &task.title,
        title_role,
        Control::TaskTitle,
        Control::TaskDelete,
        count,
        width,
        editing,
    );
    segments
}

/// Append `title [extra] <fill> ✕`, truncating the title so the delete
/// button always lands in the last column.
#[allow(clippy::too_many_arguments)]
fn push_title_and_delete(
    segments: &mut Vec<Segment>,
    title: &str,
    role: Role,
    title_control: Control,
    delete_control: Control,
    extra: Option<Segment>,
    width: usize,
    editing: Option<&str>,
) {
    let prefix: usize = segments.iter().map(Segment::width).sum();
    let extra_width = extra.as_ref().map_or(0, Segment::width);
    let title = match editing {
        Some(text) => text.to_string(),
        None => truncate_to_width(
            title,
            width.saturating_sub(prefix + extra_width + 2),
        ),
    };
    let used = prefix + display_width(&title) + extra_width;
    segments.push(Segment::new(title, role, Some(title_control)));
    if let Some(extra) = extra {
        segments.push(extra);
    }
    segments.push(Segment::plain(" ".repeat(width.saturating_sub(used + 1))));
    segments.push(Segment::new(DELETE_GLYPH, Role::Delete, Some(delete_control)));
}

/// The segment covering content column `col`, with the column it starts at
pub fn segment_at(
    board: &Board,
    row: &ViewRow,
    width: usize,
    col: usize,
    editing: Option<&str>,
) -> Option<(usize, Segment)> {
    let mut start = 0;
    for segment in layout_row(board, row, width, editing) {
        let end = start + segment.width();
        if col < end {
            return Some((start, segment));
        }
        start = end;
    }
    None
}

/// Resolve a click at content column `col` on `row`.
///
/// The explicit control under the column wins; otherwise the click falls to
/// the row's container, the nearest enclosing control.
pub fn hit_test(board: &Board, row: &ViewRow, width: usize, col: usize) -> Option<Control> {
    segment_at(board, row, width, col, None)
        .and_then(|(_, segment)| segment.control)
        .or_else(|| row.container())
}
