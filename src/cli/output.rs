use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::board::{Board, Objective, Subtask, Task};
use crate::ops::progress::{Progress, board_progress, objective_progress};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ObjectiveJson {
    pub title: String,
    pub progress: ProgressJson,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ProgressJson {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Serialize)]
pub struct TaskJson {
    pub title: String,
    pub completed: bool,
    pub expanded: bool,
    pub active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<SubtaskJson>,
}

#[derive(Serialize)]
pub struct SubtaskJson {
    pub title: String,
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// Conversion functions
// ---------------------------------------------------------------------------

pub fn board_to_json(board: &Board) -> Vec<ObjectiveJson> {
    board
        .objectives()
        .iter()
        .zip(board_progress(board))
        .map(|(objective, progress)| ObjectiveJson {
            title: objective.title.clone(),
            progress: progress_to_json(progress),
            tasks: objective.tasks.iter().map(task_to_json).collect(),
        })
        .collect()
}

pub fn progress_to_json(progress: Progress) -> ProgressJson {
    ProgressJson {
        completed: progress.completed,
        total: progress.total,
        percent: progress.percent(),
    }
}

fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        title: task.title.clone(),
        completed: task.completed,
        expanded: task.expanded,
        active: task.active,
        subtasks: task
            .subtasks
            .iter()
            .map(|s| SubtaskJson {
                title: s.title.clone(),
                completed: s.completed,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn check_char(completed: bool) -> char {
    if completed { 'x' } else { ' ' }
}

/// `Title  67% (2/3)`
pub fn format_objective_line(objective: &Objective) -> String {
    let progress = objective_progress(objective);
    format!(
        "{}  {}% ({}/{})",
        objective.title,
        progress.percent(),
        progress.completed,
        progress.total
    )
}

/// `[x] Title`, with `» ` marking the active task
pub fn format_task_line(task: &Task) -> String {
    let marker = if task.active { "» " } else { "" };
    format!("[{}] {}{}", check_char(task.completed), marker, task.title)
}

pub fn format_subtask_line(subtask: &Subtask) -> String {
    format!("[{}] {}", check_char(subtask.completed), subtask.title)
}

/// The whole board, one line per node. Objectives are separated by a blank line.
pub fn format_board(board: &Board) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, objective) in board.objectives().iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format_objective_line(objective));
        for task in &objective.tasks {
            lines.push(format!("  {}", format_task_line(task)));
            for subtask in &task.subtasks {
                lines.push(format!("    {}", format_subtask_line(subtask)));
            }
        }
    }
    lines
}

/// A recovery entry as shown by `focus recovery`
pub fn format_recovery_entry(entry: &RecoveryEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{} [{}] {}",
        entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        entry.category,
        entry.description
    )];
    for (key, value) in &entry.fields {
        lines.push(format!("  {}: {}", key, value));
    }
    for line in entry.body.lines() {
        lines.push(format!("  | {}", line));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::RecoveryCategory;
    use pretty_assertions::assert_eq;

    fn trip() -> Board {
        let mut flight = Task::new("Book flight");
        flight.active = true;
        flight.expanded = true;
        flight.subtasks = vec![Subtask::new("Compare prices"), Subtask::new("Pick seat")];
        flight.subtasks[0].completed = true;
        let mut bags = Task::new("Pack bags");
        bags.completed = true;
        let mut trip = Objective::new("Plan trip");
        trip.tasks = vec![flight, bags];
        Board::new(vec![trip, Objective::new("Learn Rust")])
    }

    #[test]
    fn board_text_lists_every_node() {
        assert_eq!(
            format_board(&trip()),
            vec![
                "Plan trip  67% (2/3)",
                "  [ ] » Book flight",
                "    [x] Compare prices",
                "    [ ] Pick seat",
                "  [x] Pack bags",
                "",
                "Learn Rust  0% (0/0)",
            ]
        );
    }

    #[test]
    fn board_json_carries_progress() {
        let json = serde_json::to_value(board_to_json(&trip())).unwrap();
        assert_eq!(json[0]["title"], "Plan trip");
        assert_eq!(json[0]["progress"]["completed"], 2);
        assert_eq!(json[0]["progress"]["total"], 3);
        assert_eq!(json[0]["progress"]["percent"], 67);
        assert_eq!(json[0]["tasks"][0]["active"], true);
        assert_eq!(json[0]["tasks"][0]["expanded"], true);
        assert_eq!(json[0]["tasks"][1]["expanded"], false);
        assert_eq!(json[0]["tasks"][0]["subtasks"][1]["title"], "Pick seat");
        // Tasks without subtasks omit the key
        assert!(json[0]["tasks"][1].get("subtasks").is_none());
        assert_eq!(json[1]["progress"]["percent"], 0);
    }

    #[test]
    fn recovery_entry_text() {
        let entry = RecoveryEntry::new(RecoveryCategory::Delete, "deleted task \"Pack bags\"")
            .field("path", "0/1")
            .body("{\n  \"title\": \"Pack bags\"\n}");
        let lines = format_recovery_entry(&entry);
        assert!(lines[0].ends_with("[delete] deleted task \"Pack bags\""));
        assert_eq!(lines[1], "  path: 0/1");
        assert_eq!(lines[2], "  | {");
        assert_eq!(lines.len(), 5);
    }
}
