use serde::Serialize;

use crate::model::board::{Board, Objective};

/// Completed vs. total progress units for one objective.
///
/// A unit is a subtask when its task has subtasks, otherwise the task itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completion percentage rounded half-up, 0 when there are no units
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        // round(c / t * 100) == floor((200c + t) / 2t) for non-negative values
        let pct = (self.completed * 200 + self.total) / (self.total * 2);
        pct.min(100) as u8
    }
}

/// Count progress units across an objective's tasks
pub fn objective_progress(objective: &Objective) -> Progress {
    let mut progress = Progress::default();
    for task in &objective.tasks {
        if task.subtasks.is_empty() {
            progress.total += 1;
            if task.completed {
                progress.completed += 1;
            }
        } else {
            progress.total += task.subtasks.len();
            progress.completed += task.subtasks.iter().filter(|s| s.completed).count();
        }
    }
    progress
}

/// Progress for every objective, in board order
pub fn board_progress(board: &Board) -> Vec<Progress> {
    board.objectives().iter().map(objective_progress).collect()
}
