use crate::model::board::{
    Board, NEW_OBJECTIVE_TITLE, NEW_SUBTASK_TITLE, NEW_TASK_TITLE, NodePath, Objective, Subtask,
    Task, TreeError, UNTITLED,
};

// ---------------------------------------------------------------------------
// Objectives
// ---------------------------------------------------------------------------

/// Append a default objective. Returns its index.
pub fn add_objective(board: &mut Board) -> usize {
    board
        .objectives_mut()
        .push(Objective::new(NEW_OBJECTIVE_TITLE));
    board.len() - 1
}

/// Remove the objective at `objective`, shifting later ones down.
/// Callers are expected to have asked for confirmation.
pub fn delete_objective(board: &mut Board, objective: usize) -> Result<Objective, TreeError> {
    if objective >= board.len() {
        return Err(TreeError::ObjectiveNotFound(objective));
    }
    Ok(board.objectives_mut().remove(objective))
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Append a default task to an objective. Returns its index.
pub fn add_task(board: &mut Board, objective: usize) -> Result<usize, TreeError> {
    let tasks = &mut board.objective_mut(objective)?.tasks;
    tasks.push(Task::new(NEW_TASK_TITLE));
    Ok(tasks.len() - 1)
}

/// Remove a task. Callers are expected to have asked for confirmation.
pub fn delete_task(board: &mut Board, objective: usize, task: usize) -> Result<Task, TreeError> {
    let tasks = &mut board.objective_mut(objective)?.tasks;
    if task >= tasks.len() {
        return Err(TreeError::TaskNotFound { objective, task });
    }
    Ok(tasks.remove(task))
}

pub fn toggle_task_expanded(
    board: &mut Board,
    objective: usize,
    task: usize,
) -> Result<(), TreeError> {
    let t = board.task_mut(objective, task)?;
    t.expanded = !t.expanded;
    Ok(())
}

pub fn toggle_task_completed(
    board: &mut Board,
    objective: usize,
    task: usize,
) -> Result<(), TreeError> {
    let t = board.task_mut(objective, task)?;
    t.completed = !t.completed;
    Ok(())
}

/// Flip the active flag. Turning it on clears it on every sibling first.
pub fn toggle_task_active(
    board: &mut Board,
    objective: usize,
    task: usize,
) -> Result<(), TreeError> {
    if board.task(objective, task)?.active {
        board.task_mut(objective, task)?.active = false;
        Ok(())
    } else {
        activate_task(board, objective, task)
    }
}

/// Make `task` the single active task of its objective
pub fn activate_task(board: &mut Board, objective: usize, task: usize) -> Result<(), TreeError> {
    // Validate before touching the siblings
    board.task(objective, task)?;
    let tasks = &mut board.objective_mut(objective)?.tasks;
    for t in tasks.iter_mut() {
        t.active = false;
    }
    tasks[task].active = true;
    Ok(())
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

/// Append a default subtask and expand the parent so it is visible.
/// Returns the new subtask's index.
pub fn add_subtask(board: &mut Board, objective: usize, task: usize) -> Result<usize, TreeError> {
    let t = board.task_mut(objective, task)?;
    t.expanded = true;
    t.subtasks.push(Subtask::new(NEW_SUBTASK_TITLE));
    Ok(t.subtasks.len() - 1)
}

pub fn delete_subtask(
    board: &mut Board,
    objective: usize,
    task: usize,
    subtask: usize,
) -> Result<Subtask, TreeError> {
    let subtasks = &mut board.task_mut(objective, task)?.subtasks;
    if subtask >= subtasks.len() {
        return Err(TreeError::SubtaskNotFound {
            objective,
            task,
            subtask,
        });
    }
    Ok(subtasks.remove(subtask))
}

pub fn toggle_subtask(
    board: &mut Board,
    objective: usize,
    task: usize,
    subtask: usize,
) -> Result<(), TreeError> {
    let s = board.subtask_mut(objective, task, subtask)?;
    s.completed = !s.completed;
    Ok(())
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

/// Trim a user-entered title, falling back to "Untitled" when nothing is left
pub fn normalize_title(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn edit_objective_title(
    board: &mut Board,
    objective: usize,
    title: &str,
) -> Result<(), TreeError> {
    board.objective_mut(objective)?.title = normalize_title(title);
    Ok(())
}

pub fn edit_task_title(
    board: &mut Board,
    objective: usize,
    task: usize,
    title: &str,
) -> Result<(), TreeError> {
    board.task_mut(objective, task)?.title = normalize_title(title);
    Ok(())
}

pub fn edit_subtask_title(
    board: &mut Board,
    objective: usize,
    task: usize,
    subtask: usize,
    title: &str,
) -> Result<(), TreeError> {
    board.subtask_mut(objective, task, subtask)?.title = normalize_title(title);
    Ok(())
}

/// Edit whichever title `path` points at
pub fn edit_title(board: &mut Board, path: NodePath, title: &str) -> Result<(), TreeError> {
    match (path.task, path.subtask) {
        (None, _) => edit_objective_title(board, path.objective, title),
        (Some(task), None) => edit_task_title(board, path.objective, task, title),
        (Some(task), Some(subtask)) => {
            edit_subtask_title(board, path.objective, task, subtask, title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_board() -> Board {
        let mut board = Board::new(vec![
            Objective::new("Plan trip"),
            Objective::new("Learn Rust"),
            Objective::new("Garden"),
        ]);
        for title in ["Book flight", "Pack bags", "Find hotel"] {
            board.objective_mut(0).unwrap().tasks.push(Task::new(title));
        }
        let flight = board.task_mut(0, 0).unwrap();
        flight.subtasks.push(Subtask::new("Compare prices"));
        flight.subtasks.push(Subtask::new("Pick seat"));
        board
    }

    #[test]
    fn test_add_objective_appends_default() {
        let mut board = sample_board();
        let idx = add_objective(&mut board);
        assert_eq!(idx, 3);
        assert_eq!(board.objective(3).unwrap(), &Objective::new("New objective"));
    }

    #[test]
    fn test_delete_objective_shifts_later_ones() {
        let mut board = sample_board();
        let removed = delete_objective(&mut board, 1).unwrap();
        assert_eq!(removed.title, "Learn Rust");
        assert_eq!(board.len(), 2);
        assert_eq!(board.objective(0).unwrap().title, "Plan trip");
        assert_eq!(board.objective(1).unwrap().title, "Garden");
    }

    #[test]
    fn test_delete_objective_out_of_range() {
        let mut board = sample_board();
        assert_eq!(
            delete_objective(&mut board, 3),
            Err(TreeError::ObjectiveNotFound(3))
        );
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_delete_last_objective_leaves_empty_board() {
        let mut board = Board::default();
        delete_objective(&mut board, 0).unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn test_add_task_defaults() {
        let mut board = sample_board();
        let idx = add_task(&mut board, 1).unwrap();
        assert_eq!(idx, 0);
        let task = board.task(1, 0).unwrap();
        assert_eq!(task, &Task::new("New task"));
        assert!(!task.completed && !task.expanded && !task.active);
    }

    #[test]
    fn test_add_task_missing_objective() {
        let mut board = sample_board();
        assert_eq!(add_task(&mut board, 7), Err(TreeError::ObjectiveNotFound(7)));
    }

    #[test]
    fn test_delete_task_shifts_siblings() {
        let mut board = sample_board();
        let removed = delete_task(&mut board, 0, 0).unwrap();
        assert_eq!(removed.title, "Book flight");
        let titles: Vec<&str> = board
            .objective(0)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Pack bags", "Find hotel"]);
    }

    #[test]
    fn test_delete_task_out_of_range() {
        let mut board = sample_board();
        assert_eq!(
            delete_task(&mut board, 0, 3),
            Err(TreeError::TaskNotFound {
                objective: 0,
                task: 3
            })
        );
    }

    #[test]
    fn test_toggle_expanded_and_completed_are_independent() {
        let mut board = sample_board();
        toggle_task_expanded(&mut board, 0, 0).unwrap();
        toggle_task_completed(&mut board, 0, 0).unwrap();
        let task = board.task(0, 0).unwrap();
        assert!(task.expanded);
        assert!(task.completed);
        assert!(!task.active);
        // Completing the task does not touch its subtasks
        assert!(task.subtasks.iter().all(|s| !s.completed));

        toggle_task_expanded(&mut board, 0, 0).unwrap();
        assert!(!board.task(0, 0).unwrap().expanded);
        assert!(board.task(0, 0).unwrap().completed);
    }

    #[test]
    fn test_toggle_active_clears_siblings() {
        let mut board = sample_board();
        toggle_task_active(&mut board, 0, 0).unwrap();
        toggle_task_active(&mut board, 0, 2).unwrap();
        let active: Vec<bool> = board
            .objective(0)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.active)
            .collect();
        assert_eq!(active, vec![false, false, true]);
    }

    #[test]
    fn test_toggle_active_twice_deactivates() {
        let mut board = sample_board();
        toggle_task_active(&mut board, 0, 1).unwrap();
        toggle_task_active(&mut board, 0, 1).unwrap();
        assert!(board.objective(0).unwrap().tasks.iter().all(|t| !t.active));
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut board = sample_board();
        activate_task(&mut board, 0, 1).unwrap();
        activate_task(&mut board, 0, 1).unwrap();
        assert!(board.task(0, 1).unwrap().active);
        assert_eq!(
            board
                .objective(0)
                .unwrap()
                .tasks
                .iter()
                .filter(|t| t.active)
                .count(),
            1
        );
    }

    #[test]
    fn test_activate_does_not_touch_other_objectives() {
        let mut board = sample_board();
        add_task(&mut board, 1).unwrap();
        activate_task(&mut board, 1, 0).unwrap();
        activate_task(&mut board, 0, 0).unwrap();
        assert!(board.task(1, 0).unwrap().active);
        assert!(board.task(0, 0).unwrap().active);
    }

    #[test]
    fn test_activate_missing_task_leaves_siblings() {
        let mut board = sample_board();
        activate_task(&mut board, 0, 0).unwrap();
        assert!(activate_task(&mut board, 0, 9).is_err());
        assert!(board.task(0, 0).unwrap().active);
    }

    #[test]
    fn test_add_subtask_expands_parent() {
        let mut board = sample_board();
        let idx = add_subtask(&mut board, 0, 1).unwrap();
        assert_eq!(idx, 0);
        let task = board.task(0, 1).unwrap();
        assert!(task.expanded);
        assert_eq!(task.subtasks, vec![Subtask::new("New subtask")]);
    }

    #[test]
    fn test_delete_and_toggle_subtask() {
        let mut board = sample_board();
        toggle_subtask(&mut board, 0, 0, 1).unwrap();
        assert!(board.subtask(0, 0, 1).unwrap().completed);

        let removed = delete_subtask(&mut board, 0, 0, 0).unwrap();
        assert_eq!(removed.title, "Compare prices");
        // "Pick seat" shifted into position 0 and kept its state
        let remaining = board.subtask(0, 0, 0).unwrap();
        assert_eq!(remaining.title, "Pick seat");
        assert!(remaining.completed);
        assert!(delete_subtask(&mut board, 0, 0, 1).is_err());
    }

    #[test]
    fn test_edit_titles_trim() {
        let mut board = sample_board();
        edit_objective_title(&mut board, 0, "  Summer trip \n").unwrap();
        edit_task_title(&mut board, 0, 1, "\tPack light").unwrap();
        edit_subtask_title(&mut board, 0, 0, 0, " Use alerts ").unwrap();
        assert_eq!(board.objective(0).unwrap().title, "Summer trip");
        assert_eq!(board.task(0, 1).unwrap().title, "Pack light");
        assert_eq!(board.subtask(0, 0, 0).unwrap().title, "Use alerts");
    }

    #[test]
    fn test_edit_title_empty_becomes_untitled() {
        let mut board = sample_board();
        edit_title(&mut board, NodePath::objective(1), "").unwrap();
        edit_title(&mut board, NodePath::task(0, 2), "   ").unwrap();
        edit_title(&mut board, NodePath::subtask(0, 0, 1), "\n\t ").unwrap();
        assert_eq!(board.objective(1).unwrap().title, "Untitled");
        assert_eq!(board.task(0, 2).unwrap().title, "Untitled");
        assert_eq!(board.subtask(0, 0, 1).unwrap().title, "Untitled");
    }

    #[test]
    fn test_edit_title_missing_node() {
        let mut board = sample_board();
        assert_eq!(
            edit_title(&mut board, NodePath::task(2, 0), "x"),
            Err(TreeError::TaskNotFound {
                objective: 2,
                task: 0
            })
        );
    }
}
