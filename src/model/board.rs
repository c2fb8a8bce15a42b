use serde::{Deserialize, Serialize};

/// Title given to the objective of a fresh board
pub const FIRST_OBJECTIVE_TITLE: &str = "My first objective";
pub const NEW_OBJECTIVE_TITLE: &str = "New objective";
pub const NEW_TASK_TITLE: &str = "New task";
pub const NEW_SUBTASK_TITLE: &str = "New subtask";
/// Stored in place of a title that is empty after trimming
pub const UNTITLED: &str = "Untitled";

/// Error type for lookups into the board by position
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("objective {0} not found")]
    ObjectiveNotFound(usize),
    #[error("task {task} not found in objective {objective}")]
    TaskNotFound { objective: usize, task: usize },
    #[error("subtask {subtask} not found in task {objective}.{task}")]
    SubtaskNotFound {
        objective: usize,
        task: usize,
        subtask: usize,
    },
}

/// Leaf unit of work under a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Subtask {
            title: title.into(),
            completed: false,
        }
    }
}

/// A unit of work under an objective.
///
/// The three flags are independent of each other; completion is never derived
/// from the subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Subtask list is shown
    #[serde(default)]
    pub expanded: bool,
    /// The one task of its objective being worked on
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Task {
            title: title.into(),
            completed: false,
            expanded: false,
            active: false,
            subtasks: Vec::new(),
        }
    }
}

/// Top-level goal holding an ordered list of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Objective {
    pub fn new(title: impl Into<String>) -> Self {
        Objective {
            title: title.into(),
            tasks: Vec::new(),
        }
    }
}

/// The whole to-do tree, owned by the running app.
///
/// Serializes as a bare JSON array of objectives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    objectives: Vec<Objective>,
}

impl Default for Board {
    /// A board with a single empty objective
    fn default() -> Self {
        Board {
            objectives: vec![Objective::new(FIRST_OBJECTIVE_TITLE)],
        }
    }
}

impl Board {
    pub fn new(objectives: Vec<Objective>) -> Self {
        Board { objectives }
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn objectives_mut(&mut self) -> &mut Vec<Objective> {
        &mut self.objectives
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    pub fn objective(&self, objective: usize) -> Result<&Objective, TreeError> {
        self.objectives
            .get(objective)
            .ok_or(TreeError::ObjectiveNotFound(objective))
    }

    pub fn objective_mut(&mut self, objective: usize) -> Result<&mut Objective, TreeError> {
        self.objectives
            .get_mut(objective)
            .ok_or(TreeError::ObjectiveNotFound(objective))
    }

    pub fn task(&self, objective: usize, task: usize) -> Result<&Task, TreeError> {
        self.objective(objective)?
            .tasks
            .get(task)
            .ok_or(TreeError::TaskNotFound { objective, task })
    }

    pub fn task_mut(&mut self, objective: usize, task: usize) -> Result<&mut Task, TreeError> {
        self.objective_mut(objective)?
            .tasks
            .get_mut(task)
            .ok_or(TreeError::TaskNotFound { objective, task })
    }

    pub fn subtask(
        &self,
        objective: usize,
        task: usize,
        subtask: usize,
    ) -> Result<&Subtask, TreeError> {
        self.task(objective, task)?
            .subtasks
            .get(subtask)
            .ok_or(TreeError::SubtaskNotFound {
                objective,
                task,
                subtask,
            })
    }

    pub fn subtask_mut(
        &mut self,
        objective: usize,
        task: usize,
        subtask: usize,
    ) -> Result<&mut Subtask, TreeError> {
        self.task_mut(objective, task)?
            .subtasks
            .get_mut(subtask)
            .ok_or(TreeError::SubtaskNotFound {
                objective,
                task,
                subtask,
            })
    }

    /// Title of the node at `path`, if it exists
    pub fn title_at(&self, path: NodePath) -> Option<&str> {
        match path {
            NodePath {
                objective,
                task: None,
                ..
            } => self.objective(objective).ok().map(|o| o.title.as_str()),
            NodePath {
                objective,
                task: Some(task),
                subtask: None,
            } => self.task(objective, task).ok().map(|t| t.title.as_str()),
            NodePath {
                objective,
                task: Some(task),
                subtask: Some(subtask),
            } => self
                .subtask(objective, task, subtask)
                .ok()
                .map(|s| s.title.as_str()),
        }
    }
}

/// Positional address of a node in the board.
///
/// `subtask` is only meaningful when `task` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodePath {
    pub objective: usize,
    pub task: Option<usize>,
    pub subtask: Option<usize>,
}

impl NodePath {
    pub fn objective(objective: usize) -> Self {
        NodePath {
            objective,
            task: None,
            subtask: None,
        }
    }

    pub fn task(objective: usize, task: usize) -> Self {
        NodePath {
            objective,
            task: Some(task),
            subtask: None,
        }
    }

    pub fn subtask(objective: usize, task: usize, subtask: usize) -> Self {
        NodePath {
            objective,
            task: Some(task),
            subtask: Some(subtask),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board() -> Board {
        let mut task = Task::new("Book flight");
        task.subtasks.push(Subtask::new("Compare prices"));
        let mut objective = Objective::new("Plan trip");
        objective.tasks.push(task);
        Board::new(vec![objective])
    }

    #[test]
    fn default_board_has_one_empty_objective() {
        let board = Board::default();
        assert_eq!(board.len(), 1);
        assert_eq!(board.objectives()[0].title, FIRST_OBJECTIVE_TITLE);
        assert!(board.objectives()[0].tasks.is_empty());
    }

    #[test]
    fn accessors_resolve_positions() {
        let board = sample_board();
        assert_eq!(board.objective(0).unwrap().title, "Plan trip");
        assert_eq!(board.task(0, 0).unwrap().title, "Book flight");
        assert_eq!(board.subtask(0, 0, 0).unwrap().title, "Compare prices");
    }

    #[test]
    fn accessors_report_missing_positions() {
        let board = sample_board();
        assert_eq!(board.objective(3), Err(TreeError::ObjectiveNotFound(3)));
        assert_eq!(
            board.task(0, 1),
            Err(TreeError::TaskNotFound {
                objective: 0,
                task: 1
            })
        );
        assert_eq!(
            board.subtask(0, 0, 5),
            Err(TreeError::SubtaskNotFound {
                objective: 0,
                task: 0,
                subtask: 5
            })
        );
        assert_eq!(board.task(2, 0), Err(TreeError::ObjectiveNotFound(2)));
    }

    #[test]
    fn title_at_each_level() {
        let board = sample_board();
        assert_eq!(board.title_at(NodePath::objective(0)), Some("Plan trip"));
        assert_eq!(board.title_at(NodePath::task(0, 0)), Some("Book flight"));
        assert_eq!(
            board.title_at(NodePath::subtask(0, 0, 0)),
            Some("Compare prices")
        );
        assert_eq!(board.title_at(NodePath::task(0, 9)), None);
    }

    #[test]
    fn serializes_as_bare_array() {
        let board = sample_board();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(
            json,
            r#"[{"title":"Plan trip","tasks":[{"title":"Book flight","completed":false,"expanded":false,"active":false,"subtasks":[{"title":"Compare prices","completed":false}]}]}]"#
        );
    }

    #[test]
    fn missing_flags_default_on_read() {
        let board: Board =
            serde_json::from_str(r#"[{"title":"A","tasks":[{"title":"T"}]}]"#).unwrap();
        let task = board.task(0, 0).unwrap();
        assert!(!task.completed && !task.expanded && !task.active);
        assert!(task.subtasks.is_empty());
    }
}
