use crate::io::store::{KeyValueStore, StoreError};
use crate::model::{Board, ThemeName};

/// Store key holding the serialized board
pub const BOARD_KEY: &str = "focusTodo";
/// Store key holding `night` or `light`
pub const THEME_KEY: &str = "focusTodoTheme";

/// Result of loading the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored board was read
    Loaded(Board),
    /// Nothing stored yet (or the store itself could not be read)
    Fresh(Board),
    /// A stored blob (or the store file holding it) existed but could not be
    /// parsed; the raw text is kept so it can be written to the recovery log
    Recovered { board: Board, raw: String },
}

impl LoadOutcome {
    pub fn board(&self) -> &Board {
        match self {
            LoadOutcome::Loaded(board)
            | LoadOutcome::Fresh(board)
            | LoadOutcome::Recovered { board, .. } => board,
        }
    }

    pub fn into_board(self) -> Board {
        match self {
            LoadOutcome::Loaded(board)
            | LoadOutcome::Fresh(board)
            | LoadOutcome::Recovered { board, .. } => board,
        }
    }
}

/// Serialize the whole board under `focusTodo`
pub fn save_board(store: &mut dyn KeyValueStore, board: &Board) -> Result<(), StoreError> {
    let blob = serde_json::to_string(board)?;
    store.set(BOARD_KEY, &blob)
}

/// Load the board, falling back to the default single-objective board
/// when nothing usable is stored. Never fails.
pub fn load_board(store: &dyn KeyValueStore) -> LoadOutcome {
    let raw = match store.get(BOARD_KEY) {
        Ok(Some(raw)) => raw,
        // The whole store file is unreadable; the next save would replace it
        Err(StoreError::Corrupt { raw, .. }) => {
            return LoadOutcome::Recovered {
                board: Board::default(),
                raw,
            };
        }
        Ok(None) | Err(_) => return LoadOutcome::Fresh(Board::default()),
    };
    match serde_json::from_str::<Option<Board>>(&raw) {
        Ok(Some(board)) => LoadOutcome::Loaded(board),
        // A literal `null` blob is treated like nothing stored
        Ok(None) => LoadOutcome::Fresh(Board::default()),
        Err(_) => LoadOutcome::Recovered {
            board: Board::default(),
            raw,
        },
    }
}

pub fn save_theme(store: &mut dyn KeyValueStore, theme: ThemeName) -> Result<(), StoreError> {
    store.set(THEME_KEY, theme.as_str())
}

/// Stored theme, or `fallback` when absent or unrecognized
pub fn load_theme(store: &dyn KeyValueStore, fallback: ThemeName) -> ThemeName {
    match store.get(THEME_KEY) {
        Ok(Some(value)) => ThemeName::parse(&value).unwrap_or(fallback),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use crate::model::{Objective, Subtask, Task};
    use pretty_assertions::assert_eq;

    fn busy_board() -> Board {
        let mut flight = Task::new("Book flight");
        flight.completed = true;
        flight.active = true;
        flight.expanded = true;
        flight.subtasks = vec![Subtask::new("Compare prices"), Subtask::new("Pick seat")];
        flight.subtasks[1].completed = true;
        let mut trip = Objective::new("Plan trip");
        trip.tasks = vec![flight, Task::new("Pack bags")];
        Board::new(vec![trip, Objective::new("Learn Rust")])
    }

    #[test]
    fn save_then_load_is_deep_equal() {
        let mut store = MemoryStore::new();
        let board = busy_board();
        save_board(&mut store, &board).unwrap();
        assert_eq!(load_board(&store), LoadOutcome::Loaded(board));
    }

    #[test]
    fn empty_board_round_trips() {
        let mut store = MemoryStore::new();
        let board = Board::new(vec![]);
        save_board(&mut store, &board).unwrap();
        assert_eq!(load_board(&store).into_board(), board);
    }

    #[test]
    fn nothing_stored_gives_default() {
        let store = MemoryStore::new();
        assert_eq!(load_board(&store), LoadOutcome::Fresh(Board::default()));
    }

    #[test]
    fn null_blob_gives_default() {
        let mut store = MemoryStore::new();
        store.set(BOARD_KEY, "null").unwrap();
        assert_eq!(load_board(&store), LoadOutcome::Fresh(Board::default()));
    }

    #[test]
    fn garbage_blob_gives_default_and_keeps_raw() {
        let mut store = MemoryStore::new();
        store.set(BOARD_KEY, "{not valid").unwrap();
        let outcome = load_board(&store);
        assert_eq!(outcome.board(), &Board::default());
        assert_eq!(
            outcome,
            LoadOutcome::Recovered {
                board: Board::default(),
                raw: "{not valid".to_string(),
            }
        );
    }

    #[test]
    fn wrong_shape_gives_default() {
        let mut store = MemoryStore::new();
        store.set(BOARD_KEY, r#"{"title":"not an array"}"#).unwrap();
        assert!(matches!(load_board(&store), LoadOutcome::Recovered { .. }));
    }

    #[test]
    fn theme_round_trip_and_fallback() {
        let mut store = MemoryStore::new();
        assert_eq!(load_theme(&store, ThemeName::Light), ThemeName::Light);
        save_theme(&mut store, ThemeName::Night).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("night"));
        assert_eq!(load_theme(&store, ThemeName::Light), ThemeName::Night);

        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(load_theme(&store, ThemeName::Night), ThemeName::Night);
    }
}
