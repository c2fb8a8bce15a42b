use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::model::{Board, Objective, Subtask, Task, ThemeName, UiConfig};
use crate::tui::app::App;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an in-memory store, light theme, default UI config.
pub fn app_with_board(board: Board) -> App {
    App::new(
        board,
        Box::new(MemoryStore::new()),
        ThemeName::Light,
        UiConfig::default(),
    )
}

/// One objective with an expanded, active task holding two subtasks (one
/// done) and a completed task without subtasks.
pub fn trip_board() -> Board {
    let mut flight = Task::new("Book flight");
    flight.expanded = true;
    flight.active = true;
    flight.subtasks = vec![Subtask::new("Compare prices"), Subtask::new("Pick seat")];
    flight.subtasks[0].completed = true;
    let mut bags = Task::new("Pack bags");
    bags.completed = true;
    let mut trip = Objective::new("Plan trip");
    trip.tasks = vec![flight, bags];
    Board::new(vec![trip])
}
