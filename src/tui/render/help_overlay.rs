use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const KEY_COLUMN: usize = 14;

/// (section, [(keys, description)])
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("\u{2191}\u{2193} j k", "Move cursor"),
            ("g G", "Jump to top / bottom"),
            ("\u{2190}\u{2192} h l", "Collapse / expand task"),
            ("z", "Toggle subtasks"),
            ("click", "Press any control"),
        ],
    ),
    (
        "Board",
        &[
            ("Space x", "Toggle done"),
            ("a", "Toggle active task"),
            ("e Enter", "Edit title"),
            ("o O", "Add task / objective"),
            ("s", "Add subtask"),
            ("d Del", "Delete"),
        ],
    ),
    (
        "Editing",
        &[
            ("Enter Tab", "Save (so does clicking away)"),
            ("Esc", "Discard changes"),
        ],
    ),
    (
        "Global",
        &[
            ("t", "Switch night / light"),
            ("?", "Toggle this help"),
            ("q Ctrl+C", "Quit"),
        ],
    ),
];

/// Key binding reference, centered over the board
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let heading = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);

    let mut lines = vec![Line::from(Span::styled(" Key Bindings", heading))];
    for (section, bindings) in SECTIONS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", section), heading)));
        for (keys, desc) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<width$}", keys, width = KEY_COLUMN), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
    }

    let overlay = centered(area, 48, lines.len() as u16 + 2);
    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}

/// A `width` x `height` rect centered in `area`, clamped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
