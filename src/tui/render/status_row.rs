use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

pub const NAVIGATE_HINTS: &str =
    " space done  a active  o task  s subtask  e edit  d delete  t theme  ? help  q quit";
const EDIT_HINT: &str = "Enter save  Esc cancel ";
const CONFIRM_HINT: &str = "y delete  n keep ";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Navigate => match &app.status_message {
            Some(message) => {
                let color = if app.status_is_error {
                    app.theme.red
                } else {
                    app.theme.green
                };
                Line::from(Span::styled(
                    truncate_to_width(&format!(" {}", message), width),
                    Style::default().fg(color).bg(bg),
                ))
            }
            None if app.ui_config.show_key_hints => Line::from(Span::styled(
                truncate_to_width(NAVIGATE_HINTS, width),
                Style::default().fg(app.theme.dim).bg(bg),
            )),
            None => Line::from(""),
        },
        Mode::Edit => with_hint(
            Span::styled(
                " editing",
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
            EDIT_HINT,
            app,
            width,
        ),
        Mode::Confirm => {
            let message = app
                .confirm_state
                .as_ref()
                .map(|c| format!(" {}", c.message))
                .unwrap_or_default();
            with_hint(
                Span::styled(
                    truncate_to_width(&message, width),
                    Style::default()
                        .fg(app.theme.red)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                ),
                CONFIRM_HINT,
                app,
                width,
            )
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// `left` followed by a right-aligned dim hint, when both fit
fn with_hint<'a>(left: Span<'a>, hint: &'a str, app: &App, width: usize) -> Line<'a> {
    let bg = app.theme.background;
    let content_width = display_width(&left.content);
    let hint_width = display_width(hint);
    let mut spans = vec![left];
    if content_width + hint_width < width {
        spans.push(Span::styled(
            " ".repeat(width - content_width - hint_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }
    Line::from(spans)
}
