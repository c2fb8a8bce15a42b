use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::tui::theme::Theme;
use crate::tui::view::{Control, Role, Segment, layout_row};
use crate::util::unicode::next_grapheme_boundary;

/// Render the board: one line per view row, scrolled to keep the cursor visible
pub fn render_board_view(frame: &mut Frame, app: &mut App, area: Rect) {
    app.content_area = area;
    let height = area.height as usize;
    app.scroll_to_cursor(height);

    // Column 0 is reserved for the cursor marker
    let width = (area.width as usize).saturating_sub(1);
    let mut lines: Vec<Line> = Vec::new();

    for (idx, row) in app
        .rows
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
    {
        let is_cursor = idx == app.cursor;
        let bg = if is_cursor {
            app.theme.selection_bg
        } else {
            app.theme.background
        };

        let edit = app
            .edit
            .as_ref()
            .filter(|e| app.mode == Mode::Edit && row.has_title() && e.path == row.path);

        let mut spans = vec![if is_cursor {
            Span::styled(
                "\u{258E}",
                Style::default().fg(app.theme.selection_border).bg(bg),
            )
        } else {
            Span::styled(" ", Style::default().bg(bg))
        }];

        let segments = layout_row(&app.board, row, width, edit.map(|e| e.buffer.as_str()));
        let mut used = 0;
        for segment in &segments {
            used += segment.width();
            let style = segment_style(&app.theme, segment).bg(bg);
            let is_title = matches!(
                segment.control,
                Some(Control::ObjectiveTitle | Control::TaskTitle | Control::SubtaskTitle)
            );
            match edit {
                Some(edit) if is_title => {
                    push_edit_spans(
                        &mut spans,
                        &edit.buffer,
                        edit.cursor,
                        edit.is_fresh,
                        style,
                        &app.theme,
                    );
                    // The cursor block past the end takes a cell
                    if edit.cursor >= edit.buffer.len() {
                        used += 1;
                    }
                }
                _ => spans.push(Span::styled(segment.text.clone(), style)),
            }
        }
        if used < width {
            spans.push(Span::styled(
                " ".repeat(width - used),
                Style::default().bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

fn segment_style(theme: &Theme, segment: &Segment) -> Style {
    let fg = |c: Color| Style::default().fg(c);
    match segment.role {
        Role::Plain | Role::Title => fg(theme.text),
        Role::ObjectiveTitle => fg(theme.text_bright).add_modifier(Modifier::BOLD),
        Role::ActiveTitle => fg(theme.highlight),
        Role::CompletedTitle => fg(theme.dim).add_modifier(Modifier::CROSSED_OUT),
        Role::ActiveMarker => fg(theme.highlight).add_modifier(Modifier::BOLD),
        Role::Toggle | Role::Count | Role::Add => fg(theme.dim),
        Role::Check if segment.text == "[x]" => fg(theme.green),
        Role::Check => fg(theme.text),
        Role::BarFilled => fg(theme.bar_filled),
        Role::BarEmpty => fg(theme.bar_empty),
        Role::Percent => fg(theme.text),
        Role::Delete => fg(theme.red),
    }
}

/// The edit buffer with a block cursor. A fresh buffer is shown selected.
fn push_edit_spans(
    spans: &mut Vec<Span<'static>>,
    buffer: &str,
    cursor: usize,
    is_fresh: bool,
    base: Style,
    theme: &Theme,
) {
    let text_style = base.fg(theme.text_bright).remove_modifier(Modifier::CROSSED_OUT);
    let cursor_style = Style::default().fg(theme.background).bg(theme.highlight);

    if is_fresh {
        spans.push(Span::styled(
            buffer.to_string(),
            Style::default().fg(theme.background).bg(theme.selection_border),
        ));
        spans.push(Span::styled(" ", cursor_style));
        return;
    }

    let cursor = cursor.min(buffer.len());
    let (before, rest) = buffer.split_at(cursor);
    if !before.is_empty() {
        spans.push(Span::styled(before.to_string(), text_style));
    }
    match next_grapheme_boundary(rest, 0) {
        Some(end) => {
            spans.push(Span::styled(rest[..end].to_string(), cursor_style));
            if end < rest.len() {
                spans.push(Span::styled(rest[end..].to_string(), text_style));
            }
        }
        None => spans.push(Span::styled(" ", cursor_style)),
    }
}
