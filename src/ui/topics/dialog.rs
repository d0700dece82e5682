use crate::ui::layout::centered_rect_by_size;
use crate::ui::theme::{ACCENT, ACTIVE_HIGHLIGHT, HEADER_TEXT, POPUP_BORDER, STATUS_OK};
use crate::ui::topics::state::TopicPickerState;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_MIN_WIDTH: u16 = 44;
const HINT: &str = "Space: Toggle  Enter: Apply  Del: Clear  Esc: Cancel";

pub fn render_topic_picker(frame: &mut Frame, state: &TopicPickerState, area: Rect) {
    let TopicPickerState::Visible {
        options, focused, ..
    } = state
    else {
        return;
    };

    let mut lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            let (mark, mark_style) = if option.checked {
                ("[x] ", Style::default().fg(STATUS_OK))
            } else {
                ("[ ] ", Style::default().fg(HEADER_TEXT))
            };
            let line = Line::from(vec![
                Span::raw(" "),
                Span::styled(mark, mark_style),
                Span::styled(option.label.clone(), Style::default().fg(HEADER_TEXT)),
            ]);
            if idx == *focused {
                line.style(Style::default().bg(ACTIVE_HIGHLIGHT))
            } else {
                line
            }
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(" No topics configured."));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {}", HINT),
        Style::default().fg(HEADER_TEXT).add_modifier(Modifier::DIM),
    )));

    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let width = content_width.saturating_add(3).max(DIALOG_MIN_WIDTH);
    let height = (lines.len() as u16).saturating_add(2);
    let rect = centered_rect_by_size(area, width, height);

    frame.render_widget(Clear, rect);
    let block = Block::default()
        .title(Span::styled(" Topics ", Style::default().fg(ACCENT)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(POPUP_BORDER));
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
