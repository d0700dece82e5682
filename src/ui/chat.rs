//! Conversation pane and input line.

use crate::conversation::{ConversationState, Entry, Sender, PLACEHOLDER_TEXT};
use crate::ui::theme::{ACCENT, BOT_TEXT, GLOBAL_BORDER, PENDING_TEXT, USER_TEXT};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const INPUT_PROMPT: &str = "> ";

pub fn render_chat(frame: &mut Frame, area: Rect, state: &ConversationState, input: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    render_messages(frame, chunks[0], state);
    render_input(frame, chunks[1], input);
}

fn render_messages(frame: &mut Frame, area: Rect, state: &ConversationState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GLOBAL_BORDER))
        .title(Span::styled(" Chat ", Style::default().fg(ACCENT)));
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    let lines = if state.entries.is_empty() {
        vec![Line::from(Span::styled(
            "Ask a question to get started.",
            Style::default().fg(PENDING_TEXT),
        ))]
    } else {
        conversation_lines(state)
    };

    // Stick to the newest message.
    let total = wrapped_height(&lines, inner_width);
    let scroll = total.saturating_sub(inner_height);

    let widget = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(widget, area);
}

fn conversation_lines(state: &ConversationState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in &state.entries {
        match entry {
            Entry::Message(message) => {
                let (label, style) = match message.sender {
                    Sender::User => ("You", Style::default().fg(USER_TEXT)),
                    Sender::Bot => ("Bot", Style::default().fg(BOT_TEXT)),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", label), style.add_modifier(Modifier::BOLD)),
                    Span::styled(message.text.clone(), style),
                ]));
            }
            Entry::Pending(_) => {
                let style = Style::default()
                    .fg(PENDING_TEXT)
                    .add_modifier(Modifier::ITALIC);
                lines.push(Line::from(vec![
                    Span::styled("Bot: ", style.add_modifier(Modifier::BOLD)),
                    Span::styled(PLACEHOLDER_TEXT, style),
                ]));
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

fn render_input(frame: &mut Frame, area: Rect, input: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GLOBAL_BORDER));
    let inner_width = area.width.saturating_sub(2) as usize;

    // Show the tail of long input so the cursor stays visible.
    let visible_width = inner_width.saturating_sub(INPUT_PROMPT.len() + 1);
    let char_count = input.chars().count();
    let visible: String = input
        .chars()
        .skip(char_count.saturating_sub(visible_width))
        .collect();

    let cursor_x = area.x + 1 + (INPUT_PROMPT.len() + visible.chars().count()) as u16;
    let line = Line::from(vec![
        Span::styled(INPUT_PROMPT, Style::default().fg(ACCENT)),
        Span::raw(visible),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    if area.width > 2 && area.height > 2 {
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Rows `lines` occupy when wrapped at `width` columns.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    rows.min(u16::MAX as usize) as u16
}
