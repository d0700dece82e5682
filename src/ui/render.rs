use crate::ui::app::{App, Tab};
use crate::ui::chat::render_chat;
use crate::ui::dashboard::render_dashboard;
use crate::ui::footer::Footer;
use crate::ui::header::Header;
use crate::ui::layout::{layout_regions, split_body};
use crate::ui::theme::{ACCENT, ACTIVE_HIGHLIGHT, GLOBAL_BORDER, HEADER_TEXT, PENDING_TEXT};
use crate::ui::topics::render_topic_picker;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    let (header, body, footer) = layout_regions(area);

    frame.render_widget(Header::new().widget(app), header);
    frame.render_widget(Clear, body);

    let (pane, main) = split_body(body, app.pane_open());
    if let Some(pane) = pane {
        render_side_pane(frame, pane, app);
    }
    match app.tab() {
        Tab::Chat => render_chat(frame, main, app.conversation(), app.input()),
        Tab::Analytics => render_dashboard(frame, main, app.analytics()),
    }

    frame.render_widget(Footer::new().widget(footer, app.tab()), footer);

    render_topic_picker(frame, app.topic_picker(), body);
}

fn render_side_pane(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    for tab in [Tab::Chat, Tab::Analytics] {
        let line = Line::from(format!(" {}", tab.label()));
        lines.push(if tab == app.tab() {
            line.style(
                Style::default()
                    .fg(ACCENT)
                    .bg(ACTIVE_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            line.style(Style::default().fg(HEADER_TEXT))
        });
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Topics",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )));
    let topics = &app.conversation().selected_topics;
    if topics.is_empty() {
        lines.push(Line::from(Span::styled(
            " auto (classifier)",
            Style::default().fg(PENDING_TEXT),
        )));
    } else {
        for topic in topics {
            lines.push(Line::from(Span::styled(
                format!(" • {}", topic),
                Style::default().fg(HEADER_TEXT),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GLOBAL_BORDER));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
