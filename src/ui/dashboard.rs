//! Analytics tab: bar charts over the usage log plus a per-query timing
//! table.

use crate::analytics::{AnalyticsReport, AnalyticsState, StageTimings};
use crate::ui::theme::{ACCENT, GLOBAL_BORDER, HEADER_TEXT, PENDING_TEXT, STATUS_ERROR};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

/// Rows of the timing table, newest first.
const TIMING_ROWS: usize = 10;

pub fn render_dashboard(frame: &mut Frame, area: Rect, state: &AnalyticsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    frame.render_widget(Paragraph::new(status_line(state)), chunks[0]);

    match state.report() {
        Some(report) => render_report(frame, chunks[1], report),
        None => {
            let hint = match state {
                AnalyticsState::Failed { .. } => "Press Ctrl+R to retry.",
                _ => "",
            };
            frame.render_widget(
                Paragraph::new(hint).style(Style::default().fg(PENDING_TEXT)),
                chunks[1],
            );
        }
    }
}

fn status_line(state: &AnalyticsState) -> Line<'static> {
    match state {
        AnalyticsState::Idle => Line::from(Span::styled(
            " Press Ctrl+R to load analytics.",
            Style::default().fg(PENDING_TEXT),
        )),
        AnalyticsState::Loading { .. } => Line::from(Span::styled(
            " Loading analytics...",
            Style::default().fg(PENDING_TEXT),
        )),
        AnalyticsState::Loaded { report } => Line::from(Span::styled(
            format!(" {} logged queries", report.queries),
            Style::default().fg(HEADER_TEXT),
        )),
        AnalyticsState::Failed { error } => Line::from(Span::styled(
            format!(" Analytics unavailable: {}", error),
            Style::default().fg(STATUS_ERROR),
        )),
    }
}

fn render_report(frame: &mut Frame, area: Rect, report: &AnalyticsReport) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(area);
    let top = halves(rows[0]);
    let middle = halves(rows[1]);

    let recent = report
        .recent
        .as_ref()
        .map(|recent| recent.timings)
        .unwrap_or_default();
    let timing_bars = stage_bars(&recent);
    frame.render_widget(chart(" Latest query (ms) ", &timing_bars), top[0]);

    let probability_bars: Vec<Bar> = report
        .average_probability
        .iter()
        .map(|(topic, mean)| {
            let percent = mean * 100.0;
            scaled_bar(topic, percent, format!("{:.0}%", percent))
        })
        .collect();
    frame.render_widget(chart(" Avg probability ", &probability_bars), top[1]);

    let count_bars: Vec<Bar> = report
        .document_counts
        .iter()
        .map(|(topic, count)| scaled_bar(topic, *count as f64, count.to_string()))
        .collect();
    frame.render_widget(chart(" Documents per topic ", &count_bars), middle[0]);

    // ln values are small; scale by 100 so bars keep resolution.
    let score_bars: Vec<Bar> = report
        .score_contribution
        .iter()
        .map(|(topic, value)| scaled_bar(topic, value * 100.0, format!("{:.2}", value)))
        .collect();
    frame.render_widget(chart(" Score ln(1+mean) ", &score_bars), middle[1]);

    frame.render_widget(timing_table(&report.timings), rows[2]);
}

fn halves(area: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    [chunks[0], chunks[1]]
}

fn stage_bars(timings: &StageTimings) -> Vec<Bar<'static>> {
    [
        ("classifier", timings.classifier),
        ("retriever", timings.retriever),
        ("summarizer", timings.summarizer),
    ]
    .into_iter()
    .map(|(stage, seconds)| {
        let ms = seconds * 1000.0;
        scaled_bar(stage, ms, format!("{:.0}", ms))
    })
    .collect()
}

fn scaled_bar(label: &str, value: f64, text: String) -> Bar<'static> {
    Bar::default()
        .label(Line::from(label.to_string()))
        .value(bar_value(value))
        .text_value(text)
}

fn bar_value(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

fn chart<'a>(title: &'a str, bars: &'a [Bar<'a>]) -> BarChart<'a> {
    BarChart::default()
        .block(panel(title))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(ACCENT))
        .value_style(Style::default().fg(HEADER_TEXT).add_modifier(Modifier::BOLD))
        .data(BarGroup::default().bars(bars))
}

fn timing_table(timings: &[StageTimings]) -> Table<'static> {
    let header = Row::new(vec!["#", "classifier", "retriever", "summarizer"])
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = timings
        .iter()
        .enumerate()
        .rev()
        .take(TIMING_ROWS)
        .map(|(idx, timing)| {
            Row::new(vec![
                Cell::from((idx + 1).to_string()),
                Cell::from(format!("{:.3}s", timing.classifier)),
                Cell::from(format!("{:.3}s", timing.retriever)),
                Cell::from(format!("{:.3}s", timing.summarizer)),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(panel(" Stage timings "))
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(title, Style::default().fg(ACCENT)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GLOBAL_BORDER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_bars_cover_each_stage() {
        let bars = stage_bars(&StageTimings {
            classifier: 0.25,
            retriever: 1.5,
            summarizer: 0.0,
        });
        assert_eq!(bars.len(), 3);
    }

    #[test]
    fn bar_values_round_and_clamp() {
        assert_eq!(bar_value(1499.6), 1500);
        assert_eq!(bar_value(-3.0), 0);
    }
}
