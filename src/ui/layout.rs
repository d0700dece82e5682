use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the side pane when open.
pub const SIDE_PANE_WIDTH: u16 = 24;

/// Header, body and footer bands.
pub fn layout_regions(area: Rect) -> (Rect, Rect, Rect) {
    let header_height = area.height.min(3);
    let footer_height = 3.min(area.height.saturating_sub(header_height));
    let header = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: header_height,
    };
    let footer = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(footer_height),
        width: area.width,
        height: footer_height,
    };
    let body = Rect {
        x: area.x,
        y: area.y + header_height,
        width: area.width,
        height: area.height.saturating_sub(header_height + footer_height),
    };
    (header, body, footer)
}

/// Split the body into an optional side pane and the main area.
pub fn split_body(body: Rect, pane_open: bool) -> (Option<Rect>, Rect) {
    if !pane_open || body.width <= SIDE_PANE_WIDTH * 2 {
        return (None, body);
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDE_PANE_WIDTH), Constraint::Min(1)])
        .split(body);
    (Some(chunks[0]), chunks[1])
}

/// Rect of at most `width` x `height` centered in `area`.
pub fn centered_rect_by_size(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
