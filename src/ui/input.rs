use crate::ui::app::App;
use crate::ui::topics::TopicPickerIntent;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if is_ctrl_char(key, 'q') {
        app.request_quit();
        return;
    }

    if app.topic_picker().is_visible() {
        let intent = match key.code {
            KeyCode::Esc => TopicPickerIntent::Close,
            KeyCode::Up => TopicPickerIntent::MoveUp,
            KeyCode::Down => TopicPickerIntent::MoveDown,
            KeyCode::Char(' ') => TopicPickerIntent::Toggle,
            KeyCode::Delete | KeyCode::Backspace => TopicPickerIntent::ClearAll,
            KeyCode::Enter => {
                app.apply_topic_picker();
                return;
            }
            _ => return,
        };
        app.dispatch_topics(intent);
        return;
    }

    if is_ctrl_char(key, 't') {
        app.toggle_mode();
        return;
    }
    if is_ctrl_char(key, 'o') {
        app.open_topic_picker();
        return;
    }
    if is_ctrl_char(key, 'p') {
        app.toggle_pane();
        return;
    }
    if is_ctrl_char(key, 'r') {
        app.refresh_analytics();
        return;
    }

    match key.code {
        KeyCode::Tab => app.next_tab(),
        KeyCode::Enter => {
            app.submit_input();
        }
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            app.push_char(ch)
        }
        _ => {}
    }
}

fn is_ctrl_char(key: KeyEvent, needle: char) -> bool {
    matches!(key.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&needle))
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && !key.modifiers.contains(KeyModifiers::SHIFT)
}
