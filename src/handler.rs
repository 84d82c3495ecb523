use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::state::AnalysisState;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global quit
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.state {
        AnalysisState::Idle => handle_idle_key(app, key),
        AnalysisState::Loading => handle_loading_key(app, key),
        AnalysisState::Success(_) => handle_success_key(app, key),
        AnalysisState::Error(_) => handle_error_key(app, key),
    }
}

fn handle_idle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => {
            if app.url_cursor > 0 {
                app.url_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.url_input, app.url_cursor);
                app.url_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.url_input.chars().count();
            if app.url_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.url_input, app.url_cursor);
                app.url_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.url_cursor = app.url_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.url_input.chars().count();
            app.url_cursor = (app.url_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.url_cursor = 0;
        }
        KeyCode::End => {
            app.url_cursor = app.url_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.url_input, app.url_cursor);
            app.url_input.insert(byte_pos, c);
            app.url_cursor += 1;
        }
        _ => {}
    }
}

fn handle_loading_key(app: &mut App, key: KeyEvent) {
    // No new submissions while a request is in flight. Esc walks away; the
    // generation guard makes the eventual stale reply harmless.
    if key.code == KeyCode::Esc {
        app.abandon();
    }
}

fn handle_success_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('n') | KeyCode::Char('r') | KeyCode::Enter => app.reset(),
        KeyCode::Char('j') | KeyCode::Down => app.roadmap_next(),
        KeyCode::Char('k') | KeyCode::Up => app.roadmap_prev(),
        KeyCode::Char('e') => app.export_roadmap(),
        _ => {}
    }
}

fn handle_error_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        // Retry returns to the input screen; nothing is resubmitted
        // automatically.
        KeyCode::Char('r') | KeyCode::Enter => app.reset(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::from(code))
    }

    #[test]
    fn idle_typing_edits_the_url_with_a_cursor() {
        let mut app = App::new(&Config::new());

        for c in "ab".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Left));
        handle_event(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.url_input, "axb");

        handle_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.url_input, "ab");
        assert_eq!(app.url_cursor, 1);
    }

    #[test]
    fn error_retry_goes_back_to_idle() {
        let mut app = App::new(&Config::new());
        app.state = AnalysisState::Error("boom".to_string());

        handle_event(&mut app, key(KeyCode::Char('r')));
        assert!(app.state.is_idle());
    }

    #[test]
    fn loading_ignores_everything_but_escape() {
        let mut app = App::new(&Config::new());
        app.state = AnalysisState::Loading;

        handle_event(&mut app, key(KeyCode::Enter));
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.state.is_loading());
        assert!(!app.should_quit);

        handle_event(&mut app, key(KeyCode::Esc));
        assert!(app.state.is_idle());
    }
}
