//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_search_char, can_add_url_char, App, AppState, Focus, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::ConfirmingQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
                false
            }
            _ => false,
        },
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
                _ => {}
            }
            false
        }
        AppState::EditingSettings => {
            handle_settings_input(app, key);
            false
        }
        AppState::Searching => {
            handle_search_input(app, key);
            false
        }
        AppState::Normal | AppState::Quitting => handle_normal_input(app, key),
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.focus = Focus::List;
        }
        KeyCode::Char('u') => app.start_sync(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('s') => app.start_settings(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List if app.detail.is_some() => Focus::Detail,
                _ => Focus::List,
            };
        }
        KeyCode::Esc => {
            if app.focus == Focus::Detail {
                app.close_detail();
            } else if !app.search_query.is_empty() {
                app.search_query.clear();
                app.clamp_selection();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => match app.focus {
            Focus::List => app.select_prev(1),
            Focus::Detail => app.detail_scroll = app.detail_scroll.saturating_sub(1),
        },
        KeyCode::Down | KeyCode::Char('j') => match app.focus {
            Focus::List => app.select_next(1),
            Focus::Detail => app.detail_scroll = app.detail_scroll.saturating_add(1),
        },
        KeyCode::PageUp => match app.focus {
            Focus::List => app.select_prev(PAGE_SCROLL_SIZE),
            Focus::Detail => {
                app.detail_scroll = app.detail_scroll.saturating_sub(PAGE_SCROLL_SIZE as u16)
            }
        },
        KeyCode::PageDown => match app.focus {
            Focus::List => app.select_next(PAGE_SCROLL_SIZE),
            Focus::Detail => {
                app.detail_scroll = app.detail_scroll.saturating_add(PAGE_SCROLL_SIZE as u16)
            }
        },
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.select_next(app.entries.len()),
        _ => {}
    }
    false
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_query.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) if can_add_search_char(app.search_query.chars().count(), c) => {
            app.search_query.push(c);
            app.selection = 0;
        }
        _ => {}
    }
    app.clamp_selection();
}

fn handle_settings_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.settings_error = None;
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            // Errors are shown in the settings overlay
            let _ = app.apply_settings();
        }
        KeyCode::Backspace => {
            app.settings_input.pop();
        }
        KeyCode::Char(c) if can_add_url_char(app.settings_input.chars().count(), c) => {
            app.settings_input.push(c);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use mdshelf_core::{Config, DocumentStore};
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_with(titles: &[&str]) -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path().join("documents.json")).unwrap();
        for title in titles {
            store.upsert(title, "body", "2024/03/09/14:05:33").unwrap();
        }
        let mut app = App::with_store(Config::default(), store).unwrap();
        app.load_from_store();
        (dir, app)
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let (_dir, mut app) = app_with(&[]);

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
    }

    #[test]
    fn test_search_typing_filters_and_escape_clears() {
        let (_dir, mut app) = app_with(&["alpha.md", "beta.md"]);

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "bet");
        assert_eq!(app.search_query, "bet");
        assert_eq!(app.selected_entry().unwrap().name, "beta.md");

        press(&mut app, KeyCode::Esc);
        assert!(app.search_query.is_empty());
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_delete_flow_via_keys() {
        let (_dir, mut app) = app_with(&["a.md", "b.md"]);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.pending_delete.as_deref(), Some("b.md"));
        press(&mut app, KeyCode::Char('y'));
        app.check_background_tasks();

        assert!(app.store.find_by_title("b.md").is_none());
        assert_eq!(app.entries.len(), 1);
    }

    #[test]
    fn test_settings_edit_and_cancel() {
        let (_dir, mut app) = app_with(&[]);
        let original = app.config.base_url.clone();

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.state, AppState::EditingSettings);
        type_str(&mut app, "/extra");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.config.base_url, original);
    }

    #[test]
    fn test_enter_opens_and_escape_closes_detail() {
        let (_dir, mut app) = app_with(&["a.md"]);

        press(&mut app, KeyCode::Enter);
        assert!(app.detail.is_some());
        assert_eq!(app.focus, Focus::Detail);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.detail_scroll, 1);

        press(&mut app, KeyCode::Esc);
        assert!(app.detail.is_none());
        assert_eq!(app.focus, Focus::List);
    }
}
