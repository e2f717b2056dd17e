use mdshelf_core::utils::prefix_chars;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, Focus};
use crate::ui::styles;

/// Characters of the document name shown in the list.
const NAME_WIDTH: usize = 25;

/// Characters of the date shown above a document.
const DATE_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_document_list(frame, app, chunks[0]);
    render_document_detail(frame, app, chunks[1]);
}

/// List label: trimmed name cut to `NAME_WIDTH` characters.
pub fn list_label(name: &str) -> &str {
    prefix_chars(name.trim(), NAME_WIDTH)
}

fn render_document_list(frame: &mut Frame, app: &App, area: Rect) {
    let entries = app.filtered_entries();

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(vec![
                Line::from(Span::styled(list_label(&entry.name).to_string(), style)),
                Line::from(Span::styled(format!("  {}", entry.date_string), styles::muted_style())),
            ])
        })
        .collect();

    let mut title = vec![Span::styled(
        format!(" Documents ({}) ", entries.len()),
        styles::title_style(),
    )];
    if matches!(app.state, AppState::Searching) || !app.search_query.is_empty() {
        let cursor = if matches!(app.state, AppState::Searching) { "▌" } else { "" };
        title.push(Span::styled(
            format!("/{}{} ", app.search_query, cursor),
            styles::search_style(),
        ));
    }

    let focused = matches!(app.focus, Focus::List);
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    if items.is_empty() {
        let hint = if app.entries.is_empty() {
            "No documents cached. Press [u] to sync."
        } else {
            "No documents match the search."
        };
        let paragraph = Paragraph::new(Span::styled(hint, styles::muted_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_document_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let Some(view) = app.detail.as_ref() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused));
        let paragraph = Paragraph::new(Span::styled(
            "Press Enter to open a document",
            styles::muted_style(),
        ))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            prefix_chars(&view.date_string, DATE_WIDTH).to_string(),
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "─".repeat(area.width.saturating_sub(2) as usize),
            styles::muted_style(),
        )),
    ];

    if view.html.is_empty() {
        lines.push(Line::from(Span::styled("Loading...", styles::muted_style())));
    } else {
        lines.extend(view.html.lines().map(|l| Line::from(l.to_string())));
    }

    let block = Block::default()
        .title(format!(" {} ", view.name))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_label_trims_and_cuts() {
        assert_eq!(list_label("  notes.md\n"), "notes.md");
        assert_eq!(
            list_label("a-very-long-document-name-that-keeps-going.md"),
            "a-very-long-document-name"
        );
    }
}
