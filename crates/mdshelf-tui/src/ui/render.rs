use mdshelf_core::utils::truncate_string;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};

use super::documents;
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    documents::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::EditingSettings => render_settings_overlay(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  mdshelf";
    let server = format!("{}  [?] Help", app.config.base_url);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + server.chars().count() + 2),
        )),
        Span::styled(server, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = if app.sync_in_progress {
        "syncing | [q]uit"
    } else {
        "[u] sync | [r]efresh | [d]elete | [s]ettings | [q]uit"
    };

    let right_text = format!(" {} ", shortcuts);
    let left_width = (area.width as usize).saturating_sub(right_text.len() + 2);
    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", truncate_string(msg, left_width)),
        None => format!(" Updated {} ", app.store_age()),
    };

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            format!("  mdshelf {}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("↑/↓ j/k", "Move selection / scroll document"),
        help_line("PgUp/PgDn", "Move by a page"),
        help_line("Enter", "Open document"),
        help_line("Tab", "Switch focus (list ↔ document)"),
        help_line("Esc", "Go back / clear search"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("/", "Search by name"),
        help_line("u", "Sync documents from the server"),
        help_line("r", "Reload the list from the local store"),
        help_line("d", "Delete the selected document"),
        help_line("s", "Change the server URL"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_settings_overlay(frame: &mut Frame, app: &App) {
    let height = if app.settings_error.is_some() { 9 } else { 7 };
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let field_width = 50;
    let visible: String = {
        // Keep the tail of long URLs visible while typing
        let count = app.settings_input.chars().count();
        app.settings_input
            .chars()
            .skip(count.saturating_sub(field_width - 1))
            .collect()
    };

    let mut lines = vec![
        Line::from(Span::styled(" Server URL", styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [", styles::muted_style()),
            Span::styled(
                format!("{:<width$}", format!("{}▌", visible), width = field_width),
                styles::selected_style(),
            ),
            Span::styled("]", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [Enter]", styles::help_key_style()),
            Span::styled(" confirm  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    if let Some(ref error) = app.settings_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    let block = Block::default()
        .title(" Settings ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let name = app.pending_delete.as_deref().unwrap_or_default();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" Are you sure you want to delete {}?", documents::list_label(name)),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Delete ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
