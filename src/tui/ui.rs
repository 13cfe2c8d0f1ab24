//! UI rendering for the TUI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::{App, Pane, Screen};
use super::params;
use super::pickers;

/// Session countdown turns red below this many seconds.
const SESSION_WARN_SECS: i64 = 300;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    if let Screen::Farewell { header1, header2 } = &app.screen {
        render_farewell(frame, header1, header2);
        return;
    }

    let area = frame.area();

    // Layout: header (1 line) + pickers + parameters (11 lines) + status bar (1 line)
    let [header_area, pickers_area, params_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut());

    // Three picker columns: region (wide, shows location) + instance + database
    let [regions_area, instances_area, databases_area] = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Percentage(30),
    ])
    .areas(pickers_area);

    pickers::render(
        regions_area,
        frame.buffer_mut(),
        &app.pickers.region,
        "Region",
        app.active_pane == Pane::Regions,
        app.pickers.loading,
    );
    pickers::render(
        instances_area,
        frame.buffer_mut(),
        &app.pickers.instance,
        "DB Instance",
        app.active_pane == Pane::Instances,
        app.pickers.loading,
    );
    pickers::render(
        databases_area,
        frame.buffer_mut(),
        &app.pickers.database,
        "Database",
        app.active_pane == Pane::Databases,
        app.pickers.loading,
    );

    params::render(
        params_area,
        frame.buffer_mut(),
        app.db_config.as_ref(),
        app.pwd_percent,
        app.loading,
        app.spinner_frame,
    );

    render_status(status_area, frame.buffer_mut(), app);
}

/// Render the header bar
fn render_header(area: Rect, buf: &mut Buffer) {
    let title = Span::styled(
        " SARI",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    let subtitle = Span::styled(
        " database access portal",
        Style::default().fg(Color::Gray),
    );

    let header = Paragraph::new(Line::from(vec![title, subtitle]))
        .style(Style::default().bg(Color::DarkGray));
    header.render(area, buf);
}

/// Render the status bar
fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    // If there's a status message, show it prominently.
    if let Some(ref msg) = app.status_message {
        let style = if app.status_is_error {
            Style::default().fg(Color::Red).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).bg(Color::DarkGray)
        };
        let line = Line::from(Span::styled(format!(" {} ", msg), style));
        Paragraph::new(line)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
        return;
    }

    let sep_style = Style::default().fg(Color::Gray);

    let pane = Span::styled(
        format!(" Tab: {} ", app.active_pane.as_str()),
        Style::default().fg(Color::Cyan),
    );
    let hints = Span::styled(
        "Enter: fetch config | r: reload | q: quit",
        Style::default().fg(Color::Gray),
    );

    let mut spans = vec![pane, Span::styled("| ", sep_style), hints];

    // Session countdown, right-aligned.
    if let Some(session) = &app.session {
        let countdown = format!("session {} ", session.format_hms());
        let color = if session.remaining_secs() < SESSION_WARN_SECS {
            Color::Red
        } else {
            Color::Yellow
        };
        let left_w: usize = spans
            .iter()
            .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
            .sum();
        let right_w = UnicodeWidthStr::width(countdown.as_str());
        let padding = (area.width as usize).saturating_sub(left_w + right_w);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(countdown, Style::default().fg(color)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    status.render(area, buf);
}

/// Full-screen farewell: session timeout or nothing to access.
fn render_farewell(frame: &mut Frame, header1: &str, header2: &str) {
    let area = frame.area();

    let [_, center, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Fill(1),
    ])
    .areas(area);

    let lines = vec![
        Line::from(Span::styled(
            header1,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::default(),
        Line::from(Span::styled(header2, Style::default().fg(Color::Gray))).centered(),
        Line::default(),
        Line::from(Span::styled(
            "(press any key to exit)",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];

    Paragraph::new(lines).render(center, frame.buffer_mut());
}
