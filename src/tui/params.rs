//! Connection-parameters pane with the password validity gauge.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Widget},
};

use crate::models::DbConfig;

/// ASCII spinner frames shown while a fetch is in flight.
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Width reserved for the field-name column.
const NAME_WIDTH: usize = 14;

/// Render the parameters pane.
pub fn render(
    area: Rect,
    buf: &mut Buffer,
    config: Option<&DbConfig>,
    pwd_percent: f64,
    loading: bool,
    spinner_frame: usize,
) {
    let block = Block::default()
        .title(" Connection Parameters ")
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if loading {
        let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
        let line = Line::from(Span::styled(
            format!(" {} Fetching configuration...", spinner),
            Style::default().fg(Color::Yellow),
        ));
        Paragraph::new(line).render(Rect::new(inner.x, inner.y, inner.width, 1), buf);
        return;
    }

    let Some(config) = config else {
        let line = Line::from(Span::styled(
            " Select a database and press Enter",
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(line).render(Rect::new(inner.x, inner.y, inner.width, 1), buf);
        return;
    };

    let mut row = 0u16;
    for (name, value) in config.rows() {
        if row >= inner.height {
            return;
        }
        let display = if name == "rds_password" {
            password_display(&value)
        } else {
            value
        };
        let line = Line::from(vec![
            Span::styled(
                format!(" {:<width$}", name, width = NAME_WIDTH),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(display, Style::default().fg(Color::White)),
        ]);
        Paragraph::new(line).render(Rect::new(inner.x, inner.y + row, inner.width, 1), buf);
        row += 1;
    }

    // Password validity gauge, the progress bar under the password field.
    if row < inner.height {
        let ratio = (pwd_percent / 100.0).clamp(0.0, 1.0);
        let color = if pwd_percent > 50.0 {
            Color::Green
        } else if pwd_percent > 20.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .label(Span::styled(
                format!("password validity {:.0}%", pwd_percent),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ))
            .ratio(ratio);
        gauge.render(Rect::new(inner.x, inner.y + row, inner.width, 1), buf);
    }
}

/// Truncated password for display; an emptied field means the credential
/// expired.
fn password_display(value: &str) -> String {
    if value.is_empty() {
        return "(expired -- fetch again)".to_string();
    }
    const MAX: usize = 48;
    if value.chars().count() > MAX {
        let head: String = value.chars().take(MAX).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_display_truncates() {
        let long = "x".repeat(100);
        let shown = password_display(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), 51);
    }

    #[test]
    fn test_password_display_empty_marks_expired() {
        assert!(password_display("").contains("expired"));
    }
}
