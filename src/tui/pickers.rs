//! Cascading selection pickers: region -> instance -> database name.
//!
//! Changing an earlier picker rebuilds the later ones and resets their
//! selection, mirroring the chained dropdowns of the portal web page.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::models::RegionMap;

use super::app::Pane;

/// One selectable row.
#[derive(Clone)]
pub struct PickerItem {
    pub value: String,
    /// Dimmed annotation shown after the value (region location).
    pub subtext: Option<String>,
}

/// One picker column: items plus the current selection.
#[derive(Default)]
pub struct PickerState {
    pub items: Vec<PickerItem>,
    pub selected: usize,
}

impl PickerState {
    fn set_items(&mut self, items: Vec<PickerItem>) {
        self.items = items;
        self.selected = 0;
    }

    /// Move the selection, returning whether it changed.
    fn step(&mut self, delta: i32) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let last = self.items.len() - 1;
        let next = if delta < 0 {
            self.selected.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.selected + delta as usize).min(last)
        };
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.items.get(self.selected).map(|item| item.value.as_str())
    }
}

/// The three chained pickers and the database map backing them.
#[derive(Default)]
pub struct Pickers {
    databases: RegionMap,
    pub region: PickerState,
    pub instance: PickerState,
    pub database: PickerState,
    /// Whether the database list has arrived yet.
    pub loading: bool,
}

impl Pickers {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Replace the backing data and rebuild all three pickers.
    pub fn set_databases(&mut self, databases: RegionMap) {
        self.loading = false;
        self.databases = databases;
        let items = self
            .databases
            .iter()
            .map(|(name, region)| PickerItem {
                value: name.clone(),
                subtext: Some(region.location.clone()),
            })
            .collect();
        self.region.set_items(items);
        self.rebuild_instances();
    }

    /// Move the selection within one pane. Returns whether it changed
    /// (which for the region/instance panes implies a cascade rebuild).
    pub fn move_selection(&mut self, pane: Pane, delta: i32) -> bool {
        let picker = match pane {
            Pane::Regions => &mut self.region,
            Pane::Instances => &mut self.instance,
            Pane::Databases => &mut self.database,
        };
        if !picker.step(delta) {
            return false;
        }
        match pane {
            Pane::Regions => self.rebuild_instances(),
            Pane::Instances => self.rebuild_databases(),
            Pane::Databases => {}
        }
        true
    }

    /// The full (region, instance, database) selection, if every level has
    /// one.
    pub fn selection(&self) -> Option<(String, String, String)> {
        Some((
            self.region.selected_value()?.to_string(),
            self.instance.selected_value()?.to_string(),
            self.database.selected_value()?.to_string(),
        ))
    }

    fn rebuild_instances(&mut self) {
        let items = self
            .region
            .selected_value()
            .and_then(|region| self.databases.get(region))
            .map(|region| {
                region
                    .instances
                    .keys()
                    .map(|id| PickerItem {
                        value: id.clone(),
                        subtext: None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.instance.set_items(items);
        self.rebuild_databases();
    }

    fn rebuild_databases(&mut self) {
        let items = self
            .region
            .selected_value()
            .and_then(|region| self.databases.get(region))
            .zip(self.instance.selected_value())
            .and_then(|(region, instance)| region.instances.get(instance))
            .map(|names| {
                let mut names = names.clone();
                names.sort();
                names
                    .into_iter()
                    .map(|name| PickerItem {
                        value: name,
                        subtext: None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.database.set_items(items);
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render one picker column into the given area.
pub fn render(area: Rect, buf: &mut Buffer, state: &PickerState, title: &str, focused: bool, loading: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_type = if focused {
        BorderType::Double
    } else {
        BorderType::Plain
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style);

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if loading && state.items.is_empty() {
        let line = Line::from(Span::styled(
            " Loading...",
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(line).render(Rect::new(inner.x, inner.y, inner.width, 1), buf);
        return;
    }

    let available_height = inner.height as usize;
    let scroll_offset = compute_scroll_offset(state.selected, available_height, state.items.len());

    for (row_idx, item_idx) in (scroll_offset..state.items.len())
        .take(available_height)
        .enumerate()
    {
        let item = &state.items[item_idx];
        let selected = item_idx == state.selected;
        let row_area = Rect::new(inner.x, inner.y + row_idx as u16, inner.width, 1);
        render_item(buf, row_area, item, selected, focused);
    }
}

/// Simple scroll offset: keep selected item visible.
fn compute_scroll_offset(selected: usize, height: usize, total: usize) -> usize {
    if total <= height || selected < height {
        return 0;
    }
    let max_offset = total.saturating_sub(height);
    selected.saturating_sub(height - 1).min(max_offset)
}

fn render_item(buf: &mut Buffer, area: Rect, item: &PickerItem, selected: bool, pane_focused: bool) {
    let value_style = if selected && pane_focused {
        Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let marker = if selected { ">" } else { " " };
    let mut spans = vec![Span::styled(format!("{} {}", marker, item.value), value_style)];
    if let Some(subtext) = &item.subtext {
        spans.push(Span::styled(
            format!("  {}", subtext),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Paragraph::new(Line::from(spans)).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegionDatabases;
    use std::collections::BTreeMap;

    fn sample_map() -> RegionMap {
        let mut instances_eu = BTreeMap::new();
        instances_eu.insert("orders-db".to_string(), vec!["orders".to_string(), "billing".to_string()]);
        instances_eu.insert("users-db".to_string(), vec!["users".to_string()]);

        let mut instances_us = BTreeMap::new();
        instances_us.insert("logs-db".to_string(), vec!["logs".to_string()]);

        let mut map = RegionMap::new();
        map.insert(
            "eu-west-1".to_string(),
            RegionDatabases {
                location: "EU (Ireland)".to_string(),
                instances: instances_eu,
            },
        );
        map.insert(
            "us-east-1".to_string(),
            RegionDatabases {
                location: "US East (N. Virginia)".to_string(),
                instances: instances_us,
            },
        );
        map
    }

    #[test]
    fn test_set_databases_builds_cascade() {
        let mut pickers = Pickers::new();
        pickers.set_databases(sample_map());

        assert_eq!(pickers.region.selected_value(), Some("eu-west-1"));
        assert_eq!(pickers.instance.selected_value(), Some("orders-db"));
        // Database names come back sorted.
        assert_eq!(pickers.database.selected_value(), Some("billing"));
    }

    #[test]
    fn test_region_change_rebuilds_later_pickers() {
        let mut pickers = Pickers::new();
        pickers.set_databases(sample_map());
        pickers.move_selection(Pane::Databases, 1);
        assert_eq!(pickers.database.selected_value(), Some("orders"));

        assert!(pickers.move_selection(Pane::Regions, 1));
        assert_eq!(pickers.region.selected_value(), Some("us-east-1"));
        assert_eq!(pickers.instance.selected_value(), Some("logs-db"));
        // Later selections reset to the top.
        assert_eq!(pickers.database.selected_value(), Some("logs"));
    }

    #[test]
    fn test_instance_change_rebuilds_databases() {
        let mut pickers = Pickers::new();
        pickers.set_databases(sample_map());

        assert!(pickers.move_selection(Pane::Instances, 1));
        assert_eq!(pickers.instance.selected_value(), Some("users-db"));
        assert_eq!(pickers.database.selected_value(), Some("users"));
    }

    #[test]
    fn test_selection_clamped_at_bounds() {
        let mut pickers = Pickers::new();
        pickers.set_databases(sample_map());

        assert!(!pickers.move_selection(Pane::Regions, -1));
        assert!(pickers.move_selection(Pane::Regions, 1));
        assert!(!pickers.move_selection(Pane::Regions, 1));
    }

    #[test]
    fn test_selection_requires_all_levels() {
        let mut pickers = Pickers::new();
        assert!(pickers.selection().is_none());

        pickers.set_databases(sample_map());
        let (region, db_id, db_name) = pickers.selection().unwrap();
        assert_eq!(region, "eu-west-1");
        assert_eq!(db_id, "orders-db");
        assert_eq!(db_name, "billing");
    }
}
