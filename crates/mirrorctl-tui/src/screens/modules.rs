//! Modules screen — every active module with its mirror and dashboard switches.

use std::collections::HashSet;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use mirrorctl_core::{AppState, PendingOp};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator::{switch_span, visibility_span};

const PAGE: usize = 10;

pub struct ModulesScreen {
    focused: bool,
    apps: Vec<AppState>,
    pending: HashSet<String>,
    table_state: TableState,
}

impl ModulesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            apps: Vec::new(),
            pending: HashSet::new(),
            table_state: TableState::default().with_selected(Some(0)),
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        let clamped = idx.min(self.apps.len().saturating_sub(1));
        self.table_state.select(Some(clamped));
    }

    fn move_down(&mut self, step: usize) {
        self.select(self.selected_index().saturating_add(step));
    }

    fn move_up(&mut self, step: usize) {
        self.select(self.selected_index().saturating_sub(step));
    }

    fn selected_app(&self) -> Option<&AppState> {
        self.apps.get(self.selected_index())
    }
}

impl Component for ModulesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(1),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            KeyCode::PageDown => self.move_down(PAGE),
            KeyCode::PageUp => self.move_up(PAGE),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_up(PAGE);
            }
            KeyCode::Char('m') | KeyCode::Enter => {
                return Ok(self.selected_app().map(|app| Action::ToggleMirror(app.id.clone())));
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_down(PAGE);
            }
            KeyCode::Char('d') => {
                return Ok(self
                    .selected_app()
                    .map(|app| Action::ToggleDashboard(app.id.clone())));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AppsUpdated(apps) => {
                self.apps = apps.as_ref().clone();
                self.select(self.selected_index());
            }
            Action::PendingUpdated(ops) => {
                self.pending = ops
                    .iter()
                    .filter_map(|op| match op {
                        PendingOp::Module(id) => Some(id.clone()),
                        _ => None,
                    })
                    .collect();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let on_mirror = self.apps.iter().filter(|a| a.is_visible_on_mirror).count();
        let block = Block::default()
            .title(format!(" Modules ({on_mirror}/{} on mirror) ", self.apps.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let header = Row::new(vec![
            Cell::from("Module").style(theme::table_header()),
            Cell::from("Identifier").style(theme::table_header()),
            Cell::from("Mirror").style(theme::table_header()),
            Cell::from("Dashboard").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .apps
            .iter()
            .enumerate()
            .map(|(i, app)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                let pending = self.pending.contains(&app.id);

                Row::new(vec![
                    Cell::from(format!("{prefix}{}", app.display_name())).style(
                        Style::default().fg(theme::NEON_CYAN).add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                    ),
                    Cell::from(app.id.clone()).style(Style::default().fg(theme::CORAL)),
                    Cell::from(Line::from(vec![
                        visibility_span(app.is_visible_on_mirror, pending),
                        Span::raw(" "),
                        switch_span(app.is_visible_on_mirror),
                    ])),
                    Cell::from(Line::from(switch_span(!app.is_hidden_from_dashboard))),
                ])
                .style(if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                })
            })
            .collect();

        let widths = [
            Constraint::Min(16),
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("m ", theme::key_hint_key()),
            Span::styled("mirror  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("dashboard", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn apps() -> Arc<Vec<AppState>> {
        Arc::new(
            ["module_0_clock", "module_1_weather", "module_2_newsfeed"]
                .iter()
                .map(|id| AppState {
                    id: (*id).into(),
                    name: (*id).into(),
                    longname: None,
                    desc: None,
                    is_visible_on_mirror: true,
                    is_hidden_from_dashboard: false,
                })
                .collect(),
        )
    }

    fn loaded() -> ModulesScreen {
        let mut screen = ModulesScreen::new();
        screen.update(&Action::AppsUpdated(apps())).expect("update");
        screen
    }

    #[test]
    fn m_and_d_toggle_the_selected_module() {
        let mut screen = loaded();
        screen.handle_key_event(KeyEvent::from(KeyCode::Down)).expect("key");

        let mirror = screen.handle_key_event(KeyEvent::from(KeyCode::Char('m'))).expect("key");
        assert!(matches!(mirror, Some(Action::ToggleMirror(ref id)) if id == "module_1_weather"));

        let dashboard = screen.handle_key_event(KeyEvent::from(KeyCode::Char('d'))).expect("key");
        assert!(matches!(
            dashboard,
            Some(Action::ToggleDashboard(ref id)) if id == "module_1_weather"
        ));
    }

    #[test]
    fn ctrl_d_pages_instead_of_toggling() {
        let mut screen = loaded();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL))
            .expect("key");
        assert!(action.is_none());
        assert_eq!(screen.selected_index(), 2);
    }

    #[test]
    fn selection_stays_in_range() {
        let mut screen = loaded();
        screen.handle_key_event(KeyEvent::from(KeyCode::Char('G'))).expect("key");
        assert_eq!(screen.selected_index(), 2);

        screen
            .update(&Action::AppsUpdated(Arc::new(Vec::new())))
            .expect("update");
        assert_eq!(screen.selected_index(), 0);
        let action = screen.handle_key_event(KeyEvent::from(KeyCode::Char('m'))).expect("key");
        assert!(action.is_none());
    }
}
