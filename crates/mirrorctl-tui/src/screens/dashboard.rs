//! Dashboard screen — one card per module the user keeps on the dashboard.
//!
//! Cards are laid out three to a row. Enter or space flips the module's
//! visibility on the mirror; the card shows a loading marker until the
//! mirror answers.

use std::collections::HashSet;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use mirrorctl_core::{AppState, PendingOp, RefreshStatus};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator::visibility_span;
use crate::widgets::time_fmt::fmt_ago;

const COLUMNS: usize = 3;
const CARD_HEIGHT: u16 = 5;

pub struct DashboardScreen {
    focused: bool,
    /// Records not hidden from the dashboard, in fetch order.
    cards: Vec<AppState>,
    /// Module ids with a visibility request in flight.
    pending: HashSet<String>,
    status: RefreshStatus,
    selected: usize,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            cards: Vec::new(),
            pending: HashSet::new(),
            status: RefreshStatus::default(),
            selected: 0,
        }
    }

    fn set_apps(&mut self, apps: &[AppState]) {
        self.cards = apps
            .iter()
            .filter(|app| !app.is_hidden_from_dashboard)
            .cloned()
            .collect();
        self.selected = self.selected.min(self.cards.len().saturating_sub(1));
    }

    fn move_selection(&mut self, forward: bool, step: usize) {
        if self.cards.is_empty() {
            return;
        }
        let last = self.cards.len() - 1;
        self.selected = if forward {
            self.selected.saturating_add(step).min(last)
        } else {
            self.selected.saturating_sub(step)
        };
    }

    fn selected_card(&self) -> Option<&AppState> {
        self.cards.get(self.selected)
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, app: &AppState, is_selected: bool) {
        let pending = self.pending.contains(&app.id);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if is_selected && self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let state_label = if pending {
            Span::styled(" updating…", Style::default().fg(theme::ELECTRIC_YELLOW))
        } else if app.is_visible_on_mirror {
            Span::styled(" on mirror", Style::default().fg(theme::SUCCESS_GREEN))
        } else {
            Span::styled(" hidden", Style::default().fg(theme::BORDER_GRAY))
        };

        let name_style = if is_selected {
            theme::table_selected()
        } else {
            Style::default().fg(theme::NEON_CYAN).add_modifier(Modifier::BOLD)
        };

        let mut lines = vec![
            Line::from(Span::styled(app.display_name(), name_style)),
            Line::from(vec![visibility_span(app.is_visible_on_mirror, pending), state_label]),
        ];
        if let Some(ref desc) = app.desc {
            lines.push(Line::from(Span::styled(desc.clone(), theme::key_hint())));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => self.move_selection(true, 1),
            KeyCode::Char('h') | KeyCode::Left => self.move_selection(false, 1),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(true, COLUMNS),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(false, COLUMNS),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return Ok(self.selected_card().map(|app| Action::ToggleMirror(app.id.clone())));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AppsUpdated(apps) => self.set_apps(apps),
            Action::PendingUpdated(ops) => {
                self.pending = ops
                    .iter()
                    .filter_map(|op| match op {
                        PendingOp::Module(id) => Some(id.clone()),
                        _ => None,
                    })
                    .collect();
            }
            Action::StatusUpdated(status) => self.status = status.clone(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let refreshed = self
            .status
            .last_refresh
            .map_or_else(
                || "never refreshed".to_owned(),
                |t| format!("refreshed {}", fmt_ago(t, chrono::Utc::now())),
            );
        let block = Block::default()
            .title(format!(" Dashboard ({}) ", self.cards.len()))
            .title(Line::from(format!(" {refreshed} ")).alignment(Alignment::Right))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let outer = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // cards
            Constraint::Length(1), // hints
        ])
        .split(outer);
        let inner = layout[0];

        let hints = Line::from(vec![
            Span::styled("  h/j/k/l ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("show/hide on mirror", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);

        if self.cards.is_empty() {
            let text = Paragraph::new("No modules yet. Press r to fetch them from the mirror.")
                .alignment(Alignment::Center)
                .style(theme::table_row());
            let y = inner.y + inner.height.saturating_sub(1) / 2;
            frame.render_widget(text, Rect::new(inner.x, y, inner.width, 1.min(inner.height)));
            return;
        }

        // Keep the selected card's row on screen.
        let visible_rows = usize::from((inner.height / CARD_HEIGHT).max(1));
        let selected_row = self.selected / COLUMNS;
        let first_row = selected_row.saturating_sub(visible_rows - 1);

        let rows =
            Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows]).split(inner);
        for (row_idx, row_area) in rows.iter().enumerate() {
            let row = first_row + row_idx;
            let cols = Layout::horizontal([Constraint::Ratio(1, 3); COLUMNS]).split(*row_area);
            for (col_idx, card_area) in cols.iter().enumerate() {
                let idx = row * COLUMNS + col_idx;
                if let Some(app) = self.cards.get(idx) {
                    self.render_card(frame, *card_area, app, idx == self.selected);
                }
            }
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
