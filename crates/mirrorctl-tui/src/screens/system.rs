//! System screen — brightness slider, system information, and device actions.

use std::collections::HashSet;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use mirrorctl_core::brightness::{BRIGHTNESS_MAX, BRIGHTNESS_MIN};
use mirrorctl_core::{BrightnessState, PendingOp, SystemAction, SystemInfo};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct SystemScreen {
    focused: bool,
    brightness: BrightnessState,
    brightness_pending: bool,
    info: Option<SystemInfo>,
    running: HashSet<SystemAction>,
    selected: usize,
}

impl SystemScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            brightness: BrightnessState {
                displayed: mirrorctl_core::mirror::DEFAULT_BRIGHTNESS,
                confirmed: mirrorctl_core::mirror::DEFAULT_BRIGHTNESS,
                last_error: None,
            },
            brightness_pending: false,
            info: None,
            running: HashSet::new(),
            selected: 0,
        }
    }

    fn selected_action(&self) -> Option<SystemAction> {
        SystemAction::GRID.get(self.selected).copied()
    }

    fn block(&self, title: &str) -> Block<'static> {
        Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            })
    }

    fn render_brightness(&self, frame: &mut Frame, area: Rect) {
        let BrightnessState {
            displayed,
            confirmed,
            ref last_error,
        } = self.brightness;

        let status = if let Some(err) = last_error {
            Span::styled(format!("  ✗ {err}"), Style::default().fg(theme::ERROR_RED))
        } else if self.brightness_pending || displayed != confirmed {
            Span::styled("  sending…", Style::default().fg(theme::ELECTRIC_YELLOW))
        } else {
            Span::styled("  ✓ applied", Style::default().fg(theme::SUCCESS_GREEN))
        };

        let block = self.block("Brightness");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);

        let percent = u16::try_from(displayed.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX)).unwrap_or(0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme::ELECTRIC_PURPLE).bg(theme::BG_HIGHLIGHT))
            .percent(percent)
            .label(format!("{displayed}%"));
        frame.render_widget(gauge, rows[0]);

        let hints = Line::from(vec![
            Span::styled("  ←/→ ", theme::key_hint_key()),
            Span::styled("adjust", theme::key_hint()),
            status,
        ]);
        frame.render_widget(Paragraph::new(hints), rows[1]);
    }

    fn render_info(&self, frame: &mut Frame, area: Rect) {
        let block = self.block("System Information");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = |text: &'static str| Span::styled(text, Style::default().fg(theme::DIM_WHITE));
        let value = |text: String| Span::styled(text, Style::default().fg(theme::NEON_CYAN));

        let lines = match self.info {
            None => vec![Line::from(Span::styled("  Loading…", theme::key_hint()))],
            Some(ref info) => {
                let status = if info.success {
                    Span::styled("Online", Style::default().fg(theme::SUCCESS_GREEN))
                } else {
                    Span::styled("Unavailable", Style::default().fg(theme::ERROR_RED))
                };
                vec![
                    Line::from(vec![label("  Status         "), status]),
                    Line::from(vec![label("  Platform       "), value(info.platform.clone())]),
                    Line::from(vec![label("  Node           "), value(info.node_version.clone())]),
                    Line::from(vec![
                        label("  Brightness     "),
                        value(format!("{}%", info.brightness)),
                    ]),
                    Line::from(vec![
                        label("  Configured     "),
                        value(
                            info.configured_modules
                                .map_or_else(|| "─".into(), |n| format!("{n} modules")),
                        ),
                    ]),
                ]
            }
        };

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_actions(&self, frame: &mut Frame, area: Rect) {
        let block = self.block("Actions");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        for (i, action) in SystemAction::GRID.iter().enumerate() {
            let is_selected = i == self.selected;
            let prefix = if is_selected { "▸ " } else { "  " };
            let title_style = if is_selected {
                theme::table_selected()
            } else {
                Style::default().fg(theme::NEON_CYAN).add_modifier(Modifier::BOLD)
            };
            let button = if self.running.contains(action) {
                Span::styled("  ◐ running…", Style::default().fg(theme::ELECTRIC_YELLOW))
            } else {
                let color = if action.is_destructive() {
                    theme::CORAL
                } else {
                    theme::SUCCESS_GREEN
                };
                Span::styled(format!("  [{}]", action.action_label()), Style::default().fg(color))
            };

            lines.push(Line::from(vec![
                Span::styled(format!("{prefix}{}", action.title()), title_style),
                button,
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", action.description()),
                theme::key_hint(),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("run", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for SystemScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let last = SystemAction::GRID.len() - 1;
        match key.code {
            KeyCode::Left | KeyCode::Char('h' | '-') => return Ok(Some(Action::StepBrightness(-1))),
            KeyCode::Right | KeyCode::Char('l' | '+') => return Ok(Some(Action::StepBrightness(1))),
            KeyCode::Char('j') | KeyCode::Down => self.selected = (self.selected + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Enter => return Ok(self.selected_action().map(Action::RequestSystem)),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::BrightnessUpdated(state) => self.brightness = state.clone(),
            Action::SystemInfoUpdated(info) => self.info = Some(info.clone()),
            Action::PendingUpdated(ops) => {
                self.brightness_pending = ops.contains(&PendingOp::Brightness);
                self.running = ops
                    .iter()
                    .filter_map(|op| match op {
                        PendingOp::System(system) => Some(*system),
                        _ => None,
                    })
                    .collect();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(4), // brightness
            Constraint::Length(7), // info
            Constraint::Min(9),    // actions
        ])
        .split(area);

        self.render_brightness(frame, layout[0]);
        self.render_info(frame, layout[1]);
        self.render_actions(frame, layout[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
