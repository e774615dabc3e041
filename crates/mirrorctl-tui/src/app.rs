//! Application core — event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use mirrorctl_core::{BrightnessControl, Mirror, RefreshStatus, SystemAction};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// How long a toast stays up.
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Below this width the tab bar uses short labels.
const NARROW_WIDTH: u16 = 60;

/// Reachability as the TUI sees it, derived from the last refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Unreachable,
}

impl ConnectionStatus {
    fn from_refresh(status: &RefreshStatus) -> Self {
        if status.last_error.is_some() {
            Self::Unreachable
        } else if status.last_refresh.is_some() {
            Self::Connected
        } else {
            Self::Connecting
        }
    }
}

/// Top-level application state and event loop.
pub struct App {
    mirror: Mirror,
    /// Created when the loop starts, flushed on shutdown.
    brightness: Option<BrightnessControl>,
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    connection_status: ConnectionStatus,
    /// Last refresh failure, shown as a banner until a refresh succeeds.
    error_banner: Option<String>,
    help_visible: bool,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    terminal_size: (u16, u16),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancels the data bridge task.
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(mirror: Mirror) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            mirror,
            brightness: None,
            active_screen: ScreenId::default(),
            previous_screen: None,
            screens,
            running: true,
            connection_status: ConnectionStatus::default(),
            error_banner: None,
            help_visible: false,
            pending_confirm: None,
            notification: None,
            terminal_size: (0, 0),
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Start the data bridge and the first fetch.
    fn start_data(&mut self) {
        let brightness = BrightnessControl::new(&self.mirror);
        let watch = brightness.subscribe();
        self.brightness = Some(brightness);

        let mirror = self.mirror.clone();
        let tx = self.action_tx.clone();
        let cancel = self.data_cancel.clone();
        tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(mirror, watch, tx, cancel).await;
        });

        self.refresh(false);
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        self.init_screens()?;
        self.start_data();

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.data_cancel.cancel();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Send any brightness change still waiting on the debounce window.
    pub async fn shutdown(&mut self) {
        self.data_cancel.cancel();
        if let Some(brightness) = self.brightness.take() {
            brightness.flush().await;
        }
    }

    /// Map a key event to an action. Dialogs first, then global keys,
    /// then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => {
                return Ok(Some(Action::Quit));
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::RefreshNow)),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let screen = c
                    .to_digit(10)
                    .and_then(|n| u8::try_from(n).ok())
                    .and_then(ScreenId::from_number);
                if let Some(screen) = screen {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                return Ok(Some(if self.notification.is_some() {
                    Action::DismissNotification
                } else {
                    Action::GoBack
                }));
            }
            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Apply one action to app state and propagate it to the screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(w, h) => self.terminal_size = (*w, *h),

            Action::Render => {}

            Action::Tick => {
                if let Some((_, shown)) = &self.notification {
                    if shown.elapsed() > TOAST_TTL {
                        self.notification = None;
                    }
                }
            }

            Action::SwitchScreen(target) => self.switch_screen(*target),

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.switch_screen(prev);
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::StatusUpdated(status) => {
                self.connection_status = ConnectionStatus::from_refresh(status);
                self.error_banner.clone_from(&status.last_error);
                self.broadcast(action)?;
            }

            // Data updates go to ALL screens so they stay in sync
            Action::AppsUpdated(_)
            | Action::PendingUpdated(_)
            | Action::BrightnessUpdated(_)
            | Action::SystemInfoUpdated(_) => self.broadcast(action)?,

            // ── Mirror commands ───────────────────────────────────────
            Action::RefreshNow => self.refresh(true),

            Action::ToggleMirror(id) => {
                let id = id.clone();
                self.spawn_task(move |mirror| async move {
                    match mirror.toggle_mirror_visibility(&id).await {
                        Ok(app) => Some(Notification::success(if app.is_visible_on_mirror {
                            format!("{} shown on the mirror", app.display_name())
                        } else {
                            format!("{} hidden from the mirror", app.display_name())
                        })),
                        Err(e) => {
                            warn!(module = %id, error = %e, "visibility toggle failed");
                            Some(Notification::error(e.to_string()))
                        }
                    }
                });
            }

            Action::ToggleDashboard(id) => {
                let id = id.clone();
                self.spawn_task(move |mirror| async move {
                    match mirror.toggle_dashboard_visibility(&id).await {
                        Ok(app) if app.is_hidden_from_dashboard => Some(Notification::info(format!(
                            "{} removed from the dashboard",
                            app.display_name()
                        ))),
                        Ok(_) => None,
                        Err(e) => Some(Notification::error(e.to_string())),
                    }
                });
            }

            Action::StepBrightness(steps) => {
                if let Some(ref brightness) = self.brightness {
                    let value = brightness.step(*steps);
                    debug!(brightness = value, "brightness stepped");
                }
            }

            Action::RequestSystem(system) => {
                if system.is_destructive() {
                    self.action_tx
                        .send(Action::ShowConfirm(ConfirmAction::System(*system)))?;
                } else {
                    self.run_system_action(*system);
                }
            }

            // ── Confirm dialog ────────────────────────────────────────
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(*confirm),

            Action::ConfirmYes => {
                if let Some(ConfirmAction::System(system)) = self.pending_confirm.take() {
                    self.run_system_action(system);
                }
            }

            Action::ConfirmNo => self.pending_confirm = None,

            // ── Notifications ─────────────────────────────────────────
            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),

            Action::DismissNotification => self.notification = None,
        }

        Ok(())
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Mirror tasks ──────────────────────────────────────────────

    /// Run `task` against the mirror in the background. A returned
    /// notification is shown as a toast.
    fn spawn_task<F, Fut>(&self, task: F)
    where
        F: FnOnce(Mirror) -> Fut + Send + 'static,
        Fut: Future<Output = Option<Notification>> + Send + 'static,
    {
        let mirror = self.mirror.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Some(notification) = task(mirror).await {
                let _ = tx.send(Action::Notify(notification));
            }
        });
    }

    /// Re-fetch modules and system information.
    ///
    /// Failures land in the refresh status and show as the error
    /// banner; `announce` adds a toast for manual refreshes.
    fn refresh(&self, announce: bool) {
        let tx = self.action_tx.clone();
        self.spawn_task(move |mirror| async move {
            let outcome = match mirror.refresh_modules().await {
                Ok(count) => {
                    announce.then(|| Notification::success(format!("Loaded {count} modules")))
                }
                Err(e) => {
                    warn!(error = %e, "module refresh failed");
                    announce.then(|| Notification::error(e.to_string()))
                }
            };

            match mirror.system_info().await {
                Ok(info) => {
                    let _ = tx.send(Action::SystemInfoUpdated(info));
                }
                Err(e) => debug!(error = %e, "system info unavailable"),
            }

            outcome
        });
    }

    fn run_system_action(&self, system: SystemAction) {
        self.spawn_task(move |mirror| async move {
            match mirror.run_system_action(system).await {
                Ok(()) => Some(Notification::success(format!("{} sent", system.title()))),
                Err(e) => {
                    warn!(action = %system, error = %e, "system action failed");
                    Some(Notification::error(e.to_string()))
                }
            }
        });
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let banner_height = u16::from(self.error_banner.is_some());
        let layout = Layout::vertical([
            Constraint::Length(banner_height), // error banner
            Constraint::Min(1),                // screen content
            Constraint::Length(1),             // tab bar
            Constraint::Length(1),             // status bar
        ])
        .split(area);

        if let Some(ref err) = self.error_banner {
            let banner = Paragraph::new(format!(" ✗ {err} · press r to retry"))
                .style(theme::error_banner());
            frame.render_widget(banner, layout[0]);
        }

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }

        self.render_tab_bar(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }

        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }

        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let narrow = self.terminal_size.0 < NARROW_WIDTH;
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                let label = if narrow { id.label_short() } else { id.label() };
                Line::from(Span::styled(format!(" {} {label} ", id.number()), style))
            })
            .collect();

        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = match self.connection_status {
            ConnectionStatus::Connected => {
                Span::styled("● connected", Style::default().fg(theme::SUCCESS_GREEN))
            }
            ConnectionStatus::Unreachable => {
                Span::styled("○ unreachable", Style::default().fg(theme::ERROR_RED))
            }
            ConnectionStatus::Connecting => {
                Span::styled("◐ connecting", Style::default().fg(theme::ELECTRIC_YELLOW))
            }
        };

        let host = self.mirror.config().url.host_str().unwrap_or("mirror").to_owned();

        let line = Line::from(vec![
            Span::raw(" "),
            indicator,
            Span::styled(format!(" {host}"), theme::key_hint()),
            Span::styled(" │ r refresh  ? help  q quit", theme::key_hint()),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = centered(area, 52, 24);
        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(format!("  {title}"), Style::default().fg(theme::NEON_CYAN)))
        };
        let key = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("Global"),
            key("1-3", "Jump to screen"),
            key("Tab", "Next screen"),
            key("r", "Refresh from the mirror"),
            key("Esc", "Back / dismiss toast"),
            key("?", "This help"),
            key("q", "Quit"),
            Line::from(""),
            section("Dashboard"),
            key("h/j/k/l", "Move between cards"),
            key("Enter", "Show / hide on mirror"),
            Line::from(""),
            section("Modules"),
            key("j/k", "Move up/down"),
            key("m", "Toggle on mirror"),
            key("d", "Toggle on dashboard"),
            Line::from(""),
            section("System"),
            key("←/→", "Brightness -/+ 5"),
            key("j/k Enter", "Pick and run an action"),
            Line::from(""),
            Line::from(Span::styled("                 Esc or ? to close", theme::key_hint())),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let dialog_area = centered(area, 56, 6);
        frame.render_widget(Clear, dialog_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog_area,
        );

        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_YELLOW));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!(" {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
    }

    /// Render a notification toast in the bottom-right corner.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above the tab and status bars
        let toast_area = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}
