//! Visibility indicator — ●/○/◐ with color mapping.

use ratatui::style::Style;
use ratatui::text::Span;

use crate::theme;

/// Dot for a module's mirror visibility. A request in flight wins over
/// the current flag.
pub fn visibility_span(visible: bool, pending: bool) -> Span<'static> {
    let (symbol, color) = if pending {
        ("◐", theme::ELECTRIC_YELLOW)
    } else if visible {
        ("●", theme::SUCCESS_GREEN)
    } else {
        ("○", theme::BORDER_GRAY)
    };
    Span::styled(symbol, Style::default().fg(color))
}

/// `[on ]` / `[off]` switch label.
pub fn switch_span(on: bool) -> Span<'static> {
    if on {
        Span::styled("[on ]", Style::default().fg(theme::SUCCESS_GREEN))
    } else {
        Span::styled("[off]", Style::default().fg(theme::BORDER_GRAY))
    }
}
