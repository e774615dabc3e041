//! Screen implementations. Each screen is a top-level Component.

pub mod dashboard;
pub mod modules;
pub mod system;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create one component per tab-bar screen.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Dashboard, boxed(dashboard::DashboardScreen::new())),
        (ScreenId::Modules, boxed(modules::ModulesScreen::new())),
        (ScreenId::System, boxed(system::SystemScreen::new())),
    ]
}

fn boxed(screen: impl Component + 'static) -> Box<dyn Component> {
    Box::new(screen)
}
