//! Screen implementations. Each screen is a top-level Component.

pub mod dashboard;
pub mod devices;
pub mod live;
pub mod settings;
pub mod topology;
pub mod vlans;

use crate::component::Component;
use crate::screen::ScreenId;

pub use settings::SettingsInfo;

/// Per-run knobs the screens are built with.
#[derive(Debug, Clone)]
pub struct ScreenOptions {
    pub pulse_probability: f64,
    /// Seeds the topology pulse and quick-add generators.
    pub seed: Option<u64>,
    pub settings: SettingsInfo,
}

/// Create screen components for the tab bar.
pub fn create_screens(opts: ScreenOptions) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (ScreenId::Devices, Box::new(devices::DevicesScreen::new())),
        (ScreenId::Vlans, Box::new(vlans::VlansScreen::new())),
        (
            ScreenId::Topology,
            Box::new(topology::TopologyScreen::new(opts.pulse_probability, opts.seed)),
        ),
        (ScreenId::Live, Box::new(live::LiveScreen::new(opts.seed))),
        (
            ScreenId::Settings,
            Box::new(settings::SettingsScreen::new(opts.settings)),
        ),
    ]
}
