//! Screen identifiers, in tab-bar order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard,
    Devices,
    Vlans,
    Topology,
    Live,
    Settings,
}

impl ScreenId {
    pub const ALL: [ScreenId; 6] = [
        Self::Dashboard,
        Self::Devices,
        Self::Vlans,
        Self::Topology,
        Self::Live,
        Self::Settings,
    ];

    /// Number key (1-6).
    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Devices => 2,
            Self::Vlans => 3,
            Self::Topology => 4,
            Self::Live => 5,
            Self::Settings => 6,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Devices => "Devices",
            Self::Vlans => "VLANs",
            Self::Topology => "Topology",
            Self::Live => "Live",
            Self::Settings => "Settings",
        }
    }

    /// Compact label for narrow terminals (< 80 cols).
    pub fn label_short(self) -> &'static str {
        match self {
            Self::Dashboard => "Dash",
            Self::Devices => "Dev",
            Self::Vlans => "VLAN",
            Self::Topology => "Topo",
            Self::Live => "Live",
            Self::Settings => "Set",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn number_keys_round_trip() {
        for screen in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(screen.number()), Some(screen));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(7), None);
    }

    #[test]
    fn tab_order_wraps() {
        assert_eq!(ScreenId::Settings.next(), ScreenId::Dashboard);
        assert_eq!(ScreenId::Dashboard.prev(), ScreenId::Settings);
        assert_eq!(ScreenId::Vlans.next(), ScreenId::Topology);
    }
}
