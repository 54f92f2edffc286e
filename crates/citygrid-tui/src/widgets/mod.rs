//! Small rendering helpers shared by several screens.

pub mod status_indicator;
pub mod sub_tabs;
