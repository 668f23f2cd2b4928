//! User-facing collaborators: the log panel, marker popups and icon assets

pub mod icons;
pub mod log_panel;
pub mod popup;

pub use icons::{IconKind, IconSet};
pub use log_panel::{LogLine, LogPanel, LogSink};
pub use popup::{ActionLink, PopupContent};
