//! GUI module - User interface components

mod app;
mod control_panel;
mod report_renderer;

pub use app::DashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use report_renderer::ReportRenderer;
