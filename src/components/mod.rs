pub mod dashboard;
pub mod log_panel;

pub use dashboard::Dashboard;
