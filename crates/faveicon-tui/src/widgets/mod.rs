mod icon;
mod status_bar;

pub use icon::IconWidget;
pub use status_bar::StatusBarWidget;
