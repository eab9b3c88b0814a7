//! Terminal presentation host for the faveicon engine
//!
//! - `scene` - Retained layer tree implementing `LayerHost`
//! - `timing` - Progress, interpolation and keyframe sampling
//! - `widgets` - Icon and status bar rendering
//! - `app` - Preview state driving one icon
//!
//! # Usage
//!
//! ```ignore
//! use faveicon_tui::{PreviewApp, widgets::IconWidget};
//!
//! let mut app = PreviewApp::new(config)?;
//! app.toggle();
//!
//! // In main loop
//! app.tick(started.elapsed().as_secs_f64());
//! terminal.draw(|frame| IconWidget::render(frame, frame.area(), &app.scene))?;
//! ```

pub mod app;
pub mod event;
pub mod scene;
pub mod theme;
pub mod timing;
pub mod widgets;

pub use app::PreviewApp;
pub use scene::{Glyph, Scene};
