pub mod color;
pub mod completion;
pub mod config;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod host;
pub mod icon;
pub mod tween;

pub use color::Rgba;
pub use completion::{completion_pair, Completer, Completion, CompletionState};
pub use config::AppConfig;
pub use easing::{extended_elastic_ease_out, EasingParameters};
pub use error::{Error, Result};
pub use geometry::{Point, Rect, Size};
pub use host::{FadeAnimation, KeyframeAnimation, LayerHost, LayerId, SCALE_KEY_PATH};
pub use icon::{Activation, ActivationState, FaveIcon, IconVisualState};
pub use tween::{validate_duration, TweenCache, TweenSequence, MAX_DURATION_SECS};
