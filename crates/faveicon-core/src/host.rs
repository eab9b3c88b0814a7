//! The presentation host the icon draws through.
//!
//! The icon never touches pixels. It asks a [`LayerHost`] to build and
//! rearrange a small layer tree, to play keyframes on a named property and to
//! run fades whose outcome comes back through a [`Completer`].

use std::sync::Arc;

use crate::color::Rgba;
use crate::completion::Completer;
use crate::geometry::Rect;

/// Key path for the uniform scale transform
pub const SCALE_KEY_PATH: &str = "transform.scale";

/// Opaque handle to a layer owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Keyframes for one property, evenly spaced over `duration`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeAnimation {
    pub key_path: &'static str,
    pub values: Arc<[f64]>,
    /// Seconds
    pub duration: f64,
    /// Absolute host media time at which playback starts
    pub begin_time: f64,
}

impl KeyframeAnimation {
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.begin_time + self.duration
    }

    /// Whether the animation still has time left at `now`
    #[inline]
    pub fn is_running_at(&self, now: f64) -> bool {
        now < self.end_time()
    }
}

/// Opacity animation towards `to_opacity`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeAnimation {
    pub to_opacity: f64,
    pub duration: f64,
    /// Seconds to wait before starting, relative to the request
    pub delay: f64,
}

pub trait LayerHost {
    /// Image handle type; owned by the caller, cloned into layers
    type Image: Clone;

    /// Current media time in seconds
    fn now(&self) -> f64;

    /// Bounds of an existing layer
    fn bounds(&self, layer: LayerId) -> Rect;

    /// A plain layer used as the icon's own view
    fn create_container(&mut self, frame: Rect) -> LayerId;

    /// A layer that displays `image` within `bounds`
    fn create_image_layer(&mut self, image: &Self::Image, bounds: Rect) -> LayerId;

    /// A shape layer filling `path` with `fill`, clipped by the alpha of `mask`
    fn create_masked_shape(&mut self, path: Rect, fill: Rgba, mask: LayerId) -> LayerId;

    fn add_sublayer(&mut self, parent: LayerId, child: LayerId);

    /// Detach `layer` from its parent and release it
    fn remove_layer(&mut self, layer: LayerId);

    /// Change a shape's fill without any implicit animation
    fn set_fill_color(&mut self, shape: LayerId, fill: Rgba);

    fn set_opacity(&mut self, layer: LayerId, opacity: f64);

    fn add_keyframe_animation(&mut self, layer: LayerId, animation: KeyframeAnimation);

    /// Start a fade. The host must eventually resolve `completer`, or drop it
    /// if the fade is abandoned.
    fn animate_fade(&mut self, layer: LayerId, fade: FadeAnimation, completer: Completer);
}
