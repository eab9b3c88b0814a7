//! The favorite icon: layer setup, activation state machine and layer swaps.
//!
//! # Usage
//!
//! ```ignore
//! use faveicon_core::{Activation, FaveIcon, Rgba};
//!
//! let mut icon = FaveIcon::create(&mut host, view, star, None, Rgba::GRAY)?;
//!
//! // Select with a short delay
//! icon.activate(&mut host, Activation::new(true, red).with_delay(0.1));
//!
//! // Every frame, after the host has advanced its clock
//! icon.poll(&mut host);
//! ```

use tracing::{debug, trace, warn};

use crate::color::Rgba;
use crate::completion::{completion_pair, Completion, CompletionState};
use crate::geometry::Rect;
use crate::host::{FadeAnimation, KeyframeAnimation, LayerHost, LayerId, SCALE_KEY_PATH};
use crate::tween::TweenCache;

/// Icon glyph size relative to the content region
pub const ICON_SIZE_RATIO: f64 = 0.7;

/// Default activation duration in seconds
pub const DEFAULT_DURATION: f64 = 0.5;

/// Progress of the most recent activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationState {
    #[default]
    Idle,
    /// Waiting for the lead-in fade before swapping images
    FadingIn,
    /// The selected image is the active layer
    Swapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconVisualState {
    #[default]
    Unselected,
    Selected,
}

/// Arguments for [`FaveIcon::activate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    pub is_selected: bool,
    pub fill_color: Rgba,
    /// Seconds; zero or less disables animation
    pub duration: f64,
    /// Seconds before the selection animation starts
    pub delay: f64,
}

impl Activation {
    pub fn new(is_selected: bool, fill_color: Rgba) -> Self {
        Self {
            is_selected,
            fill_color,
            duration: DEFAULT_DURATION,
            delay: 0.0,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    #[inline]
    pub fn animates(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }
}

/// A fade whose completion may trigger the swap to the selected image
#[derive(Debug)]
struct PendingSwap {
    generation: u64,
    completion: Completion,
}

/// An icon that swaps between a base and a selected image with an elastic
/// scale animation.
///
/// The icon owns layer handles, never the host. Every call that touches the
/// layer tree takes the host explicitly.
#[derive(Debug)]
pub struct FaveIcon<I> {
    content_region: Rect,
    icon_image: I,
    selected_icon_image: Option<I>,
    icon_color: Rgba,

    view: LayerId,
    icon_layer: LayerId,
    masked_icon_layer: Option<LayerId>,

    tween_cache: TweenCache,
    scale_animation: Option<KeyframeAnimation>,

    state: ActivationState,
    visual_state: IconVisualState,
    /// Bumped on every activation; fades from older generations never swap
    generation: u64,
    pending: Vec<PendingSwap>,
}

impl<I: Clone> FaveIcon<I> {
    /// Build the icon's layers inside `parent`.
    ///
    /// Without a selected image the base image becomes the alpha mask of a
    /// shape layer filled with `color`, so selection is expressed as a tint.
    /// With one, the base image is shown directly and gets swapped.
    pub fn create<H>(
        host: &mut H,
        parent: LayerId,
        icon: I,
        selected_icon: Option<I>,
        color: Rgba,
    ) -> crate::Result<Self>
    where
        H: LayerHost<Image = I>,
    {
        let content_region = host.bounds(parent);
        if content_region.is_degenerate() {
            return Err(crate::Error::InvalidRegion(format!("{:?}", content_region)));
        }

        let view = host.create_container(content_region);
        host.add_sublayer(parent, view);

        let icon_region = Self::icon_region_for(content_region);
        let icon_layer = host.create_image_layer(&icon, icon_region);

        let masked_icon_layer = if selected_icon.is_none() {
            let shape = host.create_masked_shape(content_region, color, icon_layer);
            host.add_sublayer(view, shape);
            Some(shape)
        } else {
            host.add_sublayer(view, icon_layer);
            None
        };

        debug!(
            ?view,
            ?icon_layer,
            tinted = masked_icon_layer.is_some(),
            "Created favorite icon"
        );

        Ok(Self {
            content_region,
            icon_image: icon,
            selected_icon_image: selected_icon,
            icon_color: color,
            view,
            icon_layer,
            masked_icon_layer,
            tween_cache: TweenCache::new(),
            scale_animation: None,
            state: ActivationState::Idle,
            visual_state: IconVisualState::Unselected,
            generation: 0,
            pending: Vec::new(),
        })
    }

    fn icon_region_for(content_region: Rect) -> Rect {
        content_region
            .size
            .scale_by(ICON_SIZE_RATIO)
            .rect_centered(content_region.center())
    }

    /// Select or deselect the icon.
    ///
    /// The tint (tint-only icons) is applied before anything else and is
    /// never animated. Selecting fades the view in after `delay` and swaps to
    /// the selected image once that fade completes, see [`FaveIcon::poll`].
    /// Deselecting swaps back right away. The scale animation runs alongside
    /// and never gates either transition.
    pub fn activate<H>(&mut self, host: &mut H, activation: Activation)
    where
        H: LayerHost<Image = I>,
    {
        let animate = activation.animates();

        if let Some(shape) = self.masked_icon_layer {
            host.set_fill_color(shape, activation.fill_color);
        }

        self.generation = self.generation.wrapping_add(1);
        // Fades from earlier activations can no longer swap
        self.pending.clear();

        let selected_delay = if activation.is_selected {
            activation.delay.max(0.0)
        } else {
            0.0
        };

        debug!(
            selected = activation.is_selected,
            duration = activation.duration,
            delay = selected_delay,
            generation = self.generation,
            "Activating icon"
        );

        if activation.is_selected {
            self.visual_state = IconVisualState::Selected;
            if animate {
                host.set_opacity(self.view, 0.0);
                let (completer, completion) = completion_pair();
                host.animate_fade(
                    self.view,
                    FadeAnimation {
                        to_opacity: 1.0,
                        duration: 0.0,
                        delay: selected_delay,
                    },
                    completer,
                );
                self.pending.push(PendingSwap {
                    generation: self.generation,
                    completion,
                });
                self.state = ActivationState::FadingIn;
            } else {
                host.set_opacity(self.view, 1.0);
                self.finish_selection(host);
            }
        } else {
            self.visual_state = IconVisualState::Unselected;
            if !self.is_tint_only() {
                let base = self.icon_image.clone();
                self.swap_active_layer(host, &base);
            }
            self.state = ActivationState::Idle;
        }

        if !animate {
            return;
        }

        let values = self
            .tween_cache
            .get_or_generate(activation.duration)
            .shared_values();
        let animation = KeyframeAnimation {
            key_path: SCALE_KEY_PATH,
            values,
            duration: activation.duration,
            begin_time: host.now() + selected_delay,
        };
        host.add_keyframe_animation(self.icon_layer, animation.clone());
        self.scale_animation = Some(animation);
    }

    /// Act on resolved fade completions.
    ///
    /// Returns `true` when the selected image was swapped in. Completions
    /// from superseded activations are discarded whatever they report, and an
    /// interrupted fade of the current activation never swaps.
    pub fn poll<H>(&mut self, host: &mut H) -> bool
    where
        H: LayerHost<Image = I>,
    {
        let mut swap = false;
        let generation = self.generation;

        self.pending.retain(|pending| match pending.completion.state() {
            CompletionState::Pending => true,
            CompletionState::Resolved { completed } => {
                if pending.generation != generation {
                    trace!(
                        stale = pending.generation,
                        current = generation,
                        completed,
                        "Discarding stale fade completion"
                    );
                } else if completed {
                    swap = true;
                } else {
                    warn!(generation, "Fade interrupted, skipping image swap");
                }
                false
            }
        });

        if self.state != ActivationState::FadingIn || self.has_pending_current() {
            return false;
        }

        if swap {
            self.finish_selection(host)
        } else {
            self.state = ActivationState::Idle;
            false
        }
    }

    fn has_pending_current(&self) -> bool {
        self.pending.iter().any(|p| p.generation == self.generation)
    }

    /// Swap in the selected image if there is one. Reads the image at call
    /// time so a replaced selected image is honored.
    fn finish_selection<H>(&mut self, host: &mut H) -> bool
    where
        H: LayerHost<Image = I>,
    {
        match self.selected_icon_image.clone() {
            Some(image) => {
                self.swap_active_layer(host, &image);
                self.state = ActivationState::Swapped;
                true
            }
            None => {
                self.state = ActivationState::Idle;
                false
            }
        }
    }

    /// Replace the active image layer in one step: attach the new layer,
    /// release the old one, then repoint the handle. A scale animation still
    /// in flight follows the new layer.
    fn swap_active_layer<H>(&mut self, host: &mut H, image: &I)
    where
        H: LayerHost<Image = I>,
    {
        let new_layer = host.create_image_layer(image, self.icon_region());
        host.add_sublayer(self.view, new_layer);
        host.remove_layer(self.icon_layer);
        let old_layer = std::mem::replace(&mut self.icon_layer, new_layer);

        let now = host.now();
        match self.scale_animation.take() {
            Some(animation) if animation.is_running_at(now) => {
                host.add_keyframe_animation(new_layer, animation.clone());
                self.scale_animation = Some(animation);
            }
            _ => {}
        }

        debug!(?old_layer, ?new_layer, "Swapped icon layer");
    }

    /// Replace the selected image used by future swaps.
    ///
    /// Tint-only icons keep their masked shape for life and never swap, so
    /// the image is ignored for them.
    pub fn set_selected_image(&mut self, image: Option<I>) {
        if self.is_tint_only() {
            warn!("Ignoring selected image for a tint-only icon");
            return;
        }
        self.selected_icon_image = image;
    }

    /// Whether selection is shown by tinting a masked shape
    pub fn is_tint_only(&self) -> bool {
        self.masked_icon_layer.is_some()
    }

    /// Detach and release every layer this icon created
    pub fn remove<H>(self, host: &mut H)
    where
        H: LayerHost<Image = I>,
    {
        host.remove_layer(self.view);
        debug!(view = ?self.view, "Removed favorite icon");
    }

    pub fn view(&self) -> LayerId {
        self.view
    }

    /// The layer currently showing an image (and receiving scale animations)
    pub fn icon_layer(&self) -> LayerId {
        self.icon_layer
    }

    pub fn masked_icon_layer(&self) -> Option<LayerId> {
        self.masked_icon_layer
    }

    pub fn content_region(&self) -> Rect {
        self.content_region
    }

    pub fn icon_region(&self) -> Rect {
        Self::icon_region_for(self.content_region)
    }

    pub fn icon_color(&self) -> Rgba {
        self.icon_color
    }

    pub fn has_selected_image(&self) -> bool {
        self.selected_icon_image.is_some()
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn visual_state(&self) -> IconVisualState {
        self.visual_state
    }

    pub fn is_selected(&self) -> bool {
        self.visual_state == IconVisualState::Selected
    }

    pub fn tween_cache(&self) -> &TweenCache {
        &self.tween_cache
    }

    /// Fades issued by this icon that the host has not resolved yet
    pub fn pending_fades(&self) -> usize {
        self.pending.len()
    }
}
