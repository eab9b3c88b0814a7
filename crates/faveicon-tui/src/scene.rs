//! Retained layer tree with a media clock.
//!
//! `Scene` is the terminal's [`LayerHost`]: it stores layers in absolute scene
//! coordinates, plays keyframe animations and fades against its own clock and
//! resolves fade completions when the clock passes their end.

use std::collections::BTreeMap;

use faveicon_core::{
    Completer, FadeAnimation, KeyframeAnimation, LayerHost, LayerId, Rect, Rgba, SCALE_KEY_PATH,
};
use tracing::{debug, trace};

use crate::timing::{is_complete, keyframe_value, lerp, progress};

/// The image type the terminal host draws: a symbol and its own color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub symbol: String,
    pub color: Rgba,
}

impl Glyph {
    pub fn new(symbol: impl Into<String>, color: Rgba) -> Self {
        Self {
            symbol: symbol.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Container,
    Image(Glyph),
    /// Solid fill clipped to the alpha of `mask`
    Shape { fill: Rgba, mask: LayerId },
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub kind: LayerKind,
    pub bounds: Rect,
    pub parent: Option<LayerId>,
    pub sublayers: Vec<LayerId>,
    /// Model opacity
    pub opacity: f64,
    animations: Vec<KeyframeAnimation>,
}

impl Layer {
    fn new(kind: LayerKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            parent: None,
            sublayers: Vec::new(),
            opacity: 1.0,
            animations: Vec::new(),
        }
    }

    pub fn animations(&self) -> &[KeyframeAnimation] {
        &self.animations
    }
}

#[derive(Debug)]
struct ActiveFade {
    layer: LayerId,
    from: f64,
    to: f64,
    begin: f64,
    duration: f64,
    completer: Completer,
}

/// A glyph as it should appear right now
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub symbol: String,
    pub color: Rgba,
    /// Bounds after the presentation scale, in scene coordinates
    pub rect: Rect,
    pub scale: f64,
    pub opacity: f64,
}

#[derive(Debug)]
pub struct Scene {
    now: f64,
    next_id: u64,
    root: LayerId,
    layers: BTreeMap<LayerId, Layer>,
    fades: Vec<ActiveFade>,
}

impl Scene {
    /// Create a scene whose root container covers `bounds`
    pub fn new(bounds: Rect) -> Self {
        let root = LayerId(0);
        let mut layers = BTreeMap::new();
        layers.insert(root, Layer::new(LayerKind::Container, bounds));
        Self {
            now: 0.0,
            next_id: 1,
            root,
            layers,
            fades: Vec::new(),
        }
    }

    pub fn root(&self) -> LayerId {
        self.root
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn active_fades(&self) -> usize {
        self.fades.len()
    }

    /// Move the clock to `now` and settle finished animations.
    ///
    /// The clock never runs backwards. Fades that reached their end apply
    /// their target opacity and resolve as completed.
    pub fn advance_to(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
        let now = self.now;

        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.fades)
            .into_iter()
            .partition(|fade| is_complete(fade.begin, fade.duration, now));
        self.fades = running;

        for fade in finished {
            if let Some(layer) = self.layers.get_mut(&fade.layer) {
                layer.opacity = fade.to;
            }
            trace!(layer = ?fade.layer, now, "Fade finished");
            fade.completer.resolve(true);
        }

        for layer in self.layers.values_mut() {
            layer.animations.retain(|animation| animation.is_running_at(now));
        }
    }

    /// Advance the clock by `dt` seconds
    pub fn advance_by(&mut self, dt: f64) {
        self.advance_to(self.now + dt.max(0.0));
    }

    /// Opacity as presented at the current time
    pub fn presentation_opacity(&self, id: LayerId) -> f64 {
        let Some(layer) = self.layers.get(&id) else {
            return 0.0;
        };
        match self.fades.iter().find(|fade| fade.layer == id) {
            Some(fade) if self.now < fade.begin => fade.from,
            Some(fade) => lerp(fade.from, fade.to, progress(fade.begin, fade.duration, self.now)),
            None => layer.opacity,
        }
    }

    /// Uniform scale as presented at the current time; 1.0 when no scale
    /// animation is active. The most recently added animation wins.
    pub fn presentation_scale(&self, id: LayerId) -> f64 {
        self.layers
            .get(&id)
            .and_then(|layer| {
                layer
                    .animations
                    .iter()
                    .rev()
                    .filter(|animation| animation.key_path == SCALE_KEY_PATH)
                    .find_map(|animation| keyframe_value(animation, self.now))
            })
            .unwrap_or(1.0)
    }

    /// Glyphs visible from the root, in paint order
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites = Vec::new();
        self.collect_sprites(self.root, 1.0, &mut sprites);
        sprites
    }

    fn collect_sprites(&self, id: LayerId, inherited_opacity: f64, out: &mut Vec<Sprite>) {
        let Some(layer) = self.layers.get(&id) else {
            return;
        };
        let opacity = inherited_opacity * self.presentation_opacity(id);

        match &layer.kind {
            LayerKind::Container => {}
            LayerKind::Image(glyph) => {
                out.push(self.sprite(id, layer.bounds, &glyph.symbol, glyph.color, opacity));
            }
            LayerKind::Shape { fill, mask } => {
                if let Some(Layer {
                    kind: LayerKind::Image(glyph),
                    bounds,
                    ..
                }) = self.layers.get(mask)
                {
                    let opacity = opacity * self.presentation_opacity(*mask);
                    out.push(self.sprite(*mask, *bounds, &glyph.symbol, *fill, opacity));
                }
            }
        }

        for child in &layer.sublayers {
            self.collect_sprites(*child, opacity, out);
        }
    }

    fn sprite(&self, id: LayerId, bounds: Rect, symbol: &str, color: Rgba, opacity: f64) -> Sprite {
        let scale = self.presentation_scale(id);
        let rect = bounds.size.scale_by(scale.max(0.0)).rect_centered(bounds.center());
        Sprite {
            symbol: symbol.to_string(),
            color,
            rect,
            scale,
            opacity,
        }
    }

    fn insert(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.insert(id, layer);
        id
    }

    fn detach(&mut self, id: LayerId) {
        let parent = self.layers.get_mut(&id).and_then(|layer| layer.parent.take());
        if let Some(parent) = parent.and_then(|p| self.layers.get_mut(&p)) {
            parent.sublayers.retain(|child| *child != id);
        }
    }

    fn release(&mut self, id: LayerId) {
        let Some(layer) = self.layers.remove(&id) else {
            return;
        };
        // Dropping a fade's completer reports it as interrupted
        self.fades.retain(|fade| fade.layer != id);

        for child in layer.sublayers {
            self.release(child);
        }
        if let LayerKind::Shape { mask, .. } = layer.kind {
            self.release(mask);
        }
    }
}

impl LayerHost for Scene {
    type Image = Glyph;

    fn now(&self) -> f64 {
        self.now
    }

    fn bounds(&self, layer: LayerId) -> Rect {
        self.layers
            .get(&layer)
            .map(|layer| layer.bounds)
            .unwrap_or_default()
    }

    fn create_container(&mut self, frame: Rect) -> LayerId {
        self.insert(Layer::new(LayerKind::Container, frame))
    }

    fn create_image_layer(&mut self, image: &Glyph, bounds: Rect) -> LayerId {
        self.insert(Layer::new(LayerKind::Image(image.clone()), bounds))
    }

    fn create_masked_shape(&mut self, path: Rect, fill: Rgba, mask: LayerId) -> LayerId {
        self.insert(Layer::new(LayerKind::Shape { fill, mask }, path))
    }

    fn add_sublayer(&mut self, parent: LayerId, child: LayerId) {
        if !self.layers.contains_key(&parent) || !self.layers.contains_key(&child) {
            return;
        }
        self.detach(child);
        if let Some(layer) = self.layers.get_mut(&child) {
            layer.parent = Some(parent);
        }
        if let Some(layer) = self.layers.get_mut(&parent) {
            layer.sublayers.push(child);
        }
    }

    fn remove_layer(&mut self, layer: LayerId) {
        if layer == self.root {
            return;
        }
        self.detach(layer);
        self.release(layer);
        debug!(?layer, "Released layer");
    }

    fn set_fill_color(&mut self, shape: LayerId, fill: Rgba) {
        if let Some(Layer {
            kind: LayerKind::Shape { fill: current, .. },
            ..
        }) = self.layers.get_mut(&shape)
        {
            *current = fill;
        }
    }

    fn set_opacity(&mut self, layer: LayerId, opacity: f64) {
        if let Some(layer) = self.layers.get_mut(&layer) {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn add_keyframe_animation(&mut self, layer: LayerId, animation: KeyframeAnimation) {
        if let Some(layer) = self.layers.get_mut(&layer) {
            layer.animations.push(animation);
        }
    }

    fn animate_fade(&mut self, layer: LayerId, fade: FadeAnimation, completer: Completer) {
        let Some(target) = self.layers.get_mut(&layer) else {
            completer.resolve(false);
            return;
        };

        // A new fade on the same layer interrupts the one in flight
        if let Some(index) = self.fades.iter().position(|f| f.layer == layer) {
            let interrupted = self.fades.remove(index);
            trace!(?layer, "Fade interrupted");
            interrupted.completer.resolve(false);
        }

        let from = target.opacity;
        let to = fade.to_opacity.clamp(0.0, 1.0);
        target.opacity = to;

        self.fades.push(ActiveFade {
            layer,
            from,
            to,
            begin: self.now + fade.delay.max(0.0),
            duration: fade.duration.max(0.0),
            completer,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faveicon_core::{completion_pair, CompletionState};

    fn scene() -> Scene {
        Scene::new(Rect::new(0.0, 0.0, 32.0, 16.0))
    }

    #[test]
    fn test_fade_resolves_after_delay() {
        let mut scene = scene();
        let layer = scene.create_container(Rect::new(0.0, 0.0, 4.0, 4.0));
        scene.add_sublayer(scene.root(), layer);
        scene.set_opacity(layer, 0.0);

        let (completer, completion) = completion_pair();
        scene.animate_fade(
            layer,
            FadeAnimation {
                to_opacity: 1.0,
                duration: 0.0,
                delay: 0.25,
            },
            completer,
        );

        scene.advance_to(0.1);
        assert_eq!(completion.state(), CompletionState::Pending);
        assert_eq!(scene.presentation_opacity(layer), 0.0);

        scene.advance_to(0.25);
        assert_eq!(completion.state(), CompletionState::Resolved { completed: true });
        assert_eq!(scene.presentation_opacity(layer), 1.0);
        assert_eq!(scene.active_fades(), 0);
    }

    #[test]
    fn test_fade_interpolates() {
        let mut scene = scene();
        let layer = scene.create_container(Rect::new(0.0, 0.0, 4.0, 4.0));
        scene.set_opacity(layer, 0.0);
        let (completer, _completion) = completion_pair();
        scene.animate_fade(
            layer,
            FadeAnimation {
                to_opacity: 1.0,
                duration: 1.0,
                delay: 0.0,
            },
            completer,
        );
        scene.advance_to(0.5);
        assert!((scene.presentation_opacity(layer) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_new_fade_interrupts_previous() {
        let mut scene = scene();
        let layer = scene.create_container(Rect::new(0.0, 0.0, 4.0, 4.0));
        let fade = FadeAnimation {
            to_opacity: 1.0,
            duration: 0.0,
            delay: 1.0,
        };

        let (first, first_completion) = completion_pair();
        scene.animate_fade(layer, fade, first);
        let (second, second_completion) = completion_pair();
        scene.animate_fade(layer, fade, second);

        assert_eq!(
            first_completion.state(),
            CompletionState::Resolved { completed: false }
        );
        assert_eq!(second_completion.state(), CompletionState::Pending);
        assert_eq!(scene.active_fades(), 1);
    }

    #[test]
    fn test_removing_layer_interrupts_its_fade_and_releases_children() {
        let mut scene = scene();
        let container = scene.create_container(Rect::new(0.0, 0.0, 4.0, 4.0));
        let mask = scene.create_image_layer(&Glyph::new("★", Rgba::WHITE), Rect::new(1.0, 1.0, 2.0, 2.0));
        let shape = scene.create_masked_shape(Rect::new(0.0, 0.0, 4.0, 4.0), Rgba::GRAY, mask);
        scene.add_sublayer(scene.root(), container);
        scene.add_sublayer(container, shape);

        let (completer, completion) = completion_pair();
        scene.animate_fade(
            container,
            FadeAnimation {
                to_opacity: 1.0,
                duration: 0.0,
                delay: 1.0,
            },
            completer,
        );

        scene.remove_layer(container);
        assert!(!scene.contains(container));
        assert!(!scene.contains(shape));
        assert!(!scene.contains(mask));
        assert_eq!(scene.layer_count(), 1);
        assert!(scene.layer(scene.root()).unwrap().sublayers.is_empty());
        assert_eq!(
            completion.state(),
            CompletionState::Resolved { completed: false }
        );
    }

    #[test]
    fn test_scale_animation_window() {
        let mut scene = scene();
        let layer = scene.create_image_layer(&Glyph::new("★", Rgba::WHITE), Rect::new(0.0, 0.0, 4.0, 4.0));
        scene.add_keyframe_animation(
            layer,
            KeyframeAnimation {
                key_path: SCALE_KEY_PATH,
                values: vec![0.0, 2.0].into(),
                duration: 1.0,
                begin_time: 0.5,
            },
        );

        assert_eq!(scene.presentation_scale(layer), 1.0);
        scene.advance_to(1.0);
        assert!((scene.presentation_scale(layer) - 1.0).abs() < 1e-9);
        scene.advance_to(1.25);
        assert!((scene.presentation_scale(layer) - 1.5).abs() < 1e-9);

        scene.advance_to(1.5);
        assert_eq!(scene.presentation_scale(layer), 1.0);
        assert!(scene.layer(layer).unwrap().animations().is_empty());
    }

    #[test]
    fn test_masked_shape_sprite_uses_fill_and_mask_scale() {
        let mut scene = scene();
        let mask = scene.create_image_layer(&Glyph::new("★", Rgba::WHITE), Rect::new(10.0, 4.0, 8.0, 8.0));
        let shape = scene.create_masked_shape(Rect::new(0.0, 0.0, 32.0, 16.0), Rgba::GRAY, mask);
        scene.add_sublayer(scene.root(), shape);
        scene.set_fill_color(shape, Rgba::rgb(1, 2, 3));
        scene.add_keyframe_animation(
            mask,
            KeyframeAnimation {
                key_path: SCALE_KEY_PATH,
                values: vec![0.5, 0.5].into(),
                duration: 1.0,
                begin_time: 0.0,
            },
        );

        let sprites = scene.sprites();
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].symbol, "★");
        assert_eq!(sprites[0].color, Rgba::rgb(1, 2, 3));
        assert!((sprites[0].rect.size.width - 4.0).abs() < 1e-9);
        assert!((sprites[0].rect.origin.x - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut scene = scene();
        scene.advance_to(2.0);
        scene.advance_to(1.0);
        assert_eq!(scene.now(), 2.0);
        scene.advance_by(0.5);
        assert_eq!(scene.now(), 2.5);
    }
}
