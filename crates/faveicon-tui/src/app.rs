use anyhow::Result;
use faveicon_core::{ActivationState, AppConfig, FaveIcon, Rect};
use tracing::info;

use crate::event::Action;
use crate::scene::{Glyph, Scene};

/// Scene size in cells; twice as wide as tall so the icon looks square
pub const SCENE_WIDTH: f64 = 32.0;
pub const SCENE_HEIGHT: f64 = 16.0;

/// State for the interactive preview: one icon in one scene
pub struct PreviewApp {
    pub scene: Scene,
    pub icon: FaveIcon<Glyph>,
    pub config: AppConfig,
    pub should_quit: bool,
    pub status_message: Option<String>,
    toggles: u32,
}

impl PreviewApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, SCENE_WIDTH, SCENE_HEIGHT));
        let root = scene.root();

        let base = Glyph::new(config.icon.glyph.clone(), config.icon.tint);
        let selected = config
            .icon
            .selected_glyph
            .clone()
            .map(|symbol| Glyph::new(symbol, config.icon.selected_fill));

        let icon = FaveIcon::create(&mut scene, root, base, selected, config.icon.tint)?;

        Ok(Self {
            scene,
            icon,
            config,
            should_quit: false,
            status_message: None,
            toggles: 0,
        })
    }

    /// Flip the selection using the configured duration, delay and colors
    pub fn toggle(&mut self) {
        let selecting = !self.icon.is_selected();
        let activation = self.config.activation(selecting);
        self.icon.activate(&mut self.scene, activation);
        self.toggles += 1;
        self.status_message = None;
        info!(selected = selecting, toggles = self.toggles, "Toggled favorite");
    }

    /// Advance the scene clock to `now` seconds and settle the icon
    pub fn tick(&mut self, now: f64) {
        self.scene.advance_to(now);
        if self.icon.poll(&mut self.scene) {
            self.status_message = Some("Swapped to selected glyph".to_string());
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Toggle => self.toggle(),
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn toggles(&self) -> u32 {
        self.toggles
    }

    /// Whether anything is still moving, so the loop can keep a fast tick
    pub fn is_animating(&self) -> bool {
        self.icon.state() == ActivationState::FadingIn
            || self.scene.active_fades() > 0
            || self
                .scene
                .layer(self.icon.icon_layer())
                .is_some_and(|layer| !layer.animations().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faveicon_core::{IconVisualState, Rgba};

    #[test]
    fn test_toggle_tint_only() {
        let mut app = PreviewApp::new(AppConfig::default()).unwrap();
        let shape = app.icon.masked_icon_layer().unwrap();

        app.apply(Action::Toggle);
        assert_eq!(app.icon.visual_state(), IconVisualState::Selected);
        assert!(app.is_animating());

        app.tick(1.0);
        assert!(!app.is_animating());
        let sprites = app.scene.sprites();
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].color, app.config.icon.selected_fill);
        assert!(app.scene.contains(shape));

        app.apply(Action::Toggle);
        assert_eq!(app.scene.sprites()[0].color, Rgba::GRAY);
        assert_eq!(app.toggles(), 2);
    }

    #[test]
    fn test_toggle_swaps_glyphs_after_delay() {
        let mut config = AppConfig::default();
        config.icon.selected_glyph = Some("♥".to_string());
        config.animation.delay_secs = 0.2;
        let mut app = PreviewApp::new(config).unwrap();

        app.apply(Action::Toggle);
        app.tick(0.1);
        assert_eq!(app.icon.state(), ActivationState::FadingIn);
        // hidden until the lead-in finishes
        assert_eq!(app.scene.sprites()[0].opacity, 0.0);

        app.tick(0.2);
        assert_eq!(app.icon.state(), ActivationState::Swapped);
        let sprites = app.scene.sprites();
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].symbol, "♥");
        assert_eq!(sprites[0].opacity, 1.0);
        assert!(app.status_message.is_some());

        app.apply(Action::Toggle);
        assert_eq!(app.scene.sprites()[0].symbol, "★");
    }

    #[test]
    fn test_quick_double_toggle_keeps_base_glyph() {
        let mut config = AppConfig::default();
        config.icon.selected_glyph = Some("♥".to_string());
        config.animation.delay_secs = 0.3;
        let mut app = PreviewApp::new(config).unwrap();

        app.apply(Action::Toggle);
        app.tick(0.1);
        app.apply(Action::Toggle);
        app.tick(0.5);

        assert_eq!(app.icon.state(), ActivationState::Idle);
        assert_eq!(app.scene.sprites()[0].symbol, "★");
    }

    #[test]
    fn test_quit() {
        let mut app = PreviewApp::new(AppConfig::default()).unwrap();
        app.apply(Action::Quit);
        assert!(app.should_quit);
    }
}
