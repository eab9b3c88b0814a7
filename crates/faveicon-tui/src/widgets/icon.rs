use ratatui::{layout::Rect as Area, style::Style, Frame};

use faveicon_core::Rect;

use crate::scene::Scene;
use crate::theme::to_color;

/// Sprites fainter than this are not drawn; cells have no alpha
const MIN_VISIBLE_OPACITY: f64 = 0.5;

/// Paints the scene's glyphs as blocks of cells sized by their presentation
/// scale
pub struct IconWidget;

impl IconWidget {
    pub fn render(frame: &mut Frame, area: Area, scene: &Scene) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let Some(root) = scene.layer(scene.root()) else {
            return;
        };
        let world = root.bounds;
        if world.is_degenerate() {
            return;
        }

        let sx = area.width as f64 / world.size.width;
        let sy = area.height as f64 / world.size.height;
        let buf = frame.buffer_mut();

        for sprite in scene.sprites() {
            if sprite.opacity < MIN_VISIBLE_OPACITY {
                continue;
            }
            let Some(cells) = project(sprite.rect, world, area, sx, sy) else {
                continue;
            };
            let style = Style::default().fg(to_color(sprite.color));
            for y in cells.top()..cells.bottom() {
                for x in cells.left()..cells.right() {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_symbol(&sprite.symbol).set_style(style);
                    }
                }
            }
        }
    }
}

/// Map a scene rectangle onto terminal cells, clipped to `area`
fn project(rect: Rect, world: Rect, area: Area, sx: f64, sy: f64) -> Option<Area> {
    let left = ((rect.origin.x - world.origin.x) * sx).round();
    let top = ((rect.origin.y - world.origin.y) * sy).round();
    let right = ((rect.origin.x + rect.size.width - world.origin.x) * sx).round();
    let bottom = ((rect.origin.y + rect.size.height - world.origin.y) * sy).round();

    let left = left.clamp(0.0, area.width as f64) as u16;
    let top = top.clamp(0.0, area.height as f64) as u16;
    let right = right.clamp(0.0, area.width as f64) as u16;
    let bottom = bottom.clamp(0.0, area.height as f64) as u16;

    if right <= left || bottom <= top {
        return None;
    }
    Some(Area::new(
        area.x + left,
        area.y + top,
        right - left,
        bottom - top,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use faveicon_core::{LayerHost, Rgba};
    use ratatui::{backend::TestBackend, style::Color, Terminal};

    use crate::scene::Glyph;

    fn draw(scene: &Scene) -> ratatui::buffer::Buffer {
        let mut terminal = Terminal::new(TestBackend::new(32, 16)).unwrap();
        terminal
            .draw(|frame| IconWidget::render(frame, frame.area(), scene))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn test_renders_glyph_block_in_fill_color() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 32.0, 16.0));
        let layer = scene.create_image_layer(&Glyph::new("*", Rgba::rgb(9, 9, 9)), Rect::new(8.0, 4.0, 16.0, 8.0));
        scene.add_sublayer(scene.root(), layer);

        let buffer = draw(&scene);
        let inside = &buffer[(8, 4)];
        assert_eq!(inside.symbol(), "*");
        assert_eq!(inside.fg, Color::Rgb(9, 9, 9));
        assert_eq!(buffer[(23, 11)].symbol(), "*");
        assert_eq!(buffer[(7, 4)].symbol(), " ");
        assert_eq!(buffer[(24, 11)].symbol(), " ");
    }

    #[test]
    fn test_hidden_and_collapsed_sprites_are_skipped() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 32.0, 16.0));
        let layer = scene.create_image_layer(&Glyph::new("*", Rgba::WHITE), Rect::new(8.0, 4.0, 16.0, 8.0));
        scene.add_sublayer(scene.root(), layer);

        scene.set_opacity(layer, 0.2);
        let buffer = draw(&scene);
        assert_eq!(buffer[(16, 8)].symbol(), " ");

        scene.set_opacity(layer, 1.0);
        scene.add_keyframe_animation(
            layer,
            faveicon_core::KeyframeAnimation {
                key_path: faveicon_core::SCALE_KEY_PATH,
                values: vec![0.0, 0.0].into(),
                duration: 1.0,
                begin_time: 0.0,
            },
        );
        let buffer = draw(&scene);
        assert_eq!(buffer[(16, 8)].symbol(), " ");
    }

    #[test]
    fn test_project_clips_to_area() {
        let world = Rect::new(0.0, 0.0, 10.0, 10.0);
        let area = Area::new(2, 3, 10, 10);
        let cells = project(Rect::new(-5.0, 5.0, 10.0, 20.0), world, area, 1.0, 1.0).unwrap();
        assert_eq!(cells, Area::new(2, 8, 5, 5));
        assert!(project(Rect::new(20.0, 0.0, 1.0, 1.0), world, area, 1.0, 1.0).is_none());
    }
}
