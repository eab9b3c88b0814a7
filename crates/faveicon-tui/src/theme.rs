use faveicon_core::Rgba;
use ratatui::style::Color;

/// Gruvbox Material palette used for the preview chrome
pub struct GruvboxMaterial;

impl GruvboxMaterial {
    pub const BG0: Color = Color::Rgb(0x28, 0x28, 0x28);
    pub const BG2: Color = Color::Rgb(0x3c, 0x38, 0x36);
    pub const FG0: Color = Color::Rgb(0xd4, 0xbe, 0x98);
    pub const GREY2: Color = Color::Rgb(0xa8, 0x99, 0x84);
    pub const RED: Color = Color::Rgb(0xea, 0x69, 0x62);
}

/// Convert a core color into a terminal color, dropping alpha
#[inline]
pub fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
