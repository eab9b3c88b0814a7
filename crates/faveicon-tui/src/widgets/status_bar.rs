use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use faveicon_core::ActivationState;

use crate::app::PreviewApp;
use crate::theme::GruvboxMaterial;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &PreviewApp) {
        let state_str = match app.icon.state() {
            ActivationState::Idle => "IDLE",
            ActivationState::FadingIn => "FADING",
            ActivationState::Swapped => "SWAPPED",
        };
        let selection_str = if app.icon.is_selected() {
            "selected"
        } else {
            "unselected"
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} | {} | {:.2}s +{:.2}s | t={:.2}",
                state_str,
                selection_str,
                app.config.animation.duration_secs,
                app.config.animation.delay_secs,
                faveicon_core::LayerHost::now(&app.scene),
            )
        };

        let help_hint = " space:toggle q:quit ";
        let padding_len = area
            .width
            .saturating_sub(status_text.chars().count() as u16 + help_hint.len() as u16)
            as usize;

        let state_fg = if app.icon.is_selected() {
            GruvboxMaterial::RED
        } else {
            GruvboxMaterial::FG0
        };

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(state_fg).bg(GruvboxMaterial::BG2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(GruvboxMaterial::BG2)),
            Span::styled(
                help_hint,
                Style::default()
                    .fg(GruvboxMaterial::GREY2)
                    .bg(GruvboxMaterial::BG2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
