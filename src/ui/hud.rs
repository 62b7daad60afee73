use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::game::Snapshot;

/// Values the HUD shows that live outside the game state.
#[derive(Debug, Clone, Copy, Default)]
pub struct HudInfo {
    pub high_score: u32,
}

/// Renders the one-line HUD and returns the remaining area below it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, info: HudInfo) -> Rect {
    let [hud_area, play_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    frame.render_widget(Paragraph::new(info_line(snapshot, info)), hud_area);

    play_area
}

fn info_line(snapshot: &Snapshot, info: HudInfo) -> Line<'static> {
    let label = Style::default().fg(Color::DarkGray);
    Line::from(vec![
        Span::styled("Score ", label),
        Span::styled(
            snapshot.score.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Hi ", label),
        Span::styled(
            info.high_score.max(snapshot.score).to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("  Length ", label),
        Span::styled(snapshot.body.len().to_string(), Style::default().fg(Color::Green)),
        Span::styled("  Tick ", label),
        Span::styled(snapshot.tick_count.to_string(), Style::default().fg(Color::Gray)),
    ])
}
