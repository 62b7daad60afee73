use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::game::EndReason;

/// Draws the pre-game prompt as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, high_score: u32) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("SNAKE").style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
        Line::from("Arrows/WASD move"),
        Line::from("[Esc]/[Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" ready ")),
        popup,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    high_score: u32,
    reason: Option<EndReason>,
) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let is_new_high = score > 0 && score >= high_score;
    let lines = vec![
        Line::from("GAME OVER").style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Final score: {score}")).style(Style::default().fg(Color::Yellow)),
        Line::from(format!("High score: {}", high_score.max(score))),
        Line::from(end_reason_text(reason)),
        Line::from(if is_new_high { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[Space]/[Enter] Restart"),
        Line::from("[Esc]/[Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn end_reason_text(reason: Option<EndReason>) -> &'static str {
    match reason {
        Some(EndReason::WallCollision) => "Cause: hit wall",
        Some(EndReason::SelfCollision) => "Cause: hit yourself",
        Some(EndReason::BoardFilled) => "Board filled. You win!",
        None => "",
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
