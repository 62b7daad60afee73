use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::config::GridSize;
use crate::game::{GameStatus, Snapshot};
use crate::input::Direction;
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_start_menu};

/// Terminal columns per logical cell; two keeps cells roughly square.
pub const CELL_WIDTH: u16 = 2;

const GLYPH_FOOD: &str = "()";
const GLYPH_SNAKE_BODY: &str = "██";
const GLYPH_SNAKE_HEAD_UP: &str = "▲▲";
const GLYPH_SNAKE_HEAD_DOWN: &str = "▼▼";
const GLYPH_SNAKE_HEAD_LEFT: &str = "◀◀";
const GLYPH_SNAKE_HEAD_RIGHT: &str = "▶▶";

const COLOR_HEAD: Color = Color::LightGreen;
const COLOR_BODY: Color = Color::Green;
const COLOR_FOOD: Color = Color::Red;
const COLOR_BORDER: Color = Color::DarkGray;

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, hud: HudInfo) {
    let area = frame.area();
    let below_hud = render_hud(frame, area, snapshot, hud);
    let play_area = board_area(below_hud, snapshot.bounds);

    let block = Block::bordered().border_style(Style::new().fg(COLOR_BORDER));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);

    match snapshot.status {
        GameStatus::Ready => render_start_menu(frame, play_area, hud.high_score),
        GameStatus::GameOver => render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            hud.high_score,
            snapshot.end_reason,
        ),
        GameStatus::Running => {}
    }
}

/// Bordered rectangle sized to the grid, clipped to what the terminal offers.
fn board_area(available: Rect, bounds: GridSize) -> Rect {
    let width = bounds.width.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = bounds.height.saturating_add(2);

    Rect {
        x: available.x,
        y: available.y,
        width: width.min(available.width),
        height: height.min(available.height),
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, snapshot.food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(COLOR_FOOD).bg(Color::Yellow));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();

    // Tail first so the head wins if anything ever overlaps.
    for (index, segment) in snapshot.body.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                head_glyph(snapshot.heading),
                Style::new().fg(COLOR_HEAD).add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(COLOR_BODY));
        }
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
