use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Position;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true exactly for the two axis-aligned reversal pairs.
    #[must_use]
    pub fn is_opposite(self, other: Self) -> bool {
        other == self.opposite()
    }

    /// Unit offset of one step in this direction. Rows grow downwards.
    #[must_use]
    pub fn delta(self) -> Position {
        match self {
            Self::Up => Position { x: 0, y: -1 },
            Self::Down => Position { x: 0, y: 1 },
            Self::Left => Position { x: -1, y: 0 },
            Self::Right => Position { x: 1, y: 0 },
        }
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Quit,
    Restart,
}

/// Everything one frame's input drain produced.
///
/// Only the final direction survives; earlier ones in the same frame are
/// overwritten rather than queued.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct FrameInput {
    pub direction: Option<Direction>,
    pub quit: bool,
    pub restart: bool,
}

impl FrameInput {
    /// Folds a frame's worth of inputs, in arrival order.
    #[must_use]
    pub fn collect<I: IntoIterator<Item = GameInput>>(inputs: I) -> Self {
        inputs.into_iter().fold(Self::default(), |mut frame, input| {
            match input {
                GameInput::Direction(direction) => frame.direction = Some(direction),
                GameInput::Quit => frame.quit = true,
                GameInput::Restart => frame.restart = true,
            }
            frame
        })
    }
}

/// Keyboard source backed by crossterm's event queue.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Drains every pending event without blocking.
    pub fn drain(&mut self) -> io::Result<FrameInput> {
        let mut inputs = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(input) = map_key_event(key) {
                    inputs.push(input);
                }
            }
        }

        Ok(FrameInput::collect(inputs))
    }
}

/// Maps a key press to a game input; releases and repeats are ignored.
#[must_use]
pub fn map_key_event(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(GameInput::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(GameInput::Direction(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(GameInput::Direction(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(GameInput::Direction(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d' | 'D') => {
            Some(GameInput::Direction(Direction::Right))
        }
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(GameInput::Quit),
        KeyCode::Enter | KeyCode::Char(' ') => Some(GameInput::Restart),
        _ => None,
    }
}
