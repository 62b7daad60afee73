pub mod config;
pub mod food;
pub mod game;
pub mod governor;
pub mod input;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
