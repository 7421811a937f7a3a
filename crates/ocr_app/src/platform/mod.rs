mod app;
mod clipboard;
mod commands;
mod effects;
mod picker;
mod render;

pub use app::run;
