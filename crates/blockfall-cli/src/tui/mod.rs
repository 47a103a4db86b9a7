//! Minimal terminal runtime: a tick/render/input loop over crossterm and ratatui.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
