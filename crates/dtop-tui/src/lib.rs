#![forbid(unsafe_code)]

//! Minimal terminal UI kit for DeployTop.
//!
//! Provides the pieces the application composes:
//!
//! - canonical input events ([`event`]) mapped from crossterm
//! - cell-grid rendering primitives ([`cell`], [`buffer`], [`frame`])
//! - a braille sub-pixel painter ([`canvas`]) for edge polylines
//! - small widgets ([`panel`], [`list`], [`toast`], [`spinner`])
//! - an Elm-style runtime ([`runtime`]): Model, Cmd, Program
//! - the terminal session and presenter ([`terminal`])
//!
//! The runtime is single-threaded and event-driven: the model is mutated
//! only in `update()` in response to discrete messages. Background work
//! (`Cmd::task`) runs a closure on a spawned thread whose only output is a
//! message sent back to the loop.

pub mod buffer;
pub mod canvas;
pub mod cell;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod list;
pub mod panel;
pub mod runtime;
pub mod spinner;
pub mod style;
pub mod terminal;
pub mod toast;

pub use buffer::Buffer;
pub use frame::Frame;
pub use geometry::Rect;
pub use style::{Rgba, Style};

/// A renderable UI element.
pub trait Widget {
    /// Render into the given area of the frame.
    fn render(&self, area: Rect, frame: &mut Frame);
}
