//! Gesture surfaces and a ready-made deck for the `swipe-stack` crate.
//!
//! The `swipe-stack` crate owns the discrete state (cursor, history, lock). This crate owns the
//! continuous part, one card at a time:
//!
//! - [`CardGestureSurface`]: turns a drag into a commit or a spring-back, runs the exit animation,
//!   and reports back through the controller's mailbox
//! - [`Deck`]: holds the cards and `render_card`, keeps one surface per visible card, and exposes
//!   the imperative controls plus a `tick`/`render` frame loop
//! - [`Tween`]: the small interpolation helper the surfaces run on
//!
//! This crate is intentionally framework-agnostic (no touch recognizer or renderer bindings).
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod deck;
mod surface;
mod tween;

#[cfg(test)]
mod tests;

pub use deck::{CardDataIdFn, Deck, OverlayLabels, RenderCardFn, RenderedCard};
pub use surface::{
    COMMIT_DURATION_MS, CardGestureSurface, CardTransform, GestureSample, MAX_DRAG_LIFT,
    MAX_DRAG_SCALE_DROP, OFFSCREEN_MARGIN, RESTACK_DURATION_MS, SPRING_BACK_DURATION_MS,
    SurfaceCommand, SurfaceConfig, SurfaceHandle, SurfacePhase, decide_release,
};
pub use tween::{Easing, Tween};
