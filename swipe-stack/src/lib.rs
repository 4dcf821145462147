//! A headless swipeable card stack.
//!
//! For per-card drag surfaces and a ready-made deck, see the `swipe-stack-gesture` crate.
//!
//! This crate owns the discrete part of a swipe-card widget: the cursor over an ordered card
//! sequence, the bounded undo history, the transition lock that serializes commits, and the
//! layout of the visible window (depth scale, vertical stagger, layer order).
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the card count (the cards themselves stay with the caller)
//! - a [`SwipeTarget`] for the active card, if swipes are animated
//! - a frame loop that calls [`StackController::pump`] to deliver surface messages
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod controller;
mod mailbox;
mod options;
mod state;
mod target;
mod types;


pub use controller::StackController;
pub use mailbox::{SurfaceEvent, SurfaceMessage, SurfaceSender};
pub use options::{
    CardIdFn, ConfigAdvisory, DEFAULT_CARD_SCALE_STEP, DEFAULT_CARD_VERTICAL_OFFSET,
    DEFAULT_HISTORY_LIMIT, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_STACK_SIZE,
    DEFAULT_THRESHOLD_RATIO, OnCardCallback, OnChangeCallback, OnSwipeBackCallback,
    OnSwipeStartCallback, ScreenWidth, StackOptions,
};
pub use state::StackState;
pub use target::SwipeTarget;
pub use types::{CardId, CardKey, StackCard, StackRange, SwipeDirection, SwipeDirections};
