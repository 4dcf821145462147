use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;

use crate::mailbox::Mailbox;
use crate::{
    CardId, CardKey, StackCard, StackOptions, StackRange, StackState, SurfaceEvent,
    SurfaceMessage, SurfaceSender, SwipeDirection, SwipeDirections, SwipeTarget,
};

/// The stack-cursor state machine.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold card data or rendered content; only the card count.
/// - Gesture surfaces report discrete transitions through the mailbox (see [`Self::sender`]),
///   which the host drains on its control thread with [`Self::pump`].
/// - Layout for the visible window is exposed via [`Self::for_each_visible_card`].
///
/// Every request is a silent no-op when its preconditions fail. The `bool` returns only tell the
/// caller whether anything happened.
pub struct StackController<K = CardId> {
    options: StackOptions<K>,
    screen_width: f32,
    swipe_threshold: f32,

    cursor: usize,
    history: VecDeque<usize>,
    transition_lock: bool,
    // Card index whose commit holds the lock.
    lock_index: usize,
    in_motion: bool,

    target: Option<Box<dyn SwipeTarget>>,
    mailbox: Mailbox,
}

impl<K> StackController<K> {
    /// Creates a controller from options.
    ///
    /// The screen width is resolved here, once. An `initial_card_index` past the end is clamped
    /// to the card count.
    pub fn new(options: StackOptions<K>) -> Self {
        let screen_width = options.screen_width.resolve();
        let swipe_threshold = options.resolve_threshold(screen_width);
        report_advisories(&options, screen_width);
        let cursor = options.initial_card_index.min(options.count);
        sdebug!(
            count = options.count,
            stack_size = options.stack_size,
            cursor,
            swipe_threshold,
            "StackController::new"
        );
        Self {
            options,
            screen_width,
            swipe_threshold,
            cursor,
            history: VecDeque::new(),
            transition_lock: false,
            lock_index: cursor,
            in_motion: false,
            target: None,
            mailbox: Mailbox::new(),
        }
    }

    pub fn options(&self) -> &StackOptions<K> {
        &self.options
    }

    /// Replaces the options.
    ///
    /// The screen width stays as resolved at construction (use `set_screen_width` to change it);
    /// the threshold is re-resolved against it. A count change behaves like `set_count`.
    /// `initial_card_index` only matters at construction.
    pub fn set_options(&mut self, options: StackOptions<K>) {
        let prev_count = self.options.count;
        let prev_stack_size = self.options.stack_size;
        report_advisories(&options, self.screen_width);
        self.options = options;
        self.swipe_threshold = self.options.resolve_threshold(self.screen_width);
        self.enforce_history_limit();
        strace!(
            count = self.options.count,
            stack_size = self.options.stack_size,
            "StackController::set_options"
        );

        if self.options.count != prev_count {
            self.apply_count();
            self.notify();
        } else if self.options.stack_size != prev_stack_size {
            self.notify();
        }
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut StackOptions<K>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stack_size(&self) -> usize {
        self.options.stack_size
    }

    /// Consumed indexes, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.history.iter().copied()
    }

    pub fn is_locked(&self) -> bool {
        self.transition_lock
    }

    /// `true` once a surface has reported the start of the in-flight swipe.
    pub fn is_in_motion(&self) -> bool {
        self.in_motion
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.options.count
    }

    pub fn screen_width(&self) -> f32 {
        self.screen_width
    }

    pub fn screen_height(&self) -> f32 {
        self.options.screen_height
    }

    pub fn swipe_threshold(&self) -> f32 {
        self.swipe_threshold
    }

    pub fn directions(&self) -> SwipeDirections {
        self.options.directions
    }

    /// Re-resolves the threshold default against a new width (e.g. after rotation).
    pub fn set_screen_width(&mut self, width: f32) {
        self.screen_width = width;
        self.swipe_threshold = self.options.resolve_threshold(width);
    }

    pub fn set_directions(&mut self, directions: SwipeDirections) {
        self.options.directions = directions;
    }

    pub fn set_direction_enabled(&mut self, direction: SwipeDirection, enabled: bool) {
        self.options.directions = self.options.directions.with(direction, enabled);
    }

    pub fn set_stack_size(&mut self, stack_size: usize) {
        if self.options.stack_size == stack_size {
            return;
        }
        self.options.stack_size = stack_size;
        self.notify();
    }

    /// Replaces the card count (the caller swapped its card sequence).
    ///
    /// The cursor is clamped to the new count and the oldest history entries are dropped until
    /// the history is no longer than the cursor.
    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.apply_count();
        self.notify();
    }

    fn apply_count(&mut self) {
        let count = self.options.count;
        self.cursor = self.cursor.min(count);
        self.history.retain(|&i| i < count);
        self.trim_history_to_cursor();
        sdebug!(count, cursor = self.cursor, "card count changed");
    }

    /// Returns a snapshot of the discrete state.
    pub fn state(&self) -> StackState {
        StackState {
            cursor: self.cursor,
            history: self.history.iter().copied().collect(),
            transition_lock: self.transition_lock,
        }
    }

    /// Restores a snapshot captured with [`Self::state`].
    ///
    /// The cursor is clamped to the card count, history entries that are out of range or beyond
    /// the retention cap are dropped, and the lock is released: no animation survives a restore.
    pub fn restore_state(&mut self, state: StackState) {
        let count = self.options.count;
        self.cursor = state.cursor.min(count);
        self.history = state.history.into_iter().filter(|&i| i < count).collect();
        self.trim_history_to_cursor();
        self.enforce_history_limit();
        self.release_lock();
        self.notify();
    }

    // ---------------------------------------------------------------------
    // Visible window

    /// Indexes `[cursor, min(cursor + stack_size, count))`.
    pub fn visible_range(&self) -> StackRange {
        let count = self.options.count;
        let start_index = self.cursor.min(count);
        let end_index = self
            .cursor
            .saturating_add(self.options.stack_size)
            .min(count);
        StackRange {
            start_index,
            end_index: end_index.max(start_index),
        }
    }

    /// The index of the active (topmost) card, if any card is visible.
    pub fn active_index(&self) -> Option<usize> {
        let range = self.visible_range();
        (!range.is_empty()).then_some(range.start_index)
    }

    /// Layout of the card at `index`, if it is inside the visible window.
    pub fn stack_card(&self, index: usize) -> Option<StackCard> {
        if !self.visible_range().contains(index) {
            return None;
        }
        let stack_position = index - self.cursor;
        let depth = stack_position as f32;
        Some(StackCard {
            index,
            stack_position,
            depth_scale: 1.0 - depth * self.options.card_scale_step,
            vertical_offset: -depth * self.options.card_vertical_offset,
            layer_order: self.options.count - index,
        })
    }

    /// Calls `f` for each visible card, active card first.
    pub fn for_each_visible_card(&self, mut f: impl FnMut(StackCard)) {
        let range = self.visible_range();
        for index in range.start_index..range.end_index {
            if let Some(card) = self.stack_card(index) {
                f(card);
            }
        }
    }

    pub fn visible_cards(&self) -> Vec<StackCard> {
        let mut out = Vec::with_capacity(self.visible_range().len());
        self.for_each_visible_card(|card| out.push(card));
        out
    }

    /// Identity of the card at `index`: its intrinsic id when the options supply one, else the
    /// index itself.
    pub fn card_key(&self, index: usize) -> CardKey<K> {
        match self
            .options
            .get_card_id
            .as_ref()
            .and_then(|get_card_id| get_card_id(index))
        {
            Some(id) => CardKey::Id(id),
            None => CardKey::Index(index),
        }
    }

    // ---------------------------------------------------------------------
    // Imperative control surface

    /// Attaches the capability of the currently active surface.
    ///
    /// Adapters call this every time the active index changes. With no target attached,
    /// programmatic swipes complete synchronously.
    pub fn set_swipe_target(&mut self, target: Option<Box<dyn SwipeTarget>>) {
        self.target = target;
    }

    pub fn has_swipe_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn can_swipe(&self, direction: SwipeDirection) -> bool {
        self.options.directions.contains(direction)
            && !self.transition_lock
            && self.cursor < self.options.count
    }

    pub fn can_swipe_back(&self) -> bool {
        self.cursor > 0 && !self.history.is_empty()
    }

    /// Requests a programmatic commit on the active card.
    ///
    /// The lock is taken immediately, before the exit animation runs; any further request is
    /// rejected until the surface reports completion.
    pub fn swipe(&mut self, direction: SwipeDirection) -> bool {
        if !self.can_swipe(direction) {
            strace!(
                %direction,
                enabled = self.options.directions.contains(direction),
                locked = self.transition_lock,
                cursor = self.cursor,
                count = self.options.count,
                "swipe rejected"
            );
            return false;
        }

        self.transition_lock = true;
        self.lock_index = self.cursor;
        sdebug!(%direction, index = self.cursor, "swipe requested");

        match self.target.as_mut() {
            Some(target) => target.trigger_commit(direction),
            None => {
                self.on_swipe_start(direction);
                self.on_swipe_complete(direction);
            }
        }
        true
    }

    pub fn swipe_left(&mut self) -> bool {
        self.swipe(SwipeDirection::Left)
    }

    pub fn swipe_right(&mut self) -> bool {
        self.swipe(SwipeDirection::Right)
    }

    pub fn swipe_up(&mut self) -> bool {
        self.swipe(SwipeDirection::Up)
    }

    /// Undoes the most recent swipe.
    ///
    /// Independent of the transition lock. Once the retention cap has evicted every remaining
    /// entry this is a no-op even though the cursor is still positive.
    pub fn swipe_back(&mut self) -> bool {
        if self.cursor == 0 {
            strace!("swipe_back rejected: cursor at 0");
            return false;
        }
        let Some(_consumed) = self.history.pop_back() else {
            strace!(cursor = self.cursor, "swipe_back rejected: history empty");
            return false;
        };
        self.cursor -= 1;
        sdebug!(restored = _consumed, cursor = self.cursor, "swipe_back");

        if let Some(cb) = &self.options.on_swipe_back {
            cb();
        }
        self.notify();
        true
    }

    /// Moves the cursor directly. Not a swipe: nothing is recorded and it cannot be undone.
    ///
    /// Jumping below the history length drops the oldest entries so the history never outgrows
    /// the cursor.
    pub fn jump_to_card_index(&mut self, index: usize) -> bool {
        if index >= self.options.count {
            strace!(index, count = self.options.count, "jump rejected");
            return false;
        }
        self.cursor = index;
        self.trim_history_to_cursor();
        sdebug!(cursor = index, "jump_to_card_index");
        self.notify();
        true
    }

    // ---------------------------------------------------------------------
    // Notification sinks

    /// A swipe started on the active card.
    pub fn on_swipe_start(&mut self, direction: SwipeDirection) {
        if !self.transition_lock {
            self.transition_lock = true;
            self.lock_index = self.cursor;
        }
        self.in_motion = true;
        strace!(%direction, index = self.cursor, "on_swipe_start");
        if let Some(cb) = &self.options.on_swipe_start {
            cb(direction);
        }
    }

    /// The active card's exit animation finished: consume it.
    pub fn on_swipe_complete(&mut self, direction: SwipeDirection) {
        let index = self.cursor;
        if index >= self.options.count {
            strace!(index, "on_swipe_complete with no active card");
            self.release_lock();
            return;
        }

        self.push_history(index);
        self.cursor += 1;
        self.release_lock();
        sdebug!(%direction, index, cursor = self.cursor, "swipe committed");

        if let Some(cb) = self.options.on_committed(direction) {
            cb(index);
        }
        if let Some(cb) = &self.options.on_swipe_end {
            cb(index);
        }
        self.notify();
    }

    /// The release failed the commit test.
    pub fn on_swipe_cancel(&mut self) {
        strace!(index = self.cursor, "on_swipe_cancel");
        self.release_lock();
    }

    // ---------------------------------------------------------------------
    // Mailbox

    /// A sender surfaces use to post their transitions to this controller.
    pub fn sender(&self) -> SurfaceSender {
        self.mailbox.sender()
    }

    /// Drains the mailbox in posting order, applying each message as one full transition.
    ///
    /// Returns the number of messages processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Some(message) = self.mailbox.try_recv() {
            self.apply_message(message);
            processed += 1;
        }
        processed
    }

    /// Applies a single surface message.
    ///
    /// A message for a card that is no longer at the cursor (undo or jump moved it while the
    /// animation was in flight) is stale: it releases the lock it holds, if any, and is otherwise
    /// dropped.
    pub fn apply_message(&mut self, message: SurfaceMessage) {
        let SurfaceMessage { index, event } = message;
        if index != self.cursor {
            if matches!(event, SurfaceEvent::Committed(_) | SurfaceEvent::Cancelled) {
                self.abandon_commit(index);
            }
            strace!(index, cursor = self.cursor, ?event, "stale surface message");
            return;
        }
        match event {
            SurfaceEvent::Started(direction) => self.on_swipe_start(direction),
            SurfaceEvent::Committed(direction) => self.on_swipe_complete(direction),
            SurfaceEvent::Cancelled => self.on_swipe_cancel(),
        }
    }

    /// The surface for `index` went away without reporting back (its card left the window or
    /// the cards were replaced).
    ///
    /// Releases the lock if it is held for `index`. Nothing is consumed. Returns `true` if the
    /// lock was released.
    pub fn abandon_commit(&mut self, index: usize) -> bool {
        if !self.transition_lock || self.lock_index != index {
            return false;
        }
        sdebug!(index, cursor = self.cursor, "commit abandoned");
        self.release_lock();
        true
    }

    fn release_lock(&mut self) {
        self.transition_lock = false;
        self.in_motion = false;
    }

    fn push_history(&mut self, index: usize) {
        if self.options.history_limit == 0 {
            return;
        }
        self.history.push_back(index);
        self.enforce_history_limit();
    }

    fn enforce_history_limit(&mut self) {
        while self.history.len() > self.options.history_limit {
            self.history.pop_front();
        }
    }

    fn trim_history_to_cursor(&mut self) {
        while self.history.len() > self.cursor {
            self.history.pop_front();
        }
    }

    fn notify(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }
}

#[cfg(all(debug_assertions, feature = "tracing"))]
fn report_advisories<K>(options: &StackOptions<K>, screen_width: f32) {
    for advisory in options.advisories_for(screen_width) {
        swarn!(%advisory, "StackOptions advisory");
    }
}

#[cfg(not(all(debug_assertions, feature = "tracing")))]
fn report_advisories<K>(_options: &StackOptions<K>, _screen_width: f32) {}

impl<K> fmt::Debug for StackController<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackController")
            .field("options", &self.options)
            .field("screen_width", &self.screen_width)
            .field("swipe_threshold", &self.swipe_threshold)
            .field("cursor", &self.cursor)
            .field("history", &self.history)
            .field("transition_lock", &self.transition_lock)
            .field("in_motion", &self.in_motion)
            .field("has_swipe_target", &self.target.is_some())
            .finish_non_exhaustive()
    }
}
