use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::controller::StackController;
use crate::{CardId, SwipeDirection, SwipeDirections};

pub const DEFAULT_STACK_SIZE: usize = 3;
pub const DEFAULT_SCREEN_WIDTH: f32 = 390.0;
pub const DEFAULT_SCREEN_HEIGHT: f32 = 844.0;
/// Fraction of the screen width a drag must exceed to commit, when no explicit threshold is set.
pub const DEFAULT_THRESHOLD_RATIO: f32 = 0.25;
pub const DEFAULT_CARD_VERTICAL_OFFSET: f32 = 20.0;
pub const DEFAULT_CARD_SCALE_STEP: f32 = 0.05;
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Fired when a surface reports that a swipe started (drag entered commit territory, or a
/// programmatic swipe began).
pub type OnSwipeStartCallback = Arc<dyn Fn(SwipeDirection) + Send + Sync>;

/// Fired with the consumed card's index (its position in the original card sequence).
pub type OnCardCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Fired after a successful undo.
pub type OnSwipeBackCallback = Arc<dyn Fn() + Send + Sync>;

/// Fired whenever the cursor, card count or stack size changes.
pub type OnChangeCallback<K> = Arc<dyn Fn(&StackController<K>) + Send + Sync>;

/// Resolves the intrinsic id of the card at an index, if it has one.
pub type CardIdFn<K> = Arc<dyn Fn(usize) -> Option<K> + Send + Sync>;

/// Screen width configuration.
///
/// The platform query is injected here and resolved exactly once, by `StackController::new`.
#[derive(Clone)]
pub enum ScreenWidth {
    Value(f32),
    /// A lazily evaluated width provider (called by `StackController::new`).
    Provider(Arc<dyn Fn() -> f32 + Send + Sync>),
}

impl ScreenWidth {
    pub(crate) fn resolve(&self) -> f32 {
        match self {
            Self::Value(v) => *v,
            Self::Provider(f) => f(),
        }
    }
}

impl Default for ScreenWidth {
    fn default() -> Self {
        Self::Value(DEFAULT_SCREEN_WIDTH)
    }
}

impl fmt::Debug for ScreenWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// A non-fatal configuration problem.
///
/// Reported through the advisory log channel in debug builds. The controller still builds and
/// runs with the offending value (or a clamped one, for `initial_card_index`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigAdvisory {
    ZeroStackSize,
    NonPositiveThreshold(f32),
    ScaleStepOutOfRange(f32),
    InitialIndexOutOfRange { index: usize, count: usize },
    ZeroHistoryLimit,
}

impl fmt::Display for ConfigAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroStackSize => f.write_str("stack_size is 0; no card will be visible"),
            Self::NonPositiveThreshold(t) => {
                write!(f, "swipe_threshold must be positive and finite (got {t})")
            }
            Self::ScaleStepOutOfRange(s) => {
                write!(f, "card_scale_step should lie in [0, 1] (got {s})")
            }
            Self::InitialIndexOutOfRange { index, count } => write!(
                f,
                "initial_card_index {index} exceeds card count {count}; clamped"
            ),
            Self::ZeroHistoryLimit => f.write_str("history_limit is 0; undo is disabled"),
        }
    }
}

/// Configuration for [`crate::StackController`].
///
/// Cheap to clone: callbacks live in `Arc`s, so adapters can tweak a field and call
/// `StackController::set_options` without reallocating closures.
pub struct StackOptions<K = CardId> {
    /// Number of cards (length of the caller's card sequence).
    pub count: usize,
    pub get_card_id: Option<CardIdFn<K>>,

    /// Number of simultaneously visible cards.
    pub stack_size: usize,
    pub screen_width: ScreenWidth,
    /// Only used for the off-screen distance of an upward exit.
    pub screen_height: f32,
    /// Displacement magnitude a release must strictly exceed to commit.
    ///
    /// `None` resolves to `screen_width * DEFAULT_THRESHOLD_RATIO` at construction.
    pub swipe_threshold: Option<f32>,
    pub card_vertical_offset: f32,
    pub card_scale_step: f32,
    pub initial_card_index: usize,
    pub directions: SwipeDirections,
    /// Retention cap for the undo history. Oldest entries are evicted past this count.
    pub history_limit: usize,

    pub on_swipe_start: Option<OnSwipeStartCallback>,
    pub on_swipe_left: Option<OnCardCallback>,
    pub on_swipe_right: Option<OnCardCallback>,
    pub on_swipe_up: Option<OnCardCallback>,
    /// Fired after the direction-specific callback for every committed swipe.
    pub on_swipe_end: Option<OnCardCallback>,
    pub on_swipe_back: Option<OnSwipeBackCallback>,
    pub on_change: Option<OnChangeCallback<K>>,
}

impl<K> Clone for StackOptions<K> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            get_card_id: self.get_card_id.clone(),
            stack_size: self.stack_size,
            screen_width: self.screen_width.clone(),
            screen_height: self.screen_height,
            swipe_threshold: self.swipe_threshold,
            card_vertical_offset: self.card_vertical_offset,
            card_scale_step: self.card_scale_step,
            initial_card_index: self.initial_card_index,
            directions: self.directions,
            history_limit: self.history_limit,
            on_swipe_start: self.on_swipe_start.clone(),
            on_swipe_left: self.on_swipe_left.clone(),
            on_swipe_right: self.on_swipe_right.clone(),
            on_swipe_up: self.on_swipe_up.clone(),
            on_swipe_end: self.on_swipe_end.clone(),
            on_swipe_back: self.on_swipe_back.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl StackOptions<CardId> {
    /// Creates options for a stack whose cards have no intrinsic id (keyed by index).
    pub fn new(count: usize) -> Self {
        Self::with_defaults(count, None)
    }
}

impl<K> StackOptions<K> {
    /// Creates options with an intrinsic id lookup.
    ///
    /// `get_card_id(i)` should return a stable identity for the card at index `i`, or `None` to
    /// fall back to the index.
    pub fn new_with_id(
        count: usize,
        get_card_id: impl Fn(usize) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        Self::with_defaults(count, Some(Arc::new(get_card_id)))
    }

    /// Creates options keyed by `K` with no id lookup yet (e.g. an adapter installs one later).
    ///
    /// Until `get_card_id` is set, every card is keyed by its index.
    pub fn new_keyed(count: usize) -> Self {
        Self::with_defaults(count, None)
    }

    fn with_defaults(count: usize, get_card_id: Option<CardIdFn<K>>) -> Self {
        Self {
            count,
            get_card_id,
            stack_size: DEFAULT_STACK_SIZE,
            screen_width: ScreenWidth::default(),
            screen_height: DEFAULT_SCREEN_HEIGHT,
            swipe_threshold: None,
            card_vertical_offset: DEFAULT_CARD_VERTICAL_OFFSET,
            card_scale_step: DEFAULT_CARD_SCALE_STEP,
            initial_card_index: 0,
            directions: SwipeDirections::ALL,
            history_limit: DEFAULT_HISTORY_LIMIT,
            on_swipe_start: None,
            on_swipe_left: None,
            on_swipe_right: None,
            on_swipe_up: None,
            on_swipe_end: None,
            on_swipe_back: None,
            on_change: None,
        }
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    pub fn with_screen_width(mut self, width: f32) -> Self {
        self.screen_width = ScreenWidth::Value(width);
        self
    }

    pub fn with_screen_width_provider(
        mut self,
        provider: impl Fn() -> f32 + Send + Sync + 'static,
    ) -> Self {
        self.screen_width = ScreenWidth::Provider(Arc::new(provider));
        self
    }

    pub fn with_screen_height(mut self, height: f32) -> Self {
        self.screen_height = height;
        self
    }

    pub fn with_swipe_threshold(mut self, threshold: f32) -> Self {
        self.swipe_threshold = Some(threshold);
        self
    }

    pub fn with_card_vertical_offset(mut self, offset: f32) -> Self {
        self.card_vertical_offset = offset;
        self
    }

    pub fn with_card_scale_step(mut self, step: f32) -> Self {
        self.card_scale_step = step;
        self
    }

    pub fn with_initial_card_index(mut self, index: usize) -> Self {
        self.initial_card_index = index;
        self
    }

    pub fn with_directions(mut self, directions: SwipeDirections) -> Self {
        self.directions = directions;
        self
    }

    pub fn with_direction_enabled(mut self, direction: SwipeDirection, enabled: bool) -> Self {
        self.directions = self.directions.with(direction, enabled);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_on_swipe_start(
        mut self,
        f: Option<impl Fn(SwipeDirection) + Send + Sync + 'static>,
    ) -> Self {
        self.on_swipe_start = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_swipe_left(mut self, f: Option<impl Fn(usize) + Send + Sync + 'static>) -> Self {
        self.on_swipe_left = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_swipe_right(
        mut self,
        f: Option<impl Fn(usize) + Send + Sync + 'static>,
    ) -> Self {
        self.on_swipe_right = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_swipe_up(mut self, f: Option<impl Fn(usize) + Send + Sync + 'static>) -> Self {
        self.on_swipe_up = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_swipe_end(mut self, f: Option<impl Fn(usize) + Send + Sync + 'static>) -> Self {
        self.on_swipe_end = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_swipe_back(mut self, f: Option<impl Fn() + Send + Sync + 'static>) -> Self {
        self.on_swipe_back = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_change(
        mut self,
        f: Option<impl Fn(&StackController<K>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = f.map(|f| Arc::new(f) as _);
        self
    }

    /// Threshold after resolving the screen width default.
    pub(crate) fn resolve_threshold(&self, screen_width: f32) -> f32 {
        self.swipe_threshold
            .unwrap_or(screen_width * DEFAULT_THRESHOLD_RATIO)
    }

    pub(crate) fn on_committed(&self, direction: SwipeDirection) -> Option<&OnCardCallback> {
        match direction {
            SwipeDirection::Left => self.on_swipe_left.as_ref(),
            SwipeDirection::Right => self.on_swipe_right.as_ref(),
            SwipeDirection::Up => self.on_swipe_up.as_ref(),
        }
    }

    /// Lists semantically invalid settings.
    ///
    /// The threshold check uses the explicit `swipe_threshold` when set, otherwise the value the
    /// screen width (as currently configured) would resolve to.
    pub fn advisories(&self) -> Vec<ConfigAdvisory> {
        self.advisories_for(self.screen_width.resolve())
    }

    pub(crate) fn advisories_for(&self, screen_width: f32) -> Vec<ConfigAdvisory> {
        let mut out = Vec::new();
        if self.stack_size == 0 {
            out.push(ConfigAdvisory::ZeroStackSize);
        }
        let threshold = self.resolve_threshold(screen_width);
        if !(threshold.is_finite() && threshold > 0.0) {
            out.push(ConfigAdvisory::NonPositiveThreshold(threshold));
        }
        if !(0.0..=1.0).contains(&self.card_scale_step) {
            out.push(ConfigAdvisory::ScaleStepOutOfRange(self.card_scale_step));
        }
        if self.initial_card_index > self.count {
            out.push(ConfigAdvisory::InitialIndexOutOfRange {
                index: self.initial_card_index,
                count: self.count,
            });
        }
        if self.history_limit == 0 {
            out.push(ConfigAdvisory::ZeroHistoryLimit);
        }
        out
    }
}

impl<K> fmt::Debug for StackOptions<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackOptions")
            .field("count", &self.count)
            .field("stack_size", &self.stack_size)
            .field("screen_width", &self.screen_width)
            .field("screen_height", &self.screen_height)
            .field("swipe_threshold", &self.swipe_threshold)
            .field("card_vertical_offset", &self.card_vertical_offset)
            .field("card_scale_step", &self.card_scale_step)
            .field("initial_card_index", &self.initial_card_index)
            .field("directions", &self.directions)
            .field("history_limit", &self.history_limit)
            .finish_non_exhaustive()
    }
}
