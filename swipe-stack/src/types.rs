use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
}

impl SwipeDirection {
    pub const ALL: [SwipeDirection; 3] = [Self::Left, Self::Right, Self::Up];

    /// Maps a horizontal release displacement to a direction.
    ///
    /// Positive is right; zero and negative are left.
    pub fn from_horizontal(dx: f32) -> Self {
        if dx > 0.0 { Self::Right } else { Self::Left }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
        })
    }
}

/// Per-direction enable flags.
///
/// A disabled direction rejects both gesture-driven and programmatic commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwipeDirections {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

impl SwipeDirections {
    pub const ALL: Self = Self {
        left: true,
        right: true,
        up: true,
    };
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
    };

    pub fn contains(&self, direction: SwipeDirection) -> bool {
        match direction {
            SwipeDirection::Left => self.left,
            SwipeDirection::Right => self.right,
            SwipeDirection::Up => self.up,
        }
    }

    pub fn with(mut self, direction: SwipeDirection, enabled: bool) -> Self {
        match direction {
            SwipeDirection::Left => self.left = enabled,
            SwipeDirection::Right => self.right = enabled,
            SwipeDirection::Up => self.up = enabled,
        }
        self
    }
}

impl Default for SwipeDirections {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl StackRange {
    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

/// Identity used to correlate a rendered card with its datum across re-renders.
///
/// Cards with a caller-supplied id follow that id; the rest fall back to their absolute index,
/// which means they are recreated (not reused) if upstream ordering changes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardKey<K> {
    Id(K),
    Index(usize),
}

/// Layout of one visible card, derived from the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackCard {
    pub index: usize,
    /// `index - cursor`; 0 is the active (topmost) card.
    pub stack_position: usize,
    /// `1 - stack_position * card_scale_step`. Not clamped.
    pub depth_scale: f32,
    pub vertical_offset: f32,
    /// `count - index`; earlier cards always sit above later ones.
    pub layer_order: usize,
}

impl StackCard {
    pub fn is_active(&self) -> bool {
        self.stack_position == 0
    }
}

pub type CardId = u64;
