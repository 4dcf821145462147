use alloc::vec::Vec;

/// A lightweight, serializable snapshot of the controller's discrete state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`. Snapshots are meant
/// for in-process restore (e.g. across a remount); nothing here is persisted by the crate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackState {
    /// Index of the next card to be decided.
    pub cursor: usize,
    /// Consumed indexes, most recent last.
    pub history: Vec<usize>,
    /// `true` while a commit is in flight.
    pub transition_lock: bool,
}

impl StackState {
    pub fn can_undo(&self) -> bool {
        self.cursor > 0 && !self.history.is_empty()
    }
}
