use std::sync::mpsc;

use crate::SwipeDirection;

/// A discrete transition reported by a gesture surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceEvent {
    /// A drag entered commit territory, or a programmatic swipe began.
    Started(SwipeDirection),
    /// The exit animation finished. Posted at most once per card.
    Committed(SwipeDirection),
    /// The release failed the commit test; the card springs back.
    Cancelled,
}

/// A surface event tagged with the index of the card the surface was attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceMessage {
    pub index: usize,
    pub event: SurfaceEvent,
}

/// The sending half of the controller's mailbox.
///
/// Posting never blocks, so it is safe to call from a sampling context with real-time
/// constraints. Messages are delivered in posting order by `StackController::pump`.
#[derive(Clone, Debug)]
pub struct SurfaceSender {
    tx: mpsc::Sender<SurfaceMessage>,
}

impl SurfaceSender {
    /// Posts an event for the card at `index`.
    ///
    /// Returns `false` when the controller is gone (widget unmounted); the message is dropped.
    pub fn post(&self, index: usize, event: SurfaceEvent) -> bool {
        self.tx.send(SurfaceMessage { index, event }).is_ok()
    }
}

#[derive(Debug)]
pub(crate) struct Mailbox {
    tx: mpsc::Sender<SurfaceMessage>,
    rx: mpsc::Receiver<SurfaceMessage>,
}

impl Mailbox {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub(crate) fn sender(&self) -> SurfaceSender {
        SurfaceSender {
            tx: self.tx.clone(),
        }
    }

    pub(crate) fn try_recv(&self) -> Option<SurfaceMessage> {
        self.rx.try_recv().ok()
    }
}
