use crate::SwipeDirection;

/// The capability the controller holds on whichever surface is currently active.
///
/// The controller swaps the target every time the active index changes. Implementations must not
/// call back into the controller synchronously; report progress through a
/// [`crate::SurfaceSender`] instead.
pub trait SwipeTarget: Send {
    fn trigger_commit(&mut self, direction: SwipeDirection);
}

impl<F: FnMut(SwipeDirection) + Send> SwipeTarget for F {
    fn trigger_commit(&mut self, direction: SwipeDirection) {
        self(direction);
    }
}
