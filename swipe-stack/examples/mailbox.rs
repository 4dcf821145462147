// Example: a custom swipe target that reports back through the mailbox.
use swipe_stack::{StackController, StackOptions, SurfaceEvent, SwipeDirection};

fn main() {
    let mut c = StackController::new(
        StackOptions::new(5).with_on_swipe_end(Some(|i| println!("card {i} left the stack"))),
    );

    // A real adapter would start an exit animation here and post `Committed` when it ends.
    let tx = c.sender();
    let index = c.cursor();
    c.set_swipe_target(Some(Box::new(move |direction: SwipeDirection| {
        tx.post(index, SurfaceEvent::Started(direction));
        tx.post(index, SurfaceEvent::Committed(direction));
    })));

    c.swipe_up();
    println!("locked before pump: {}", c.is_locked());
    let applied = c.pump();
    println!("applied={applied} cursor={} locked={}", c.cursor(), c.is_locked());
}
