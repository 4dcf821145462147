// Example: programmatic swipes, undo and jump without any animation layer.
use swipe_stack::{StackController, StackOptions};

fn main() {
    let opts = StackOptions::new(10)
        .with_on_swipe_right(Some(|i| println!("liked card {i}")))
        .with_on_swipe_left(Some(|i| println!("passed card {i}")));
    let mut c = StackController::new(opts);

    // Without a swipe target, a swipe completes immediately.
    c.swipe_right();
    c.swipe_left();
    c.swipe_right();
    println!("cursor={} history={:?}", c.cursor(), c.history().collect::<Vec<_>>());

    c.swipe_back();
    println!("after undo: cursor={} range={:?}", c.cursor(), c.visible_range());

    c.for_each_visible_card(|card| {
        println!(
            "  card={} position={} scale={:.2} offset={}",
            card.index, card.stack_position, card.depth_scale, card.vertical_offset
        );
    });

    c.jump_to_card_index(8);
    println!("after jump: cursor={} range={:?}", c.cursor(), c.visible_range());
}
