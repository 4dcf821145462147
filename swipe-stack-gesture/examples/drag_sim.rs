use swipe_stack::StackOptions;
use swipe_stack_gesture::{Deck, OverlayLabels};

fn main() {
    // Example: a deck driven by a simulated touch drag, without holding any UI objects.
    //
    // An adapter would:
    // - forward touch events for the active card to drag_begin/drag_update/drag_end
    // - call tick(now_ms) in a frame loop / timer
    // - draw render() back to front, applying each card's transform
    let opts = StackOptions::new(0)
        .with_screen_width(400.0)
        .with_on_swipe_right(Some(|i| println!("liked card {i}")));
    let mut deck: Deck<&str, String, swipe_stack::CardId, &str> = Deck::new(
        vec!["ada", "grace", "linus", "ken", "barbara"],
        |name, index| format!("#{index} {name}"),
        opts,
    )
    .with_overlay_labels(OverlayLabels {
        left: Some("NOPE"),
        right: Some("LIKE"),
        up: None,
    });

    let mut now_ms = 0u64;
    deck.tick(now_ms);
    deck.drag_begin();
    for dx in (0..=160).step_by(20) {
        now_ms += 16;
        deck.drag_update(dx as f32, 0.0);
        deck.tick(now_ms);
        let rendered = deck.render();
        let top = &rendered[0];
        println!(
            "t={now_ms} dx={dx} scale={:.3} like={:?}",
            top.transform.scale, top.transform.overlay_right
        );
    }
    println!("released: {:?}", deck.drag_end());

    while deck.is_animating() {
        now_ms += 16;
        deck.tick(now_ms);
    }

    for card in deck.render().iter().rev() {
        println!(
            "{} y={} scale={:.2}",
            card.content, card.transform.translate_y, card.transform.scale
        );
    }
}
