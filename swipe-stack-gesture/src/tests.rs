use crate::*;

use std::sync::{Arc, Mutex};

use swipe_stack::{
    CardKey, StackController, StackOptions, SwipeDirection, SwipeDirections, SwipeTarget,
};

#[derive(Clone, Debug, PartialEq)]
enum Note {
    Start(SwipeDirection),
    Left(usize),
    Right(usize),
    Up(usize),
    End(usize),
    Back,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Note>>>);

impl Recorder {
    fn install<K>(&self, opts: StackOptions<K>) -> StackOptions<K> {
        let start = self.clone();
        let left = self.clone();
        let right = self.clone();
        let up = self.clone();
        let end = self.clone();
        let back = self.clone();
        opts.with_on_swipe_start(Some(move |d| start.push(Note::Start(d))))
            .with_on_swipe_left(Some(move |i| left.push(Note::Left(i))))
            .with_on_swipe_right(Some(move |i| right.push(Note::Right(i))))
            .with_on_swipe_up(Some(move |i| up.push(Note::Up(i))))
            .with_on_swipe_end(Some(move |i| end.push(Note::End(i))))
            .with_on_swipe_back(Some(move || back.push(Note::Back)))
    }

    fn push(&self, note: Note) {
        self.0.lock().unwrap().push(note);
    }

    fn take(&self) -> Vec<Note> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

fn deck(count: u32, rec: &Recorder) -> Deck<u32, String> {
    let opts = StackOptions::new(0).with_screen_width(400.0);
    Deck::new(
        (0..count).collect(),
        |card, index| format!("card {card} @ {index}"),
        rec.install(opts),
    )
}

/// Ticks at ~60fps until the controller releases its lock. Returns the last timestamp.
fn settle(deck: &mut Deck<u32, String>, mut now_ms: u64) -> u64 {
    for _ in 0..100 {
        now_ms += 16;
        deck.tick(now_ms);
        if !deck.controller().is_locked() {
            return now_ms;
        }
    }
    panic!("deck never settled");
}

fn surface_for(controller: &StackController, overlays: SwipeDirections) -> CardGestureSurface {
    let config = SurfaceConfig::from_controller(controller, overlays);
    CardGestureSurface::new(controller.cursor(), config, controller.sender())
}

#[test]
fn release_must_strictly_exceed_threshold() {
    let all = SwipeDirections::ALL;
    assert_eq!(decide_release(100.0, 100.0, all), None);
    assert_eq!(decide_release(-100.0, 100.0, all), None);
    assert_eq!(decide_release(100.01, 100.0, all), Some(SwipeDirection::Right));
    assert_eq!(decide_release(-100.01, 100.0, all), Some(SwipeDirection::Left));
    assert_eq!(decide_release(0.0, 100.0, all), None);
    assert_eq!(decide_release(f32::NAN, 100.0, all), None);

    let no_left = all.with(SwipeDirection::Left, false);
    assert_eq!(decide_release(-150.0, 100.0, no_left), None);
    assert_eq!(decide_release(150.0, 100.0, no_left), Some(SwipeDirection::Right));
}

#[test]
fn short_drag_cancels_immediately_and_springs_back() {
    let mut c = StackController::new(StackOptions::new(3).with_swipe_threshold(100.0));
    let mut s = surface_for(&c, SwipeDirections::NONE);

    assert!(s.begin_drag());
    assert!(s.update_drag(60.0, 12.0));
    assert_eq!(
        s.sample(),
        Some(GestureSample {
            dx: 60.0,
            dy: 12.0,
            dragging: true,
        })
    );
    assert_eq!(s.end_drag(0), None);
    assert_eq!(s.phase(), SurfacePhase::Idle);
    assert_eq!(s.sample(), None);

    // Posted before any animation frame runs.
    assert_eq!(c.pump(), 1);
    assert!(!c.is_locked());

    let mid = s.tick(100);
    assert!(mid.translate_x > 0.0 && mid.translate_x < 60.0);
    let rest = s.tick(SPRING_BACK_DURATION_MS);
    assert_eq!(rest, CardTransform::REST);
    assert!(!s.is_animating());
}

#[test]
fn drag_feedback_depends_only_on_horizontal_distance() {
    let c = StackController::new(StackOptions::new(1).with_screen_width(400.0));
    let mut s = surface_for(&c, SwipeDirections::NONE);
    s.begin_drag();
    s.update_drag(-200.0, 35.0);
    let t = s.transform();
    assert_eq!(t.translate_x, -200.0);
    assert_eq!(t.translate_y, -MAX_DRAG_LIFT * 0.5);
    assert!((t.scale - (1.0 - MAX_DRAG_SCALE_DROP * 0.5)).abs() < 1e-6);

    s.update_drag(200.0, -80.0);
    assert_eq!(s.transform().translate_y, t.translate_y);
}

#[test]
fn crossing_back_under_the_threshold_still_cancels() {
    let rec = Recorder::default();
    let mut c = StackController::new(rec.install(StackOptions::new(3).with_swipe_threshold(100.0)));
    let mut s = surface_for(&c, SwipeDirections::NONE);

    s.begin_drag();
    s.update_drag(150.0, 0.0);
    s.update_drag(170.0, 0.0);
    s.update_drag(40.0, 0.0);
    assert_eq!(s.end_drag(0), None);

    assert_eq!(c.pump(), 2);
    assert!(!c.is_locked());
    assert_eq!(c.cursor(), 0);
    assert_eq!(rec.take(), [Note::Start(SwipeDirection::Right)]);
}

#[test]
fn disabled_direction_drag_springs_back() {
    let rec = Recorder::default();
    let opts = StackOptions::new(3)
        .with_swipe_threshold(100.0)
        .with_direction_enabled(SwipeDirection::Right, false);
    let mut c = StackController::new(rec.install(opts));
    let mut s = surface_for(&c, SwipeDirections::NONE);

    s.begin_drag();
    s.update_drag(300.0, 0.0);
    assert_eq!(s.end_drag(0), None);
    c.pump();
    assert_eq!(c.cursor(), 0);
    assert!(rec.take().is_empty());
}

#[test]
fn committed_is_posted_once_after_the_exit_animation() {
    let mut c = StackController::new(StackOptions::new(3).with_swipe_threshold(50.0));
    let mut s = surface_for(&c, SwipeDirections::NONE);

    s.begin_drag();
    s.update_drag(-80.0, 0.0);
    assert_eq!(s.end_drag(0), Some(SwipeDirection::Left));
    assert_eq!(s.phase(), SurfacePhase::Committing(SwipeDirection::Left));

    // Started only.
    assert_eq!(c.pump(), 1);
    assert!(c.is_locked());

    s.tick(COMMIT_DURATION_MS - 1);
    assert_eq!(c.pump(), 0);
    assert_eq!(c.cursor(), 0);

    s.tick(COMMIT_DURATION_MS);
    assert_eq!(s.phase(), SurfacePhase::Idle);
    s.tick(COMMIT_DURATION_MS + 16);
    assert_eq!(c.pump(), 1);
    assert_eq!(c.cursor(), 1);
    assert!(!c.is_locked());
}

#[test]
fn drag_is_ignored_while_committing() {
    let c = StackController::new(StackOptions::new(3).with_swipe_threshold(50.0));
    let mut s = surface_for(&c, SwipeDirections::NONE);
    s.trigger(SwipeDirection::Right, 0);
    assert!(!s.begin_drag());
    assert!(!s.update_drag(10.0, 0.0));
    assert_eq!(s.end_drag(0), None);
    // A second trigger does not restart the exit.
    s.trigger(SwipeDirection::Left, 10);
    assert_eq!(s.phase(), SurfacePhase::Committing(SwipeDirection::Right));
}

#[test]
fn programmatic_trigger_abandons_a_drag() {
    let rec = Recorder::default();
    let mut c = StackController::new(rec.install(StackOptions::new(3).with_screen_height(800.0)));
    let mut s = surface_for(&c, SwipeDirections::NONE);
    s.begin_drag();
    s.update_drag(30.0, 0.0);
    s.trigger(SwipeDirection::Up, 0);
    assert_eq!(s.phase(), SurfacePhase::Committing(SwipeDirection::Up));
    assert_eq!(s.sample(), None);

    let mid = s.tick(75);
    assert!(mid.translate_y < 0.0);
    assert!(mid.translate_y > -(800.0 + OFFSCREEN_MARGIN));

    s.tick(COMMIT_DURATION_MS);
    assert_eq!(s.phase(), SurfacePhase::Idle);
    assert_eq!(c.pump(), 2);
    assert_eq!(
        rec.take(),
        [Note::Start(SwipeDirection::Up), Note::Up(0), Note::End(0)]
    );
}

#[test]
fn handle_delivers_triggers_on_next_tick() {
    let c = StackController::new(StackOptions::new(3));
    let mut s = surface_for(&c, SwipeDirections::NONE);
    let mut handle = s.handle();
    handle.trigger_commit(SwipeDirection::Left);
    assert_eq!(s.phase(), SurfacePhase::Idle);
    s.tick(0);
    assert_eq!(s.phase(), SurfacePhase::Committing(SwipeDirection::Left));
}

#[test]
fn surface_can_sample_on_another_thread() {
    let mut c = StackController::new(StackOptions::new(3).with_swipe_threshold(50.0));
    let mut s = surface_for(&c, SwipeDirections::NONE);

    let worker = std::thread::spawn(move || {
        s.begin_drag();
        for dx in [-10.0, -30.0, -60.0, -80.0] {
            s.update_drag(dx, 0.0);
        }
        s.end_drag(0);
        let mut now_ms = 0;
        while s.phase() != SurfacePhase::Idle {
            now_ms += 16;
            s.tick(now_ms);
        }
    });
    worker.join().unwrap();

    assert_eq!(c.pump(), 2);
    assert_eq!(c.cursor(), 1);
    assert_eq!(c.history().collect::<Vec<_>>(), [0]);
}

#[test]
fn scenario_basic_swipe_flow_through_deck() {
    let rec = Recorder::default();
    let mut deck = deck(5, &rec);
    let mut now_ms = 0;

    for _ in 0..3 {
        assert!(deck.swipe_right());
        assert!(!deck.swipe_left());
        now_ms = settle(&mut deck, now_ms);
    }

    assert_eq!(deck.controller().cursor(), 3);
    assert_eq!(deck.controller().history().collect::<Vec<_>>(), [0, 1, 2]);
    let notes = rec.take();
    let rights: Vec<usize> = notes
        .iter()
        .filter_map(|n| match n {
            Note::Right(i) => Some(*i),
            _ => None,
        })
        .collect();
    assert_eq!(rights, [0, 1, 2]);
    // Direction-specific first, then the generic end notification.
    assert_eq!(
        &notes[..3],
        [
            Note::Start(SwipeDirection::Right),
            Note::Right(0),
            Note::End(0)
        ]
    );

    // Scenario: undo after swipe.
    assert!(deck.swipe_back());
    assert_eq!(deck.controller().cursor(), 2);
    assert_eq!(deck.controller().history().collect::<Vec<_>>(), [0, 1]);
    assert_eq!(rec.take(), [Note::Back]);
}

#[test]
fn gesture_commit_through_deck() {
    let rec = Recorder::default();
    let mut deck = deck(4, &rec);
    deck.tick(0);

    assert!(deck.drag_begin());
    assert!(deck.drag_update(150.0, 0.0));
    assert_eq!(deck.drag_end(), Some(SwipeDirection::Right));

    deck.tick(16);
    assert!(deck.controller().is_locked());
    assert!(!deck.swipe_up());

    let now_ms = settle(&mut deck, 16);
    assert!(now_ms >= COMMIT_DURATION_MS);
    assert_eq!(deck.controller().cursor(), 1);
    assert_eq!(
        rec.take(),
        [
            Note::Start(SwipeDirection::Right),
            Note::Right(0),
            Note::End(0)
        ]
    );

    let rendered = deck.render();
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[0].card.index, 1);
    assert!(rendered[0].interactive);
    assert!(!rendered[1].interactive);
    assert_eq!(rendered[0].content, "card 1 @ 1");
    assert_eq!(rendered[2].key, CardKey::Index(3));
}

#[test]
fn passive_cards_animate_one_slot_forward() {
    let rec = Recorder::default();
    let mut deck = deck(5, &rec);
    deck.tick(0);
    assert!((deck.render()[1].transform.scale - 0.95).abs() < 1e-6);

    deck.swipe_left();
    let now_ms = settle(&mut deck, 0);

    let rendered = deck.render();
    assert_eq!(rendered[0].card.index, 1);
    assert!(rendered[0].transform.scale < 1.0);
    assert!(rendered[0].transform.translate_y < 0.0);
    // The card that just entered the window snaps into its slot.
    assert_eq!(rendered[2].card.index, 3);
    assert!((rendered[2].transform.scale - 0.9).abs() < 1e-6);

    deck.tick(now_ms + RESTACK_DURATION_MS);
    let rendered = deck.render();
    assert_eq!(rendered[0].transform, CardTransform::REST);
    assert!((rendered[1].transform.scale - 0.95).abs() < 1e-6);
    assert_eq!(rendered[1].transform.translate_y, -20.0);
    assert!(!deck.is_animating());
}

#[test]
fn overlay_opacity_only_for_labelled_directions() {
    let opts = StackOptions::new(0).with_swipe_threshold(100.0);
    let mut deck: Deck<u32, u32, swipe_stack::CardId, &'static str> =
        Deck::new(vec![1, 2, 3], |card, _| *card, opts).with_overlay_labels(OverlayLabels {
            left: None,
            right: Some("LIKE"),
            up: Some("SUPER"),
        });
    deck.tick(0);
    deck.drag_begin();
    deck.drag_update(50.0, 0.0);

    let t = deck.render()[0].transform;
    assert_eq!(t.overlay_opacity(SwipeDirection::Right), Some(0.5));
    assert_eq!(t.overlay_opacity(SwipeDirection::Left), None);
    assert_eq!(t.overlay_opacity(SwipeDirection::Up), Some(0.0));

    deck.drag_update(-250.0, 0.0);
    assert_eq!(
        deck.render()[0].transform.overlay_opacity(SwipeDirection::Right),
        Some(0.0)
    );
    assert_eq!(deck.overlay_labels().get(SwipeDirection::Right), Some(&"LIKE"));

    let mut plain: Deck<u32, u32> = Deck::new(vec![1], |card, _| *card, StackOptions::new(0));
    plain.drag_begin();
    plain.drag_update(50.0, 0.0);
    let t = plain.render()[0].transform;
    assert!(SwipeDirection::ALL.iter().all(|&d| t.overlay_opacity(d).is_none()));
}

#[test]
fn undo_during_commit_drops_the_stale_completion() {
    let rec = Recorder::default();
    let mut deck = deck(5, &rec);
    let mut now_ms = 0;
    for _ in 0..2 {
        deck.swipe_right();
        now_ms = settle(&mut deck, now_ms);
    }
    rec.take();

    assert!(deck.swipe_left());
    now_ms += 16;
    deck.tick(now_ms);
    assert!(deck.swipe_back());
    assert_eq!(deck.controller().cursor(), 1);
    assert!(deck.controller().is_locked());

    settle(&mut deck, now_ms);
    assert_eq!(deck.controller().cursor(), 1);
    assert_eq!(deck.controller().history().collect::<Vec<_>>(), [0]);
    assert_eq!(rec.take(), [Note::Start(SwipeDirection::Left), Note::Back]);

    let rendered = deck.render();
    assert_eq!(rendered[0].card.index, 1);
    assert_eq!(rendered[1].card.index, 2);
    assert_eq!(rendered[1].transform.translate_x, 0.0);
}

#[test]
fn gesture_decision_locks_before_the_next_frame() {
    let rec = Recorder::default();
    let mut deck = deck(4, &rec);
    deck.tick(0);

    deck.drag_begin();
    deck.drag_update(150.0, 0.0);
    assert!(deck.controller().is_locked());
    assert_eq!(deck.drag_end(), Some(SwipeDirection::Right));
    assert!(deck.controller().is_locked());
    assert!(!deck.swipe_left());

    settle(&mut deck, 0);
    assert_eq!(deck.controller().cursor(), 1);
    assert_eq!(
        rec.take(),
        [
            Note::Start(SwipeDirection::Right),
            Note::Right(0),
            Note::End(0)
        ]
    );
}

#[test]
fn cancelled_drag_releases_the_lock_before_the_next_frame() {
    let rec = Recorder::default();
    let mut deck = deck(4, &rec);
    deck.tick(0);

    deck.drag_begin();
    deck.drag_update(-150.0, 0.0);
    assert!(deck.controller().is_locked());
    deck.drag_update(-20.0, 0.0);
    assert_eq!(deck.drag_end(), None);
    assert!(!deck.controller().is_locked());
    assert!(deck.swipe_up());
}

#[test]
fn jump_during_commit_releases_the_lock() {
    let rec = Recorder::default();
    let mut deck = deck(10, &rec);
    assert!(deck.swipe_right());
    assert!(deck.jump_to_card_index(5));
    assert!(!deck.controller().is_locked());

    let mut now_ms = 0;
    for _ in 0..20 {
        now_ms += 16;
        deck.tick(now_ms);
    }
    assert_eq!(deck.controller().cursor(), 5);
    assert!(rec.take().is_empty());

    assert!(deck.swipe_right());
    settle(&mut deck, now_ms);
    assert_eq!(deck.controller().cursor(), 6);
    assert_eq!(deck.controller().history().collect::<Vec<_>>(), [5]);
    assert_eq!(
        rec.take(),
        [
            Note::Start(SwipeDirection::Right),
            Note::Right(5),
            Note::End(5)
        ]
    );
}

#[test]
fn replacing_cards_during_commit_releases_the_lock() {
    let rec = Recorder::default();
    let mut deck = deck(10, &rec);
    assert!(deck.swipe_right());
    deck.tick(16);
    assert_eq!(rec.take(), [Note::Start(SwipeDirection::Right)]);

    deck.set_cards((0..5).collect());
    assert!(!deck.controller().is_locked());

    let mut now_ms = 16;
    for _ in 0..20 {
        now_ms += 16;
        deck.tick(now_ms);
    }
    assert_eq!(deck.controller().cursor(), 0);
    assert!(rec.take().is_empty());

    assert!(deck.swipe_right());
    settle(&mut deck, now_ms);
    assert_eq!(deck.controller().cursor(), 1);
    assert_eq!(deck.controller().history().collect::<Vec<_>>(), [0]);
}

#[test]
fn undo_during_commit_with_a_single_card_window() {
    let rec = Recorder::default();
    let opts = StackOptions::new(0)
        .with_screen_width(400.0)
        .with_stack_size(1);
    let mut deck: Deck<u32, String> = Deck::new(
        (0..5).collect(),
        |card, index| format!("card {card} @ {index}"),
        rec.install(opts),
    );
    deck.swipe_right();
    let mut now_ms = settle(&mut deck, 0);

    assert!(deck.swipe_right());
    now_ms += 16;
    deck.tick(now_ms);
    assert!(deck.swipe_back());
    assert_eq!(deck.controller().cursor(), 0);
    assert!(!deck.controller().is_locked());

    for _ in 0..20 {
        now_ms += 16;
        deck.tick(now_ms);
    }
    assert_eq!(deck.controller().cursor(), 0);
    assert!(deck.controller().history().next().is_none());
    let rendered = deck.render();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].transform, CardTransform::REST);

    assert!(deck.swipe_right());
    settle(&mut deck, now_ms);
    assert_eq!(deck.controller().cursor(), 1);
    assert_eq!(deck.controller().history().collect::<Vec<_>>(), [0]);
}

#[test]
fn gestures_only_reach_the_active_card() {
    let rec = Recorder::default();
    let mut deck = deck(2, &rec);
    let mut now_ms = 0;
    for _ in 0..2 {
        deck.swipe_up();
        now_ms = settle(&mut deck, now_ms);
    }
    assert_eq!(deck.controller().cursor(), 2);
    assert!(deck.render().is_empty());
    assert!(!deck.drag_begin());
    assert!(!deck.swipe_right());
}

#[test]
fn jump_rebuilds_the_window_without_history() {
    let rec = Recorder::default();
    let mut deck = deck(10, &rec);
    deck.swipe_right();
    settle(&mut deck, 0);
    rec.take();

    assert!(deck.jump_to_card_index(6));
    let indexes: Vec<usize> = deck.render().iter().map(|r| r.card.index).collect();
    assert_eq!(indexes, [6, 7, 8]);
    assert_eq!(deck.controller().history().collect::<Vec<_>>(), [0]);
    assert!(rec.take().is_empty());

    assert!(!deck.jump_to_card_index(10));
}

#[test]
fn replacing_cards_resets_surfaces() {
    let rec = Recorder::default();
    let mut deck = deck(4, &rec);
    let mut now_ms = 0;
    for _ in 0..3 {
        deck.swipe_right();
        now_ms = settle(&mut deck, now_ms);
    }
    deck.set_cards(vec![7, 8]);
    assert_eq!(deck.controller().cursor(), 2);
    assert!(deck.render().is_empty());
    assert!(!deck.swipe_right());

    assert!(deck.swipe_back());
    let rendered = deck.render();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].content, "card 8 @ 1");
}

#[test]
fn cards_with_ids_are_keyed_by_id() {
    let opts = StackOptions::new_keyed(0);
    let deck: Deck<(&'static str, u32), u32, String> = Deck::new(
        vec![("a", 1), ("b", 2), ("", 3)],
        |card, _| card.1,
        opts,
    )
    .with_card_id(|card| (!card.0.is_empty()).then(|| card.0.to_string()));

    let keys: Vec<CardKey<String>> = deck.render().into_iter().map(|r| r.key).collect();
    assert_eq!(
        keys,
        [
            CardKey::Id("a".to_string()),
            CardKey::Id("b".to_string()),
            CardKey::Index(2)
        ]
    );
}
