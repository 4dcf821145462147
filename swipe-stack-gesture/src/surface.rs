use std::sync::mpsc;

use swipe_stack::{
    StackCard, StackController, SurfaceEvent, SurfaceSender, SwipeDirection, SwipeDirections,
    SwipeTarget,
};

use crate::tween::{Animated, Easing};

/// Exit animation length. Short on purpose: the card is already moving when it commits.
pub const COMMIT_DURATION_MS: u64 = 150;
pub const SPRING_BACK_DURATION_MS: u64 = 250;
/// How long passive cards take to move one slot forward when the window shifts.
pub const RESTACK_DURATION_MS: u64 = 200;
/// Extra distance past the screen edge an exiting card travels.
pub const OFFSCREEN_MARGIN: f32 = 100.0;
pub const MAX_DRAG_LIFT: f32 = 20.0;
pub const MAX_DRAG_SCALE_DROP: f32 = 0.05;

/// Decides a release: `Some(direction)` commits, `None` springs back.
///
/// The displacement must strictly exceed the threshold, and the direction implied by its sign
/// (positive is right) must be enabled.
pub fn decide_release(
    dx: f32,
    swipe_threshold: f32,
    directions: SwipeDirections,
) -> Option<SwipeDirection> {
    if !(dx.abs() > swipe_threshold) {
        return None;
    }
    let direction = SwipeDirection::from_horizontal(dx);
    directions.contains(direction).then_some(direction)
}

/// Everything a surface needs from the stack configuration, resolved once per sync.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub swipe_threshold: f32,
    pub directions: SwipeDirections,
    /// Directions that have an overlay label; only those get an overlay opacity.
    pub overlays: SwipeDirections,
}

impl SurfaceConfig {
    pub fn from_controller<K>(controller: &StackController<K>, overlays: SwipeDirections) -> Self {
        Self {
            screen_width: controller.screen_width(),
            screen_height: controller.screen_height(),
            swipe_threshold: controller.swipe_threshold(),
            directions: controller.directions(),
            overlays,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfacePhase {
    Idle,
    Dragging,
    Committing(SwipeDirection),
}

/// Running displacement of the gesture in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSample {
    pub dx: f32,
    pub dy: f32,
    pub dragging: bool,
}

/// Visual state of one card for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub overlay_left: Option<f32>,
    pub overlay_right: Option<f32>,
    pub overlay_up: Option<f32>,
}

impl CardTransform {
    pub const REST: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        overlay_left: None,
        overlay_right: None,
        overlay_up: None,
    };

    /// Opacity of the overlay for `direction`, or `None` when no label is configured for it.
    pub fn overlay_opacity(&self, direction: SwipeDirection) -> Option<f32> {
        match direction {
            SwipeDirection::Left => self.overlay_left,
            SwipeDirection::Right => self.overlay_right,
            SwipeDirection::Up => self.overlay_up,
        }
    }
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::REST
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceCommand {
    Trigger(SwipeDirection),
}

/// The controller's capability on a surface: posts trigger commands to its inbox.
///
/// Commands are applied on the surface's next `tick`.
#[derive(Clone, Debug)]
pub struct SurfaceHandle {
    tx: mpsc::Sender<SurfaceCommand>,
}

impl SwipeTarget for SurfaceHandle {
    fn trigger_commit(&mut self, direction: SwipeDirection) {
        // A torn-down surface has nothing left to animate.
        let _ = self.tx.send(SurfaceCommand::Trigger(direction));
    }
}

/// Drag state machine for one rendered card.
///
/// Only ever mutates its own state; discrete transitions are posted to the controller's mailbox.
/// A surface is `Send`, so it can live in whatever context samples input.
#[derive(Debug)]
pub struct CardGestureSurface {
    index: usize,
    config: SurfaceConfig,
    phase: SurfacePhase,
    sample: Option<GestureSample>,
    announced: Option<SwipeDirection>,

    translate_x: Animated,
    exit_y: Animated,
    lift: Animated,
    drag_scale: Animated,
    depth_scale: Animated,
    depth_offset: Animated,

    outbox: SurfaceSender,
    commands_tx: mpsc::Sender<SurfaceCommand>,
    commands: mpsc::Receiver<SurfaceCommand>,
}

impl CardGestureSurface {
    pub fn new(index: usize, config: SurfaceConfig, outbox: SurfaceSender) -> Self {
        let (commands_tx, commands) = mpsc::channel();
        Self {
            index,
            config,
            phase: SurfacePhase::Idle,
            sample: None,
            announced: None,
            translate_x: Animated::new(0.0),
            exit_y: Animated::new(0.0),
            lift: Animated::new(0.0),
            drag_scale: Animated::new(1.0),
            depth_scale: Animated::new(1.0),
            depth_offset: Animated::new(0.0),
            outbox,
            commands_tx,
            commands,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn config(&self) -> SurfaceConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SurfaceConfig) {
        self.config = config;
    }

    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    pub fn sample(&self) -> Option<GestureSample> {
        self.sample
    }

    pub fn handle(&self) -> SurfaceHandle {
        SurfaceHandle {
            tx: self.commands_tx.clone(),
        }
    }

    /// `true` while any value is still moving toward its target.
    pub fn is_animating(&self) -> bool {
        [
            &self.translate_x,
            &self.exit_y,
            &self.lift,
            &self.drag_scale,
            &self.depth_scale,
            &self.depth_offset,
        ]
        .iter()
        .any(|v| v.is_animating())
    }

    /// Places the card at its slot in the stack.
    ///
    /// The first placement (`animate == false`) snaps; later ones animate so every passive card
    /// visibly moves forward when the window shifts.
    pub fn set_depth(&mut self, card: StackCard, now_ms: u64, animate: bool) {
        if !animate {
            self.depth_scale.set(card.depth_scale);
            self.depth_offset.set(card.vertical_offset);
            return;
        }
        if self.depth_scale.target() != card.depth_scale {
            self.depth_scale.animate_to(
                card.depth_scale,
                now_ms,
                RESTACK_DURATION_MS,
                Easing::EaseOutCubic,
            );
        }
        if self.depth_offset.target() != card.vertical_offset {
            self.depth_offset.animate_to(
                card.vertical_offset,
                now_ms,
                RESTACK_DURATION_MS,
                Easing::EaseOutCubic,
            );
        }
    }

    // ---------------------------------------------------------------------
    // Sampling context

    /// `Idle -> Dragging`. Ignored while committing.
    pub fn begin_drag(&mut self) -> bool {
        if self.phase != SurfacePhase::Idle {
            return false;
        }
        self.phase = SurfacePhase::Dragging;
        self.sample = Some(GestureSample {
            dx: 0.0,
            dy: 0.0,
            dragging: true,
        });
        self.announced = None;
        self.translate_x.set(0.0);
        self.exit_y.set(0.0);
        self.lift.set(0.0);
        self.drag_scale.set(1.0);
        gtrace!(index = self.index, "begin_drag");
        true
    }

    /// Applies a gesture sample (displacement since the drag began).
    ///
    /// Lift and scale are cosmetic functions of `|dx|`. The first time the drag enters commit
    /// territory in a direction, a `Started` message is posted.
    pub fn update_drag(&mut self, dx: f32, dy: f32) -> bool {
        if self.phase != SurfacePhase::Dragging {
            return false;
        }
        self.sample = Some(GestureSample {
            dx,
            dy,
            dragging: true,
        });
        let progress = drag_progress(dx, self.config.screen_width);
        self.translate_x.set(dx);
        self.lift.set(-MAX_DRAG_LIFT * progress);
        self.drag_scale.set(1.0 - MAX_DRAG_SCALE_DROP * progress);

        if let Some(direction) =
            decide_release(dx, self.config.swipe_threshold, self.config.directions)
        {
            self.announce(direction);
        }
        true
    }

    /// Ends the drag: commits or springs back.
    ///
    /// The cancel notification is posted right away; the commit notification waits for the exit
    /// animation (see [`Self::tick`]).
    pub fn end_drag(&mut self, now_ms: u64) -> Option<SwipeDirection> {
        if self.phase != SurfacePhase::Dragging {
            return None;
        }
        let dx = self.sample.take().map_or(0.0, |s| s.dx);
        match decide_release(dx, self.config.swipe_threshold, self.config.directions) {
            Some(direction) => {
                self.start_commit(direction, now_ms);
                Some(direction)
            }
            None => {
                self.phase = SurfacePhase::Idle;
                self.announced = None;
                self.spring_back(now_ms);
                gtrace!(index = self.index, dx, "drag cancelled");
                self.outbox.post(self.index, SurfaceEvent::Cancelled);
                None
            }
        }
    }

    /// Drains pending commands and advances every animation.
    ///
    /// Posts `Committed` on the tick the exit animation finishes, then returns to rest.
    pub fn tick(&mut self, now_ms: u64) -> CardTransform {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                SurfaceCommand::Trigger(direction) => self.trigger(direction, now_ms),
            }
        }

        self.translate_x.tick(now_ms);
        self.exit_y.tick(now_ms);
        self.lift.tick(now_ms);
        self.drag_scale.tick(now_ms);
        self.depth_scale.tick(now_ms);
        self.depth_offset.tick(now_ms);

        if let SurfacePhase::Committing(direction) = self.phase {
            let exit = match direction {
                SwipeDirection::Up => &self.exit_y,
                SwipeDirection::Left | SwipeDirection::Right => &self.translate_x,
            };
            if !exit.is_animating() {
                gdebug!(index = self.index, %direction, "exit finished");
                self.outbox
                    .post(self.index, SurfaceEvent::Committed(direction));
                self.reset();
            }
        }
        self.transform()
    }

    /// Programmatic commit: enters `Committing` directly, abandoning a drag in progress.
    ///
    /// Direction flags are checked by the controller before the trigger is sent.
    pub fn trigger(&mut self, direction: SwipeDirection, now_ms: u64) {
        if let SurfacePhase::Committing(_) = self.phase {
            gtrace!(index = self.index, %direction, "trigger ignored while committing");
            return;
        }
        self.sample = None;
        self.start_commit(direction, now_ms);
    }

    pub fn transform(&self) -> CardTransform {
        let translate_x = self.translate_x.value();
        let exit_y = self.exit_y.value();
        let threshold = self.config.swipe_threshold;
        let overlays = self.config.overlays;
        let opacity = |displacement: f32, direction: SwipeDirection| {
            overlays
                .contains(direction)
                .then(|| overlay_opacity(displacement, threshold))
        };
        CardTransform {
            translate_x,
            translate_y: self.depth_offset.value() + self.lift.value() + exit_y,
            scale: self.depth_scale.value() * self.drag_scale.value(),
            overlay_left: opacity(-translate_x, SwipeDirection::Left),
            overlay_right: opacity(translate_x, SwipeDirection::Right),
            overlay_up: opacity(-exit_y, SwipeDirection::Up),
        }
    }

    fn announce(&mut self, direction: SwipeDirection) {
        if self.announced == Some(direction) {
            return;
        }
        self.announced = Some(direction);
        self.outbox
            .post(self.index, SurfaceEvent::Started(direction));
    }

    fn start_commit(&mut self, direction: SwipeDirection, now_ms: u64) {
        self.announce(direction);
        self.phase = SurfacePhase::Committing(direction);
        let off_x = self.config.screen_width + OFFSCREEN_MARGIN;
        let off_y = self.config.screen_height + OFFSCREEN_MARGIN;
        match direction {
            SwipeDirection::Left => self.translate_x.animate_to(
                -off_x,
                now_ms,
                COMMIT_DURATION_MS,
                Easing::Linear,
            ),
            SwipeDirection::Right => {
                self.translate_x
                    .animate_to(off_x, now_ms, COMMIT_DURATION_MS, Easing::Linear)
            }
            SwipeDirection::Up => {
                self.exit_y
                    .animate_to(-off_y, now_ms, COMMIT_DURATION_MS, Easing::Linear)
            }
        }
        gdebug!(index = self.index, %direction, "commit started");
    }

    fn spring_back(&mut self, now_ms: u64) {
        let d = SPRING_BACK_DURATION_MS;
        self.translate_x
            .animate_to(0.0, now_ms, d, Easing::EaseOutCubic);
        self.exit_y.animate_to(0.0, now_ms, d, Easing::EaseOutCubic);
        self.lift.animate_to(0.0, now_ms, d, Easing::EaseOutCubic);
        self.drag_scale
            .animate_to(1.0, now_ms, d, Easing::EaseOutCubic);
    }

    fn reset(&mut self) {
        self.phase = SurfacePhase::Idle;
        self.sample = None;
        self.announced = None;
        self.translate_x.set(0.0);
        self.exit_y.set(0.0);
        self.lift.set(0.0);
        self.drag_scale.set(1.0);
    }
}

fn drag_progress(dx: f32, screen_width: f32) -> f32 {
    if screen_width > 0.0 {
        (dx.abs() / screen_width).min(1.0)
    } else {
        0.0
    }
}

fn overlay_opacity(displacement: f32, threshold: f32) -> f32 {
    if threshold > 0.0 {
        (displacement / threshold).clamp(0.0, 1.0)
    } else if displacement > 0.0 {
        1.0
    } else {
        0.0
    }
}
