use std::sync::Arc;

use swipe_stack::{
    CardId, CardKey, StackCard, StackController, StackOptions, SwipeDirection, SwipeDirections,
    SwipeTarget,
};

use crate::surface::{CardGestureSurface, CardTransform, SurfaceConfig};

/// Maps a card datum and its index to rendered content. Treated as opaque.
pub type RenderCardFn<T, V> = Arc<dyn Fn(&T, usize) -> V + Send + Sync>;

/// Extracts the intrinsic id of a card datum, if it has one.
pub type CardDataIdFn<T, K> = Arc<dyn Fn(&T) -> Option<K> + Send + Sync>;

/// Optional per-direction overlay content, passed through to the renderer.
///
/// Presence of an entry is the only thing inspected: it enables the overlay opacity for that
/// direction in [`CardTransform`].
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayLabels<S> {
    pub left: Option<S>,
    pub right: Option<S>,
    pub up: Option<S>,
}

impl<S> OverlayLabels<S> {
    pub fn get(&self, direction: SwipeDirection) -> Option<&S> {
        match direction {
            SwipeDirection::Left => self.left.as_ref(),
            SwipeDirection::Right => self.right.as_ref(),
            SwipeDirection::Up => self.up.as_ref(),
        }
    }

    pub fn present(&self) -> SwipeDirections {
        SwipeDirections {
            left: self.left.is_some(),
            right: self.right.is_some(),
            up: self.up.is_some(),
        }
    }
}

impl<S> Default for OverlayLabels<S> {
    fn default() -> Self {
        Self {
            left: None,
            right: None,
            up: None,
        }
    }
}

/// One visible card, ready for the renderer.
#[derive(Clone, Debug)]
pub struct RenderedCard<V, K = CardId> {
    pub key: CardKey<K>,
    pub card: StackCard,
    pub content: V,
    pub transform: CardTransform,
    /// Only the active card accepts gestures.
    pub interactive: bool,
}

#[derive(Debug)]
struct Slot<K> {
    key: CardKey<K>,
    serial: u64,
    surface: CardGestureSurface,
}

/// A framework-neutral swipe deck: the cards, the controller, and one gesture surface per
/// visible card.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `drag_begin` / `drag_update` / `drag_end` when touch events arrive for the active card
/// - `tick(now_ms)` each frame, then `render()` to get what to draw
///
/// Card content is produced by `render_card` on every `render()`; caching it is up to the caller.
pub struct Deck<T, V, K = CardId, S = ()> {
    cards: Arc<[T]>,
    render_card: RenderCardFn<T, V>,
    card_id: Option<CardDataIdFn<T, K>>,
    controller: StackController<K>,
    slots: Vec<Slot<K>>,
    next_serial: u64,
    attached: Option<u64>,
    now_ms: u64,

    container_style: Option<S>,
    card_style: Option<S>,
    overlay_labels: OverlayLabels<S>,
}

impl<T, V, K, S> Deck<T, V, K, S>
where
    T: Send + Sync + 'static,
    K: PartialEq + 'static,
{
    /// Creates a deck. `stack.count` is replaced by the number of cards.
    pub fn new(
        cards: Vec<T>,
        render_card: impl Fn(&T, usize) -> V + Send + Sync + 'static,
        mut stack: StackOptions<K>,
    ) -> Self {
        let cards: Arc<[T]> = cards.into();
        stack.count = cards.len();
        let mut deck = Self {
            cards,
            render_card: Arc::new(render_card),
            card_id: None,
            controller: StackController::new(stack),
            slots: Vec::new(),
            next_serial: 0,
            attached: None,
            now_ms: 0,
            container_style: None,
            card_style: None,
            overlay_labels: OverlayLabels::default(),
        };
        deck.sync();
        deck
    }

    /// Correlates cards by an intrinsic id instead of their index.
    pub fn with_card_id(
        mut self,
        card_id: impl Fn(&T) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        self.card_id = Some(Arc::new(card_id));
        self.install_card_id();
        self.rebuild();
        self
    }

    pub fn with_container_style(mut self, style: Option<S>) -> Self {
        self.container_style = style;
        self
    }

    pub fn with_card_style(mut self, style: Option<S>) -> Self {
        self.card_style = style;
        self
    }

    pub fn with_overlay_labels(mut self, labels: OverlayLabels<S>) -> Self {
        self.overlay_labels = labels;
        self.sync();
        self
    }

    pub fn cards(&self) -> &[T] {
        &self.cards
    }

    pub fn controller(&self) -> &StackController<K> {
        &self.controller
    }

    /// Direct access to the controller. Call [`Self::sync`] after changing the cursor here.
    pub fn controller_mut(&mut self) -> &mut StackController<K> {
        &mut self.controller
    }

    pub fn container_style(&self) -> Option<&S> {
        self.container_style.as_ref()
    }

    pub fn card_style(&self) -> Option<&S> {
        self.card_style.as_ref()
    }

    pub fn overlay_labels(&self) -> &OverlayLabels<S> {
        &self.overlay_labels
    }

    /// Replaces the card sequence wholesale. All surfaces are rebuilt.
    pub fn set_cards(&mut self, cards: Vec<T>) {
        self.cards = cards.into();
        self.install_card_id();
        self.controller.set_count(self.cards.len());
        gdebug!(count = self.cards.len(), "cards replaced");
        self.rebuild();
    }

    fn install_card_id(&mut self) {
        let Some(card_id) = self.card_id.clone() else {
            return;
        };
        let cards = Arc::clone(&self.cards);
        self.controller.update_options(move |o| {
            o.get_card_id = Some(Arc::new(move |i| cards.get(i).and_then(|c| card_id(c))));
        });
    }

    fn rebuild(&mut self) {
        for slot in std::mem::take(&mut self.slots) {
            self.controller.abandon_commit(slot.surface.index());
        }
        self.attached = None;
        self.sync();
    }

    // ---------------------------------------------------------------------
    // Imperative control surface

    pub fn swipe_left(&mut self) -> bool {
        self.controller.swipe_left()
    }

    pub fn swipe_right(&mut self) -> bool {
        self.controller.swipe_right()
    }

    pub fn swipe_up(&mut self) -> bool {
        self.controller.swipe_up()
    }

    pub fn swipe_back(&mut self) -> bool {
        let undone = self.controller.swipe_back();
        self.sync();
        undone
    }

    pub fn jump_to_card_index(&mut self, index: usize) -> bool {
        let jumped = self.controller.jump_to_card_index(index);
        self.sync();
        jumped
    }

    // ---------------------------------------------------------------------
    // Gesture input (active card only)

    pub fn drag_begin(&mut self) -> bool {
        self.active_surface_mut()
            .is_some_and(|surface| surface.begin_drag())
    }

    /// `dx`/`dy` are the displacement since `drag_begin`.
    ///
    /// Entering commit territory takes the controller lock before this returns.
    pub fn drag_update(&mut self, dx: f32, dy: f32) -> bool {
        let applied = self
            .active_surface_mut()
            .is_some_and(|surface| surface.update_drag(dx, dy));
        self.controller.pump();
        applied
    }

    /// A commit decision holds the controller lock before this returns; a cancel releases it.
    pub fn drag_end(&mut self) -> Option<SwipeDirection> {
        let now_ms = self.now_ms;
        let decision = self.active_surface_mut()?.end_drag(now_ms);
        self.controller.pump();
        decision
    }

    fn active_surface_mut(&mut self) -> Option<&mut CardGestureSurface> {
        let active = self.controller.active_index()?;
        self.slots
            .first_mut()
            .filter(|slot| slot.surface.index() == active)
            .map(|slot| &mut slot.surface)
    }

    // ---------------------------------------------------------------------
    // Frame loop

    /// Advances every surface, delivers their messages to the controller, and re-derives the
    /// visible window.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        for slot in &mut self.slots {
            slot.surface.tick(now_ms);
        }
        self.controller.pump();
        self.sync();
    }

    /// Re-derives the visible window: reuses surfaces whose key is still visible, creates the
    /// missing ones, drops the rest, and points the controller at the active surface.
    ///
    /// A dropped surface can no longer report its commit, so any lock held for it is released.
    pub fn sync(&mut self) {
        let now_ms = self.now_ms;
        let config = SurfaceConfig::from_controller(&self.controller, self.overlay_labels.present());
        let visible = self.controller.visible_cards();
        let mut previous = std::mem::take(&mut self.slots);
        let mut next = Vec::with_capacity(visible.len());

        for card in visible {
            let key = self.controller.card_key(card.index);
            let slot = match previous.iter().position(|slot| slot.key == key) {
                Some(pos) => {
                    let mut slot = previous.swap_remove(pos);
                    slot.surface.set_index(card.index);
                    slot.surface.set_config(config);
                    slot.surface.set_depth(card, now_ms, true);
                    slot
                }
                None => {
                    let mut surface =
                        CardGestureSurface::new(card.index, config, self.controller.sender());
                    surface.set_depth(card, now_ms, false);
                    let serial = self.next_serial;
                    self.next_serial += 1;
                    gtrace!(index = card.index, serial, "surface created");
                    Slot {
                        key,
                        serial,
                        surface,
                    }
                }
            };
            next.push(slot);
        }
        self.slots = next;
        for slot in previous {
            self.controller.abandon_commit(slot.surface.index());
        }

        let active = self.slots.first().map(|slot| slot.serial);
        if active != self.attached {
            let target = self
                .slots
                .first()
                .map(|slot| Box::new(slot.surface.handle()) as Box<dyn SwipeTarget>);
            self.controller.set_swipe_target(target);
            self.attached = active;
        }
    }

    /// The visible cards, active first, with their content and current transform.
    pub fn render(&self) -> Vec<RenderedCard<V, K>>
    where
        K: Clone,
    {
        self.slots
            .iter()
            .filter_map(|slot| {
                let card = self.controller.stack_card(slot.surface.index())?;
                let datum = self.cards.get(card.index)?;
                Some(RenderedCard {
                    key: slot.key.clone(),
                    card,
                    content: (self.render_card)(datum, card.index),
                    transform: slot.surface.transform(),
                    interactive: card.is_active(),
                })
            })
            .collect()
    }

    /// `true` while any surface is animating or a commit is in flight.
    pub fn is_animating(&self) -> bool {
        self.controller.is_locked() || self.slots.iter().any(|slot| slot.surface.is_animating())
    }
}

impl<T, V, K, S: core::fmt::Debug> core::fmt::Debug for Deck<T, V, K, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Deck")
            .field("count", &self.cards.len())
            .field("controller", &self.controller)
            .field("surfaces", &self.slots.len())
            .field("container_style", &self.container_style)
            .field("card_style", &self.card_style)
            .field("overlay_labels", &self.overlay_labels)
            .finish_non_exhaustive()
    }
}
