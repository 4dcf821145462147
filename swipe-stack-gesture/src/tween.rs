/// A small tween helper for adapter-driven card animation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    pub fn sample(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = (elapsed as f32 / self.duration_ms as f32).clamp(0.0, 1.0);
        let eased = self.easing.sample(t);
        self.from + (self.to - self.from) * eased
    }

    pub fn retarget(&mut self, now_ms: u64, new_to: f32, duration_ms: u64) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, new_to, now_ms, duration_ms, self.easing);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    EaseOutCubic,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
        }
    }
}

/// A scalar that either sits at a value or is being driven by a [`Tween`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Animated {
    value: f32,
    tween: Option<Tween>,
}

impl Animated {
    pub(crate) fn new(value: f32) -> Self {
        Self { value, tween: None }
    }

    pub(crate) fn value(&self) -> f32 {
        self.value
    }

    /// Where the value ends up once the running tween (if any) finishes.
    pub(crate) fn target(&self) -> f32 {
        self.tween.map_or(self.value, |t| t.to)
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Jumps to `value`, dropping any running tween.
    pub(crate) fn set(&mut self, value: f32) {
        self.value = value;
        self.tween = None;
    }

    /// Starts (or retargets) a tween toward `to`.
    pub(crate) fn animate_to(&mut self, to: f32, now_ms: u64, duration_ms: u64, easing: Easing) {
        match &mut self.tween {
            Some(tween) if tween.easing == easing => tween.retarget(now_ms, to, duration_ms),
            _ => self.tween = Some(Tween::new(self.value, to, now_ms, duration_ms, easing)),
        }
    }

    /// Advances the tween. Returns `true` on the tick it finishes.
    pub(crate) fn tick(&mut self, now_ms: u64) -> bool {
        let Some(tween) = self.tween else {
            return false;
        };
        self.value = tween.sample(now_ms);
        if tween.is_done(now_ms) {
            self.value = tween.to;
            self.tween = None;
            return true;
        }
        false
    }
}
