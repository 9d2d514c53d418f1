use crate::{
    animation::ease::Ease,
    foundation::error::{LyricsError, LyricsResult},
    foundation::ids::{AnimationId, DrawableId},
    scene::graph::SceneGraph,
};

/// Property an animation drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    /// Vertical render offset towards a logical y.
    Translate,
    /// 8-bit alpha.
    Fade,
    /// Uniform scale about the drawable's centre.
    Scale,
}

impl AnimationKind {
    pub fn ease(self) -> Ease {
        match self {
            Self::Translate | Self::Fade => Ease::OutCubic,
            Self::Scale => Ease::Linear,
        }
    }
}

/// One property animation bound to a drawable by id.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub(crate) kind: AnimationKind,
    pub(crate) target: DrawableId,
    pub(crate) duration: f64,
    pub(crate) elapsed: f64,
    pub(crate) from: f64,
    pub(crate) to: f64,
    /// Last rendered value.
    pub(crate) current: f64,
    /// Last target accepted by `retarget`.
    pub(crate) last_resolved: f64,
    pub(crate) active: bool,
}

impl Animation {
    pub(crate) fn dormant(kind: AnimationKind, target: DrawableId, duration: f64, value: f64) -> Self {
        Self {
            kind,
            target,
            duration,
            elapsed: 0.0,
            from: value,
            to: value,
            current: value,
            last_resolved: value,
            active: false,
        }
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn target(&self) -> DrawableId {
        self.target
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start moving towards `value`. Returns `false` when `value` is already the target.
    pub(crate) fn retarget(&mut self, value: f64) -> bool {
        if value == self.last_resolved {
            return false;
        }
        self.from = self.current;
        self.to = value;
        self.last_resolved = value;
        self.elapsed = 0.0;
        if self.duration > 0.0 {
            self.active = true;
        } else {
            self.finish();
        }
        true
    }

    /// Advance by `dt` seconds. Returns `true` on the step that finishes the animation.
    pub(crate) fn advance(&mut self, dt: f64) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.finish();
            return true;
        }
        self.current = self
            .kind
            .ease()
            .lerp(self.from, self.to, self.elapsed / self.duration);
        false
    }

    pub(crate) fn finish(&mut self) {
        self.elapsed = self.duration.max(0.0);
        self.current = self.to;
        self.active = false;
    }
}

impl SceneGraph {
    /// Register a dormant animation on `drawable`, seeded with the drawable's current value.
    pub fn attach_animation(
        &mut self,
        drawable: DrawableId,
        kind: AnimationKind,
        duration: f64,
    ) -> LyricsResult<AnimationId> {
        if !duration.is_finite() {
            return Err(LyricsError::config(format!(
                "animation duration must be finite, got {duration}"
            )));
        }
        let node = self.drawable_ref(drawable)?;
        let value = match kind {
            AnimationKind::Translate => node.bounds.y,
            AnimationKind::Fade => f64::from(node.alpha),
            AnimationKind::Scale => node.scale,
        };
        let id = self
            .animations
            .insert(Animation::dormant(kind, drawable, duration, value));
        self.drawable_mut(drawable)?.animations.push(id);
        Ok(id)
    }

    pub fn animation(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.get(id)
    }

    /// Remove an animation; the drawable keeps its last applied value.
    pub fn detach_animation(&mut self, id: AnimationId) -> LyricsResult<()> {
        let anim = self
            .animations
            .remove(id)
            .ok_or_else(|| LyricsError::invalid_state(format!("unknown animation {id:?}")))?;
        if let Some(node) = self.drawables.get_mut(anim.target) {
            node.animations.retain(|&a| a != id);
        }
        Ok(())
    }

    /// Set a new target value. Returns `true` if the animation (re)started.
    ///
    /// A target equal to the last accepted one is a no-op, so this can be called every frame.
    pub fn set_animation_target(&mut self, id: AnimationId, value: f64) -> LyricsResult<bool> {
        if !value.is_finite() {
            return Err(LyricsError::config(format!(
                "animation target must be finite, got {value}"
            )));
        }
        let anim = self
            .animations
            .get_mut(id)
            .ok_or_else(|| LyricsError::invalid_state(format!("unknown animation {id:?}")))?;
        let started = anim.retarget(value);
        if started {
            tracing::trace!(?id, kind = ?anim.kind, from = anim.from, to = value, "animation retarget");
            self.apply_animation(id)?;
        }
        Ok(started)
    }

    /// Advance every active animation whose target is visible. Returns how many advanced.
    pub fn step_animations(&mut self, dt: f64) -> LyricsResult<usize> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(LyricsError::config(format!(
                "animation step must be finite and >= 0, got {dt}"
            )));
        }
        let active: Vec<AnimationId> = self
            .animations
            .iter()
            .filter(|(_, a)| a.active)
            .map(|(id, _)| id)
            .collect();
        let mut stepped = 0;
        for id in active {
            let Some(target) = self.animations.get(id).map(|a| a.target) else {
                continue;
            };
            if !self.is_drawable_visible(target) {
                continue;
            }
            if let Some(anim) = self.animations.get_mut(id) {
                anim.advance(dt);
                stepped += 1;
            }
            self.apply_animation(id)?;
        }
        Ok(stepped)
    }

    /// Jump an animation to its final value.
    pub fn snap_animation(&mut self, id: AnimationId) -> LyricsResult<()> {
        self.animations
            .get_mut(id)
            .ok_or_else(|| LyricsError::invalid_state(format!("unknown animation {id:?}")))?
            .finish();
        self.apply_animation(id)
    }

    /// Finish every animation attached to `drawable`.
    pub fn snap_drawable_animations(&mut self, drawable: DrawableId) -> LyricsResult<()> {
        let ids = self.drawable_ref(drawable)?.animations.clone();
        for id in ids {
            self.snap_animation(id)?;
        }
        Ok(())
    }

    fn apply_animation(&mut self, id: AnimationId) -> LyricsResult<()> {
        let anim = self
            .animations
            .get(id)
            .ok_or_else(|| LyricsError::invalid_state(format!("unknown animation {id:?}")))?;
        let (kind, current, to, target) = (anim.kind, anim.current, anim.to, anim.target);
        let node = self.drawable_mut(target)?;
        match kind {
            AnimationKind::Translate => node.render_offset_y = current - to,
            AnimationKind::Fade => node.alpha = current.round().clamp(0.0, 255.0) as u8,
            AnimationKind::Scale => node.scale = current,
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/engine.rs"]
mod tests;
