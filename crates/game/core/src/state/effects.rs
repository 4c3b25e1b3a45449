//! Timed effects on combatants.
//!
//! Effects count down in combat ticks. The runtime advances every combatant's
//! effects once at the start of each tick and reacts to the expired kinds
//! (for example clearing the ghost flag).

/// Kinds of timed effects consulted by the combat rules.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectKind {
    /// Halves all incoming damage.
    Ward,
    /// Adds `magnitude` percent to armor absorption in every category.
    Protection,
    /// Cripples active defense.
    Blinded,
    /// Cripples active defense.
    Disoriented,
    /// Post-death spirit form.
    Ghost,
}

/// A single effect with its remaining duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub remaining: u32,
    pub magnitude: u8,
}

impl ActiveEffect {
    pub fn new(kind: EffectKind, remaining: u32) -> Self {
        Self {
            kind,
            remaining,
            magnitude: 0,
        }
    }

    #[must_use]
    pub fn with_magnitude(mut self, magnitude: u8) -> Self {
        self.magnitude = magnitude;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffects {
    effects: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Applies an effect; reapplying a kind refreshes it to the longer duration
    /// and the stronger magnitude.
    pub fn apply(&mut self, effect: ActiveEffect) {
        match self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            Some(existing) => {
                existing.remaining = existing.remaining.max(effect.remaining);
                existing.magnitude = existing.magnitude.max(effect.magnitude);
            }
            None => self.effects.push(effect),
        }
    }

    pub fn remove(&mut self, kind: EffectKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Summed magnitude of all active effects of `kind`.
    pub fn magnitude(&self, kind: EffectKind) -> u32 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| u32::from(e.magnitude))
            .sum()
    }

    /// Counts every effect down by one tick, returning the kinds that expired.
    pub fn advance(&mut self) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|e| {
            e.remaining = e.remaining.saturating_sub(1);
            if e.remaining == 0 {
                expired.push(e.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> + '_ {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_expires_in_order() {
        let mut effects = ActiveEffects::empty();
        effects.apply(ActiveEffect::new(EffectKind::Blinded, 1));
        effects.apply(ActiveEffect::new(EffectKind::Ghost, 2));

        assert_eq!(effects.advance(), vec![EffectKind::Blinded]);
        assert!(effects.has(EffectKind::Ghost));
        assert_eq!(effects.advance(), vec![EffectKind::Ghost]);
        assert!(effects.is_empty());
    }

    #[test]
    fn reapply_refreshes_instead_of_stacking() {
        let mut effects = ActiveEffects::empty();
        effects.apply(ActiveEffect::new(EffectKind::Protection, 3).with_magnitude(10));
        effects.apply(ActiveEffect::new(EffectKind::Protection, 5).with_magnitude(5));

        assert_eq!(effects.iter().count(), 1);
        assert_eq!(effects.magnitude(EffectKind::Protection), 10);
        assert_eq!(effects.iter().next().map(|e| e.remaining), Some(5));
    }
}
