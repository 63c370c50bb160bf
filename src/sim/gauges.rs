//! Health / fuel / score readouts.

/// Anything the HUD can show as a number or a bar.
pub trait Readout {
    fn value(&self) -> f32;

    /// Upper bound for bar rendering; `None` for open-ended counters.
    fn max(&self) -> Option<f32>;

    /// `value / max` in `0..=1`, or `None` when unbounded.
    fn fraction(&self) -> Option<f32> {
        self.max()
            .map(|m| if m > 0.0 { (self.value() / m).clamp(0.0, 1.0) } else { 0.0 })
    }
}

/// Bounded level clamped to `0..=max` (health, fuel).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gauge {
    level: f32,
    max: f32,
}

impl Gauge {
    /// Starts full.
    pub fn full(max: f32) -> Self {
        Self { level: max, max }
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.level <= 0.0
    }

    /// Remove `amount`; returns what was actually removed.
    pub fn drain(&mut self, amount: f32) -> f32 {
        let taken = amount.max(0.0).min(self.level);
        self.level -= taken;
        taken
    }

    /// Add `amount`; returns what was actually added.
    pub fn fill(&mut self, amount: f32) -> f32 {
        let added = amount.max(0.0).min(self.max - self.level);
        self.level += added;
        added
    }
}

impl Readout for Gauge {
    fn value(&self) -> f32 {
        self.level
    }

    fn max(&self) -> Option<f32> {
        Some(self.max)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score(u32);

impl Score {
    #[inline]
    pub fn points(&self) -> u32 {
        self.0
    }

    pub fn add(&mut self, points: u32) {
        self.0 = self.0.saturating_add(points);
    }
}

impl Readout for Score {
    fn value(&self) -> f32 {
        self.0 as f32
    }

    fn max(&self) -> Option<f32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_clamps_both_ways() {
        let mut g = Gauge::full(100.0);
        assert_eq!(g.fill(10.0), 0.0);
        assert_eq!(g.drain(30.0), 30.0);
        assert_eq!(g.level(), 70.0);
        assert_eq!(g.drain(500.0), 70.0);
        assert!(g.is_empty());
        assert_eq!(g.fill(40.0), 40.0);
        assert_eq!(g.fraction(), Some(0.4));
    }

    #[test]
    fn negative_amounts_are_ignored() {
        let mut g = Gauge::full(10.0);
        assert_eq!(g.drain(-5.0), 0.0);
        assert_eq!(g.fill(-5.0), 0.0);
        assert_eq!(g.level(), 10.0);
    }

    #[test]
    fn score_is_unbounded_and_saturates() {
        let mut s = Score::default();
        s.add(250);
        assert_eq!(s.points(), 250);
        assert_eq!(s.fraction(), None);
        s.add(u32::MAX);
        assert_eq!(s.points(), u32::MAX);
    }
}
