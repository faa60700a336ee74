// SPDX-License-Identifier: MIT OR Apache-2.0
//! Multi-level tick generation for graph rulers.
//!
//! Candidate step sizes are tried from coarsest to finest. Each step is
//! assigned a strength based on how far apart its ticks land on screen, so
//! finer levels can fade in as the view zooms.

/// Ticks closer than this are invisible
const MIN_TICK_SPACING_PX: f32 = 5.0;
/// Ticks this far apart or more are drawn at full strength
const MAX_TICK_SPACING_PX: f32 = 30.0;

/// Kind of values the ticks subdivide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickStepType {
    /// Seconds: hours, minutes, seconds and fractions
    #[default]
    Time,
    /// Plain numbers: powers of ten and halves
    Generic,
}

impl TickStepType {
    /// Candidate steps, coarsest first
    fn steps(self) -> Vec<f32> {
        match self {
            Self::Time => vec![
                3600.0, 1800.0, 600.0, 300.0, 60.0, 30.0, 10.0, 5.0, 1.0, 0.5, 0.25, 0.1, 0.05,
                0.01,
            ],
            Self::Generic => (-4..=6)
                .rev()
                .flat_map(|exp| {
                    let base = 10f32.powi(exp);
                    [base * 5.0, base]
                })
                .collect(),
        }
    }
}

/// Generates tick positions for a value range displayed over a pixel range
#[derive(Debug, Clone)]
pub struct GraphTicks {
    steps: Vec<f32>,
    strengths: Vec<f32>,
    range_start: f32,
    range_end: f32,
    /// Index into `steps` of level 0
    first_level: usize,
    num_levels: usize,
}

impl GraphTicks {
    /// Create a tick generator with no range set
    pub fn new(step_type: TickStepType) -> Self {
        let steps = step_type.steps();
        Self {
            strengths: vec![0.0; steps.len()],
            steps,
            range_start: 0.0,
            range_end: 0.0,
            first_level: 0,
            num_levels: 0,
        }
    }

    /// Set the displayed value range and the number of pixels it spans
    pub fn set_range(&mut self, start: f32, end: f32, pixel_range: u32) {
        self.range_start = start;
        self.range_end = end;
        self.first_level = 0;
        self.num_levels = 0;
        self.strengths.iter_mut().for_each(|s| *s = 0.0);

        let value_range = end - start;
        if value_range.is_nan() || value_range <= 0.0 || pixel_range == 0 {
            return;
        }

        let pixels_per_value = pixel_range as f32 / value_range;
        for (strength, step) in self.strengths.iter_mut().zip(&self.steps) {
            let spacing = step * pixels_per_value;
            *strength = ((spacing - MIN_TICK_SPACING_PX)
                / (MAX_TICK_SPACING_PX - MIN_TICK_SPACING_PX))
                .clamp(0.0, 1.0);
        }

        // Finest step that still draws at full strength; coarser ones are
        // mostly subsets of it
        self.first_level = self
            .strengths
            .iter()
            .rposition(|s| *s >= 1.0)
            .unwrap_or(0);
        self.num_levels = self.strengths[self.first_level..]
            .iter()
            .take_while(|s| **s > 0.0)
            .count();
    }

    /// Number of visible levels, coarsest is level 0
    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    /// Step size of a level
    pub fn level_step(&self, level: usize) -> Option<f32> {
        if level >= self.num_levels {
            return None;
        }
        self.steps.get(self.first_level + level).copied()
    }

    /// Strength of a level in `[0, 1]`, zero for levels that don't exist
    pub fn level_strength(&self, level: usize) -> f32 {
        if level >= self.num_levels {
            return 0.0;
        }
        self.strengths[self.first_level + level]
    }

    /// Tick positions of a level within the range, excluding positions
    /// already covered by a coarser level
    pub fn ticks(&self, level: usize) -> Vec<f32> {
        let Some(step) = self.level_step(level) else {
            return Vec::new();
        };
        let coarser: Vec<f32> = (0..level).filter_map(|l| self.level_step(l)).collect();

        let first = (self.range_start / step).ceil() as i64;
        let last = (self.range_end / step + 1e-4).floor() as i64;

        (first..=last)
            .map(|i| i as f32 * step)
            .filter(|t| !coarser.iter().any(|c| is_multiple_of(*t, *c)))
            .collect()
    }
}

fn is_multiple_of(value: f32, step: f32) -> bool {
    let ratio = value / step;
    (ratio - ratio.round()).abs() < 1e-3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_range() {
        let mut ticks = GraphTicks::new(TickStepType::Time);
        ticks.set_range(0.0, 0.0, 500);
        assert_eq!(ticks.num_levels(), 0);
        assert!(ticks.ticks(0).is_empty());
        assert_eq!(ticks.level_strength(0), 0.0);

        ticks.set_range(0.0, 10.0, 0);
        assert_eq!(ticks.num_levels(), 0);

        ticks.set_range(5.0, 1.0, 100);
        assert_eq!(ticks.num_levels(), 0);
    }

    #[test]
    fn test_levels() {
        let mut ticks = GraphTicks::new(TickStepType::Time);
        // 10 pixels per second
        ticks.set_range(0.0, 60.0, 600);

        // 5s steps are 50px apart (full), 1s is 10px (0.2), 0.5s is 5px (0)
        assert_eq!(ticks.num_levels(), 2);
        assert_eq!(ticks.level_step(0), Some(5.0));
        assert_eq!(ticks.level_step(1), Some(1.0));
        assert_eq!(ticks.level_strength(0), 1.0);
        assert!((ticks.level_strength(1) - 0.2).abs() < 1e-6);
        assert_eq!(ticks.level_step(2), None);
    }

    #[test]
    fn test_ticks_skip_coarser_levels() {
        let mut ticks = GraphTicks::new(TickStepType::Time);
        ticks.set_range(0.0, 60.0, 600);

        let major = ticks.ticks(0);
        assert_eq!(major.len(), 13);
        assert_eq!(major[0], 0.0);
        assert_eq!(major[12], 60.0);

        let minor = ticks.ticks(1);
        assert_eq!(minor.len(), 61 - 13);
        assert!(!minor.contains(&5.0));
        assert!(minor.contains(&1.0));
    }

    #[test]
    fn test_generic_steps() {
        let mut ticks = GraphTicks::new(TickStepType::Generic);
        ticks.set_range(-1.0, 1.0, 200);
        // 100 pixels per unit: 0.5 is 50px (full), 0.1 is 10px, 0.05 is 5px
        assert_eq!(ticks.level_step(0), Some(0.5));
        assert_eq!(ticks.level_step(1), Some(0.1));
        assert_eq!(ticks.num_levels(), 2);
        assert_eq!(ticks.ticks(0), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }
}
