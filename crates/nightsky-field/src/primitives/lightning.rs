//! Lightning flashes built from a recursively generated branch tree.

use std::f32::consts::FRAC_PI_2;

use nightsky_core::Rgba;
use rand::Rng;

use super::{Bounds, random_below};
use crate::config::LightningConfig;
use crate::surface::DrawContext;

/// Length factor applied to each generation of child branches.
const CHILD_LENGTH: (f32, f32) = (0.55, 0.8);
/// Width and alpha factors applied to each generation of child branches.
const CHILD_WIDTH: f32 = 0.6;
const CHILD_ALPHA: f32 = 0.8;

/// One line segment of a flash and the branches forking from its end.
#[derive(Debug, Clone, PartialEq)]
pub struct LightningBranch {
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub width: f32,
    pub alpha: f32,
    pub children: Vec<LightningBranch>,
}

impl LightningBranch {
    /// Grow a branch at `depth` (1 for top-level) and its subtree.
    #[allow(clippy::too_many_arguments)]
    fn grow<R: Rng + ?Sized>(
        config: &LightningConfig,
        start: (f32, f32),
        angle: f32,
        length: f32,
        width: f32,
        alpha: f32,
        depth: u8,
        rng: &mut R,
    ) -> Self {
        let end = (
            start.0 + angle.cos() * length,
            start.1 + angle.sin() * length,
        );

        let children = if depth < max_depth(config) {
            let forks = rng.random_range(1..=2);
            (0..forks)
                .map(|_| {
                    let child_angle = angle + random_spread(config.spread, rng);
                    let child_length =
                        length * rng.random_range(CHILD_LENGTH.0..=CHILD_LENGTH.1);
                    Self::grow(
                        config,
                        end,
                        child_angle,
                        child_length,
                        width * CHILD_WIDTH,
                        alpha * CHILD_ALPHA,
                        depth + 1,
                        rng,
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            start,
            end,
            width,
            alpha,
            children,
        }
    }

    /// Number of levels in this subtree, counting this branch.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Number of segments in this subtree.
    pub fn segment_count(&self) -> usize {
        1 + self.children.iter().map(Self::segment_count).sum::<usize>()
    }

    fn draw<C: DrawContext + ?Sized>(&self, ctx: &mut C, color: Rgba, fade: f32) {
        ctx.stroke_line(
            self.start,
            self.end,
            self.width,
            color.with_alpha(color.a * self.alpha * fade),
        );
        for child in &self.children {
            child.draw(ctx, color, fade);
        }
    }
}

/// An active lightning flash.
#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub branches: Vec<LightningBranch>,
    /// Frames since the flash appeared.
    pub elapsed: u32,
    pub duration: u32,
    pub color: Rgba,
    pub overlay_alpha: f32,
}

impl Flash {
    /// New flash striking from a random point on the top edge.
    pub fn spawn<R: Rng + ?Sized>(config: &LightningConfig, bounds: Bounds, rng: &mut R) -> Self {
        let origin = (random_below(bounds.width, rng), 0.0);
        let count = rng.random_range(2..=4);
        let branches = (0..count)
            .map(|_| {
                let angle = FRAC_PI_2 + random_spread(config.spread, rng);
                let length = config.length.lerp(rng.random());
                LightningBranch::grow(config, origin, angle, length, config.width, 1.0, 1, rng)
            })
            .collect();

        Self {
            branches,
            elapsed: 0,
            duration: config.duration_frames.max(1),
            color: config.color,
            overlay_alpha: config.overlay_alpha,
        }
    }

    /// `1 - elapsed / duration`, clamped to `[0, 1]`.
    pub fn fade(&self) -> f32 {
        (1.0 - self.elapsed as f32 / self.duration as f32).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Deepest branch nesting in the tree.
    pub fn depth(&self) -> usize {
        self.branches
            .iter()
            .map(LightningBranch::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn draw<C: DrawContext + ?Sized>(&self, ctx: &mut C) {
        let fade = self.fade();
        if fade <= 0.0 {
            return;
        }
        ctx.overlay(self.color.with_alpha(self.overlay_alpha * fade));
        for branch in &self.branches {
            branch.draw(ctx, self.color, fade);
        }
    }
}

/// Configured depth limited to [`LightningConfig::MAX_DEPTH`].
fn max_depth(config: &LightningConfig) -> u8 {
    config.max_depth.clamp(1, LightningConfig::MAX_DEPTH)
}

fn random_spread<R: Rng + ?Sized>(spread: f32, rng: &mut R) -> f32 {
    if spread.is_finite() && spread > 0.0 {
        rng.random_range(-spread..=spread)
    } else {
        0.0
    }
}

/// Advance the active flash and possibly start a new one.
///
/// The active flash ages by one frame and is dropped once its duration is
/// reached. When no flash was active at the start of the frame a new one
/// spawns with chance `probability * intensity`.
pub fn update<R: Rng + ?Sized>(
    flash: &mut Option<Flash>,
    config: &LightningConfig,
    bounds: Bounds,
    rng: &mut R,
) -> bool {
    if let Some(active) = flash {
        active.elapsed += 1;
        if active.is_finished() {
            *flash = None;
        }
        return false;
    }

    if !config.enabled {
        return false;
    }
    let chance = (config.probability * config.intensity).clamp(0.0, 1.0);
    if chance > 0.0 && rng.random::<f32>() < chance {
        *flash = Some(Flash::spawn(config, bounds, rng));
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn forced(max_depth: u8) -> LightningConfig {
        LightningConfig {
            enabled: true,
            probability: 1.0,
            intensity: 1.0,
            max_depth,
            ..LightningConfig::default()
        }
    }

    #[test]
    fn test_forced_probability_spawns() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut flash = None;
        let spawned = update(&mut flash, &forced(3), Bounds::new(200, 100), &mut rng);
        assert!(spawned);

        let flash = flash.expect("flash should be active");
        assert!((2..=4).contains(&flash.branches.len()));
        assert!(flash.depth() >= 1 && flash.depth() <= 3);
        for branch in &flash.branches {
            assert_eq!(branch.start.1, 0.0);
            // Roughly downward.
            assert!(branch.end.1 > branch.start.1);
        }
    }

    #[test]
    fn test_depth_never_exceeds_limit() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        for max_depth in 1..=LightningConfig::MAX_DEPTH {
            for _ in 0..20 {
                let flash = Flash::spawn(&forced(max_depth), Bounds::new(300, 200), &mut rng);
                assert!(flash.depth() <= max_depth as usize);
                assert!(flash.depth() >= 1);
            }
        }
        let single = Flash::spawn(&forced(1), Bounds::new(300, 200), &mut rng);
        assert!(single.branches.iter().all(|b| b.children.is_empty()));
    }

    #[test]
    fn test_flash_expires_after_duration() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let config = LightningConfig {
            duration_frames: 3,
            ..forced(2)
        };
        let bounds = Bounds::new(100, 100);
        let mut flash = None;
        assert!(update(&mut flash, &config, bounds, &mut rng));

        let fades: Vec<f32> = (0..2)
            .map(|_| {
                update(&mut flash, &config, bounds, &mut rng);
                flash.as_ref().map(Flash::fade).unwrap_or(0.0)
            })
            .collect();
        assert!(fades[0] > fades[1]);
        assert!(flash.is_some());

        // Third aged frame reaches the duration and drops the flash
        // without spawning a replacement in the same frame.
        assert!(!update(&mut flash, &config, bounds, &mut rng));
        assert!(flash.is_none());
    }

    #[test]
    fn test_disabled_never_spawns() {
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let config = LightningConfig {
            enabled: false,
            ..forced(3)
        };
        let mut flash = None;
        for _ in 0..100 {
            update(&mut flash, &config, Bounds::new(100, 100), &mut rng);
        }
        assert!(flash.is_none());
    }

    #[test]
    fn test_unchecked_config_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(26);
        let config = LightningConfig {
            max_depth: u8::MAX,
            spread: f32::INFINITY,
            ..forced(1)
        };
        let flash = Flash::spawn(&config, Bounds::new(100, 100), &mut rng);
        assert!(flash.depth() <= LightningConfig::MAX_DEPTH as usize);
        for branch in &flash.branches {
            assert!(branch.end.0.is_finite() && branch.end.1.is_finite());
        }
    }

    #[test]
    fn test_children_are_thinner_and_dimmer() {
        let mut rng = ChaCha8Rng::seed_from_u64(25);
        let flash = Flash::spawn(&forced(4), Bounds::new(100, 100), &mut rng);
        for branch in &flash.branches {
            assert!(branch.segment_count() >= branch.depth());
            for child in &branch.children {
                assert!(child.width < branch.width);
                assert!(child.alpha < branch.alpha);
                assert_eq!(child.start, branch.end);
            }
        }
    }
}
