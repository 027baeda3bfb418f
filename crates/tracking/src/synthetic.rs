//! Animated stand-in for a hand-tracking device.
//! Fingers curl and uncurl over time, with optional seeded jitter on every joint.

use crate::{FingerChain, FingerType, HandFrame, NUM_JOINTS};
use glam::{Quat, Vec3};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters for the synthetic hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticHandConfig {
    /// Random seed for jitter
    #[serde(default)]
    pub seed: u64,
    /// Curl cycles per second
    #[serde(default = "default_curl_rate")]
    pub curl_rate_hz: f32,
    /// Bend at each joint when fully curled
    #[serde(default = "default_max_curl")]
    pub max_curl_degrees: f32,
    /// Max per-axis joint jitter in device units (0 = none)
    #[serde(default)]
    pub jitter: f32,
    /// Simulate the thumb dropping out of tracking every other curl cycle
    #[serde(default)]
    pub drop_thumb: bool,
}

fn default_curl_rate() -> f32 {
    0.5
}
fn default_max_curl() -> f32 {
    30.0
}

impl Default for SyntheticHandConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            curl_rate_hz: default_curl_rate(),
            max_curl_degrees: default_max_curl(),
            jitter: 0.0,
            drop_thumb: false,
        }
    }
}

/// Rest layout of one finger: knuckle base on the palm and bone lengths.
struct FingerRest {
    base: Vec3,
    bone_lengths: [f32; NUM_JOINTS - 1],
    splay_degrees: f32,
    phase: f32,
}

fn rest_pose(finger: FingerType) -> FingerRest {
    match finger {
        FingerType::Thumb => FingerRest {
            base: Vec3::new(-0.6, 0.0, 0.2),
            bone_lengths: [0.05, 0.55, 0.45, 0.35],
            splay_degrees: 40.0,
            phase: 0.0,
        },
        FingerType::Index => FingerRest {
            base: Vec3::new(-0.35, 0.0, 0.0),
            bone_lengths: [0.9, 0.55, 0.35, 0.25],
            splay_degrees: 8.0,
            phase: 0.1,
        },
        FingerType::Middle => FingerRest {
            base: Vec3::new(-0.1, 0.0, 0.0),
            bone_lengths: [0.9, 0.6, 0.4, 0.28],
            splay_degrees: 0.0,
            phase: 0.2,
        },
        FingerType::Ring => FingerRest {
            base: Vec3::new(0.15, 0.0, 0.0),
            bone_lengths: [0.85, 0.55, 0.37, 0.26],
            splay_degrees: -6.0,
            phase: 0.3,
        },
        FingerType::Pinky => FingerRest {
            base: Vec3::new(0.38, 0.0, 0.05),
            bone_lengths: [0.8, 0.42, 0.28, 0.22],
            splay_degrees: -14.0,
            phase: 0.4,
        },
    }
}

/// Deterministic synthetic tracking source.
///
/// `sample(t)` depends only on the config and `t`, so replaying the same
/// timestamps reproduces the same frames.
#[derive(Debug, Clone, Default)]
pub struct SyntheticHand {
    config: SyntheticHandConfig,
}

impl SyntheticHand {
    pub fn new(config: SyntheticHandConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyntheticHandConfig {
        &self.config
    }

    /// Curl amount in `[0, 1]` for a finger phase at time `t` seconds.
    fn curl(&self, t: f32, phase: f32) -> f32 {
        let cycle = (t * self.config.curl_rate_hz + phase) * std::f32::consts::TAU;
        0.5 * (1.0 - cycle.cos())
    }

    /// Sample the hand at `t` seconds.
    pub fn sample(&self, t: f32) -> HandFrame {
        let mut rng = StdRng::seed_from_u64(self.config.seed ^ (t * 1000.0).round() as u64);
        let mut frame = HandFrame::default();

        let cycle = (t * self.config.curl_rate_hz).floor() as i64;
        for finger in FingerType::ALL {
            if finger == FingerType::Thumb && self.config.drop_thumb && cycle % 2 == 1 {
                continue;
            }
            let rest = rest_pose(finger);
            let bend = self.curl(t, rest.phase) * self.config.max_curl_degrees;

            // Fingers extend along -Z and curl towards the palm normal (-Y).
            let splay = Quat::from_rotation_y(rest.splay_degrees.to_radians());
            let mut direction = splay * Vec3::NEG_Z;
            let mut position = rest.base;
            let mut joints = Vec::with_capacity(NUM_JOINTS);
            joints.push(position);
            for (bone, &length) in rest.bone_lengths.iter().enumerate() {
                if bone > 0 {
                    let axis = direction.cross(Vec3::NEG_Y).normalize_or_zero();
                    if axis != Vec3::ZERO {
                        direction = Quat::from_axis_angle(axis, bend.to_radians()) * direction;
                    }
                }
                position += direction * length;
                joints.push(position);
            }

            if self.config.jitter > 0.0 {
                let j = self.config.jitter;
                for joint in &mut joints {
                    *joint += Vec3::new(rng.gen_range(-j..=j), rng.gen_range(-j..=j), rng.gen_range(-j..=j));
                }
            }

            match FingerChain::from_joints(joints) {
                Ok(chain) => frame.set_finger(finger, chain),
                Err(e) => log::warn!("Synthetic {} chain rejected: {}", finger.name(), e),
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FingerSkeleton;

    #[test]
    fn sample_tracks_all_fingers_by_default() {
        let hand = SyntheticHand::default();
        let frame = hand.sample(0.25);
        assert_eq!(frame.tracked_count(), 5);
        for finger in FingerType::ALL {
            assert_eq!(frame.finger(finger).unwrap().num_joints(), NUM_JOINTS);
        }
    }

    #[test]
    fn sample_is_pure_in_time() {
        let hand = SyntheticHand::new(SyntheticHandConfig {
            seed: 42,
            jitter: 0.01,
            ..Default::default()
        });
        assert_eq!(hand.sample(1.5), hand.sample(1.5));
    }

    #[test]
    fn thumb_is_straight_at_time_zero() {
        let hand = SyntheticHand::default();
        let frame = hand.sample(0.0);
        // Other fingers are phase-shifted and already bending.
        let middle = frame.finger(FingerType::Middle).unwrap();
        assert!(middle.bone_direction(1).dot(middle.bone_direction(3)) < 0.999);
        let thumb = frame.finger(FingerType::Thumb).unwrap();
        let d1 = thumb.bone_direction(1);
        let d3 = thumb.bone_direction(3);
        assert!((d1.dot(d3) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn dropped_thumb_is_untracked_on_odd_cycles() {
        let hand = SyntheticHand::new(SyntheticHandConfig {
            drop_thumb: true,
            curl_rate_hz: 1.0,
            ..Default::default()
        });
        assert!(hand.sample(0.5).finger(FingerType::Thumb).is_some());
        assert!(hand.sample(1.5).finger(FingerType::Thumb).is_none());
    }
}
