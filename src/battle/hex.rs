//! Axial hex coordinates for the sandbox battle map
//!
//! Only distance and straight-line stepping are needed: reach checks are a
//! plain distance comparison, and approach moves walk the hex line.

use serde::{Deserialize, Serialize};

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Step count between two hexes
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        // Cube distance with the third axis folded in: |ds| = |dq + dr|
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }

    /// Walk up to `steps` hexes toward `target`, never entering its hex
    pub fn step_toward(&self, target: &Self, steps: u32) -> HexCoord {
        let total = self.distance(target);
        let taken = steps.min(total.saturating_sub(1));
        if taken == 0 {
            return *self;
        }

        let t = taken as f32 / total as f32;
        let q = self.q as f32 + (target.q - self.q) as f32 * t;
        let r = self.r as f32 + (target.r - self.r) as f32 * t;
        nearest_hex(q, r)
    }
}

/// Snap a fractional axial position to the hex containing it
fn nearest_hex(q: f32, r: f32) -> HexCoord {
    let (mut hq, mut hr) = (q.round(), r.round());
    let hs = (-q - r).round();
    let errors = [(hq - q).abs(), (hr - r).abs(), (hs + q + r).abs()];

    // Recompute whichever axis rounded worst from the other two
    if errors[0] > errors[1] && errors[0] > errors[2] {
        hq = -hr - hs;
    } else if errors[1] > errors[2] {
        hr = -hq - hs;
    }
    HexCoord::new(hq as i32, hr as i32)
}
