use geo::Intersects;
use geo_types::Polygon;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::{
    traits::ContainmentMatcher,
    types::{MatchedRings, Ring, RingGroup},
};

/// How to resolve a hole that more than one outer ring claims.
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SharedHolePolicy {
    /// Copy the hole into every polygon that claims it
    #[default]
    Duplicate,
    /// Give the hole only to the smallest claiming outer
    SmallestEnclosing,
}

/// Matches holes to outers by testing one witness vertex per hole.
///
/// Holes produced by a filled-contour routine are strictly nested in their
/// outer ring, so the first vertex decides containment for the whole hole.
/// A witness lying on the outer boundary counts as contained.
#[derive(Debug, Clone, Default)]
pub struct WitnessPointMatcher {
    pub shared_holes: SharedHolePolicy,
}

impl WitnessPointMatcher {
    pub fn new(shared_holes: SharedHolePolicy) -> Self {
        Self { shared_holes }
    }

    /// For each outer, which holes its boundary encloses.
    fn claims(outers: &[Ring], holes: &[Ring]) -> Vec<Vec<bool>> {
        let witnesses: Vec<_> = holes.iter().map(Ring::first).collect();

        outers
            .iter()
            .map(|outer| {
                let boundary = Polygon::new(outer.to_line_string(), vec![]);
                witnesses
                    .iter()
                    .map(|w| w.is_some_and(|c| boundary.intersects(&c)))
                    .collect()
            })
            .collect()
    }

    /// Keep each multiply-claimed hole only in the smallest claiming outer.
    fn keep_smallest(outers: &[Ring], claims: &mut [Vec<bool>], hole_count: usize) {
        let areas: Vec<f64> = outers.iter().map(Ring::unsigned_area).collect();

        for hole in 0..hole_count {
            let claimants: Vec<usize> = (0..outers.len()).filter(|&o| claims[o][hole]).collect();
            if claimants.len() < 2 {
                continue;
            }
            let smallest = claimants
                .iter()
                .copied()
                .min_by(|&a, &b| areas[a].total_cmp(&areas[b]))
                .unwrap_or(claimants[0]);
            for o in claimants {
                claims[o][hole] = o == smallest;
            }
        }
    }
}

impl ContainmentMatcher for WitnessPointMatcher {
    fn match_holes(&self, outers: Vec<Ring>, holes: Vec<Ring>) -> MatchedRings {
        let mut claims = Self::claims(&outers, &holes);

        if self.shared_holes == SharedHolePolicy::SmallestEnclosing {
            Self::keep_smallest(&outers, &mut claims, holes.len());
        }

        let mut claimed = vec![false; holes.len()];
        let mut shared = 0usize;
        let groups: Vec<RingGroup> = outers
            .into_iter()
            .zip(&claims)
            .map(|(outer, inout)| {
                let mine = holes
                    .iter()
                    .zip(inout)
                    .enumerate()
                    .filter(|&(_, (_, &inside))| inside)
                    .map(|(i, (hole, _))| {
                        if claimed[i] {
                            shared += 1;
                        }
                        claimed[i] = true;
                        hole.clone()
                    })
                    .collect();
                RingGroup { outer, holes: mine }
            })
            .collect();

        if shared > 0 {
            tracing::warn!(shared, "Holes claimed by more than one outer ring were duplicated");
        }

        let orphans: Vec<Ring> = holes
            .into_iter()
            .zip(claimed)
            .filter(|(_, c)| !c)
            .map(|(hole, _)| hole)
            .collect();

        MatchedRings { groups, orphans }
    }
}
