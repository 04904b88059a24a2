use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::{traits::RingClassifier, types::{ClassifiedRings, Ring}};

/// What to do with a ring whose signed area is exactly zero.
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ZeroAreaPolicy {
    /// Treat it as an outer ring (the `area >= 0` rule)
    Outer,
    /// Discard it silently
    Drop,
    /// Report it as a degenerate-orientation failure
    #[default]
    Flag,
}

/// Classifies rings by the sign of their shoelace area: positive is outer,
/// negative is hole.
#[derive(Debug, Clone, Default)]
pub struct SignedAreaClassifier {
    pub zero_area: ZeroAreaPolicy,
}

impl SignedAreaClassifier {
    pub fn new(zero_area: ZeroAreaPolicy) -> Self {
        Self { zero_area }
    }
}

impl RingClassifier for SignedAreaClassifier {
    fn classify(&self, rings: Vec<Ring>) -> ClassifiedRings {
        let mut classified = ClassifiedRings::default();

        for ring in rings {
            let area = ring.signed_area();
            if area > 0.0 {
                classified.outers.push(ring);
            } else if area < 0.0 {
                classified.holes.push(ring);
            } else {
                match self.zero_area {
                    ZeroAreaPolicy::Outer => classified.outers.push(ring),
                    ZeroAreaPolicy::Drop => {
                        tracing::debug!(points = ring.len(), "Dropping zero-area ring");
                    }
                    ZeroAreaPolicy::Flag => classified.degenerate.push(ring),
                }
            }
        }

        classified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ring(points: &[(f64, f64)]) -> Ring {
        Ring::from(points.iter().map(|&(x, y)| [x, y]).collect::<Vec<_>>())
    }

    fn unit_square() -> Ring {
        ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    fn collapsed() -> Ring {
        ring(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])
    }

    #[test]
    fn test_ccw_is_outer() {
        let result = SignedAreaClassifier::default().classify(vec![unit_square()]);
        assert_eq!(result.outers.len(), 1);
        assert!(result.holes.is_empty());
    }

    #[test]
    fn test_cw_is_hole() {
        let result = SignedAreaClassifier::default().classify(vec![unit_square().reverse()]);
        assert!(result.outers.is_empty());
        assert_eq!(result.holes.len(), 1);
    }

    #[test]
    fn test_order_preserved() {
        let a = unit_square();
        let b = ring(&[(5.0, 5.0), (6.0, 5.0), (6.0, 6.0)]);
        let h1 = a.reverse();
        let h2 = b.reverse();
        let result = SignedAreaClassifier::default()
            .classify(vec![h1.clone(), a.clone(), h2.clone(), b.clone()]);
        assert_eq!(result.outers, vec![a, b]);
        assert_eq!(result.holes, vec![h1, h2]);
    }

    #[test]
    fn test_zero_area_policies() {
        let flagged = SignedAreaClassifier::new(ZeroAreaPolicy::Flag).classify(vec![collapsed()]);
        assert_eq!(flagged.degenerate.len(), 1);
        assert!(flagged.outers.is_empty());

        let dropped = SignedAreaClassifier::new(ZeroAreaPolicy::Drop).classify(vec![collapsed()]);
        assert_eq!(dropped, ClassifiedRings::default());

        let outer = SignedAreaClassifier::new(ZeroAreaPolicy::Outer).classify(vec![collapsed()]);
        assert_eq!(outer.outers.len(), 1);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(ZeroAreaPolicy::from_str("drop").ok(), Some(ZeroAreaPolicy::Drop));
        assert_eq!(ZeroAreaPolicy::Flag.to_string(), "flag");
        assert_eq!(ZeroAreaPolicy::VARIANTS, &["outer", "drop", "flag"]);
    }
}
