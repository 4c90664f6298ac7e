//! Window growth policies
//!
//! Decide how many raw items the next retrieval round asks for.

use serde::{Deserialize, Serialize};

/// Strategy for choosing the window of the next retrieval round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Re-request the same window every round
    #[default]
    Fixed,

    /// Multiply the window every round
    Geometric {
        /// Growth factor (at least 2)
        multiple: usize,
    },

    /// Move the window halfway towards the number of matches still needed,
    /// rounding up
    MedianReselect,
}

impl GrowthPolicy {
    /// Create a geometric policy
    pub fn geometric(multiple: usize) -> Self {
        Self::Geometric { multiple }
    }

    /// Window for the round after one that used `current`, given that
    /// `remaining` filtered matches are still needed. Never returns 0.
    pub fn next_window(&self, current: usize, remaining: usize) -> usize {
        let next = match self {
            Self::Fixed => current,
            Self::Geometric { multiple } => current.saturating_mul(*multiple),
            Self::MedianReselect => current.saturating_add(remaining).div_ceil(2),
        };
        next.max(1)
    }

    /// Check if the policy keeps the window constant
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_keeps_window() {
        assert_eq!(GrowthPolicy::Fixed.next_window(10, 3), 10);
        assert_eq!(GrowthPolicy::Fixed.next_window(1, 100), 1);
        assert!(GrowthPolicy::default().is_fixed());
    }

    #[test]
    fn test_geometric_multiplies() {
        let policy = GrowthPolicy::geometric(2);
        assert_eq!(policy.next_window(3, 3), 6);
        assert_eq!(policy.next_window(48, 1), 96);
        assert_eq!(policy.next_window(usize::MAX, 1), usize::MAX);
        assert!(!policy.is_fixed());
    }

    #[test]
    fn test_median_reselect_rounds_up() {
        let policy = GrowthPolicy::MedianReselect;
        assert_eq!(policy.next_window(10, 4), 7);
        assert_eq!(policy.next_window(10, 5), 8);
        assert_eq!(policy.next_window(2, 20), 11);
        assert_eq!(policy.next_window(1, 0), 1);
    }

    #[test]
    fn test_policy_serde_tags() {
        let policy: GrowthPolicy = serde_yaml::from_str("type: geometric\nmultiple: 3").unwrap();
        assert_eq!(policy, GrowthPolicy::geometric(3));

        let policy: GrowthPolicy = serde_json::from_str(r#"{"type":"median_reselect"}"#).unwrap();
        assert_eq!(policy, GrowthPolicy::MedianReselect);
    }
}
