//! Fee policy: pluggable, supplied by the integrator.
//!
//! The upstream fee schedule is not authoritative, so the engine only fixes
//! the shape: late fees derive from elapsed overdue time, damage fees from
//! return condition, both non-negative by type.

use chrono::Duration;

use crate::receipt::ReturnCondition;

/// Computes fees for a return. Amounts are in smallest currency unit.
pub trait FeePolicy: Send + Sync {
    /// Fee for the elapsed overdue duration (zero when returned on time).
    fn late_fee(&self, overdue: Duration) -> u64;

    /// Fee for the condition of the returned units (zero for `Good`).
    fn damage_fee(&self, condition: ReturnCondition) -> u64;
}

/// No fees ever. The default wiring when the institution bills elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFees;

impl FeePolicy for NoFees {
    fn late_fee(&self, _overdue: Duration) -> u64 {
        0
    }

    fn damage_fee(&self, _condition: ReturnCondition) -> u64 {
        0
    }
}

/// Flat per-day late fee plus fixed condition fees.
#[derive(Debug, Clone, Copy)]
pub struct FlatRateFees {
    pub per_day_cents: u64,
    pub damaged_cents: u64,
    pub lost_cents: u64,
}

impl FeePolicy for FlatRateFees {
    fn late_fee(&self, overdue: Duration) -> u64 {
        let secs = overdue.num_seconds();
        if secs <= 0 {
            return 0;
        }
        // Any started day counts as a full day.
        let days = (secs as u64).div_ceil(86_400);
        days * self.per_day_cents
    }

    fn damage_fee(&self, condition: ReturnCondition) -> u64 {
        match condition {
            ReturnCondition::Good => 0,
            ReturnCondition::Damaged => self.damaged_cents,
            ReturnCondition::Lost => self.lost_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_policy() -> FlatRateFees {
        FlatRateFees {
            per_day_cents: 500,
            damaged_cents: 2_500,
            lost_cents: 10_000,
        }
    }

    #[test]
    fn no_fees_is_always_zero() {
        assert_eq!(NoFees.late_fee(Duration::days(30)), 0);
        assert_eq!(NoFees.damage_fee(ReturnCondition::Lost), 0);
    }

    #[test]
    fn on_time_return_owes_nothing() {
        assert_eq!(test_policy().late_fee(Duration::zero()), 0);
        assert_eq!(test_policy().late_fee(Duration::seconds(-60)), 0);
    }

    #[test]
    fn partial_day_overdue_charges_a_full_day() {
        assert_eq!(test_policy().late_fee(Duration::hours(1)), 500);
        assert_eq!(test_policy().late_fee(Duration::hours(25)), 1_000);
        assert_eq!(test_policy().late_fee(Duration::days(3)), 1_500);
    }

    #[test]
    fn damage_fee_is_zero_only_for_good_condition() {
        let policy = test_policy();
        assert_eq!(policy.damage_fee(ReturnCondition::Good), 0);
        assert_eq!(policy.damage_fee(ReturnCondition::Damaged), 2_500);
        assert_eq!(policy.damage_fee(ReturnCondition::Lost), 10_000);
    }

    proptest::proptest! {
        /// Property: a longer overdue period never costs less.
        #[test]
        fn late_fee_is_monotone(a in 0i64..10_000_000, b in 0i64..10_000_000) {
            let policy = test_policy();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            proptest::prop_assert!(
                policy.late_fee(Duration::seconds(lo)) <= policy.late_fee(Duration::seconds(hi))
            );
        }
    }
}
