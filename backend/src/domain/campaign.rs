//! Fundraising goal and progress reporting.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use super::money::Amount;

/// Validation error raised when a goal is not strictly positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalMustBePositiveError;

impl fmt::Display for GoalMustBePositiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fundraising goal must be greater than zero")
    }
}

impl std::error::Error for GoalMustBePositiveError {}

/// Campaign target amount.
///
/// ## Invariants
/// - Strictly positive, so percent-complete is always well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundraisingGoal(Amount);

impl FundraisingGoal {
    /// Validate and wrap a goal amount.
    ///
    /// # Errors
    ///
    /// Returns [`GoalMustBePositiveError`] when the amount is zero.
    pub fn new(amount: Amount) -> Result<Self, GoalMustBePositiveError> {
        if amount.is_zero() {
            return Err(GoalMustBePositiveError);
        }
        Ok(Self(amount))
    }

    /// The target amount.
    #[must_use]
    pub const fn amount(self) -> Amount {
        self.0
    }
}

/// Snapshot of how far the campaign has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProgress {
    /// Sum of recorded donations, in kobo.
    raised: Amount,
    /// Campaign target, in kobo.
    goal: Amount,
    /// Whole-number percent complete, capped at 100.
    percent: u8,
}

impl CampaignProgress {
    /// Compute progress from the raised total and the configured goal.
    #[must_use]
    pub fn compute(raised: Amount, goal: FundraisingGoal) -> Self {
        let scaled = i128::from(raised.kobo()).saturating_mul(100);
        let percent = scaled
            .checked_div(i128::from(goal.amount().kobo()))
            .unwrap_or(0)
            .clamp(0, 100);
        Self {
            raised,
            goal: goal.amount(),
            // Clamped to 0..=100 above, so the narrowing is lossless.
            percent: u8::try_from(percent).unwrap_or(100),
        }
    }

    /// Sum of recorded donations.
    #[must_use]
    pub fn raised(&self) -> Amount {
        self.raised
    }

    /// Campaign target.
    #[must_use]
    pub fn goal(&self) -> Amount {
        self.goal
    }

    /// Whole-number percent complete, capped at 100.
    #[must_use]
    pub fn percent(&self) -> u8 {
        self.percent
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn goal(kobo: i64) -> FundraisingGoal {
        FundraisingGoal::new(Amount::from_kobo(kobo).expect("non-negative"))
            .expect("positive goal")
    }

    #[test]
    fn zero_goals_are_rejected() {
        assert_eq!(
            FundraisingGoal::new(Amount::ZERO),
            Err(GoalMustBePositiveError)
        );
    }

    #[rstest]
    #[case(0, 100_000, 0)]
    #[case(25_000, 100_000, 25)]
    #[case(99_999, 100_000, 99)]
    #[case(100_000, 100_000, 100)]
    #[case(250_000, 100_000, 100)]
    fn percent_is_floored_and_capped(
        #[case] raised: i64,
        #[case] goal_kobo: i64,
        #[case] expected: u8,
    ) {
        let raised = Amount::from_kobo(raised).expect("non-negative");
        let progress = CampaignProgress::compute(raised, goal(goal_kobo));
        assert_eq!(progress.percent(), expected);
    }

    #[test]
    fn snapshot_serialises_camel_case() {
        let progress = CampaignProgress::compute(
            Amount::from_kobo(5000).expect("non-negative"),
            goal(100_000),
        );
        let value = serde_json::to_value(progress).expect("serialises");
        assert_eq!(value.get("raised"), Some(&serde_json::json!(5000)));
        assert_eq!(value.get("goal"), Some(&serde_json::json!(100_000)));
        assert_eq!(value.get("percent"), Some(&serde_json::json!(5)));
    }
}
