use super::types::{ProjectionInput, ProjectionResult};

/// Compounding periods per year.
const PERIODS_PER_YEAR: f64 = 12.0;

/// Unrounded projection outputs, plus the horizon they were computed over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub years: u32,
    pub months: u64,
    pub total_invested: f64,
    pub interest_earned: f64,
    pub maturity_amount: f64,
    pub lump_sum: f64,
    pub annuity_value: f64,
    pub estimated_monthly_pension: f64,
}

impl Projection {
    /// Rounds to whole units. Interest and lump sum are taken as differences of
    /// the rounded totals, so both breakdowns add up to the maturity amount exactly.
    /// Amounts beyond `i64::MAX` saturate.
    pub fn rounded(&self) -> ProjectionResult {
        let total_invested = round_currency(self.total_invested);
        let maturity_amount = round_currency(self.maturity_amount);
        let annuity_value = round_currency(self.annuity_value).min(maturity_amount);

        ProjectionResult {
            total_invested,
            interest_earned: maturity_amount.saturating_sub(total_invested),
            maturity_amount,
            lump_sum: maturity_amount.saturating_sub(annuity_value),
            annuity_value,
            estimated_monthly_pension: round_currency(self.estimated_monthly_pension),
        }
    }
}

pub fn run_projection(input: &ProjectionInput) -> ProjectionResult {
    project(input).rounded()
}

pub fn project(input: &ProjectionInput) -> Projection {
    let input = input.sanitized();
    let years = input.years();
    let months = input.months();
    let contribution = input.monthly_contribution;
    let annual_rate = input.annual_return_percent / 100.0;

    let total_invested = contribution * months as f64;
    let maturity_amount = sip_future_value(contribution, annual_rate, years);
    let interest_earned = maturity_amount - total_invested;
    let annuity_value = maturity_amount * (input.annuity_percent / 100.0);
    let lump_sum = maturity_amount - annuity_value;
    let estimated_monthly_pension =
        annuity_value * (input.annuity_annual_rate_percent / 100.0) / PERIODS_PER_YEAR;

    Projection {
        years,
        months,
        total_invested,
        interest_earned,
        maturity_amount,
        lump_sum,
        annuity_value,
        estimated_monthly_pension,
    }
}

/// Future value of a monthly contribution paid at the start of each period.
///
/// A zero rate or empty horizon yields 0, not the `contribution * months`
/// limit of the closed form.
pub fn sip_future_value(contribution: f64, annual_rate: f64, years: u32) -> f64 {
    if annual_rate <= 0.0 || years == 0 {
        return 0.0;
    }

    let periodic_rate = annual_rate / PERIODS_PER_YEAR;
    let periods = PERIODS_PER_YEAR * f64::from(years);
    let growth = (1.0 + periodic_rate).powf(periods);

    contribution * ((growth - 1.0) / periodic_rate) * (1.0 + periodic_rate)
}

/// Rounds to the nearest whole unit with halves going up, so -2.5 becomes -2.
fn round_currency(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MAX_AGE;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_input() -> ProjectionInput {
        ProjectionInput {
            monthly_contribution: 5_000.0,
            annual_return_percent: 10.0,
            start_age: 25,
            retirement_age: 60,
            annuity_percent: 40.0,
            annuity_annual_rate_percent: 6.0,
        }
    }

    fn assert_all_zero(result: &ProjectionResult) {
        assert_eq!(result.total_invested, 0);
        assert_eq!(result.interest_earned, 0);
        assert_eq!(result.maturity_amount, 0);
        assert_eq!(result.lump_sum, 0);
        assert_eq!(result.annuity_value, 0);
        assert_eq!(result.estimated_monthly_pension, 0);
    }

    #[test]
    fn reference_scenario_matches_closed_form() {
        let projection = project(&sample_input());
        assert_eq!(projection.years, 35);
        assert_eq!(projection.months, 420);
        assert_approx(projection.total_invested, 2_100_000.0);

        let monthly_rate: f64 = 0.10 / 12.0;
        let expected_fv =
            5_000.0 * ((1.0 + monthly_rate).powi(420) - 1.0) / monthly_rate * (1.0 + monthly_rate);
        assert_approx_tol(projection.maturity_amount, expected_fv, 1e-4);
        assert_approx_tol(projection.maturity_amount, 19_141_383.511_155_77, 1e-3);
        assert_approx_tol(projection.annuity_value, expected_fv * 0.4, 1e-4);
        assert_approx_tol(projection.lump_sum, expected_fv * 0.6, 1e-4);
        assert_approx_tol(
            projection.estimated_monthly_pension,
            expected_fv * 0.4 * 0.06 / 12.0,
            1e-6,
        );

        let result = projection.rounded();
        assert_eq!(result.total_invested, 2_100_000);
        assert_eq!(result.interest_earned, 17_041_384);
        assert_eq!(result.maturity_amount, 19_141_384);
        assert_eq!(result.lump_sum, 11_484_831);
        assert_eq!(result.annuity_value, 7_656_553);
        assert_eq!(result.estimated_monthly_pension, 38_283);
    }

    #[test]
    fn oracle_single_year_matches_hand_calculation() {
        // 12% a year is 1% a month; 100 paid at the start of each of 12 months:
        // 100 * (1.01^12 - 1) / 0.01 * 1.01 = 1280.9328...
        let input = ProjectionInput {
            monthly_contribution: 100.0,
            annual_return_percent: 12.0,
            start_age: 40,
            retirement_age: 41,
            annuity_percent: 50.0,
            annuity_annual_rate_percent: 12.0,
        };
        let projection = project(&input);
        let expected = 100.0 * (1.01f64.powi(12) - 1.0) / 0.01 * 1.01;
        assert_approx(projection.maturity_amount, expected);
        assert_approx(projection.total_invested, 1_200.0);
        assert_approx(projection.interest_earned, expected - 1_200.0);
        assert_approx(projection.annuity_value, expected / 2.0);
        assert_approx(projection.estimated_monthly_pension, expected / 2.0 * 0.01);
        assert_eq!(projection.rounded().maturity_amount, 1_281);
    }

    #[test]
    fn zero_return_keeps_guard_and_reports_negative_interest() {
        let mut input = sample_input();
        input.annual_return_percent = 0.0;

        let result = run_projection(&input);
        assert_eq!(result.maturity_amount, 0);
        assert_eq!(result.lump_sum, 0);
        assert_eq!(result.annuity_value, 0);
        assert_eq!(result.estimated_monthly_pension, 0);
        assert_eq!(result.total_invested, 2_100_000);
        assert_eq!(result.interest_earned, -2_100_000);
    }

    #[test]
    fn retirement_at_or_before_start_age_is_all_zero() {
        let mut input = sample_input();
        input.retirement_age = input.start_age;
        assert_all_zero(&run_projection(&input));

        input.start_age = 61;
        input.retirement_age = 60;
        assert_all_zero(&run_projection(&input));
    }

    #[test]
    fn zero_contribution_is_all_zero() {
        let mut input = sample_input();
        input.monthly_contribution = 0.0;
        assert_all_zero(&run_projection(&input));
    }

    #[test]
    fn full_annuitisation_leaves_no_lump_sum() {
        let mut input = sample_input();
        input.annuity_percent = 100.0;
        let projection = project(&input);
        assert_approx(projection.lump_sum, 0.0);
        assert_eq!(projection.rounded().lump_sum, 0);
        assert_eq!(
            projection.rounded().annuity_value,
            projection.rounded().maturity_amount
        );
    }

    #[test]
    fn project_clamps_directly_built_inputs() {
        let mut input = sample_input();
        input.annuity_percent = 10.0;
        input.annual_return_percent = 500.0;
        let clamped = project(&input);
        let expected = project(&ProjectionInput {
            annuity_percent: 40.0,
            annual_return_percent: 100.0,
            ..input
        });
        assert_eq!(clamped, expected);
    }

    #[test]
    fn maximum_horizon_at_full_return_keeps_breakdown_exact() {
        let input = ProjectionInput {
            monthly_contribution: 5_000.0,
            annual_return_percent: 100.0,
            start_age: 0,
            retirement_age: 250,
            annuity_percent: 40.0,
            annuity_annual_rate_percent: 6.0,
        };
        let projection = project(&input);
        assert_eq!(projection.years, MAX_AGE);
        assert_eq!(projection.months, 1_200);
        assert!(projection.maturity_amount.is_finite());

        let result = projection.rounded();
        assert_eq!(result.total_invested, 6_000_000);
        assert_eq!(
            result.lump_sum.checked_add(result.annuity_value),
            Some(result.maturity_amount)
        );
        assert_eq!(
            result.total_invested.checked_add(result.interest_earned),
            Some(result.maturity_amount)
        );
        assert!(result.lump_sum >= 0);
        assert!(result.interest_earned >= 0);
    }

    #[test]
    fn round_currency_sends_halves_up() {
        assert_eq!(round_currency(2.5), 3);
        assert_eq!(round_currency(2.4999), 2);
        assert_eq!(round_currency(-2.5), -2);
        assert_eq!(round_currency(-2.6), -3);
        assert_eq!(round_currency(0.0), 0);
    }

    #[test]
    fn sip_future_value_guards_zero_rate_and_horizon() {
        assert_approx(sip_future_value(1_000.0, 0.0, 10), 0.0);
        assert_approx(sip_future_value(1_000.0, 0.08, 0), 0.0);
        assert_approx_tol(sip_future_value(1_000.0, 0.08, 10), 184_165.675_416_251_3, 1e-6);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_rounded_breakdown_satisfies_invariants(
            contribution in 0u32..200_000,
            return_bp in 0u32..3_000,
            start_age in 18u32..60,
            horizon in 0u32..45,
            annuity_percent in 40u32..101,
            annuity_rate_bp in 100u32..1_501
        ) {
            let input = ProjectionInput {
                monthly_contribution: contribution as f64,
                annual_return_percent: return_bp as f64 / 100.0,
                start_age,
                retirement_age: start_age + horizon,
                annuity_percent: annuity_percent as f64,
                annuity_annual_rate_percent: annuity_rate_bp as f64 / 100.0,
            };
            let projection = project(&input);
            let result = projection.rounded();

            prop_assert_eq!(
                result.total_invested.checked_add(result.interest_earned),
                Some(result.maturity_amount)
            );
            prop_assert_eq!(
                result.lump_sum.checked_add(result.annuity_value),
                Some(result.maturity_amount)
            );
            prop_assert!((projection.lump_sum - result.lump_sum as f64).abs() <= 1.0);
            prop_assert!(result.total_invested >= 0);
            prop_assert!(result.maturity_amount >= 0);
            prop_assert!(result.lump_sum >= 0);
            prop_assert!(result.annuity_value >= 0);
            prop_assert!(result.estimated_monthly_pension >= 0);
            prop_assert_eq!(projection.months, u64::from(horizon) * 12);

            if annuity_percent == 100 {
                prop_assert_eq!(result.lump_sum, 0);
            }
            if return_bp == 0 || horizon == 0 {
                prop_assert_eq!(result.maturity_amount, 0);
            }
            if return_bp > 0 && horizon > 0 {
                // Compounding never loses money at a positive rate.
                prop_assert!(projection.maturity_amount + 1e-6 >= projection.total_invested);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_breakdown_stays_exact_at_domain_edge(
            contribution in 0u32..1_000_000,
            return_bp in 5_000u32..10_001,
            start_age in 0u32..30,
            retirement_age in 80u32..400,
            annuity_percent in 40u32..101
        ) {
            let input = ProjectionInput {
                monthly_contribution: contribution as f64,
                annual_return_percent: return_bp as f64 / 100.0,
                start_age,
                retirement_age,
                annuity_percent: annuity_percent as f64,
                annuity_annual_rate_percent: 15.0,
            };
            let projection = project(&input);
            let result = projection.rounded();

            prop_assert!(projection.years <= MAX_AGE);
            prop_assert!(projection.maturity_amount.is_finite());
            prop_assert_eq!(
                result.total_invested.checked_add(result.interest_earned),
                Some(result.maturity_amount)
            );
            prop_assert_eq!(
                result.lump_sum.checked_add(result.annuity_value),
                Some(result.maturity_amount)
            );
            prop_assert!(result.lump_sum >= 0);
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_higher_returns_do_not_reduce_maturity(
            contribution in 1u32..100_000,
            low_bp in 1u32..2_000,
            extra_bp in 0u32..1_000,
            horizon in 1u32..40
        ) {
            let mut input = sample_input();
            input.monthly_contribution = contribution as f64;
            input.start_age = 20;
            input.retirement_age = 20 + horizon;
            input.annual_return_percent = low_bp as f64 / 100.0;
            let low = project(&input);
            input.annual_return_percent = (low_bp + extra_bp) as f64 / 100.0;
            let high = project(&input);

            prop_assert!(high.maturity_amount + 1e-6 >= low.maturity_amount);
        }
    }
}
