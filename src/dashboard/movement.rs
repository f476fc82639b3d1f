//! Period-over-period change of a total.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const PERCENTAGE_DECIMAL_PLACES: u32 = 2;

/// A total for the current period paired with how much it changed since the
/// previous period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMovement {
    /// The total for the current period. Negative for a net loss.
    pub total: Decimal,
    /// The signed change since the previous period, e.g. "+12.5%", "-50%" or
    /// "0%".
    pub increase_percentage: String,
}

/// Compare the `current` total against the `previous` total.
///
/// Growth from a previous total of zero is reported as a flat 100%, and no
/// change from zero to zero as 0%.
///
/// A change too large to represent as a [Decimal] saturates at
/// [Decimal::MAX] or [Decimal::MIN] percent, keeping its sign.
pub fn compute_movement(current: Decimal, previous: Decimal) -> FinancialMovement {
    let percentage = if previous.is_zero() {
        if current.is_zero() {
            Decimal::ZERO
        } else {
            Decimal::ONE_HUNDRED
        }
    } else {
        relative_change(current, previous).unwrap_or_else(|| {
            tracing::warn!(
                "percentage change from {previous} to {current} overflowed, saturating"
            );
            if (current > previous) == previous.is_sign_positive() {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        })
    };

    FinancialMovement {
        total: current,
        increase_percentage: format_percentage(percentage),
    }
}

/// `(current - previous) / previous * 100`, or `None` on overflow.
///
/// Dividing before scaling keeps headroom for totals near [Decimal::MAX].
fn relative_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Format `percentage` rounded to two decimal places with trailing zeros
/// removed.
///
/// Positive values are prefixed with "+", zero is "0%".
pub fn format_percentage(percentage: Decimal) -> String {
    let rounded = percentage
        .round_dp_with_strategy(
            PERCENTAGE_DECIMAL_PLACES,
            RoundingStrategy::MidpointAwayFromZero,
        )
        .normalize();

    if rounded.is_zero() {
        "0%".to_owned()
    } else if rounded.is_sign_positive() {
        format!("+{rounded}%")
    } else {
        format!("{rounded}%")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{FinancialMovement, compute_movement, format_percentage};

    fn movement(total: Decimal, increase_percentage: &str) -> FinancialMovement {
        FinancialMovement {
            total,
            increase_percentage: increase_percentage.to_owned(),
        }
    }

    #[test]
    fn zero_to_zero_is_no_change() {
        assert_eq!(compute_movement(dec!(0), dec!(0)), movement(dec!(0), "0%"));
    }

    #[test]
    fn growth_from_zero_is_clamped_to_one_hundred_percent() {
        assert_eq!(compute_movement(dec!(100), dec!(0)), movement(dec!(100), "+100%"));
        assert_eq!(compute_movement(dec!(0.01), dec!(0)), movement(dec!(0.01), "+100%"));
    }

    #[test]
    fn negative_total_from_zero_is_still_plus_one_hundred_percent() {
        assert_eq!(compute_movement(dec!(-30), dec!(0)), movement(dec!(-30), "+100%"));
    }

    #[test]
    fn increase_is_prefixed_with_plus() {
        assert_eq!(compute_movement(dec!(150), dec!(100)), movement(dec!(150), "+50%"));
    }

    #[test]
    fn decrease_keeps_single_minus() {
        assert_eq!(compute_movement(dec!(50), dec!(100)), movement(dec!(50), "-50%"));
    }

    #[test]
    fn drop_to_zero_is_minus_one_hundred_percent() {
        assert_eq!(compute_movement(dec!(0), dec!(80)), movement(dec!(0), "-100%"));
    }

    #[test]
    fn unchanged_total_is_zero_percent() {
        assert_eq!(compute_movement(dec!(42), dec!(42)), movement(dec!(42), "0%"));
    }

    #[test]
    fn negative_previous_total_uses_plain_formula() {
        // (10 - -20) / -20 * 100
        assert_eq!(compute_movement(dec!(10), dec!(-20)), movement(dec!(10), "-150%"));
    }

    #[test]
    fn rounds_to_two_decimal_places() {
        assert_eq!(compute_movement(dec!(4), dec!(3)).increase_percentage, "+33.33%");
        assert_eq!(compute_movement(dec!(2), dec!(3)).increase_percentage, "-33.33%");
        assert_eq!(compute_movement(dec!(225), dec!(200)).increase_percentage, "+12.5%");
    }

    #[test]
    fn rounds_midpoints_away_from_zero() {
        assert_eq!(format_percentage(dec!(0.125)), "+0.13%");
        assert_eq!(format_percentage(dec!(-0.125)), "-0.13%");
    }

    #[test]
    fn tiny_negative_change_does_not_render_as_negative_zero() {
        assert_eq!(format_percentage(dec!(-0.001)), "0%");
    }

    #[test]
    fn large_totals_divide_before_scaling() {
        let previous = Decimal::from_scientific("1e27").unwrap();
        let current = Decimal::from_scientific("2e27").unwrap();

        assert_eq!(compute_movement(current, previous), movement(current, "+100%"));
    }

    #[test]
    fn overflowing_increase_saturates_at_max() {
        let current = Decimal::from_scientific("1e27").unwrap();

        assert_eq!(
            compute_movement(current, dec!(1)),
            movement(current, &format!("+{}%", Decimal::MAX))
        );
    }

    #[test]
    fn overflowing_decrease_saturates_at_min() {
        // The difference itself overflows before it can be divided.
        assert_eq!(
            compute_movement(Decimal::MIN, Decimal::MAX).increase_percentage,
            format!("{}%", Decimal::MIN)
        );
        assert_eq!(
            compute_movement(Decimal::MAX, dec!(-0.0000001)).increase_percentage,
            format!("{}%", Decimal::MIN)
        );
    }

    #[test]
    fn serializes_with_camel_case_field() {
        let json = serde_json::to_value(movement(dec!(150), "+50%")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"total": 150.0, "increasePercentage": "+50%"})
        );
    }
}
