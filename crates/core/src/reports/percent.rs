//! Percent arithmetic shared by every trend and comparison figure.

use rust_decimal::Decimal;

/// One hundred, the percent scale.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Lower bound stored in a period comparison.
pub const COMPARISON_FLOOR: Decimal = Decimal::from_parts(100, 0, 0, true, 0);

/// Upper bound stored in a period comparison.
pub const COMPARISON_CEILING: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Percent change from `previous` to `current`.
///
/// Rules, in order:
/// - `previous == 0`: `100` when `current > 0`, otherwise `0`.
/// - Opposite signs: `-100`, a full reversal regardless of magnitude.
/// - Shrinking magnitude: `-(|previous| - |current|) / |current| * 100`. The
///   divisor is the current value; when it is zero the result is `-100`.
/// - Otherwise: `(|current| - |previous|) / |previous| * 100`.
///
/// Results that overflow the decimal range saturate.
#[must_use]
pub fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            HUNDRED
        } else {
            Decimal::ZERO
        };
    }

    let flipped = (current < Decimal::ZERO && previous > Decimal::ZERO)
        || (current > Decimal::ZERO && previous < Decimal::ZERO);
    if flipped {
        return -HUNDRED;
    }

    let current = current.abs();
    let previous = previous.abs();

    if current < previous {
        if current.is_zero() {
            return -HUNDRED;
        }
        return -scaled_ratio(previous - current, current);
    }

    scaled_ratio(current - previous, previous)
}

/// Clamps a percent to the display range of a period comparison.
#[must_use]
pub fn clamp_comparison(percent: Decimal) -> Decimal {
    percent.clamp(COMPARISON_FLOOR, COMPARISON_CEILING)
}

/// `part / total * 100`, or `None` when `total` is not positive.
#[must_use]
pub fn share_of(part: Decimal, total: Decimal) -> Option<Decimal> {
    (total > Decimal::ZERO).then(|| scaled_ratio(part, total))
}

/// `numerator / denominator * 100`, saturating on overflow.
fn scaled_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or(if numerator.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}
