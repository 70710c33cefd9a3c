//! Deterministic integer arithmetic used by the pricing models.
//!
//! Every operation here clamps instead of wrapping or panicking: overflow
//! behaviour is part of the chain state and must be identical on all nodes.
use crate::types::Wei;

/// Fixed-point number where one unit is 1/10000.
#[derive(
    Copy,
    Clone,
    Default,
    Debug,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Bips(pub i64);

pub const ONE_IN_BIPS: Bips = Bips(10_000);

impl Bips {
    pub const ZERO: Bips = Bips(0);
    pub const MAX: Bips = Bips(i64::MAX);

    pub fn saturating_add(self, rhs: Bips) -> Bips {
        Bips(self.0.saturating_add(rhs.0))
    }

    /// Integer division truncating towards zero. Dividing by zero yields
    /// [`Bips::MAX`] (or its negation), i.e. "infinitely large".
    pub fn saturating_div(self, divisor: Bips) -> Bips {
        if divisor.0 == 0 {
            return if self.0 < 0 { Bips(-i64::MAX) } else { Bips::MAX };
        }
        Bips(self.0.checked_div(divisor.0).unwrap_or(i64::MAX))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Converts a whole number into basis points, saturating.
pub fn natural_to_bips(natural: u64) -> Bips {
    Bips(saturating_i64(natural).saturating_mul(ONE_IN_BIPS.0))
}

/// Casts `value` to `i64`, clamping at `i64::MAX`.
pub fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Casts `value` to `u64`, clamping negative values to zero.
pub fn saturating_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Casts `value` to `u32`, clamping at `u32::MAX`.
pub fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Approximates `e^(value / 10000)` in basis points with a truncated
/// Maclaurin series evaluated in Horner form.
///
/// The exact integer sequence of this function is consensus critical. The
/// result for a negative argument is the reciprocal of the positive one.
pub fn approx_exp_basis_points(value: Bips, accuracy: u64) -> Bips {
    if accuracy == 0 {
        return ONE_IN_BIPS;
    }
    let input = value.0.unsigned_abs();
    let bips = ONE_IN_BIPS.0 as u64;
    let mut res = bips.saturating_add(input / accuracy);
    for i in 1..accuracy {
        // (accuracy - i) is at least one here.
        let divisor = (accuracy - i).saturating_mul(bips);
        res = bips.saturating_add(res.saturating_mul(input) / divisor);
    }
    if value.0 < 0 {
        // res >= bips > 0
        Bips(saturating_i64(bips * bips / res))
    } else {
        Bips(saturating_i64(res))
    }
}

/// Multiplies a wei amount by a basis-point factor, truncating and clamping
/// at `Wei::MAX`. Negative factors yield zero.
pub fn wei_mul_by_bips(value: Wei, bips: Bips) -> Wei {
    let factor = Wei::from(saturating_u64(bips.0));
    let one = Wei::from(ONE_IN_BIPS.0 as u64);
    // Split so that the product only clamps when the result itself overflows.
    let (whole, rest) = value.div_mod(one);
    // rest < 10^4 and factor < 2^63, the product cannot overflow.
    whole.saturating_mul(factor).saturating_add(rest * factor / one)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_exp_sequence() {
        // Hand-checked against the reference integer sequence.
        assert_eq!(approx_exp_basis_points(Bips(0), 4), ONE_IN_BIPS);
        assert_eq!(approx_exp_basis_points(Bips(1000), 4), Bips(11051));
        assert_eq!(approx_exp_basis_points(Bips(2500), 4), Bips(12840));
        assert_eq!(approx_exp_basis_points(Bips(85_000), 4), Bips(3_654_791));
        assert_eq!(approx_exp_basis_points(Bips(-1000), 4), Bips(9048));
        assert_eq!(approx_exp_basis_points(Bips(123_456), 0), ONE_IN_BIPS);
    }

    #[test]
    fn test_approx_exp_monotone() {
        let mut last = Bips(0);
        for exponent in (0..200_000).step_by(997) {
            let exp = approx_exp_basis_points(Bips(exponent), 4);
            assert!(exp >= last, "exp({exponent}) decreased");
            assert!(exp >= ONE_IN_BIPS);
            last = exp;
        }
    }

    #[test]
    fn test_approx_exp_saturates() {
        // Every intermediate product clamps, leaving the last division.
        let exp = approx_exp_basis_points(Bips::MAX, 4);
        assert_eq!(exp, Bips((u64::MAX / 10_000 + 10_000) as i64));
        // e^-huge rounds down to zero.
        assert_eq!(approx_exp_basis_points(Bips(-i64::MAX), 4), Bips(0));
    }

    #[test]
    fn test_natural_to_bips() {
        assert_eq!(natural_to_bips(0), Bips(0));
        assert_eq!(natural_to_bips(3), Bips(30_000));
        assert_eq!(natural_to_bips(u64::MAX), Bips::MAX);
        assert_eq!(natural_to_bips(i64::MAX as u64 / 10_000 + 1), Bips::MAX);
    }

    #[test]
    fn test_bips_division() {
        assert_eq!(natural_to_bips(100).saturating_div(Bips(1000)), Bips(1000));
        assert_eq!(Bips(7).saturating_div(Bips(2)), Bips(3));
        assert_eq!(Bips(7).saturating_div(Bips(0)), Bips::MAX);
        assert_eq!(Bips::MAX.saturating_add(Bips(1)), Bips::MAX);
    }

    #[test]
    fn test_saturating_casts() {
        assert_eq!(saturating_i64(u64::MAX), i64::MAX);
        assert_eq!(saturating_u64(-5), 0);
        assert_eq!(saturating_u32(u64::from(u32::MAX) + 1), u32::MAX);
        assert_eq!(saturating_u32(102), 102);
    }

    #[test]
    fn test_wei_mul_by_bips() {
        let fee = Wei::from(100_000_000u64);
        assert_eq!(wei_mul_by_bips(fee, ONE_IN_BIPS), fee);
        assert_eq!(wei_mul_by_bips(fee, Bips(11051)), Wei::from(110_510_000u64));
        assert_eq!(wei_mul_by_bips(fee, Bips(-1)), Wei::zero());
        assert_eq!(wei_mul_by_bips(Wei::from(12_345u64), Bips(15_000)), Wei::from(18_517u64));
        assert_eq!(wei_mul_by_bips(Wei::MAX, Bips(20_000)), Wei::MAX);
        assert_eq!(wei_mul_by_bips(Wei::MAX, ONE_IN_BIPS), Wei::MAX);
        assert_eq!(wei_mul_by_bips(Wei::MAX / Wei::from(2u64), Bips(20_000)), Wei::MAX - Wei::one());
    }

    #[test]
    fn test_wei_mul_by_bips_never_shrinks() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        for _ in 0..1000 {
            let words: [u64; 4] = rng.gen();
            let value = crate::primitive_types::U256(words) >> rng.gen_range(0u32..256);
            let bips = Bips(rng.gen_range(ONE_IN_BIPS.0..=i64::MAX));
            let product = wei_mul_by_bips(value, bips);
            assert!(product >= value, "{value} * {bips} bips = {product}");
        }
    }

    #[test]
    fn test_serde_forms() {
        assert_eq!(serde_json::to_string(&Bips(11051)).unwrap(), "11051");
        assert_eq!(serde_json::from_str::<Bips>("-5").unwrap(), Bips(-5));
    }
}
