//! Fixed-point helpers for token amounts.
//!
//! Amounts are raw `u128` units. All ratios in the protocol are expressed as
//! basis points or whole percentages and evaluated with integer arithmetic,
//! rounding down. Every helper returns `None` on overflow instead of wrapping.

/// Basis points denominator (100% = 10_000 bps).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// `amount * bps / 10_000`, rounded down.
pub fn bps_of(amount: u128, bps: u128) -> Option<u128> {
    mul_div(amount, bps, BPS_DENOMINATOR)
}

/// `amount * pct / 100`, rounded down.
pub fn percent_of(amount: u128, pct: u128) -> Option<u128> {
    mul_div(amount, pct, 100)
}

/// `a * b / c`, rounded down. `None` on overflow or when `c` is zero.
pub fn mul_div(a: u128, b: u128, c: u128) -> Option<u128> {
    if c == 0 {
        return None;
    }
    a.checked_mul(b).map(|p| p / c)
}
