//! BLS period codes.
//!
//! BLS encodes the sub-annual position of an observation as a period code:
//! `M01`..`M12` for months, `M13` for the annual average, `Q01`..`Q04` (or
//! `Q1`..`Q4`) for quarters, plus annual/semiannual codes we do not track.

/// Resolve a period code to the month used for its observation date.
///
/// Quarters are placed on their last month (Q1 -> March, ..., Q4 -> December).
/// Returns `None` for codes that should be skipped (annual averages, annual or
/// semiannual periods, anything unrecognized).
pub fn month_for_period(code: &str) -> Option<u32> {
    let code = code.trim();
    let (kind, digits) = code.split_at_checked(1)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u32 = digits.parse().ok()?;

    match kind {
        "M" if digits.len() == 2 && (1..=12).contains(&n) => Some(n),
        "Q" if digits.len() <= 2 && (1..=4).contains(&n) => Some(n * 3),
        _ => None,
    }
}
