//! Season label handling. Labels look like `"10/11"`; only the starting half is read.

/// Returned by [`resolve`] when the label cannot be read. Not a real year.
pub const UNRESOLVED_YEAR: i32 = 0;

/// Two-digit starts at or below this value are in the 2000s, the rest in the 1900s.
const CENTURY_CUTOFF: i32 = 50;

/// Starting calendar year of a season label, or `None` when the label has no `/`
/// separator or its first segment is not an integer.
pub fn parse_start_year(label: &str) -> Option<i32> {
    let (start, _) = label.split_once('/')?;
    let start: i32 = start.trim().parse().ok()?;

    if start <= CENTURY_CUTOFF {
        Some(2000 + start)
    } else {
        Some(1900 + start)
    }
}

/// Total form of [`parse_start_year`]: unreadable labels map to [`UNRESOLVED_YEAR`].
pub fn resolve(label: &str) -> i32 {
    parse_start_year(label).unwrap_or(UNRESOLVED_YEAR)
}

/// Threshold filter applied before aggregation. Unreadable labels resolve to the
/// sentinel and therefore never pass a positive threshold.
pub fn is_at_or_after(label: &str, min_year: i32) -> bool {
    resolve(label) >= min_year
}
