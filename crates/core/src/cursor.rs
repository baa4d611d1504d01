//! Navigation cursor arithmetic.
//!
//! The cursor is a persisted index into the ordered, filtered question list.
//! These helpers keep it inside valid bounds whenever the list changes size;
//! `None` means "no current question". Movement saturates at both ends, it
//! never wraps.

/// Clamp a persisted cursor into `[0, total - 1]`.
///
/// Returns `None` when the list is empty.
#[must_use]
pub fn safe_index(cursor: usize, total: usize) -> Option<usize> {
    if total == 0 {
        None
    } else {
        Some(cursor.min(total - 1))
    }
}

/// Cursor after moving backwards. No-op at the lower bound.
#[must_use]
pub fn prev_index(cursor: usize) -> usize {
    cursor.saturating_sub(1)
}

/// Cursor after moving forwards. No-op at the upper bound.
#[must_use]
pub fn next_index(cursor: usize, total: usize) -> usize {
    match total {
        0 => 0,
        _ => (cursor + 1).min(total - 1),
    }
}
