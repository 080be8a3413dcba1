//! Free Number Allocator
//!
//! Finds a free number within `[min, max]` given the numbers already in use.

use crate::error::{Error, Result};
use std::borrow::Cow;

/// Return a free number within `[min, max]`.
///
/// Prefers the number right after the highest used one; only when that
/// would leave the range does it search for the lowest hole starting at
/// `min`. `used` may be unsorted and may contain duplicates or numbers
/// outside the range. The function is pure: `used` is never modified.
///
/// # Errors
///
/// - [`Error::InvalidRange`] if `max <= min`
/// - [`Error::Exhausted`] if every number in the range is taken
pub fn allocate(min: u32, max: u32, used: &[u32]) -> Result<u32> {
    if max <= min {
        return Err(Error::InvalidRange { min, max });
    }

    // All free, use the first one
    let used = sorted(used);
    let last = match used.last() {
        Some(&last) => last,
        None => return Ok(min),
    };

    // Next after the current maximum, if that still fits
    if last < max {
        return Ok((last + 1).max(min));
    }

    // Find a hole
    let start = used.partition_point(|&n| n < min);
    let mut expected = min;
    for &n in &used[start..] {
        if n > expected {
            return Ok(expected);
        }
        if n >= max {
            break;
        }
        expected = n + 1;
    }

    Err(Error::Exhausted { min, max })
}

/// Borrow `used` when already ascending, otherwise sort a private copy
fn sorted(used: &[u32]) -> Cow<'_, [u32]> {
    if used.windows(2).all(|w| w[0] <= w[1]) {
        Cow::Borrowed(used)
    } else {
        let mut owned = used.to_vec();
        owned.sort_unstable();
        Cow::Owned(owned)
    }
}
