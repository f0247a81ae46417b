//! Scroll-offset arithmetic shared by the file list and the review list.
//!
//! Both lists keep the invariant
//! `scroll_offset <= selection < scroll_offset + height`, adjusting the
//! offset by the minimum amount needed after every selection change.

/// Return the scroll offset that keeps `selection` visible in a viewport of
/// `height` rows, moving `scroll` as little as possible.
///
/// A zero height is treated as a single row.
///
/// # Example
///
/// ```
/// use dupbrowse::viewport::follow_selection;
///
/// // Selection below the window scrolls down just enough
/// assert_eq!(follow_selection(12, 0, 10), 3);
/// // Selection above the window scrolls up to it
/// assert_eq!(follow_selection(2, 5, 10), 2);
/// // Selection already visible leaves the offset alone
/// assert_eq!(follow_selection(7, 5, 10), 5);
/// ```
#[must_use]
pub fn follow_selection(selection: usize, scroll: usize, height: usize) -> usize {
    let height = height.max(1);
    if selection < scroll {
        selection
    } else if selection >= scroll + height {
        selection + 1 - height
    } else {
        scroll
    }
}

/// Step an index one position forward or backward with wrap-around.
///
/// Returns 0 for an empty range.
#[must_use]
pub fn wrap_step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else if index == 0 {
        len - 1
    } else {
        (index - 1).min(len - 1)
    }
}
