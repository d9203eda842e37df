//! Anti-snipe time extension.
//!
//! A non-first bid landing with `time_buffer` or less remaining pushes the
//! end out so that exactly `time_buffer` remains from the bid.

/// Result of evaluating the extension rule for one bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension {
    /// Auction duration after the bid.
    pub duration: u64,
    /// Whether the bid fell inside the buffer window.
    pub extended: bool,
}

/// Apply the extension rule to a non-first bid at `now`.
///
/// `now` must not be past `first_bid_time + duration`; expired bids are
/// rejected before this runs.
#[must_use]
pub fn extend(first_bid_time: u64, duration: u64, now: u64, time_buffer: u64) -> Extension {
    let remaining = first_bid_time.saturating_add(duration).saturating_sub(now);
    if remaining <= time_buffer {
        Extension {
            duration: duration.saturating_add(time_buffer - remaining),
            extended: true,
        }
    } else {
        Extension {
            duration,
            extended: false,
        }
    }
}
