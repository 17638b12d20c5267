//! HTTP Range header resolution.
//!
//! Pure translation of an optional `Range` request header plus a resource's
//! total length into a concrete byte interval and response class. Supported
//! forms are `bytes=start-end`, `bytes=start-` and the absent header; a
//! header that does not even look like a byte range falls back to serving
//! the full resource, while a recognizable-but-unsupported pattern (the
//! suffix form `bytes=-n`) is rejected outright.

/// Response class for a resolved range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStatus {
    /// Serve the whole resource (200).
    Full,
    /// Serve the requested subrange (206).
    Partial,
    /// The range lies outside the resource (416).
    Unsatisfiable,
    /// Recognizable range syntax outside the supported forms (400).
    Malformed,
}

/// Concrete byte interval derived from a `Range` header.
///
/// Invariant: when `status` is `Full` or `Partial` and `total > 0`,
/// `0 <= start <= end <= total - 1`, and `len()` is exactly the number of
/// bytes the responder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub status: RangeStatus,
    /// First byte offset, inclusive.
    pub start: u64,
    /// Last byte offset, inclusive.
    pub end: u64,
    /// Total length of the resource.
    pub total: u64,
}

impl ResolvedRange {
    fn full(total: u64) -> Self {
        Self {
            status: RangeStatus::Full,
            start: 0,
            end: total.saturating_sub(1),
            total,
        }
    }

    fn partial(start: u64, end: u64, total: u64) -> Self {
        Self {
            status: RangeStatus::Partial,
            start,
            end,
            total,
        }
    }

    fn unsatisfiable(total: u64) -> Self {
        Self {
            status: RangeStatus::Unsatisfiable,
            start: 0,
            end: 0,
            total,
        }
    }

    fn malformed(total: u64) -> Self {
        Self {
            status: RangeStatus::Malformed,
            start: 0,
            end: 0,
            total,
        }
    }

    /// Number of bytes the response body carries.
    #[must_use]
    pub fn len(&self) -> u64 {
        match self.status {
            RangeStatus::Full | RangeStatus::Partial => {
                if self.total == 0 {
                    0
                } else {
                    self.end - self.start + 1
                }
            }
            RangeStatus::Unsatisfiable | RangeStatus::Malformed => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve an optional `Range` header against a resource length.
///
/// Unparseable headers deliberately fall back to a full response rather
/// than an error; see DESIGN.md for the leniency decision.
pub fn resolve(header: Option<&str>, total: u64) -> ResolvedRange {
    let Some(raw) = header else {
        return ResolvedRange::full(total);
    };

    // Anything that is not "bytes=<start>?-<end>?" gets the permissive
    // full-file fallback.
    let Some(value) = raw.trim().strip_prefix("bytes=") else {
        return ResolvedRange::full(total);
    };
    let Some((start_s, end_s)) = value.split_once('-') else {
        return ResolvedRange::full(total);
    };

    match (start_s.trim(), end_s.trim()) {
        // Neither bound present: not a range at all.
        ("", "") => ResolvedRange::full(total),
        // Suffix form "-n" is outside the supported contract.
        ("", _) => ResolvedRange::malformed(total),
        (start_s, end_s) => {
            let Ok(start) = start_s.parse::<u64>() else {
                return ResolvedRange::full(total);
            };
            let end = if end_s.is_empty() {
                total.saturating_sub(1)
            } else {
                match end_s.parse::<u64>() {
                    // Clamp before the validity check.
                    Ok(end) => end.min(total.saturating_sub(1)),
                    Err(_) => return ResolvedRange::full(total),
                }
            };
            if start >= total || start > end {
                ResolvedRange::unsatisfiable(total)
            } else {
                ResolvedRange::partial(start, end, total)
            }
        }
    }
}
