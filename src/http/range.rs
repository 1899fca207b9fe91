//! HTTP Range header parsing
//!
//! Single-range `bytes=` parsing per RFC 7233. Multi-range requests and
//! non-byte units are ignored and answered with the full representation.

/// A byte range resolved against a known file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position (inclusive).
    pub start: usize,
    /// Last byte position (inclusive). `None` means to end of file.
    pub end: Option<usize>,
}

impl ByteRange {
    /// Resolve the inclusive end position for a file of `file_size` bytes.
    #[inline]
    pub fn end_position(&self, file_size: usize) -> usize {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }
}

/// Outcome of parsing a Range header against a file size.
#[derive(Debug)]
pub enum RangeOutcome {
    /// A satisfiable single range; respond with 206.
    Satisfiable(ByteRange),
    /// Range syntactically valid but outside the file; respond with 416.
    NotSatisfiable,
    /// No Range header, or one we ignore; respond with the full content.
    Ignored,
}

/// Parse a Range header value against a file of `file_size` bytes.
///
/// Accepted forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
/// Anything else (multiple ranges, other units, malformed numbers) is
/// treated as absent per RFC 7233 §3.1.
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(value) = range_header else {
        return RangeOutcome::Ignored;
    };
    let Some(spec) = value.strip_prefix("bytes=") else {
        return RangeOutcome::Ignored;
    };
    // Single range only
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }
    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        return parse_suffix(end_str, file_size);
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };
    if start >= file_size {
        return RangeOutcome::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<usize>() {
            // An end past the file is clamped, not rejected
            Ok(end) => Some(end.min(file_size.saturating_sub(1))),
            Err(_) => return RangeOutcome::Ignored,
        }
    };

    if matches!(end, Some(end) if start > end) {
        return RangeOutcome::NotSatisfiable;
    }

    RangeOutcome::Satisfiable(ByteRange { start, end })
}

/// `bytes=-N`: the last N bytes of the file.
fn parse_suffix(suffix_str: &str, file_size: usize) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };
    // No byte range satisfies a zero-length representation (RFC 7233 §4.4)
    if suffix == 0 || file_size == 0 {
        return RangeOutcome::NotSatisfiable;
    }
    RangeOutcome::Satisfiable(ByteRange {
        start: file_size.saturating_sub(suffix),
        end: Some(file_size.saturating_sub(1)),
    })
}
