//! Diff truncation before the diff is sent to a provider.

use tracing::debug;

use crate::error::GpushError;

/// Appended to a diff that was cut at the length cap.
pub const TRUNCATION_MARKER: &str = "\n... (truncated due to length)";

/// Cap `diff` at `max_chars` characters.
///
/// Diffs at or below the cap are returned unchanged. Longer diffs are cut to
/// their first `max_chars` characters and suffixed with [`TRUNCATION_MARKER`].
/// The cut always lands on a character boundary.
///
/// Empty input is rejected with [`GpushError::InvalidDiff`].
pub fn truncate_diff(diff: &str, max_chars: usize) -> Result<String, GpushError> {
    if diff.is_empty() {
        return Err(GpushError::InvalidDiff);
    }

    match diff.char_indices().nth(max_chars) {
        None => Ok(diff.to_string()),
        Some((cut, _)) => {
            debug!(
                "Truncating diff from {} bytes to {} characters",
                diff.len(),
                max_chars
            );
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&diff[..cut]);
            out.push_str(TRUNCATION_MARKER);
            Ok(out)
        }
    }
}
