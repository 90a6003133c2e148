//! Request-class timeout selection.
//!
//! A single cross-cutting rule applied at the dispatch chokepoint: bulk
//! uploads may legitimately run for many minutes while the server ingests
//! the file, everything interactive must fail fast.

use std::time::Duration;

/// Deadline for interactive calls (search, suggest, stats).
pub const INTERACTIVE_TIMEOUT: Duration = Duration::from_secs(60);

/// Deadline for bulk upload calls.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Classify an outbound request path into its timeout class.
pub fn request_timeout(path: &str) -> Duration {
    if path.contains("/upload/csv") {
        UPLOAD_TIMEOUT
    } else {
        INTERACTIVE_TIMEOUT
    }
}
