//! CLI output formatting for upload results.
//!
//! # Output Format
//!
//! ## Upload
//!
//! ```text
//! Uploaded My Sunset → my-sunset-0192…
//!     Picture: sunset-0192….jpg
//!     Thumbnail: sunset-0192…-thumb.jpg
//! ```
//!
//! A failed upload shows the names it would have used, then the diagnostic:
//!
//! ```text
//! Could not upload the picture!
//!     Picture: sunset-0192….jpg
//!     Thumbnail: sunset-0192…-thumb.jpg
//!     Error: Not a supported image: Failed to decode …
//!     Cleanup: Could not remove …
//! ```
//!
//! ## Remove
//!
//! ```text
//! Removed sunset-0192….jpg, sunset-0192…-thumb.jpg
//! ```
//!
//! # Architecture
//!
//! Each result has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::upload::UploadOutcome;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format the result of one upload.
pub fn format_upload_outcome(outcome: &UploadOutcome, display_name: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if outcome.failed {
        lines.push("Could not upload the picture!".to_string());
    } else if display_name.trim().is_empty() {
        lines.push(format!("Uploaded {}", outcome.slug_name));
    } else {
        lines.push(format!("Uploaded {} → {}", display_name, outcome.slug_name));
    }

    lines.push(format!("{}Picture: {}", indent(1), outcome.stored_file_name));
    lines.push(format!("{}Thumbnail: {}", indent(1), outcome.thumb_file_name));

    if let Some(failure) = &outcome.failure {
        lines.push(format!("{}Error: {}", indent(1), failure.error));
        for warning in &failure.cleanup {
            lines.push(format!("{}Cleanup: {}", indent(1), warning));
        }
    }
    lines
}

pub fn print_upload_outcome(outcome: &UploadOutcome, display_name: &str) {
    for line in format_upload_outcome(outcome, display_name) {
        println!("{}", line);
    }
}

pub fn format_removed(stored_file_name: &str, thumb_file_name: &str) -> Vec<String> {
    vec![format!("Removed {}, {}", stored_file_name, thumb_file_name)]
}

pub fn print_removed(stored_file_name: &str, thumb_file_name: &str) {
    for line in format_removed(stored_file_name, thumb_file_name) {
        println!("{}", line);
    }
}
