//! File intake filtering: allow-list plus count cap.
//!
//! A raw selection (drag-drop or file picker) is filtered down to the files a
//! tool can actually convert. Rejection is silent: unsupported extensions are
//! dropped and the remainder is truncated to the cap, preserving the user's
//! selection order. An empty result stages nothing and raises nothing.

use crate::artifact::SourceFile;
use tracing::debug;

/// Filter `candidates` to names ending in one of `allowed_extensions`
/// (case-insensitive, dot-separated) and truncate to the first `max_count`
/// entries, preserving order.
pub fn accept(
    candidates: Vec<SourceFile>,
    allowed_extensions: &[&str],
    max_count: usize,
) -> Vec<SourceFile> {
    let total = candidates.len();
    let accepted: Vec<SourceFile> = candidates
        .into_iter()
        .filter(|f| matches_allow_list(&f.name, allowed_extensions))
        .take(max_count)
        .collect();
    debug!(
        offered = total,
        accepted = accepted.len(),
        max_count,
        "intake filter applied"
    );
    accepted
}

/// Case-insensitive `.<ext>` suffix match against the allow-list.
pub fn matches_allow_list(name: &str, allowed_extensions: &[&str]) -> bool {
    let lower = name.to_lowercase();
    allowed_extensions
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext.to_lowercase())))
}
