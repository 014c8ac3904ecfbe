//! Pre-push hook input.
//!
//! git feeds the pre-push hook one line per ref being pushed:
//!
//! ```text
//! <local ref> SP <local sha> SP <remote ref> SP <remote sha> LF
//! ```

use keeper_core::constants::NULL_SHA;

/// The commit range one pushed ref introduces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushRange {
    /// Remote tip before the push (all zeros for a new branch).
    pub old: String,
    /// Local tip being pushed.
    pub new: String,
}

/// Parse pre-push stdin into ranges.
///
/// Deletions (local sha all zeros) and malformed lines are skipped.
pub fn parse_push_ranges(stdin: &str) -> Vec<PushRange> {
    stdin
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let (_local_ref, local_sha, _remote_ref, remote_sha) =
                (fields.next()?, fields.next()?, fields.next()?, fields.next()?);
            if local_sha == NULL_SHA {
                return None;
            }
            Some(PushRange {
                old: remote_sha.to_string(),
                new: local_sha.to_string(),
            })
        })
        .collect()
}
