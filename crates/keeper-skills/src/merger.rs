//! Protected-region merge.
//!
//! An artifact is modelled as `prefix + region + suffix`, where `prefix`
//! ends with the start-sentinel line and `suffix` begins with the
//! end-sentinel line. Regeneration keeps the fresh prefix and suffix and
//! carries the existing region over verbatim, so merging an output against
//! the same fresh template again is a no-op.

use std::fmt;

use tracing::warn;

/// The pair of marker lines that delimit the protected region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sentinels {
    /// Start marker line (compared after trimming).
    pub start: String,
    /// End marker line (compared after trimming).
    pub end: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            start: "<!-- SEMANTIC_START -->".to_string(),
            end: "<!-- SEMANTIC_END -->".to_string(),
        }
    }
}

impl Sentinels {
    /// Sentinels with custom marker lines.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Which input a merge error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Document {
    /// The artifact currently on disk.
    Existing,
    /// The freshly rendered template.
    Fresh,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Existing => f.write_str("existing"),
            Self::Fresh => f.write_str("fresh"),
        }
    }
}

/// Merge failures. Content is never returned truncated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// Sentinel lines are missing or out of order.
    #[error("unbalanced sentinels in {which} content: {detail}")]
    Unbalanced {
        /// Offending input.
        which: Document,
        /// What was wrong.
        detail: String,
    },
}

/// An artifact split around its protected region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Everything up to and including the start-sentinel line.
    pub prefix: String,
    /// Text strictly between the sentinel lines.
    pub region: String,
    /// The end-sentinel line and everything after it.
    pub suffix: String,
}

impl Artifact {
    /// Split `content`, requiring exactly one well-formed sentinel pair.
    pub fn parse(content: &str, sentinels: &Sentinels) -> Result<Self, MergeError> {
        match locate(content, sentinels) {
            Ok(Some(artifact)) => Ok(artifact),
            Ok(None) => Err(unbalanced(Document::Existing, "missing start sentinel")),
            Err(detail) => Err(unbalanced(Document::Existing, detail)),
        }
    }

    /// Reassemble the artifact text.
    pub fn assemble(&self) -> String {
        let mut out =
            String::with_capacity(self.prefix.len() + self.region.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(&self.region);
        out.push_str(&self.suffix);
        out
    }
}

/// Regenerate an artifact, keeping the protected region of `existing`.
///
/// - `existing == None`: `fresh` is returned as-is once its sentinels check out
/// - `existing` without any sentinel: nothing to preserve, `fresh` wins
/// - otherwise: fresh prefix + existing region + fresh suffix
pub fn merge(
    existing: Option<&str>,
    fresh: &str,
    sentinels: &Sentinels,
) -> Result<String, MergeError> {
    let template = match locate(fresh, sentinels) {
        Ok(Some(artifact)) => artifact,
        Ok(None) => return Err(unbalanced(Document::Fresh, "missing start sentinel")),
        Err(detail) => return Err(unbalanced(Document::Fresh, detail)),
    };

    let Some(existing) = existing else {
        return Ok(fresh.to_string());
    };

    let kept = match locate(existing, sentinels) {
        Ok(Some(artifact)) => artifact.region,
        Ok(None) => {
            warn!("existing artifact has no protected region, using fresh content");
            return Ok(fresh.to_string());
        }
        Err(detail) => return Err(unbalanced(Document::Existing, detail)),
    };

    Ok(Artifact {
        region: kept,
        ..template
    }
    .assemble())
}

fn unbalanced(which: Document, detail: &str) -> MergeError {
    MergeError::Unbalanced {
        which,
        detail: detail.to_string(),
    }
}

/// Find the first start line and the first end line after it.
///
/// `Ok(None)` when neither marker appears.
fn locate(content: &str, sentinels: &Sentinels) -> Result<Option<Artifact>, &'static str> {
    let start_marker = sentinels.start.trim();
    let end_marker = sentinels.end.trim();

    let mut offset = 0;
    let mut region_start = None;
    let mut region_end = None;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        match region_start {
            None if trimmed == start_marker => region_start = Some(offset + line.len()),
            None if trimmed == end_marker => return Err("end sentinel without a start sentinel before it"),
            Some(_) if trimmed == end_marker => {
                region_end = Some(offset);
                break;
            }
            _ => {}
        }
        offset += line.len();
    }

    match (region_start, region_end) {
        (None, _) => Ok(None),
        (Some(_), None) => Err("start sentinel without an end sentinel after it"),
        (Some(start), Some(end)) => Ok(Some(Artifact {
            prefix: content[..start].to_string(),
            region: content[start..end].to_string(),
            suffix: content[end..].to_string(),
        })),
    }
}
