//! Precompiled territory matcher.

use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

use crate::path::{normalize_path, normalize_relative};

/// Characters that make a segment a wildcard segment.
const WILDCARD_CHARS: &[char] = &['*', '?', '[', '{'];

/// One territory pattern, compiled once.
#[derive(Clone, Debug)]
struct CompiledPattern {
    source: String,
    /// Strict glob matcher. `None` for plain literals and invalid globs.
    glob: Option<GlobMatcher>,
    /// Directory-prefix fallback: this path and everything beneath it.
    prefix: Option<String>,
}

impl CompiledPattern {
    fn compile(raw: &str) -> Option<Self> {
        let source = normalize_relative(raw.trim())?;
        let segments: Vec<&str> = source.split('/').collect();
        let has_wildcard = segments.iter().any(|s| s.contains(WILDCARD_CHARS));

        if !has_wildcard {
            return Some(Self {
                prefix: Some(source.clone()),
                glob: None,
                source,
            });
        }

        let glob = match GlobBuilder::new(&source).literal_separator(true).build() {
            Ok(g) => Some(g.compile_matcher()),
            Err(e) => {
                warn!(pattern = %source, error = %e, "invalid territory pattern, glob skipped");
                None
            }
        };

        let prefix = directory_base(&source).map(str::to_owned);

        Some(Self {
            source,
            glob,
            prefix,
        })
    }

    fn matches(&self, rel: &str) -> bool {
        if self.glob.as_ref().is_some_and(|g| g.is_match(rel)) {
            return true;
        }
        self.prefix.as_deref().is_some_and(|base| {
            rel == base
                || rel
                    .strip_prefix(base)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// The literal directory named by a `dir/**` or `dir/**/*` pattern.
///
/// Any other wildcard shape (`a/**/b.ts`, `svc/**/*.py`, `**`) has no base.
fn directory_base(pattern: &str) -> Option<&str> {
    let base = pattern
        .strip_suffix("/**/*")
        .or_else(|| pattern.strip_suffix("/**"))?;
    (!base.is_empty() && !base.contains(WILDCARD_CHARS)).then_some(base)
}

/// An ordered set of ownership patterns for one documentation artifact.
///
/// An empty territory never matches anything.
#[derive(Clone, Debug, Default)]
pub struct Territory {
    patterns: Vec<CompiledPattern>,
}

impl Territory {
    /// Compile a territory from its patterns.
    ///
    /// Patterns that normalize to nothing (empty, `.`, absolute) are dropped.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .filter_map(|p| CompiledPattern::compile(p.as_ref()))
                .collect(),
        }
    }

    /// Whether the territory tracks nothing.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Normalized pattern sources, in declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }

    /// Whether a root-relative path is owned by this territory.
    pub fn owns(&self, path: &str) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// Whether `path` (relative or absolute) is owned, rebasing against `root`.
    pub fn owns_in_root(&self, path: &str, root: &Path) -> bool {
        normalize_path(path, root).is_some_and(|rel| self.owns_normalized(&rel))
    }

    /// The first pattern that claims `path`, if any.
    pub fn matching_pattern(&self, path: &str) -> Option<&str> {
        let rel = normalize_relative(path)?;
        self.patterns
            .iter()
            .find(|p| p.matches(&rel))
            .map(|p| p.source.as_str())
    }

    fn owns_normalized(&self, rel: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(rel))
    }
}

/// Whether a root-relative `path` matches any of `patterns`.
///
/// Absolute paths have no root to rebase against and never match; use
/// [`matches_in_root`] for those.
pub fn matches<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    Territory::new(patterns).owns(path)
}

/// Whether `path` matches any of `patterns` after normalizing against `root`.
///
/// A path outside `root` never matches.
pub fn matches_in_root<S: AsRef<str>>(path: &str, root: &Path, patterns: &[S]) -> bool {
    Territory::new(patterns).owns_in_root(path, root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_star_matches_zero_segments() {
        assert!(matches("a/b.ts", &["a/**/b.ts"]));
    }

    #[test]
    fn double_star_matches_many_segments() {
        assert!(matches("a/x/y/b.ts", &["a/**/b.ts"]));
    }

    #[test]
    fn nested_ts_glob() {
        assert!(matches("cli/src/core/diff.ts", &["cli/src/**/*.ts"]));
        assert!(!matches("docs/README.md", &["cli/src/**/*.ts"]));
    }

    #[test]
    fn single_star_does_not_cross_separator() {
        assert!(matches("src/main.py", &["src/*.py"]));
        assert!(!matches("src/pkg/main.py", &["src/*.py"]));
    }

    #[test]
    fn question_mark_single_char() {
        assert!(matches("svc1/a.py", &["svc?/a.py"]));
        assert!(!matches("svc10/a.py", &["svc?/a.py"]));
    }

    #[test]
    fn character_class() {
        assert!(matches("v1/x", &["v[0-9]/x"]));
        assert!(!matches("va/x", &["v[0-9]/x"]));
    }

    #[test]
    fn directory_prefix_fallback() {
        assert!(matches("svc1", &["svc1/**/*"]));
        assert!(matches("svc1/deep/notes", &["svc1/**/*"]));
        assert!(matches("svc1", &["svc1/**"]));
        assert!(!matches("svc2/x", &["svc1/**/*"]));
    }

    #[test]
    fn filtered_double_star_has_no_fallback() {
        assert!(!matches("a/c.js", &["a/**/b.ts"]));
        assert!(!matches("a/x/c.js", &["a/**/b.ts"]));
        assert!(!matches("svc/README.md", &["svc/**/*.py"]));
        assert!(!matches("cli/src/README.md", &["cli/src/**/*.ts"]));
        assert!(matches("cli/src/deep/x.ts", &["cli/src/**/*.ts"]));
    }

    #[test]
    fn wildcard_base_has_no_fallback() {
        assert!(matches("svc1/a/b", &["svc*/**"]));
        assert!(!matches("svc1", &["svc*/**/*.py"]));
    }

    #[test]
    fn prefix_fallback_respects_segment_boundary() {
        assert!(!matches("svc10/main.py", &["svc1/**"]));
        assert!(matches("svc1/main.py", &["svc1/**"]));
    }

    #[test]
    fn no_fallback_without_double_star() {
        assert!(!matches("src/pkg/README.md", &["src/*.py"]));
    }

    #[test]
    fn plain_literal_owns_subtree() {
        assert!(matches("scripts/core/run.sh", &["scripts/core/"]));
        assert!(matches("scripts/core", &["scripts/core"]));
        assert!(!matches("scripts/corex/run.sh", &["scripts/core"]));
    }

    #[test]
    fn leading_double_star_has_no_base() {
        assert!(matches("deep/x/y.py", &["**/*.py"]));
        assert!(!matches("deep/x/y.rs", &["**/*.py"]));
    }

    #[test]
    fn empty_territory_never_matches() {
        let empty: [&str; 0] = [];
        assert!(!matches("anything", &empty));
        assert!(Territory::new(empty).is_empty());
    }

    #[test]
    fn invalid_pattern_skipped() {
        let t = Territory::new(["src/**/[unclosed", "lib/*.rs"]);
        assert!(!t.owns("src/any/file"));
        assert!(t.owns("lib/a.rs"));
        assert!(!t.owns("other/a.rs"));
    }

    #[test]
    fn normalizes_candidate_path() {
        assert!(matches("./svc1/main.py", &["svc1/**"]));
        assert!(matches("svc1\\main.py", &["svc1/**"]));
    }

    #[test]
    fn absolute_path_needs_root() {
        assert!(!matches("/repo/svc1/main.py", &["svc1/**"]));
        assert!(matches_in_root("/repo/svc1/main.py", Path::new("/repo"), &["svc1/**"]));
        assert!(!matches_in_root("/other/svc1/main.py", Path::new("/repo"), &["svc1/**"]));
    }

    #[test]
    fn matching_pattern_reports_first_claim() {
        let t = Territory::new(["svc1/*.py", "svc1/**"]);
        assert_eq!(t.matching_pattern("svc1/main.py"), Some("svc1/*.py"));
        assert_eq!(t.matching_pattern("svc1/pkg/x.py"), Some("svc1/**"));
        assert_eq!(t.matching_pattern("svc2/x.py"), None);
    }

    #[test]
    fn patterns_are_normalized() {
        let t = Territory::new(["./svc1/**", "", "scripts/"]);
        assert_eq!(t.patterns().collect::<Vec<_>>(), vec!["svc1/**", "scripts"]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn matching_is_deterministic(
                path in "[a-z]{1,4}(/[a-z.]{1,5}){0,4}",
                pattern in "[a-z*]{1,4}(/[a-z*.]{1,5}){0,3}",
            ) {
                let first = matches(&path, &[pattern.as_str()]);
                let second = matches(&path, &[pattern.as_str()]);
                prop_assert_eq!(first, second);
            }

            #[test]
            fn extension_filter_never_claims_other_extensions(
                base in "[a-z]{1,6}",
                rest in "[a-z]{1,6}(/[a-z]{1,6}){0,3}",
            ) {
                let pattern = format!("{base}/**/*.ts");
                let path = format!("{base}/{rest}.md");
                prop_assert!(!matches(&path, &[pattern.as_str()]));
            }

            #[test]
            fn never_panics_on_arbitrary_input(path in ".{0,40}", pattern in ".{0,40}") {
                let _ = matches(&path, &[pattern.as_str()]);
                let _ = matches_in_root(&path, Path::new("/repo"), &[pattern.as_str()]);
            }

            #[test]
            fn everything_under_a_directory_pattern_is_owned(
                base in "[a-z]{1,6}",
                rest in "[a-z]{1,6}(/[a-z]{1,6}){0,3}",
            ) {
                let pattern = format!("{base}/**/*");
                let path = format!("{base}/{rest}");
                prop_assert!(matches(&path, &[pattern.as_str()]));
            }
        }
    }
}
