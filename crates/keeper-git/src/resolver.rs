//! Change-set resolution modes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use keeper_core::constants::NULL_SHA;

use crate::runner::GitRunner;

/// Resolves change sets for one repository root.
#[derive(Debug)]
pub struct ChangeSetResolver<R> {
    runner: R,
    root: PathBuf,
}

impl<R: GitRunner> ChangeSetResolver<R> {
    /// A resolver running git in `root`.
    pub fn new(runner: R, root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            root: root.into(),
        }
    }

    /// Repository root the resolver runs in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files that differ between two revisions.
    ///
    /// An all-zero `old` means the ref is new on the remote, and the whole
    /// tree listing of `new` is returned instead of a diff.
    pub fn range(&self, old: &str, new: &str) -> BTreeSet<String> {
        if old == NULL_SHA {
            self.collect(&[&["ls-tree", "-r", "--name-only", new]])
        } else {
            self.collect(&[&["diff", "--name-only", old, new]])
        }
    }

    /// Files touched by any of the last `n` commits.
    pub fn recent(&self, n: usize) -> BTreeSet<String> {
        if n == 0 {
            return BTreeSet::new();
        }
        let count = n.to_string();
        self.collect(&[&["log", "-n", &count, "--name-only", "--format="]])
    }

    /// Files with uncommitted changes, staged or not.
    pub fn working_tree(&self) -> BTreeSet<String> {
        self.collect(&[
            &["diff", "--name-only", "HEAD"],
            &["diff", "--name-only"],
            &["diff", "--cached", "--name-only"],
        ])
    }

    /// Files staged for the next commit.
    pub fn staged(&self) -> BTreeSet<String> {
        self.collect(&[&["diff", "--cached", "--name-only"]])
    }

    /// Every file git tracks at the current index.
    pub fn tracked(&self) -> BTreeSet<String> {
        self.collect(&[&["ls-files"]])
    }

    /// Union of the output lines of each call. A failing call contributes nothing.
    fn collect(&self, calls: &[&[&str]]) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        for args in calls {
            match self.runner.run(args, &self.root) {
                Ok(out) => paths.extend(
                    out.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(ToString::to_string),
                ),
                Err(e) => debug!(command = %args.join(" "), error = %e, "git query failed, treating as empty"),
            }
        }
        paths
    }
}

/// Top-level directory of the repository containing `cwd`.
pub fn discover_root<R: GitRunner + ?Sized>(runner: &R, cwd: &Path) -> Option<PathBuf> {
    match runner.run(&["rev-parse", "--show-toplevel"], cwd) {
        Ok(out) => {
            let top = out.trim();
            (!top.is_empty()).then(|| PathBuf::from(top))
        }
        Err(e) => {
            debug!(cwd = %cwd.display(), error = %e, "no repository root");
            None
        }
    }
}
