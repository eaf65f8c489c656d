//! Ground-truth file lookup under an answers tree.
//!
//! Incident files are named `<release>-<scenario>-<user>.csv`, e.g.
//! `r5.2-1-ACM2278.csv`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether `file_name` matches `<release_prefix>-*-<user>.csv`.
pub fn is_incident_file(file_name: &str, release_prefix: &str, user: &str) -> bool {
    let Some(rest) = file_name
        .strip_prefix(release_prefix)
        .and_then(|r| r.strip_prefix('-'))
    else {
        return false;
    };
    rest.strip_suffix(".csv")
        .and_then(|stem| stem.strip_suffix(user))
        .is_some_and(|head| head.ends_with('-'))
}

/// Regular files under `root`, in file-name order at every level
fn walk_files(root: &Path) -> impl Iterator<Item = (PathBuf, String)> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            Some((e.into_path(), name))
        })
}

/// First incident file for `user` under `root`. The walk is sorted by file
/// name so the answer is stable. A missing root or no match yields `None`.
pub fn locate_incident_file(user: &str, root: &Path, release_prefix: &str) -> Option<PathBuf> {
    walk_files(root)
        .find(|(_, name)| is_incident_file(name, release_prefix, user))
        .map(|(path, _)| path)
}

/// Every user that has an incident file of `release_prefix` under `root`.
/// The user id is the last `-` separated field of the file stem.
pub fn list_insider_users(root: &Path, release_prefix: &str) -> BTreeSet<String> {
    walk_files(root)
        .filter_map(|(_, name)| {
            let rest = name.strip_prefix(release_prefix)?.strip_prefix('-')?;
            let (_, user) = rest.strip_suffix(".csv")?.rsplit_once('-')?;
            (!user.is_empty()).then(|| user.to_string())
        })
        .collect()
}
