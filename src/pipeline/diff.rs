//! New-post detection against the stored snapshot.
//!
//! Posts are keyed by `link`, compared exactly. Duplicates inside the
//! candidate batch are kept as-is.

use std::collections::HashSet;

use crate::models::Post;

/// Posts of `candidate` whose link is absent from `existing`, in candidate order.
pub fn find_new(existing: &[Post], candidate: &[Post]) -> Vec<Post> {
    let seen: HashSet<&str> = existing.iter().map(|p| p.link.as_str()).collect();

    candidate
        .iter()
        .filter(|p| !seen.contains(p.link.as_str()))
        .cloned()
        .collect()
}

/// The snapshot to persist after a run: existing order kept, new appended.
pub fn extend_snapshot(existing: Vec<Post>, new_posts: &[Post]) -> Vec<Post> {
    let mut snapshot = existing;
    snapshot.extend_from_slice(new_posts);
    snapshot
}
