use std::collections::HashSet;

use common::Candidate;
use tracing::debug;

/// Takes up to `count` candidates, in order, whose URL is not in `posted`.
/// Returns fewer when the source runs dry.
pub fn check_posted(source: &[Candidate], count: usize, posted: &HashSet<String>) -> Vec<Candidate> {
    let mut selected = Vec::with_capacity(count);
    for candidate in source {
        if selected.len() == count {
            break;
        }
        if posted.contains(candidate.url()) {
            debug!("Already posted, skipping {}", candidate.url());
            continue;
        }
        selected.push(candidate.clone());
    }
    selected
}
