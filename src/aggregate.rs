use std::cmp::Reverse;
use std::collections::HashSet;

use crate::record::RenderedCitation;

/// Sort citations by descending numeric year; records without a numeric year
/// go last. The sort is stable, so relative input order is preserved among
/// ties.
pub fn sort_by_year(citations: &mut [RenderedCitation]) {
    citations.sort_by_key(|c| Reverse(c.year.unwrap_or(i32::MIN)));
}

/// Merge per-profile citation lists (in configuration order) into one
/// combined, deduplicated, year-sorted list.
///
/// On a key collision the first-seen record wins and later ones are dropped;
/// Scholar reports the same paper under each co-author profile, so the loss of
/// later-profile attribution is deliberate.
pub fn aggregate(per_profile: &[(String, Vec<RenderedCitation>)]) -> Vec<RenderedCitation> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut combined: Vec<RenderedCitation> = Vec::new();
    for (_, citations) in per_profile {
        for citation in citations {
            if seen.insert(&citation.key) {
                combined.push(citation.clone());
            }
        }
    }
    sort_by_year(&mut combined);
    combined
}
