//! Tier-ordered tutor matching.

use serde::{Deserialize, Serialize};

use crate::subject::{SubjectTag, TagIndex};
use crate::tutor::TutorProfile;

/// How a tutor's subject relates to the requested tag.
///
/// `Exact` outranks `Group`; the derived ordering encodes that, so a plain
/// sort puts stronger matches first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Same tag, ignoring case
    Exact,
    /// Shared match group
    Group,
}

/// A tutor paired with the strength of the match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorMatch {
    pub tutor: TutorProfile,
    pub tier: MatchTier,
}

/// Best tier this tutor reaches for the requested tag, if any.
pub fn match_tier(
    index: &TagIndex,
    requested: &SubjectTag,
    tutor: &TutorProfile,
) -> Option<MatchTier> {
    if !tutor.is_matchable() {
        return None;
    }
    let mut best = None;
    for subject in &tutor.subjects {
        if requested.matches(subject) {
            return Some(MatchTier::Exact);
        }
        if index.shares_group(requested, subject) {
            best = Some(MatchTier::Group);
        }
    }
    best
}

/// All compatible tutors, exact matches before group matches.
///
/// Within a tier the input order is kept, so a caller that feeds a rated or
/// recency-sorted pool keeps that order inside each tier.
pub fn find_compatible_tutors(
    index: &TagIndex,
    requested: &SubjectTag,
    pool: &[TutorProfile],
) -> Vec<TutorMatch> {
    let mut matches: Vec<TutorMatch> = pool
        .iter()
        .filter_map(|tutor| {
            match_tier(index, requested, tutor).map(|tier| TutorMatch {
                tutor: tutor.clone(),
                tier,
            })
        })
        .collect();
    matches.sort_by_key(|m| m.tier);
    matches
}
