//! Subject tags and the static compatibility index.
//!
//! Compatibility is deliberately shallow: two tags match when they share a
//! group or are the same text ignoring case. There is no transitive closure
//! and no similarity scoring.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Built-in match groups, compiled into the binary.
///
/// Deployments can replace the catalog through configuration; this table
/// covers the subjects the marketplace launched with. A tag may appear in
/// several groups.
const BUILTIN_CATALOG: &[(&str, &[&str])] = &[
    (
        "maths",
        &[
            "Algebra",
            "Geometry",
            "Calculus",
            "Trigonometry",
            "Statistics",
            "Arithmetic",
            "Linear Algebra",
            "JEE Mains – Maths",
            "JEE Advanced – Maths",
            "SAT Math",
        ],
    ),
    (
        "sciences",
        &[
            "Biology",
            "Chemistry",
            "Physics",
            "Earth Science",
            "JEE Mains – Physics",
            "NEET – Biology",
        ],
    ),
    (
        "exam_prep",
        &[
            "JEE Mains – Maths",
            "JEE Advanced – Maths",
            "JEE Mains – Physics",
            "NEET – Biology",
            "SAT Math",
            "SAT Verbal",
        ],
    ),
    (
        "languages",
        &[
            "English",
            "English Literature",
            "Spanish",
            "French",
            "German",
            "ESL",
            "SAT Verbal",
        ],
    ),
    (
        "programming",
        &[
            "Computer Science",
            "Programming",
            "Python",
            "Java",
            "Web Development",
        ],
    ),
];

/// A subject tag as written by a student or tutor.
///
/// Tags are free text on the wire. Matching normalizes case and surrounding
/// whitespace but never rewrites the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectTag(String);

impl SubjectTag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical form used for index lookups.
    pub fn normalized(&self) -> String {
        self.0.trim().to_lowercase()
    }

    /// Case- and whitespace-insensitive equality.
    pub fn matches(&self, other: &SubjectTag) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for SubjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubjectTag {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for SubjectTag {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// A named set of mutually compatible subject tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchGroup {
    pub id: String,
    pub tags: Vec<String>,
}

/// Immutable lookup from normalized tag to the groups containing it.
///
/// Built once at startup and shared read-only afterwards, so lookups take
/// no locks.
#[derive(Debug)]
pub struct TagIndex {
    groups_by_tag: HashMap<String, BTreeSet<String>>,
    group_count: usize,
}

impl TagIndex {
    /// Build an index from a group catalog.
    ///
    /// Tags are normalized on the way in; a tag listed in several groups
    /// maps to all of them.
    pub fn new(catalog: &[MatchGroup]) -> Self {
        let mut groups_by_tag: HashMap<String, BTreeSet<String>> = HashMap::new();
        for group in catalog {
            for tag in &group.tags {
                groups_by_tag
                    .entry(SubjectTag::new(tag.as_str()).normalized())
                    .or_default()
                    .insert(group.id.clone());
            }
        }
        Self {
            groups_by_tag,
            group_count: catalog.len(),
        }
    }

    /// Index over the built-in catalog.
    pub fn builtin() -> Self {
        let catalog: Vec<MatchGroup> = BUILTIN_CATALOG
            .iter()
            .map(|(id, tags)| MatchGroup {
                id: (*id).to_string(),
                tags: tags.iter().map(|t| (*t).to_string()).collect(),
            })
            .collect();
        Self::new(&catalog)
    }

    /// Group ids containing this tag, if any.
    pub fn groups_for(&self, tag: &SubjectTag) -> Option<&BTreeSet<String>> {
        self.groups_by_tag.get(&tag.normalized())
    }

    /// True when both tags are cataloged and share at least one group.
    pub fn shares_group(&self, a: &SubjectTag, b: &SubjectTag) -> bool {
        match (self.groups_for(a), self.groups_for(b)) {
            (Some(ga), Some(gb)) => ga.intersection(gb).next().is_some(),
            _ => false,
        }
    }

    /// Compatibility check: shared group, or the same tag spelled with
    /// different casing. Uncataloged tags still match themselves.
    pub fn compatible(&self, a: &SubjectTag, b: &SubjectTag) -> bool {
        a.matches(b) || self.shares_group(a, b)
    }

    pub fn tag_count(&self) -> usize {
        self.groups_by_tag.len()
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }
}
