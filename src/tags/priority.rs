use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score added to every entry under the selected category's prefix.
pub const CATEGORY_BOOST: i64 = 300;

/// Bonus per `/` in a tag, so deeper tags win over their parents.
pub const DEPTH_BONUS: i64 = 10;

lazy_static! {
    static ref BASE_PRIORITIES: HashMap<&'static str, i64> = HashMap::from([
        ("mba", 100),
        ("mba/course", 200),
        ("mba/program", 150),
        ("mba/live-session", 140),
        ("mba/case-study", 160),
        ("skill", 120),
        ("skill/analysis", 130),
        ("skill/communication", 130),
        ("skill/leadership", 130),
        ("type", 80),
        ("type/reading", 60),
        ("type/video", 60),
        ("type/transcript", 50),
        ("type/note", 50),
        ("type/assignment", 70),
        ("type/quiz", 70),
        ("tool", 90),
        ("tool/excel", 95),
        ("tool/python", 95),
        ("status", 10),
        ("source", 20),
    ]);
}

/// Category a user can favour when several tag families compete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PriorityCategory {
    Course,
    Skill,
    Type,
    Tool,
}

impl PriorityCategory {
    pub fn prefix(self) -> &'static str {
        match self {
            PriorityCategory::Course => "mba/course",
            PriorityCategory::Skill => "skill",
            PriorityCategory::Type => "type",
            PriorityCategory::Tool => "tool",
        }
    }
}

/// Exact-match tag scores. Adjustments return a new table; the base is never
/// mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityTable {
    scores: HashMap<String, i64>,
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::base()
    }
}

impl PriorityTable {
    pub fn base() -> Self {
        Self {
            scores: BASE_PRIORITIES
                .iter()
                .map(|(tag, score)| (tag.to_string(), *score))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            scores: HashMap::new(),
        }
    }

    pub fn get(&self, tag: &str) -> i64 {
        self.scores.get(tag).copied().unwrap_or(0)
    }

    /// Boost every entry equal to or nested under the category prefix.
    pub fn with_category(&self, category: PriorityCategory) -> Self {
        let prefix = category.prefix();
        let nested = format!("{}/", prefix);
        let scores = self
            .scores
            .iter()
            .map(|(tag, score)| {
                let boosted = tag == prefix || tag.starts_with(&nested);
                let score = if boosted { score + CATEGORY_BOOST } else { *score };
                (tag.clone(), score)
            })
            .collect();
        Self { scores }
    }

    /// Set explicit scores, replacing existing entries.
    pub fn with_overlay<'a, I>(&self, overlay: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a i64)>,
    {
        let mut scores = self.scores.clone();
        for (tag, score) in overlay {
            scores.insert(tag.clone(), *score);
        }
        Self { scores }
    }

    /// `exact table score + DEPTH_BONUS * nesting depth`. Unregistered tags
    /// score 0 from the table; ancestors are not consulted.
    pub fn score(&self, tag: &str) -> i64 {
        let depth = tag.matches('/').count() as i64;
        self.get(tag) + DEPTH_BONUS * depth
    }
}
