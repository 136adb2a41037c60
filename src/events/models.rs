use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One source record as exported: free-text column header to cell text.
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Technical,
    #[serde(rename = "Non-Technical")]
    NonTechnical,
    Cultural,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Technical => "Technical",
            Category::NonTechnical => "Non-Technical",
            Category::Cultural => "Cultural",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "AIML")]
    Aiml,
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "ECE")]
    Ece,
    Mech,
    Civil,
    #[serde(rename = "MBA")]
    Mba,
    #[serde(rename = "Applied Science")]
    AppliedScience,
    #[default]
    Common,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Aiml => "AIML",
            Department::Cse => "CSE",
            Department::Ece => "ECE",
            Department::Mech => "Mech",
            Department::Civil => "Civil",
            Department::Mba => "MBA",
            Department::AppliedScience => "Applied Science",
            Department::Common => "Common",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive team-size range; single-member events are {1, 1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSize {
    pub min: u32,
    pub max: u32,
}

impl Default for TeamSize {
    fn default() -> Self {
        TeamSize { min: 1, max: 1 }
    }
}

/// Prize tiers; tiers the source did not announce are omitted, not zeroed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prizes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatorRole {
    Head,
    Coordinator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinator {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: CoordinatorRole,
}

/// Normalized event record; `name` is the natural key for deduplication and
/// upserts, `slug` is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub slug: String,
    pub category: Category,
    pub department: Department,
    pub team_size: TeamSize,
    pub prizes: Prizes,
    pub date: NaiveDate,
    pub registration_fee: u32,
    pub max_participants: u32,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub coordinators: Vec<Coordinator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    pub name: String,
    pub message: String,
}

/// Operator-facing result of one import run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Unique event names after deduplication.
    pub total: usize,
    pub imported: usize,
    pub errors: Vec<ImportFailure>,
    pub by_department: BTreeMap<String, usize>,
}
