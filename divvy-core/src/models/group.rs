use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of group this is, for display grouping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Home,
    Trip,
    Couple,
    Other,
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupType::Home => write!(f, "home"),
            GroupType::Trip => write!(f, "trip"),
            GroupType::Couple => write!(f, "couple"),
            GroupType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for GroupType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(GroupType::Home),
            "trip" => Ok(GroupType::Trip),
            "couple" => Ok(GroupType::Couple),
            "other" => Ok(GroupType::Other),
            _ => Err(format!(
                "Invalid group type '{}'. Valid options: home, trip, couple, other",
                s
            )),
        }
    }
}

/// A group of people sharing expenses.
///
/// The join code is a short human-shareable string, unique across groups,
/// that lets other users join without an invitation flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub group_type: GroupType,
    pub code: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Input form for creating a group. The creator becomes the first member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub group_type: GroupType,
    pub code: String,
    pub created_by: String,
}

impl NewGroup {
    pub fn new(
        name: impl Into<String>,
        group_type: GroupType,
        code: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group_type,
            code: code.into(),
            created_by: created_by.into(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.name, self.group_type, self.code)
    }
}
