use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's membership in a group. Unique per (group, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub group_id: i64,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}

/// Input form for joining a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    pub group_id: i64,
    pub user_id: String,
}

impl NewMember {
    pub fn new(group_id: i64, user_id: impl Into<String>) -> Self {
        Self {
            group_id,
            user_id: user_id.into(),
        }
    }
}
