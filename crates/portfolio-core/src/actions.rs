use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ActionError;

/// Remediation task status. Moves forward only; there is no reopen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    InProgress,
    Completed,
}

impl ActionStatus {
    pub const ALL: [ActionStatus; 3] = [
        ActionStatus::Pending,
        ActionStatus::InProgress,
        ActionStatus::Completed,
    ];

    /// `true` when `next` is strictly later in the lifecycle. Skipping ahead
    /// (pending to completed) is allowed.
    #[must_use]
    pub fn can_advance_to(self, next: ActionStatus) -> bool {
        next > self
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActionStatus::Pending => "pending",
            ActionStatus::InProgress => "in_progress",
            ActionStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ActionStatus::Pending),
            "in_progress" => Ok(ActionStatus::InProgress),
            "completed" => Ok(ActionStatus::Completed),
            other => Err(format!(
                "unknown action status '{other}'; expected pending, in_progress or completed"
            )),
        }
    }
}

/// A follow-up task tied to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAction {
    pub id: String,
    pub product_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ActionStatus,
    pub updated_at: DateTime<Utc>,
}

impl ProductAction {
    /// Move the action to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidTransition`] when `next` is not strictly
    /// later than the current status.
    pub fn advance(&mut self, next: ActionStatus, now: DateTime<Utc>) -> Result<(), ActionError> {
        if !self.status.can_advance_to(next) {
            return Err(ActionError::InvalidTransition {
                action_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Store a note on the action. Surrounding whitespace is trimmed and a
    /// blank note clears the description.
    pub fn save_note(&mut self, note: &str, now: DateTime<Utc>) {
        let trimmed = note.trim();
        self.description = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.updated_at = now;
    }
}

/// Count actions per status, in lifecycle order.
#[must_use]
pub fn count_by_status(actions: &[ProductAction]) -> [(ActionStatus, usize); 3] {
    ActionStatus::ALL.map(|status| {
        let count = actions.iter().filter(|a| a.status == status).count();
        (status, count)
    })
}
