//! Request and response payloads for the catalog service.
//!
//! Catalog records themselves (`Product`, `FeedbackItem`, `ProductAction`)
//! come from `portfolio-core`; this module holds only the shapes specific to
//! write endpoints, AI queries and document ingestion.

use portfolio_core::ActionStatus;
use serde::{Deserialize, Serialize};

/// Body of `POST /products`. Unset optional fields are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governance_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pii_flag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gating_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_metric: Option<String>,
}

/// Body of `PATCH /actions/{id}`: a status change, a note, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionStatus>,
    /// `Some("")` clears the stored note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `POST /ai/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiQuery {
    pub question: String,
    /// Restricts retrieval to one product's documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AiAnswer {
    pub answer: String,
    /// Titles or ids of the documents the answer draws on.
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// `true` once the job will not change state again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// A document ingestion job, as returned by `POST /documents` and
/// `GET /documents/jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestionJob {
    #[serde(alias = "job_id")]
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub document_id: Option<String>,
    /// Failure reason reported by the service.
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_omits_unset_fields() {
        let product = NewProduct {
            name: "Pay Later".to_string(),
            region: Some("emea".to_string()),
            ..NewProduct::default()
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Pay Later", "region": "emea"}));
    }

    #[test]
    fn action_update_serializes_snake_case_status() {
        let update = ActionUpdate {
            status: Some(ActionStatus::InProgress),
            description: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"status": "in_progress"}));
    }

    #[test]
    fn ingestion_job_accepts_job_id_alias() {
        let job: IngestionJob =
            serde_json::from_str(r#"{"job_id":"j1","status":"processing"}"#).unwrap();
        assert_eq!(job.id, "j1");
        assert_eq!(job.status, JobStatus::Processing);
        assert!(!job.status.is_terminal());
    }

    #[test]
    fn unknown_job_status_does_not_fail() {
        let job: IngestionJob =
            serde_json::from_str(r#"{"id":"j1","status":"paused"}"#).unwrap();
        assert_eq!(job.status, JobStatus::Unknown);
    }
}
