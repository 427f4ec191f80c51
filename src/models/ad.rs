use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::user::Category;

/// Lifecycle state of an ad posting. An ad leaves the open feed the moment an
/// influencer accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    Open,
    Accepted,
}

impl AdStatus {
    /// String form used in query filters; must match the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdStatus::Open => "open",
            AdStatus::Accepted => "accepted",
        }
    }
}

/// Influencer-submitted evidence that the sponsored action was completed.
/// Written at most once; the ad is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub link: String,
    pub description: String,
    pub submitted_at: i64,
}

/// Ad posting (armazenado no MongoDB, coleção `ads`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category: Category,

    /// user_id of the posting company
    pub company_id: String,
    /// Company display name (denormalized para facilitar queries)
    pub company_name: String,

    pub status: AdStatus,

    /// user_id of the accepting influencer, set exactly once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    pub created_at: i64,
}

/// Request para criar anúncio
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub category: Option<String>,
}

/// Request para enviar prova de conclusão
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProofRequest {
    pub link: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serde_matches_filter_literals() {
        // Query filters use the literal strings, so the serde form must agree.
        let open = serde_json::to_value(AdStatus::Open).unwrap();
        let accepted = serde_json::to_value(AdStatus::Accepted).unwrap();
        assert_eq!(open, AdStatus::Open.as_str());
        assert_eq!(accepted, AdStatus::Accepted.as_str());
    }

    #[test]
    fn open_ad_serializes_without_acceptance_fields() {
        let ad = Ad {
            id: None,
            title: "Spring drop".to_string(),
            description: "Promote our new line".to_string(),
            budget: 500.0,
            category: Category::Fashion,
            company_id: "64b000000000000000000002".to_string(),
            company_name: "Acme".to_string(),
            status: AdStatus::Open,
            accepted_by: None,
            accepted_at: None,
            proof: None,
            created_at: 1_700_000_000,
        };
        let json = serde_json::to_value(&ad).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["companyName"], "Acme");
        assert!(json.get("acceptedBy").is_none());
        assert!(json.get("proof").is_none());
    }

    #[test]
    fn proof_serializes_camel_case() {
        let proof = Proof {
            link: "https://example.com/post".to_string(),
            description: "Story posted".to_string(),
            submitted_at: 1_700_000_123,
        };
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["submittedAt"], 1_700_000_123);
        assert_eq!(json["link"], "https://example.com/post");
    }
}
