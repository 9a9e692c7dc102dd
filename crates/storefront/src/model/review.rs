use super::{HasStatus, StatusTransition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation state of a review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl StatusTransition for ReviewStatus {
    fn allowed_targets(self) -> &'static [Self] {
        match self {
            ReviewStatus::Pending => &[ReviewStatus::Approved, ReviewStatus::Rejected],
            ReviewStatus::Approved => &[ReviewStatus::Rejected],
            ReviewStatus::Rejected => &[ReviewStatus::Approved],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "product", deserialize_with = "super::reference")]
    pub product_id: Option<String>,
    #[serde(default, alias = "userName")]
    pub author: String,
    /// 1 to 5 stars.
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl HasStatus for Review {
    type Status = ReviewStatus;

    fn status(&self) -> ReviewStatus {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub count: u64,
    /// Mean rating over the loaded reviews, zero when there are none.
    pub average_rating: f64,
}

impl ReviewSummary {
    pub fn of(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self::default();
        }
        let sum: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
        Self {
            count: reviews.len() as u64,
            average_rating: sum as f64 / reviews.len() as f64,
        }
    }
}
