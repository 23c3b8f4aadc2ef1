use std::sync::Arc;

use chrono::Utc;
use models::review::{self, MAX_RATING, MIN_RATING};
use models::business;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::caller::Caller;
use crate::directory::ReviewStore;
use crate::errors::ServiceError;
use crate::listing::ListingRepository;
use crate::validation::Violations;

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub business_id: Uuid,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
    businesses: Arc<dyn ListingRepository<business::Model>>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewStore>, businesses: Arc<dyn ListingRepository<business::Model>>) -> Self {
        Self { reviews, businesses }
    }

    /// Any authenticated caller may review an active business.
    #[instrument(skip(self, input), fields(business_id = %input.business_id, caller_id = %caller.id))]
    pub async fn create(&self, caller: &Caller, input: ReviewInput) -> Result<review::Model, ServiceError> {
        let mut v = Violations::new();
        match input.rating {
            None => v.push("rating", "is required"),
            Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => {
                v.push("rating", format!("must be between {MIN_RATING} and {MAX_RATING}"))
            }
            Some(_) => {}
        }
        v.finish()?;
        let target = self.businesses.find_by_id(input.business_id).await?;
        if !target.is_some_and(|b| b.is_active) {
            return Err(ServiceError::NotFound("Business"));
        }
        let row = self
            .reviews
            .insert(review::Model {
                id: Uuid::new_v4(),
                business_id: input.business_id,
                user_id: caller.id,
                rating: input.rating.unwrap_or(MIN_RATING),
                comment: input.comment.filter(|c| !c.trim().is_empty()),
                created_at: Utc::now().into(),
            })
            .await?;
        info!(review_id = %row.id, rating = row.rating, "review_created");
        Ok(row)
    }

    pub async fn list_for_business(&self, business_id: Uuid) -> Result<Vec<review::Model>, ServiceError> {
        self.reviews.for_businesses(&[business_id]).await
    }
}
