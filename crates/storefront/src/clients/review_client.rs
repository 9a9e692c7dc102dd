use crate::api::ListQuery;
use crate::clients::crud;
use crate::model::{Review, ReviewCreate, ReviewStatus, ReviewUpdate};
use crate::review_slice::ReviewError;
use slice_framework::{SliceClient, SliceState};
use tracing::{debug, instrument};

/// Client for product reviews and their moderation.
#[derive(Clone)]
pub struct ReviewClient {
    inner: SliceClient<Review>,
}

crate::impl_admin_client!(
    ReviewClient,
    Review,
    ReviewError,
    ReviewCreate,
    ReviewUpdate,
    review,
    reviews,
);

impl ReviewClient {
    /// Reviews of one product; the product id travels as the `productId` filter.
    pub async fn fetch_product_reviews(
        &self,
        product_id: &str,
        query: ListQuery,
    ) -> Result<SliceState<Review>, ReviewError> {
        self.fetch_reviews(query.filter("productId", product_id)).await
    }

    pub async fn approve_review(&self, id: &str) -> Result<Review, ReviewError> {
        self.moderate(id, ReviewStatus::Approved).await
    }

    pub async fn reject_review(&self, id: &str) -> Result<Review, ReviewError> {
        self.moderate(id, ReviewStatus::Rejected).await
    }

    #[instrument(skip(self))]
    async fn moderate(&self, id: &str, status: ReviewStatus) -> Result<Review, ReviewError> {
        debug!("Sending request");
        let operation = crud::change_status(&self.inner.current(), id, status)?;
        self.inner
            .dispatch(operation)
            .await
            .map_err(ReviewError::from)?
            .into_entity()
            .ok_or_else(|| ReviewError::NotFound(id.to_string()))
    }
}
