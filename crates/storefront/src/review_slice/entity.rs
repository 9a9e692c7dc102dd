use crate::api::ResourceApi;
use crate::model::{Review, ReviewSummary};
use slice_framework::SliceEntity;

impl SliceEntity for Review {
    type Id = String;
    type Summary = ReviewSummary;
    type Context = ResourceApi<Review>;

    fn id(&self) -> &String {
        &self.id
    }

    fn summarize(items: &[Self]) -> ReviewSummary {
        ReviewSummary::of(items)
    }
}
