//! [`SliceEntity`] implementation for [`Order`].
//!
//! Orders carry a derived [`OrderSummary`] so dashboards can show the order count and the
//! revenue of the loaded page without another request.

use crate::api::ResourceApi;
use crate::model::{Order, OrderSummary};
use slice_framework::SliceEntity;

impl SliceEntity for Order {
    type Id = String;
    type Summary = OrderSummary;
    type Context = ResourceApi<Order>;

    fn id(&self) -> &String {
        &self.id
    }

    fn summarize(items: &[Self]) -> OrderSummary {
        OrderSummary::of(items)
    }
}
