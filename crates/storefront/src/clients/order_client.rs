use crate::clients::crud;
use crate::model::{
    CartItem, Order, OrderCreate, OrderStatus, OrderUpdate, PaymentMethod, ShippingAddress,
};
use crate::order_slice::OrderError;
use slice_framework::SliceClient;
use tracing::{debug, info, instrument};

/// Client for the order slice.
///
/// Orders are placed from cart snapshots. The server recomputes the total, and what it
/// echoes back is what the slice stores.
#[derive(Clone)]
pub struct OrderClient {
    inner: SliceClient<Order>,
}

crate::impl_admin_client!(OrderClient, Order, OrderError, OrderCreate, OrderUpdate, order, orders);

impl OrderClient {
    #[instrument(skip(self, items, address), fields(lines = items.len()))]
    pub async fn place_order(
        &self,
        items: &[CartItem],
        address: ShippingAddress,
        payment: PaymentMethod,
    ) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        let body = OrderCreate::from_cart(items, address, payment);
        info!(client_total = body.total, "Placing order");
        let order = self.create_order(body).await?;
        info!(order = %order.id, total = order.total, "Order placed");
        Ok(order)
    }

    /// Moves an order along its lifecycle. A transition the order's known status does
    /// not allow is refused without contacting the server.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        let operation = crud::change_status(&self.inner.current(), id, status)?;
        self.inner
            .dispatch(operation)
            .await
            .map_err(OrderError::from)?
            .into_entity()
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// Only pending and processing orders can be cancelled.
    pub async fn cancel_order(&self, id: &str) -> Result<Order, OrderError> {
        self.update_order_status(id, OrderStatus::Cancelled).await
    }
}
