//! # Order Client
//!
//! Provides a high‑level API for interacting with the `Order` actor.
//! Gate checks and pricing run inside the actor's `on_create` hook; this client only shapes
//! requests and unpacks action results.
use crate::model::{
    sort_newest_first, CartItem, CheckoutRequest, CourierRef, ManualOrderRequest, Order,
    OrderCreate, OrderFilter, OrderId, OrderStatus, OrderUpdate, Totals,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use actor_framework::{ActorClient, Change, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, instrument, warn};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<OrderError>() {
            Ok(domain) => domain,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Customer checkout. Runs the full gate before anything is stored.
    #[instrument(skip(self, request), fields(client_key = %request.client_key))]
    pub async fn create_checkout(&self, request: CheckoutRequest) -> Result<OrderId, OrderError> {
        debug!("create_checkout called");
        let id = self
            .inner
            .create(OrderCreate::Checkout(request))
            .await
            .map_err(Self::map_error)?;
        info!(order_id = %id, "Checkout received");
        Ok(id)
    }

    /// Order typed in by an administrator; stored already validated.
    #[instrument(skip(self, request))]
    pub async fn create_manual(&self, request: ManualOrderRequest) -> Result<OrderId, OrderError> {
        self.inner
            .create(OrderCreate::Manual(request))
            .await
            .map_err(Self::map_error)
    }

    /// Looks an order up, turning a missing record into [`OrderError::NotFound`].
    pub async fn fetch(&self, id: OrderId) -> Result<Order, OrderError> {
        let missing = id.to_string();
        self.get(id).await?.ok_or(OrderError::NotFound(missing))
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn validate(&self, id: OrderId) -> Result<Order, OrderError> {
        match self.act(id, OrderAction::Validate).await? {
            OrderActionResult::Validated(order) => Ok(order),
            other => Err(unexpected(other)),
        }
    }

    /// Moves the order forward and hands back any courier it released.
    #[instrument(skip(self))]
    pub async fn advance_releasing(
        &self,
        id: OrderId,
        to: OrderStatus,
        note: Option<String>,
    ) -> Result<(Order, Option<CourierRef>), OrderError> {
        match self.act(id, OrderAction::Advance { to, note }).await? {
            OrderActionResult::Transitioned { order, released } => Ok((order, released)),
            other => Err(unexpected(other)),
        }
    }

    pub async fn advance(
        &self,
        id: OrderId,
        to: OrderStatus,
        note: Option<String>,
    ) -> Result<Order, OrderError> {
        self.advance_releasing(id, to, note)
            .await
            .map(|(order, _)| order)
    }

    #[instrument(skip(self))]
    pub async fn cancel_releasing(
        &self,
        id: OrderId,
        reason: Option<String>,
    ) -> Result<(Order, Option<CourierRef>), OrderError> {
        match self.act(id, OrderAction::Cancel { reason }).await? {
            OrderActionResult::Transitioned { order, released } => Ok((order, released)),
            other => Err(unexpected(other)),
        }
    }

    pub async fn cancel(&self, id: OrderId, reason: Option<String>) -> Result<Order, OrderError> {
        self.cancel_releasing(id, reason)
            .await
            .map(|(order, _)| order)
    }

    /// Replaces the order lines and returns the new subtotal and total.
    #[instrument(skip(self, items))]
    pub async fn edit_items(
        &self,
        id: OrderId,
        items: Vec<CartItem>,
        observations: Option<String>,
    ) -> Result<Totals, OrderError> {
        match self
            .act(
                id,
                OrderAction::EditItems {
                    items,
                    observations,
                },
            )
            .await?
        {
            OrderActionResult::Edited(totals) => Ok(totals),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn assign_courier(&self, id: OrderId, courier: CourierRef) -> Result<Order, OrderError> {
        match self.act(id, OrderAction::AssignCourier(courier)).await? {
            OrderActionResult::CourierAssigned(order) => Ok(order),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn release_courier(&self, id: OrderId) -> Result<Option<CourierRef>, OrderError> {
        match self.act(id, OrderAction::ReleaseCourier).await? {
            OrderActionResult::CourierReleased(courier) => Ok(courier),
            other => Err(unexpected(other)),
        }
    }

    /// Orders matching `filter`, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        let mut orders: Vec<Order> = self
            .list()
            .await?
            .into_iter()
            .filter(|o| filter.matches(o))
            .collect();
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// Follows one order. The first snapshot is the order as it is now.
    #[instrument(skip(self))]
    pub async fn watch(&self, id: OrderId) -> Result<OrderWatch, OrderError> {
        // Subscribe before reading so no change between the two is missed.
        let changes = self.subscribe();
        let current = self.fetch(id.clone()).await?;
        Ok(OrderWatch {
            id,
            current: Some(current),
            changes,
        })
    }

    /// Every committed change to the collection.
    pub fn watch_all(&self) -> broadcast::Receiver<Change<Order>> {
        self.subscribe()
    }
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

/// Stream of snapshots of a single order.
pub struct OrderWatch {
    id: OrderId,
    current: Option<Order>,
    changes: broadcast::Receiver<Change<Order>>,
}

impl OrderWatch {
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Next snapshot, or `None` once the order is deleted or the actor stops.
    pub async fn next(&mut self) -> Option<Order> {
        if let Some(order) = self.current.take() {
            return Some(order);
        }
        loop {
            match self.changes.recv().await {
                Ok(Change::Created(order) | Change::Updated(order)) if order.id == self.id => {
                    return Some(order)
                }
                Ok(Change::Deleted(id)) if id == self.id => return None,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(order_id = %self.id, skipped, "Order watch lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
