//! # Delivery Assignment
//!
//! The order and courier actors never call each other. [`Dispatcher`] holds a client for
//! each and keeps them consistent: every change to which orders a courier carries ends
//! with [`Dispatcher::recompute`], which counts the courier's en-route orders and pushes
//! the number into the courier record. Courier availability is never written by hand.
//!
//! Operations that link or unlink couriers run one at a time per dispatcher, so an
//! availability check and the assignment that follows it see the same courier state.

pub mod error;

pub use error::*;

use crate::clients::{CourierClient, OrderClient};
use crate::model::{CourierId, CourierRef, Order, OrderFilter, OrderId, OrderStatus, OrderView};
use actor_framework::ActorClient;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct Dispatcher {
    orders: OrderClient,
    couriers: CourierClient,
    // Shared by clones; held from availability check to workload sync.
    links: Arc<Mutex<()>>,
}

impl Dispatcher {
    pub fn new(orders: OrderClient, couriers: CourierClient) -> Self {
        Self {
            orders,
            couriers,
            links: Arc::new(Mutex::new(())),
        }
    }

    async fn courier_ref(&self, courier: CourierId) -> Result<CourierRef, DispatchError> {
        let courier = self.couriers.fetch(courier).await?;
        if !courier.is_assignable() {
            return Err(DispatchError::CourierUnavailable(courier.id));
        }
        Ok(CourierRef {
            id: courier.id,
            name: courier.name,
            assigned_at: Utc::now(),
        })
    }

    /// Links a courier to a delivery order and sends it out in one step.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, order: OrderId, courier: CourierId) -> Result<Order, DispatchError> {
        let _links = self.links.lock().await;
        let current = self.orders.fetch(order.clone()).await?;
        if !current.is_delivery() {
            return Err(DispatchError::NotDelivery(order));
        }
        if !current.validated {
            return Err(DispatchError::NotValidated(order));
        }
        if !matches!(
            current.status,
            OrderStatus::Confirmed | OrderStatus::Preparing
        ) {
            return Err(DispatchError::NotDispatchable {
                id: order,
                status: current.status,
            });
        }

        let courier_ref = self.courier_ref(courier).await?;
        let note = format!("assigned to courier {}", courier_ref.name);
        self.orders
            .assign_courier(order.clone(), courier_ref)
            .await?;

        let dispatched = match self
            .orders
            .advance(order.clone(), OrderStatus::EnRoute, Some(note))
            .await
        {
            Ok(dispatched) => dispatched,
            Err(e) => {
                warn!(order_id = %order, error = %e, "Dispatch failed, releasing courier");
                self.orders.release_courier(order).await?;
                self.sync_workload(courier).await?;
                return Err(e.into());
            }
        };

        self.sync_workload(courier).await?;
        info!(order_id = %dispatched.id, courier_id = %courier, "Order dispatched");
        Ok(dispatched)
    }

    /// Links a courier without changing the order status.
    #[instrument(skip(self))]
    pub async fn assign(&self, order: OrderId, courier: CourierId) -> Result<Order, DispatchError> {
        let _links = self.links.lock().await;
        let previous = self.orders.fetch(order.clone()).await?.courier_id();
        let courier_ref = self.courier_ref(courier).await?;
        let updated = self.orders.assign_courier(order, courier_ref).await?;
        if let Some(previous) = previous.filter(|p| *p != courier) {
            self.sync_workload(previous).await?;
        }
        self.sync_workload(courier).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn unassign(&self, order: OrderId) -> Result<Option<CourierRef>, DispatchError> {
        let _links = self.links.lock().await;
        let released = self.orders.release_courier(order).await?;
        if let Some(courier) = &released {
            self.sync_workload(courier.id).await?;
        }
        Ok(released)
    }

    /// Marks the order delivered and frees its courier.
    #[instrument(skip(self))]
    pub async fn complete(&self, order: OrderId) -> Result<Order, DispatchError> {
        let _links = self.links.lock().await;
        let (delivered, released) = self
            .orders
            .advance_releasing(order, OrderStatus::Delivered, None)
            .await?;
        if let Some(courier) = released {
            self.sync_workload(courier.id).await?;
        }
        info!(order_id = %delivered.id, "Order delivered");
        Ok(delivered)
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, order: OrderId, reason: Option<String>) -> Result<Order, DispatchError> {
        let _links = self.links.lock().await;
        let (cancelled, released) = self.orders.cancel_releasing(order, reason).await?;
        if let Some(courier) = released {
            self.sync_workload(courier.id).await?;
        }
        Ok(cancelled)
    }

    /// Takes a courier off the roster and releases every order it is carrying.
    /// Returns the ids of the released orders.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, courier: CourierId) -> Result<Vec<OrderId>, DispatchError> {
        let _links = self.links.lock().await;
        self.couriers.set_active(courier, false).await?;
        let carried = self
            .orders
            .list_orders(OrderFilter::view(OrderView::Dispatched).courier(courier))
            .await?;

        let mut released = Vec::with_capacity(carried.len());
        for order in carried {
            self.orders.release_courier(order.id.clone()).await?;
            warn!(order_id = %order.id, courier_id = %courier, "Order released from inactive courier");
            released.push(order.id);
        }
        self.sync_workload(courier).await?;
        Ok(released)
    }

    #[instrument(skip(self))]
    pub async fn reactivate(&self, courier: CourierId) -> Result<(), DispatchError> {
        let _links = self.links.lock().await;
        self.couriers.set_active(courier, true).await?;
        self.sync_workload(courier).await
    }

    /// Number of en-route orders linked to the courier.
    pub async fn workload(&self, courier: CourierId) -> Result<u32, DispatchError> {
        let orders = self.orders.list().await.map_err(DispatchError::from)?;
        let count = orders.iter().filter(|o| o.is_en_route_with(courier)).count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Re-derives the courier's status from its workload.
    pub async fn recompute(&self, courier: CourierId) -> Result<(), DispatchError> {
        let _links = self.links.lock().await;
        self.sync_workload(courier).await
    }

    async fn sync_workload(&self, courier: CourierId) -> Result<(), DispatchError> {
        let count = self.workload(courier).await?;
        self.couriers.sync_workload(courier, count).await?;
        Ok(())
    }
}
