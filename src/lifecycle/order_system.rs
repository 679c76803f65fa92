use crate::clients::{CourierClient, OrderClient, ProductClient};
use crate::config::Settings;
use crate::dispatch::Dispatcher;
use crate::gate::Gate;
use crate::order_actor::OrderContext;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running back office: one actor per collection plus the dispatcher.
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(Settings::from_env());
///
/// let id = system.order_client.create_checkout(request).await?;
/// system.order_client.validate(id.clone()).await?;
/// system.dispatcher.dispatch(id, courier_id).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub product_client: ProductClient,
    pub courier_client: CourierClient,
    pub dispatcher: Dispatcher,
    /// Shared with the order actor; exposed so an admin can reset a client's rate limit.
    pub gate: Arc<Gate>,
    pub settings: Arc<Settings>,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns every actor. Must be called inside a Tokio runtime.
    pub fn new(settings: Settings) -> Self {
        let settings = Arc::new(settings);
        let gate = Arc::new(Gate::new(settings.gate.clone()));
        let capacity = settings.channel_capacity;

        // 1. Create actors (no dependencies)
        let (product_actor, product_client) = crate::product_actor::new(capacity);
        let (courier_actor, courier_client) = crate::courier_actor::new(capacity);
        let (order_actor, order_client) = crate::order_actor::new(capacity);

        // 2. Start actors with injected context
        let product_handle = tokio::spawn(product_actor.run(()));
        let courier_handle = tokio::spawn(courier_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(OrderContext::new(
            product_client.clone(),
            gate.clone(),
            settings.clone(),
        )));

        let dispatcher = Dispatcher::new(order_client.clone(), courier_client.clone());
        info!(capacity, "Order system started");

        Self {
            order_client,
            product_client,
            courier_client,
            dispatcher,
            gate,
            settings,
            handles: vec![order_handle, product_handle, courier_handle],
        }
    }

    /// Closes every channel and waits for the actors to finish.
    ///
    /// Returns an error if an actor task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.dispatcher);
        drop(self.order_client);
        drop(self.courier_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
