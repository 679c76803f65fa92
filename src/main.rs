//! # Order Desk demo
//!
//! Seeds a small catalog and one courier, then walks a delivery order through
//! checkout → validation → kitchen → dispatch → delivery and prints the day's sales.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use actor_framework::tracing::setup_tracing;
use chrono::Utc;
use order_desk::config::Settings;
use order_desk::lifecycle::OrderSystem;
use order_desk::model::{
    CartItem, CheckoutRequest, CourierCreate, Customer, DeliveryType, OrderFilter, OrderStatus,
    PaymentMethod, ProductCreate,
};
use order_desk::reports::{Period, SalesSummary};
use rust_decimal::Decimal;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let settings = Settings::from_env();
    info!(?settings, "Starting order desk");
    let system = OrderSystem::new(settings);

    let span = tracing::info_span!("seed");
    let (roll_id, courier_id) = async {
        let roll = system
            .product_client
            .create_product(ProductCreate::new("Sake Roll", Decimal::from(6500), "Rolls"))
            .await
            .map_err(|e| e.to_string())?;
        system
            .product_client
            .create_product(ProductCreate::new("Gyoza", Decimal::from(3900), "Starters"))
            .await
            .map_err(|e| e.to_string())?;
        let courier = system
            .courier_client
            .create_courier(CourierCreate {
                name: "Pedro Rojas".to_string(),
                phone: "+56987654321".to_string(),
            })
            .await
            .map_err(|e| e.to_string())?;
        Ok::<_, String>((roll, courier))
    }
    .instrument(span)
    .await?;

    let request = CheckoutRequest {
        client_key: "demo-device".to_string(),
        customer: Customer::new("Maria Soto", "+56912345678")
            .with_address("Los Leones 450, depto 12"),
        delivery_type: DeliveryType::Delivery,
        items: vec![
            CartItem::new("Sake Roll", Decimal::from(6500), 2).for_product(roll_id),
            CartItem::new("Gyoza", Decimal::from(3900), 1),
        ],
        observations: Some("No wasabi".to_string()),
        payment_method: PaymentMethod::Card,
        tip: Decimal::from(1000),
        ..CheckoutRequest::default()
    };

    let span = tracing::info_span!("order_processing");
    let order_id = async {
        let id = system
            .order_client
            .create_checkout(request)
            .await
            .map_err(|e| e.to_string())?;
        let mut watch = system
            .order_client
            .watch(id.clone())
            .await
            .map_err(|e| e.to_string())?;

        system
            .order_client
            .validate(id.clone())
            .await
            .map_err(|e| e.to_string())?;
        system
            .order_client
            .advance(id.clone(), OrderStatus::Preparing, None)
            .await
            .map_err(|e| e.to_string())?;
        system
            .dispatcher
            .dispatch(id.clone(), courier_id)
            .await
            .map_err(|e| e.to_string())?;
        system
            .dispatcher
            .complete(id.clone())
            .await
            .map_err(|e| e.to_string())?;

        // created, validated, preparing, courier linked, en route, delivered
        for _ in 0..6 {
            match watch.next().await {
                Some(order) => info!(order_id = %order.id, status = %order.status, "Order snapshot"),
                None => break,
            }
        }
        Ok::<_, String>(id)
    }
    .instrument(span)
    .await?;

    let order = system
        .order_client
        .fetch(order_id)
        .await
        .map_err(|e| e.to_string())?;
    info!(
        tracking_url = %order.tracking_url,
        total = %order.total,
        history = order.status_history.len(),
        "Order delivered"
    );

    let orders = system
        .order_client
        .list_orders(OrderFilter::default())
        .await
        .map_err(|e| e.to_string())?;
    let summary = SalesSummary::for_period(&orders, Period::Today, Utc::now());
    let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    info!("Sales today:\n{json}");

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
