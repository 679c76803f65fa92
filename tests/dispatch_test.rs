use order_desk::config::Settings;
use order_desk::dispatch::DispatchError;
use order_desk::lifecycle::OrderSystem;
use order_desk::model::{
    CartItem, CourierCreate, CourierId, CourierStatus, CourierUpdate, Customer, DeliveryType,
    ManualOrderRequest, OrderId, OrderStatus, ProductCreate,
};
use order_desk::order_actor::OrderError;
use rust_decimal::Decimal;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn manual_order(system: &OrderSystem, delivery_type: DeliveryType) -> OrderId {
    system
        .order_client
        .create_manual(ManualOrderRequest {
            customer: Customer::new("Maria Soto", "+56912345678")
                .with_address("Los Leones 450, depto 12"),
            delivery_type,
            items: vec![CartItem::new("Sake Roll", Decimal::from(6500), 1)],
            ..ManualOrderRequest::default()
        })
        .await
        .unwrap()
}

async fn courier(system: &OrderSystem, name: &str) -> CourierId {
    system
        .courier_client
        .create_courier(CourierCreate {
            name: name.to_string(),
            phone: "+56987654321".into(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_dispatch_preconditions() {
    init_tracing();
    let system = OrderSystem::new(Settings::default());
    let pedro = courier(&system, "Pedro").await;

    let pickup = manual_order(&system, DeliveryType::Pickup).await;
    assert_eq!(
        system.dispatcher.dispatch(pickup.clone(), pedro).await,
        Err(DispatchError::NotDelivery(pickup))
    );

    let delivery = manual_order(&system, DeliveryType::Delivery).await;
    assert_eq!(
        system
            .dispatcher
            .dispatch(delivery.clone(), CourierId(99))
            .await,
        Err(DispatchError::Courier(
            order_desk::courier_actor::CourierError::NotFound("DP-99".into())
        ))
    );

    system
        .dispatcher
        .cancel(delivery.clone(), Some("duplicate".into()))
        .await
        .unwrap();
    assert_eq!(
        system.dispatcher.dispatch(delivery.clone(), pedro).await,
        Err(DispatchError::NotDispatchable {
            id: delivery,
            status: OrderStatus::Cancelled,
        })
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unvalidated_checkout_cannot_be_dispatched() {
    init_tracing();
    let system = OrderSystem::new(Settings::default());
    let pedro = courier(&system, "Pedro").await;
    system
        .product_client
        .create_product(ProductCreate::new("Sake Roll", Decimal::from(6500), "Rolls"))
        .await
        .unwrap();

    let id = system
        .order_client
        .create_checkout(order_desk::model::CheckoutRequest {
            client_key: "device-1".into(),
            customer: Customer::new("Maria Soto", "+56912345678")
                .with_address("Los Leones 450, depto 12"),
            delivery_type: DeliveryType::Delivery,
            items: vec![CartItem::new("Sake Roll", Decimal::from(6500), 1)],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(
        system.dispatcher.dispatch(id.clone(), pedro).await,
        Err(DispatchError::NotValidated(id))
    );
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_busy_courier_is_not_offered_twice() {
    init_tracing();
    let system = OrderSystem::new(Settings::default());
    let pedro = courier(&system, "Pedro").await;
    let first = manual_order(&system, DeliveryType::Delivery).await;
    let second = manual_order(&system, DeliveryType::Delivery).await;

    system.dispatcher.dispatch(first.clone(), pedro).await.unwrap();
    assert_eq!(system.dispatcher.workload(pedro).await.unwrap(), 1);
    assert!(system.courier_client.available().await.unwrap().is_empty());

    assert_eq!(
        system.dispatcher.dispatch(second.clone(), pedro).await,
        Err(DispatchError::CourierUnavailable(pedro))
    );
    let untouched = system.order_client.fetch(second).await.unwrap();
    assert!(untouched.courier.is_none());
    assert_eq!(untouched.status, OrderStatus::Confirmed);

    system.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatches_share_one_courier() {
    init_tracing();
    let system = OrderSystem::new(Settings::default());
    let pedro = courier(&system, "Pedro").await;
    let first = manual_order(&system, DeliveryType::Delivery).await;
    let second = manual_order(&system, DeliveryType::Delivery).await;

    let a = tokio::spawn({
        let dispatcher = system.dispatcher.clone();
        async move { dispatcher.dispatch(first, pedro).await }
    });
    let b = tokio::spawn({
        let dispatcher = system.dispatcher.clone();
        async move { dispatcher.dispatch(second, pedro).await }
    });
    let results = [a.await.unwrap(), b.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| *r == Err(DispatchError::CourierUnavailable(pedro))));
    assert_eq!(system.dispatcher.workload(pedro).await.unwrap(), 1);
    let pedro_now = system.courier_client.fetch(pedro).await.unwrap();
    assert_eq!(pedro_now.status, CourierStatus::Busy);
    assert_eq!(pedro_now.active_orders, 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cancel_en_route_frees_courier() {
    init_tracing();
    let system = OrderSystem::new(Settings::default());
    let pedro = courier(&system, "Pedro").await;
    let id = manual_order(&system, DeliveryType::Delivery).await;

    system.dispatcher.dispatch(id.clone(), pedro).await.unwrap();
    let cancelled = system
        .dispatcher
        .cancel(id.clone(), Some("address not found".into()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.courier.is_none());

    let pedro_now = system.courier_client.fetch(pedro).await.unwrap();
    assert_eq!(pedro_now.status, CourierStatus::Available);
    assert_eq!(pedro_now.active_orders, 0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_assign_and_unassign_without_status_change() {
    init_tracing();
    let system = OrderSystem::new(Settings::default());
    let pedro = courier(&system, "Pedro").await;
    let ana = courier(&system, "Ana").await;
    let id = manual_order(&system, DeliveryType::Delivery).await;

    let assigned = system.dispatcher.assign(id.clone(), pedro).await.unwrap();
    assert_eq!(assigned.status, OrderStatus::Confirmed);
    assert_eq!(assigned.courier_id(), Some(pedro));
    // Linked but not en route: no workload yet.
    assert_eq!(system.dispatcher.workload(pedro).await.unwrap(), 0);

    let reassigned = system.dispatcher.assign(id.clone(), ana).await.unwrap();
    assert_eq!(reassigned.courier_id(), Some(ana));

    let released = system.dispatcher.unassign(id.clone()).await.unwrap();
    assert_eq!(released.map(|c| c.id), Some(ana));
    assert_eq!(system.dispatcher.unassign(id).await.unwrap(), None);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_deactivate_releases_carried_orders() {
    init_tracing();
    let system = OrderSystem::new(Settings::default());
    let pedro = courier(&system, "Pedro").await;
    let ana = courier(&system, "Ana").await;
    let carried = manual_order(&system, DeliveryType::Delivery).await;
    let other = manual_order(&system, DeliveryType::Delivery).await;

    system.dispatcher.dispatch(carried.clone(), pedro).await.unwrap();
    system.dispatcher.dispatch(other.clone(), ana).await.unwrap();

    let released = system.dispatcher.deactivate(pedro).await.unwrap();
    assert_eq!(released, vec![carried.clone()]);

    let order = system.order_client.fetch(carried).await.unwrap();
    assert_eq!(order.status, OrderStatus::EnRoute);
    assert!(order.courier.is_none());
    assert_eq!(
        system.order_client.fetch(other).await.unwrap().courier_id(),
        Some(ana)
    );

    let roster = system.courier_client.roster().await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, ana);
    let pedro_now = system.courier_client.fetch(pedro).await.unwrap();
    assert!(!pedro_now.active);
    assert_eq!(pedro_now.active_orders, 0);

    system.dispatcher.reactivate(pedro).await.unwrap();
    let available = system.courier_client.available().await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, pedro);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_offline_courier_is_skipped() {
    init_tracing();
    let system = OrderSystem::new(Settings::default());
    let pedro = courier(&system, "Pedro").await;
    system
        .courier_client
        .update_courier(
            pedro,
            CourierUpdate {
                status: Some(CourierStatus::Offline),
                ..CourierUpdate::default()
            },
        )
        .await
        .unwrap();
    let id = manual_order(&system, DeliveryType::Delivery).await;

    assert_eq!(
        system.dispatcher.dispatch(id.clone(), pedro).await,
        Err(DispatchError::CourierUnavailable(pedro))
    );
    assert_eq!(
        system
            .order_client
            .advance(id, OrderStatus::EnRoute, None)
            .await,
        Err(OrderError::CourierRequired)
    );

    system.shutdown().await.unwrap();
}
