use ordering_hex::application::order_service::OrderService;
use ordering_hex::errors::AppError;
use ordering_repo::memory::InMemoryRepo;
use ordering_types::domain::cart::CartRef;
use ordering_types::domain::order::{NewOrderRequest, OrderPatch, OrderStatus};
use ordering_types::ports::cart_store::CartStore;
use ordering_types::ports::order_store::OrderStore;
use rust_decimal_macros::dec;

fn service(repo: &InMemoryRepo) -> OrderService<InMemoryRepo, InMemoryRepo> {
    OrderService::new(repo.clone(), repo.clone())
}

fn request(description: &str, cart_id: i64) -> NewOrderRequest {
    NewOrderRequest {
        description: description.into(),
        fee: dec!(100.0),
        cart: Some(CartRef::new(cart_id)),
    }
}

// End-to-end lifecycle against the in-memory adapter.
#[tokio::test]
async fn create_advance_update_delete_flow() {
    let repo = InMemoryRepo::new();
    let svc = service(&repo);
    let cart = svc.open_cart().await.unwrap();

    let order = svc.save(request("Test order", cart.id)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.cart_id, cart.id);

    let list = svc.find_all().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, order.id);

    let ordered = svc.update_status(order.id).await.unwrap();
    assert_eq!(ordered.status, OrderStatus::Ordered);
    let stored = repo.find_active_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Ordered);

    let updated = svc
        .update(
            order.id,
            OrderPatch {
                description: Some("Updated order".into()),
                fee: Some(dec!(200.0)),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "Updated order");
    assert_eq!(updated.fee, dec!(200.0));
    assert_eq!(updated.cart_id, cart.id);
    assert_eq!(updated.status, OrderStatus::Ordered);

    svc.delete_by_id(order.id).await.unwrap();
    assert!(svc.find_all().await.unwrap().is_empty());
    assert!(matches!(
        svc.find_by_id(order.id).await,
        Err(AppError::OrderNotFound(_))
    ));

    // Soft delete: the row is still there, just inactive.
    let retained = repo.find_by_id(order.id).await.unwrap().unwrap();
    assert!(!retained.active);
}

#[tokio::test]
async fn find_all_skips_inactive_orders() {
    let repo = InMemoryRepo::new();
    let svc = service(&repo);
    let cart = repo.create_cart().await.unwrap();

    let first = svc.save(request("Order 1", cart.id)).await.unwrap();
    let second = svc.save(request("Order 2", cart.id)).await.unwrap();
    let third = svc.save(request("Order 3", cart.id)).await.unwrap();
    svc.update_status(second.id).await.unwrap();
    svc.delete_by_id(third.id).await.unwrap();

    let ids: Vec<_> = svc
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn payment_locks_the_order() {
    let repo = InMemoryRepo::new();
    let svc = service(&repo);
    let cart = repo.create_cart().await.unwrap();
    let order = svc.save(request("Locked", cart.id)).await.unwrap();

    svc.update_status(order.id).await.unwrap();
    let paying = svc.update_status(order.id).await.unwrap();
    assert_eq!(paying.status, OrderStatus::InPayment);

    assert!(matches!(
        svc.update_status(order.id).await,
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        svc.delete_by_id(order.id).await,
        Err(AppError::InvalidState(_))
    ));

    let stored = repo.find_by_id(order.id).await.unwrap().unwrap();
    assert!(stored.active);
    assert_eq!(stored.status, OrderStatus::InPayment);
}

#[tokio::test]
async fn rejected_creations_leave_store_empty() {
    let repo = InMemoryRepo::new();
    let svc = service(&repo);

    let no_cart = NewOrderRequest {
        description: "New order".into(),
        fee: dec!(150.0),
        cart: None,
    };
    assert!(matches!(
        svc.save(no_cart).await,
        Err(AppError::InvalidArgument(_))
    ));
    assert!(matches!(
        svc.save(request("New order", 999)).await,
        Err(AppError::CartNotFound(999))
    ));
    assert!(repo.orders.is_empty());
}

#[tokio::test]
async fn not_found_paths() {
    let repo = InMemoryRepo::new();
    let svc = service(&repo);

    assert!(matches!(
        svc.find_by_id(1).await,
        Err(AppError::OrderNotFound(1))
    ));
    assert!(matches!(
        svc.update_status(1).await,
        Err(AppError::OrderNotFound(1))
    ));
    assert!(matches!(
        svc.delete_by_id(1).await,
        Err(AppError::OrderNotFound(1))
    ));
    assert!(matches!(
        svc.update(1, OrderPatch::default()).await,
        Err(AppError::OrderNotFound(1))
    ));
}
