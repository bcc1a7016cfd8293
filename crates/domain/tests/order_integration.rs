//! Integration tests for the order service.
//!
//! These tests drive the full create/list/cancel flow against the in-memory
//! repository, plus failure and concurrency behaviour.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain::{
    ConsignmentId, ConsignmentIdSource, CreateOrderInput, FeePolicy, Fees, ListOrders,
    OrderError, OrderPolicies, OrderService, OrderStatus, generate_consignment_id,
};
use order_store::{
    InMemoryOrderRepository, NewOrder, Order, OrderPage, OrderQuery, OrderRepository, StoreError,
};

/// Helper to create a test order service
fn create_service() -> OrderService<InMemoryOrderRepository> {
    OrderService::new(InMemoryOrderRepository::new())
}

fn submission() -> CreateOrderInput {
    CreateOrderInput {
        store_id: Some(131172),
        merchant_order_id: Some("MO-2001".to_string()),
        recipient_name: Some("Sadia Islam".to_string()),
        recipient_phone: Some("01912345678".to_string()),
        recipient_address: Some("Flat 3B, Mirpur 10".to_string()),
        special_instruction: Some("Leave with guard".to_string()),
        item_quantity: Some(2),
        item_weight: Some(1.5),
        amount_to_collect: Some(2450.0),
        item_description: Some("Shoes".to_string()),
    }
}

mod order_creation {
    use super::*;

    #[tokio::test]
    async fn fees_are_fixed_and_total_is_their_sum() {
        let service = create_service();

        for _ in 0..5 {
            let created = service.create_order(submission()).await.unwrap();
            let order = service.get_order(&created.consignment_id).await.unwrap();

            assert_eq!(order.delivery_fee, 60.0);
            assert_eq!(order.cod_fee, 12.0);
            assert_eq!(order.total_fee, order.delivery_fee + order.cod_fee);
            assert_eq!(order.promo_discount, 0.0);
            assert_eq!(order.discount, 0.0);
        }
    }

    #[tokio::test]
    async fn submitted_item_details_are_kept() {
        let service = create_service();

        let created = service.create_order(submission()).await.unwrap();
        let order = service.get_order(&created.consignment_id).await.unwrap();

        assert_eq!(order.item_quantity, 2);
        assert_eq!(order.item_weight, 1.5);
        assert_eq!(order.amount_to_collect, 2450.0);
        assert_eq!(order.item_description.as_deref(), Some("Shoes"));
        assert_eq!(order.special_instruction.as_deref(), Some("Leave with guard"));
        assert_eq!(order.order_status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn missing_recipient_name_is_keyed_by_field() {
        let service = create_service();
        let input = CreateOrderInput {
            recipient_name: None,
            ..submission()
        };

        let err = service.create_order(input).await.unwrap_err();
        let OrderError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(
            errors.get("recipient_name").unwrap(),
            ["The recipient_name field is required."]
        );
    }

    #[tokio::test]
    async fn consignment_ids_are_unique_across_creations() {
        let service = create_service();
        let mut ids = std::collections::HashSet::new();

        for _ in 0..200 {
            let created = service.create_order(submission()).await.unwrap();
            assert!(ids.insert(created.consignment_id));
        }
    }

    #[tokio::test]
    async fn custom_fee_policy_is_used() {
        struct PercentCod;

        impl FeePolicy for PercentCod {
            fn compute(&self, amount_to_collect: f64) -> Fees {
                Fees::new(80.0, (amount_to_collect * 0.01).round())
            }
        }

        let service = OrderService::with_policies(
            InMemoryOrderRepository::new(),
            OrderPolicies::default().with_fees(PercentCod),
        );

        let created = service.create_order(submission()).await.unwrap();
        let order = service.get_order(&created.consignment_id).await.unwrap();

        assert_eq!(created.delivery_fee, 80.0);
        assert_eq!(order.cod_fee, 25.0);
        assert_eq!(order.total_fee, 105.0);
    }
}

mod consignment_collisions {
    use super::*;

    /// Hands out queued IDs first, then random ones.
    struct QueuedIds(Mutex<VecDeque<ConsignmentId>>);

    impl QueuedIds {
        fn new(ids: &[&str]) -> Self {
            Self(Mutex::new(ids.iter().map(|id| ConsignmentId::new(*id)).collect()))
        }
    }

    impl ConsignmentIdSource for QueuedIds {
        fn next_id(&self) -> ConsignmentId {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(generate_consignment_id)
        }
    }

    #[tokio::test]
    async fn collision_regenerates_id() {
        let repo = InMemoryOrderRepository::new();
        let service = OrderService::with_policies(
            repo.clone(),
            OrderPolicies::default().with_consignment_ids(QueuedIds::new(&[
                "DA251018taken1",
                "DA251018taken1",
                "DA251018fresh1",
            ])),
        );

        service.create_order(submission()).await.unwrap();
        let second = service.create_order(submission()).await.unwrap();

        assert_eq!(second.consignment_id.as_str(), "DA251018fresh1");
        assert_eq!(repo.order_count().await, 2);
    }

    #[tokio::test]
    async fn collision_gives_up_after_bounded_attempts() {
        let repo = InMemoryOrderRepository::new();
        let service = OrderService::with_policies(
            repo.clone(),
            OrderPolicies::default().with_consignment_ids(QueuedIds::new(&[
                "DA251018taken1",
                "DA251018taken1",
                "DA251018taken1",
                "DA251018taken1",
            ])),
        );

        service.create_order(submission()).await.unwrap();
        let err = service.create_order(submission()).await.unwrap_err();

        assert!(matches!(
            err,
            OrderError::Store(StoreError::DuplicateConsignmentId(_))
        ));
        assert_eq!(repo.order_count().await, 1);
    }
}

mod order_listing {
    use super::*;

    #[tokio::test]
    async fn second_page_of_twenty_five() {
        let service = create_service();
        for _ in 0..25 {
            service.create_order(submission()).await.unwrap();
        }

        let page = service
            .list_orders(ListOrders::new().status("Pending").page(2).limit(10))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 10);
        assert_eq!(page.total_in_page, 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.per_page, 10);
    }

    #[tokio::test]
    async fn newest_orders_come_first() {
        let service = create_service();
        let mut created = Vec::new();
        for _ in 0..3 {
            created.push(service.create_order(submission()).await.unwrap().consignment_id);
        }

        let page = service.list_orders(ListOrders::new()).await.unwrap();
        let listed: Vec<ConsignmentId> = page
            .data
            .into_iter()
            .map(|o| o.order_consignment_id)
            .collect();

        created.reverse();
        assert_eq!(listed, created);
    }

    #[tokio::test]
    async fn status_filter_ignores_case() {
        let service = create_service();
        let keep = service.create_order(submission()).await.unwrap();
        let gone = service.create_order(submission()).await.unwrap();
        service
            .cancel_order(gone.consignment_id.as_str())
            .await
            .unwrap();

        let pending = service
            .list_orders(ListOrders::new().status("pending"))
            .await
            .unwrap();
        assert_eq!(pending.total, 1);
        assert_eq!(pending.data[0].order_consignment_id, keep.consignment_id);
        assert_eq!(pending.data[0].order_status, OrderStatus::Pending);

        let cancelled = service
            .list_orders(ListOrders::new().status("cAnCeLlEd"))
            .await
            .unwrap();
        assert_eq!(cancelled.total, 1);
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let service = create_service();

        let page = service
            .list_orders(ListOrders::new().status("Delivered").page(4))
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.last_page, 0);
        assert_eq!(page.current_page, 4);
    }

    #[tokio::test]
    async fn far_page_is_empty_not_an_error() {
        let service = create_service();
        for _ in 0..3 {
            service.create_order(submission()).await.unwrap();
        }

        let page = service
            .list_orders(ListOrders::new().page(i64::MAX).limit(10))
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.current_page, i64::MAX as u64);
        assert_eq!(page.last_page, 1);
    }

    #[tokio::test]
    async fn unknown_status_matches_nothing() {
        let service = create_service();
        service.create_order(submission()).await.unwrap();

        let page = service
            .list_orders(ListOrders::new().status("Shipped"))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn invalid_page_and_limit_are_clamped() {
        let service = create_service();
        for _ in 0..3 {
            service.create_order(submission()).await.unwrap();
        }

        let page = service
            .list_orders(ListOrders::new().page(-2).limit(0))
            .await
            .unwrap();

        assert_eq!(page.current_page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.last_page, 3);
    }
}

mod order_cancellation {
    use super::*;

    #[tokio::test]
    async fn pending_cancels_once() {
        let service = create_service();
        let created = service.create_order(submission()).await.unwrap();
        let cid = created.consignment_id.as_str();

        let order = service.cancel_order(cid).await.unwrap();
        assert_eq!(order.order_status, OrderStatus::Cancelled);

        for _ in 0..3 {
            let err = service.cancel_order(cid).await.unwrap_err();
            assert!(matches!(err, OrderError::AlreadyCancelled(_)));
        }
    }

    #[tokio::test]
    async fn delivered_requires_manual_intervention() {
        let service = create_service();
        let created = service.create_order(submission()).await.unwrap();
        service
            .repository()
            .update_status(
                &created.consignment_id,
                OrderStatus::Pending,
                OrderStatus::Delivered,
            )
            .await
            .unwrap()
            .unwrap();

        let err = service
            .cancel_order(created.consignment_id.as_str())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::RequiresManualIntervention {
                status: OrderStatus::Delivered,
                ..
            }
        ));

        let order = service.get_order(&created.consignment_id).await.unwrap();
        assert_eq!(order.order_status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn concurrent_cancels_have_one_winner() {
        let service = Arc::new(create_service());
        let created = service.create_order(submission()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = service.clone();
            let cid = created.consignment_id.clone();
            handles.push(tokio::spawn(async move {
                service.cancel_order(cid.as_str()).await
            }));
        }

        let mut succeeded = 0;
        let mut already_cancelled = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(OrderError::AlreadyCancelled(_)) => already_cancelled += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(already_cancelled, 9);
    }
}

mod persistence_failures {
    use super::*;

    /// Repository whose every call fails as if the database were unreachable.
    struct UnavailableRepository;

    #[async_trait]
    impl OrderRepository for UnavailableRepository {
        async fn insert(&self, _order: NewOrder) -> order_store::Result<Order> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn find_by_id(&self, _id: i64) -> order_store::Result<Option<Order>> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn find_by_consignment_id(
            &self,
            _consignment_id: &ConsignmentId,
        ) -> order_store::Result<Option<Order>> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn list(&self, _query: OrderQuery) -> order_store::Result<OrderPage> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn update_status(
            &self,
            _consignment_id: &ConsignmentId,
            _expected: OrderStatus,
            _next: OrderStatus,
        ) -> order_store::Result<Option<Order>> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn create_surfaces_store_error() {
        let service = OrderService::new(UnavailableRepository);
        let err = service.create_order(submission()).await.unwrap_err();
        assert!(matches!(err, OrderError::Store(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn validation_runs_before_persistence() {
        let service = OrderService::new(UnavailableRepository);
        let input = CreateOrderInput {
            recipient_phone: Some("01712-345678".to_string()),
            ..submission()
        };
        let err = service.create_order(input).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[tokio::test]
    async fn list_and_cancel_surface_store_error() {
        let service = OrderService::new(UnavailableRepository);

        let err = service.list_orders(ListOrders::new()).await.unwrap_err();
        assert!(matches!(err, OrderError::Store(_)));

        let err = service.cancel_order("DA251018abcdef").await.unwrap_err();
        assert!(matches!(err, OrderError::Store(_)));
    }
}
