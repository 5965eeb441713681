//! # Order Creation Service
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create_order(customer, cups)                         │
//! │                                                                         │
//! │  1. Validate ─────────── customer missing?  → Err(Required)             │
//! │                          cups < 1?          → Err(OutOfRange)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Stock count ──────── cups > in_stock?   → Ok(StockExceeded)         │
//! │       │                                       (nothing changed)         │
//! │       ▼                                                                 │
//! │  3. Discount ─────────── membership × cups                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. Allocate cups ────── CoffeeCupRepository                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. Save order ───────── OrderRepository     (failure → release cups)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  6. Ok(Success { persisted order, in_stock - cups })                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::OrderResult;
use crate::repository::{CoffeeCupRepository, OrderRepository};
use cup_core::validation::validate_order_request;
use cup_core::{
    calculate_discount_percentage, Customer, CustomerMembership, DiscountPercent, Order,
    OrderCreationResult, ValidationError,
};

/// Parameter name reported when the order store is missing.
pub const ORDER_REPOSITORY_FIELD: &str = "order_repository";

/// Parameter name reported when the cup stock is missing.
pub const COFFEE_CUP_REPOSITORY_FIELD: &str = "coffee_cup_repository";

/// Creates orders against an order store and a cup stock.
///
/// Cheap to clone; the collaborators are shared.
#[derive(Clone)]
pub struct OrderCreationService {
    order_repository: Arc<dyn OrderRepository>,
    coffee_cup_repository: Arc<dyn CoffeeCupRepository>,
}

impl OrderCreationService {
    /// Creates a service from both collaborators.
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        coffee_cup_repository: Arc<dyn CoffeeCupRepository>,
    ) -> Self {
        OrderCreationService {
            order_repository,
            coffee_cup_repository,
        }
    }

    /// Starts a builder, for wiring where a collaborator may be missing.
    ///
    /// ## Example
    /// ```rust
    /// use cup_order::OrderCreationService;
    ///
    /// let err = OrderCreationService::builder().build().unwrap_err();
    /// assert_eq!(err.field(), "order_repository");
    /// ```
    pub fn builder() -> OrderCreationServiceBuilder {
        OrderCreationServiceBuilder::default()
    }

    /// Prices an order without touching any collaborator.
    pub fn calculate_discount_percentage(
        membership: CustomerMembership,
        number_of_ordered_cups: i64,
    ) -> DiscountPercent {
        calculate_discount_percentage(membership, number_of_ordered_cups)
    }

    /// Creates an order for `customer`.
    ///
    /// ## Returns
    /// * `Ok(Success)` - order persisted, carries the store's copy
    /// * `Ok(StockExceeded)` - not enough cups; nothing allocated or saved
    /// * `Err(Validation)` - missing customer or fewer than one cup
    /// * `Err(Repository)` - a collaborator failed; its error is passed through
    pub async fn create_order(
        &self,
        customer: Option<&Customer>,
        number_of_ordered_cups: i64,
    ) -> OrderResult<OrderCreationResult> {
        let customer = validate_order_request(customer, number_of_ordered_cups)?;

        debug!(
            customer_id = customer.id,
            membership = %customer.membership,
            requested = number_of_ordered_cups,
            "Creating order"
        );

        let cups_in_stock = self
            .coffee_cup_repository
            .get_coffee_cups_in_stock_count()
            .await?;

        if number_of_ordered_cups > cups_in_stock {
            info!(
                customer_id = customer.id,
                requested = number_of_ordered_cups,
                in_stock = cups_in_stock,
                "Order rejected, stock exceeded"
            );
            return Ok(OrderCreationResult::stock_exceeded(cups_in_stock));
        }

        let discount = calculate_discount_percentage(customer.membership, number_of_ordered_cups);

        let coffee_cups = self
            .coffee_cup_repository
            .get_coffee_cups_in_stock(number_of_ordered_cups)
            .await?;

        let order = Order::new(customer.id, number_of_ordered_cups, discount, coffee_cups);
        let created_order = self.save_or_release(order).await?;

        let remaining_cups_in_stock = cups_in_stock - number_of_ordered_cups;

        info!(
            order_id = ?created_order.id,
            customer_id = customer.id,
            cups = number_of_ordered_cups,
            discount = %discount,
            remaining = remaining_cups_in_stock,
            "Order created"
        );

        Ok(OrderCreationResult::success(
            created_order,
            remaining_cups_in_stock,
        ))
    }

    /// Saves the order. On failure the allocated cups go back to stock and
    /// the store's error is returned as-is.
    async fn save_or_release(&self, order: Order) -> OrderResult<Order> {
        let allocated = order.coffee_cups.clone();

        match self.order_repository.save(order).await {
            Ok(saved) => Ok(saved),
            Err(save_err) => {
                warn!(
                    error = %save_err,
                    cups = allocated.len(),
                    "Saving order failed, releasing allocated cups"
                );

                if let Err(release_err) = self
                    .coffee_cup_repository
                    .release_coffee_cups(&allocated)
                    .await
                {
                    error!(
                        error = %release_err,
                        cups = allocated.len(),
                        "Releasing cups failed, stock count is now short"
                    );
                }

                Err(save_err.into())
            }
        }
    }
}

impl fmt::Debug for OrderCreationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderCreationService").finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder that reports which collaborator is missing.
#[derive(Default)]
pub struct OrderCreationServiceBuilder {
    order_repository: Option<Arc<dyn OrderRepository>>,
    coffee_cup_repository: Option<Arc<dyn CoffeeCupRepository>>,
}

impl OrderCreationServiceBuilder {
    /// Sets the order store.
    pub fn order_repository(mut self, repository: Arc<dyn OrderRepository>) -> Self {
        self.order_repository = Some(repository);
        self
    }

    /// Sets the cup stock.
    pub fn coffee_cup_repository(mut self, repository: Arc<dyn CoffeeCupRepository>) -> Self {
        self.coffee_cup_repository = Some(repository);
        self
    }

    /// Builds the service.
    ///
    /// ## Errors
    /// `ValidationError::Required` naming `order_repository` or
    /// `coffee_cup_repository`, checked in that order.
    pub fn build(self) -> Result<OrderCreationService, ValidationError> {
        let order_repository = self
            .order_repository
            .ok_or_else(|| ValidationError::required(ORDER_REPOSITORY_FIELD))?;
        let coffee_cup_repository = self
            .coffee_cup_repository
            .ok_or_else(|| ValidationError::required(COFFEE_CUP_REPOSITORY_FIELD))?;

        Ok(OrderCreationService::new(
            order_repository,
            coffee_cup_repository,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderError;
    use crate::memory::{InMemoryCoffeeCupRepository, InMemoryOrderRepository, MemoryStockError};
    use crate::repository::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use cup_core::{CoffeeCup, OrderCreationResultCode};

    const CUPS_IN_STOCK: u32 = 10;

    struct Fixture {
        service: OrderCreationService,
        orders: Arc<InMemoryOrderRepository>,
        cups: Arc<InMemoryCoffeeCupRepository>,
    }

    fn fixture() -> Fixture {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let cups = Arc::new(InMemoryCoffeeCupRepository::with_stock(CUPS_IN_STOCK));
        let service = OrderCreationService::new(orders.clone(), cups.clone());
        Fixture {
            service,
            orders,
            cups,
        }
    }

    fn basic(id: i64) -> Customer {
        Customer::new(id, CustomerMembership::Basic)
    }

    /// Order store that refuses every save.
    #[derive(Debug, thiserror::Error)]
    #[error("order store offline")]
    struct StoreOffline;

    struct OfflineOrderRepository;

    #[async_trait]
    impl OrderRepository for OfflineOrderRepository {
        async fn save(&self, _order: Order) -> RepositoryResult<Order> {
            Err(RepositoryError::new(StoreOffline))
        }
    }

    /// Order store that stamps its own id, like a server-side sequence.
    struct StampingOrderRepository;

    #[async_trait]
    impl OrderRepository for StampingOrderRepository {
        async fn save(&self, mut order: Order) -> RepositoryResult<Order> {
            order.id = Some(4242);
            Ok(order)
        }
    }

    /// Collaborator that must never be reached.
    struct Untouchable;

    #[async_trait]
    impl OrderRepository for Untouchable {
        async fn save(&self, _order: Order) -> RepositoryResult<Order> {
            panic!("order store must not be called");
        }
    }

    #[async_trait]
    impl CoffeeCupRepository for Untouchable {
        async fn get_coffee_cups_in_stock_count(&self) -> RepositoryResult<i64> {
            panic!("cup stock must not be called");
        }

        async fn get_coffee_cups_in_stock(&self, _count: i64) -> RepositoryResult<Vec<CoffeeCup>> {
            panic!("cup stock must not be called");
        }

        async fn release_coffee_cups(&self, _cups: &[CoffeeCup]) -> RepositoryResult<()> {
            panic!("cup stock must not be called");
        }
    }

    /// Cup stock whose count query fails.
    #[derive(Debug, thiserror::Error)]
    #[error("stock ledger unreachable")]
    struct LedgerUnreachable;

    struct BrokenStock;

    #[async_trait]
    impl CoffeeCupRepository for BrokenStock {
        async fn get_coffee_cups_in_stock_count(&self) -> RepositoryResult<i64> {
            Err(RepositoryError::new(LedgerUnreachable))
        }

        async fn get_coffee_cups_in_stock(&self, _count: i64) -> RepositoryResult<Vec<CoffeeCup>> {
            Err(RepositoryError::new(LedgerUnreachable))
        }

        async fn release_coffee_cups(&self, _cups: &[CoffeeCup]) -> RepositoryResult<()> {
            Err(RepositoryError::new(LedgerUnreachable))
        }
    }

    fn untouchable_service() -> OrderCreationService {
        OrderCreationService::new(Arc::new(Untouchable), Arc::new(Untouchable))
    }

    // -------------------------------------------------------------------------
    // Success path
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_stores_created_order_in_result() {
        let f = fixture();
        let customer = basic(99);

        let result = f.service.create_order(Some(&customer), 1).await.unwrap();

        assert_eq!(result.result_code, OrderCreationResultCode::Success);
        let order = result.created_order.expect("order should be present");
        assert_eq!(order.customer_id, 99);
        assert_eq!(order.number_of_ordered_cups, 1);
        assert_eq!(order.coffee_cups.len(), 1);
        assert_eq!(f.orders.len().await, 1);
    }

    #[tokio::test]
    async fn test_stores_remaining_cups_in_result() {
        let f = fixture();

        let result = f.service.create_order(Some(&basic(1)), 3).await.unwrap();

        assert_eq!(result.result_code, OrderCreationResultCode::Success);
        assert_eq!(result.remaining_cups_in_stock, 7);
        assert_eq!(result.created_order.unwrap().discount.percent(), 0);
        assert_eq!(f.cups.get_coffee_cups_in_stock_count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_ordering_whole_stock_leaves_zero() {
        let f = fixture();

        let result = f
            .service
            .create_order(Some(&basic(1)), i64::from(CUPS_IN_STOCK))
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.remaining_cups_in_stock, 0);
    }

    #[tokio::test]
    async fn test_premium_bulk_order_gets_bulk_discount() {
        let f = fixture();
        let customer = Customer::new(7, CustomerMembership::Premium);

        let result = f.service.create_order(Some(&customer), 5).await.unwrap();
        let order = result.created_order.unwrap();

        assert_eq!(order.discount.percent(), 8);
        assert_eq!(order.coffee_cups.len(), 5);
        assert_eq!(result.remaining_cups_in_stock, 5);
    }

    #[tokio::test]
    async fn test_result_carries_store_copy() {
        let cups = Arc::new(InMemoryCoffeeCupRepository::with_stock(CUPS_IN_STOCK));
        let service = OrderCreationService::new(Arc::new(StampingOrderRepository), cups);

        let result = service.create_order(Some(&basic(5)), 2).await.unwrap();

        assert_eq!(result.created_order.unwrap().id, Some(4242));
    }

    #[tokio::test]
    async fn test_consecutive_orders_draw_down_stock() {
        let f = fixture();

        let first = f.service.create_order(Some(&basic(1)), 4).await.unwrap();
        let second = f.service.create_order(Some(&basic(2)), 4).await.unwrap();
        let third = f.service.create_order(Some(&basic(3)), 4).await.unwrap();

        assert_eq!(first.remaining_cups_in_stock, 6);
        assert_eq!(second.remaining_cups_in_stock, 2);
        assert_eq!(third.result_code, OrderCreationResultCode::StockExceeded);
        assert_eq!(third.remaining_cups_in_stock, 2);
        assert_eq!(f.orders.len().await, 2);
    }

    // -------------------------------------------------------------------------
    // Stock exceeded
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_returns_stock_exceeded_if_not_enough_cups() {
        let f = fixture();

        let result = f
            .service
            .create_order(Some(&basic(1)), i64::from(CUPS_IN_STOCK) + 1)
            .await
            .unwrap();

        assert_eq!(result.result_code, OrderCreationResultCode::StockExceeded);
        assert_eq!(result.remaining_cups_in_stock, 10);
        assert!(result.created_order.is_none());

        // Side-effect free
        assert_eq!(f.cups.get_coffee_cups_in_stock_count().await.unwrap(), 10);
        assert!(f.orders.is_empty().await);
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_rejects_fewer_than_one_cup() {
        let service = untouchable_service();

        for cups in [0, -1, -100] {
            let err = service.create_order(Some(&basic(1)), cups).await.unwrap_err();
            let validation = err.as_validation().expect("validation error");
            assert!(validation.is_out_of_range());
            assert_eq!(validation.field(), "number_of_ordered_cups");
        }
    }

    #[tokio::test]
    async fn test_rejects_missing_customer() {
        let service = untouchable_service();

        for cups in [1, 0, 50] {
            let err = service.create_order(None, cups).await.unwrap_err();
            let validation = err.as_validation().expect("validation error");
            assert!(validation.is_invalid_argument());
            assert_eq!(validation.field(), "customer");
        }
    }

    // -------------------------------------------------------------------------
    // Collaborator failures
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_save_failure_propagates_and_releases_cups() {
        let cups = Arc::new(InMemoryCoffeeCupRepository::with_stock(CUPS_IN_STOCK));
        let service = OrderCreationService::new(Arc::new(OfflineOrderRepository), cups.clone());

        let err = service.create_order(Some(&basic(1)), 3).await.unwrap_err();

        let repo_err = err.as_repository().expect("repository error");
        assert!(repo_err.downcast_ref::<StoreOffline>().is_some());
        assert_eq!(err.to_string(), "order store offline");
        assert_eq!(cups.get_coffee_cups_in_stock_count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_save_error_wins_over_release_error() {
        let service =
            OrderCreationService::new(Arc::new(OfflineOrderRepository), Arc::new(FlakyStock));

        let err = service.create_order(Some(&basic(1)), 1).await.unwrap_err();

        assert!(matches!(err, OrderError::Repository(_)));
        assert!(err
            .as_repository()
            .and_then(|e| e.downcast_ref::<StoreOffline>())
            .is_some());
    }

    /// Stock that allocates fine but cannot take cups back.
    struct FlakyStock;

    #[async_trait]
    impl CoffeeCupRepository for FlakyStock {
        async fn get_coffee_cups_in_stock_count(&self) -> RepositoryResult<i64> {
            Ok(5)
        }

        async fn get_coffee_cups_in_stock(&self, count: i64) -> RepositoryResult<Vec<CoffeeCup>> {
            Ok((1..=count).map(CoffeeCup::new).collect())
        }

        async fn release_coffee_cups(&self, _cups: &[CoffeeCup]) -> RepositoryResult<()> {
            Err(RepositoryError::new(LedgerUnreachable))
        }
    }

    #[tokio::test]
    async fn test_stock_failure_propagates_unchanged() {
        let service = OrderCreationService::new(Arc::new(Untouchable), Arc::new(BrokenStock));

        let err = service.create_order(Some(&basic(1)), 1).await.unwrap_err();

        assert!(err
            .as_repository()
            .and_then(|e| e.downcast_ref::<LedgerUnreachable>())
            .is_some());
    }

    /// Stock whose last cup is taken between the count and the allocation.
    struct RacedStock;

    #[async_trait]
    impl CoffeeCupRepository for RacedStock {
        async fn get_coffee_cups_in_stock_count(&self) -> RepositoryResult<i64> {
            Ok(1)
        }

        async fn get_coffee_cups_in_stock(&self, count: i64) -> RepositoryResult<Vec<CoffeeCup>> {
            Err(RepositoryError::new(MemoryStockError::InsufficientStock {
                requested: count,
                available: 0,
            }))
        }

        async fn release_coffee_cups(&self, _cups: &[CoffeeCup]) -> RepositoryResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_losing_a_stock_race_is_a_repository_error() {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let service = OrderCreationService::new(orders.clone(), Arc::new(RacedStock));

        let err = service.create_order(Some(&basic(1)), 1).await.unwrap_err();

        assert!(matches!(
            err.as_repository()
                .and_then(|e| e.downcast_ref::<MemoryStockError>()),
            Some(MemoryStockError::InsufficientStock {
                requested: 1,
                available: 0
            })
        ));
        assert!(matches!(err, OrderError::Repository(_)));
        assert!(orders.is_empty().await);
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    #[test]
    fn test_builder_requires_order_repository() {
        let err = OrderCreationService::builder()
            .coffee_cup_repository(Arc::new(InMemoryCoffeeCupRepository::new()))
            .build()
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(err.field(), "order_repository");
    }

    #[test]
    fn test_builder_requires_coffee_cup_repository() {
        let err = OrderCreationService::builder()
            .order_repository(Arc::new(InMemoryOrderRepository::new()))
            .build()
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(err.field(), "coffee_cup_repository");
    }

    #[tokio::test]
    async fn test_builder_with_both_collaborators() {
        let service = OrderCreationService::builder()
            .order_repository(Arc::new(InMemoryOrderRepository::new()))
            .coffee_cup_repository(Arc::new(InMemoryCoffeeCupRepository::with_stock(2)))
            .build()
            .unwrap();

        let result = service.create_order(Some(&basic(1)), 2).await.unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_calculate_discount_percentage_delegates() {
        let cases = [
            (3, 5, CustomerMembership::Basic),
            (0, 4, CustomerMembership::Basic),
            (0, 1, CustomerMembership::Basic),
            (8, 5, CustomerMembership::Premium),
            (5, 4, CustomerMembership::Premium),
            (5, 1, CustomerMembership::Premium),
        ];

        for (expected, cups, membership) in cases {
            assert_eq!(
                OrderCreationService::calculate_discount_percentage(membership, cups).percent(),
                expected
            );
        }
    }
}
