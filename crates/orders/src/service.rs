//! Order service.

use std::sync::Arc;

use thiserror::Error;

use user_order_core::{
    NewOrder, Order, OrderRepository, Page, PageRequest, RepoError, UpdateOutcome,
};

const MAX_PRODUCT_NAME_LEN: usize = 255;

/// Creation input. The owner is *not* part of this struct: it always comes
/// from the authenticated identity, never from the request body.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Selective update input: absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub product_name: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<f64>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrderServiceError {
    #[error("{0}")]
    InvalidInput(String),

    /// Uniform "not found or not owned" answer.
    #[error("order not found")]
    NotFound,

    #[error("database error: {0}")]
    Db(String),
}

impl From<RepoError> for OrderServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound | RepoError::NoRowsAffected => Self::NotFound,
            RepoError::UniqueViolation(msg) | RepoError::Db(msg) => Self::Db(msg),
        }
    }
}

/// Business rules for orders, over any [`OrderRepository`].
#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// Create an order owned by `owner_id` (the authenticated caller).
    pub async fn create(
        &self,
        owner_id: u32,
        input: CreateOrder,
    ) -> Result<Order, OrderServiceError> {
        if owner_id == 0 {
            return Err(OrderServiceError::InvalidInput(
                "owner id must be positive".to_string(),
            ));
        }
        let product_name = validate_product_name(&input.product_name)?;
        validate_quantity(input.quantity)?;
        validate_price(input.price)?;

        let order = self
            .repo
            .create(NewOrder {
                user_id: owner_id,
                product_name,
                quantity: input.quantity,
                price: input.price,
            })
            .await?;

        tracing::info!(order_id = order.id, user_id = owner_id, "order created");
        Ok(order)
    }

    pub async fn get_by_id(
        &self,
        order_id: u32,
        owner_id: u32,
    ) -> Result<Order, OrderServiceError> {
        if order_id == 0 || owner_id == 0 {
            return Err(OrderServiceError::NotFound);
        }
        Ok(self.repo.get_by_id(order_id, owner_id).await?)
    }

    /// Orders of one owner, paginated. Returns the page plus the owner's
    /// total order count.
    pub async fn list_by_user(
        &self,
        owner_id: u32,
        page: PageRequest,
    ) -> Result<Page<Order>, OrderServiceError> {
        if owner_id == 0 {
            return Err(OrderServiceError::NotFound);
        }
        Ok(self
            .repo
            .list_by_user(owner_id, page.offset(), page.limit())
            .await?)
    }

    /// Apply each provided, strictly-different field; validate before
    /// comparing so an invalid value fails even when it matches storage.
    pub async fn update(
        &self,
        order_id: u32,
        owner_id: u32,
        patch: OrderPatch,
    ) -> Result<UpdateOutcome<Order>, OrderServiceError> {
        let mut order = self.get_by_id(order_id, owner_id).await?;
        let mut changed = false;

        if let Some(product_name) = patch.product_name {
            let product_name = validate_product_name(&product_name)?;
            if product_name != order.product_name {
                order.product_name = product_name;
                changed = true;
            }
        }

        if let Some(quantity) = patch.quantity {
            validate_quantity(quantity)?;
            if quantity != order.quantity {
                order.quantity = quantity;
                changed = true;
            }
        }

        if let Some(price) = patch.price {
            validate_price(price)?;
            if price != order.price {
                order.price = price;
                changed = true;
            }
        }

        if !changed {
            return Ok(UpdateOutcome::NoChange(order));
        }

        // A concurrent delete between fetch and save shows up as zero rows
        // affected; report it as the uniform not-found.
        self.repo.update(&order).await?;

        Ok(UpdateOutcome::Applied(order))
    }

    pub async fn delete(&self, order_id: u32, owner_id: u32) -> Result<(), OrderServiceError> {
        if order_id == 0 || owner_id == 0 {
            return Err(OrderServiceError::NotFound);
        }
        Ok(self.repo.delete(order_id, owner_id).await?)
    }
}

fn validate_product_name(name: &str) -> Result<String, OrderServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OrderServiceError::InvalidInput(
            "product_name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_PRODUCT_NAME_LEN {
        return Err(OrderServiceError::InvalidInput(format!(
            "product_name must be at most {MAX_PRODUCT_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_quantity(quantity: u32) -> Result<(), OrderServiceError> {
    if quantity == 0 {
        return Err(OrderServiceError::InvalidInput(
            "quantity must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), OrderServiceError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(OrderServiceError::InvalidInput(
            "price must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_order_infra::memory::InMemoryStore;

    fn service(store: &Arc<InMemoryStore>) -> OrderService {
        OrderService::new(store.clone() as Arc<dyn OrderRepository>)
    }

    fn book() -> CreateOrder {
        CreateOrder {
            product_name: "Book".to_string(),
            quantity: 2,
            price: 9.50,
        }
    }

    #[tokio::test]
    async fn create_sets_owner_from_identity() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        let order = svc.create(1, book()).await.unwrap();
        assert_eq!(order.id, 1);
        assert_eq!(order.user_id, 1);
        assert_eq!(order.quantity, 2);
        assert_eq!(order.price, 9.50);
    }

    #[tokio::test]
    async fn create_validates_input() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        let cases = [
            CreateOrder { product_name: "   ".to_string(), ..book() },
            CreateOrder { quantity: 0, ..book() },
            CreateOrder { price: 0.0, ..book() },
            CreateOrder { price: -1.0, ..book() },
            CreateOrder { price: f64::NAN, ..book() },
        ];
        for case in cases {
            assert!(matches!(
                svc.create(1, case).await,
                Err(OrderServiceError::InvalidInput(_))
            ));
        }
        assert!(matches!(
            svc.create(0, book()).await,
            Err(OrderServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn other_owner_cannot_see_the_order() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let order = svc.create(1, book()).await.unwrap();

        assert_eq!(
            svc.get_by_id(order.id, 2).await.unwrap_err(),
            OrderServiceError::NotFound
        );
        assert_eq!(
            svc.delete(order.id, 2).await.unwrap_err(),
            OrderServiceError::NotFound
        );
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let order = svc.create(1, book()).await.unwrap();

        let outcome = svc
            .update(
                order.id,
                1,
                OrderPatch {
                    quantity: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = match outcome {
            UpdateOutcome::Applied(o) => o,
            other => panic!("expected Applied, got {other:?}"),
        };
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.product_name, "Book");
        assert_eq!(updated.price, 9.50);
    }

    #[tokio::test]
    async fn noop_update_is_advisory() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let order = svc.create(1, book()).await.unwrap();

        let outcome = svc.update(order.id, 1, OrderPatch::default()).await.unwrap();
        assert!(matches!(outcome, UpdateOutcome::NoChange(_)));

        // Equal-to-storage values count as no-op too.
        let outcome = svc
            .update(
                order.id,
                1,
                OrderPatch {
                    product_name: Some("Book".to_string()),
                    quantity: Some(2),
                    price: Some(9.50),
                },
            )
            .await
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::NoChange(_)));
    }

    #[tokio::test]
    async fn invalid_patch_value_fails_even_if_unchanged() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let order = svc.create(1, book()).await.unwrap();

        assert!(matches!(
            svc.update(order.id, 1, OrderPatch { quantity: Some(0), ..Default::default() })
                .await,
            Err(OrderServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn delete_is_idempotent_only_in_status() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let order = svc.create(1, book()).await.unwrap();

        svc.delete(order.id, 1).await.unwrap();
        assert_eq!(
            svc.delete(order.id, 1).await.unwrap_err(),
            OrderServiceError::NotFound
        );
    }

    #[tokio::test]
    async fn list_paginates_with_owner_total() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        for i in 0..15 {
            svc.create(
                1,
                CreateOrder {
                    product_name: format!("Item {i}"),
                    quantity: 1,
                    price: 1.0,
                },
            )
            .await
            .unwrap();
        }
        // Someone else's order must not leak into the count.
        svc.create(2, book()).await.unwrap();

        let page = svc
            .list_by_user(1, PageRequest::clamped(2, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 15);
        assert_eq!(page.items.len(), 5);
        assert!(page.items.iter().all(|o| o.user_id == 1));
    }
}
