//! In-memory store implementing both repository traits.
//!
//! Backs the unit and black-box test suites; honors the full repository
//! contract including soft-delete visibility, the email uniqueness rule
//! over live rows, and the user→orders delete cascade.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use user_order_core::{
    NewOrder, NewUser, Order, OrderRepository, Page, PageRequest, RepoError, RepoResult, User,
    UserFilter, UserRepository,
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    orders: Vec<Order>,
    next_user_id: u32,
    next_order_id: u32,
}

/// Shared store; clone the `Arc` and use it as both repositories.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens if a holder panicked; the data is
        // plain-old-values, so continuing is safe.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let mut inner = self.lock();

        let taken = inner
            .users
            .iter()
            .any(|u| u.deleted_at.is_none() && u.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(RepoError::UniqueViolation(format!(
                "email {} already exists",
                user.email
            )));
        }

        inner.next_user_id += 1;
        let now = Utc::now();
        let stored = User {
            id: inner.next_user_id,
            name: user.name,
            email: user.email,
            age: user.age,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.users.push(stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: u32) -> RepoResult<User> {
        if id == 0 {
            return Err(RepoError::NotFound);
        }
        self.lock()
            .users
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<User> {
        if email.is_empty() {
            return Err(RepoError::NotFound);
        }
        self.lock()
            .users
            .iter()
            .find(|u| u.deleted_at.is_none() && u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut inner = self.lock();
        let Some(row) = inner
            .users
            .iter_mut()
            .find(|u| u.id == user.id && u.deleted_at.is_none())
        else {
            return Err(RepoError::NoRowsAffected);
        };

        row.name = user.name.clone();
        row.email = user.email.clone();
        row.age = user.age;
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: u32) -> RepoResult<()> {
        if id == 0 {
            return Err(RepoError::NotFound);
        }
        let mut inner = self.lock();
        let now = Utc::now();

        let Some(row) = inner
            .users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
        else {
            return Err(RepoError::NotFound);
        };
        row.deleted_at = Some(now);
        row.updated_at = now;

        // Cascade: the owner's orders disappear with them.
        for order in inner
            .orders
            .iter_mut()
            .filter(|o| o.user_id == id && o.deleted_at.is_none())
        {
            order.deleted_at = Some(now);
            order.updated_at = now;
        }
        Ok(())
    }

    async fn list(&self, page: PageRequest, filter: &UserFilter) -> RepoResult<Page<User>> {
        let inner = self.lock();
        let name_needle = filter.name.as_ref().map(|n| n.to_lowercase());

        let mut matches: Vec<&User> = inner
            .users
            .iter()
            .filter(|u| u.deleted_at.is_none())
            .filter(|u| filter.min_age.is_none_or(|min| u.age >= min))
            .filter(|u| filter.max_age.is_none_or(|max| u.age <= max))
            .filter(|u| {
                name_needle
                    .as_ref()
                    .is_none_or(|needle| u.name.to_lowercase().contains(needle))
            })
            .collect();
        matches.sort_by_key(|u| u.id);

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok(Page { items, total })
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(&self, order: NewOrder) -> RepoResult<Order> {
        let mut inner = self.lock();
        inner.next_order_id += 1;
        let now = Utc::now();
        let stored = Order {
            id: inner.next_order_id,
            user_id: order.user_id,
            product_name: order.product_name,
            quantity: order.quantity,
            price: order.price,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.orders.push(stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, order_id: u32, owner_id: u32) -> RepoResult<Order> {
        self.lock()
            .orders
            .iter()
            .find(|o| o.id == order_id && o.user_id == owner_id && o.deleted_at.is_none())
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn list_by_user(&self, owner_id: u32, offset: u64, limit: u32) -> RepoResult<Page<Order>> {
        let inner = self.lock();
        let mut matches: Vec<&Order> = inner
            .orders
            .iter()
            .filter(|o| o.user_id == owner_id && o.deleted_at.is_none())
            .collect();
        matches.sort_by_key(|o| o.id);

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(Page { items, total })
    }

    async fn update(&self, order: &Order) -> RepoResult<()> {
        let mut inner = self.lock();
        let Some(row) = inner.orders.iter_mut().find(|o| {
            o.id == order.id && o.user_id == order.user_id && o.deleted_at.is_none()
        }) else {
            return Err(RepoError::NoRowsAffected);
        };

        row.product_name = order.product_name.clone();
        row.quantity = order.quantity;
        row.price = order.price;
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, order_id: u32, owner_id: u32) -> RepoResult<()> {
        let mut inner = self.lock();
        let now = Utc::now();
        let Some(row) = inner.orders.iter_mut().find(|o| {
            o.id == order_id && o.user_id == owner_id && o.deleted_at.is_none()
        }) else {
            return Err(RepoError::NotFound);
        };
        row.deleted_at = Some(now);
        row.updated_at = now;
        Ok(())
    }
}
