//! Postgres user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use user_order_core::{
    NewUser, Page, PageRequest, RepoError, RepoResult, User, UserFilter, UserRepository,
};

use super::{to_u32, translate};

const SELECT_COLUMNS: &str =
    "id, name, email, age, password_hash, created_at, updated_at, deleted_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    age: i32,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_domain(self) -> RepoResult<User> {
        Ok(User {
            id: to_u32(self.id, "user id")?,
            name: self.name,
            email: self.email,
            age: to_u32(self.age, "age")?,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (name, email, age, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age as i32)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(translate)?;

        row.into_domain()
    }

    async fn get_by_id(&self, id: u32) -> RepoResult<User> {
        if id == 0 {
            return Err(RepoError::NotFound);
        }

        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(translate)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<User> {
        if email.is_empty() {
            return Err(RepoError::NotFound);
        }

        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM users \
             WHERE lower(email) = lower($1) AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(translate)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, age = $4, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user.id as i32)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age as i32)
        .execute(&self.pool)
        .await
        .map_err(translate)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NoRowsAffected);
        }
        Ok(())
    }

    async fn delete(&self, id: u32) -> RepoResult<()> {
        if id == 0 {
            return Err(RepoError::NotFound);
        }

        // Soft-delete the user and their orders atomically.
        let mut tx = self.pool.begin().await.map_err(translate)?;

        let result = sqlx::query(
            "UPDATE users SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id as i32)
        .execute(&mut *tx)
        .await
        .map_err(translate)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        sqlx::query(
            "UPDATE orders SET deleted_at = now(), updated_at = now() \
             WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(id as i32)
        .execute(&mut *tx)
        .await
        .map_err(translate)?;

        tx.commit().await.map_err(translate)
    }

    async fn list(&self, page: PageRequest, filter: &UserFilter) -> RepoResult<Page<User>> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(translate)?
            .try_get(0)
            .map_err(translate)?;

        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {SELECT_COLUMNS} FROM users"));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY id");
        qb.push(" LIMIT ").push_bind(page.limit() as i64);
        qb.push(" OFFSET ").push_bind(page.offset() as i64);

        let rows: Vec<UserRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(translate)?;

        let items = rows
            .into_iter()
            .map(UserRow::into_domain)
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Page {
            items,
            total: total.max(0) as u64,
        })
    }
}

/// WHERE clause shared by the count and page queries. Filters AND together;
/// the name match is a case-insensitive substring (`ILIKE %...%`).
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE deleted_at IS NULL");
    if let Some(min_age) = filter.min_age {
        qb.push(" AND age >= ").push_bind(min_age as i32);
    }
    if let Some(max_age) = filter.max_age {
        qb.push(" AND age <= ").push_bind(max_age as i32);
    }
    if let Some(name) = &filter.name {
        qb.push(" AND name ILIKE ")
            .push_bind(format!("%{}%", escape_like(name)));
    }
}

/// Escape LIKE wildcards so a literal `%` or `_` in the filter matches itself.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_escaping_covers_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
