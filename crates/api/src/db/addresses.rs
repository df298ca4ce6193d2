//! `PostgreSQL` address repository.
//!
//! Every statement filters on both the address ID and the owning user ID, so
//! a caller can never read or modify another user's address. Each operation is
//! a single statement; no transactions are needed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sweet_home_core::{Address, AddressId, AddressPatch, NewAddress, UserId};

use super::{AddressStore, RepositoryError};

const ADDRESS_COLUMNS: &str = "id, user_id, name, phone, street, city, state, zipcode, country, \
                               label, is_default, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    user_id: UserId,
    name: String,
    phone: String,
    street: String,
    city: String,
    state: String,
    zipcode: String,
    country: String,
    label: String,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(r: AddressRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            phone: r.phone,
            street: r.street,
            city: r.city,
            state: r.state,
            zipcode: r.zipcode,
            country: r.country,
            label: r.label,
            is_default: r.is_default,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Address repository backed by the `sweet_home.address` table.
#[derive(Clone)]
pub struct PgAddressStore {
    pool: PgPool,
}

impl PgAddressStore {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressStore for PgAddressStore {
    async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            SELECT {ADDRESS_COLUMNS}
            FROM sweet_home.address
            WHERE user_id = $1
            ORDER BY is_default DESC, created_at DESC
            "
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    async fn create(&self, user_id: UserId, input: NewAddress) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            INSERT INTO sweet_home.address
                (id, user_id, name, phone, street, city, state, zipcode, country, label, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(AddressId::generate())
        .bind(user_id)
        .bind(input.name)
        .bind(input.phone)
        .bind(input.street)
        .bind(input.city)
        .bind(input.state)
        .bind(input.zipcode)
        .bind(input.country)
        .bind(input.label)
        .bind(input.is_default)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("address already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    async fn update(
        &self,
        user_id: UserId,
        id: AddressId,
        patch: AddressPatch,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            UPDATE sweet_home.address
            SET name = COALESCE($3, name),
                phone = COALESCE($4, phone),
                street = COALESCE($5, street),
                city = COALESCE($6, city),
                state = COALESCE($7, state),
                zipcode = COALESCE($8, zipcode),
                country = COALESCE($9, country),
                label = COALESCE($10, label),
                is_default = COALESCE($11, is_default),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(id)
        .bind(user_id)
        .bind(patch.name)
        .bind(patch.phone)
        .bind(patch.street)
        .bind(patch.city)
        .bind(patch.state)
        .bind(patch.zipcode)
        .bind(patch.country)
        .bind(patch.label)
        .bind(patch.is_default)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Address::from).ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, user_id: UserId, id: AddressId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM sweet_home.address
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_default(
        &self,
        user_id: UserId,
        id: AddressId,
    ) -> Result<Address, RepositoryError> {
        // Other addresses of the user keep their flag.
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            UPDATE sweet_home.address
            SET is_default = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Address::from).ok_or(RepositoryError::NotFound)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
