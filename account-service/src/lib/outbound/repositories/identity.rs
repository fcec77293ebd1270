use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::CredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn identity_from_row(row: &PgRow) -> Result<Identity, AuthError> {
        Ok(Identity {
            id: IdentityId(row.try_get::<Uuid, _>("id").map_err(db_error)?),
            email: EmailAddress::new(row.try_get::<String, _>("email").map_err(db_error)?)?,
            password_hash: row.try_get("password_hash").map_err(db_error)?,
            full_name: row.try_get("full_name").map_err(db_error)?,
            organization: row.try_get("organization").map_err(db_error)?,
            role: row.try_get("role").map_err(db_error)?,
            experience: row.try_get("experience").map_err(db_error)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_error)?,
        })
    }
}

fn db_error(e: sqlx::Error) -> AuthError {
    AuthError::DatabaseError(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AuthError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM identities WHERE email = $1)")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, full_name, organization, role, experience, created_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref().map(Self::identity_from_row).transpose()
    }

    async fn save(&self, identity: Identity) -> Result<Identity, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO identities
                (id, email, password_hash, full_name, organization, role, experience, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                password_hash = EXCLUDED.password_hash,
                full_name = EXCLUDED.full_name,
                organization = EXCLUDED.organization,
                role = EXCLUDED.role,
                experience = EXCLUDED.experience
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(&identity.full_name)
        .bind(&identity.organization)
        .bind(&identity.role)
        .bind(&identity.experience)
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AuthError::AlreadyRegistered(identity.email.to_string());
                }
            }
            db_error(e)
        })?;

        Ok(identity)
    }
}
