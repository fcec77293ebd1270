use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::identity::models::EmailAddress;
use crate::domain::otp::errors::OtpError;
use crate::domain::otp::models::OtpCode;
use crate::domain::otp::models::OtpId;
use crate::domain::otp::models::OtpRecord;
use crate::domain::otp::ports::OtpStore;

pub struct PostgresOtpStore {
    pool: PgPool,
}

impl PostgresOtpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn record_from_row(row: &PgRow) -> Result<OtpRecord, OtpError> {
        Ok(OtpRecord {
            id: OtpId(row.try_get::<Uuid, _>("id").map_err(db_error)?),
            email: EmailAddress::new(row.try_get::<String, _>("email").map_err(db_error)?)?,
            code: OtpCode::new(row.try_get::<String, _>("code").map_err(db_error)?)?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(db_error)?,
            verified: row.try_get("verified").map_err(db_error)?,
        })
    }
}

fn db_error(e: sqlx::Error) -> OtpError {
    OtpError::DatabaseError(e.to_string())
}

#[async_trait]
impl OtpStore for PostgresOtpStore {
    async fn save(&self, record: OtpRecord) -> Result<OtpRecord, OtpError> {
        sqlx::query(
            r#"
            INSERT INTO otp_verifications (id, email, code, expires_at, verified)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET verified = EXCLUDED.verified
            "#,
        )
        .bind(record.id.0)
        .bind(record.email.as_str())
        .bind(record.code.as_str())
        .bind(record.expires_at)
        .bind(record.verified)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(record)
    }

    async fn find_by_email_and_code_unverified(
        &self,
        email: &EmailAddress,
        code: &OtpCode,
    ) -> Result<Option<OtpRecord>, OtpError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, code, expires_at, verified
            FROM otp_verifications
            WHERE email = $1 AND code = $2 AND verified = FALSE
            LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn find_latest_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<OtpRecord>, OtpError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, code, expires_at, verified
            FROM otp_verifications
            WHERE email = $1
            ORDER BY expires_at DESC
            LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref().map(Self::record_from_row).transpose()
    }
}
