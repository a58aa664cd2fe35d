use crate::auth::repo_types::User;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, role, is_verified, \
                            otp, otp_expires, last_login, created_at";

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create an unverified customer with a hashed password.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        phone: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, phone, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Store a fresh OTP, overwriting any outstanding one. Re-requesting a
    /// code always invalidates the previous cycle.
    pub async fn set_otp(
        db: &PgPool,
        id: Uuid,
        code: &str,
        expires: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET otp = $2, otp_expires = $3 WHERE id = $1")
            .bind(id)
            .bind(code)
            .bind(expires)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Atomically consume an OTP: clear the code, mark verified and stamp
    /// last_login in one conditional update. Returns None when the stored
    /// code no longer matches or already expired, so two concurrent submits
    /// of the same code can never both succeed.
    pub async fn consume_otp(db: &PgPool, id: Uuid, code: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET otp = NULL, otp_expires = NULL, is_verified = TRUE, last_login = now()
             WHERE id = $1 AND otp = $2 AND otp_expires > now()
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(code)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}
