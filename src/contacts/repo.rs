use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;

use super::dto::CreateContact;
use super::repo_types::{Contact, ContactStatus};

const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, status, \
                               user_id, user_email, user_name, created_at, updated_at";

impl Contact {
    pub async fn create(
        db: &PgPool,
        payload: &CreateContact,
        caller: Option<&User>,
    ) -> anyhow::Result<Contact> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "INSERT INTO contacts (name, email, phone, subject, message, user_id, user_email, user_name)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.subject)
        .bind(&payload.message)
        .bind(caller.map(|u| u.id))
        .bind(caller.map(|u| u.email.as_str()))
        .bind(caller.map(|u| u.name.as_str()))
        .fetch_one(db)
        .await?;
        Ok(contact)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Contact>> {
        let rows = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_status(
        db: &PgPool,
        status: ContactStatus,
    ) -> anyhow::Result<Vec<Contact>> {
        let rows = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE status = $1 ORDER BY created_at DESC"
        ))
        .bind(status)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(contact)
    }

    pub async fn update_status(
        db: &PgPool,
        id: Uuid,
        status: ContactStatus,
    ) -> anyhow::Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "UPDATE contacts SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await?;
        Ok(contact)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
