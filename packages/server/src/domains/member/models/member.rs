use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::MemberId;
use crate::kernel::StoreError;

/// Member profile - read-only directory entry provisioned by the identity provider
///
/// The core uses it only to show who submitted a piece of feedback.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl MemberProfile {
    pub fn new(
        id: MemberId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }
}

/// Member row as stored
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Insert or refresh a directory entry (used by provisioning and fixtures)
    pub async fn upsert(profile: &MemberProfile, pool: &PgPool) -> Result<Self, StoreError> {
        let member = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO members (id, first_name, last_name, email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
               SET first_name = EXCLUDED.first_name,
                   last_name = EXCLUDED.last_name,
                   email = EXCLUDED.email
            RETURNING id, first_name, last_name, email, created_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .fetch_one(pool)
        .await?;
        Ok(member)
    }
}
