use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// User record in the database. Serialized views go through
/// `UserResponse`; the hash never leaves this layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub sex: String,
    pub phone_number: Option<String>,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state_province_code: String,
    pub country_code: String,
    pub postal_code: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Insert payload for a new user; the password is already hashed and the
/// country code already normalized by the auth service.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub sex: String,
    pub phone_number: Option<String>,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state_province_code: String,
    pub country_code: String,
    pub postal_code: String,
}

/// Sparse profile patch: `None` leaves the stored column untouched.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub sex: Option<String>,
    pub phone_number: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub state_province_code: Option<String>,
    pub country_code: Option<String>,
    pub postal_code: Option<String>,
}

impl User {
    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Login identifiers may be an email or a username.
    pub async fn find_by_login(db: &PgPool, login: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE email = $1 OR username = $1
            "#,
        )
        .bind(login)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Returns the raw `sqlx::Error` so the caller can map a unique-constraint
    /// violation from a concurrent registration.
    pub async fn create(db: &PgPool, new: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                email, username, password_hash, full_name, sex, phone_number,
                address_line_1, address_line_2, city, state_province_code,
                country_code, postal_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&new.email)
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.full_name)
        .bind(&new.sex)
        .bind(&new.phone_number)
        .bind(&new.address_line_1)
        .bind(&new.address_line_2)
        .bind(&new.city)
        .bind(&new.state_province_code)
        .bind(&new.country_code)
        .bind(&new.postal_code)
        .fetch_one(db)
        .await
    }

    /// Applies a sparse patch in one statement: omitted fields keep their
    /// stored value via COALESCE, and the whole patch commits or none of it
    /// does. Email and username are not reachable from here.
    pub async fn update_profile(
        db: &PgPool,
        id: i64,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                full_name = COALESCE($2, full_name),
                sex = COALESCE($3, sex),
                phone_number = COALESCE($4, phone_number),
                address_line_1 = COALESCE($5, address_line_1),
                address_line_2 = COALESCE($6, address_line_2),
                city = COALESCE($7, city),
                state_province_code = COALESCE($8, state_province_code),
                country_code = COALESCE($9, country_code),
                postal_code = COALESCE($10, postal_code),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.full_name)
        .bind(&changes.sex)
        .bind(&changes.phone_number)
        .bind(&changes.address_line_1)
        .bind(&changes.address_line_2)
        .bind(&changes.city)
        .bind(&changes.state_province_code)
        .bind(&changes.country_code)
        .bind(&changes.postal_code)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn update_password(db: &PgPool, id: i64, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }
}
