use std::str::FromStr;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{Role, User};

/// Insert a profile row.
pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (email, role, created_at) VALUES (?1, ?2, ?3)",
        params![user.email, user.role.as_str(), Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Fetch the profile row for an email. Expects exactly one row.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<User, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT email, role FROM users WHERE email = ?1",
            params![email],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    let (email, role) = row.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "user".into(),
        id: email.into(),
    })?;

    Ok(User {
        email,
        role: Role::from_str(&role)?,
    })
}
