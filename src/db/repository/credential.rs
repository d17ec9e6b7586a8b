use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;

/// Insert a sign-up credential. The email is the primary key; a second
/// sign-up for the same address violates the constraint.
pub fn insert_credential(
    conn: &Connection,
    email: &str,
    password_hash: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO credentials (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
        params![email, password_hash, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Look up the stored password hash for an email, if any.
pub fn get_credential(conn: &Connection, email: &str) -> Result<Option<String>, DatabaseError> {
    let hash = conn
        .query_row(
            "SELECT password_hash FROM credentials WHERE email = ?1",
            params![email],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(hash)
}
