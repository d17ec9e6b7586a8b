use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Alert;

/// Timestamps are stored as fixed-width RFC 3339 so that the
/// `created_at DESC` index order matches chronological order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(format!("invalid timestamp: {e}")))
}

/// Insert one alert row.
pub fn insert_alert(conn: &Connection, alert: &Alert) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO alerts (id, name, bed_number, room_number, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            alert.id.to_string(),
            alert.name,
            alert.bed_number,
            alert.room_number,
            alert.message,
            format_timestamp(&alert.created_at),
        ],
    )?;
    Ok(())
}

/// Load all alerts, newest first.
pub fn list_alerts(conn: &Connection) -> Result<Vec<Alert>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, bed_number, room_number, message, created_at
         FROM alerts ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut alerts = Vec::new();
    for row in rows {
        let (id, name, bed_number, room_number, message, created_at) = row?;
        alerts.push(Alert {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            name,
            bed_number,
            room_number,
            message,
            created_at: parse_timestamp(&created_at)?,
        });
    }
    Ok(alerts)
}

/// Delete an alert row by id. Deleting an absent id is not an error —
/// a second "Done" on an already-resolved alert must stay harmless.
pub fn delete_alert(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM alerts WHERE id = ?1", params![id.to_string()])?;
    Ok(())
}
