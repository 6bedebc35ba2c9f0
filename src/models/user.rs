use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::errors::AppError;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_ADMIN: &str = "admin";

/// Full account row, used by login to verify the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

/// Account fields safe to return to the client.
#[derive(Debug, Clone, Serialize)]
pub struct UserDisplay {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

pub fn create(conn: &Connection, new: &NewUser) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO users (username, password, email, display_name, role) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![new.username, new.password, new.email, new.display_name, new.role],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>, AppError> {
    let user = conn
        .query_row(
            "SELECT id, username, password, email, display_name, role \
             FROM users WHERE username = ?1",
            params![username],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password: row.get(2)?,
                    email: row.get(3)?,
                    display_name: row.get(4)?,
                    role: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn find_display_by_id(conn: &Connection, id: i64) -> Result<Option<UserDisplay>, AppError> {
    let user = conn
        .query_row(
            "SELECT id, username, email, display_name, role FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok(UserDisplay {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    display_name: row.get(3)?,
                    role: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}
