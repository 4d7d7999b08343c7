//! User repository implementation

use crate::error::{Error, Result};
use crate::models::{User, UserId};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for user storage operations
pub trait UserRepository {
    /// All users, oldest id first
    fn list(&self) -> Result<Vec<User>>;

    /// Get a user by ID
    fn get(&self, id: UserId) -> Result<Option<User>>;

    /// Insert a user, replacing any row with the same id or email.
    /// Returns the id assigned to the stored row.
    fn insert(&self, user: &User) -> Result<UserId>;

    /// Replace the row with the user's id; returns rows affected
    fn update(&self, user: &User) -> Result<usize>;

    /// Delete the row with the user's id; returns rows affected
    fn delete(&self, user: &User) -> Result<usize>;

    /// Delete every user; returns rows affected
    fn delete_all(&self) -> Result<usize>;
}

/// `SQLite` implementation of `UserRepository`
pub struct SqliteUserRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteUserRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn validate(user: &User) -> Result<()> {
        if user.name.trim().is_empty() {
            return Err(Error::InvalidInput("user name cannot be empty".into()));
        }
        if user.email.trim().is_empty() {
            return Err(Error::InvalidInput("user email cannot be empty".into()));
        }
        Ok(())
    }

    /// Parse a user from a database row
    fn parse_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: Some(UserId::new(row.get(0)?)),
            name: row.get(1)?,
            email: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email, created_at FROM users ORDER BY id ASC")?;

        let users = stmt
            .query_map([], Self::parse_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(users)
    }

    fn get(&self, id: UserId) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email, created_at FROM users WHERE id = ?",
                params![id.get()],
                Self::parse_user,
            )
            .optional()?;

        Ok(user)
    }

    fn insert(&self, user: &User) -> Result<UserId> {
        Self::validate(user)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)",
            params![
                user.id.map(UserId::get),
                user.name,
                user.email,
                user.created_at
            ],
        )?;

        Ok(UserId::new(self.conn.last_insert_rowid()))
    }

    fn update(&self, user: &User) -> Result<usize> {
        let Some(id) = user.id else {
            return Ok(0);
        };
        Self::validate(user)?;

        let rows = self.conn.execute(
            "UPDATE users SET name = ?, email = ?, created_at = ? WHERE id = ?",
            params![user.name, user.email, user.created_at, id.get()],
        )?;

        Ok(rows)
    }

    fn delete(&self, user: &User) -> Result<usize> {
        let Some(id) = user.id else {
            return Ok(0);
        };

        let rows = self
            .conn
            .execute("DELETE FROM users WHERE id = ?", params![id.get()])?;

        Ok(rows)
    }

    fn delete_all(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM users", [])?)
    }
}
