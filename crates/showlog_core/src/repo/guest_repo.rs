//! Guest repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting a guest removes its appearances in the same transaction.
//! - `list_guests` order is deterministic: `name ASC, id ASC`.

use crate::model::{Guest, GuestId};
use crate::repo::{ensure_table_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const GUEST_SELECT_SQL: &str = "SELECT id, name, occupation FROM guests";

/// Repository interface for guest CRUD operations.
pub trait GuestRepository {
    fn create_guest(&self, guest: &Guest) -> RepoResult<Guest>;
    fn update_guest(&self, guest: &Guest) -> RepoResult<()>;
    fn get_guest(&self, id: GuestId) -> RepoResult<Option<Guest>>;
    fn list_guests(&self) -> RepoResult<Vec<Guest>>;
    /// Deletes one guest and its appearances; returns appearances removed.
    fn delete_guest(&self, id: GuestId) -> RepoResult<usize>;
}

/// SQLite-backed guest repository.
pub struct SqliteGuestRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGuestRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "guests", &["id", "name", "occupation"])?;
        Ok(Self { conn })
    }
}

impl GuestRepository for SqliteGuestRepository<'_> {
    fn create_guest(&self, guest: &Guest) -> RepoResult<Guest> {
        self.conn.execute(
            "INSERT INTO guests (id, name, occupation) VALUES (?1, ?2, ?3);",
            params![guest.id(), guest.name(), guest.occupation()],
        )?;

        let id = guest.id().unwrap_or_else(|| self.conn.last_insert_rowid());
        Ok(guest.persisted_as(id)?)
    }

    fn update_guest(&self, guest: &Guest) -> RepoResult<()> {
        let id = guest.id().ok_or(RepoError::MissingId("guest"))?;
        let changed = self.conn.execute(
            "UPDATE guests SET name = ?1, occupation = ?2 WHERE id = ?3;",
            params![guest.name(), guest.occupation(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "guest", id });
        }
        Ok(())
    }

    fn get_guest(&self, id: GuestId) -> RepoResult<Option<Guest>> {
        let row = self
            .conn
            .query_row(
                &format!("{GUEST_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_columns,
            )
            .optional()?;
        row.map(into_guest).transpose()
    }

    fn list_guests(&self) -> RepoResult<Vec<Guest>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GUEST_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let rows = stmt.query_map([], read_columns)?;
        let mut guests = Vec::new();
        for row in rows {
            guests.push(into_guest(row?)?);
        }
        Ok(guests)
    }

    fn delete_guest(&self, id: GuestId) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM appearances WHERE guest_id = ?1;", [id])?;
        let deleted = tx.execute("DELETE FROM guests WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::NotFound { entity: "guest", id });
        }
        tx.commit()?;

        info!("event=guest_delete module=repo status=ok guest_id={id} appearances_removed={removed}");
        Ok(removed)
    }
}

type GuestColumns = (i64, String, String);

fn read_columns(row: &Row<'_>) -> rusqlite::Result<GuestColumns> {
    Ok((row.get("id")?, row.get("name")?, row.get("occupation")?))
}

fn into_guest((id, name, occupation): GuestColumns) -> RepoResult<Guest> {
    Guest::with_id(id, name, occupation)
        .map_err(|err| RepoError::InvalidData(format!("guests row {id} fails validation: {err}")))
}
