//! Appearance repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist guest-on-episode records.
//! - Refuse writes whose episode or guest reference has no row.
//!
//! # Invariants
//! - Reference checks and the write share one immediate transaction.
//! - Every list is ordered by `id ASC`.

use crate::model::{Appearance, AppearanceId, EpisodeId, GuestId};
use crate::repo::{ensure_table_ready, row_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const APPEARANCE_SELECT_SQL: &str = "SELECT id, rating, episode_id, guest_id FROM appearances";

/// Repository interface for appearance CRUD operations.
pub trait AppearanceRepository {
    fn create_appearance(&self, appearance: &Appearance) -> RepoResult<Appearance>;
    fn update_appearance(&self, appearance: &Appearance) -> RepoResult<()>;
    fn get_appearance(&self, id: AppearanceId) -> RepoResult<Option<Appearance>>;
    fn list_appearances(&self) -> RepoResult<Vec<Appearance>>;
    fn list_for_episode(&self, episode_id: EpisodeId) -> RepoResult<Vec<Appearance>>;
    fn list_for_guest(&self, guest_id: GuestId) -> RepoResult<Vec<Appearance>>;
    fn delete_appearance(&self, id: AppearanceId) -> RepoResult<()>;
}

/// SQLite-backed appearance repository.
pub struct SqliteAppearanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAppearanceRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "appearances",
            &["id", "rating", "episode_id", "guest_id"],
        )?;
        Ok(Self { conn })
    }

    fn list_where(&self, filter: &str, value: Option<i64>) -> RepoResult<Vec<Appearance>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APPEARANCE_SELECT_SQL} {filter} ORDER BY id ASC;"))?;
        let rows = match value {
            Some(value) => stmt.query_map([value], read_columns)?,
            None => stmt.query_map([], read_columns)?,
        };
        let mut appearances = Vec::new();
        for row in rows {
            appearances.push(into_appearance(row?)?);
        }
        Ok(appearances)
    }
}

impl AppearanceRepository for SqliteAppearanceRepository<'_> {
    fn create_appearance(&self, appearance: &Appearance) -> RepoResult<Appearance> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_references_exist(&tx, appearance)?;
        tx.execute(
            "INSERT INTO appearances (id, rating, episode_id, guest_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                appearance.id(),
                appearance.rating(),
                appearance.episode_id(),
                appearance.guest_id(),
            ],
        )?;
        let id = appearance.id().unwrap_or_else(|| tx.last_insert_rowid());
        tx.commit()?;

        Ok(appearance.persisted_as(id)?)
    }

    fn update_appearance(&self, appearance: &Appearance) -> RepoResult<()> {
        let id = appearance.id().ok_or(RepoError::MissingId("appearance"))?;
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_references_exist(&tx, appearance)?;
        let changed = tx.execute(
            "UPDATE appearances
             SET rating = ?1, episode_id = ?2, guest_id = ?3
             WHERE id = ?4;",
            params![
                appearance.rating(),
                appearance.episode_id(),
                appearance.guest_id(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "appearance",
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn get_appearance(&self, id: AppearanceId) -> RepoResult<Option<Appearance>> {
        let row = self
            .conn
            .query_row(
                &format!("{APPEARANCE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_columns,
            )
            .optional()?;
        row.map(into_appearance).transpose()
    }

    fn list_appearances(&self) -> RepoResult<Vec<Appearance>> {
        self.list_where("", None)
    }

    fn list_for_episode(&self, episode_id: EpisodeId) -> RepoResult<Vec<Appearance>> {
        self.list_where("WHERE episode_id = ?1", Some(episode_id))
    }

    fn list_for_guest(&self, guest_id: GuestId) -> RepoResult<Vec<Appearance>> {
        self.list_where("WHERE guest_id = ?1", Some(guest_id))
    }

    fn delete_appearance(&self, id: AppearanceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM appearances WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "appearance",
                id,
            });
        }
        Ok(())
    }
}

fn ensure_references_exist(tx: &Transaction<'_>, appearance: &Appearance) -> RepoResult<()> {
    if !row_exists(tx, "episodes", appearance.episode_id())? {
        return Err(RepoError::MissingReference {
            entity: "episode",
            id: appearance.episode_id(),
        });
    }
    if !row_exists(tx, "guests", appearance.guest_id())? {
        return Err(RepoError::MissingReference {
            entity: "guest",
            id: appearance.guest_id(),
        });
    }
    Ok(())
}

type AppearanceColumns = (i64, i64, i64, i64);

fn read_columns(row: &Row<'_>) -> rusqlite::Result<AppearanceColumns> {
    Ok((
        row.get("id")?,
        row.get("rating")?,
        row.get("episode_id")?,
        row.get("guest_id")?,
    ))
}

fn into_appearance((id, rating, episode_id, guest_id): AppearanceColumns) -> RepoResult<Appearance> {
    Appearance::with_id(id, rating, episode_id, guest_id).map_err(|err| {
        RepoError::InvalidData(format!("appearances row {id} fails validation: {err}"))
    })
}
