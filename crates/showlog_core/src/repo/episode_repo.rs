//! Episode repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting an episode removes its appearances in the same transaction.
//! - `list_episodes` order is deterministic: `number ASC, id ASC`.

use crate::model::{Episode, EpisodeId};
use crate::repo::{ensure_table_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const EPISODE_SELECT_SQL: &str = "SELECT id, date, number FROM episodes";

/// Repository interface for episode CRUD operations.
pub trait EpisodeRepository {
    /// Inserts `episode` and returns it keyed by its assigned id.
    fn create_episode(&self, episode: &Episode) -> RepoResult<Episode>;
    /// Overwrites the stored fields of an already persisted episode.
    fn update_episode(&self, episode: &Episode) -> RepoResult<()>;
    fn get_episode(&self, id: EpisodeId) -> RepoResult<Option<Episode>>;
    fn list_episodes(&self) -> RepoResult<Vec<Episode>>;
    /// Deletes one episode and its appearances; returns appearances removed.
    fn delete_episode(&self, id: EpisodeId) -> RepoResult<usize>;
}

/// SQLite-backed episode repository.
pub struct SqliteEpisodeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEpisodeRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "episodes", &["id", "date", "number"])?;
        Ok(Self { conn })
    }
}

impl EpisodeRepository for SqliteEpisodeRepository<'_> {
    fn create_episode(&self, episode: &Episode) -> RepoResult<Episode> {
        self.conn.execute(
            "INSERT INTO episodes (id, date, number) VALUES (?1, ?2, ?3);",
            params![episode.id(), episode.date(), episode.number()],
        )?;

        let id = episode.id().unwrap_or_else(|| self.conn.last_insert_rowid());
        Ok(episode.persisted_as(id)?)
    }

    fn update_episode(&self, episode: &Episode) -> RepoResult<()> {
        let id = episode.id().ok_or(RepoError::MissingId("episode"))?;
        let changed = self.conn.execute(
            "UPDATE episodes SET date = ?1, number = ?2 WHERE id = ?3;",
            params![episode.date(), episode.number(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "episode",
                id,
            });
        }
        Ok(())
    }

    fn get_episode(&self, id: EpisodeId) -> RepoResult<Option<Episode>> {
        let row = self
            .conn
            .query_row(
                &format!("{EPISODE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_columns,
            )
            .optional()?;
        row.map(into_episode).transpose()
    }

    fn list_episodes(&self) -> RepoResult<Vec<Episode>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EPISODE_SELECT_SQL} ORDER BY number ASC, id ASC;"))?;
        let rows = stmt.query_map([], read_columns)?;
        let mut episodes = Vec::new();
        for row in rows {
            episodes.push(into_episode(row?)?);
        }
        Ok(episodes)
    }

    fn delete_episode(&self, id: EpisodeId) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM appearances WHERE episode_id = ?1;", [id])?;
        let deleted = tx.execute("DELETE FROM episodes WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::NotFound {
                entity: "episode",
                id,
            });
        }
        tx.commit()?;

        info!(
            "event=episode_delete module=repo status=ok episode_id={id} appearances_removed={removed}"
        );
        Ok(removed)
    }
}

type EpisodeColumns = (i64, String, i64);

fn read_columns(row: &Row<'_>) -> rusqlite::Result<EpisodeColumns> {
    Ok((row.get("id")?, row.get("date")?, row.get("number")?))
}

fn into_episode((id, date, number): EpisodeColumns) -> RepoResult<Episode> {
    Episode::with_id(id, date, number).map_err(|err| {
        RepoError::InvalidData(format!("episodes row {id} fails validation: {err}"))
    })
}
