use crate::{
    domain::{
        Board, BoardId, Card, CardId, CardRecord, Column, ColumnId, Priority, WorkItemType,
    },
    error::{KanbanError, Result},
    storage::{BoardRepository, CardRepository, ColumnRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::{path::Path, sync::Mutex};

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS boards (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS board_columns (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    sort_order  INTEGER NOT NULL,
    board_id    TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_board_columns_board_id ON board_columns(board_id);

CREATE TABLE IF NOT EXISTS cards (
    id              TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    description     TEXT,
    start_date      TEXT,
    due_date        TEXT,
    priority        TEXT,
    work_item_type  TEXT,
    column_id       TEXT NOT NULL REFERENCES board_columns(id) ON DELETE CASCADE,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cards_column_id ON cards(column_id);
";

const BOARD_FIELDS: &str = "id, name, created_at, updated_at";
const COLUMN_FIELDS: &str = "id, name, sort_order, board_id, created_at, updated_at";
const CARD_FIELDS: &str = "id, title, description, start_date, due_date, priority, \
                           work_item_type, column_id, created_at, updated_at";

// Timestamps are stored as fixed-width RFC 3339 text so they sort chronologically
fn to_text(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn from_text(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| KanbanError::StorageError(format!("bad timestamp '{}': {}", value, e)))
}

fn corrupted(err: impl ToString) -> KanbanError {
    KanbanError::StorageError(err.to_string())
}

struct BoardRow {
    id: String,
    name: String,
    created_at: String,
    updated_at: String,
}

impl BoardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }

    fn into_board(self, columns: Vec<Column>) -> Result<Board> {
        Board::reconstitute(
            BoardId::new(self.id),
            &self.name,
            columns,
            from_text(&self.created_at)?,
            from_text(&self.updated_at)?,
        )
        .map_err(corrupted)
    }
}

struct ColumnRow {
    id: String,
    name: String,
    order: i32,
    board_id: String,
    created_at: String,
    updated_at: String,
}

impl ColumnRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            order: row.get(2)?,
            board_id: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_column(self, cards: Vec<Card>) -> Result<Column> {
        Column::reconstitute(
            ColumnId::new(self.id),
            &self.name,
            self.order,
            BoardId::new(self.board_id),
            cards,
            from_text(&self.created_at)?,
            from_text(&self.updated_at)?,
        )
        .map_err(corrupted)
    }
}

struct CardRow {
    id: String,
    title: String,
    description: Option<String>,
    start_date: Option<String>,
    due_date: Option<String>,
    priority: Option<String>,
    work_item_type: Option<String>,
    column_id: String,
    created_at: String,
    updated_at: String,
}

impl CardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            start_date: row.get(3)?,
            due_date: row.get(4)?,
            priority: row.get(5)?,
            work_item_type: row.get(6)?,
            column_id: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_card(self) -> Result<Card> {
        let record = CardRecord {
            id: CardId::new(self.id),
            title: self.title,
            description: self.description,
            start_date: self.start_date.as_deref().map(from_text).transpose()?,
            due_date: self.due_date.as_deref().map(from_text).transpose()?,
            priority: self
                .priority
                .as_deref()
                .map(str::parse::<Priority>)
                .transpose()
                .map_err(corrupted)?,
            work_item_type: self
                .work_item_type
                .as_deref()
                .map(str::parse::<WorkItemType>)
                .transpose()
                .map_err(corrupted)?,
            column_id: ColumnId::new(self.column_id),
            created_at: from_text(&self.created_at)?,
            updated_at: from_text(&self.updated_at)?,
        };
        Card::reconstitute(record).map_err(corrupted)
    }
}

fn load_cards(conn: &Connection, column_id: &ColumnId) -> Result<Vec<Card>> {
    let sql = format!(
        "SELECT {} FROM cards WHERE column_id = ?1 \
         ORDER BY start_date IS NULL, start_date, id",
        CARD_FIELDS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![column_id.as_str()], CardRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(CardRow::into_card).collect()
}

fn load_card(conn: &Connection, id: &CardId) -> Result<Option<Card>> {
    let sql = format!("SELECT {} FROM cards WHERE id = ?1", CARD_FIELDS);
    conn.query_row(&sql, params![id.as_str()], CardRow::from_row)
        .optional()?
        .map(CardRow::into_card)
        .transpose()
}

fn load_columns(conn: &Connection, board_id: &BoardId) -> Result<Vec<Column>> {
    let sql = format!(
        "SELECT {} FROM board_columns WHERE board_id = ?1 ORDER BY sort_order, id",
        COLUMN_FIELDS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![board_id.as_str()], ColumnRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter()
        .map(|row| {
            let cards = load_cards(conn, &ColumnId::new(row.id.clone()))?;
            row.into_column(cards)
        })
        .collect()
}

fn load_column(conn: &Connection, id: &ColumnId) -> Result<Option<ColumnRow>> {
    let sql = format!("SELECT {} FROM board_columns WHERE id = ?1", COLUMN_FIELDS);
    Ok(conn
        .query_row(&sql, params![id.as_str()], ColumnRow::from_row)
        .optional()?)
}

fn load_board(conn: &Connection, id: &BoardId) -> Result<Option<BoardRow>> {
    let sql = format!("SELECT {} FROM boards WHERE id = ?1", BOARD_FIELDS);
    Ok(conn
        .query_row(&sql, params![id.as_str()], BoardRow::from_row)
        .optional()?)
}

fn ensure_affected(affected: usize, table: &str, id: &str) -> Result<()> {
    if affected == 0 {
        return Err(KanbanError::StorageError(format!(
            "no {} row with id '{}'",
            table, id
        )));
    }
    Ok(())
}

/// SQLite-based storage backend for boards, columns and cards
///
/// All calls share one connection behind a mutex and run synchronously on the
/// calling task, so queries block the runtime thread while they execute. Fine
/// for an embedded or single-user service; a busy multi-request server should
/// move these calls onto `tokio::task::spawn_blocking` or use a pool.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) a database file and applies the schema
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| KanbanError::StorageError("connection lock poisoned".to_string()))?;
        f(&conn)
    }
}

#[async_trait]
impl BoardRepository for SqliteStorage {
    async fn find_all(&self) -> Result<Vec<Board>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM boards ORDER BY created_at DESC, id",
                BOARD_FIELDS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], BoardRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            tracing::debug!(count = rows.len(), "Boards found");
            rows.into_iter().map(|row| row.into_board(Vec::new())).collect()
        })
    }

    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>> {
        self.with_conn(|conn| {
            load_board(conn, id)?
                .map(|row| row.into_board(Vec::new()))
                .transpose()
        })
    }

    async fn find_by_id_with_details(&self, id: &BoardId) -> Result<Option<Board>> {
        self.with_conn(|conn| {
            let Some(row) = load_board(conn, id)? else {
                tracing::debug!(board_id = %id, "Board not found");
                return Ok(None);
            };
            let columns = load_columns(conn, id)?;
            tracing::debug!(board_id = %id, columns = columns.len(), "Board with details found");
            row.into_board(columns).map(Some)
        })
    }

    async fn save(&self, board: &Board) -> Result<Board> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO boards (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    board.id().as_str(),
                    board.name(),
                    to_text(board.created_at()),
                    to_text(board.updated_at()),
                ],
            )?;
            tracing::debug!(board_id = %board.id(), "Board saved");
            load_board(conn, board.id())?
                .ok_or_else(|| KanbanError::StorageError("board vanished after insert".to_string()))?
                .into_board(Vec::new())
        })
    }

    async fn delete(&self, id: &BoardId) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM boards WHERE id = ?1", params![id.as_str()])?;
            ensure_affected(affected, "board", id.as_str())?;
            tracing::debug!(board_id = %id, "Board deleted");
            Ok(())
        })
    }

    async fn exists(&self, id: &BoardId) -> Result<bool> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM boards WHERE id = ?1)",
                params![id.as_str()],
                |row| row.get(0),
            )?)
        })
    }
}

#[async_trait]
impl ColumnRepository for SqliteStorage {
    async fn find_by_id(&self, id: &ColumnId) -> Result<Option<Column>> {
        self.with_conn(|conn| {
            let Some(row) = load_column(conn, id)? else {
                return Ok(None);
            };
            let cards = load_cards(conn, id)?;
            row.into_column(cards).map(Some)
        })
    }

    async fn find_by_board_id(&self, board_id: &BoardId) -> Result<Vec<Column>> {
        self.with_conn(|conn| load_columns(conn, board_id))
    }

    async fn save(&self, column: &Column) -> Result<Column> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO board_columns (id, name, sort_order, board_id, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    column.id().as_str(),
                    column.name(),
                    column.order(),
                    column.board_id().as_str(),
                    to_text(column.created_at()),
                    to_text(column.updated_at()),
                ],
            )?;
            tracing::debug!(column_id = %column.id(), board_id = %column.board_id(), "Column saved");
            load_column(conn, column.id())?
                .ok_or_else(|| KanbanError::StorageError("column vanished after insert".to_string()))?
                .into_column(Vec::new())
        })
    }

    async fn delete(&self, id: &ColumnId) -> Result<()> {
        self.with_conn(|conn| {
            let affected =
                conn.execute("DELETE FROM board_columns WHERE id = ?1", params![id.as_str()])?;
            ensure_affected(affected, "column", id.as_str())?;
            tracing::debug!(column_id = %id, "Column deleted");
            Ok(())
        })
    }

    async fn exists(&self, id: &ColumnId) -> Result<bool> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM board_columns WHERE id = ?1)",
                params![id.as_str()],
                |row| row.get(0),
            )?)
        })
    }

    async fn max_order_by_board_id(&self, board_id: &BoardId) -> Result<Option<i32>> {
        self.with_conn(|conn| {
            let max_order: Option<i32> = conn.query_row(
                "SELECT MAX(sort_order) FROM board_columns WHERE board_id = ?1",
                params![board_id.as_str()],
                |row| row.get(0),
            )?;
            tracing::debug!(board_id = %board_id, ?max_order, "Max order retrieved");
            Ok(max_order)
        })
    }
}

#[async_trait]
impl CardRepository for SqliteStorage {
    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>> {
        self.with_conn(|conn| load_card(conn, id))
    }

    async fn find_by_column_id(&self, column_id: &ColumnId) -> Result<Vec<Card>> {
        self.with_conn(|conn| load_cards(conn, column_id))
    }

    async fn save(&self, card: &Card) -> Result<Card> {
        self.with_conn(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO cards ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    CARD_FIELDS
                ),
                params![
                    card.id().as_str(),
                    card.title(),
                    card.description(),
                    card.start_date().map(to_text),
                    card.due_date().map(to_text),
                    card.priority().map(|p| p.as_str()),
                    card.work_item_type().map(|t| t.as_str()),
                    card.column_id().as_str(),
                    to_text(card.created_at()),
                    to_text(card.updated_at()),
                ],
            )?;
            tracing::debug!(card_id = %card.id(), column_id = %card.column_id(), "Card saved");
            load_card(conn, card.id())?
                .ok_or_else(|| KanbanError::StorageError("card vanished after insert".to_string()))
        })
    }

    async fn update(&self, card: &Card) -> Result<Card> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE cards SET title = ?2, description = ?3, start_date = ?4, due_date = ?5, \
                 priority = ?6, work_item_type = ?7, column_id = ?8, updated_at = ?9 \
                 WHERE id = ?1",
                params![
                    card.id().as_str(),
                    card.title(),
                    card.description(),
                    card.start_date().map(to_text),
                    card.due_date().map(to_text),
                    card.priority().map(|p| p.as_str()),
                    card.work_item_type().map(|t| t.as_str()),
                    card.column_id().as_str(),
                    to_text(card.updated_at()),
                ],
            )?;
            ensure_affected(affected, "card", card.id().as_str())?;
            tracing::debug!(card_id = %card.id(), "Card updated");
            load_card(conn, card.id())?
                .ok_or_else(|| KanbanError::StorageError("card vanished after update".to_string()))
        })
    }

    async fn delete(&self, id: &CardId) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM cards WHERE id = ?1", params![id.as_str()])?;
            ensure_affected(affected, "card", id.as_str())?;
            tracing::debug!(card_id = %id, "Card deleted");
            Ok(())
        })
    }

    async fn exists(&self, id: &CardId) -> Result<bool> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM cards WHERE id = ?1)",
                params![id.as_str()],
                |row| row.get(0),
            )?)
        })
    }
}
