use crate::{
    domain::{Board, BoardId, Card, CardId, Column, ColumnId},
    error::Result,
};
use async_trait::async_trait;

pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

pub use memory_storage::MemoryStorage;
#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Persistence contract for boards
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Lists every board, without columns
    async fn find_all(&self) -> Result<Vec<Board>>;

    /// Loads a board without its columns
    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>>;

    /// Loads a board with its columns (by order) and their cards (by start date)
    async fn find_by_id_with_details(&self, id: &BoardId) -> Result<Option<Board>>;

    /// Inserts a new board and returns it as stored
    async fn save(&self, board: &Board) -> Result<Board>;

    async fn delete(&self, id: &BoardId) -> Result<()>;

    async fn exists(&self, id: &BoardId) -> Result<bool>;
}

/// Persistence contract for columns
#[async_trait]
pub trait ColumnRepository: Send + Sync {
    /// Loads a column together with its cards
    async fn find_by_id(&self, id: &ColumnId) -> Result<Option<Column>>;

    async fn find_by_board_id(&self, board_id: &BoardId) -> Result<Vec<Column>>;

    async fn save(&self, column: &Column) -> Result<Column>;

    async fn delete(&self, id: &ColumnId) -> Result<()>;

    async fn exists(&self, id: &ColumnId) -> Result<bool>;

    /// Highest column order on the board, or `None` when it has no columns
    async fn max_order_by_board_id(&self, board_id: &BoardId) -> Result<Option<i32>>;
}

/// Persistence contract for cards
#[async_trait]
pub trait CardRepository: Send + Sync {
    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>>;

    /// Cards of a column, ordered by start date
    async fn find_by_column_id(&self, column_id: &ColumnId) -> Result<Vec<Card>>;

    /// Inserts a new card and returns it as stored
    async fn save(&self, card: &Card) -> Result<Card>;

    /// Overwrites an existing card and returns it as stored
    async fn update(&self, card: &Card) -> Result<Card>;

    async fn delete(&self, id: &CardId) -> Result<()>;

    async fn exists(&self, id: &CardId) -> Result<bool>;
}

/// Compares optional start dates with missing dates sorted last
pub(crate) fn by_start_date(a: &Card, b: &Card) -> std::cmp::Ordering {
    match (a.start_date(), b.start_date()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
}
