use crate::{
    domain::{Board, BoardId, Card, CardId, Column, ColumnId},
    error::{KanbanError, Result},
    storage::{by_start_date, BoardRepository, CardRepository, ColumnRepository},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    boards: HashMap<BoardId, Board>,
    columns: HashMap<ColumnId, Column>,
    cards: HashMap<CardId, Card>,
}

impl Tables {
    fn cards_of(&self, column_id: &ColumnId) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .cards
            .values()
            .filter(|card| card.column_id() == column_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| by_start_date(a, b).then_with(|| a.id().cmp(b.id())));
        cards
    }

    fn column_with_cards(&self, column: &Column) -> Result<Column> {
        let column = Column::reconstitute(
            column.id().clone(),
            column.name(),
            column.order(),
            column.board_id().clone(),
            self.cards_of(column.id()),
            column.created_at(),
            column.updated_at(),
        )?;
        Ok(column)
    }

    fn columns_of(&self, board_id: &BoardId) -> Result<Vec<Column>> {
        let mut columns: Vec<&Column> = self
            .columns
            .values()
            .filter(|column| column.board_id() == board_id)
            .collect();
        columns.sort_by(|a, b| a.order().cmp(&b.order()).then_with(|| a.id().cmp(b.id())));
        columns
            .into_iter()
            .map(|column| self.column_with_cards(column))
            .collect()
    }
}

/// Drops eagerly loaded children so only the row itself is kept
fn shallow_board(board: &Board) -> Result<Board> {
    Ok(Board::reconstitute(
        board.id().clone(),
        board.name(),
        Vec::new(),
        board.created_at(),
        board.updated_at(),
    )?)
}

fn shallow_column(column: &Column) -> Result<Column> {
    Ok(Column::reconstitute(
        column.id().clone(),
        column.name(),
        column.order(),
        column.board_id().clone(),
        Vec::new(),
        column.created_at(),
        column.updated_at(),
    )?)
}

fn missing(table: &str, id: impl std::fmt::Display) -> KanbanError {
    KanbanError::StorageError(format!("no {} row with id '{}'", table, id))
}

/// In-process storage backend holding boards, columns and cards in maps
///
/// Behaves like the relational backend: children require an existing parent
/// and deleting a parent cascades to its children.
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    /// Creates an empty storage instance
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardRepository for MemoryStorage {
    async fn find_all(&self) -> Result<Vec<Board>> {
        let tables = self.tables.read().await;
        let mut boards: Vec<Board> = tables.boards.values().cloned().collect();
        // Newest first
        boards.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        tracing::debug!(count = boards.len(), "Boards found");
        Ok(boards)
    }

    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>> {
        let tables = self.tables.read().await;
        Ok(tables.boards.get(id).cloned())
    }

    async fn find_by_id_with_details(&self, id: &BoardId) -> Result<Option<Board>> {
        let tables = self.tables.read().await;
        let Some(board) = tables.boards.get(id) else {
            tracing::debug!(board_id = %id, "Board not found");
            return Ok(None);
        };

        let columns = tables.columns_of(id)?;
        tracing::debug!(board_id = %id, columns = columns.len(), "Board with details found");
        let board = Board::reconstitute(
            board.id().clone(),
            board.name(),
            columns,
            board.created_at(),
            board.updated_at(),
        )?;
        Ok(Some(board))
    }

    async fn save(&self, board: &Board) -> Result<Board> {
        let stored = shallow_board(board)?;
        let mut tables = self.tables.write().await;
        if tables.boards.contains_key(board.id()) {
            return Err(KanbanError::StorageError(format!(
                "board '{}' already exists",
                board.id()
            )));
        }
        tables.boards.insert(stored.id().clone(), stored.clone());
        tracing::debug!(board_id = %stored.id(), "Board saved");
        Ok(stored)
    }

    async fn delete(&self, id: &BoardId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.boards.remove(id).is_none() {
            return Err(missing("board", id));
        }

        let column_ids: Vec<ColumnId> = tables
            .columns
            .values()
            .filter(|column| column.board_id() == id)
            .map(|column| column.id().clone())
            .collect();
        for column_id in &column_ids {
            tables.columns.remove(column_id);
        }
        tables
            .cards
            .retain(|_, card| !column_ids.contains(card.column_id()));

        tracing::debug!(board_id = %id, "Board deleted");
        Ok(())
    }

    async fn exists(&self, id: &BoardId) -> Result<bool> {
        Ok(self.tables.read().await.boards.contains_key(id))
    }
}

#[async_trait]
impl ColumnRepository for MemoryStorage {
    async fn find_by_id(&self, id: &ColumnId) -> Result<Option<Column>> {
        let tables = self.tables.read().await;
        tables
            .columns
            .get(id)
            .map(|column| tables.column_with_cards(column))
            .transpose()
    }

    async fn find_by_board_id(&self, board_id: &BoardId) -> Result<Vec<Column>> {
        let tables = self.tables.read().await;
        let columns = tables.columns_of(board_id)?;
        tracing::debug!(board_id = %board_id, count = columns.len(), "Columns found");
        Ok(columns)
    }

    async fn save(&self, column: &Column) -> Result<Column> {
        let stored = shallow_column(column)?;
        let mut tables = self.tables.write().await;
        if !tables.boards.contains_key(column.board_id()) {
            return Err(missing("board", column.board_id()));
        }
        if tables.columns.contains_key(column.id()) {
            return Err(KanbanError::StorageError(format!(
                "column '{}' already exists",
                column.id()
            )));
        }
        tables.columns.insert(stored.id().clone(), stored.clone());
        tracing::debug!(column_id = %stored.id(), board_id = %stored.board_id(), "Column saved");
        Ok(stored)
    }

    async fn delete(&self, id: &ColumnId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.columns.remove(id).is_none() {
            return Err(missing("column", id));
        }
        tables.cards.retain(|_, card| card.column_id() != id);
        tracing::debug!(column_id = %id, "Column deleted");
        Ok(())
    }

    async fn exists(&self, id: &ColumnId) -> Result<bool> {
        Ok(self.tables.read().await.columns.contains_key(id))
    }

    async fn max_order_by_board_id(&self, board_id: &BoardId) -> Result<Option<i32>> {
        let tables = self.tables.read().await;
        let max_order = tables
            .columns
            .values()
            .filter(|column| column.board_id() == board_id)
            .map(Column::order)
            .max();
        tracing::debug!(board_id = %board_id, ?max_order, "Max order retrieved");
        Ok(max_order)
    }
}

#[async_trait]
impl CardRepository for MemoryStorage {
    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>> {
        Ok(self.tables.read().await.cards.get(id).cloned())
    }

    async fn find_by_column_id(&self, column_id: &ColumnId) -> Result<Vec<Card>> {
        Ok(self.tables.read().await.cards_of(column_id))
    }

    async fn save(&self, card: &Card) -> Result<Card> {
        let mut tables = self.tables.write().await;
        if !tables.columns.contains_key(card.column_id()) {
            return Err(missing("column", card.column_id()));
        }
        if tables.cards.contains_key(card.id()) {
            return Err(KanbanError::StorageError(format!(
                "card '{}' already exists",
                card.id()
            )));
        }
        tables.cards.insert(card.id().clone(), card.clone());
        tracing::debug!(card_id = %card.id(), column_id = %card.column_id(), "Card saved");
        Ok(card.clone())
    }

    async fn update(&self, card: &Card) -> Result<Card> {
        let mut tables = self.tables.write().await;
        if !tables.columns.contains_key(card.column_id()) {
            return Err(missing("column", card.column_id()));
        }
        match tables.cards.get_mut(card.id()) {
            Some(stored) => *stored = card.clone(),
            None => return Err(missing("card", card.id())),
        }
        tracing::debug!(card_id = %card.id(), "Card updated");
        Ok(card.clone())
    }

    async fn delete(&self, id: &CardId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.cards.remove(id).is_none() {
            return Err(missing("card", id));
        }
        tracing::debug!(card_id = %id, "Card deleted");
        Ok(())
    }

    async fn exists(&self, id: &CardId) -> Result<bool> {
        Ok(self.tables.read().await.cards.contains_key(id))
    }
}
