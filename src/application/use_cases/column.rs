use crate::{
    application::dto::{to_column_dto, ColumnDto, CreateColumnDto},
    domain::{board::next_order, BoardId, Column, IdGenerator, NewColumn},
    error::{ApplicationError, Result},
    storage::{BoardRepository, ColumnRepository},
};
use std::sync::Arc;

/// Appends a column to the end of a board
pub struct CreateColumn {
    columns: Arc<dyn ColumnRepository>,
    boards: Arc<dyn BoardRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl CreateColumn {
    /// Creates the use case
    pub fn new(
        columns: Arc<dyn ColumnRepository>,
        boards: Arc<dyn BoardRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            columns,
            boards,
            ids,
        }
    }

    /// Appends a column after the board's highest order, or fails with
    /// `INVALID_OPERATION` when that order is `i32::MAX`
    pub async fn execute(&self, board_id: &BoardId, input: CreateColumnDto) -> Result<ColumnDto> {
        if !self.boards.exists(board_id).await? {
            tracing::warn!(board_id = %board_id, "Board not found");
            return Err(ApplicationError::not_found("Board", board_id).into());
        }

        let max_order = self.columns.max_order_by_board_id(board_id).await?;
        let order = next_order(max_order)?;

        let column = Column::create(
            NewColumn::new(input.name, order, board_id.clone()),
            self.ids.as_ref(),
        )?;
        let saved = self.columns.save(&column).await?;
        tracing::info!(column_id = %saved.id(), board_id = %board_id, order, "Column created");
        Ok(to_column_dto(&saved))
    }
}
