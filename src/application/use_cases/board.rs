use crate::{
    application::dto::{
        to_board_dto, to_board_with_details_dto, BoardDto, BoardWithDetailsDto, CreateBoardDto,
    },
    domain::{Board, BoardId, IdGenerator, NewBoard},
    error::{ApplicationError, Result},
    storage::BoardRepository,
};
use std::sync::Arc;

/// Creates a new, empty board
pub struct CreateBoard {
    boards: Arc<dyn BoardRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl CreateBoard {
    /// Creates the use case
    pub fn new(boards: Arc<dyn BoardRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { boards, ids }
    }

    /// Validates the name and stores the board
    pub async fn execute(&self, input: CreateBoardDto) -> Result<BoardDto> {
        let board = Board::create(NewBoard::new(input.name), self.ids.as_ref())?;
        let saved = self.boards.save(&board).await?;
        tracing::info!(board_id = %saved.id(), "Board created");
        Ok(to_board_dto(&saved))
    }
}

/// Lists all boards in the order the repository returns them
pub struct GetBoards {
    boards: Arc<dyn BoardRepository>,
}

impl GetBoards {
    /// Creates the use case
    pub fn new(boards: Arc<dyn BoardRepository>) -> Self {
        Self { boards }
    }

    /// Returns every board
    pub async fn execute(&self) -> Result<Vec<BoardDto>> {
        let boards = self.boards.find_all().await?;
        Ok(boards.iter().map(to_board_dto).collect())
    }
}

/// Loads one board with its columns and cards
pub struct GetBoardById {
    boards: Arc<dyn BoardRepository>,
}

impl GetBoardById {
    /// Creates the use case
    pub fn new(boards: Arc<dyn BoardRepository>) -> Self {
        Self { boards }
    }

    /// Returns the board with its columns and cards, or `NOT_FOUND`
    pub async fn execute(&self, board_id: &BoardId) -> Result<BoardWithDetailsDto> {
        let Some(board) = self.boards.find_by_id_with_details(board_id).await? else {
            tracing::warn!(board_id = %board_id, "Board not found");
            return Err(ApplicationError::not_found("Board", board_id).into());
        };

        Ok(to_board_with_details_dto(&board))
    }
}
