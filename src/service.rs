use crate::{
    application::{
        use_cases::{
            CreateBoard, CreateCard, CreateColumn, DeleteCard, GetBoardById, GetBoards, MoveCard,
            UpdateCard,
        },
        BoardDto, BoardWithDetailsDto, CardDto, ColumnDto, CreateBoardDto, CreateCardDto,
        CreateColumnDto, MoveCardDto, UpdateCardDto,
    },
    config::{Config, StorageBackend},
    domain::{BoardId, CardId, ColumnId, IdGenerator, UuidGenerator},
    error::Result,
    storage::{BoardRepository, CardRepository, ColumnRepository, MemoryStorage},
};
use std::sync::Arc;

/// Repository handles shared by the use cases
#[derive(Clone)]
pub struct Repositories {
    pub boards: Arc<dyn BoardRepository>,
    pub columns: Arc<dyn ColumnRepository>,
    pub cards: Arc<dyn CardRepository>,
}

impl Repositories {
    /// Uses one backend for all three repositories
    pub fn from_storage<S>(storage: Arc<S>) -> Self
    where
        S: BoardRepository + ColumnRepository + CardRepository + 'static,
    {
        Self {
            boards: storage.clone(),
            columns: storage.clone(),
            cards: storage,
        }
    }
}

/// Entry point for transports: one method per use case
pub struct KanbanService {
    repositories: Repositories,
    ids: Arc<dyn IdGenerator>,
}

impl KanbanService {
    /// Builds a service over existing repositories
    pub fn new(repositories: Repositories, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repositories, ids }
    }

    /// Opens the storage backend named by `config.database_url`
    pub fn open(config: &Config) -> Result<Self> {
        let repositories = match config.storage_backend()? {
            StorageBackend::Memory => Repositories::from_storage(Arc::new(MemoryStorage::new())),
            StorageBackend::Sqlite(path) => open_sqlite(path.as_deref())?,
        };
        tracing::info!(environment = %config.environment, "Kanban service ready");
        Ok(Self::new(repositories, Arc::new(UuidGenerator)))
    }

    /// Creates a board
    pub async fn create_board(&self, input: CreateBoardDto) -> Result<BoardDto> {
        CreateBoard::new(self.repositories.boards.clone(), self.ids.clone())
            .execute(input)
            .await
    }

    /// Lists all boards, newest first
    pub async fn get_boards(&self) -> Result<Vec<BoardDto>> {
        GetBoards::new(self.repositories.boards.clone()).execute().await
    }

    /// Loads a board with its columns and cards
    pub async fn get_board(&self, board_id: &BoardId) -> Result<BoardWithDetailsDto> {
        GetBoardById::new(self.repositories.boards.clone())
            .execute(board_id)
            .await
    }

    /// Adds a column to a board
    pub async fn create_column(
        &self,
        board_id: &BoardId,
        input: CreateColumnDto,
    ) -> Result<ColumnDto> {
        CreateColumn::new(
            self.repositories.columns.clone(),
            self.repositories.boards.clone(),
            self.ids.clone(),
        )
        .execute(board_id, input)
        .await
    }

    /// Adds a card to a column
    pub async fn create_card(&self, column_id: &ColumnId, input: CreateCardDto) -> Result<CardDto> {
        CreateCard::new(
            self.repositories.cards.clone(),
            self.repositories.columns.clone(),
            self.ids.clone(),
        )
        .execute(column_id, input)
        .await
    }

    /// Partially updates a card
    pub async fn update_card(&self, card_id: &CardId, input: UpdateCardDto) -> Result<CardDto> {
        UpdateCard::new(self.repositories.cards.clone())
            .execute(card_id, input)
            .await
    }

    /// Deletes a card
    pub async fn delete_card(&self, card_id: &CardId) -> Result<()> {
        DeleteCard::new(self.repositories.cards.clone())
            .execute(card_id)
            .await
    }

    /// Moves a card to another column
    pub async fn move_card(&self, card_id: &CardId, input: MoveCardDto) -> Result<CardDto> {
        MoveCard::new(
            self.repositories.cards.clone(),
            self.repositories.columns.clone(),
        )
        .execute(card_id, input)
        .await
    }
}

#[cfg(feature = "sqlite-storage")]
fn open_sqlite(path: Option<&str>) -> Result<Repositories> {
    use crate::storage::SqliteStorage;

    let storage = match path {
        Some(path) => SqliteStorage::open(path)?,
        None => SqliteStorage::open_in_memory()?,
    };
    Ok(Repositories::from_storage(Arc::new(storage)))
}

#[cfg(not(feature = "sqlite-storage"))]
fn open_sqlite(_path: Option<&str>) -> Result<Repositories> {
    Err(crate::error::KanbanError::ConfigError(
        "SQLite storage requires the `sqlite-storage` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, WorkItemType};
    use crate::error::ErrorResponse;

    fn memory_service() -> KanbanService {
        let config = Config::from_toml_str(r#"database_url = "memory:""#).unwrap();
        KanbanService::open(&config).unwrap()
    }

    #[tokio::test]
    async fn test_full_board_workflow() {
        let service = memory_service();

        let board = service
            .create_board(CreateBoardDto {
                name: "Launch".to_string(),
            })
            .await
            .unwrap();
        let board_id = BoardId::from(board.id.as_str());

        let todo = service
            .create_column(&board_id, CreateColumnDto { name: "Todo".to_string() })
            .await
            .unwrap();
        let done = service
            .create_column(&board_id, CreateColumnDto { name: "Done".to_string() })
            .await
            .unwrap();

        let card = service
            .create_card(
                &ColumnId::from(todo.id.as_str()),
                CreateCardDto {
                    title: "Announce".to_string(),
                    description: None,
                    start_date: "2024-07-01T08:00:00Z".to_string(),
                    due_date: None,
                    priority: Priority::Medium,
                    work_item_type: WorkItemType::Feature,
                },
            )
            .await
            .unwrap();
        let card_id = CardId::from(card.id.as_str());

        let moved = service
            .move_card(&card_id, MoveCardDto { new_column_id: done.id.clone() })
            .await
            .unwrap();
        assert_eq!(moved.column_id, done.id);

        let details = service.get_board(&board_id).await.unwrap();
        assert_eq!(details.columns.len(), 2);
        assert_eq!(details.columns[0].id, todo.id);
        assert!(details.columns[0].cards.is_empty());
        assert_eq!(details.columns[1].cards[0].id, card.id);

        service.delete_card(&card_id).await.unwrap();
        let details = service.get_board(&board_id).await.unwrap();
        assert!(details.columns[1].cards.is_empty());

        assert_eq!(service.get_boards().await.unwrap(), vec![board]);
    }

    #[tokio::test]
    async fn test_errors_map_to_responses() {
        let service = memory_service();

        let err = service.get_board(&BoardId::from("nope")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(
            ErrorResponse::from(&err),
            ErrorResponse {
                message: "Board with id 'nope' not found".to_string(),
                code: "NOT_FOUND".to_string(),
            }
        );

        let err = service
            .create_board(CreateBoardDto { name: String::new() })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(ErrorResponse::from(&err).code, "INVALID_NAME");
    }

    #[cfg(not(feature = "sqlite-storage"))]
    #[test]
    fn test_sqlite_url_needs_feature() {
        let config = Config::from_toml_str(r#"database_url = "sqlite::memory:""#).unwrap();
        assert!(KanbanService::open(&config).is_err());
    }
}
