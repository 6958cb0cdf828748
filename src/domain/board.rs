use crate::domain::column::Column;
use crate::domain::id::{BoardId, ColumnId, IdGenerator};
use crate::domain::value_objects::Name;
use crate::error::DomainError;
use chrono::{DateTime, Utc};

/// Input for [`Board::create`]
#[derive(Debug, Clone, Default)]
pub struct NewBoard {
    pub id: Option<BoardId>,
    pub name: String,
    pub columns: Vec<Column>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewBoard {
    /// Input for a board with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Kanban board: a named, ordered set of columns
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    id: BoardId,
    name: Name,
    columns: Vec<Column>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Board {
    const ENTITY: &'static str = "Board";

    /// Creates a new board, validating its name
    pub fn create(input: NewBoard, ids: &dyn IdGenerator) -> Result<Self, DomainError> {
        let now = Utc::now();
        Ok(Self {
            id: input.id.unwrap_or_else(|| BoardId::new(ids.next_id())),
            name: Name::new(&input.name, Self::ENTITY)?,
            columns: input.columns,
            created_at: input.created_at.unwrap_or(now),
            updated_at: input.updated_at.unwrap_or(now),
        })
    }

    /// Rebuilds a board from storage without minting a new id or timestamps
    pub fn reconstitute(
        id: BoardId,
        name: &str,
        columns: Vec<Column>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: Name::new(name, Self::ENTITY)?,
            columns,
            created_at,
            updated_at,
        })
    }

    /// Returns the board ID
    pub fn id(&self) -> &BoardId {
        &self.id
    }

    /// Returns the board name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Columns sorted by ascending order; ties keep insertion order
    pub fn columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|column| column.order());
        columns
    }

    /// Returns when the board was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the board was last modified
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Adds a column to the board
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
        self.updated_at = Utc::now();
    }

    /// Removes a column if present; unknown ids are ignored
    pub fn remove_column(&mut self, column_id: &ColumnId) {
        self.columns.retain(|column| column.id() != column_id);
        self.updated_at = Utc::now();
    }

    /// Finds a column on this board by ID
    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id() == column_id)
    }

    /// Checks if the column belongs to this board
    pub fn has_column(&self, column_id: &ColumnId) -> bool {
        self.column(column_id).is_some()
    }

    /// Order for the next column: 0 on an empty board, otherwise max + 1
    ///
    /// Fails once the highest order is `i32::MAX`.
    pub fn next_column_order(&self) -> Result<i32, DomainError> {
        next_order(self.columns.iter().map(Column::order).max())
    }
}

/// Shared ordering rule for appending a column after `max_order`
pub fn next_order(max_order: Option<i32>) -> Result<i32, DomainError> {
    match max_order {
        None => Ok(0),
        Some(max) => max.checked_add(1).ok_or_else(|| {
            DomainError::InvalidOperation(format!(
                "Cannot append a column after order {}",
                max
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::column::NewColumn;
    use crate::domain::id::testing::SequentialIds;

    fn board(ids: &SequentialIds) -> Board {
        Board::create(NewBoard::new("Roadmap"), ids).unwrap()
    }

    fn new_column(ids: &SequentialIds, board: &Board, name: &str, order: i32) -> Column {
        Column::create(NewColumn::new(name, order, board.id().clone()), ids).unwrap()
    }

    #[test]
    fn test_board_creation() {
        let ids = SequentialIds::new("board");
        let board = Board::create(NewBoard::new("  Roadmap "), &ids).unwrap();

        assert_eq!(board.id().as_str(), "board-1");
        assert_eq!(board.name(), "Roadmap");
        assert!(board.columns().is_empty());
        assert_eq!(board.created_at(), board.updated_at());
    }

    #[test]
    fn test_board_creation_rejects_invalid_name() {
        let ids = SequentialIds::new("board");
        let err = Board::create(NewBoard::new(""), &ids).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Board name: cannot be empty");
    }

    #[test]
    fn test_reconstitute_preserves_id_and_name() {
        let ids = SequentialIds::new("board");
        let created = board(&ids);
        let rebuilt = Board::reconstitute(
            created.id().clone(),
            created.name(),
            Vec::new(),
            created.created_at(),
            created.updated_at(),
        )
        .unwrap();

        assert_eq!(rebuilt.id(), created.id());
        assert_eq!(rebuilt.name(), created.name());
        assert_eq!(rebuilt.created_at(), created.created_at());
    }

    #[test]
    fn test_columns_are_sorted_by_order() {
        let ids = SequentialIds::new("id");
        let mut board = board(&ids);
        for (name, order) in [("Done", 2), ("Todo", 0), ("Doing", 1)] {
            let column = new_column(&ids, &board, name, order);
            board.add_column(column);
        }

        let orders: Vec<i32> = board.columns().iter().map(|c| c.order()).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_column_sort_is_stable_for_equal_orders() {
        let ids = SequentialIds::new("id");
        let mut board = board(&ids);
        for name in ["first", "second", "third"] {
            let column = new_column(&ids, &board, name, 1);
            board.add_column(column);
        }

        let names: Vec<&str> = board.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_add_then_remove_column() {
        let ids = SequentialIds::new("id");
        let mut board = board(&ids);
        let column = new_column(&ids, &board, "Todo", 0);
        let column_id = column.id().clone();

        board.add_column(column);
        assert!(board.has_column(&column_id));
        assert_eq!(board.column(&column_id).map(Column::name), Some("Todo"));

        board.remove_column(&column_id);
        assert!(!board.has_column(&column_id));
        assert!(board.column(&column_id).is_none());

        // Removing again is harmless
        board.remove_column(&column_id);
        assert!(board.columns().is_empty());
    }

    #[test]
    fn test_mutations_bump_updated_at() {
        let ids = SequentialIds::new("id");
        let mut board = board(&ids);
        let before = board.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));
        let column = new_column(&ids, &board, "Todo", 0);
        board.add_column(column);

        assert!(board.updated_at() > before);
    }

    #[test]
    fn test_next_column_order() {
        let ids = SequentialIds::new("id");
        let mut board = board(&ids);
        assert_eq!(board.next_column_order(), Ok(0));

        let column = new_column(&ids, &board, "Todo", 0);
        board.add_column(column);
        let column = new_column(&ids, &board, "Later", 5);
        board.add_column(column);

        assert_eq!(board.next_column_order(), Ok(6));

        let column = new_column(&ids, &board, "Edge", i32::MAX);
        board.add_column(column);
        assert!(matches!(
            board.next_column_order(),
            Err(DomainError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_next_order_rule() {
        assert_eq!(next_order(None), Ok(0));
        assert_eq!(next_order(Some(0)), Ok(1));
        assert_eq!(next_order(Some(2)), Ok(3));
        assert_eq!(next_order(Some(i32::MAX - 1)), Ok(i32::MAX));
    }

    #[test]
    fn test_next_order_rejects_overflow() {
        let err = next_order(Some(i32::MAX)).unwrap_err();
        assert_eq!(err.code(), "INVALID_OPERATION");
        assert!(err.to_string().contains(&i32::MAX.to_string()));
    }
}
