use crate::domain::card::Card;
use crate::domain::id::{BoardId, CardId, ColumnId, IdGenerator};
use crate::domain::value_objects::Name;
use crate::error::DomainError;
use chrono::{DateTime, Utc};

/// Input for [`Column::create`]
#[derive(Debug, Clone)]
pub struct NewColumn {
    pub id: Option<ColumnId>,
    pub name: String,
    pub order: i32,
    pub board_id: BoardId,
    pub cards: Vec<Card>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewColumn {
    /// Input for a column with the given name, order and parent board
    pub fn new(name: impl Into<String>, order: i32, board_id: BoardId) -> Self {
        Self {
            id: None,
            name: name.into(),
            order,
            board_id,
            cards: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// A lane of a board
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    id: ColumnId,
    name: Name,
    order: i32,
    board_id: BoardId,
    cards: Vec<Card>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Column {
    const ENTITY: &'static str = "Column";

    /// Creates a new column, validating its name
    pub fn create(input: NewColumn, ids: &dyn IdGenerator) -> Result<Self, DomainError> {
        let now = Utc::now();
        Ok(Self {
            id: input.id.unwrap_or_else(|| ColumnId::new(ids.next_id())),
            name: Name::new(&input.name, Self::ENTITY)?,
            order: input.order,
            board_id: input.board_id,
            cards: input.cards,
            created_at: input.created_at.unwrap_or(now),
            updated_at: input.updated_at.unwrap_or(now),
        })
    }

    /// Rebuilds a column from storage
    pub fn reconstitute(
        id: ColumnId,
        name: &str,
        order: i32,
        board_id: BoardId,
        cards: Vec<Card>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: Name::new(name, Self::ENTITY)?,
            order,
            board_id,
            cards,
            created_at,
            updated_at,
        })
    }

    /// Returns the column ID
    pub fn id(&self) -> &ColumnId {
        &self.id
    }

    /// Returns the column name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the position of the column on its board
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Returns the ID of the owning board
    pub fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    /// Cards in the order they were loaded or added
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns when the column was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the column was last modified
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Appends a card to this column
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        self.updated_at = Utc::now();
    }

    /// Removes a card if present; unknown ids are ignored
    pub fn remove_card(&mut self, card_id: &CardId) {
        self.cards.retain(|card| card.id() != card_id);
        self.updated_at = Utc::now();
    }

    /// Checks if the card belongs to this column
    pub fn has_card(&self, card_id: &CardId) -> bool {
        self.cards.iter().any(|card| card.id() == card_id)
    }

    /// Returns the number of cards in this column
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::NewCard;
    use crate::domain::id::testing::SequentialIds;

    fn column(ids: &SequentialIds) -> Column {
        Column::create(NewColumn::new("To Do", 0, BoardId::from("board-1")), ids).unwrap()
    }

    fn card(ids: &SequentialIds, title: &str, column: &Column) -> Card {
        Card::create(NewCard::new(title, column.id().clone()), ids).unwrap()
    }

    #[test]
    fn test_column_creation() {
        let ids = SequentialIds::new("col");
        let column = column(&ids);

        assert_eq!(column.id().as_str(), "col-1");
        assert_eq!(column.name(), "To Do");
        assert_eq!(column.order(), 0);
        assert_eq!(column.board_id().as_str(), "board-1");
        assert_eq!(column.card_count(), 0);
    }

    #[test]
    fn test_column_name_is_validated() {
        let ids = SequentialIds::new("col");
        let err = Column::create(NewColumn::new(" ", 0, BoardId::from("b")), &ids).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Column name: cannot be empty");
    }

    #[test]
    fn test_reconstitute_round_trip() {
        let ids = SequentialIds::new("col");
        let original = column(&ids);
        let rebuilt = Column::reconstitute(
            original.id().clone(),
            original.name(),
            original.order(),
            original.board_id().clone(),
            Vec::new(),
            original.created_at(),
            original.updated_at(),
        )
        .unwrap();

        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_add_and_remove_cards() {
        let ids = SequentialIds::new("id");
        let mut column = column(&ids);
        let first = card(&ids, "First", &column);
        let second = card(&ids, "Second", &column);
        let first_id = first.id().clone();

        column.add_card(first);
        column.add_card(second);
        assert_eq!(column.card_count(), 2);
        assert!(column.has_card(&first_id));

        column.remove_card(&first_id);
        assert_eq!(column.card_count(), 1);
        assert!(!column.has_card(&first_id));
        assert_eq!(column.cards()[0].title(), "Second");
    }

    #[test]
    fn test_remove_missing_card_is_noop() {
        let ids = SequentialIds::new("id");
        let mut column = column(&ids);
        let existing = card(&ids, "Keep", &column);
        column.add_card(existing);

        column.remove_card(&CardId::from("missing"));
        assert_eq!(column.card_count(), 1);
    }

    #[test]
    fn test_cards_keep_insertion_order() {
        let ids = SequentialIds::new("id");
        let mut column = column(&ids);
        for title in ["c", "a", "b"] {
            let card = card(&ids, title, &column);
            column.add_card(card);
        }
        let titles: Vec<&str> = column.cards().iter().map(Card::title).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }
}
