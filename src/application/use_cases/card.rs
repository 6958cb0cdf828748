use crate::{
    application::dto::{
        parse_timestamp, to_card_dto, CardDto, CreateCardDto, MoveCardDto, UpdateCardDto,
    },
    domain::{Card, CardId, ColumnId, IdGenerator, NewCard},
    error::{ApplicationError, Result},
    storage::{CardRepository, ColumnRepository},
};
use std::sync::Arc;

/// Adds a card to an existing column
pub struct CreateCard {
    cards: Arc<dyn CardRepository>,
    columns: Arc<dyn ColumnRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl CreateCard {
    /// Creates the use case
    pub fn new(
        cards: Arc<dyn CardRepository>,
        columns: Arc<dyn ColumnRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { cards, columns, ids }
    }

    /// Validates the input and stores the card in `column_id`
    pub async fn execute(&self, column_id: &ColumnId, input: CreateCardDto) -> Result<CardDto> {
        if !self.columns.exists(column_id).await? {
            tracing::warn!(column_id = %column_id, "Column not found");
            return Err(ApplicationError::not_found("Column", column_id).into());
        }

        let start_date = parse_timestamp("startDate", &input.start_date)?;
        let due_date = input
            .due_date
            .as_deref()
            .map(|value| parse_timestamp("dueDate", value))
            .transpose()?;

        let card = Card::create(
            NewCard {
                description: input.description,
                start_date: Some(start_date),
                due_date,
                priority: Some(input.priority),
                work_item_type: Some(input.work_item_type),
                ..NewCard::new(input.title, column_id.clone())
            },
            self.ids.as_ref(),
        )?;

        let saved = self.cards.save(&card).await?;
        tracing::info!(card_id = %saved.id(), column_id = %column_id, "Card created");
        Ok(to_card_dto(&saved))
    }
}

/// Applies a partial update to a card
pub struct UpdateCard {
    cards: Arc<dyn CardRepository>,
}

impl UpdateCard {
    /// Creates the use case
    pub fn new(cards: Arc<dyn CardRepository>) -> Self {
        Self { cards }
    }

    /// Applies every provided field and stores the card
    pub async fn execute(&self, card_id: &CardId, input: UpdateCardDto) -> Result<CardDto> {
        let Some(mut card) = self.cards.find_by_id(card_id).await? else {
            tracing::warn!(card_id = %card_id, "Card not found");
            return Err(ApplicationError::not_found("Card", card_id).into());
        };

        if input.is_empty() {
            tracing::warn!(card_id = %card_id, "No fields provided for update");
            return Err(ApplicationError::validation("At least one field must be provided").into());
        }

        if let Some(title) = &input.title {
            // An explicit null title fails the same way an empty one does
            card.update_title(title.as_deref().unwrap_or_default())?;
        }
        if let Some(description) = &input.description {
            card.update_description(description.as_deref())?;
        }
        if let Some(start_date) = &input.start_date {
            let start_date = optional_timestamp("startDate", start_date.as_deref())?;
            card.update_start_date(start_date);
        }
        if let Some(due_date) = &input.due_date {
            let due_date = optional_timestamp("dueDate", due_date.as_deref())?;
            card.update_due_date(due_date);
        }
        if let Some(priority) = input.priority {
            card.update_priority(priority);
        }
        if let Some(work_item_type) = input.work_item_type {
            card.update_work_item_type(work_item_type);
        }

        let updated = self.cards.update(&card).await?;
        tracing::debug!(card_id = %card_id, "Card updated");
        Ok(to_card_dto(&updated))
    }
}

fn optional_timestamp(
    field: &str,
    value: Option<&str>,
) -> std::result::Result<Option<chrono::DateTime<chrono::Utc>>, ApplicationError> {
    value.map(|value| parse_timestamp(field, value)).transpose()
}

/// Removes a card
pub struct DeleteCard {
    cards: Arc<dyn CardRepository>,
}

impl DeleteCard {
    /// Creates the use case
    pub fn new(cards: Arc<dyn CardRepository>) -> Self {
        Self { cards }
    }

    /// Deletes the card, or fails with `NOT_FOUND`
    pub async fn execute(&self, card_id: &CardId) -> Result<()> {
        if !self.cards.exists(card_id).await? {
            tracing::warn!(card_id = %card_id, "Card not found");
            return Err(ApplicationError::not_found("Card", card_id).into());
        }

        self.cards.delete(card_id).await?;
        tracing::info!(card_id = %card_id, "Card deleted");
        Ok(())
    }
}

/// Moves a card into a different column
///
/// The card, the target column and the write are separate repository calls;
/// two concurrent moves of the same card can race and the last write wins.
pub struct MoveCard {
    cards: Arc<dyn CardRepository>,
    columns: Arc<dyn ColumnRepository>,
}

impl MoveCard {
    /// Creates the use case
    pub fn new(cards: Arc<dyn CardRepository>, columns: Arc<dyn ColumnRepository>) -> Self {
        Self { cards, columns }
    }

    /// Moves the card to `input.new_column_id`
    pub async fn execute(&self, card_id: &CardId, input: MoveCardDto) -> Result<CardDto> {
        let Some(mut card) = self.cards.find_by_id(card_id).await? else {
            tracing::warn!(card_id = %card_id, "Card not found");
            return Err(ApplicationError::not_found("Card", card_id).into());
        };

        let target = ColumnId::new(input.new_column_id);
        if self.columns.find_by_id(&target).await?.is_none() {
            tracing::warn!(new_column_id = %target, "Target column not found");
            return Err(ApplicationError::not_found("Column", &target).into());
        }

        if card.column_id() == &target {
            tracing::warn!(card_id = %card_id, column_id = %target, "Card already in target column");
            return Err(ApplicationError::validation("Card is already in the target column").into());
        }

        tracing::debug!(
            card_id = %card_id,
            old_column_id = %card.column_id(),
            new_column_id = %target,
            "Moving card"
        );
        card.move_to(target);

        let updated = self.cards.update(&card).await?;
        Ok(to_card_dto(&updated))
    }
}
