//! Wire shapes exchanged with callers of the use cases.
//!
//! Inputs arrive in camelCase, outputs leave in snake_case. Timestamps are
//! ISO-8601 strings in UTC with millisecond precision.

use crate::domain::{Board, Card, Column, Priority, WorkItemType};
use crate::error::ApplicationError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBoardDto {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateColumnDto {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardDto {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub due_date: Option<String>,
    pub priority: Priority,
    pub work_item_type: WorkItemType,
}

/// Partial card update
///
/// The outer `Option` tells whether a field was sent at all; the inner one
/// carries an explicit `null`, which clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardDto {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<Priority>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub work_item_type: Option<Option<WorkItemType>>,
}

impl UpdateCardDto {
    /// True when no field was provided
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.work_item_type.is_none()
    }
}

// A field that is present maps to `Some`, even when its value is null
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardDto {
    pub new_column_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardWithDetailsDto {
    pub id: String,
    pub name: String,
    pub columns: Vec<ColumnWithCardsDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDto {
    pub id: String,
    pub name: String,
    pub board_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnWithCardsDto {
    pub id: String,
    pub name: String,
    pub board_id: String,
    pub cards: Vec<CardDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub work_item_type: Option<WorkItemType>,
    pub column_id: String,
}

pub fn to_board_dto(board: &Board) -> BoardDto {
    BoardDto {
        id: board.id().to_string(),
        name: board.name().to_string(),
    }
}

pub fn to_board_with_details_dto(board: &Board) -> BoardWithDetailsDto {
    BoardWithDetailsDto {
        id: board.id().to_string(),
        name: board.name().to_string(),
        columns: board
            .columns()
            .into_iter()
            .map(to_column_with_cards_dto)
            .collect(),
    }
}

pub fn to_column_dto(column: &Column) -> ColumnDto {
    ColumnDto {
        id: column.id().to_string(),
        name: column.name().to_string(),
        board_id: column.board_id().to_string(),
    }
}

pub fn to_column_with_cards_dto(column: &Column) -> ColumnWithCardsDto {
    ColumnWithCardsDto {
        id: column.id().to_string(),
        name: column.name().to_string(),
        board_id: column.board_id().to_string(),
        cards: column.cards().iter().map(to_card_dto).collect(),
    }
}

pub fn to_card_dto(card: &Card) -> CardDto {
    CardDto {
        id: card.id().to_string(),
        title: card.title().to_string(),
        description: card.description().map(str::to_string),
        start_date: card.start_date().map(format_timestamp),
        due_date: card.due_date().map(format_timestamp),
        priority: card.priority(),
        work_item_type: card.work_item_type(),
        column_id: card.column_id().to_string(),
    }
}

/// Formats a timestamp like `2024-01-01T00:00:00.000Z`
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an ISO-8601 date-time (any offset) or a bare date (midnight UTC)
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, ApplicationError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ApplicationError::validation(format!(
                "Invalid {}: '{}' is not an ISO-8601 date",
                field, value
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::testing::SequentialIds;
    use crate::domain::{ColumnId, NewCard};
    use chrono::TimeZone;

    #[test]
    fn test_card_dto_wire_shape() {
        let ids = SequentialIds::new("card");
        let mut input = NewCard::new("Ship it", ColumnId::from("col-1"));
        input.start_date = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        input.priority = Some(Priority::Medium);
        let card = Card::create(input, &ids).unwrap();

        let json = serde_json::to_value(to_card_dto(&card)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "card-1",
                "title": "Ship it",
                "description": null,
                "start_date": "2024-01-01T00:00:00.000Z",
                "due_date": null,
                "priority": "MEDIUM",
                "work_item_type": null,
                "column_id": "col-1"
            })
        );
    }

    #[test]
    fn test_update_dto_distinguishes_absent_and_null() {
        let dto: UpdateCardDto = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(dto.description, Some(None));
        assert_eq!(dto.title, None);
        assert!(!dto.is_empty());

        let dto: UpdateCardDto = serde_json::from_str("{}").unwrap();
        assert!(dto.is_empty());

        let dto: UpdateCardDto =
            serde_json::from_str(r#"{"priority": "LOW", "workItemType": null}"#).unwrap();
        assert_eq!(dto.priority, Some(Some(Priority::Low)));
        assert_eq!(dto.work_item_type, Some(None));
    }

    #[test]
    fn test_create_card_dto_uses_camel_case() {
        let dto: CreateCardDto = serde_json::from_str(
            r#"{
                "title": "Bug",
                "startDate": "2024-03-01T10:00:00Z",
                "priority": "HIGH",
                "workItemType": "BUG"
            }"#,
        )
        .unwrap();
        assert_eq!(dto.start_date, "2024-03-01T10:00:00Z");
        assert_eq!(dto.description, None);
        assert_eq!(dto.due_date, None);
        assert_eq!(dto.work_item_type, WorkItemType::Bug);

        let invalid = serde_json::from_str::<CreateCardDto>(
            r#"{"title": "Bug", "startDate": "2024-03-01", "priority": "URGENT", "workItemType": "BUG"}"#,
        );
        assert!(invalid.is_err());
    }

    #[test]
    fn test_move_card_dto() {
        let dto: MoveCardDto = serde_json::from_str(r#"{"newColumnId": "col-9"}"#).unwrap();
        assert_eq!(dto.new_column_id, "col-9");
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("startDate", "2024-03-01T10:00:00Z").unwrap(), expected);
        assert_eq!(
            parse_timestamp("startDate", "2024-03-01T12:00:00+02:00").unwrap(),
            expected
        );
        assert_eq!(
            parse_timestamp("dueDate", "2024-03-01").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );

        let err = parse_timestamp("dueDate", "next week").unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("dueDate"));
    }

    #[test]
    fn test_format_timestamp_has_millis() {
        let value = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_timestamp(value), "2024-12-31T23:59:59.000Z");
    }
}
