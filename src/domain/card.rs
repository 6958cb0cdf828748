use crate::domain::id::{CardId, ColumnId, IdGenerator};
use crate::domain::value_objects::{Description, Title};
use crate::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Urgency of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Returns the wire representation (e.g. `HIGH`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(DomainError::InvalidOperation(format!(
                "Invalid priority '{}'. Valid priorities: LOW, MEDIUM, HIGH, CRITICAL",
                s
            ))),
        }
    }
}

/// Kind of work a card tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkItemType {
    Bug,
    Feature,
    Improvement,
}

impl WorkItemType {
    /// Returns the wire representation (e.g. `BUG`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "BUG",
            Self::Feature => "FEATURE",
            Self::Improvement => "IMPROVEMENT",
        }
    }
}

impl fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkItemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUG" => Ok(Self::Bug),
            "FEATURE" => Ok(Self::Feature),
            "IMPROVEMENT" => Ok(Self::Improvement),
            _ => Err(DomainError::InvalidOperation(format!(
                "Invalid work item type '{}'. Valid types: BUG, FEATURE, IMPROVEMENT",
                s
            ))),
        }
    }
}

/// Input for [`Card::create`]
#[derive(Debug, Clone)]
pub struct NewCard {
    pub id: Option<CardId>,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub work_item_type: Option<WorkItemType>,
    pub column_id: ColumnId,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewCard {
    /// Input for a card with only the required fields set
    pub fn new(title: impl Into<String>, column_id: ColumnId) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            start_date: None,
            due_date: None,
            priority: None,
            work_item_type: None,
            column_id,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Persisted state of a card, as read back from storage
#[derive(Debug, Clone)]
pub struct CardRecord {
    pub id: CardId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub work_item_type: Option<WorkItemType>,
    pub column_id: ColumnId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A unit of work living in a column
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    id: CardId,
    title: Title,
    description: Description,
    start_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<Priority>,
    work_item_type: Option<WorkItemType>,
    column_id: ColumnId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Card {
    /// Creates a card, minting an id unless one is supplied
    pub fn create(input: NewCard, ids: &dyn IdGenerator) -> Result<Self, DomainError> {
        let now = Utc::now();
        Ok(Self {
            id: input.id.unwrap_or_else(|| CardId::new(ids.next_id())),
            title: Title::new(&input.title)?,
            description: Description::new(input.description.as_deref())?,
            start_date: input.start_date,
            due_date: input.due_date,
            priority: input.priority,
            work_item_type: input.work_item_type,
            column_id: input.column_id,
            created_at: input.created_at.unwrap_or(now),
            updated_at: input.updated_at.unwrap_or(now),
        })
    }

    /// Rebuilds a card from storage; title and description are re-validated
    pub fn reconstitute(record: CardRecord) -> Result<Self, DomainError> {
        Ok(Self {
            id: record.id,
            title: Title::new(&record.title)?,
            description: Description::new(record.description.as_deref())?,
            start_date: record.start_date,
            due_date: record.due_date,
            priority: record.priority,
            work_item_type: record.work_item_type,
            column_id: record.column_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Returns the card ID
    pub fn id(&self) -> &CardId {
        &self.id
    }

    /// Returns the card's title
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the description, if any
    pub fn description(&self) -> Option<&str> {
        self.description.value()
    }

    /// Returns the start date, if set
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Returns the due date, if set
    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the priority, if set
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the work item type, if set
    pub fn work_item_type(&self) -> Option<WorkItemType> {
        self.work_item_type
    }

    /// Returns the ID of the column holding this card
    pub fn column_id(&self) -> &ColumnId {
        &self.column_id
    }

    /// Returns when the card was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the card was last modified
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the title after validating it
    pub fn update_title(&mut self, title: &str) -> Result<(), DomainError> {
        self.title = Title::new(title)?;
        self.touch();
        Ok(())
    }

    /// Replaces the description; `None` or blank input clears it
    pub fn update_description(&mut self, description: Option<&str>) -> Result<(), DomainError> {
        self.description = Description::new(description)?;
        self.touch();
        Ok(())
    }

    /// Sets or clears the start date
    pub fn update_start_date(&mut self, start_date: Option<DateTime<Utc>>) {
        self.start_date = start_date;
        self.touch();
    }

    /// Sets or clears the due date
    pub fn update_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.due_date = due_date;
        self.touch();
    }

    /// Sets or clears the priority
    pub fn update_priority(&mut self, priority: Option<Priority>) {
        self.priority = priority;
        self.touch();
    }

    /// Sets or clears the work item type
    pub fn update_work_item_type(&mut self, work_item_type: Option<WorkItemType>) {
        self.work_item_type = work_item_type;
        self.touch();
    }

    /// Reassigns the card to another column. The target is not checked here.
    pub fn move_to(&mut self, column_id: ColumnId) {
        self.column_id = column_id;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
