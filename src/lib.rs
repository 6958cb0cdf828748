//! # Kanban Core
//!
//! Domain model, use cases and storage backends for a kanban board service.
//!
//! Boards own ordered columns and columns own cards. Transports (HTTP, CLI)
//! talk to [`KanbanService`] with DTOs and get plain DTOs or a
//! [`KanbanError`] back; they never see entities or storage details.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use domain::{
    Board, BoardId, Card, CardId, Column, ColumnId, IdGenerator, Priority, UuidGenerator,
    WorkItemType,
};
pub use error::{ApplicationError, DomainError, ErrorResponse, KanbanError, Result};
pub use service::{KanbanService, Repositories};
pub use storage::{BoardRepository, CardRepository, ColumnRepository, MemoryStorage};

#[cfg(feature = "sqlite-storage")]
pub use storage::SqliteStorage;
