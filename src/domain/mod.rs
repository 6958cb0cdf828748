pub mod board;
pub mod card;
pub mod column;
pub mod id;
pub mod value_objects;

pub use board::{Board, NewBoard};
pub use card::{Card, CardRecord, NewCard, Priority, WorkItemType};
pub use column::{Column, NewColumn};
pub use id::{BoardId, CardId, ColumnId, IdGenerator, UuidGenerator};
pub use value_objects::{Description, Name, Title};
