//! Application operations. Each use case is stateless between calls and
//! talks to storage only through the repository traits.

pub mod board;
pub mod card;
pub mod column;

pub use board::{CreateBoard, GetBoardById, GetBoards};
pub use card::{CreateCard, DeleteCard, MoveCard, UpdateCard};
pub use column::CreateColumn;
