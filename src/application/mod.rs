pub mod dto;
pub mod use_cases;

pub use dto::{
    BoardDto, BoardWithDetailsDto, CardDto, ColumnDto, ColumnWithCardsDto, CreateBoardDto,
    CreateCardDto, CreateColumnDto, MoveCardDto, UpdateCardDto,
};
