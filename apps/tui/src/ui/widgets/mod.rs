pub mod diagnosis;
pub mod field;
pub mod notices;
pub mod popup;
