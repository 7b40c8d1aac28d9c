pub mod tag_select;
pub mod ui;
