pub mod preparation;
pub mod recipe;
