pub mod achievements;
pub mod root;
