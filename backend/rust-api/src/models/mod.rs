pub mod quiz;
pub mod score;
pub mod user;
