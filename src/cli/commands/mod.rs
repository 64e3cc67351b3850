pub mod health;
pub mod open;
