pub mod health;
pub mod import;
