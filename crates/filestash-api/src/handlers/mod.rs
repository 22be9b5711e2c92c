pub mod events;
pub mod files;
pub mod health;
