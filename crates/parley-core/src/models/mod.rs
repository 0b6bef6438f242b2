pub mod chat;
pub mod message;
pub mod project;
pub mod turn;
