pub mod catalog;
pub mod deck;
pub mod history;
pub mod realtime;
pub mod session;
pub mod swipe;
