pub mod deck;
pub mod history;
pub mod preference;
pub mod session;
pub mod stats;
pub mod swipe;
