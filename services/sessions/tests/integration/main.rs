mod deck_test;
mod helpers;
mod session_test;
mod stats_test;
mod swipe_test;
