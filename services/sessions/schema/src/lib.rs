//! SeaORM entities for the sessions service.
//!
//! Catalog tables (`genres`, `movies`, `movie_genres`, `movie_tags`,
//! `tag_relations`) are populated by the external catalog sync job and are
//! read-only here. All other tables are owned by this service.

pub mod genres;
pub mod matches;
pub mod movie_exposures;
pub mod movie_genres;
pub mod movie_tags;
pub mod movies;
pub mod pair_chemistry;
pub mod session_stats;
pub mod sessions;
pub mod swipes;
pub mod tag_relations;
pub mod taste_signals;
