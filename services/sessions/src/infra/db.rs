//! SeaORM-backed repository implementations.
//!
//! Concurrency control lives at the storage level: insert-if-absent is
//! `ON CONFLICT DO NOTHING` plus the affected-row count, the guest slot is a
//! conditional update on NULL, and every counter bump is a single atomic
//! upsert so two writers never lose an increment.

use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use cinematch_domain::pagination::PageRequest;
use cinematch_domain::reaction::Reaction;
use cinematch_sessions_schema::{
    genres, matches, movie_exposures, movie_genres, movie_tags, movies, pair_chemistry,
    session_stats, sessions, swipes, tag_relations, taste_signals,
};

use crate::domain::repository::{
    CatalogRepository, ChemistryRepository, ExposureRepository, MatchRepository, ParticipantRole,
    SessionRepository, StatsRepository, SwipeRepository, TasteSignalRepository,
};
use crate::domain::types::{
    Chemistry, EndReason, Exposure, Genre, MatchRecord, Movie, PreferenceBundle, Session,
    SessionStats, Swipe, TagRelation, TasteSignal,
};
use crate::error::SessionsServiceError;

// ── Session repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<bool, SessionsServiceError> {
        let am = sessions::ActiveModel {
            id: Set(session.id),
            code: Set(session.code.clone()),
            host_id: Set(session.host_id),
            guest_id: Set(session.guest_id),
            genre_id: Set(session.genre_id),
            industry: Set(session.industry.clone()),
            host_prefs: Set(prefs_to_json(session.host_prefs.as_ref())?),
            guest_prefs: Set(prefs_to_json(session.guest_prefs.as_ref())?),
            created_at: Set(session.created_at),
            ended_at: Set(session.ended_at),
        };
        let inserted = sessions::Entity::insert(am)
            .on_conflict(
                OnConflict::column(sessions::Column::Code)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("create session")?;
        Ok(inserted > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, SessionsServiceError> {
        let model = sessions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find session by id")?;
        Ok(model.map(session_from_model))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Session>, SessionsServiceError> {
        let model = sessions::Entity::find()
            .filter(sessions::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find session by code")?;
        Ok(model.map(session_from_model))
    }

    async fn list_for_participant(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Session>, SessionsServiceError> {
        let models = sessions::Entity::find()
            .filter(
                sessions::Column::HostId
                    .eq(user_id)
                    .or(sessions::Column::GuestId.eq(user_id)),
            )
            .order_by_desc(sessions::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list sessions for participant")?;
        Ok(models.into_iter().map(session_from_model).collect())
    }

    async fn assign_guest(&self, id: Uuid, guest_id: Uuid) -> Result<bool, SessionsServiceError> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::GuestId, Expr::value(guest_id))
            .filter(sessions::Column::Id.eq(id))
            .filter(sessions::Column::GuestId.is_null())
            .exec(&self.db)
            .await
            .context("assign session guest")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_genre(&self, id: Uuid, genre_id: i32) -> Result<(), SessionsServiceError> {
        sessions::Entity::update_many()
            .col_expr(sessions::Column::GenreId, Expr::value(genre_id))
            .filter(sessions::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set session genre")?;
        Ok(())
    }

    async fn set_preferences(
        &self,
        id: Uuid,
        role: ParticipantRole,
        prefs: &PreferenceBundle,
    ) -> Result<(), SessionsServiceError> {
        let column = match role {
            ParticipantRole::Host => sessions::Column::HostPrefs,
            ParticipantRole::Guest => sessions::Column::GuestPrefs,
        };
        let json = serde_json::to_value(prefs).context("serialize preference bundle")?;
        sessions::Entity::update_many()
            .col_expr(column, Expr::value(json))
            .filter(sessions::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set session preferences")?;
        Ok(())
    }

    async fn end(&self, id: Uuid, ended_at: DateTime<Utc>) -> Result<bool, SessionsServiceError> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::EndedAt, Expr::value(ended_at))
            .filter(sessions::Column::Id.eq(id))
            .filter(sessions::Column::EndedAt.is_null())
            .exec(&self.db)
            .await
            .context("end session")?;
        Ok(result.rows_affected > 0)
    }
}

fn prefs_to_json(
    prefs: Option<&PreferenceBundle>,
) -> Result<Option<serde_json::Value>, SessionsServiceError> {
    prefs
        .map(|p| serde_json::to_value(p).context("serialize preference bundle"))
        .transpose()
        .map_err(Into::into)
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        code: model.code,
        host_id: model.host_id,
        guest_id: model.guest_id,
        genre_id: model.genre_id,
        industry: model.industry,
        // A malformed stored bundle reads back as absent rather than failing
        // the whole session fetch.
        host_prefs: model
            .host_prefs
            .and_then(|j| serde_json::from_value(j).ok()),
        guest_prefs: model
            .guest_prefs
            .and_then(|j| serde_json::from_value(j).ok()),
        created_at: model.created_at,
        ended_at: model.ended_at,
    }
}

// ── Catalog repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCatalogRepository {
    pub db: DatabaseConnection,
}

impl CatalogRepository for DbCatalogRepository {
    async fn find_genre(&self, id: i32) -> Result<Option<Genre>, SessionsServiceError> {
        let model = genres::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find genre")?;
        Ok(model.map(genre_from_model))
    }

    async fn list_genres(&self, industry: &str) -> Result<Vec<Genre>, SessionsServiceError> {
        let models = genres::Entity::find()
            .filter(genres::Column::Industry.eq(industry))
            .order_by_asc(genres::Column::Name)
            .all(&self.db)
            .await
            .context("list genres")?;
        Ok(models.into_iter().map(genre_from_model).collect())
    }

    async fn find_movie(&self, id: i32) -> Result<Option<Movie>, SessionsServiceError> {
        let Some(model) = movies::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find movie")?
        else {
            return Ok(None);
        };
        let mut tags = self.load_tags(&[id]).await?;
        Ok(Some(movie_from_model(
            model,
            tags.remove(&id).unwrap_or_default(),
        )))
    }

    async fn find_movies(&self, ids: &[i32]) -> Result<Vec<Movie>, SessionsServiceError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = movies::Entity::find()
            .filter(movies::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find movies")?;
        let mut tags = self.load_tags(ids).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let movie_tags = tags.remove(&m.id).unwrap_or_default();
                movie_from_model(m, movie_tags)
            })
            .collect())
    }

    async fn list_candidates(
        &self,
        genre_id: i32,
        industry: Option<&str>,
        exclude_movie_ids: &[i32],
        limit: u64,
    ) -> Result<Vec<Movie>, SessionsServiceError> {
        let mut query = movies::Entity::find()
            .join(JoinType::InnerJoin, movies::Relation::MovieGenres.def())
            .filter(movie_genres::Column::GenreId.eq(genre_id));
        if let Some(industry) = industry {
            query = query
                .join(JoinType::InnerJoin, movie_genres::Relation::Genre.def())
                .filter(genres::Column::Industry.eq(industry));
        }
        if !exclude_movie_ids.is_empty() {
            query = query.filter(movies::Column::Id.is_not_in(exclude_movie_ids.iter().copied()));
        }
        let models = query
            .distinct()
            .limit(limit)
            .all(&self.db)
            .await
            .context("list deck candidates")?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut tags = self.load_tags(&ids).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let movie_tags = tags.remove(&m.id).unwrap_or_default();
                movie_from_model(m, movie_tags)
            })
            .collect())
    }

    async fn outgoing_relations(
        &self,
        from_tags: &[String],
    ) -> Result<Vec<TagRelation>, SessionsServiceError> {
        if from_tags.is_empty() {
            return Ok(vec![]);
        }
        let models = tag_relations::Entity::find()
            .filter(tag_relations::Column::FromTag.is_in(from_tags.iter().cloned()))
            .all(&self.db)
            .await
            .context("load tag relations")?;
        Ok(models
            .into_iter()
            .map(|m| TagRelation {
                from_tag: m.from_tag,
                to_tag: m.to_tag,
                weight: m.weight,
            })
            .collect())
    }
}

impl DbCatalogRepository {
    async fn load_tags(
        &self,
        movie_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<String>>, SessionsServiceError> {
        if movie_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = movie_tags::Entity::find()
            .filter(movie_tags::Column::MovieId.is_in(movie_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("load movie tags")?;
        let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
        for row in rows {
            grouped.entry(row.movie_id).or_default().push(row.tag);
        }
        Ok(grouped)
    }
}

fn genre_from_model(model: genres::Model) -> Genre {
    Genre {
        id: model.id,
        tmdb_id: model.tmdb_id,
        name: model.name,
        industry: model.industry,
    }
}

fn movie_from_model(model: movies::Model, tags: Vec<String>) -> Movie {
    Movie {
        id: model.id,
        tmdb_id: model.tmdb_id,
        title: model.title,
        overview: model.overview,
        release_date: model.release_date,
        rating: model.rating,
        language: model.language,
        tags,
    }
}

// ── Swipe repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSwipeRepository {
    pub db: DatabaseConnection,
}

impl SwipeRepository for DbSwipeRepository {
    async fn insert_if_absent(&self, swipe: &Swipe) -> Result<bool, SessionsServiceError> {
        let am = swipes::ActiveModel {
            user_id: Set(swipe.user_id),
            session_id: Set(swipe.session_id),
            movie_id: Set(swipe.movie_id),
            reaction: Set(swipe.reaction.as_str().to_owned()),
            created_at: Set(swipe.created_at),
        };
        let inserted = swipes::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([
                    swipes::Column::UserId,
                    swipes::Column::SessionId,
                    swipes::Column::MovieId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert swipe")?;
        Ok(inserted > 0)
    }

    async fn find(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<Option<Swipe>, SessionsServiceError> {
        let model = swipes::Entity::find_by_id((user_id, session_id, movie_id))
            .one(&self.db)
            .await
            .context("find swipe")?;
        Ok(model.and_then(swipe_from_model))
    }

    async fn delete(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<bool, SessionsServiceError> {
        let result = swipes::Entity::delete_many()
            .filter(swipes::Column::UserId.eq(user_id))
            .filter(swipes::Column::SessionId.eq(session_id))
            .filter(swipes::Column::MovieId.eq(movie_id))
            .exec(&self.db)
            .await
            .context("delete swipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn swiped_movie_ids(&self, session_id: Uuid) -> Result<Vec<i32>, SessionsServiceError> {
        let ids: Vec<i32> = swipes::Entity::find()
            .select_only()
            .column(swipes::Column::MovieId)
            .filter(swipes::Column::SessionId.eq(session_id))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .context("list swiped movie ids")?;
        Ok(ids)
    }

    async fn likers(
        &self,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<Vec<Uuid>, SessionsServiceError> {
        let ids: Vec<Uuid> = swipes::Entity::find()
            .select_only()
            .column(swipes::Column::UserId)
            .filter(swipes::Column::SessionId.eq(session_id))
            .filter(swipes::Column::MovieId.eq(movie_id))
            .filter(swipes::Column::Reaction.eq(Reaction::Like.as_str()))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .context("list likers")?;
        Ok(ids)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Swipe>, SessionsServiceError> {
        let page = page.clamped();
        let mut query = swipes::Entity::find().filter(swipes::Column::UserId.eq(user_id));
        if let Some(session_id) = session_id {
            query = query.filter(swipes::Column::SessionId.eq(session_id));
        }
        let models = query
            .order_by_desc(swipes::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list swipes for user")?;
        Ok(models.into_iter().filter_map(swipe_from_model).collect())
    }
}

fn swipe_from_model(model: swipes::Model) -> Option<Swipe> {
    Some(Swipe {
        user_id: model.user_id,
        session_id: model.session_id,
        movie_id: model.movie_id,
        reaction: Reaction::from_str(&model.reaction)?,
        created_at: model.created_at,
    })
}

// ── Match repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMatchRepository {
    pub db: DatabaseConnection,
}

impl MatchRepository for DbMatchRepository {
    async fn insert_if_absent(&self, record: &MatchRecord) -> Result<bool, SessionsServiceError> {
        let am = matches::ActiveModel {
            session_id: Set(record.session_id),
            movie_id: Set(record.movie_id),
            created_at: Set(record.created_at),
        };
        let inserted = matches::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([matches::Column::SessionId, matches::Column::MovieId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert match")?;
        Ok(inserted > 0)
    }

    async fn exists(&self, session_id: Uuid, movie_id: i32) -> Result<bool, SessionsServiceError> {
        let model = matches::Entity::find_by_id((session_id, movie_id))
            .one(&self.db)
            .await
            .context("check match existence")?;
        Ok(model.is_some())
    }

    async fn matched_movie_ids(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<i32>, SessionsServiceError> {
        let ids: Vec<i32> = matches::Entity::find()
            .select_only()
            .column(matches::Column::MovieId)
            .filter(matches::Column::SessionId.eq(session_id))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list matched movie ids")?;
        Ok(ids)
    }

    async fn list_for_sessions(
        &self,
        session_ids: &[Uuid],
    ) -> Result<Vec<MatchRecord>, SessionsServiceError> {
        if session_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = matches::Entity::find()
            .filter(matches::Column::SessionId.is_in(session_ids.iter().copied()))
            .order_by_desc(matches::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list matches for sessions")?;
        Ok(models
            .into_iter()
            .map(|m| MatchRecord {
                session_id: m.session_id,
                movie_id: m.movie_id,
                created_at: m.created_at,
            })
            .collect())
    }
}

// ── Exposure repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbExposureRepository {
    pub db: DatabaseConnection,
}

impl ExposureRepository for DbExposureRepository {
    async fn get_many(&self, movie_ids: &[i32]) -> Result<Vec<Exposure>, SessionsServiceError> {
        if movie_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = movie_exposures::Entity::find()
            .filter(movie_exposures::Column::MovieId.is_in(movie_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("load exposures")?;
        Ok(models
            .into_iter()
            .map(|m| Exposure {
                movie_id: m.movie_id,
                exposed_count: m.exposed_count,
                last_exposed_at: m.last_exposed_at,
            })
            .collect())
    }

    async fn bump(&self, movie_id: i32, now: DateTime<Utc>) -> Result<(), SessionsServiceError> {
        let am = movie_exposures::ActiveModel {
            movie_id: Set(movie_id),
            exposed_count: Set(1),
            last_exposed_at: Set(Some(now)),
        };
        movie_exposures::Entity::insert(am)
            .on_conflict(
                OnConflict::column(movie_exposures::Column::MovieId)
                    .value(
                        movie_exposures::Column::ExposedCount,
                        Expr::col((
                            movie_exposures::Entity,
                            movie_exposures::Column::ExposedCount,
                        ))
                        .add(1),
                    )
                    .value(movie_exposures::Column::LastExposedAt, Expr::value(now))
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("bump exposure")?;
        Ok(())
    }
}

// ── Taste signal repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTasteSignalRepository {
    pub db: DatabaseConnection,
}

impl TasteSignalRepository for DbTasteSignalRepository {
    async fn get_many(
        &self,
        user_id: Uuid,
        tags: &[String],
    ) -> Result<Vec<TasteSignal>, SessionsServiceError> {
        if tags.is_empty() {
            return Ok(vec![]);
        }
        let models = taste_signals::Entity::find()
            .filter(taste_signals::Column::UserId.eq(user_id))
            .filter(taste_signals::Column::Tag.is_in(tags.iter().cloned()))
            .all(&self.db)
            .await
            .context("load taste signals")?;
        Ok(models
            .into_iter()
            .map(|m| TasteSignal {
                user_id: m.user_id,
                tag: m.tag,
                like_count: m.like_count,
                dislike_count: m.dislike_count,
                last_interacted_at: m.last_interacted_at,
            })
            .collect())
    }

    async fn bump(
        &self,
        user_id: Uuid,
        tag: &str,
        reaction: Reaction,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError> {
        let (like, dislike) = match reaction {
            Reaction::Like => (1, 0),
            Reaction::Dislike => (0, 1),
        };
        let bumped_column = if reaction.is_like() {
            taste_signals::Column::LikeCount
        } else {
            taste_signals::Column::DislikeCount
        };
        let am = taste_signals::ActiveModel {
            user_id: Set(user_id),
            tag: Set(tag.to_owned()),
            like_count: Set(like),
            dislike_count: Set(dislike),
            last_interacted_at: Set(now),
        };
        taste_signals::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([taste_signals::Column::UserId, taste_signals::Column::Tag])
                    .value(
                        bumped_column,
                        Expr::col((taste_signals::Entity, bumped_column)).add(1),
                    )
                    .value(taste_signals::Column::LastInteractedAt, Expr::value(now))
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("bump taste signal")?;
        Ok(())
    }
}

// ── Chemistry repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChemistryRepository {
    pub db: DatabaseConnection,
}

impl ChemistryRepository for DbChemistryRepository {
    async fn get_for_pair(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Vec<Chemistry>, SessionsServiceError> {
        let models = pair_chemistry::Entity::find()
            .filter(pair_chemistry::Column::UserA.eq(user_a))
            .filter(pair_chemistry::Column::UserB.eq(user_b))
            .all(&self.db)
            .await
            .context("load pair chemistry")?;
        Ok(models
            .into_iter()
            .map(|m| Chemistry {
                user_a: m.user_a,
                user_b: m.user_b,
                tag: m.tag,
                swipe_count: m.swipe_count,
                match_count: m.match_count,
                last_matched_at: m.last_matched_at,
            })
            .collect())
    }

    async fn bump_swipe(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        tag: &str,
    ) -> Result<(), SessionsServiceError> {
        let am = pair_chemistry::ActiveModel {
            user_a: Set(user_a),
            user_b: Set(user_b),
            tag: Set(tag.to_owned()),
            swipe_count: Set(1),
            match_count: Set(0),
            last_matched_at: Set(None),
        };
        pair_chemistry::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([
                    pair_chemistry::Column::UserA,
                    pair_chemistry::Column::UserB,
                    pair_chemistry::Column::Tag,
                ])
                .value(
                    pair_chemistry::Column::SwipeCount,
                    Expr::col((pair_chemistry::Entity, pair_chemistry::Column::SwipeCount))
                        .add(1),
                )
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("bump chemistry swipe")?;
        Ok(())
    }

    async fn bump_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        tag: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError> {
        let am = pair_chemistry::ActiveModel {
            user_a: Set(user_a),
            user_b: Set(user_b),
            tag: Set(tag.to_owned()),
            swipe_count: Set(0),
            match_count: Set(1),
            last_matched_at: Set(Some(now)),
        };
        pair_chemistry::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([
                    pair_chemistry::Column::UserA,
                    pair_chemistry::Column::UserB,
                    pair_chemistry::Column::Tag,
                ])
                .value(
                    pair_chemistry::Column::MatchCount,
                    Expr::col((pair_chemistry::Entity, pair_chemistry::Column::MatchCount))
                        .add(1),
                )
                .value(pair_chemistry::Column::LastMatchedAt, Expr::value(now))
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("bump chemistry match")?;
        Ok(())
    }
}

// ── Stats repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStatsRepository {
    pub db: DatabaseConnection,
}

impl DbStatsRepository {
    /// Upsert a +1 on one counter column.
    async fn incr(
        &self,
        session_id: Uuid,
        column: session_stats::Column,
        what: &'static str,
    ) -> Result<(), SessionsServiceError> {
        let (swipes, matches) = if matches!(column, session_stats::Column::TotalSwipes) {
            (1, 0)
        } else {
            (0, 1)
        };
        let am = session_stats::ActiveModel {
            session_id: Set(session_id),
            total_swipes: Set(swipes),
            total_matches: Set(matches),
            duration_ms: Set(None),
            ended_by: Set(None),
            quality_score: Set(None),
            highlights: Set(None),
        };
        session_stats::Entity::insert(am)
            .on_conflict(
                OnConflict::column(session_stats::Column::SessionId)
                    .value(column, Expr::col((session_stats::Entity, column)).add(1))
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context(what)?;
        Ok(())
    }
}

impl StatsRepository for DbStatsRepository {
    async fn get(
        &self,
        session_id: Uuid,
    ) -> Result<Option<SessionStats>, SessionsServiceError> {
        let model = session_stats::Entity::find_by_id(session_id)
            .one(&self.db)
            .await
            .context("get session stats")?;
        Ok(model.map(stats_from_model))
    }

    async fn incr_swipes(&self, session_id: Uuid) -> Result<(), SessionsServiceError> {
        self.incr(
            session_id,
            session_stats::Column::TotalSwipes,
            "incr total swipes",
        )
        .await
    }

    async fn incr_matches(&self, session_id: Uuid) -> Result<(), SessionsServiceError> {
        self.incr(
            session_id,
            session_stats::Column::TotalMatches,
            "incr total matches",
        )
        .await
    }

    async fn finalize(
        &self,
        session_id: Uuid,
        duration_ms: i64,
        ended_by: EndReason,
        quality_score: i32,
        highlights: &[String],
    ) -> Result<(), SessionsServiceError> {
        let highlights_json =
            serde_json::to_value(highlights).context("serialize highlights")?;
        let am = session_stats::ActiveModel {
            session_id: Set(session_id),
            total_swipes: Set(0),
            total_matches: Set(0),
            duration_ms: Set(Some(duration_ms)),
            ended_by: Set(Some(ended_by.as_str().to_owned())),
            quality_score: Set(Some(quality_score)),
            highlights: Set(Some(highlights_json)),
        };
        // A session with zero swipes has no stats row yet; the insert arm
        // covers it, the conflict arm keeps accumulated counters intact.
        session_stats::Entity::insert(am)
            .on_conflict(
                OnConflict::column(session_stats::Column::SessionId)
                    .update_columns([
                        session_stats::Column::DurationMs,
                        session_stats::Column::EndedBy,
                        session_stats::Column::QualityScore,
                        session_stats::Column::Highlights,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("finalize session stats")?;
        Ok(())
    }
}

fn stats_from_model(model: session_stats::Model) -> SessionStats {
    SessionStats {
        session_id: model.session_id,
        total_swipes: model.total_swipes,
        total_matches: model.total_matches,
        duration_ms: model.duration_ms,
        ended_by: model.ended_by.as_deref().and_then(EndReason::from_str),
        quality_score: model.quality_score,
        highlights: model
            .highlights
            .and_then(|j| serde_json::from_value(j).ok())
            .unwrap_or_default(),
    }
}
