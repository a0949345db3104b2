use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use tokio::task;

use super::mapper::TermMapper;
use crate::modules::dictionary::domain::{
    entities::{Term, TermRelationship},
    repositories::TermRepository,
    value_objects::{Category, RelationshipType, TermId},
};
use crate::modules::dictionary::infrastructure::models::{TermModel, TermRelationshipModel};
use crate::schema::{term_relationships, terms};
use crate::shared::application::pagination::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::shared::Database;
use crate::{log_debug, log_error};

/// PostgreSQL-backed term repository.
///
/// Diesel is synchronous, so every call runs on the blocking pool with its own
/// pooled connection. Multi-statement writes run inside one transaction.
pub struct TermRepositoryImpl {
    db: Arc<Database>,
}

impl TermRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Run `f` on the blocking pool with a pooled connection
    async fn with_connection<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> AppResult<T> {
            let mut conn = db.get_connection()?;
            f(&mut conn)
        })
        .await?
        .map_err(|e| {
            if matches!(e, AppError::DatabaseError(_)) {
                log_error!("Term storage failure: {}", e);
            }
            e
        })
    }

    // -------------------------------------------------------------------------
    // Blocking helpers (run inside spawn_blocking)
    // -------------------------------------------------------------------------

    /// Attach outgoing relationship ids to each row and map to domain terms
    fn load_terms(conn: &mut PgConnection, models: Vec<TermModel>) -> AppResult<Vec<Term>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let edges: Vec<(i32, i32)> = term_relationships::table
            .filter(term_relationships::term_id.eq_any(ids))
            .select((
                term_relationships::term_id,
                term_relationships::related_term_id,
            ))
            .load::<(i32, i32)>(conn)?;

        let mut related: HashMap<i32, Vec<i32>> = HashMap::new();
        for (from, to) in edges {
            related.entry(from).or_default().push(to);
        }

        models
            .into_iter()
            .map(|model| {
                let related_ids = related.remove(&model.id).unwrap_or_default();
                TermMapper::to_domain(model, related_ids)
            })
            .collect()
    }

    fn load_term(conn: &mut PgConnection, id: i32) -> AppResult<Option<Term>> {
        let model = terms::table
            .find(id)
            .select(TermModel::as_select())
            .first::<TermModel>(conn)
            .optional()?;

        match model {
            Some(model) => Ok(Self::load_terms(conn, vec![model])?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Make the outgoing edge set of `term_id` equal `desired`, keeping existing rows
    fn sync_relationships(conn: &mut PgConnection, term_id: i32, desired: Vec<i32>) -> AppResult<()> {
        Self::require_terms(conn, &desired)?;

        let removed = diesel::delete(
            term_relationships::table
                .filter(term_relationships::term_id.eq(term_id))
                .filter(term_relationships::related_term_id.ne_all(desired.clone())),
        )
        .execute(conn)?;

        if desired.is_empty() {
            log_debug!("Cleared {} relationships of term {}", removed, term_id);
            return Ok(());
        }

        let rows: Vec<TermRelationshipModel> = desired
            .into_iter()
            .map(|related_id| {
                TermRelationshipModel::new(term_id, related_id, Some(RelationshipType::SeeAlso))
            })
            .collect();

        let inserted = diesel::insert_into(term_relationships::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(conn)?;

        log_debug!(
            "Synced relationships of term {}: {} removed, {} added",
            term_id,
            removed,
            inserted
        );
        Ok(())
    }

    /// Fail with `NotFound` naming the first id that has no row
    fn require_terms(conn: &mut PgConnection, ids: &[i32]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let found: Vec<i32> = terms::table
            .filter(terms::id.eq_any(ids.to_vec()))
            .select(terms::id)
            .load::<i32>(conn)?;

        match ids.iter().find(|id| !found.contains(*id)) {
            Some(missing) => Err(AppError::NotFound(format!(
                "Term with ID {} not found",
                missing
            ))),
            None => Ok(()),
        }
    }

    /// Keep the serial sequence ahead of explicitly inserted ids
    fn bump_id_sequence(conn: &mut PgConnection) -> AppResult<()> {
        diesel::sql_query(
            "SELECT setval(pg_get_serial_sequence('terms', 'id'), \
             (SELECT COALESCE(MAX(id), 1) FROM terms))",
        )
        .execute(conn)?;
        Ok(())
    }

    fn upsert_edge(
        conn: &mut PgConnection,
        edge: &TermRelationshipModel,
    ) -> AppResult<usize> {
        Ok(diesel::insert_into(term_relationships::table)
            .values(edge)
            .on_conflict((
                term_relationships::term_id,
                term_relationships::related_term_id,
            ))
            .do_update()
            .set((
                term_relationships::relationship_type
                    .eq(excluded(term_relationships::relationship_type)),
                term_relationships::updated_at.eq(excluded(term_relationships::updated_at)),
            ))
            .execute(conn)?)
    }

    /// `%` and `_` in user input are matched literally
    fn like_pattern(partial: &str) -> String {
        let escaped = partial
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    }
}

#[async_trait]
impl TermRepository for TermRepositoryImpl {
    async fn find_by_id(&self, id: TermId) -> AppResult<Option<Term>> {
        self.with_connection(move |conn| Self::load_term(conn, id.get()))
            .await
    }

    async fn find_by_exact_term(&self, term: &str) -> AppResult<Vec<Term>> {
        let needle = term.to_string();

        self.with_connection(move |conn| {
            let models = terms::table
                .filter(terms::term.eq(needle))
                .select(TermModel::as_select())
                .order(terms::id.asc())
                .load::<TermModel>(conn)?;
            Self::load_terms(conn, models)
        })
        .await
    }

    async fn search_by_term(&self, partial: &str) -> AppResult<Vec<Term>> {
        let pattern = Self::like_pattern(partial);

        let timer = TimedOperation::start("terms.search_by_term");
        let results = self
            .with_connection(move |conn| {
                let models = terms::table
                    .filter(terms::term.ilike(pattern))
                    .select(TermModel::as_select())
                    .order((terms::term.asc(), terms::id.asc()))
                    .load::<TermModel>(conn)?;
                Self::load_terms(conn, models)
            })
            .await?;
        timer.finish(results.len());
        Ok(results)
    }

    async fn find_by_category(&self, category: Category) -> AppResult<Vec<Term>> {
        self.with_connection(move |conn| {
            let models = terms::table
                .filter(terms::category.eq(category))
                .select(TermModel::as_select())
                .order((terms::term.asc(), terms::id.asc()))
                .load::<TermModel>(conn)?;
            Self::load_terms(conn, models)
        })
        .await
    }

    async fn find_related_terms(&self, id: TermId) -> AppResult<Vec<Term>> {
        let id = id.get();

        self.with_connection(move |conn| {
            let related_ids = term_relationships::table
                .filter(term_relationships::term_id.eq(id))
                .select(term_relationships::related_term_id);

            let models = terms::table
                .filter(terms::id.eq_any(related_ids))
                .select(TermModel::as_select())
                .order((terms::term.asc(), terms::id.asc()))
                .load::<TermModel>(conn)?;
            Self::load_terms(conn, models)
        })
        .await
    }

    async fn find_relationships(&self, id: TermId) -> AppResult<Vec<TermRelationship>> {
        let id = id.get();

        self.with_connection(move |conn| {
            let rows = term_relationships::table
                .filter(term_relationships::term_id.eq(id))
                .select(TermRelationshipModel::as_select())
                .order(term_relationships::related_term_id.asc())
                .load::<TermRelationshipModel>(conn)?;

            rows.into_iter()
                .map(TermMapper::relationship_to_domain)
                .collect()
        })
        .await
    }

    async fn find_all(&self, pagination: PaginationParams) -> AppResult<PaginatedResult<Term>> {
        self.with_connection(move |conn| {
            let total = terms::table.count().get_result::<i64>(conn)?;

            let models = terms::table
                .select(TermModel::as_select())
                .order((terms::term.asc(), terms::id.asc()))
                .limit(pagination.limit())
                .offset(pagination.offset())
                .load::<TermModel>(conn)?;

            let items = Self::load_terms(conn, models)?;
            Ok(PaginatedResult::new(items, total as u64, &pagination))
        })
        .await
    }

    async fn save(&self, term: &Term) -> AppResult<Term> {
        let term = term.clone();
        let timer = TimedOperation::start("terms.save");

        let saved = self
            .with_connection(move |conn| {
                conn.transaction::<_, AppError, _>(|conn| {
                    let model = match term.id() {
                        None => diesel::insert_into(terms::table)
                            .values(&TermMapper::to_new_model(&term))
                            .returning(TermModel::as_returning())
                            .get_result::<TermModel>(conn)?,
                        Some(id) => {
                            let exists = terms::table
                                .find(id.get())
                                .count()
                                .get_result::<i64>(conn)?
                                > 0;

                            if exists {
                                diesel::update(terms::table.find(id.get()))
                                    .set(&TermMapper::to_changeset(&term))
                                    .returning(TermModel::as_returning())
                                    .get_result::<TermModel>(conn)?
                            } else {
                                let inserted = diesel::insert_into(terms::table)
                                    .values(&TermMapper::to_model(&term, id))
                                    .returning(TermModel::as_returning())
                                    .get_result::<TermModel>(conn)?;
                                Self::bump_id_sequence(conn)?;
                                inserted
                            }
                        }
                    };

                    let desired: Vec<i32> =
                        term.related_term_ids().iter().map(|id| id.get()).collect();
                    Self::sync_relationships(conn, model.id, desired)?;

                    Self::load_term(conn, model.id)?.ok_or_else(|| {
                        AppError::InternalError("Failed to retrieve saved term".into())
                    })
                })
            })
            .await?;

        timer.finish(1 + saved.related_term_ids().len());
        Ok(saved)
    }

    async fn update(&self, term: &Term) -> AppResult<Term> {
        let id = term.persisted_id()?.get();
        let changeset = TermMapper::to_changeset(term);
        let timer = TimedOperation::start("terms.update");

        let updated = self
            .with_connection(move |conn| {
                // Row only; edges stay as stored
                let model = diesel::update(terms::table.find(id))
                    .set(&changeset)
                    .returning(TermModel::as_returning())
                    .get_result::<TermModel>(conn)
                    .optional()?
                    .ok_or_else(|| AppError::NotFound(format!("Term with ID {} not found", id)))?;
                Ok(Self::load_terms(conn, vec![model])?.into_iter().next())
            })
            .await?
            .ok_or_else(|| AppError::InternalError("Failed to retrieve updated term".into()))?;

        timer.finish(1);
        Ok(updated)
    }

    async fn delete(&self, id: TermId) -> AppResult<bool> {
        let id = id.get();
        let timer = TimedOperation::start("terms.delete");

        let deleted = self.with_connection(move |conn| {
            conn.transaction::<_, AppError, _>(|conn| {
                let edges = diesel::delete(
                    term_relationships::table.filter(
                        term_relationships::term_id
                            .eq(id)
                            .or(term_relationships::related_term_id.eq(id)),
                    ),
                )
                .execute(conn)?;

                let deleted = diesel::delete(terms::table.find(id)).execute(conn)?;
                log_debug!("Deleted term {} ({} rows) and {} edges", id, deleted, edges);
                Ok(deleted > 0)
            })
        })
        .await?;

        timer.finish(usize::from(deleted));
        Ok(deleted)
    }

    async fn add_relationship(
        &self,
        term_id: TermId,
        related_term_id: TermId,
        relationship_type: Option<RelationshipType>,
    ) -> AppResult<()> {
        let edge = TermRelationshipModel::new(term_id.get(), related_term_id.get(), relationship_type);
        let timer = TimedOperation::start("term_relationships.add");

        let inserted = self
            .with_connection(move |conn| {
                Ok(diesel::insert_into(term_relationships::table)
                    .values(&edge)
                    .on_conflict_do_nothing()
                    .execute(conn)?)
            })
            .await?;

        timer.finish(inserted);
        Ok(())
    }

    async fn remove_relationship(
        &self,
        term_id: TermId,
        related_term_id: TermId,
    ) -> AppResult<()> {
        let (from, to) = (term_id.get(), related_term_id.get());
        let timer = TimedOperation::start("term_relationships.remove");

        let removed = self
            .with_connection(move |conn| {
                Ok(diesel::delete(
                    term_relationships::table
                        .filter(term_relationships::term_id.eq(from))
                        .filter(term_relationships::related_term_id.eq(to)),
                )
                .execute(conn)?)
            })
            .await?;

        timer.finish(removed);
        Ok(())
    }

    async fn link(
        &self,
        a: TermId,
        b: TermId,
        relationship_type: RelationshipType,
    ) -> AppResult<()> {
        let forward = TermRelationshipModel::new(a.get(), b.get(), Some(relationship_type));
        let reverse = TermRelationshipModel::new(b.get(), a.get(), Some(relationship_type.inverse()));

        let timer = TimedOperation::start("term_relationships.link");

        let written = self
            .with_connection(move |conn| {
                conn.transaction::<_, AppError, _>(|conn| {
                    Ok(Self::upsert_edge(conn, &forward)? + Self::upsert_edge(conn, &reverse)?)
                })
            })
            .await?;

        LogContext::edge_change("linked", a, b, written);
        timer.finish(written);
        Ok(())
    }

    async fn unlink(&self, a: TermId, b: TermId) -> AppResult<()> {
        let (a, b) = (a.get(), b.get());
        let timer = TimedOperation::start("term_relationships.unlink");

        let removed = self
            .with_connection(move |conn| {
                Ok(diesel::delete(
                    term_relationships::table.filter(
                        term_relationships::term_id
                            .eq(a)
                            .and(term_relationships::related_term_id.eq(b))
                            .or(term_relationships::term_id
                                .eq(b)
                                .and(term_relationships::related_term_id.eq(a))),
                    ),
                )
                .execute(conn)?)
            })
            .await?;

        LogContext::edge_change("unlinked", a, b, removed);
        timer.finish(removed);
        Ok(())
    }
}
