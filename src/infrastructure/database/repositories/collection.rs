//! Generic document collection over a SeaORM entity
//!
//! Every resource the API exposes follows the same find/insert/update/delete
//! shape, so the data access layer is written once and instantiated per
//! entity. Handlers stay thin: they validate, call into their `Collection`
//! and map models to response DTOs.

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect,
};
use sea_orm::sea_query::SimpleExpr;

use super::super::entities::{
    alert, known_face, recognition, scheduled_report, system_settings, user,
};

/// A typed view over one database table, shared across request handlers.
///
/// Holds a clone of the process-wide connection pool; constructing one is
/// cheap and performs no I/O.
#[derive(Clone)]
pub struct Collection<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> Collection<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// All documents, in storage order
    pub async fn find_all(&self) -> Result<Vec<E::Model>, DbErr> {
        E::find().all(&self.db).await
    }

    /// Look up a single document by primary key
    pub async fn find_by_id(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(&self.db).await
    }

    /// First document matching the filter expression
    pub async fn find_one_where(&self, filter: SimpleExpr) -> Result<Option<E::Model>, DbErr> {
        E::find().filter(filter).one(&self.db).await
    }

    /// Most recent documents, ordered by the given column descending
    pub async fn find_recent(
        &self,
        order_column: E::Column,
        limit: u64,
    ) -> Result<Vec<E::Model>, DbErr> {
        E::find()
            .order_by_desc(order_column)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Number of documents in the collection
    pub async fn count(&self) -> Result<u64, DbErr>
    where
        E::Model: FromQueryResult + Send + Sync,
    {
        E::find().count(&self.db).await
    }

    /// Insert a new document
    pub async fn insert<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: sea_orm::IntoActiveModel<A>,
    {
        model.insert(&self.db).await
    }

    /// Update an existing document
    pub async fn update<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: sea_orm::IntoActiveModel<A>,
    {
        model.update(&self.db).await
    }

    /// Delete by primary key; returns the number of affected rows
    pub async fn delete_by_id(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<u64, DbErr> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

/// One `Collection` per resource, built once at startup from the shared
/// connection pool and injected into the router state.
#[derive(Clone)]
pub struct Collections {
    pub users: Collection<user::Entity>,
    pub known_faces: Collection<known_face::Entity>,
    pub settings: Collection<system_settings::Entity>,
    pub reports: Collection<scheduled_report::Entity>,
    pub recognitions: Collection<recognition::Entity>,
    pub alerts: Collection<alert::Entity>,
}

impl Collections {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Collection::new(db.clone()),
            known_faces: Collection::new(db.clone()),
            settings: Collection::new(db.clone()),
            reports: Collection::new(db.clone()),
            recognitions: Collection::new(db.clone()),
            alerts: Collection::new(db),
        }
    }
}
