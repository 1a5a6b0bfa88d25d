//! MongoDB-backed bucket storage.
//!
//! Each bucket kind is its own collection holding `{ userId, pets: [...] }`
//! documents. Every call is bounded by `op_timeout`; a timeout surfaces as
//! `RepositoryError::Timeout` and is never retried.

use std::{future::IntoFuture, time::Duration};

use async_trait::async_trait;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, doc},
    options::IndexOptions,
};

use super::{BucketRepository, RepositoryError, RepositoryResult};
use crate::models::bucket::{BucketDocument, BucketKind};

#[derive(Clone)]
pub struct MongoBucketRepository {
    db: Database,
    collection: Collection<BucketDocument>,
    op_timeout: Duration,
}

impl MongoBucketRepository {
    pub fn new(db: &Database, kind: BucketKind, op_timeout: Duration) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection::<BucketDocument>(kind.collection()),
            op_timeout,
        }
    }

    /// Create the unique `userId` index. Without it two concurrent
    /// first-time upserts for one user can each insert a document.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let create = self.collection.create_index(user_index());
        self.bounded("ensure_indexes", create).await?;
        Ok(())
    }

    async fn bounded<F, T>(&self, op: &'static str, fut: F) -> RepositoryResult<T>
    where
        F: IntoFuture<Output = mongodb::error::Result<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut.into_future()).await {
            Ok(res) => res.map_err(RepositoryError::from),
            Err(_) => Err(RepositoryError::Timeout {
                op,
                after: self.op_timeout,
            }),
        }
    }
}

/// One document per user.
fn user_index() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { "userId": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

#[async_trait]
impl BucketRepository for MongoBucketRepository {
    async fn add_pet(&self, user_id: i64, pet_id: i64) -> RepositoryResult<()> {
        let update = self
            .collection
            .update_one(doc! { "userId": user_id }, doc! { "$push": { "pets": pet_id } })
            .upsert(true);
        self.bounded("add_pet", update).await?;
        Ok(())
    }

    async fn remove_pet(&self, user_id: i64, pet_id: i64) -> RepositoryResult<()> {
        // `$pull` drops every match, so unset the first positional match and
        // then pull the resulting null.
        let unset = self.collection.update_one(
            doc! { "userId": user_id, "pets": pet_id },
            doc! { "$unset": { "pets.$": 1 } },
        );
        let result = self.bounded("remove_pet", unset).await?;
        if result.matched_count == 0 {
            return Ok(());
        }

        let pull = self.collection.update_one(
            doc! { "userId": user_id },
            doc! { "$pull": { "pets": Bson::Null } },
        );
        self.bounded("remove_pet", pull).await?;
        Ok(())
    }

    async fn find_by_user(&self, user_id: i64) -> RepositoryResult<Option<BucketDocument>> {
        let find = self.collection.find_one(doc! { "userId": user_id });
        self.bounded("find_by_user", find).await
    }

    async fn ping(&self) -> RepositoryResult<()> {
        let ping = self.db.run_command(doc! { "ping": 1 });
        self.bounded("ping", ping).await?;
        Ok(())
    }
}
