//! SeaORM-backed gateway to the task store.
//!
//! Every successful write is followed by a [`ChangeNotification`] on a broadcast
//! channel, which is what [`DataGateway::subscribe`] hands out.

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseBackend,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Schema, Set,
    sea_query::{Expr, PostgresQueryBuilder, SqliteQueryBuilder},
};
use tokio::sync::broadcast;

use crate::error::RemoteError;
use crate::gateway::{ChangeStream, DataGateway};
use crate::messages::{ChangeNotification, WriteKind};
use crate::model::{NewTask, Task, TaskPatch};

pub const TASKS_TABLE: &str = "tasks";

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// The `tasks` table.
pub mod task {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tasks")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub title: String,
        pub description: String,
        pub completed: bool,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            created_at: model.created_at,
        }
    }
}

/// A SeaORM connection to the task store that broadcasts a change
/// notification after each write.
pub struct SeaOrmGateway {
    inner: DatabaseConnection,
    change_tx: broadcast::Sender<ChangeNotification>,
}

impl SeaOrmGateway {
    /// Connect to `url` and create the `tasks` table if it does not exist.
    pub async fn connect(url: &str) -> Result<Self, RemoteError> {
        let opts = ConnectOptions::new(url);
        let inner = Database::connect(opts).await?;
        Self::from_connection(inner).await
    }

    /// Wrap an existing connection, creating the `tasks` table if needed.
    pub async fn from_connection(inner: DatabaseConnection) -> Result<Self, RemoteError> {
        create_tasks_table(&inner).await?;
        let (change_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self { inner, change_tx })
    }

    /// Get a reference to the underlying SeaORM connection.
    /// Writes made through it bypass change notifications.
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Broadcast a change notification. Having no subscribers is not an error.
    pub fn notify_change(&self, notification: ChangeNotification) {
        log::debug!(
            "{} on {} ({})",
            notification.kind.as_str(),
            notification.table,
            notification.primary_key
        );
        let _ = self.change_tx.send(notification);
    }

    fn notify(&self, kind: WriteKind, id: &str) {
        self.notify_change(ChangeNotification::new(TASKS_TABLE, kind, id));
    }
}

async fn create_tasks_table(db: &DatabaseConnection) -> Result<(), RemoteError> {
    let backend = db.get_database_backend();
    let stmt = Schema::new(backend)
        .create_table_from_entity(task::Entity)
        .if_not_exists()
        .to_owned();
    let sql = match backend {
        DatabaseBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
        DatabaseBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
        other => {
            return Err(RemoteError::Unavailable(format!(
                "unsupported database backend: {other:?}"
            )));
        }
    };
    db.execute_unprepared(&sql).await?;
    Ok(())
}

#[async_trait]
impl DataGateway for SeaOrmGateway {
    async fn query_all(&self) -> Result<Vec<Task>, RemoteError> {
        let rows = task::Entity::find()
            .order_by_desc(task::Column::CreatedAt)
            .all(&self.inner)
            .await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn insert(&self, new: NewTask) -> Result<Option<Task>, RemoteError> {
        let model = task::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(new.title().to_string()),
            description: Set(new.description().to_string()),
            completed: Set(false),
            created_at: Set(Utc::now().trunc_subsecs(6)),
        };
        let created = model.insert(&self.inner).await?;
        self.notify(WriteKind::Insert, &created.id);
        Ok(Some(created.into()))
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<(), RemoteError> {
        if patch.is_empty() {
            // Nothing to write; still report a missing row.
            return match task::Entity::find_by_id(id.to_string()).one(&self.inner).await? {
                Some(_) => Ok(()),
                None => Err(RemoteError::NotFound(id.to_string())),
            };
        }

        let mut update = task::Entity::update_many().filter(task::Column::Id.eq(id));
        if let Some(completed) = patch.completed {
            update = update.col_expr(task::Column::Completed, Expr::value(completed));
        }
        let result = update.exec(&self.inner).await?;
        if result.rows_affected == 0 {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        self.notify(WriteKind::Update, id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let result = task::Entity::delete_by_id(id.to_string())
            .exec(&self.inner)
            .await?;
        if result.rows_affected > 0 {
            self.notify(WriteKind::Delete, id);
        }
        Ok(())
    }

    async fn subscribe(&self) -> Result<ChangeStream, RemoteError> {
        Ok(self.change_tx.subscribe())
    }
}
