use super::{TodoItem, User, UserRepository};
use crate::entities::*;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;

impl From<todo_item::Model> for TodoItem {
    fn from(model: todo_item::Model) -> Self {
        TodoItem {
            id: Some(model.id),
            todo: model.todo,
            info: model.info,
            completion_time: model.completion_time,
            is_done: model.is_done,
        }
    }
}

impl From<(todo_user::Model, Vec<todo_item::Model>)> for User {
    fn from((model, todo_items): (todo_user::Model, Vec<todo_item::Model>)) -> Self {
        User {
            id: Some(model.id),
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            birthday: model.birthday,
            todo_items: todo_items.into_iter().map(TodoItem::from).collect(),
            removed_todo_item_ids: Vec::new(),
        }
    }
}

/// `UserRepository` backed by the `todo_user` and `todo_item` tables.
#[derive(Clone, Debug)]
pub struct SeaOrmUserRepository {
    db: Arc<sea_orm::DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<sea_orm::DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Loads the to-do items of a user row, ordered by insertion.
    async fn with_todo_items<C: ConnectionTrait>(
        conn: &C,
        model: todo_user::Model,
    ) -> Result<User, DbErr> {
        let todo_items = model
            .find_related(todo_item::Entity)
            .order_by_asc(todo_item::Column::Id)
            .all(conn)
            .await?;
        Ok(User::from((model, todo_items)))
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    #[tracing::instrument(skip(self, user), fields(user_id = ?user.id()))]
    async fn save(&self, user: &User) -> Result<User, DbErr> {
        let txn = self.db.begin().await?;

        let user_model = match user.id {
            Some(id) => {
                todo_user::ActiveModel {
                    id: ActiveValue::Unchanged(id),
                    username: ActiveValue::Set(user.username.clone()),
                    first_name: ActiveValue::Set(user.first_name.clone()),
                    last_name: ActiveValue::Set(user.last_name.clone()),
                    email: ActiveValue::Set(user.email.clone()),
                    birthday: ActiveValue::Set(user.birthday),
                }
                .update(&txn)
                .await?
            }
            None => {
                todo_user::ActiveModel {
                    username: ActiveValue::Set(user.username.clone()),
                    first_name: ActiveValue::Set(user.first_name.clone()),
                    last_name: ActiveValue::Set(user.last_name.clone()),
                    email: ActiveValue::Set(user.email.clone()),
                    birthday: ActiveValue::Set(user.birthday),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        // Delete only the rows removed from this copy of the aggregate.
        if !user.removed_todo_item_ids.is_empty() {
            let removed = todo_item::Entity::delete_many()
                .filter(todo_item::Column::UserId.eq(user_model.id))
                .filter(todo_item::Column::Id.is_in(user.removed_todo_item_ids.iter().copied()))
                .exec(&txn)
                .await?;
            tracing::debug!("Removed {} todo items", removed.rows_affected);
        }

        for item in user.todo_items.iter().filter(|item| item.id.is_none()) {
            todo_item::ActiveModel {
                user_id: ActiveValue::Set(user_model.id),
                todo: ActiveValue::Set(item.todo.clone()),
                info: ActiveValue::Set(item.info.clone()),
                completion_time: ActiveValue::Set(item.completion_time),
                is_done: ActiveValue::Set(item.is_done),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let saved_user = Self::with_todo_items(&txn, user_model).await?;
        txn.commit().await?;
        Ok(saved_user)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DbErr> {
        let db = self.db.as_ref();
        match todo_user::Entity::find_by_id(id).one(db).await? {
            Some(model) => Ok(Some(Self::with_todo_items(db, model).await?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<User>, DbErr> {
        let users = todo_user::Entity::find()
            .find_with_related(todo_item::Entity)
            .order_by_asc(todo_user::Column::Id)
            .order_by_asc(todo_item::Column::Id)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(User::from)
            .collect();
        Ok(users)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> Result<(), DbErr> {
        let result = todo_user::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        tracing::debug!("Deleted {} user rows", result.rows_affected);
        Ok(())
    }
}
