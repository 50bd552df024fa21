use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

pub mod api;
pub mod repository;

/// A user together with the to-do items it owns.
///
/// A `User` without an ID has not been persisted yet.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct User {
    id: Option<i64>,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    birthday: NaiveDate,
    todo_items: Vec<TodoItem>,
    removed_todo_item_ids: Vec<i64>,
}

impl User {
    /// Creates a new, unpersisted user with no to-do items.
    pub fn new(
        username: String,
        first_name: String,
        last_name: String,
        email: String,
        birthday: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            username,
            first_name,
            last_name,
            email,
            birthday,
            todo_items: Vec::new(),
            removed_todo_item_ids: Vec::new(),
        }
    }

    /// Returns the ID of the user, if it has been persisted.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn birthday(&self) -> NaiveDate {
        self.birthday
    }

    /// Returns the to-do items owned by the user, in insertion order.
    pub fn todo_items(&self) -> &[TodoItem] {
        &self.todo_items
    }

    /// Appends a to-do item to the user's collection.
    pub fn add_todo_item(&mut self, todo_item: TodoItem) {
        self.todo_items.push(todo_item);
    }

    /// Removes every to-do item with the given ID from the user's collection.
    ///
    /// The ID is remembered so that saving the user deletes only rows removed from this copy.
    pub fn remove_todo_items(&mut self, todo_item_id: i64) {
        let count = self.todo_items.len();
        self.todo_items
            .retain(|todo_item| todo_item.id != Some(todo_item_id));
        if self.todo_items.len() < count && !self.removed_todo_item_ids.contains(&todo_item_id) {
            self.removed_todo_item_ids.push(todo_item_id);
        }
    }

    /// Returns the IDs of persisted to-do items removed since the user was loaded.
    pub fn removed_todo_item_ids(&self) -> &[i64] {
        &self.removed_todo_item_ids
    }

    /// Returns copies of the to-do items whose completion flag equals `is_done`.
    pub fn todo_items_with_status(&self, is_done: bool) -> Vec<TodoItem> {
        self.todo_items
            .iter()
            .filter(|todo_item| todo_item.is_done == is_done)
            .cloned()
            .collect()
    }
}

/// A single to-do item. Ownership is expressed by the `User` holding it.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct TodoItem {
    id: Option<i64>,
    todo: String,
    info: String,
    completion_time: NaiveDateTime,
    is_done: bool,
}

impl TodoItem {
    /// Creates a new, unpersisted to-do item.
    pub fn new(todo: String, info: String, completion_time: NaiveDateTime, is_done: bool) -> Self {
        Self {
            id: None,
            todo,
            info,
            completion_time,
            is_done,
        }
    }

    /// Returns the ID of the to-do item, if it has been persisted.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn todo(&self) -> &str {
        &self.todo
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn completion_time(&self) -> NaiveDateTime {
        self.completion_time
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }
}

/// Error type for UserService operations.
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Represents a lookup of a user ID that does not exist.
    #[error("User with id: [{0}] not found")]
    UserNotFound(i64),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Trait defining persistence operations for the user aggregate.
///
/// A user is always loaded together with its to-do items and saved as a whole.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists the whole aggregate and returns it as stored, with IDs assigned.
    ///
    /// To-do items removed from the aggregate since it was loaded are deleted, items without an ID
    /// are inserted. Rows the aggregate never loaded are left untouched.
    async fn save(&self, user: &User) -> Result<User, sea_orm::DbErr>;

    /// Loads a user and its to-do items.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, sea_orm::DbErr>;

    /// Loads every user with its to-do items.
    async fn find_all(&self) -> Result<Vec<User>, sea_orm::DbErr>;

    /// Deletes a user and its to-do items. Deleting an unknown ID is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<(), sea_orm::DbErr>;
}

/// Shared state for the user handlers.
#[derive(Clone)]
pub struct UserState {
    pub repository: Arc<dyn UserRepository>,
}

impl UserState {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Creates a `UserService` over the shared repository.
    pub fn user_service(&self) -> UserService {
        UserService::new(self.repository.clone())
    }
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Saves a new user with an empty to-do item collection.
    ///
    /// # Arguments
    ///
    /// * `user` - The user to save. Any ID or to-do items it carries are ignored.
    ///
    /// # Returns
    ///
    /// An empty `Result` if successful, or an error otherwise.
    #[tracing::instrument(skip(self, user))]
    pub async fn save_user(&self, user: User) -> Result<(), UserServiceError> {
        tracing::info!("Saving new user with username: [{}]", user.username());
        let new_user = User::new(
            user.username,
            user.first_name,
            user.last_name,
            user.email,
            user.birthday,
        );
        let saved_user = self.repository.save(&new_user).await?;
        tracing::info!(
            "User with username: [{}] saved successfully user id: [{}]",
            saved_user.username(),
            saved_user.id().unwrap_or_default()
        );
        Ok(())
    }

    /// Retrieves a user by its ID.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The ID of the user to retrieve.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `User` if found, or `UserNotFound` otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, user_id: i64) -> Result<User, UserServiceError> {
        tracing::info!("Getting user with id: [{}]", user_id);
        self.find_user(user_id).await
    }

    /// Deletes a user and all of its to-do items. Unknown IDs are ignored.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, user_id: i64) -> Result<(), UserServiceError> {
        tracing::info!("Deleting user with id: [{}]", user_id);
        self.repository.delete_by_id(user_id).await?;
        Ok(())
    }

    /// Retrieves all users with their to-do items.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_users(&self) -> Result<Vec<User>, UserServiceError> {
        tracing::info!("Getting all users");
        Ok(self.repository.find_all().await?)
    }

    /// Adds a to-do item to an existing user.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The ID of the user who will own the item.
    /// * `todo_item` - The item to add.
    ///
    /// # Returns
    ///
    /// An empty `Result` if successful, or `UserNotFound` if the user does not exist.
    #[tracing::instrument(skip(self, todo_item))]
    pub async fn add_todo_item_to_user(
        &self,
        user_id: i64,
        todo_item: TodoItem,
    ) -> Result<(), UserServiceError> {
        tracing::info!("Adding new todoItem to user with id: [{}]", user_id);
        let mut user = self.find_user(user_id).await?;
        user.add_todo_item(todo_item);
        self.repository.save(&user).await?;
        tracing::info!("TodoItem successfully added to user with id: [{}]", user_id);
        Ok(())
    }

    /// Removes every to-do item with the given ID from an existing user.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The ID of the user owning the item.
    /// * `todo_item_id` - The ID of the item to remove.
    ///
    /// # Returns
    ///
    /// An empty `Result` if successful, or `UserNotFound` if the user does not exist.
    /// Removing an item the user does not own is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn delete_todo_item_from_user(
        &self,
        user_id: i64,
        todo_item_id: i64,
    ) -> Result<(), UserServiceError> {
        tracing::info!(
            "Deleting todoItem with id: [{}] from user with id: [{}] started",
            todo_item_id,
            user_id
        );
        let mut user = self.find_user(user_id).await?;
        user.remove_todo_items(todo_item_id);
        self.repository.save(&user).await?;
        tracing::info!(
            "Deleting todoItem with id: [{}] from user with id: [{}] succeeded",
            todo_item_id,
            user_id
        );
        Ok(())
    }

    /// Retrieves the done to-do items of an existing user.
    #[tracing::instrument(skip(self))]
    pub async fn get_done_todo_items_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<TodoItem>, UserServiceError> {
        tracing::info!("Getting all done todoItems for a user with id: [{}]", user_id);
        let user = self.find_user(user_id).await?;
        Ok(user.todo_items_with_status(true))
    }

    /// Retrieves the not done to-do items of an existing user.
    #[tracing::instrument(skip(self))]
    pub async fn get_not_done_todo_items_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<TodoItem>, UserServiceError> {
        tracing::info!(
            "Getting all not done todoItems for a user with id: [{}]",
            user_id
        );
        let user = self.find_user(user_id).await?;
        Ok(user.todo_items_with_status(false))
    }

    async fn find_user(&self, user_id: i64) -> Result<User, UserServiceError> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserServiceError::UserNotFound(user_id))
    }
}
