use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{EntityTrait, PaginatorTrait};
use todoapp_server::entities::{todo_item, todo_user};
use todoapp_server::user::{TodoItem, User, UserRepository};

mod common;

fn john_doe() -> User {
    User::new(
        "johndo".to_string(),
        "John".to_string(),
        "Doe".to_string(),
        "john.doe@example.com".to_string(),
        NaiveDate::from_ymd_opt(1999, 11, 1).unwrap(),
    )
}

fn christmas_2099() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2099, 12, 25)
        .unwrap()
        .and_hms_opt(11, 11, 11)
        .unwrap()
}

fn todo_item(todo: &str, is_done: bool) -> TodoItem {
    TodoItem::new(
        todo.to_string(),
        format!("Info for {}", todo),
        christmas_2099(),
        is_done,
    )
}

fn ids(user: &User) -> Vec<i64> {
    user.todo_items().iter().filter_map(TodoItem::id).collect()
}

#[tokio::test]
async fn save_assigns_ids_to_new_user() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();

    let saved = repository.save(&john_doe()).await?;

    assert_eq!(saved.id(), Some(1));
    assert_eq!(saved.username(), "johndo");
    assert_eq!(saved.birthday(), NaiveDate::from_ymd_opt(1999, 11, 1).unwrap());
    assert!(saved.todo_items().is_empty());
    Ok(())
}

#[tokio::test]
async fn find_by_id_returns_none_for_unknown_user() -> anyhow::Result<()> {
    let context = common::setup().await?;

    let found = context.repository().find_by_id(42).await?;

    assert!(found.is_none());
    Ok(())
}

#[tokio::test]
async fn save_inserts_new_todo_items_in_order() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();
    let mut user = repository.save(&john_doe()).await?;

    user.add_todo_item(todo_item("first", false));
    user.add_todo_item(todo_item("second", true));
    let saved = repository.save(&user).await?;

    assert_eq!(ids(&saved), vec![1, 2]);
    assert_eq!(saved.todo_items()[0].todo(), "first");
    assert_eq!(saved.todo_items()[0].info(), "Info for first");
    assert_eq!(saved.todo_items()[0].completion_time(), christmas_2099());
    assert!(!saved.todo_items()[0].is_done());
    assert!(saved.todo_items()[1].is_done());

    let reloaded = repository.find_by_id(1).await?.unwrap();
    assert_eq!(reloaded, saved);
    Ok(())
}

#[tokio::test]
async fn save_deletes_todo_items_removed_from_aggregate() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();
    let mut user = repository.save(&john_doe()).await?;
    user.add_todo_item(todo_item("keep", false));
    user.add_todo_item(todo_item("drop", false));
    let mut user = repository.save(&user).await?;

    user.remove_todo_items(2);
    let saved = repository.save(&user).await?;

    assert_eq!(ids(&saved), vec![1]);
    assert_eq!(todo_item::Entity::find().count(context.db.as_ref()).await?, 1);
    Ok(())
}

#[tokio::test]
async fn interleaved_saves_keep_both_added_todo_items() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();
    repository.save(&john_doe()).await?;
    let mut first = repository.find_by_id(1).await?.unwrap();
    let mut second = repository.find_by_id(1).await?.unwrap();

    first.add_todo_item(todo_item("from first", false));
    repository.save(&first).await?;
    second.add_todo_item(todo_item("from second", false));
    let saved = repository.save(&second).await?;

    let todos: Vec<&str> = saved.todo_items().iter().map(TodoItem::todo).collect();
    assert_eq!(todos, vec!["from first", "from second"]);
    Ok(())
}

#[tokio::test]
async fn interleaved_remove_and_add_keep_the_added_todo_item() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();
    let mut user = repository.save(&john_doe()).await?;
    user.add_todo_item(todo_item("doomed", false));
    repository.save(&user).await?;
    let mut remover = repository.find_by_id(1).await?.unwrap();
    let mut adder = repository.find_by_id(1).await?.unwrap();

    adder.add_todo_item(todo_item("added", false));
    repository.save(&adder).await?;
    remover.remove_todo_items(1);
    let saved = repository.save(&remover).await?;

    let todos: Vec<&str> = saved.todo_items().iter().map(TodoItem::todo).collect();
    assert_eq!(todos, vec!["added"]);
    Ok(())
}

#[tokio::test]
async fn save_of_persisted_user_does_not_insert_another_row() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();
    repository.save(&john_doe()).await?;

    let mut user = repository.find_by_id(1).await?.unwrap();
    user.add_todo_item(todo_item("only", true));
    repository.save(&user).await?;

    assert_eq!(todo_user::Entity::find().count(context.db.as_ref()).await?, 1);
    Ok(())
}

#[tokio::test]
async fn find_all_returns_users_with_their_own_todo_items() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();
    let mut john = repository.save(&john_doe()).await?;
    let mut jane = repository
        .save(&User::new(
            "janedo".to_string(),
            "Jane".to_string(),
            "Doe".to_string(),
            "jane.doe@example.com".to_string(),
            NaiveDate::from_ymd_opt(2001, 2, 3).unwrap(),
        ))
        .await?;
    john.add_todo_item(todo_item("john's", false));
    repository.save(&john).await?;
    jane.add_todo_item(todo_item("jane's", true));
    repository.save(&jane).await?;

    let users = repository.find_all().await?;

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].username(), "johndo");
    assert_eq!(users[0].todo_items()[0].todo(), "john's");
    assert_eq!(users[1].username(), "janedo");
    assert_eq!(users[1].todo_items()[0].todo(), "jane's");
    Ok(())
}

#[tokio::test]
async fn find_all_includes_users_without_todo_items() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();
    repository.save(&john_doe()).await?;

    let users = repository.find_all().await?;

    assert_eq!(users.len(), 1);
    assert!(users[0].todo_items().is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_by_id_cascades_to_todo_items() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();
    let mut user = repository.save(&john_doe()).await?;
    user.add_todo_item(todo_item("first", false));
    user.add_todo_item(todo_item("second", true));
    repository.save(&user).await?;

    repository.delete_by_id(1).await?;

    assert!(repository.find_by_id(1).await?.is_none());
    assert_eq!(todo_item::Entity::find().count(context.db.as_ref()).await?, 0);
    Ok(())
}

#[tokio::test]
async fn delete_by_id_ignores_unknown_user() -> anyhow::Result<()> {
    let context = common::setup().await?;
    let repository = context.repository();
    repository.save(&john_doe()).await?;

    repository.delete_by_id(99).await?;

    assert_eq!(repository.find_all().await?.len(), 1);
    Ok(())
}
