use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const FK_TODO_ITEM_TO_TODO_USER: &str = "fk-todo_item-user_id";
const IDX_TODO_ITEM_USER_ID: &str = "idx-todo_item-user_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoItem::Table)
                    .if_not_exists()
                    .col(
                        big_integer(TodoItem::Id)
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(TodoItem::UserId))
                    .col(string(TodoItem::Todo))
                    .col(text(TodoItem::Info))
                    .col(timestamp(TodoItem::CompletionTime))
                    .col(boolean(TodoItem::IsDone).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TODO_ITEM_TO_TODO_USER)
                            .from(TodoItem::Table, TodoItem::UserId)
                            .to(TodoUser::Table, TodoUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TODO_ITEM_USER_ID)
                    .table(TodoItem::Table)
                    .col(TodoItem::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_TODO_ITEM_USER_ID)
                    .table(TodoItem::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(TodoItem::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TodoUser {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TodoItem {
    Table,
    Id,
    UserId,
    Todo,
    Info,
    CompletionTime,
    IsDone,
}
