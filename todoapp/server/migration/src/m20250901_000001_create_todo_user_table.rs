use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoUser::Table)
                    .if_not_exists()
                    .col(
                        big_integer(TodoUser::Id)
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(TodoUser::Username))
                    .col(string(TodoUser::FirstName))
                    .col(string(TodoUser::LastName))
                    .col(string(TodoUser::Email))
                    .col(date(TodoUser::Birthday))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TodoUser::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TodoUser {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    Email,
    Birthday,
}
