use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "todo_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub todo: String,
    #[sea_orm(column_type = "Text")]
    pub info: String,
    pub completion_time: DateTime,
    pub is_done: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::todo_user::Entity",
        from = "Column::UserId",
        to = "super::todo_user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TodoUser,
}

impl Related<super::todo_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
