//! Recipe database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{DomainResult, Recipe};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub instructions: String,
    pub minutes_to_complete: i32,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity, re-checking domain invariants
impl TryFrom<Model> for Recipe {
    type Error = domain::DomainError;

    fn try_from(model: Model) -> DomainResult<Self> {
        let mut recipe = Recipe::new(
            model.id,
            model.user_id,
            model.title,
            model.instructions,
            model.minutes_to_complete,
        )?;
        recipe.created_at = model.created_at;
        recipe.updated_at = model.updated_at;
        Ok(recipe)
    }
}

/// Full row for insert/update
impl From<&Recipe> for ActiveModel {
    fn from(recipe: &Recipe) -> Self {
        ActiveModel {
            id: Set(recipe.id),
            title: Set(recipe.title().to_string()),
            instructions: Set(recipe.instructions().to_string()),
            minutes_to_complete: Set(recipe.minutes_to_complete()),
            user_id: Set(recipe.user_id()),
            created_at: Set(recipe.created_at),
            updated_at: Set(recipe.updated_at),
        }
    }
}
