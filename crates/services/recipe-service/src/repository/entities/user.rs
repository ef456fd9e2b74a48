//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{DomainResult, Password, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub image_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe::Entity")]
    Recipe,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity, re-checking domain invariants
impl TryFrom<Model> for User {
    type Error = domain::DomainError;

    fn try_from(model: Model) -> DomainResult<Self> {
        let password = Password::from_hash(model.password_hash);
        let mut user = User::new(model.id, model.username, password)?;
        user.image_url = model.image_url;
        user.bio = model.bio;
        user.created_at = model.created_at;
        user.updated_at = model.updated_at;
        Ok(user)
    }
}

/// Full row for insert/update
impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: Set(user.id),
            username: Set(user.username().to_string()),
            password_hash: Set(user.stored_hash().to_string()),
            image_url: Set(user.image_url.clone()),
            bio: Set(user.bio.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
