//! Single authorization predicate shared by every ownership-gated route.
//! A user owns a festival iff they are its owner, and owns an artist iff
//! they own its parent festival.

use model::entities::{artist, festival};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
pub enum Resource {
    Festival(i32),
    Artist(i32),
}

/// Resolve the owning user id of a resource, walking Artist -> Festival ->
/// owner where needed.
pub async fn owner_of(db: &DatabaseConnection, resource: Resource) -> Result<i32, ApiError> {
    match resource {
        Resource::Festival(id) => {
            let festival = festival::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(ApiError::NotFound("Festival"))?;
            Ok(festival.owner_id)
        }
        Resource::Artist(id) => {
            let artist = artist::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(ApiError::NotFound("Artist"))?;
            let festival = festival::Entity::find_by_id(artist.festival_id)
                .one(db)
                .await?
                .ok_or(ApiError::NotFound("Festival"))?;
            Ok(festival.owner_id)
        }
    }
}

pub async fn owns(
    db: &DatabaseConnection,
    user_id: i32,
    resource: Resource,
) -> Result<bool, ApiError> {
    Ok(owner_of(db, resource).await? == user_id)
}

/// Gate for mutating handlers: `Forbidden` unless the caller is the owner.
pub async fn ensure_owner(
    db: &DatabaseConnection,
    user_id: i32,
    resource: Resource,
) -> Result<(), ApiError> {
    if owns(db, user_id, resource).await? {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
