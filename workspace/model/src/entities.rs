//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the festival-management application here:
//! users own festivals, festivals own artists.

pub mod artist;
pub mod festival;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::artist::Entity as Artist;
    pub use super::festival::Entity as Festival;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_user(db: &DatabaseConnection, username: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            password_hash: Set("$argon2id$stub".to_string()),
            is_verified: Set(false),
            join_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let alice = insert_user(&db, "alice").await?;
        let bob = insert_user(&db, "bob").await?;

        let alice_festival = festival::ActiveModel {
            name: Set(alice.username.clone()),
            city: Set("Unspecified".to_string()),
            region: Set("Unspecified".to_string()),
            description: Set(None),
            logo: Set("default.jpg".to_string()),
            owner_id: Set(alice.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let band = artist::ActiveModel {
            name: Set("The Static".to_string()),
            category: Set("rock".to_string()),
            age: Set("25".to_string()),
            image: Set("artistDefault.jpg".to_string()),
            festival_id: Set(alice_festival.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.username == "alice"));
        assert!(users.iter().any(|u| u.username == "bob"));

        let festivals = Festival::find()
            .filter(festival::Column::OwnerId.eq(alice.id))
            .all(&db)
            .await?;
        assert_eq!(festivals.len(), 1);
        assert_eq!(festivals[0].name, "alice");

        // Walk artist -> festival -> owner through the relations
        let found = Artist::find_by_id(band.id).one(&db).await?.unwrap();
        let parent = found
            .find_related(Festival)
            .one(&db)
            .await?
            .expect("artist must have a parent festival");
        let owner = parent
            .find_related(User)
            .one(&db)
            .await?
            .expect("festival must have an owner");
        assert_eq!(owner.id, alice.id);
        assert_ne!(owner.id, bob.id);

        // Duplicate usernames are rejected by the unique key
        let dup = insert_user(&db, "alice").await;
        assert!(dup.is_err());

        // Festival names are unique too
        let dup_festival = festival::ActiveModel {
            name: Set("alice".to_string()),
            city: Set("Unspecified".to_string()),
            region: Set("Unspecified".to_string()),
            description: Set(None),
            logo: Set("default.jpg".to_string()),
            owner_id: Set(bob.id),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(dup_festival.is_err());

        Ok(())
    }
}
