use sea_orm::entity::prelude::*;

/// An act booked under a festival. Authorization resolves transitively:
/// whoever owns the parent festival may mutate the artist.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category: String,
    /// Kept as free text, matching the upstream data ("25", "mid-30s", ...).
    pub age: String,
    /// Stored filename under the media directory, not a URL.
    pub image: String,
    pub festival_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::festival::Entity",
        from = "Column::FestivalId",
        to = "super::festival::Column::Id"
    )]
    Festival,
}

impl Related<super::festival::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Festival.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
