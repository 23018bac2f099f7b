use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(boolean(Users::IsVerified).default(false))
                    .col(timestamp_with_time_zone(Users::JoinDate))
                    .to_owned(),
            )
            .await?;

        // Create festivals table
        manager
            .create_table(
                Table::create()
                    .table(Festivals::Table)
                    .if_not_exists()
                    .col(pk_auto(Festivals::Id))
                    .col(string(Festivals::Name).unique_key())
                    .col(string(Festivals::City).default("Unspecified"))
                    .col(string(Festivals::Region).default("Unspecified"))
                    .col(text_null(Festivals::Description))
                    .col(string(Festivals::Logo).default("default.jpg"))
                    .col(integer(Festivals::OwnerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_festival_owner")
                            .from(Festivals::Table, Festivals::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create artists table
        manager
            .create_table(
                Table::create()
                    .table(Artists::Table)
                    .if_not_exists()
                    .col(pk_auto(Artists::Id))
                    .col(string(Artists::Name))
                    .col(string(Artists::Category))
                    .col(string(Artists::Age))
                    .col(string(Artists::Image).default("artistDefault.jpg"))
                    .col(integer(Artists::FestivalId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_festival")
                            .from(Artists::Table, Artists::FestivalId)
                            .to(Festivals::Table, Festivals::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Artists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Festivals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    IsVerified,
    JoinDate,
}

#[derive(DeriveIden)]
enum Festivals {
    Table,
    Id,
    Name,
    City,
    Region,
    Description,
    Logo,
    OwnerId,
}

#[derive(DeriveIden)]
enum Artists {
    Table,
    Id,
    Name,
    Category,
    Age,
    Image,
    FestivalId,
}
