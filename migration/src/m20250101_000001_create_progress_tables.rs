use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlayerProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerProgress::PlayerId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlayerProgress::CurrentLevel)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(PlayerProgress::TotalScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerProgress::TotalStars)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerProgress::InfiniteHighScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerProgress::InfiniteHighWave)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    // JSON array of the 50 per-level entries
                    .col(ColumnDef::new(PlayerProgress::Levels).text().not_null())
                    .col(ColumnDef::new(PlayerProgress::CreatedAt).string().not_null())
                    .col(ColumnDef::new(PlayerProgress::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlayerAchievements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerAchievements::PlayerId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlayerAchievements::Achievements)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerAchievements::UpdatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InfiniteScores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InfiniteScores::Seq)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InfiniteScores::Id)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(InfiniteScores::PlayerId).string().not_null())
                    .col(ColumnDef::new(InfiniteScores::Score).integer().not_null())
                    .col(ColumnDef::new(InfiniteScores::Wave).integer().not_null())
                    .col(ColumnDef::new(InfiniteScores::Timestamp).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create index on score for leaderboard queries
        manager
            .create_index(
                Index::create()
                    .name("idx_infinite_scores_score")
                    .table(InfiniteScores::Table)
                    .col(InfiniteScores::Score)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_infinite_scores_player_id")
                    .table(InfiniteScores::Table)
                    .col(InfiniteScores::PlayerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InfiniteScores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlayerAchievements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlayerProgress::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PlayerProgress {
    Table,
    PlayerId,
    CurrentLevel,
    TotalScore,
    TotalStars,
    InfiniteHighScore,
    InfiniteHighWave,
    Levels,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlayerAchievements {
    Table,
    PlayerId,
    Achievements,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InfiniteScores {
    Table,
    Seq,
    Id,
    PlayerId,
    Score,
    Wave,
    Timestamp,
}
