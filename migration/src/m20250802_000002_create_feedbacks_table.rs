use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedbacks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Feedbacks::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Feedbacks::GivenBy).uuid())
                    .col(
                        ColumnDef::new(Feedbacks::FeedbackType)
                            .string()
                            .not_null()
                            .default("general"),
                    )
                    .col(ColumnDef::new(Feedbacks::Content).text().not_null())
                    .col(ColumnDef::new(Feedbacks::Rating).integer())
                    .col(ColumnDef::new(Feedbacks::ClientName).string())
                    .col(
                        ColumnDef::new(Feedbacks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_employee_id")
                            .from(Feedbacks::Table, Feedbacks::EmployeeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_given_by")
                            .from(Feedbacks::Table, Feedbacks::GivenBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedbacks_employee_created")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::EmployeeId)
                    .col(Feedbacks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Feedbacks {
    Table,
    Id,
    EmployeeId,
    GivenBy,
    FeedbackType,
    Content,
    Rating,
    ClientName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
