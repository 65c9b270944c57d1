use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CachedReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedReports::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CachedReports::ReportType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CachedReports::Year).integer().not_null())
                    .col(ColumnDef::new(CachedReports::WeekNumber).integer())
                    .col(ColumnDef::new(CachedReports::Month).integer())
                    .col(ColumnDef::new(CachedReports::ManagerId).uuid())
                    .col(ColumnDef::new(CachedReports::DepartmentId).uuid())
                    // 複合キーの正規化文字列。NULLを含むキーでも一意性を保証する
                    .col(
                        ColumnDef::new(CachedReports::CacheKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CachedReports::Payload).json().not_null())
                    .col(ColumnDef::new(CachedReports::GeneratedBy).uuid())
                    .col(
                        ColumnDef::new(CachedReports::GeneratedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CachedReports::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CachedReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cached_reports_manager_id")
                            .from(CachedReports::Table, CachedReports::ManagerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cached_reports_department_id")
                            .from(CachedReports::Table, CachedReports::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cached_reports_generated_by")
                            .from(CachedReports::Table, CachedReports::GeneratedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cached_reports_type_generated_at")
                    .table(CachedReports::Table)
                    .col(CachedReports::ReportType)
                    .col(CachedReports::IsActive)
                    .col(CachedReports::GeneratedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CachedReports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CachedReports {
    Table,
    Id,
    ReportType,
    Year,
    WeekNumber,
    Month,
    ManagerId,
    DepartmentId,
    CacheKey,
    Payload,
    GeneratedBy,
    GeneratedAt,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
}
