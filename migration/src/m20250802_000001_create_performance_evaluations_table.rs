use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 15項目の評価指標カラム
const METRIC_COLUMNS: [PerformanceEvaluations; 15] = [
    PerformanceEvaluations::CommunicationSkills,
    PerformanceEvaluations::Multitasking,
    PerformanceEvaluations::TeamSkills,
    PerformanceEvaluations::TechnicalSkills,
    PerformanceEvaluations::JobKnowledge,
    PerformanceEvaluations::Productivity,
    PerformanceEvaluations::Creativity,
    PerformanceEvaluations::WorkQuality,
    PerformanceEvaluations::Professionalism,
    PerformanceEvaluations::WorkConsistency,
    PerformanceEvaluations::Attitude,
    PerformanceEvaluations::Cooperation,
    PerformanceEvaluations::Dependability,
    PerformanceEvaluations::Attendance,
    PerformanceEvaluations::Punctuality,
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(PerformanceEvaluations::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(PerformanceEvaluations::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(PerformanceEvaluations::EmployeeId)
                    .uuid()
                    .not_null(),
            )
            .col(ColumnDef::new(PerformanceEvaluations::DepartmentId).uuid())
            .col(ColumnDef::new(PerformanceEvaluations::ManagerId).uuid())
            .col(
                ColumnDef::new(PerformanceEvaluations::ReviewDate)
                    .date()
                    .not_null(),
            )
            .col(
                ColumnDef::new(PerformanceEvaluations::EvaluationPeriod)
                    .string()
                    .not_null()
                    .default(""),
            );

        for metric in METRIC_COLUMNS {
            table.col(
                ColumnDef::new(metric)
                    .integer()
                    .not_null()
                    .default(0)
                    .check(Expr::col(metric).between(0, 100)),
            );
        }

        table
            .col(
                ColumnDef::new(PerformanceEvaluations::TotalScore)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(PerformanceEvaluations::Remarks).text())
            .col(
                ColumnDef::new(PerformanceEvaluations::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(PerformanceEvaluations::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_performance_evaluations_employee_id")
                    .from(
                        PerformanceEvaluations::Table,
                        PerformanceEvaluations::EmployeeId,
                    )
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_performance_evaluations_department_id")
                    .from(
                        PerformanceEvaluations::Table,
                        PerformanceEvaluations::DepartmentId,
                    )
                    .to(Departments::Table, Departments::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_performance_evaluations_manager_id")
                    .from(
                        PerformanceEvaluations::Table,
                        PerformanceEvaluations::ManagerId,
                    )
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );

        manager.create_table(table.to_owned()).await?;

        // 自然キー: (employee, review_date, period label)
        manager
            .create_index(
                Index::create()
                    .name("idx_performance_evaluations_natural_key")
                    .table(PerformanceEvaluations::Table)
                    .col(PerformanceEvaluations::EmployeeId)
                    .col(PerformanceEvaluations::ReviewDate)
                    .col(PerformanceEvaluations::EvaluationPeriod)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_performance_evaluations_review_date")
                    .table(PerformanceEvaluations::Table)
                    .col(PerformanceEvaluations::ReviewDate)
                    .col(PerformanceEvaluations::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(PerformanceEvaluations::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum PerformanceEvaluations {
    Table,
    Id,
    EmployeeId,
    DepartmentId,
    ManagerId,
    ReviewDate,
    EvaluationPeriod,
    CommunicationSkills,
    Multitasking,
    TeamSkills,
    TechnicalSkills,
    JobKnowledge,
    Productivity,
    Creativity,
    WorkQuality,
    Professionalism,
    WorkConsistency,
    Attitude,
    Cooperation,
    Dependability,
    Attendance,
    Punctuality,
    TotalScore,
    Remarks,
    CreatedAt,
    UpdatedAt,
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
