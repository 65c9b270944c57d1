// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// 認証・組織関連マイグレーション
mod m20250801_000001_create_users_table;
mod m20250801_000002_create_departments_table;
mod m20250801_000003_create_employees_table;

// 評価関連マイグレーション
mod m20250802_000001_create_performance_evaluations_table;
mod m20250802_000002_create_feedbacks_table;
mod m20250802_000003_create_notifications_table;

// レポートキャッシュ
mod m20250803_000001_create_cached_reports_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20250801_000001_create_users_table::Migration),
            Box::new(m20250801_000002_create_departments_table::Migration),
            // 2. users / departments に依存
            Box::new(m20250801_000003_create_employees_table::Migration),
            Box::new(m20250802_000001_create_performance_evaluations_table::Migration),
            Box::new(m20250802_000002_create_feedbacks_table::Migration),
            Box::new(m20250802_000003_create_notifications_table::Migration),
            // 3. 集計結果のキャッシュ
            Box::new(m20250803_000001_create_cached_reports_table::Migration),
        ]
    }
}
