// src/repository/cached_report_repository.rs

use crate::api::dto::report_dto::ReportFilter;
use crate::domain::cached_report_model::{
    self, ActiveModel as CachedReportActiveModel, Entity as CachedReportEntity, ReportKey,
    ReportType,
};
use sea_orm::entity::*;
use sea_orm::{Condition, ConnectionTrait, DbErr, QueryFilter, QueryOrder};
use uuid::Uuid;

/// レポートキャッシュのリポジトリ
pub struct CachedReportRepository;

impl CachedReportRepository {
    pub async fn find_by_id<C>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<cached_report_model::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        CachedReportEntity::find_by_id(id).one(db).await
    }

    /// キー文字列で検索（有効・無効を問わない）
    pub async fn find_by_key<C>(
        db: &C,
        key: &ReportKey,
    ) -> Result<Option<cached_report_model::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        CachedReportEntity::find()
            .filter(cached_report_model::Column::CacheKey.eq(key.cache_key()))
            .one(db)
            .await
    }

    /// 種別ごとに最も新しく生成された有効レポート
    pub async fn find_latest_active<C>(
        db: &C,
        report_type: ReportType,
    ) -> Result<Option<cached_report_model::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        CachedReportEntity::find()
            .filter(cached_report_model::Column::ReportType.eq(report_type.as_str()))
            .filter(cached_report_model::Column::IsActive.eq(true))
            .order_by_desc(cached_report_model::Column::GeneratedAt)
            .order_by_desc(cached_report_model::Column::CreatedAt)
            .one(db)
            .await
    }

    pub async fn find_with_filter<C>(
        db: &C,
        filter: &ReportFilter,
    ) -> Result<Vec<cached_report_model::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut conditions = Condition::all()
            .add(cached_report_model::Column::IsActive.eq(filter.is_active.unwrap_or(true)));

        if let Some(report_type) = filter.report_type {
            conditions =
                conditions.add(cached_report_model::Column::ReportType.eq(report_type.as_str()));
        }

        if let Some(year) = filter.year {
            conditions = conditions.add(cached_report_model::Column::Year.eq(year));
        }

        CachedReportEntity::find()
            .filter(conditions)
            .order_by_desc(cached_report_model::Column::GeneratedAt)
            .all(db)
            .await
    }

    pub async fn insert<C>(
        db: &C,
        report: CachedReportActiveModel,
    ) -> Result<cached_report_model::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        report.insert(db).await
    }

    pub async fn update<C>(
        db: &C,
        report: CachedReportActiveModel,
    ) -> Result<cached_report_model::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        report.update(db).await
    }

    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        use sea_orm::PaginatorTrait;
        CachedReportEntity::find().count(db).await
    }
}
