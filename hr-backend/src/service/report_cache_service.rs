// src/service/report_cache_service.rs

//! 集計済みレポートの永続キャッシュ

use crate::api::dto::report_dto::{ReportFilter, UpdateReportRequest};
use crate::db::DbPool;
use crate::domain::cached_report_model::{self, ReportKey, ReportType};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::repository::cached_report_repository::CachedReportRepository;
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::error_helper::{conflict_error, not_found_error};
use sea_orm::{DbErr, Set};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const DUPLICATE_REPORT_KEY: &str = "duplicate report key";

pub struct ReportCacheService {
    db: DbPool,
    user_repo: Arc<UserRepository>,
    department_repo: Arc<DepartmentRepository>,
}

impl ReportCacheService {
    pub fn new(db: DbPool) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(db.clone())),
            department_repo: Arc::new(DepartmentRepository::new(db.clone())),
            db,
        }
    }

    /// キーが参照する上長・部署が存在するか確認する
    pub async fn ensure_key_references(&self, key: &ReportKey, context: &str) -> AppResult<()> {
        if let Some(manager_id) = key.manager_id {
            self.user_repo
                .find_by_id(manager_id)
                .await?
                .ok_or_else(|| not_found_error("User", &manager_id.to_string(), context))?;
        }

        if let Some(department_id) = key.department_id {
            self.department_repo
                .find_by_id(department_id)
                .await?
                .ok_or_else(|| not_found_error("Department", &department_id.to_string(), context))?;
        }

        Ok(())
    }

    /// 新規作成。既存キーは検証エラー、同時作成の競合は Conflict
    pub async fn create(
        &self,
        key: ReportKey,
        payload: Value,
        generated_by: Option<Uuid>,
    ) -> AppResult<cached_report_model::Model> {
        key.validate().map_err(AppError::ValidationError)?;
        self.ensure_key_references(&key, "report_cache_service::create")
            .await?;

        if CachedReportRepository::find_by_key(&self.db, &key)
            .await?
            .is_some()
        {
            warn!(cache_key = %key.cache_key(), "Duplicate report key rejected");
            return Err(AppError::ValidationError(format!(
                "report: {}",
                DUPLICATE_REPORT_KEY
            )));
        }

        let report = CachedReportRepository::insert(&self.db, new_report(&key, payload, generated_by))
            .await
            .map_err(|e| map_save_error(e, "report_cache_service::create"))?;

        info!(
            report_id = %report.id,
            cache_key = %report.cache_key,
            "Cached report created"
        );

        Ok(report)
    }

    /// ペイロードまたはキー項目を更新する
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateReportRequest,
    ) -> AppResult<cached_report_model::Model> {
        let report = self.find_by_id(id).await?;
        let current_key = report.key().ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Stored report has unknown type: {}",
                report.report_type
            ))
        })?;

        let new_key = request.apply_to(&current_key);
        new_key.validate().map_err(AppError::ValidationError)?;
        if new_key != current_key {
            self.ensure_key_references(&new_key, "report_cache_service::update")
                .await?;
        }

        if request.changes_key() && new_key != current_key {
            if let Some(existing) = CachedReportRepository::find_by_key(&self.db, &new_key).await? {
                if existing.id != id {
                    return Err(conflict_error(
                        "another report already uses this key",
                        "report_cache_service::update",
                    ));
                }
            }
        }

        let mut active_model: cached_report_model::ActiveModel = report.into();
        active_model.set_key(&new_key);
        if let Some(payload) = request.payload {
            active_model.payload = Set(payload);
        }

        let report = CachedReportRepository::update(&self.db, active_model)
            .await
            .map_err(|e| map_save_error(e, "report_cache_service::update"))?;

        info!(report_id = %report.id, cache_key = %report.cache_key, "Cached report updated");
        Ok(report)
    }

    /// 作成または上書き。同じキーで何度呼んでも行は1つ
    pub async fn upsert(
        &self,
        key: ReportKey,
        payload: Value,
        generated_by: Option<Uuid>,
    ) -> AppResult<cached_report_model::Model> {
        key.validate().map_err(AppError::ValidationError)?;
        self.ensure_key_references(&key, "report_cache_service::upsert")
            .await?;

        if let Some(existing) = CachedReportRepository::find_by_key(&self.db, &key).await? {
            return self.overwrite(existing, payload, generated_by).await;
        }

        match CachedReportRepository::insert(
            &self.db,
            new_report(&key, payload.clone(), generated_by),
        )
        .await
        {
            Ok(report) => {
                info!(report_id = %report.id, cache_key = %report.cache_key, "Cached report stored");
                Ok(report)
            }
            Err(e) if is_unique_violation(&e) => {
                // 同時に作成された行を上書きする
                let existing = CachedReportRepository::find_by_key(&self.db, &key)
                    .await?
                    .ok_or(AppError::DbErr(e))?;
                self.overwrite(existing, payload, generated_by).await
            }
            Err(e) => Err(map_save_error(e, "report_cache_service::upsert")),
        }
    }

    async fn overwrite(
        &self,
        existing: cached_report_model::Model,
        payload: Value,
        generated_by: Option<Uuid>,
    ) -> AppResult<cached_report_model::Model> {
        let mut active_model: cached_report_model::ActiveModel = existing.into();
        active_model.payload = Set(payload);
        active_model.generated_by = Set(generated_by);
        active_model.is_active = Set(true);

        let report = CachedReportRepository::update(&self.db, active_model)
            .await
            .map_err(|e| map_save_error(e, "report_cache_service::upsert"))?;

        info!(report_id = %report.id, cache_key = %report.cache_key, "Cached report refreshed");
        Ok(report)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<cached_report_model::Model> {
        self.find_by_id(id).await
    }

    /// 種別ごとの最新の有効レポート
    pub async fn get_latest(
        &self,
        report_type: ReportType,
    ) -> AppResult<Option<cached_report_model::Model>> {
        Ok(CachedReportRepository::find_latest_active(&self.db, report_type).await?)
    }

    /// キーに完全一致する有効レポート
    pub async fn find(&self, key: &ReportKey) -> AppResult<Option<cached_report_model::Model>> {
        key.validate().map_err(AppError::ValidationError)?;

        let report = CachedReportRepository::find_by_key(&self.db, key).await?;
        Ok(report.filter(|report| report.is_active))
    }

    pub async fn archive(&self, id: Uuid) -> AppResult<cached_report_model::Model> {
        self.set_active(id, false).await
    }

    pub async fn restore(&self, id: Uuid) -> AppResult<cached_report_model::Model> {
        self.set_active(id, true).await
    }

    pub async fn list(&self, filter: &ReportFilter) -> AppResult<Vec<cached_report_model::Model>> {
        Ok(CachedReportRepository::find_with_filter(&self.db, filter).await?)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<cached_report_model::Model> {
        let report = self.find_by_id(id).await?;

        let mut active_model: cached_report_model::ActiveModel = report.into();
        active_model.is_active = Set(is_active);

        let report = CachedReportRepository::update(&self.db, active_model)
            .await
            .map_err(|e| map_save_error(e, "report_cache_service::set_active"))?;

        info!(report_id = %report.id, is_active, "Cached report activity changed");
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<cached_report_model::Model> {
        CachedReportRepository::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| not_found_error("Report", &id.to_string(), "report_cache_service"))
    }
}

fn new_report(
    key: &ReportKey,
    payload: Value,
    generated_by: Option<Uuid>,
) -> cached_report_model::ActiveModel {
    let mut active_model = cached_report_model::ActiveModel {
        payload: Set(payload),
        generated_by: Set(generated_by),
        ..Default::default()
    };
    active_model.set_key(key);
    active_model
}

/// before_save の検証エラーは 400、一意制約違反は 409
fn map_save_error(err: DbErr, context: &str) -> AppError {
    match err {
        DbErr::Custom(message) => AppError::ValidationError(message),
        err if is_unique_violation(&err) => {
            conflict_error("report key was taken by a concurrent request", context)
        }
        err => AppError::DbErr(err),
    }
}
