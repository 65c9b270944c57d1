// src/service/feedback_service.rs

use crate::api::dto::feedback_dto::{CreateFeedbackRequest, FeedbackFilter, FeedbackResponse};
use crate::domain::feedback_model::{self, FeedbackType};
use crate::domain::user_model::UserClaims;
use crate::error::AppResult;
use crate::repository::feedback_repository::FeedbackRepository;
use crate::repository::user_repository::UserRepository;
use crate::shared::types::{PageMeta, PageQuery};
use crate::utils::error_helper::{
    convert_validation_errors, forbidden_error, not_found_error, validation_error,
};
use sea_orm::Set;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct FeedbackService {
    feedback_repo: Arc<FeedbackRepository>,
    user_repo: Arc<UserRepository>,
}

impl FeedbackService {
    pub fn new(feedback_repo: Arc<FeedbackRepository>, user_repo: Arc<UserRepository>) -> Self {
        Self {
            feedback_repo,
            user_repo,
        }
    }

    pub async fn create(
        &self,
        actor: &UserClaims,
        request: CreateFeedbackRequest,
    ) -> AppResult<FeedbackResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "feedback_service::create"))?;

        match request.feedback_type {
            FeedbackType::Manager if !actor.is_admin_or_manager() => {
                return Err(forbidden_error(
                    "Manager feedback requires a manager or admin role",
                    "feedback_service::create",
                    actor.user_id,
                ));
            }
            FeedbackType::Client
                if request
                    .client_name
                    .as_deref()
                    .map_or(true, |name| name.trim().is_empty()) =>
            {
                return Err(validation_error(
                    "client_name",
                    "required for client feedback",
                ));
            }
            _ => {}
        }

        self.user_repo
            .find_by_id(request.employee_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "User",
                    &request.employee_id.to_string(),
                    "feedback_service::create",
                )
            })?;

        let feedback = feedback_model::ActiveModel {
            employee_id: Set(request.employee_id),
            given_by: Set(Some(actor.user_id)),
            feedback_type: Set(request.feedback_type.as_str().to_string()),
            content: Set(request.content.trim().to_string()),
            rating: Set(request.rating),
            client_name: Set(request
                .client_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())),
            ..Default::default()
        };

        let feedback = self.feedback_repo.create(feedback).await?;

        info!(
            feedback_id = %feedback.id,
            employee_id = %feedback.employee_id,
            user_id = %actor.user_id,
            feedback_type = %feedback.feedback_type,
            "Feedback created"
        );

        Ok(feedback.into())
    }

    /// 従業員ロールは自分宛てのフィードバックのみ
    pub async fn list(
        &self,
        actor: &UserClaims,
        filter: &FeedbackFilter,
        pagination: &PageQuery,
    ) -> AppResult<(Vec<FeedbackResponse>, PageMeta)> {
        let subject = (!actor.is_admin_or_manager()).then_some(actor.user_id);

        let (page, per_page) = pagination.page_and_size();
        let (feedbacks, total_count) = self
            .feedback_repo
            .find_with_filter(filter, subject, page, per_page)
            .await?;

        Ok((
            feedbacks.into_iter().map(Into::into).collect(),
            PageMeta::new(page, per_page, total_count),
        ))
    }

    pub async fn get(&self, actor: &UserClaims, id: Uuid) -> AppResult<FeedbackResponse> {
        let feedback = self.find_feedback(id).await?;

        let visible = actor.is_admin_or_manager()
            || feedback.employee_id == actor.user_id
            || feedback.is_authored_by(actor.user_id);
        if !visible {
            return Err(forbidden_error(
                "You can only view feedback about yourself",
                "feedback_service::get",
                actor.user_id,
            ));
        }

        Ok(feedback.into())
    }

    /// 管理者または投稿者のみ削除できる
    pub async fn delete(&self, actor: &UserClaims, id: Uuid) -> AppResult<()> {
        let feedback = self.find_feedback(id).await?;

        if !actor.is_admin() && !feedback.is_authored_by(actor.user_id) {
            return Err(forbidden_error(
                "Only the author or an admin can delete feedback",
                "feedback_service::delete",
                actor.user_id,
            ));
        }

        self.feedback_repo.delete(id).await?;

        info!(feedback_id = %id, user_id = %actor.user_id, "Feedback deleted");
        Ok(())
    }

    async fn find_feedback(&self, id: Uuid) -> AppResult<feedback_model::Model> {
        self.feedback_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Feedback", &id.to_string(), "feedback_service"))
    }
}
