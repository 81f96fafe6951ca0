use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::lead_dto::{CreateLeadRequest, LeadFilter, UpdateLeadRequest};
use crate::models::lead::Lead;
use crate::repositories::lead_repository::{LeadRepository, LEAD_SORTABLE};
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::{merge_text, normalize_text};

pub struct LeadController {
    repository: LeadRepository,
}

impl LeadController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LeadRepository::new(pool),
        }
    }

    pub async fn create(&self, user_id: Uuid, request: CreateLeadRequest) -> Result<ApiResponse<Lead>, AppError> {
        request.validate()?;

        let now = Utc::now();
        let lead = Lead {
            id: Uuid::new_v4(),
            user_id,
            name: request.name.trim().to_string(),
            phone: normalize_text(request.phone),
            alternate_phone: normalize_text(request.alternate_phone),
            source: request.source,
            referrer: normalize_text(request.referrer),
            created_at: now,
            updated_at: now,
        };

        let lead = self.repository.create(&lead).await?;
        tracing::info!("👤 Lead {} creado ({})", lead.id, lead.source);

        Ok(ApiResponse::success_with_message(lead, "Lead created successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Lead, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Lead", id))
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        query: ListQuery,
        filter: LeadFilter,
    ) -> Result<Paginated<Lead>, AppError> {
        let params = query.to_params(LEAD_SORTABLE)?;
        let (leads, total) = self.repository.list(user_id, filter.source, &params).await?;
        Ok(Paginated::new(leads, params.page, total))
    }

    /// Un lead con enquiries queda congelado
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateLeadRequest,
    ) -> Result<ApiResponse<Lead>, AppError> {
        request.validate()?;

        let current = self.get_by_id(id, user_id).await?;
        if self.repository.has_enquiries(id).await? {
            return Err(conflict_error("Lead has enquiries and can no longer be modified"));
        }

        let lead = Lead {
            name: request
                .name
                .map(|name| name.trim().to_string())
                .unwrap_or(current.name),
            phone: merge_text(request.phone, current.phone),
            alternate_phone: merge_text(request.alternate_phone, current.alternate_phone),
            source: request.source.unwrap_or(current.source),
            referrer: merge_text(request.referrer, current.referrer),
            ..current
        };

        let lead = self.repository.update(&lead).await?;
        Ok(ApiResponse::success_with_message(lead, "Lead updated successfully"))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.get_by_id(id, user_id).await?;
        if self.repository.has_enquiries(id).await? {
            return Err(conflict_error("Lead has enquiries and cannot be deleted"));
        }

        if !self.repository.delete(id, user_id).await? {
            return Err(not_found_error("Lead", id));
        }
        tracing::info!("🗑️  Lead {} eliminado", id);
        Ok(())
    }
}
