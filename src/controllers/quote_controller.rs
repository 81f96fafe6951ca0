use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::quote_dto::{BaseAmountResponse, CreateQuoteRequest, QuoteFilter, UpdateQuoteRequest};
use crate::models::quote::{Quote, QuoteStatus};
use crate::repositories::enquiry_repository::EnquiryRepository;
use crate::repositories::quote_repository::{QuoteRepository, QUOTE_SORTABLE};
use crate::services::order_promotion::{check_quote_deletable, check_quote_status_change};
use crate::services::quote_calculator::{resolve_amounts, validate_pricing, QuoteAmounts, QuotePricing};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{merge_text, normalize_text};

pub struct QuoteController {
    pool: PgPool,
    repository: QuoteRepository,
    enquiries: EnquiryRepository,
}

impl QuoteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: QuoteRepository::new(pool.clone()),
            enquiries: EnquiryRepository::new(pool.clone()),
            pool,
        }
    }

    async fn ensure_enquiry(&self, enquiry_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.enquiries
            .find_by_id(enquiry_id, user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found_error("Enquiry", enquiry_id))
    }

    /// Importes del quote; la base derivada sólo se consulta si hace falta
    async fn amounts_for(&self, pricing: &QuotePricing, enquiry_id: Uuid, user_id: Uuid) -> Result<QuoteAmounts, AppError> {
        let derived_base = if pricing.needs_derived_base() {
            let (total, _) = self.repository.transport_order_total(enquiry_id, user_id).await?;
            Some(total)
        } else {
            None
        };
        resolve_amounts(pricing, derived_base)
    }

    pub async fn create(&self, user_id: Uuid, request: CreateQuoteRequest) -> Result<ApiResponse<Quote>, AppError> {
        request.validate()?;
        validate_pricing(&request.pricing)?;

        self.ensure_enquiry(request.enquiry_id, user_id).await?;
        let amounts = self.amounts_for(&request.pricing, request.enquiry_id, user_id).await?;

        let now = Utc::now();
        let quote = Quote {
            id: Uuid::new_v4(),
            user_id,
            enquiry_id: request.enquiry_id,
            costing: normalize_text(request.costing),
            quotation_amount: amounts.quotation_amount,
            margin_percentage: amounts.margin_percentage,
            base_amount: amounts.base_amount,
            is_custom_amount: amounts.is_custom_amount,
            status: request.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let quote = self.repository.create(&quote).await?;
        tracing::info!(
            "💰 Quote {} para enquiry {}: {} ({})",
            quote.id,
            quote.enquiry_id,
            quote.quotation_amount,
            if quote.is_custom_amount { "custom" } else { "calculated" }
        );

        Ok(ApiResponse::success_with_message(quote, "Quote created successfully"))
    }

    pub async fn base_amount(&self, enquiry_id: Uuid, user_id: Uuid) -> Result<BaseAmountResponse, AppError> {
        self.ensure_enquiry(enquiry_id, user_id).await?;
        let (base_amount, transport_order_count) = self.repository.transport_order_total(enquiry_id, user_id).await?;

        Ok(BaseAmountResponse {
            enquiry_id,
            base_amount,
            transport_order_count,
        })
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Quote, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Quote", id))
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        query: ListQuery,
        filter: QuoteFilter,
    ) -> Result<Paginated<Quote>, AppError> {
        let params = query.to_params(QUOTE_SORTABLE)?;
        let status = query.parse_status::<QuoteStatus>()?;
        let (quotes, total) = self
            .repository
            .list(user_id, status, filter.enquiry_id, &params)
            .await?;
        Ok(Paginated::new(quotes, params.page, total))
    }

    /// Sin `pricing` se recalcula con la base y el margen guardados
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateQuoteRequest,
    ) -> Result<ApiResponse<Quote>, AppError> {
        request.validate()?;
        if let Some(pricing) = &request.pricing {
            validate_pricing(pricing)?;
        }

        let enquiry_id = self.get_by_id(id, user_id).await?.enquiry_id;

        // La enquiry se bloquea como en la promoción, que elige entre sus quotes aceptados
        let mut tx = self.pool.begin().await?;
        EnquiryRepository::lock_by_id(&mut tx, enquiry_id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Enquiry", enquiry_id))?;
        let current = QuoteRepository::lock_by_id(&mut tx, id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Quote", id))?;

        let status = request.status.unwrap_or(current.status);
        if status != current.status {
            let backs_order = QuoteRepository::backs_customer_order(&mut tx, id).await?;
            check_quote_status_change(current.status, status, backs_order)?;
        }

        let pricing = match request.pricing {
            Some(pricing) => pricing,
            None => match (current.is_custom_amount, current.margin_percentage, current.base_amount) {
                (false, Some(margin_percentage), Some(base_amount)) => QuotePricing::Calculated {
                    margin_percentage,
                    base_amount: Some(base_amount),
                },
                _ => QuotePricing::Custom {
                    amount: current.quotation_amount,
                },
            },
        };
        let amounts = self.amounts_for(&pricing, current.enquiry_id, user_id).await?;

        let quote = Quote {
            costing: merge_text(request.costing, current.costing),
            quotation_amount: amounts.quotation_amount,
            margin_percentage: amounts.margin_percentage,
            base_amount: amounts.base_amount,
            is_custom_amount: amounts.is_custom_amount,
            status,
            ..current
        };

        let quote = QuoteRepository::update(&mut tx, &quote).await?;
        tx.commit().await?;
        Ok(ApiResponse::success_with_message(quote, "Quote updated successfully"))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.get_by_id(id, user_id).await?;
        let mut conn = self.pool.acquire().await?;
        check_quote_deletable(QuoteRepository::backs_customer_order(&mut conn, id).await?)?;

        if !self.repository.delete(id, user_id).await? {
            return Err(not_found_error("Quote", id));
        }
        Ok(())
    }
}
