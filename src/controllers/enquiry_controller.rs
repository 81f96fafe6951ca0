use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::enquiry_dto::{
    CreateEnquiryRequest, EnquiryDetailResponse, EnquiryFilter, EnquiryListItem, UpdateEnquiryRequest,
};
use crate::models::enquiry::{Enquiry, EnquiryStatus};
use crate::repositories::customer_order_repository::CustomerOrderRepository;
use crate::repositories::enquiry_repository::{EnquiryRepository, ENQUIRY_SORTABLE};
use crate::repositories::lead_repository::LeadRepository;
use crate::repositories::quote_repository::QuoteRepository;
use crate::repositories::transport_order_repository::TransportOrderRepository;
use crate::services::order_promotion::check_enquiry_transition;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{merge_text, normalize_text};

pub struct EnquiryController {
    pool: PgPool,
    repository: EnquiryRepository,
    leads: LeadRepository,
    quotes: QuoteRepository,
    customer_orders: CustomerOrderRepository,
    transport_orders: TransportOrderRepository,
}

impl EnquiryController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: EnquiryRepository::new(pool.clone()),
            leads: LeadRepository::new(pool.clone()),
            quotes: QuoteRepository::new(pool.clone()),
            customer_orders: CustomerOrderRepository::new(pool.clone()),
            transport_orders: TransportOrderRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(&self, user_id: Uuid, request: CreateEnquiryRequest) -> Result<ApiResponse<Enquiry>, AppError> {
        request.validate()?;

        let lead = self
            .leads
            .find_by_id(request.lead_id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Lead", request.lead_id))?;

        let now = Utc::now();
        let enquiry = Enquiry {
            id: Uuid::new_v4(),
            user_id,
            lead_id: lead.id,
            from_location: normalize_text(request.from_location),
            to_location: normalize_text(request.to_location),
            cargo_type: normalize_text(request.cargo_type),
            cargo_weight: request.cargo_weight,
            remarks: normalize_text(request.remarks),
            // Origen y referidor se heredan del lead si no se indican
            source: request.source.unwrap_or(lead.source),
            referrer: normalize_text(request.referrer).or(lead.referrer),
            status: EnquiryStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let enquiry = self.repository.create(&enquiry).await?;
        tracing::info!("📦 Enquiry {} creada para lead {}", enquiry.id, enquiry.lead_id);

        Ok(ApiResponse::success_with_message(enquiry, "Enquiry created successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<EnquiryDetailResponse, AppError> {
        let item = self
            .repository
            .find_with_lead(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Enquiry", id))?;

        let (quotes, customer_order, transport_orders) = futures::try_join!(
            self.quotes.list_for_enquiry(id, user_id),
            self.customer_orders.find_by_enquiry(id),
            self.transport_orders.list_for_enquiry(id, user_id),
        )?;

        Ok(EnquiryDetailResponse {
            enquiry: item.enquiry,
            lead_name: item.lead_name,
            quotes,
            customer_order,
            transport_orders,
        })
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        query: ListQuery,
        filter: EnquiryFilter,
    ) -> Result<Paginated<EnquiryListItem>, AppError> {
        let params = query.to_params(ENQUIRY_SORTABLE)?;
        let status = query.parse_status::<EnquiryStatus>()?;
        let (items, total) = self
            .repository
            .list(user_id, status, filter.lead_id, &params)
            .await?;
        Ok(Paginated::new(items, params.page, total))
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateEnquiryRequest,
    ) -> Result<ApiResponse<Enquiry>, AppError> {
        request.validate()?;

        // Bloqueo compartido con la promoción: un estado recién aceptado no se pisa
        let mut tx = self.pool.begin().await?;
        let current = EnquiryRepository::lock_by_id(&mut tx, id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Enquiry", id))?;

        let previous_status = current.status;
        let status = match request.status {
            Some(next) => {
                check_enquiry_transition(current.status, next)?;
                next
            }
            None => current.status,
        };

        let enquiry = Enquiry {
            from_location: merge_text(request.from_location, current.from_location),
            to_location: merge_text(request.to_location, current.to_location),
            cargo_type: merge_text(request.cargo_type, current.cargo_type),
            cargo_weight: request.cargo_weight.or(current.cargo_weight),
            remarks: merge_text(request.remarks, current.remarks),
            source: request.source.unwrap_or(current.source),
            referrer: merge_text(request.referrer, current.referrer),
            status,
            ..current
        };

        let enquiry = EnquiryRepository::update(&mut tx, &enquiry).await?;
        tx.commit().await?;
        if enquiry.status != previous_status {
            tracing::info!("📦 Enquiry {}: {} → {}", enquiry.id, previous_status, enquiry.status);
        }

        Ok(ApiResponse::success_with_message(enquiry, "Enquiry updated successfully"))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id, user_id).await? {
            return Err(not_found_error("Enquiry", id));
        }
        tracing::info!("🗑️  Enquiry {} eliminada con sus quotes, pedidos y links", id);
        Ok(())
    }
}
