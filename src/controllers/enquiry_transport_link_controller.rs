use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::transport_enquiry_controller::TransportEnquiryController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::enquiry_transport_link_dto::{
    CreateLinkedTransportEnquiryRequest, LinkCreatedResponse, LinkTransportEnquiryRequest, LinkedTransportEnquiry,
};
use crate::dto::transport_enquiry_dto::{TransportEnquiryFilter, TransportEnquiryResponse};
use crate::models::enquiry_transport_link::EnquiryTransportLink;
use crate::models::transport_enquiry::{TransportEnquiry, TransportEnquiryStatus};
use crate::repositories::bid_repository::BidRepository;
use crate::repositories::enquiry_repository::EnquiryRepository;
use crate::repositories::enquiry_transport_link_repository::EnquiryTransportLinkRepository;
use crate::repositories::transport_enquiry_repository::{
    TransportEnquiryQuery, TransportEnquiryRepository, TRANSPORT_ENQUIRY_SORTABLE,
};
use crate::repositories::transport_route_repository::TransportRouteRepository;
use crate::services::bid_ranking::summarize_by_enquiry;
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::normalize_text;

/// Enlaces entre enquiries de cliente y transport enquiries
pub struct EnquiryTransportLinkController {
    pool: PgPool,
    repository: EnquiryTransportLinkRepository,
    enquiries: EnquiryRepository,
    transport_enquiries: TransportEnquiryRepository,
    routes: TransportRouteRepository,
    bids: BidRepository,
}

impl EnquiryTransportLinkController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: EnquiryTransportLinkRepository::new(pool.clone()),
            enquiries: EnquiryRepository::new(pool.clone()),
            transport_enquiries: TransportEnquiryRepository::new(pool.clone()),
            routes: TransportRouteRepository::new(pool.clone()),
            bids: BidRepository::new(pool.clone()),
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

    fn new_link(user_id: Uuid, enquiry_id: Uuid, transport_enquiry_id: Uuid, notes: Option<String>) -> EnquiryTransportLink {
        let now = Utc::now();
        EnquiryTransportLink {
            id: Uuid::new_v4(),
            user_id,
            enquiry_id,
            transport_enquiry_id,
            notes: normalize_text(notes),
            created_at: now,
            updated_at: now,
        }
    }

    /// Transport enquiries enlazadas, cada una con su L1/L2
    pub async fn list(&self, enquiry_id: Uuid, user_id: Uuid) -> Result<Vec<LinkedTransportEnquiry>, AppError> {
        self.ensure_enquiry(enquiry_id, user_id).await?;

        let rows = self.repository.list_for_enquiry(enquiry_id, user_id).await?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.transport_enquiry.id).collect();
        let mut summaries = summarize_by_enquiry(self.bids.for_transport_enquiries(&ids).await?);

        Ok(rows
            .into_iter()
            .map(|row| {
                let ranking = summaries.remove(&row.transport_enquiry.id).unwrap_or_default();
                LinkedTransportEnquiry::new(row, ranking)
            })
            .collect())
    }

    /// Transport enquiries todavía no enlazadas a la enquiry
    pub async fn available(
        &self,
        enquiry_id: Uuid,
        user_id: Uuid,
        query: ListQuery,
        filter: TransportEnquiryFilter,
    ) -> Result<Paginated<TransportEnquiryResponse>, AppError> {
        let params = query.to_params(TRANSPORT_ENQUIRY_SORTABLE)?;
        let filter = TransportEnquiryQuery {
            status: query.parse_status::<TransportEnquiryStatus>()?,
            cargo_type: filter.cargo_type,
            route_id: filter.route_id,
        };
        self.ensure_enquiry(enquiry_id, user_id).await?;

        let (rows, total) = self
            .transport_enquiries
            .available_for(user_id, enquiry_id, &filter, &params)
            .await?;
        let items = TransportEnquiryController::new(self.pool.clone()).with_rankings(rows).await?;
        Ok(Paginated::new(items, params.page, total))
    }

    pub async fn link(
        &self,
        user_id: Uuid,
        request: LinkTransportEnquiryRequest,
    ) -> Result<ApiResponse<LinkCreatedResponse>, AppError> {
        request.validate()?;

        self.ensure_enquiry(request.enquiry_id, user_id).await?;
        if self
            .transport_enquiries
            .find_by_id(request.transport_enquiry_id, user_id)
            .await?
            .is_none()
        {
            return Err(not_found_error("Transport enquiry", request.transport_enquiry_id));
        }
        if self
            .repository
            .exists(request.enquiry_id, request.transport_enquiry_id)
            .await?
        {
            return Err(conflict_error(format!(
                "Transport enquiry {} is already linked to enquiry {}",
                request.transport_enquiry_id, request.enquiry_id
            )));
        }

        let link = Self::new_link(user_id, request.enquiry_id, request.transport_enquiry_id, request.notes);
        let mut conn = self.pool.acquire().await?;
        let link = EnquiryTransportLinkRepository::insert(&mut conn, &link).await?;

        tracing::info!("🔗 Enquiry {} enlazada a transport enquiry {}", link.enquiry_id, link.transport_enquiry_id);
        Ok(ApiResponse::success_with_message(
            LinkCreatedResponse {
                link,
                transport_enquiry: None,
            },
            "Transport enquiry linked successfully",
        ))
    }

    /// Crea la transport enquiry y el enlace en una sola transacción
    pub async fn create_with_new_transport_enquiry(
        &self,
        user_id: Uuid,
        request: CreateLinkedTransportEnquiryRequest,
    ) -> Result<ApiResponse<LinkCreatedResponse>, AppError> {
        request.validate()?;

        self.ensure_enquiry(request.enquiry_id, user_id).await?;
        if !self.routes.exists(request.route_id, user_id).await? {
            return Err(not_found_error("Transport route", request.route_id));
        }

        let now = Utc::now();
        let transport_enquiry = TransportEnquiry {
            id: Uuid::new_v4(),
            user_id,
            route_id: request.route_id,
            cargo_type: request.cargo_type.trim().to_string(),
            cargo_weight: request.cargo_weight,
            transport_date: request.transport_date,
            remarks: normalize_text(request.remarks),
            status: TransportEnquiryStatus::Open,
            created_at: now,
            updated_at: now,
        };
        let link = Self::new_link(user_id, request.enquiry_id, transport_enquiry.id, request.notes);

        let mut tx = self.pool.begin().await?;
        let transport_enquiry = TransportEnquiryRepository::insert(&mut tx, &transport_enquiry).await?;
        let link = EnquiryTransportLinkRepository::insert(&mut tx, &link).await?;
        tx.commit().await?;

        tracing::info!(
            "🔗 Transport enquiry {} creada y enlazada a enquiry {}",
            transport_enquiry.id,
            link.enquiry_id
        );
        Ok(ApiResponse::success_with_message(
            LinkCreatedResponse {
                link,
                transport_enquiry: Some(transport_enquiry),
            },
            "Transport enquiry created and linked successfully",
        ))
    }

    pub async fn delete(&self, link_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(link_id, user_id).await? {
            return Err(not_found_error("Enquiry transport link", link_id));
        }
        Ok(())
    }
}
