use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::transport_enquiry_dto::{
    CreateTransportEnquiryRequest, RouteSearchQuery, TransportEnquiryFilter, TransportEnquiryRankingResponse,
    TransportEnquiryResponse, TransportEnquiryRow, UpdateTransportEnquiryRequest,
};
use crate::models::transport_enquiry::{TransportEnquiry, TransportEnquiryStatus};
use crate::repositories::bid_repository::BidRepository;
use crate::repositories::transport_enquiry_repository::{
    TransportEnquiryQuery, TransportEnquiryRepository, TRANSPORT_ENQUIRY_SORTABLE,
};
use crate::repositories::transport_route_repository::TransportRouteRepository;
use crate::services::bid_ranking::{rank_bids, summarize, summarize_by_enquiry};
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::{merge_text, normalize_text};

pub struct TransportEnquiryController {
    pool: PgPool,
    repository: TransportEnquiryRepository,
    routes: TransportRouteRepository,
    bids: BidRepository,
}

impl TransportEnquiryController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TransportEnquiryRepository::new(pool.clone()),
            routes: TransportRouteRepository::new(pool.clone()),
            bids: BidRepository::new(pool.clone()),
            pool,
        }
    }

    /// Añade ruta y L1/L2 a cada fila; las pujas se cargan en una sola consulta
    pub async fn with_rankings(&self, rows: Vec<TransportEnquiryRow>) -> Result<Vec<TransportEnquiryResponse>, AppError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.enquiry.id).collect();
        let mut summaries = summarize_by_enquiry(self.bids.for_transport_enquiries(&ids).await?);

        Ok(rows
            .into_iter()
            .map(|row| {
                let ranking = summaries.remove(&row.enquiry.id).unwrap_or_default();
                TransportEnquiryResponse::new(row, ranking)
            })
            .collect())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateTransportEnquiryRequest,
    ) -> Result<ApiResponse<TransportEnquiryResponse>, AppError> {
        request.validate()?;

        if !self.routes.exists(request.route_id, user_id).await? {
            return Err(not_found_error("Transport route", request.route_id));
        }

        let now = Utc::now();
        let enquiry = TransportEnquiry {
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

        let mut conn = self.pool.acquire().await?;
        let enquiry = TransportEnquiryRepository::insert(&mut conn, &enquiry).await?;
        tracing::info!("🚚 Transport enquiry {} abierta en ruta {}", enquiry.id, enquiry.route_id);

        let response = self.get_by_id(enquiry.id, user_id).await?;
        Ok(ApiResponse::success_with_message(response, "Transport enquiry created successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<TransportEnquiryResponse, AppError> {
        let row = self
            .repository
            .find_row(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Transport enquiry", id))?;

        let bids = self.bids.for_transport_enquiries(&[id]).await?;
        Ok(TransportEnquiryResponse::new(row, summarize(&bids)))
    }

    pub async fn list(
        &self,
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

        let (rows, total) = self.repository.list(user_id, &filter, &params).await?;
        let items = self.with_rankings(rows).await?;
        Ok(Paginated::new(items, params.page, total))
    }

    pub async fn search_by_route(
        &self,
        user_id: Uuid,
        query: RouteSearchQuery,
    ) -> Result<Vec<TransportEnquiryResponse>, AppError> {
        query.validate()?;
        let rows = self.repository.search_by_route(user_id, &query.route).await?;
        self.with_rankings(rows).await
    }

    pub async fn ranking(&self, id: Uuid, user_id: Uuid) -> Result<TransportEnquiryRankingResponse, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Transport enquiry", id))?;

        let bids = self.bids.for_transport_enquiries(&[id]).await?;
        let summary = summarize(&bids);
        Ok(TransportEnquiryRankingResponse {
            transport_enquiry_id: id,
            bids: rank_bids(bids),
            summary,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateTransportEnquiryRequest,
    ) -> Result<ApiResponse<TransportEnquiryResponse>, AppError> {
        request.validate()?;

        // Mismo bloqueo que pujas y adjudicación: el estado leído es el vigente
        let mut tx = self.pool.begin().await?;
        let current = TransportEnquiryRepository::lock_by_id(&mut tx, id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Transport enquiry", id))?;

        let status = request.status.unwrap_or(current.status);
        if !current.status.can_set_manually(status) {
            return Err(conflict_error(format!(
                "Transport enquiry cannot move from {} to {}; it is closed only by awarding a bid",
                current.status, status
            )));
        }

        if let Some(route_id) = request.route_id {
            if route_id != current.route_id && !self.routes.exists(route_id, user_id).await? {
                return Err(not_found_error("Transport route", route_id));
            }
        }

        let enquiry = TransportEnquiry {
            route_id: request.route_id.unwrap_or(current.route_id),
            cargo_type: request
                .cargo_type
                .map(|cargo| cargo.trim().to_string())
                .unwrap_or(current.cargo_type),
            cargo_weight: request.cargo_weight.or(current.cargo_weight),
            transport_date: request.transport_date.or(current.transport_date),
            remarks: merge_text(request.remarks, current.remarks),
            status,
            ..current
        };
        TransportEnquiryRepository::update(&mut tx, &enquiry).await?;
        tx.commit().await?;

        let response = self.get_by_id(id, user_id).await?;
        Ok(ApiResponse::success_with_message(response, "Transport enquiry updated successfully"))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id, user_id).await? {
            return Err(not_found_error("Transport enquiry", id));
        }
        Ok(())
    }
}
