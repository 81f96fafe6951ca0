use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::bid_dto::{BidFilter, BidResponse, CreateBidRequest, UpdateBidRequest};
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::models::bid::Bid;
use crate::repositories::bid_repository::{BidRepository, BID_SORTABLE};
use crate::repositories::broker_repository::BrokerRepository;
use crate::repositories::transport_enquiry_repository::TransportEnquiryRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};

pub struct BidController {
    pool: PgPool,
    repository: BidRepository,
    brokers: BrokerRepository,
}

impl BidController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BidRepository::new(pool.clone()),
            brokers: BrokerRepository::new(pool.clone()),
            pool,
        }
    }

    /// Registra una puja. La transport enquiry no puede estar cerrada y pasa
    /// de `open` a `bidding` con la primera puja.
    pub async fn create(&self, user_id: Uuid, request: CreateBidRequest) -> Result<ApiResponse<BidResponse>, AppError> {
        request.validate()?;

        if !self.brokers.exists(request.broker_id, user_id).await? {
            return Err(not_found_error("Broker", request.broker_id));
        }

        let mut tx = self.pool.begin().await?;

        let enquiry = TransportEnquiryRepository::lock_by_id(&mut tx, request.transport_enquiry_id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Transport enquiry", request.transport_enquiry_id))?;
        if !enquiry.status.accepts_bids() {
            return Err(conflict_error(format!(
                "Transport enquiry {} is closed and no longer accepts bids",
                enquiry.id
            )));
        }

        let now = Utc::now();
        let bid = Bid {
            id: Uuid::new_v4(),
            user_id,
            transport_enquiry_id: enquiry.id,
            broker_id: request.broker_id,
            rate: request.rate,
            created_at: now,
            updated_at: now,
        };
        let bid = BidRepository::insert(&mut tx, &bid).await?;

        let next_status = enquiry.status.after_bid();
        if next_status != enquiry.status {
            TransportEnquiryRepository::set_status(&mut tx, enquiry.id, next_status).await?;
        }
        tx.commit().await?;

        tracing::info!("🏷️  Puja {} registrada: {} para transport enquiry {}", bid.id, bid.rate, enquiry.id);
        let response = self.get_by_id(bid.id, user_id).await?;
        Ok(ApiResponse::success_with_message(response, "Bid placed successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<BidResponse, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .map(BidResponse::from)
            .ok_or_else(|| not_found_error("Bid", id))
    }

    pub async fn list(&self, user_id: Uuid, query: ListQuery, filter: BidFilter) -> Result<Paginated<BidResponse>, AppError> {
        let params = query.to_params(BID_SORTABLE)?;
        let (bids, total) = self
            .repository
            .list(user_id, filter.transport_enquiry_id, filter.broker_id, &params)
            .await?;
        Ok(Paginated::new(bids, params.page, total).map(BidResponse::from))
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateBidRequest,
    ) -> Result<ApiResponse<BidResponse>, AppError> {
        request.validate()?;

        if let Some(rate) = request.rate {
            self.repository
                .update_rate(id, user_id, rate)
                .await?
                .ok_or_else(|| not_found_error("Bid", id))?;
        }

        let response = self.get_by_id(id, user_id).await?;
        Ok(ApiResponse::success_with_message(response, "Bid updated successfully"))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id, user_id).await? {
            return Err(not_found_error("Bid", id));
        }
        Ok(())
    }
}
