use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::transport_order_dto::{
    BrokerOption, CreateTransportOrderFromBidRequest, CreateTransportOrderRequest, RouteOption, TransportOrderFilter,
    TransportOrderListItem,
};
use crate::models::transport_enquiry::TransportEnquiryStatus;
use crate::models::transport_order::TransportOrder;
use crate::repositories::bid_repository::BidRepository;
use crate::repositories::broker_repository::BrokerRepository;
use crate::repositories::enquiry_repository::EnquiryRepository;
use crate::repositories::transport_enquiry_repository::TransportEnquiryRepository;
use crate::repositories::transport_order_repository::{TransportOrderRepository, TRANSPORT_ORDER_SORTABLE};
use crate::repositories::transport_route_repository::TransportRouteRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::normalize_text;

pub struct TransportOrderController {
    pool: PgPool,
    repository: TransportOrderRepository,
    enquiries: EnquiryRepository,
    brokers: BrokerRepository,
    routes: TransportRouteRepository,
}

impl TransportOrderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TransportOrderRepository::new(pool.clone()),
            enquiries: EnquiryRepository::new(pool.clone()),
            brokers: BrokerRepository::new(pool.clone()),
            routes: TransportRouteRepository::new(pool.clone()),
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

    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateTransportOrderRequest,
    ) -> Result<ApiResponse<TransportOrderListItem>, AppError> {
        request.validate()?;

        self.ensure_enquiry(request.enquiry_id, user_id).await?;
        if !self.brokers.exists(request.broker_id, user_id).await? {
            return Err(not_found_error("Broker", request.broker_id));
        }
        if !self.routes.exists(request.route_id, user_id).await? {
            return Err(not_found_error("Transport route", request.route_id));
        }

        let now = Utc::now();
        let order = TransportOrder {
            id: Uuid::new_v4(),
            user_id,
            enquiry_id: request.enquiry_id,
            broker_id: request.broker_id,
            route_id: request.route_id,
            transport_enquiry_id: None,
            bid_id: None,
            amount: request.amount,
            notes: normalize_text(request.notes),
            created_at: now,
            updated_at: now,
        };

        let mut conn = self.pool.acquire().await?;
        let order = TransportOrderRepository::insert(&mut conn, &order).await?;
        tracing::info!("📦 Transport order {} creado para enquiry {}", order.id, order.enquiry_id);

        let response = self.get_by_id(order.id, user_id).await?;
        Ok(ApiResponse::success_with_message(response, "Transport order created successfully"))
    }

    /// Adjudica una puja: el pedido toma broker, ruta e importe de la puja y
    /// la transport enquiry queda cerrada.
    pub async fn from_bid(
        &self,
        user_id: Uuid,
        request: CreateTransportOrderFromBidRequest,
    ) -> Result<ApiResponse<TransportOrderListItem>, AppError> {
        request.validate()?;
        self.ensure_enquiry(request.enquiry_id, user_id).await?;

        let mut tx = self.pool.begin().await?;

        let bid = BidRepository::find_in(&mut tx, request.bid_id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Bid", request.bid_id))?;
        let transport_enquiry = TransportEnquiryRepository::lock_by_id(&mut tx, bid.transport_enquiry_id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Transport enquiry", bid.transport_enquiry_id))?;
        if transport_enquiry.status.is_closed()
            || TransportOrderRepository::exists_for_transport_enquiry(&mut tx, transport_enquiry.id).await?
        {
            return Err(conflict_error(format!(
                "Transport enquiry {} has already been awarded",
                transport_enquiry.id
            )));
        }

        let now = Utc::now();
        let order = TransportOrder {
            id: Uuid::new_v4(),
            user_id,
            enquiry_id: request.enquiry_id,
            broker_id: bid.broker_id,
            route_id: transport_enquiry.route_id,
            transport_enquiry_id: Some(transport_enquiry.id),
            bid_id: Some(bid.id),
            amount: bid.rate,
            notes: normalize_text(request.notes),
            created_at: now,
            updated_at: now,
        };
        let order = TransportOrderRepository::insert(&mut tx, &order).await?;
        TransportEnquiryRepository::set_status(&mut tx, transport_enquiry.id, TransportEnquiryStatus::Closed).await?;
        tx.commit().await?;

        tracing::info!(
            "🤝 Puja {} adjudicada: transport order {} por {}, transport enquiry {} cerrada",
            bid.id,
            order.id,
            order.amount,
            transport_enquiry.id
        );
        let response = self.get_by_id(order.id, user_id).await?;
        Ok(ApiResponse::success_with_message(response, "Transport order created from bid"))
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<TransportOrderListItem, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Transport order", id))
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        query: ListQuery,
        filter: TransportOrderFilter,
    ) -> Result<Paginated<TransportOrderListItem>, AppError> {
        let params = query.to_params(TRANSPORT_ORDER_SORTABLE)?;
        let (orders, total) = self
            .repository
            .list(user_id, filter.enquiry_id, filter.broker_id, &params)
            .await?;
        Ok(Paginated::new(orders, params.page, total))
    }

    pub async fn broker_options(&self, user_id: Uuid) -> Result<Vec<BrokerOption>, AppError> {
        self.brokers.options(user_id).await
    }

    pub async fn route_options(&self, user_id: Uuid) -> Result<Vec<RouteOption>, AppError> {
        self.routes.options(user_id).await
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id, user_id).await? {
            return Err(not_found_error("Transport order", id));
        }
        Ok(())
    }
}
