use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::customer_order_dto::{
    CreateCustomerOrderRequest, CustomerOrderDetailResponse, CustomerOrderListItem, PromotionResponse,
    UpdateCustomerOrderRequest,
};
use crate::models::customer_order::{CustomerOrder, CustomerOrderStatus};
use crate::models::enquiry::EnquiryStatus;
use crate::repositories::customer_order_repository::{CustomerOrderRepository, CUSTOMER_ORDER_SORTABLE};
use crate::repositories::enquiry_repository::EnquiryRepository;
use crate::repositories::quote_repository::QuoteRepository;
use crate::services::order_promotion::{check_order_transition, plan_promotion};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{merge_text, normalize_text};

pub struct CustomerOrderController {
    pool: PgPool,
    repository: CustomerOrderRepository,
    enquiries: EnquiryRepository,
    quotes: QuoteRepository,
}

impl CustomerOrderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CustomerOrderRepository::new(pool.clone()),
            enquiries: EnquiryRepository::new(pool.clone()),
            quotes: QuoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Promueve una enquiry a pedido de cliente.
    ///
    /// La enquiry se bloquea (`FOR UPDATE`) para que dos promociones
    /// simultáneas no creen dos pedidos; el índice único lo garantiza igualmente.
    pub async fn promote(
        &self,
        user_id: Uuid,
        request: CreateCustomerOrderRequest,
    ) -> Result<ApiResponse<PromotionResponse>, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let enquiry = EnquiryRepository::lock_by_id(&mut tx, request.enquiry_id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Enquiry", request.enquiry_id))?;
        let quotes = QuoteRepository::list_for_enquiry_in(&mut tx, enquiry.id).await?;
        let has_order = CustomerOrderRepository::exists_for_enquiry_in(&mut tx, enquiry.id).await?;

        let plan = match plan_promotion(&enquiry, &quotes, has_order, request.quote_id) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("⛔ Promoción rechazada para enquiry {}: {}", enquiry.id, e);
                return Err(e);
            }
        };

        let now = Utc::now();
        let order = CustomerOrder {
            id: Uuid::new_v4(),
            user_id,
            enquiry_id: plan.enquiry_id,
            quote_id: plan.quote_id,
            status: CustomerOrderStatus::Active,
            notes: normalize_text(request.notes),
            created_at: now,
            updated_at: now,
        };
        let customer_order = CustomerOrderRepository::insert(&mut tx, &order).await?;
        let enquiry = EnquiryRepository::set_status(&mut tx, enquiry.id, EnquiryStatus::Accepted).await?;

        tx.commit().await?;
        tracing::info!(
            "✅ Enquiry {} promovida: pedido {} con quote {}",
            enquiry.id,
            customer_order.id,
            customer_order.quote_id
        );

        Ok(ApiResponse::success_with_message(
            PromotionResponse { customer_order, enquiry },
            "Enquiry promoted to customer order",
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<CustomerOrderDetailResponse, AppError> {
        let order = self.find(id, user_id).await?;

        let (enquiry, quote) = futures::try_join!(
            self.enquiries.find_by_id(order.enquiry_id, user_id),
            self.quotes.find_by_id(order.quote_id, user_id),
        )?;

        Ok(CustomerOrderDetailResponse {
            enquiry: enquiry.ok_or_else(|| not_found_error("Enquiry", order.enquiry_id))?,
            quote: quote.ok_or_else(|| not_found_error("Quote", order.quote_id))?,
            order,
        })
    }

    async fn find(&self, id: Uuid, user_id: Uuid) -> Result<CustomerOrder, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Customer order", id))
    }

    pub async fn list(&self, user_id: Uuid, query: ListQuery) -> Result<Paginated<CustomerOrderListItem>, AppError> {
        let params = query.to_params(CUSTOMER_ORDER_SORTABLE)?;
        let status = query.parse_status::<CustomerOrderStatus>()?;
        let (items, total) = self.repository.list(user_id, status, &params).await?;
        Ok(Paginated::new(items, params.page, total))
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateCustomerOrderRequest,
    ) -> Result<ApiResponse<CustomerOrder>, AppError> {
        request.validate()?;

        let current = self.find(id, user_id).await?;
        let status = request.status.unwrap_or(current.status);
        check_order_transition(current.status, status)?;
        let previous_status = current.status;

        let order = CustomerOrder {
            status,
            notes: merge_text(request.notes, current.notes),
            ..current
        };
        let order = self.repository.update(&order).await?;
        if order.status != previous_status {
            tracing::info!("📋 Pedido de cliente {}: {} → {}", order.id, previous_status, order.status);
        }

        Ok(ApiResponse::success_with_message(order, "Customer order updated successfully"))
    }

    /// Borra el pedido y devuelve la enquiry a `pending` en la misma transacción
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let order = CustomerOrderRepository::delete_in(&mut tx, id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Customer order", id))?;
        EnquiryRepository::set_status(&mut tx, order.enquiry_id, EnquiryStatus::Pending).await?;

        tx.commit().await?;
        tracing::info!("🗑️  Pedido de cliente {} eliminado; enquiry {} vuelve a pending", id, order.enquiry_id);
        Ok(())
    }
}
