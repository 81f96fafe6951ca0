use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::dashboard_dto::{ActivityItem, DashboardStats, RecentActivityQuery};
use crate::repositories::dashboard_repository::DashboardRepository;
use crate::utils::errors::AppError;

const DEFAULT_ACTIVITY_LIMIT: u32 = 10;

pub struct DashboardController {
    repository: DashboardRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DashboardRepository::new(pool),
        }
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<DashboardStats, AppError> {
        let (total_leads, total_brokers, pending_enquiries, open_transport_enquiries, pending_quotes, active_orders) =
            futures::try_join!(
                self.repository.count_leads(user_id),
                self.repository.count_brokers(user_id),
                self.repository.count_pending_enquiries(user_id),
                self.repository.count_open_transport_enquiries(user_id),
                self.repository.count_pending_quotes(user_id),
                self.repository.count_active_customer_orders(user_id)
            )?;

        Ok(DashboardStats {
            total_leads,
            total_brokers,
            open_enquiries: pending_enquiries + open_transport_enquiries,
            pending_quotes,
            active_customer_orders: active_orders,
        })
    }

    pub async fn recent_activity(&self, user_id: Uuid, query: RecentActivityQuery) -> Result<Vec<ActivityItem>, AppError> {
        query.validate()?;
        let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
        self.repository.recent_activity(user_id, i64::from(limit)).await
    }
}
