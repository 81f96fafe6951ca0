//! DTOs compartidos: envoltorio de respuesta, listados y paginación

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::models::ParseEnumError;
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::validate_date;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query string común a todos los listados
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    #[validate(length(max = 256))]
    pub search: Option<String>,
    pub status: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

/// Página solicitada ya validada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// Rango de fechas inclusivo (días completos)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Límites sobre columnas TIMESTAMPTZ: `[from 00:00, to+1 00:00)`
    pub fn timestamp_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let start = self
            .from
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc());
        let end = self
            .to
            .and_then(|date| date.checked_add_days(Days::new(1)))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc());
        (start, end)
    }
}

/// Orden resuelto contra la lista blanca de columnas del recurso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub order: SortOrder,
}

/// Parámetros de listado validados
#[derive(Debug, Clone)]
pub struct ListParams {
    pub page: PageRequest,
    pub search: Option<String>,
    pub dates: DateRange,
    pub sort: Sort,
}

impl ListQuery {
    /// Valida la query y resuelve `sort_by` contra `sortable`
    /// (pares nombre público → columna SQL). El primer par es el orden por defecto.
    pub fn to_params(&self, sortable: &[(&str, &'static str)]) -> AppResult<ListParams> {
        self.validate()?;

        let page = PageRequest {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        };

        let dates = DateRange {
            from: parse_optional_date("from_date", self.from_date.as_deref())?,
            to: parse_optional_date("to_date", self.to_date.as_deref())?,
        };
        if let (Some(from), Some(to)) = (dates.from, dates.to) {
            if from > to {
                return Err(validation_error("from_date", "from_date must not be after to_date"));
            }
        }

        let column = match self.sort_by.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => sortable.first().map(|(_, column)| *column).unwrap_or("created_at"),
            Some(requested) => sortable
                .iter()
                .find(|(name, _)| *name == requested)
                .map(|(_, column)| *column)
                .ok_or_else(|| validation_error("sort_by", "unsupported sort field"))?,
        };

        Ok(ListParams {
            page,
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            dates,
            sort: Sort {
                column,
                order: self.sort_order.unwrap_or_default(),
            },
        })
    }

    /// Filtro de estado tipado para el recurso
    pub fn parse_status<S>(&self) -> AppResult<Option<S>>
    where
        S: FromStr<Err = ParseEnumError>,
    {
        match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e: ParseEnumError| validation_error("status", &e.to_string())),
        }
    }
}

fn parse_optional_date(field: &'static str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => validate_date(raw)
            .map(Some)
            .map_err(|_| validation_error(field, "expected a date in YYYY-MM-DD format")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let limit = i64::from(request.limit.max(1));
        let pages = (total.max(0) + limit - 1) / limit;
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages,
            has_next: i64::from(request.page) < pages,
            has_prev: request.page > 1,
        }
    }
}

/// Página de resultados
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enquiry::EnquiryStatus;
    use crate::utils::errors::AppError;

    const SORTABLE: &[(&str, &str)] = &[("created_at", "e.created_at"), ("status", "e.status")];

    #[test]
    fn test_defaults() {
        let params = ListQuery::default().to_params(SORTABLE).unwrap();
        assert_eq!(params.page, PageRequest { page: 1, limit: 10 });
        assert_eq!(params.sort.column, "e.created_at");
        assert_eq!(params.sort.order, SortOrder::Desc);
        assert!(params.dates.is_empty());
        assert!(params.search.is_none());
    }

    #[test]
    fn test_limit_and_page_bounds() {
        let query = ListQuery { limit: Some(101), ..Default::default() };
        assert!(matches!(query.to_params(SORTABLE), Err(AppError::Validation(_))));

        let query = ListQuery { page: Some(0), ..Default::default() };
        assert!(query.to_params(SORTABLE).is_err());

        let query = ListQuery { page: Some(3), limit: Some(100), ..Default::default() };
        let params = query.to_params(SORTABLE).unwrap();
        assert_eq!(params.page.offset(), 200);
    }

    #[test]
    fn test_sort_by_whitelist() {
        let query = ListQuery { sort_by: Some("status".into()), sort_order: Some(SortOrder::Asc), ..Default::default() };
        let params = query.to_params(SORTABLE).unwrap();
        assert_eq!(params.sort, Sort { column: "e.status", order: SortOrder::Asc });

        let query = ListQuery { sort_by: Some("id; DROP TABLE leads".into()), ..Default::default() };
        assert!(query.to_params(SORTABLE).is_err());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let query = ListQuery {
            from_date: Some("2024-03-01".into()),
            to_date: Some("2024-03-01".into()),
            ..Default::default()
        };
        let params = query.to_params(SORTABLE).unwrap();
        let (start, end) = params.dates.timestamp_bounds();
        assert_eq!(start.unwrap().to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(end.unwrap().to_rfc3339(), "2024-03-02T00:00:00+00:00");
    }

    #[test]
    fn test_invalid_dates() {
        let query = ListQuery { from_date: Some("01/03/2024".into()), ..Default::default() };
        assert!(query.to_params(SORTABLE).is_err());

        let query = ListQuery {
            from_date: Some("2024-03-05".into()),
            to_date: Some("2024-03-01".into()),
            ..Default::default()
        };
        assert!(query.to_params(SORTABLE).is_err());
    }

    #[test]
    fn test_status_filter() {
        let query = ListQuery { status: Some("rejected".into()), ..Default::default() };
        assert_eq!(query.parse_status::<EnquiryStatus>().unwrap(), Some(EnquiryStatus::Rejected));

        let query = ListQuery { status: Some("closed".into()), ..Default::default() };
        assert!(query.parse_status::<EnquiryStatus>().is_err());
    }

    #[test]
    fn test_pagination_math() {
        let pagination = Pagination::new(PageRequest { page: 2, limit: 10 }, 25);
        assert_eq!(pagination.pages, 3);
        assert!(pagination.has_next);
        assert!(pagination.has_prev);

        let pagination = Pagination::new(PageRequest { page: 1, limit: 10 }, 0);
        assert_eq!(pagination.pages, 0);
        assert!(!pagination.has_next);
        assert!(!pagination.has_prev);

        let pagination = Pagination::new(PageRequest { page: 3, limit: 10 }, 30);
        assert!(!pagination.has_next);
    }
}
