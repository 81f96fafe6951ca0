//! Piezas comunes de los listados SQL
//!
//! Los filtros opcionales se expresan como `($n::tipo IS NULL OR ...)` para
//! que cada listado sea una consulta estática con binds fijos. Sólo el
//! `ORDER BY` se compone, y siempre desde columnas de una lista blanca.

use chrono::{DateTime, Utc};

use crate::dto::common_dto::{ListParams, Sort};

/// `ORDER BY` a partir de una columna ya validada, con desempate por id
pub fn order_clause(sort: &Sort, id_column: &str) -> String {
    format!(
        "ORDER BY {} {} NULLS LAST, {} {}",
        sort.column,
        sort.order.as_sql(),
        id_column,
        sort.order.as_sql()
    )
}

/// Patrón ILIKE "contiene"; `%` y `_` del usuario se escapan
pub fn contains_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Patrón ILIKE para la búsqueda libre
pub fn search_pattern(params: &ListParams) -> Option<String> {
    params.search.as_deref().map(contains_pattern)
}

/// Límites `[desde, hasta)` para columnas `created_at`
pub fn created_bounds(params: &ListParams) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    params.dates.timestamp_bounds()
}

pub fn limit_offset(params: &ListParams) -> (i64, i64) {
    (i64::from(params.page.limit), params.page.offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::common_dto::{ListQuery, SortOrder};

    #[test]
    fn test_order_clause() {
        let sort = Sort { column: "l.created_at", order: SortOrder::Asc };
        assert_eq!(order_clause(&sort, "l.id"), "ORDER BY l.created_at ASC NULLS LAST, l.id ASC");
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let query = ListQuery { search: Some(" 50%_off ".into()), ..Default::default() };
        let params = query.to_params(&[("created_at", "created_at")]).unwrap();
        assert_eq!(search_pattern(&params).as_deref(), Some("%50\\%\\_off%"));

        let params = ListQuery::default().to_params(&[("created_at", "created_at")]).unwrap();
        assert_eq!(search_pattern(&params), None);
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("steel_coils"), "%steel\\_coils%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_limit_offset() {
        let query = ListQuery { page: Some(2), limit: Some(25), ..Default::default() };
        let params = query.to_params(&[("created_at", "created_at")]).unwrap();
        assert_eq!(limit_offset(&params), (25, 25));
    }
}
