//! Controllers
//!
//! Orquestan validación, reglas de negocio y repositorios. Cada petición
//! crea su controller a partir del pool compartido.

use std::collections::HashMap;
use std::hash::Hash;

pub mod bid_controller;
pub mod broker_controller;
pub mod customer_order_controller;
pub mod dashboard_controller;
pub mod enquiry_controller;
pub mod enquiry_transport_link_controller;
pub mod lead_controller;
pub mod quote_controller;
pub mod transport_enquiry_controller;
pub mod transport_order_controller;
pub mod transport_route_controller;
pub mod vehicle_type_controller;

/// Agrupa filas hijas por la clave de su padre
pub(crate) fn group_by<K, T>(items: Vec<T>, key: impl Fn(&T) -> K) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
{
    let mut grouped: HashMap<K, Vec<T>> = HashMap::new();
    for item in items {
        grouped.entry(key(&item)).or_default().push(item);
    }
    grouped
}
