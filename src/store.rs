use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::{Customer, LayoutMode, TopologyMap};

const SAMPLE_STORE_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_store.json"));

static SAMPLE_STORE: Lazy<TopologyStore> = Lazy::new(|| {
    TopologyStore::from_json_str(SAMPLE_STORE_JSON).expect("bundled sample store is valid JSON")
});

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("topology '{0}' not found")]
    NotFound(String),
    #[error("store contains no topologies")]
    Empty,
    #[error("failed to read store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse store: {0}")]
    Parse(String),
}

/// Read side of the external topology store, plus the single write the
/// engine needs (layout preference).
pub trait TopologySource {
    fn get_topology(&self, id: &str) -> Result<&TopologyMap, StoreError>;
    fn list_customers(&self) -> &[Customer];
    fn list_topologies(&self, customer_id: &str) -> Vec<&TopologyMap>;
    fn first_topology(&self) -> Option<&TopologyMap>;
    fn save_layout_preference(&mut self, topology_id: &str, mode: LayoutMode) -> Result<(), StoreError>;

    fn customer(&self, id: &str) -> Option<&Customer> {
        self.list_customers().iter().find(|customer| customer.id == id)
    }
}

/// In-memory store, loadable from a JSON (or JSON5) document of the form
/// `{ "customers": [...], "topologies": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyStore {
    #[serde(default)]
    customers: Vec<Customer>,
    #[serde(default)]
    topologies: Vec<TopologyMap>,
}

impl TopologyStore {
    pub fn new(customers: Vec<Customer>, topologies: Vec<TopologyMap>) -> Self {
        Self { customers, topologies }
    }

    /// The bundled demo data set.
    pub fn sample() -> Self {
        SAMPLE_STORE.clone()
    }

    pub fn from_json_str(input: &str) -> Result<Self, StoreError> {
        let store = match serde_json::from_str::<TopologyStore>(input) {
            Ok(store) => store,
            Err(json_err) => json5::from_str::<TopologyStore>(input)
                .map_err(|_| StoreError::Parse(json_err.to_string()))?,
        };
        store.validate()?;
        debug!(
            customers = store.customers.len(),
            topologies = store.topologies.len(),
            "loaded topology store"
        );
        Ok(store)
    }

    /// JSON5 admits `Infinity` and `NaN`; geometry and radio readings must
    /// be finite.
    fn validate(&self) -> Result<(), StoreError> {
        for topo in &self.topologies {
            for node in &topo.nodes {
                let fields = [
                    ("x", node.x),
                    ("y", node.y),
                    ("rssi", node.rssi),
                    ("frequency", node.frequency),
                ];
                if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
                    return Err(StoreError::Parse(format!(
                        "topology '{}': node '{}' has non-finite {field}",
                        topo.id, node.id
                    )));
                }
            }
            for link in &topo.links {
                let fields = [
                    ("bandwidth", link.bandwidth),
                    ("latency", link.latency),
                    ("distance", link.distance),
                    ("rssi", link.rssi),
                ];
                if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
                    return Err(StoreError::Parse(format!(
                        "topology '{}': link '{}' has non-finite {field}",
                        topo.id, link.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn topologies(&self) -> &[TopologyMap] {
        &self.topologies
    }

    /// Customers with their topologies, in store order.
    pub fn customer_tree(&self) -> Vec<CustomerEntry<'_>> {
        self.customers
            .iter()
            .map(|customer| CustomerEntry {
                customer,
                topologies: self
                    .list_topologies(&customer.id)
                    .into_iter()
                    .map(|topo| TopologySummary {
                        id: topo.id.as_str(),
                        name: topo.name.as_str(),
                        node_count: topo.nodes.len(),
                        link_count: topo.links.len(),
                    })
                    .collect(),
            })
            .collect()
    }
}

impl TopologySource for TopologyStore {
    fn get_topology(&self, id: &str) -> Result<&TopologyMap, StoreError> {
        self.topologies
            .iter()
            .find(|topo| topo.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list_customers(&self) -> &[Customer] {
        &self.customers
    }

    fn list_topologies(&self, customer_id: &str) -> Vec<&TopologyMap> {
        self.topologies
            .iter()
            .filter(|topo| topo.customer_id == customer_id)
            .collect()
    }

    fn first_topology(&self) -> Option<&TopologyMap> {
        self.topologies.first()
    }

    fn save_layout_preference(&mut self, topology_id: &str, mode: LayoutMode) -> Result<(), StoreError> {
        let topo = self
            .topologies
            .iter_mut()
            .find(|topo| topo.id == topology_id)
            .ok_or_else(|| StoreError::NotFound(topology_id.to_string()))?;
        topo.layout_preference = mode;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerEntry<'a> {
    pub customer: &'a Customer,
    pub topologies: Vec<TopologySummary<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopologySummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub node_count: usize,
    pub link_count: usize,
}
