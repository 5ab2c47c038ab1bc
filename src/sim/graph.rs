use std::collections::HashMap;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Home,
    Store,
    // The backend emits both "taxi_stand" and the shorthand "taxi".
    #[serde(alias = "taxi")]
    TaxiStand,
    #[default]
    #[serde(other)]
    Generic,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Store => "store",
            Self::TaxiStand => "taxi stand",
            Self::Generic => "corner",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeClass {
    Arterial,
    #[default]
    #[serde(other)]
    Local,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CityNode {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub kind: NodeKind,
}

/// Endpoints may dangle; rendering skips edges whose endpoints are unknown.
#[derive(Clone, Debug, Deserialize)]
pub struct CityEdge {
    pub a: String,
    pub b: String,
    #[serde(default)]
    pub class: EdgeClass,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StoreRef {
    #[serde(default)]
    pub branch_id: String,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub name: String,
}

/// Static node/edge collection for one session; immutable after load.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CityGraph {
    #[serde(default)]
    pub nodes: Vec<CityNode>,
    #[serde(default)]
    pub edges: Vec<CityEdge>,
    #[serde(default)]
    pub stores: Vec<StoreRef>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl CityGraph {
    pub fn build_index(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id.clone(), position))
            .collect();
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&CityNode> {
        self.node_index(id).map(|position| &self.nodes[position])
    }

    pub fn store_name(&self, node_id: &str) -> Option<&str> {
        self.stores
            .iter()
            .find(|store| store.node_id == node_id)
            .map(|store| store.name.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
