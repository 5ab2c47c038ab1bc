mod client;
mod graph;
mod state;

pub use client::TravelClient;
pub use graph::{CityEdge, CityGraph, CityNode, EdgeClass, NodeKind, StoreRef};
pub use state::TravelState;
