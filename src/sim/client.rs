use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::graph::CityGraph;
use super::state::TravelState;

/// Thin wrapper over the travel simulation REST endpoints. Cheap to clone;
/// clones share the underlying connection pool.
#[derive(Clone)]
pub struct TravelClient {
    base: String,
    http: Client,
}

impl TravelClient {
    pub fn new(base: &str) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            base: base.trim_end_matches('/').to_owned(),
            http,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn fetch_graph(&self) -> Result<CityGraph> {
        let mut graph: CityGraph = self.send(self.http.get(self.url("/api/travel/graph")))?;
        graph.build_index();
        Ok(graph)
    }

    pub fn fetch_state(&self) -> Result<TravelState> {
        self.send(self.http.get(self.url("/api/travel/state")))
    }

    /// Restart the trip, forwarding the operator's persisted picks when set.
    pub fn reset(&self, home_id: Option<&str>, taxi_start: Option<&str>) -> Result<TravelState> {
        let mut request = self.http.post(self.url("/api/travel/reset"));
        if let Some(home) = home_id {
            request = request.query(&[("home_id", home)]);
        }
        if let Some(taxi) = taxi_start {
            request = request.query(&[("taxi_start", taxi)]);
        }
        self.send(request)
    }

    pub fn step(&self, n: u32) -> Result<TravelState> {
        self.send(
            self.http
                .post(self.url("/api/travel/step"))
                .query(&[("n", n)]),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .with_context(|| format!("request to {} failed", self.base))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("{} responded with {status}", self.base));
        }

        response.json().context("invalid JSON from the backend")
    }
}
