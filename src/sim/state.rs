use serde::Deserialize;

/// One complete snapshot of the remote travel simulation. Every poll or
/// mutating request returns the whole thing; fields the backend omits
/// deserialize to their defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TravelState {
    pub step: u64,
    pub finished: bool,
    pub buyer: BuyerState,
    pub taxi: TaxiState,
    pub target: TargetState,
    pub plan: PlanState,
    pub messages: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuyerState {
    pub home: String,
    pub node: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaxiState {
    pub node: String,
    pub onboard: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TargetState {
    pub branch_id: String,
    pub store_node: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlanState {
    pub len: usize,
    pub index: usize,
    pub next: Option<PlanAction>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlanAction {
    pub kind: String,
    pub a: Option<String>,
    pub b: Option<String>,
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_backend_snapshot() {
        let raw = r#"{
            "step": 4,
            "finished": false,
            "buyer": {"home": "n7", "node": "n7"},
            "taxi": {"node": "n2", "onboard": false},
            "target": {"branch_id": "HX1", "store_node": "n3"},
            "plan": {"len": 9, "index": 4, "next": {"kind": "move", "a": "n2", "b": "n5", "cost": 0.41}},
            "messages": ["taxi n1->n2"]
        }"#;

        let state: TravelState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.step, 4);
        assert_eq!(state.taxi.node, "n2");
        assert!(!state.taxi.onboard);
        assert_eq!(state.plan.next.as_ref().unwrap().b.as_deref(), Some("n5"));
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn tolerates_a_minimal_snapshot() {
        let state: TravelState = serde_json::from_str(r#"{"step": 0}"#).unwrap();
        assert!(state.taxi.node.is_empty());
        assert!(state.plan.next.is_none());
    }
}
