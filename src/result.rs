use serde::Serialize;

use crate::graph::{ArcId, NodeId};
use crate::network::Network;
use crate::push_relabel::{PushRelabel, SolveStats};

/// Outcome of a finished solve, keyed by the ids of the solved network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowResult {
    value: f64,
    flows: Vec<f64>, // indexed by network arc id
    source_side: Vec<NodeId>,
    cut_arcs: Vec<ArcId>,
    stats: SolveStats,
}

impl FlowResult {
    /// Reads flows and the cut off a finished engine.
    ///
    /// The cut consists of the vertices whose height reached the cut-off,
    /// which after the closing global relabel are exactly the vertices that
    /// cannot reach the sink any more.
    pub fn extract(algo: &PushRelabel<'_>) -> Self {
        let network = algo.network();
        let residual = algo.residual();

        let mut flows = vec![0.0; network.arc_bound()];
        for (arc_id, _) in network.arcs() {
            if let Some(residual_id) = residual.residual_of(arc_id) {
                flows[arc_id] = algo.preflow(residual_id);
            }
        }

        let cut_off = algo.cut_off();
        let on_source_side: Vec<bool> = algo.heights().iter().map(|&h| h >= cut_off).collect();
        let source_side = (0..on_source_side.len())
            .filter(|&node| on_source_side[node])
            .collect();
        let cut_arcs = network
            .arcs()
            .filter_map(|(arc_id, _)| network.endpoints(arc_id).map(|ends| (arc_id, ends)))
            .filter(|&(_, (from, into))| on_source_side[from] && !on_source_side[into])
            .map(|(arc_id, _)| arc_id)
            .collect();

        let source = algo.source();
        let outflow: f64 = network.outgoing(source).map(|arc| flows[arc]).sum();
        let inflow: f64 = network.incoming(source).map(|arc| flows[arc]).sum();

        FlowResult {
            value: outflow - inflow,
            flows,
            source_side,
            cut_arcs,
            stats: algo.stats().clone(),
        }
    }

    pub fn max_flow_value(&self) -> f64 {
        self.value
    }

    /// Flow on a network arc; 0 for arcs the solve never touched.
    pub fn flow_of(&self, arc: ArcId) -> f64 {
        self.flows.get(arc).copied().unwrap_or(0.0)
    }

    pub fn flow_of_named(&self, network: &Network, name: &str) -> Option<f64> {
        network.arc_id(name).map(|arc| self.flow_of(arc))
    }

    /// (arc id, flow) for every arc id of the solved network.
    pub fn flows(&self) -> impl Iterator<Item = (ArcId, f64)> + '_ {
        self.flows.iter().copied().enumerate()
    }

    pub fn min_cut_arcs(&self) -> &[ArcId] {
        &self.cut_arcs
    }

    pub fn source_side(&self) -> &[NodeId] {
        &self.source_side
    }

    pub fn cut_capacity(&self, network: &Network) -> f64 {
        self.cut_arcs
            .iter()
            .filter_map(|&arc| network.arc_by_id(arc))
            .map(|arc| arc.capacity())
            .sum()
    }

    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Checks capacity bounds on every arc and conservation at every vertex
    /// except the two with unbalanced flow.
    pub fn is_feasible(&self, network: &Network, tolerance: f64) -> bool {
        for (arc_id, arc) in network.arcs() {
            let flow = self.flow_of(arc_id);
            if flow < -tolerance || flow > arc.capacity() + tolerance {
                return false;
            }
        }
        let unbalanced = network
            .vertices()
            .filter(|&(node, _)| {
                let inflow: f64 = network.incoming(node).map(|arc| self.flow_of(arc)).sum();
                let outflow: f64 = network.outgoing(node).map(|arc| self.flow_of(arc)).sum();
                (inflow - outflow).abs() > tolerance
            })
            .count();
        unbalanced <= 2
    }
}
