use log::{debug, error, info, log_enabled, trace, warn, Level};
use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::frontier::Frontier;
use crate::graph::{ArcId, NodeId};
use crate::heuristics::{reaches_sink, Labels};
use crate::network::Network;
use crate::residual::{ArcKind, ResidualGraph};
use crate::result::FlowResult;

/// Excess at or below this amount does not make a vertex active.
pub const EPSILON: f64 = 1e-9;

/// How the next vertex to discharge is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Always discharge a vertex of maximal height.
    HighestLabel,
    /// Discharge vertices in the order they became active.
    Fifo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobalRelabel {
    Off,
    /// After as many relabels as the network has vertices.
    EveryVertexCount,
    Every(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub strategy: Strategy,
    pub global_relabel: GlobalRelabel,
    pub gap_heuristic: bool,
    /// Give up with [`SolveError::NotConverged`] after this many discharges.
    pub max_discharges: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::highest_label()
    }
}

impl SolverConfig {
    /// Highest-label selection on distance-seeded heights, no heuristics.
    pub fn highest_label() -> Self {
        SolverConfig {
            strategy: Strategy::HighestLabel,
            global_relabel: GlobalRelabel::Off,
            gap_heuristic: false,
            max_discharges: None,
        }
    }

    /// FIFO selection on exact heights with global relabeling every `|V|`
    /// relabels and the gap heuristic.
    pub fn fifo() -> Self {
        SolverConfig {
            strategy: Strategy::Fifo,
            global_relabel: GlobalRelabel::EveryVertexCount,
            gap_heuristic: true,
            max_discharges: None,
        }
    }

    pub fn with_global_relabel_interval(mut self, interval: usize) -> Self {
        self.global_relabel = GlobalRelabel::Every(interval);
        self
    }

    pub fn without_global_relabel(mut self) -> Self {
        self.global_relabel = GlobalRelabel::Off;
        self
    }

    pub fn with_gap_heuristic(mut self, enabled: bool) -> Self {
        self.gap_heuristic = enabled;
        self
    }

    pub fn with_max_discharges(mut self, limit: usize) -> Self {
        self.max_discharges = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        if self.global_relabel == GlobalRelabel::Every(0) {
            return Err(SolveError::InvalidConfig(
                "global relabel interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn global_relabel_interval(&self, n: usize) -> Option<usize> {
        match self.global_relabel {
            GlobalRelabel::Off => None,
            GlobalRelabel::EveryVertexCount => Some(n.max(1)),
            GlobalRelabel::Every(interval) => Some(interval),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    pub pushes: usize,
    pub relabels: usize,
    pub discharges: usize,
    pub global_relabels: usize,
    pub gap_promotions: usize,
}

/// One max-flow computation. Owns every piece of mutable state and only reads
/// the network it was created from.
#[derive(Debug)]
pub struct PushRelabel<'n> {
    network: &'n Network,
    config: SolverConfig,
    residual: ResidualGraph,
    source: NodeId,
    sink: NodeId,
    labels: Labels,
    excess: Vec<f64>,
    preflow: Vec<f64>, // indexed by residual arc id
    frontier: Frontier,
    queued: Vec<bool>,
    source_discharged: bool,
    relabels_since_global: usize,
    stats: SolveStats,
    finished: bool,
}

/// Solves the max-flow problem between two named vertices.
pub fn solve(
    network: &Network,
    source: &str,
    sink: &str,
    config: SolverConfig,
) -> Result<FlowResult, SolveError> {
    let source = network
        .vertex_id(source)
        .ok_or_else(|| SolveError::UnknownVertex(source.to_string()))?;
    let sink = network
        .vertex_id(sink)
        .ok_or_else(|| SolveError::UnknownVertex(sink.to_string()))?;
    let mut algo = PushRelabel::new(network, source, sink, config)?;
    algo.run()?;
    Ok(algo.result())
}

impl<'n> PushRelabel<'n> {
    pub fn new(
        network: &'n Network,
        source: NodeId,
        sink: NodeId,
        config: SolverConfig,
    ) -> Result<Self, SolveError> {
        config.validate()?;
        let n = network.number_of_vertices();
        if source >= n {
            return Err(SolveError::UnknownVertex(format!("#{}", source)));
        }
        if sink >= n {
            return Err(SolveError::UnknownVertex(format!("#{}", sink)));
        }
        if source == sink {
            let name = network.vertex_by_id(source).map_or("", |v| v.name());
            return Err(SolveError::SourceIsSink(name.to_string()));
        }

        let residual = ResidualGraph::from_network(network);
        let preflow = vec![0.0; residual.arc_bound()];

        // the extra unit guarantees every source arc can be saturated
        let mut excess = vec![0.0; n];
        excess[source] = network
            .outgoing(source)
            .filter_map(|arc| network.arc_by_id(arc))
            .map(|arc| arc.capacity())
            .sum::<f64>()
            + 1.0;

        let labels = match config.strategy {
            Strategy::HighestLabel => Labels::uniform(n, source, sink),
            Strategy::Fifo => Labels::exact(&residual, source, sink),
        };

        let mut frontier = Frontier::new(config.strategy, 2 * n);
        frontier.push(source, labels.get(source));
        let mut queued = vec![false; n];
        queued[source] = true;

        debug!(
            "initialized {:?} solve on {} ({} vertices, {} arcs)",
            config.strategy,
            network.name(),
            n,
            network.number_of_arcs()
        );

        Ok(PushRelabel {
            network,
            config,
            residual,
            source,
            sink,
            labels,
            excess,
            preflow,
            frontier,
            queued,
            source_discharged: false,
            relabels_since_global: 0,
            stats: SolveStats::default(),
            finished: false,
        })
    }

    /// Discharges active vertices until none is left.
    pub fn run(&mut self) -> Result<(), SolveError> {
        if self.finished {
            return Ok(());
        }
        if log_enabled!(Level::Trace) {
            self.trace_state();
        }

        while let Some(node) = self.frontier.pop() {
            self.queued[node] = false;
            if let Some(limit) = self.config.max_discharges {
                if self.stats.discharges >= limit {
                    return Err(SolveError::NotConverged {
                        discharges: self.stats.discharges,
                    });
                }
            }
            if node == self.source && !self.source_discharged {
                self.discharge_source();
            } else {
                self.discharge(node);
            }
            if self.is_active(node) {
                self.enqueue(node);
            }
        }

        // heights >= n now mark exactly the vertices cut off from the sink
        self.labels
            .global_relabel(&self.residual, self.source, self.sink);
        debug_assert!(reaches_sink(&self.residual, self.sink)
            .iter()
            .zip(self.labels.heights())
            .all(|(&reaches, &height)| reaches == (height < self.labels.cut_off())));
        self.finished = true;

        if log_enabled!(Level::Trace) {
            self.trace_state();
        }
        info!(
            "{:?} solve on {} finished: {} pushes, {} relabels, {} discharges",
            self.config.strategy,
            self.network.name(),
            self.stats.pushes,
            self.stats.relabels,
            self.stats.discharges
        );
        Ok(())
    }

    pub fn result(&self) -> FlowResult {
        FlowResult::extract(self)
    }

    pub fn network(&self) -> &'n Network {
        self.network
    }

    pub fn residual(&self) -> &ResidualGraph {
        &self.residual
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn sink(&self) -> NodeId {
        self.sink
    }

    pub fn height(&self, node: NodeId) -> usize {
        self.labels.get(node)
    }

    pub fn heights(&self) -> &[usize] {
        self.labels.heights()
    }

    pub fn cut_off(&self) -> usize {
        self.labels.cut_off()
    }

    pub fn excess(&self, node: NodeId) -> f64 {
        self.excess[node]
    }

    /// Flow pushed over a residual arc; reverse arcs carry the negated amount.
    pub fn preflow(&self, arc: ArcId) -> f64 {
        self.preflow.get(arc).copied().unwrap_or(0.0)
    }

    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_active(&self, node: NodeId) -> bool {
        node != self.sink
            && node != self.source
            && self.excess[node] > EPSILON
            && self.labels.get(node) < 2 * self.labels.cut_off()
    }

    fn is_admissible(&self, arc: ArcId) -> bool {
        let Some((from, into)) = self.residual.endpoints(arc) else {
            return false;
        };
        self.residual.capacity(arc) > 0.0 && self.labels.get(from) == self.labels.get(into) + 1
    }

    fn enqueue(&mut self, node: NodeId) {
        if !self.queued[node] {
            self.queued[node] = true;
            self.frontier.push(node, self.labels.get(node));
        }
    }

    /// The seeded source pushes over every outgoing arc regardless of heights.
    fn discharge_source(&mut self) {
        self.source_discharged = true;
        self.stats.discharges += 1;
        trace!("discharge source {}", self.source);
        let arcs: Vec<(NodeId, ArcId)> = self.residual.outgoing(self.source).collect();
        for (_, arc) in arcs {
            self.push_flow(arc);
        }
    }

    fn discharge(&mut self, node: NodeId) {
        debug_assert!(self.is_active(node), "discharging inactive vertex {}", node);
        if !self.is_active(node) {
            error!("vertex {} is not active, unable to discharge", node);
            return;
        }
        self.stats.discharges += 1;
        trace!("discharge vertex {}", node);

        let arcs: Vec<(NodeId, ArcId)> = self.residual.outgoing(node).collect();
        for (_, arc) in arcs {
            if self.excess[node] <= EPSILON {
                break;
            }
            if self.is_admissible(arc) {
                self.push(arc);
            }
        }
        if self.is_active(node) {
            self.relabel(node);
        }
    }

    fn push(&mut self, arc: ArcId) {
        let from = self.residual.endpoints(arc).map(|(from, _)| from);
        debug_assert!(
            from.is_some_and(|from| self.is_active(from)),
            "push over arc {} from an inactive vertex",
            arc
        );
        debug_assert!(self.is_admissible(arc), "push over inadmissible arc {}", arc);
        if !from.is_some_and(|from| self.is_active(from)) || !self.is_admissible(arc) {
            error!("arc {} is not admissible, unable to push", arc);
            return;
        }
        self.push_flow(arc);
    }

    fn push_flow(&mut self, arc: ArcId) {
        let Some((from, into)) = self.residual.endpoints(arc) else {
            return;
        };
        let delta = self.excess[from].min(self.residual.capacity(arc));
        if delta <= 0.0 {
            warn!("zero push over arc {} ({} -> {})", arc, from, into);
            return;
        }

        let Some(reverse) = self.residual.augment(arc, delta) else {
            error!("arc {} was never issued, unable to push", arc);
            return;
        };
        if self.preflow.len() < self.residual.arc_bound() {
            self.preflow.resize(self.residual.arc_bound(), 0.0);
        }
        self.preflow[arc] += delta;
        self.preflow[reverse] -= delta;
        self.excess[from] -= delta;
        self.excess[into] += delta;
        self.stats.pushes += 1;
        trace!("push {:.3} over arc {} ({} -> {})", delta, arc, from, into);

        if self.is_active(into) {
            self.enqueue(into);
        }
    }

    fn relabel(&mut self, node: NodeId) {
        debug_assert!(self.is_active(node), "relabeling inactive vertex {}", node);
        let admissible = self
            .residual
            .outgoing(node)
            .find(|(_, arc)| self.is_admissible(*arc));
        debug_assert!(
            admissible.is_none(),
            "relabeling vertex {} with admissible arc {:?}",
            node,
            admissible
        );
        if !self.is_active(node) || admissible.is_some() {
            error!("vertex {} still has an admissible arc, unable to relabel", node);
            return;
        }

        let old = self.labels.get(node);
        let lowest = self
            .residual
            .outgoing(node)
            .map(|(into, _)| self.labels.get(into))
            .min();
        let height = match lowest {
            Some(lowest) => lowest + 1,
            None => self.labels.cut_off().max(old + 1),
        };
        debug_assert!(
            height > old,
            "relabel of vertex {} would lower it from {} to {}",
            node,
            old,
            height
        );
        self.labels.set(node, height);
        self.stats.relabels += 1;
        trace!("relabel vertex {} from {} to {}", node, old, height);

        let mut rebuild = false;
        if self.config.gap_heuristic {
            let promoted = self.labels.gap_relabel(old);
            if !promoted.is_empty() {
                self.stats.gap_promotions += promoted.len();
                rebuild = true;
            }
        }
        self.relabels_since_global += 1;
        let n = self.labels.cut_off();
        if let Some(interval) = self.config.global_relabel_interval(n) {
            if self.relabels_since_global >= interval {
                self.labels
                    .global_relabel(&self.residual, self.source, self.sink);
                self.relabels_since_global = 0;
                self.stats.global_relabels += 1;
                rebuild = true;
            }
        }
        if rebuild {
            self.frontier.rebuild(self.labels.heights());
        }
    }

    fn trace_state(&self) {
        for node in 0..self.excess.len() {
            trace!(
                "vertex {}: h={} e={:.3} {}",
                node,
                self.labels.get(node),
                self.excess[node],
                if self.is_active(node) { "active" } else { "passive" }
            );
        }
        for arc in 0..self.residual.arc_bound() {
            if self.residual.is_open(arc) {
                let kind = match self.residual.kind(arc) {
                    Some(ArcKind::Original(network_arc)) => format!("original {}", network_arc),
                    Some(ArcKind::Reverse) => format!("reverse of {:?}", self.residual.reverse_of(arc)),
                    None => "unknown".to_string(),
                };
                trace!(
                    "arc {} ({}): f={:.3} rc={:.3}",
                    arc,
                    kind,
                    self.preflow(arc),
                    self.residual.capacity(arc)
                );
            }
        }
    }
}
