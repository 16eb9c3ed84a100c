use crate::graph::{ArcId, GraphNetwork, NodeId};
use crate::network::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    /// Mirrors the network arc with this id.
    Original(ArcId),
    /// Carries flow back against its counterpart.
    Reverse,
}

/// Working copy of a network where arc data is the remaining residual capacity.
///
/// Vertices keep the network's ids. Reverse arcs do not exist until flow is
/// first pushed over their counterpart, and an arc whose capacity drops to zero
/// is detached until flow is sent back over it. Every network arc contributes
/// at most two residual arcs.
#[derive(Debug, Clone)]
pub struct ResidualGraph {
    graph: GraphNetwork<(), f64>,
    kind: Vec<ArcKind>,
    reverse: Vec<Option<ArcId>>,
    original: Vec<Option<ArcId>>, // indexed by network arc id
}

impl ResidualGraph {
    pub fn from_network(network: &Network) -> Self {
        let mut graph = GraphNetwork::new();
        graph.add_nodes(std::iter::repeat(()).take(network.number_of_vertices()));

        let mut kind = Vec::with_capacity(network.number_of_arcs() * 2);
        let mut original = vec![None; network.arc_bound()];
        for (arc_id, arc) in network.arcs() {
            let Some((from, into)) = network.endpoints(arc_id) else {
                continue;
            };
            let residual_id = if arc.capacity() > 0.0 {
                graph.connect(from, into, arc.capacity())
            } else {
                graph.connect_detached(from, into)
            };
            kind.push(ArcKind::Original(arc_id));
            original[arc_id] = Some(residual_id);
        }
        let reverse = vec![None; kind.len()];

        ResidualGraph {
            graph,
            kind,
            reverse,
            original,
        }
    }

    pub fn number_of_nodes(&self) -> usize {
        self.graph.number_of_nodes()
    }

    /// Arcs with positive residual capacity.
    pub fn number_of_arcs(&self) -> usize {
        self.graph.number_of_arcs()
    }

    /// Number of residual arcs ever materialised.
    pub fn arc_bound(&self) -> usize {
        self.graph.arc_bound()
    }

    pub fn capacity(&self, arc: ArcId) -> f64 {
        self.graph.data_of_arc(arc).copied().unwrap_or(0.0)
    }

    pub fn is_open(&self, arc: ArcId) -> bool {
        self.graph.is_arc_in(arc)
    }

    pub fn kind(&self, arc: ArcId) -> Option<ArcKind> {
        self.kind.get(arc).copied()
    }

    pub fn reverse_of(&self, arc: ArcId) -> Option<ArcId> {
        self.reverse.get(arc).copied().flatten()
    }

    /// Residual arc mirroring the given network arc.
    pub fn residual_of(&self, network_arc: ArcId) -> Option<ArcId> {
        self.original.get(network_arc).copied().flatten()
    }

    pub fn endpoints(&self, arc: ArcId) -> Option<(NodeId, NodeId)> {
        self.graph.endpoints(arc)
    }

    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = (NodeId, ArcId)> + '_ {
        self.graph.from_node(node)
    }

    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = (NodeId, ArcId)> + '_ {
        self.graph.into_node(node)
    }

    /// Moves `delta` units of residual capacity from `arc` to its reverse,
    /// materialising or reattaching the reverse arc when needed.
    /// Returns the id of the reverse arc, or `None` for an id never issued.
    pub fn augment(&mut self, arc: ArcId, delta: f64) -> Option<ArcId> {
        debug_assert!(delta > 0.0, "augmenting by {}", delta);
        let (from, into) = self.graph.endpoints(arc)?;
        if let Some(capacity) = self.graph.mut_data_of_arc(arc) {
            *capacity -= delta;
            if *capacity <= 0.0 {
                self.graph.disconnect(arc);
            }
        }

        let reverse = match self.reverse[arc] {
            Some(reverse) => reverse,
            None => {
                let reverse = self.graph.connect_detached(into, from);
                self.kind.push(ArcKind::Reverse);
                self.reverse.push(Some(arc));
                self.reverse[arc] = Some(reverse);
                reverse
            }
        };
        match self.graph.mut_data_of_arc(reverse) {
            Some(capacity) => *capacity += delta,
            None => {
                self.graph.reconnect(reverse, delta);
            }
        }
        Some(reverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Network {
        let mut network = Network::new("diamond");
        network.add_vertices(["s", "a", "b", "t"]).unwrap();
        network.add_arc("s", "a", 2.0).unwrap();
        network.add_arc("s", "b", 1.0).unwrap();
        network.add_arc("a", "t", 1.0).unwrap();
        network.add_arc("b", "t", 0.0).unwrap();
        network
    }

    #[test]
    fn mirrors_network_without_reverse_arcs() {
        let residual = ResidualGraph::from_network(&diamond());
        assert_eq!(residual.number_of_nodes(), 4);
        // the zero-capacity arc is materialised but detached
        assert_eq!(residual.arc_bound(), 4);
        assert_eq!(residual.number_of_arcs(), 3);
        assert_eq!(residual.capacity(0), 2.0);
        assert!(!residual.is_open(3));
        assert_eq!(residual.kind(1), Some(ArcKind::Original(1)));
        assert_eq!(residual.reverse_of(0), None);
        assert_eq!(residual.outgoing(0).collect::<Vec<_>>(), vec![(1, 0), (2, 1)]);
        assert_eq!(residual.outgoing(3).count(), 0);
    }

    #[test]
    fn skips_removed_network_arcs() {
        let mut network = diamond();
        network.remove_arc("s->b").unwrap();
        let residual = ResidualGraph::from_network(&network);
        assert_eq!(residual.residual_of(1), None);
        assert_eq!(residual.residual_of(2), Some(1));
        assert_eq!(residual.kind(1), Some(ArcKind::Original(2)));
    }

    #[test]
    fn reverse_arcs_appear_on_demand() {
        let mut residual = ResidualGraph::from_network(&diamond());
        let reverse = residual.augment(0, 0.5).unwrap();
        assert_eq!(reverse, 4);
        assert_eq!(residual.kind(reverse), Some(ArcKind::Reverse));
        assert_eq!(residual.reverse_of(reverse), Some(0));
        assert_eq!(residual.reverse_of(0), Some(reverse));
        assert_eq!(residual.endpoints(reverse), Some((1, 0)));
        assert_eq!(residual.capacity(0), 1.5);
        assert_eq!(residual.capacity(reverse), 0.5);

        // a second push reuses the same reverse arc
        assert_eq!(residual.augment(0, 0.5), Some(reverse));
        assert_eq!(residual.capacity(reverse), 1.0);
        assert_eq!(residual.arc_bound(), 5);
    }

    #[test]
    fn saturated_arcs_detach_and_come_back() {
        let mut residual = ResidualGraph::from_network(&diamond());
        let reverse = residual.augment(2, 1.0).unwrap();
        assert!(!residual.is_open(2));
        assert_eq!(residual.outgoing(1).count(), 0);

        // cancel the flow again
        assert_eq!(residual.augment(reverse, 1.0), Some(2));
        assert!(residual.is_open(2));
        assert!(!residual.is_open(reverse));
        assert_eq!(residual.capacity(2), 1.0);
        assert!(residual.arc_bound() <= 2 * diamond().number_of_arcs());
    }

    #[test]
    fn unknown_arcs_are_left_alone() {
        let mut residual = ResidualGraph::from_network(&diamond());
        assert_eq!(residual.augment(42, 1.0), None);
        assert_eq!(residual.arc_bound(), 4);
        assert_eq!(residual.kind(4), None);
        assert!(residual.incoming(0).all(|(from, _)| from != 0));
    }
}
