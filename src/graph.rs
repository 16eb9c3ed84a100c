use genawaiter::sync::*;

pub type NodeId = usize;
pub type ArcId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArcConnection {
    from: NodeId,
    into: NodeId,
}

/// Arena digraph. Ids are handed out in insertion order and never reused,
/// a disconnected arc keeps its slot (and its endpoints) so it can be reattached.
#[derive(Debug, Clone)]
pub struct GraphNetwork<N, A> {
    node_data: Vec<N>,
    arcs_into: Vec<Vec<ArcId>>, // The length of this vector is the number of nodes
    arcs_from: Vec<Vec<ArcId>>, // The length of this vector is the number of nodes
    arc_data: Vec<Option<A>>,   // None while the arc is detached
    arc_connections: Vec<ArcConnection>, // The length of this vector is the number of issued arc ids
    live_arcs: usize,
}

impl<N, A> Default for GraphNetwork<N, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g, N, A> GraphNetwork<N, A> {
    pub fn new() -> Self {
        GraphNetwork {
            node_data: Vec::new(),
            arcs_into: Vec::new(),
            arcs_from: Vec::new(),
            arc_data: Vec::new(),
            arc_connections: Vec::new(),
            live_arcs: 0,
        }
    }

    pub fn number_of_nodes(&self) -> usize {
        self.node_data.len()
    }

    /// Number of attached arcs.
    pub fn number_of_arcs(&self) -> usize {
        self.live_arcs
    }

    /// Upper bound (exclusive) of every arc id issued so far.
    pub fn arc_bound(&self) -> usize {
        self.arc_data.len()
    }

    pub fn is_node_in(&self, node: NodeId) -> bool {
        self.node_data.len() > node
    }

    pub fn is_arc_in(&self, arc: ArcId) -> bool {
        self.arc_data.len() > arc && self.arc_data[arc].is_some()
    }

    pub fn is_connected(&self, from: NodeId, into: NodeId) -> bool {
        // if the nodes do not exist, then the arc does not exist
        if !self.is_node_in(from) || !self.is_node_in(into) {
            return false;
        }
        self.arcs_from[from]
            .iter()
            .any(|arc| self.arc_connections[*arc].into == into)
    }

    /// (from, into) of an issued arc, attached or not.
    pub fn endpoints(&self, arc: ArcId) -> Option<(NodeId, NodeId)> {
        self.arc_connections
            .get(arc)
            .map(|connection| (connection.from, connection.into))
    }

    pub fn data_of_node(&self, node: NodeId) -> Option<&N> {
        self.node_data.get(node)
    }

    pub fn data_of_arc(&self, arc: ArcId) -> Option<&A> {
        self.arc_data.get(arc).and_then(|data| data.as_ref())
    }

    pub fn mut_data_of_arc(&mut self, arc: ArcId) -> Option<&mut A> {
        self.arc_data.get_mut(arc).and_then(|data| data.as_mut())
    }

    pub fn nodes(&'g self) -> impl Iterator<Item = (NodeId, &'g N)> + 'g {
        self.node_data.iter().enumerate()
    }

    /// Attached arcs in id order.
    pub fn arcs(&'g self) -> impl Iterator<Item = (ArcId, &'g A)> + 'g {
        self.arc_data
            .iter()
            .enumerate()
            .filter_map(|(arc_id, data)| data.as_ref().map(|data| (arc_id, data)))
    }

    pub fn between_nodes(&'g self, from: NodeId, into: NodeId) -> impl Iterator<Item = ArcId> + 'g {
        Gen::new(|co| async move {
            if !self.is_node_in(from) || !self.is_node_in(into) {
                panic!("Node does not exist");
            }
            for arc_id in &self.arcs_from[from] {
                if self.arc_connections[*arc_id].into == into {
                    co.yield_(*arc_id).await;
                }
            }
        })
        .into_iter()
    }

    pub fn from_node(&'g self, from: NodeId) -> impl Iterator<Item = (NodeId, ArcId)> + 'g {
        Gen::new(|co| async move {
            if !self.is_node_in(from) {
                panic!("Node does not exist");
            }
            for arc_id in &self.arcs_from[from] {
                co.yield_((self.arc_connections[*arc_id].into, *arc_id))
                    .await;
            }
        })
        .into_iter()
    }

    pub fn into_node(&'g self, into: NodeId) -> impl Iterator<Item = (NodeId, ArcId)> + 'g {
        Gen::new(|co| async move {
            if !self.is_node_in(into) {
                panic!("Node does not exist");
            }
            for arc_id in &self.arcs_into[into] {
                co.yield_((self.arc_connections[*arc_id].from, *arc_id))
                    .await;
            }
        })
        .into_iter()
    }

    pub fn add_node(&mut self, data: N) -> NodeId {
        let node_id = self.node_data.len();
        self.node_data.push(data);
        self.arcs_into.push(Vec::new());
        self.arcs_from.push(Vec::new());
        return node_id;
    }

    pub fn add_nodes<I: Iterator<Item = N>>(&mut self, data: I) {
        for node in data {
            self.add_node(node);
        }
    }

    pub fn connect(&mut self, from: NodeId, into: NodeId, value: A) -> ArcId {
        if !self.is_node_in(from) || !self.is_node_in(into) {
            panic!("Node does not exist");
        }
        let arc_id = self.arc_data.len();
        self.arc_data.push(Some(value));
        self.arc_connections.push(ArcConnection { from, into });
        self.arcs_from[from].push(arc_id);
        self.arcs_into[into].push(arc_id);
        self.live_arcs += 1;
        return arc_id;
    }

    /// Issues an arc id whose slot starts detached.
    pub fn connect_detached(&mut self, from: NodeId, into: NodeId) -> ArcId {
        if !self.is_node_in(from) || !self.is_node_in(into) {
            panic!("Node does not exist");
        }
        let arc_id = self.arc_data.len();
        self.arc_data.push(None);
        self.arc_connections.push(ArcConnection { from, into });
        return arc_id;
    }

    pub fn bulk_connect<I: Iterator<Item = (NodeId, NodeId, A)>>(&mut self, arcs: I) {
        for (from, into, value) in arcs {
            self.connect(from, into, value);
        }
    }

    /// Detaches the arc from both endpoints and hands back its data.
    /// The id stays reserved.
    pub fn disconnect(&mut self, arc: ArcId) -> Option<A> {
        let data = self.arc_data.get_mut(arc)?.take()?;
        let ArcConnection { from, into } = self.arc_connections[arc];
        self.arcs_from[from].retain(|arc_id| *arc_id != arc);
        self.arcs_into[into].retain(|arc_id| *arc_id != arc);
        self.live_arcs -= 1;
        Some(data)
    }

    /// Attaches a detached arc again under its old id.
    /// Returns false if the id was never issued or the arc is already attached.
    pub fn reconnect(&mut self, arc: ArcId, value: A) -> bool {
        match self.arc_data.get(arc) {
            Some(None) => {}
            _ => return false,
        }
        let ArcConnection { from, into } = self.arc_connections[arc];
        self.arc_data[arc] = Some(value);
        self.arcs_from[from].push(arc);
        self.arcs_into[into].push(arc);
        self.live_arcs += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_network() -> GraphNetwork<usize, i32> {
        let mut network = GraphNetwork::<usize, i32>::new();
        network.add_nodes(vec![0, 1, 2, 3, 4, 5].into_iter());
        network.bulk_connect(
            vec![
                (0, 1, 2), //0
                (0, 2, 3), //1
                (1, 3, 2), //2
                (1, 4, 0), //3
                (2, 3, 4), //4
                (2, 4, 2), //5
                (3, 5, 3), //6
                (4, 5, 2), //7
            ]
            .into_iter(),
        );
        network
    }

    #[test]
    fn test_network() {
        let mut network = make_network();
        assert_eq!(network.disconnect(3), Some(0));
        assert_eq!(network.number_of_arcs(), 7);
        assert_eq!(network.arc_bound(), 8);
        assert_eq!(network.from_node(3).collect::<Vec<_>>(), vec![(5, 6)]);
        assert_eq!(
            network.into_node(3).collect::<Vec<_>>(),
            vec![(1, 2), (2, 4)]
        );
        assert_eq!(network.is_connected(1, 4), false);
        assert_eq!(network.is_connected(1, 3), true);
        assert_eq!(network.is_node_in(5), true);
        assert_eq!(network.is_node_in(6), false);
        assert_eq!(network.between_nodes(0, 1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(network.data_of_node(0), Some(&0));
        assert_eq!(network.data_of_arc(3), None);
        assert_eq!(network.endpoints(3), Some((1, 4)));
    }

    #[test]
    fn reconnect_reuses_the_detached_slot() {
        let mut network = make_network();
        network.disconnect(0);
        assert!(network.from_node(0).all(|(_, arc)| arc != 0));
        assert!(network.reconnect(0, 7));
        assert!(!network.reconnect(0, 8));
        assert!(!network.reconnect(42, 8));
        assert_eq!(network.data_of_arc(0), Some(&7));
        assert_eq!(network.from_node(0).collect::<Vec<_>>(), vec![(2, 1), (1, 0)]);
        assert_eq!(network.number_of_arcs(), 8);
    }

    #[test]
    fn detached_slots_stay_out_of_adjacency() {
        let mut network = make_network();
        let arc = network.connect_detached(5, 0);
        assert_eq!(arc, 8);
        assert!(!network.is_arc_in(arc));
        assert_eq!(network.from_node(5).count(), 0);
        assert_eq!(network.arcs().count(), 8);
        assert!(network.reconnect(arc, 1));
        assert_eq!(network.from_node(5).collect::<Vec<_>>(), vec![(0, 8)]);
    }
}
