use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::error::GraphError;
use crate::graph::{ArcId, GraphNetwork, NodeId};

/// Networks above this size print only their summary.
const DISPLAY_LIMIT: usize = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    name: String,
}

impl Vertex {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    name: String,
    capacity: f64,
}

impl Arc {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}

/// Capacitated directed multigraph with vertices and arcs addressable by name
/// and by id. Parallel arcs are kept apart as long as their names differ.
#[derive(Debug, Clone)]
pub struct Network {
    name: String,
    graph: GraphNetwork<Vertex, Arc>,
    vertex_ids: HashMap<String, NodeId>,
    arc_ids: HashMap<String, ArcId>,
}

impl Network {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Network {
            name: name.into(),
            graph: GraphNetwork::new(),
            vertex_ids: HashMap::new(),
            arc_ids: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &GraphNetwork<Vertex, Arc> {
        &self.graph
    }

    pub fn add_vertex<S: Into<String>>(&mut self, name: S) -> Result<NodeId, GraphError> {
        let name = name.into();
        if self.vertex_ids.contains_key(&name) {
            return Err(GraphError::DuplicateVertex(name));
        }
        let node_id = self.graph.add_node(Vertex { name: name.clone() });
        self.vertex_ids.insert(name, node_id);
        Ok(node_id)
    }

    pub fn add_vertices<I, S>(&mut self, names: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_vertex(name)?;
        }
        Ok(())
    }

    /// Adds an arc named `"{start}->{end}"`.
    pub fn add_arc(&mut self, start: &str, end: &str, capacity: f64) -> Result<ArcId, GraphError> {
        self.add_named_arc(format!("{}->{}", start, end), start, end, capacity)
    }

    pub fn add_named_arc<S: Into<String>>(
        &mut self,
        name: S,
        start: &str,
        end: &str,
        capacity: f64,
    ) -> Result<ArcId, GraphError> {
        let name = name.into();
        let from = self
            .vertex_id(start)
            .ok_or_else(|| GraphError::UnknownEndpoint(start.to_string()))?;
        let into = self
            .vertex_id(end)
            .ok_or_else(|| GraphError::UnknownEndpoint(end.to_string()))?;
        if from == into {
            return Err(GraphError::SelfLoop {
                name,
                vertex: start.to_string(),
            });
        }
        if self.arc_ids.contains_key(&name) {
            return Err(GraphError::DuplicateArc(name));
        }
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(GraphError::InvalidCapacity { name, capacity });
        }
        let arc_id = self.graph.connect(
            from,
            into,
            Arc {
                name: name.clone(),
                capacity,
            },
        );
        self.arc_ids.insert(name, arc_id);
        Ok(arc_id)
    }

    /// Detaches the arc from both endpoints and deletes it. Its id is not reused.
    pub fn remove_arc(&mut self, name: &str) -> Result<Arc, GraphError> {
        let arc_id = self
            .arc_ids
            .remove(name)
            .ok_or_else(|| GraphError::UnknownArc(name.to_string()))?;
        self.graph
            .disconnect(arc_id)
            .ok_or_else(|| GraphError::UnknownArc(name.to_string()))
    }

    pub fn arc_exists(&self, name: &str) -> bool {
        self.arc_ids.contains_key(name)
    }

    pub fn vertex_id(&self, name: &str) -> Option<NodeId> {
        self.vertex_ids.get(name).copied()
    }

    pub fn vertex(&self, name: &str) -> Option<&Vertex> {
        self.vertex_id(name).and_then(|id| self.graph.data_of_node(id))
    }

    pub fn vertex_by_id(&self, id: NodeId) -> Option<&Vertex> {
        self.graph.data_of_node(id)
    }

    pub fn arc_id(&self, name: &str) -> Option<ArcId> {
        self.arc_ids.get(name).copied()
    }

    pub fn arc(&self, name: &str) -> Option<&Arc> {
        self.arc_id(name).and_then(|id| self.graph.data_of_arc(id))
    }

    pub fn arc_by_id(&self, id: ArcId) -> Option<&Arc> {
        self.graph.data_of_arc(id)
    }

    /// (start, end) of a live arc.
    pub fn endpoints(&self, arc: ArcId) -> Option<(NodeId, NodeId)> {
        if !self.graph.is_arc_in(arc) {
            return None;
        }
        self.graph.endpoints(arc)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (NodeId, &Vertex)> + '_ {
        self.graph.nodes()
    }

    pub fn arcs(&self) -> impl Iterator<Item = (ArcId, &Arc)> + '_ {
        self.graph.arcs()
    }

    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = ArcId> + '_ {
        self.graph
            .is_node_in(node)
            .then(|| self.graph.from_node(node))
            .into_iter()
            .flatten()
            .map(|(_, arc)| arc)
    }

    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = ArcId> + '_ {
        self.graph
            .is_node_in(node)
            .then(|| self.graph.into_node(node))
            .into_iter()
            .flatten()
            .map(|(_, arc)| arc)
    }

    pub fn number_of_vertices(&self) -> usize {
        self.graph.number_of_nodes()
    }

    pub fn number_of_arcs(&self) -> usize {
        self.graph.number_of_arcs()
    }

    /// Upper bound (exclusive) of every arc id this network has issued.
    pub fn arc_bound(&self) -> usize {
        self.graph.arc_bound()
    }

    /// Cross-checks the name tables against the arena and logs every mismatch.
    pub fn check_consistency(&self) -> bool {
        let mut consistent = true;
        for (name, id) in &self.vertex_ids {
            match self.graph.data_of_node(*id) {
                Some(vertex) if vertex.name == *name => {}
                _ => {
                    warn!("vertex `{}` is not registered under id {}", name, id);
                    consistent = false;
                }
            }
        }
        for (name, id) in &self.arc_ids {
            match self.graph.data_of_arc(*id) {
                Some(arc) if arc.name == *name => {}
                _ => {
                    warn!("arc `{}` is not registered under id {}", name, id);
                    consistent = false;
                }
            }
        }
        for (node, _) in self.graph.nodes() {
            for arc in self.outgoing(node).chain(self.incoming(node)) {
                if !self.graph.is_arc_in(arc) {
                    warn!("vertex {} references missing arc {}", node, arc);
                    consistent = false;
                }
            }
        }
        if self.vertex_ids.len() != self.number_of_vertices()
            || self.arc_ids.len() != self.number_of_arcs()
        {
            warn!("name tables and arena of network {} differ in size", self.name);
            consistent = false;
        }
        if consistent {
            debug!("network {} is consistent", self.name);
        } else {
            warn!("network {} is inconsistent", self.name);
        }
        consistent
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertices = self.number_of_vertices();
        let arcs = self.number_of_arcs();
        write!(
            f,
            "Network {} ({} {}, {} {})",
            self.name,
            vertices,
            if vertices == 1 { "vertex" } else { "vertices" },
            arcs,
            if arcs == 1 { "arc" } else { "arcs" },
        )?;
        if vertices + arcs > DISPLAY_LIMIT {
            return Ok(());
        }
        for (arc_id, arc) in self.arcs() {
            if let Some((from, into)) = self.endpoints(arc_id) {
                write!(
                    f,
                    "\n  {}: {} -> {} cap {}",
                    arc.name, self.vertex_name(from), self.vertex_name(into), arc.capacity
                )?;
            }
        }
        Ok(())
    }
}

impl Network {
    fn vertex_name(&self, node: NodeId) -> &str {
        self.vertex_by_id(node).map_or("?", Vertex::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Network {
        let mut network = Network::new("triangle");
        network.add_vertices(["a", "b", "c"]).unwrap();
        network.add_arc("a", "b", 3.0).unwrap();
        network.add_arc("b", "c", 2.0).unwrap();
        network.add_named_arc("shortcut", "a", "c", 1.0).unwrap();
        network
    }

    #[test]
    fn ids_follow_insertion_order() {
        let network = triangle();
        assert_eq!(network.vertex_id("a"), Some(0));
        assert_eq!(network.vertex_id("c"), Some(2));
        assert_eq!(network.arc_id("a->b"), Some(0));
        assert_eq!(network.arc_id("shortcut"), Some(2));
        assert_eq!(network.number_of_vertices(), 3);
        assert_eq!(network.number_of_arcs(), 3);
        assert_eq!(network.arc("b->c").map(Arc::capacity), Some(2.0));
        assert!(network.check_consistency());
    }

    #[test]
    fn structural_errors_leave_network_untouched() {
        let mut network = triangle();
        assert_eq!(
            network.add_vertex("a"),
            Err(GraphError::DuplicateVertex("a".to_string()))
        );
        assert_eq!(
            network.add_arc("a", "z", 1.0),
            Err(GraphError::UnknownEndpoint("z".to_string()))
        );
        assert!(matches!(
            network.add_arc("b", "b", 1.0),
            Err(GraphError::SelfLoop { .. })
        ));
        assert_eq!(
            network.add_arc("a", "b", 5.0),
            Err(GraphError::DuplicateArc("a->b".to_string()))
        );
        assert!(matches!(
            network.add_arc("c", "a", -1.0),
            Err(GraphError::InvalidCapacity { .. })
        ));
        assert_eq!(network.number_of_vertices(), 3);
        assert_eq!(network.number_of_arcs(), 3);
        assert_eq!(network.arc("a->b").map(Arc::capacity), Some(3.0));
    }

    #[test]
    fn parallel_arcs_are_independent() {
        let mut network = triangle();
        let second = network.add_named_arc("a->b#2", "a", "b", 4.0).unwrap();
        let a = network.vertex_id("a").unwrap();
        assert_eq!(network.outgoing(a).collect::<Vec<_>>(), vec![0, 2, second]);
        assert_eq!(network.graph().between_nodes(0, 1).count(), 2);
    }

    #[test]
    fn removed_arc_leaves_both_adjacency_lists() {
        let mut network = triangle();
        let removed = network.remove_arc("a->b").unwrap();
        assert_eq!(removed.name(), "a->b");
        assert_eq!(
            network.remove_arc("a->b"),
            Err(GraphError::UnknownArc("a->b".to_string()))
        );
        let a = network.vertex_id("a").unwrap();
        let b = network.vertex_id("b").unwrap();
        assert_eq!(network.outgoing(a).collect::<Vec<_>>(), vec![2]);
        assert_eq!(network.incoming(b).count(), 0);
        assert_eq!(network.endpoints(0), None);
        // ids are never handed out twice
        assert_eq!(network.add_arc("a", "b", 1.0), Ok(3));
        assert!(network.check_consistency());
    }

    #[test]
    fn display_lists_small_networks() {
        let text = triangle().to_string();
        assert!(text.starts_with("Network triangle (3 vertices, 3 arcs)"));
        assert!(text.contains("shortcut: a -> c cap 1"));
    }
}
