//! Height bookkeeping and the two relabeling heuristics.
//!
//! Heights below `n = |V|` estimate the residual distance to the sink. A height
//! of `n` or more means the vertex can no longer reach the sink; such vertices
//! may still hold excess that travels back to the source, so active heights
//! stay below `2n`.

use std::collections::VecDeque;

use log::trace;

use crate::graph::NodeId;
use crate::residual::ResidualGraph;

const UNREACHED: usize = usize::MAX;

#[derive(Debug, Clone)]
pub struct Labels {
    height: Vec<usize>,
    count: Vec<usize>, // vertices per height level
    n: usize,
}

impl Labels {
    /// Every vertex at height 1, the sink at 0 and the source at `n`.
    pub fn uniform(n: usize, source: NodeId, sink: NodeId) -> Self {
        let mut height = vec![1; n];
        height[sink] = 0;
        height[source] = n;
        Self::from_heights(height)
    }

    /// Exact residual distances to the sink. Vertices that cannot reach it,
    /// and the source, start at `n`.
    pub fn exact(residual: &ResidualGraph, source: NodeId, sink: NodeId) -> Self {
        let n = residual.number_of_nodes();
        let mut distance = vec![UNREACHED; n];
        distance[sink] = 0;
        reverse_bfs(residual, sink, &mut distance, |node| node != source);
        distance[source] = n;
        let height = distance
            .into_iter()
            .map(|d| if d == UNREACHED { n } else { d })
            .collect();
        Self::from_heights(height)
    }

    fn from_heights(height: Vec<usize>) -> Self {
        let n = height.len();
        let mut labels = Labels {
            height,
            count: vec![0; 2 * n + 1],
            n,
        };
        labels.recount();
        labels
    }

    fn recount(&mut self) {
        self.count.iter_mut().for_each(|count| *count = 0);
        for &height in &self.height {
            if height >= self.count.len() {
                self.count.resize(height + 1, 0);
            }
            self.count[height] += 1;
        }
    }

    /// The height from which a vertex counts as cut off from the sink.
    pub fn cut_off(&self) -> usize {
        self.n
    }

    pub fn get(&self, node: NodeId) -> usize {
        self.height[node]
    }

    pub fn heights(&self) -> &[usize] {
        &self.height
    }

    pub fn set(&mut self, node: NodeId, height: usize) {
        let old = self.height[node];
        self.count[old] -= 1;
        if height >= self.count.len() {
            self.count.resize(height + 1, 0);
        }
        self.count[height] += 1;
        self.height[node] = height;
    }

    pub fn vertices_at(&self, level: usize) -> usize {
        self.count.get(level).copied().unwrap_or(0)
    }

    /// Recomputes every height from the residual graph.
    ///
    /// Vertices that reach the sink get their exact distance to it. The others
    /// get `n` plus their distance to the source, and vertices reaching neither
    /// are parked at `2n - 1`. The source stays at `n`, the sink at 0.
    ///
    /// On a valid labeling no height goes down: a residual path bounds a
    /// valid height by the distance along it, and every arc into a parked
    /// vertex starts at `2n` or below.
    pub fn global_relabel(&mut self, residual: &ResidualGraph, source: NodeId, sink: NodeId) {
        let n = self.n;
        let mut distance = vec![UNREACHED; n];
        distance[sink] = 0;
        reverse_bfs(residual, sink, &mut distance, |node| node != source);
        distance[source] = n;
        reverse_bfs(residual, source, &mut distance, |_| true);

        for (node, height) in self.height.iter_mut().enumerate() {
            *height = match distance[node] {
                UNREACHED => (*height).max(2 * n - 1),
                exact => exact,
            };
        }
        self.recount();
        trace!("global relabel: {:?}", self.height);
    }

    /// Promotes every vertex strictly between an emptied `level` and `n` to `n`.
    /// Nothing happens unless `level` lies below `n` and holds no vertex.
    pub fn gap_relabel(&mut self, level: usize) -> Vec<NodeId> {
        let n = self.n;
        if level == 0 || level >= n || self.vertices_at(level) > 0 {
            return Vec::new();
        }
        let promoted: Vec<NodeId> = (0..n)
            .filter(|&node| self.height[node] > level && self.height[node] < n)
            .collect();
        for &node in &promoted {
            self.set(node, n);
        }
        if !promoted.is_empty() {
            trace!("gap at level {}: promoted {:?}", level, promoted);
        }
        promoted
    }
}

/// Breadth-first search against arc direction. Newly reached vertices get
/// their parent's distance plus one; `enter` filters which vertices may be reached.
fn reverse_bfs<F: Fn(NodeId) -> bool>(
    residual: &ResidualGraph,
    root: NodeId,
    distance: &mut [usize],
    enter: F,
) {
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        let next = distance[node] + 1;
        for (parent, _) in residual.incoming(node) {
            if distance[parent] == UNREACHED && enter(parent) {
                distance[parent] = next;
                queue.push_back(parent);
            }
        }
    }
}

/// Vertices that can still reach the sink in the residual graph.
pub fn reaches_sink(residual: &ResidualGraph, sink: NodeId) -> Vec<bool> {
    let mut distance = vec![UNREACHED; residual.number_of_nodes()];
    distance[sink] = 0;
    reverse_bfs(residual, sink, &mut distance, |_| true);
    distance.into_iter().map(|d| d != UNREACHED).collect()
}
