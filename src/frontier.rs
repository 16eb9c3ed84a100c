use std::collections::VecDeque;

use crate::graph::NodeId;
use crate::push_relabel::Strategy;

/// Active vertices waiting for a discharge.
#[derive(Debug, Clone)]
pub enum Frontier {
    Fifo(VecDeque<NodeId>),
    HighestLabel(Buckets),
}

impl Frontier {
    /// `levels` is the number of distinct heights an active vertex can have.
    pub fn new(strategy: Strategy, levels: usize) -> Self {
        match strategy {
            Strategy::Fifo => Frontier::Fifo(VecDeque::new()),
            Strategy::HighestLabel => Frontier::HighestLabel(Buckets::new(levels)),
        }
    }

    pub fn push(&mut self, node: NodeId, height: usize) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(node),
            Frontier::HighestLabel(buckets) => buckets.push(node, height),
        }
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::HighestLabel(buckets) => buckets.pop(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::HighestLabel(buckets) => buckets.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-sorts queued vertices after heights changed in bulk.
    /// Queue order does not depend on heights in FIFO mode.
    pub fn rebuild(&mut self, heights: &[usize]) {
        if let Frontier::HighestLabel(buckets) = self {
            let queued: Vec<NodeId> = buckets.drain().collect();
            for node in queued {
                buckets.push(node, heights[node]);
            }
        }
    }
}

/// Vertices bucketed by height with a pointer to the highest bucket that may be nonempty.
#[derive(Debug, Clone)]
pub struct Buckets {
    buckets: Vec<Vec<NodeId>>,
    top: usize,
    len: usize,
}

impl Buckets {
    pub fn new(levels: usize) -> Self {
        Buckets {
            buckets: vec![Vec::new(); levels.max(1)],
            top: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, node: NodeId, height: usize) {
        if height >= self.buckets.len() {
            self.buckets.resize(height + 1, Vec::new());
        }
        self.buckets[height].push(node);
        self.top = self.top.max(height);
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        while self.len > 0 {
            if let Some(node) = self.buckets[self.top].pop() {
                self.len -= 1;
                return Some(node);
            }
            if self.top == 0 {
                break;
            }
            self.top -= 1;
        }
        None
    }

    fn drain(&mut self) -> impl Iterator<Item = NodeId> + '_ {
        self.top = 0;
        self.len = 0;
        self.buckets.iter_mut().flat_map(|bucket| bucket.drain(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_keeps_insertion_order() {
        let mut frontier = Frontier::new(Strategy::Fifo, 4);
        frontier.push(2, 3);
        frontier.push(0, 1);
        frontier.push(1, 2);
        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.pop(), Some(2));
        assert_eq!(frontier.pop(), Some(0));
        assert_eq!(frontier.pop(), Some(1));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn highest_label_pops_from_the_top() {
        let mut frontier = Frontier::new(Strategy::HighestLabel, 4);
        frontier.push(0, 1);
        frontier.push(1, 3);
        frontier.push(2, 2);
        assert_eq!(frontier.pop(), Some(1));
        frontier.push(3, 1);
        assert_eq!(frontier.pop(), Some(2));
        assert_eq!(frontier.pop(), Some(3));
        assert_eq!(frontier.pop(), Some(0));
        assert!(frontier.is_empty());
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn buckets_grow_past_the_initial_levels() {
        let mut frontier = Frontier::new(Strategy::HighestLabel, 2);
        frontier.push(5, 7);
        frontier.push(4, 0);
        assert_eq!(frontier.pop(), Some(5));
        assert_eq!(frontier.pop(), Some(4));
    }

    #[test]
    fn rebuild_follows_new_heights() {
        let mut frontier = Frontier::new(Strategy::HighestLabel, 6);
        frontier.push(0, 1);
        frontier.push(1, 2);
        let heights = vec![5, 1];
        frontier.rebuild(&heights);
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pop(), Some(0));
        assert_eq!(frontier.pop(), Some(1));
    }
}
