//! Small networks with known maximum flows.

use crate::error::GraphError;
use crate::network::Network;

/// Vertices `"1"` to `"{length}"` joined by arcs of decreasing capacity
/// `length - 1, ..., 1`. The last arc is the bottleneck, so the value is 1.
pub fn chain(length: usize) -> Result<Network, GraphError> {
    let mut network = Network::new(format!("chain{}", length));
    network.add_vertices((1..=length).map(|i| i.to_string()))?;
    for i in 1..length {
        network.add_arc(&i.to_string(), &(i + 1).to_string(), (length - i) as f64)?;
    }
    Ok(network)
}

/// A path of `2k + 2` vertices whose middle arc has capacity 2, plus `k - 1`
/// unit shortcuts that bypass the middle. Maximum flow is `k + 1`.
///
/// The source has exactly one outgoing arc and the sink exactly one incoming arc.
pub fn complex_network(source: &str, sink: &str, k: usize) -> Result<Network, GraphError> {
    let mut network = Network::new(format!("N2k{}", k));
    let mut names = vec![source.to_string()];
    names.extend((1..=2 * k).map(|i| i.to_string()));
    names.push(sink.to_string());
    network.add_vertices(names.iter().cloned())?;

    for i in 0..=k {
        network.add_arc(&names[i], &names[i + 1], (k + 2 - i) as f64)?;
    }
    for i in k + 1..=2 * k {
        network.add_arc(&names[i], &names[i + 1], (i - k + 2) as f64)?;
    }
    for i in 1..k {
        network.add_arc(&names[i], &names[2 * k + 1 - i], 1.0)?;
    }
    Ok(network)
}

/// The six-vertex network from the CLRS push-relabel chapter, value 14.
pub fn textbook() -> Result<Network, GraphError> {
    let mut network = Network::new("textbook");
    network.add_vertices(["s", "a", "b", "c", "d", "t"])?;
    for (start, end, capacity) in [
        ("s", "a", 15.0),
        ("s", "c", 4.0),
        ("a", "b", 12.0),
        ("b", "c", 3.0),
        ("c", "d", 10.0),
        ("d", "a", 5.0),
        ("b", "t", 7.0),
        ("d", "t", 10.0),
    ] {
        network.add_arc(start, end, capacity)?;
    }
    Ok(network)
}

/// `s -> t` and nothing else.
pub fn two_vertex(capacity: f64) -> Result<Network, GraphError> {
    let mut network = Network::new("pair");
    network.add_vertices(["s", "t"])?;
    network.add_arc("s", "t", capacity)?;
    Ok(network)
}

/// `layers` fully connected layers of `width` vertices between `s` and `t`,
/// with integer capacities in `1..=20` drawn from a linear congruential
/// sequence started at `seed`. Same arguments, same network.
pub fn layered(layers: usize, width: usize, seed: u64) -> Result<Network, GraphError> {
    let mut state = seed;
    let mut next_capacity = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % 20 + 1) as f64
    };

    let mut network = Network::new(format!("layered{}x{}", layers, width));
    let layer = |l: usize| (0..width).map(move |j| format!("L{}_{}", l, j));
    network.add_vertex("s")?;
    for l in 0..layers {
        network.add_vertices(layer(l))?;
    }
    network.add_vertex("t")?;

    if layers == 0 {
        return Ok(network);
    }
    for name in layer(0) {
        network.add_arc("s", &name, next_capacity())?;
    }
    for l in 1..layers {
        for from in layer(l - 1) {
            for into in layer(l) {
                network.add_arc(&from, &into, next_capacity())?;
            }
        }
    }
    for name in layer(layers - 1) {
        network.add_arc(&name, "t", next_capacity())?;
    }
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_shape() {
        let network = chain(10).unwrap();
        assert_eq!(network.number_of_vertices(), 10);
        assert_eq!(network.number_of_arcs(), 9);
        assert_eq!(network.arc("1->2").unwrap().capacity(), 9.0);
        assert_eq!(network.arc("9->10").unwrap().capacity(), 1.0);
    }

    #[test]
    fn complex_network_shape() {
        let network = complex_network("s", "t", 3).unwrap();
        assert_eq!(network.number_of_vertices(), 8);
        // 2k + 1 path arcs and k - 1 shortcuts
        assert_eq!(network.number_of_arcs(), 7 + 2);
        assert_eq!(network.arc("3->4").unwrap().capacity(), 2.0);
        assert!(network.arc_exists("1->6"));
        assert!(network.arc_exists("2->5"));
        assert!(complex_network("x", "x", 2).is_err());
    }

    #[test]
    fn layered_is_reproducible() {
        let first = layered(3, 4, 9).unwrap();
        let second = layered(3, 4, 9).unwrap();
        assert_eq!(first.number_of_arcs(), 4 + 2 * 16 + 4);
        let capacities = |network: &Network| {
            network.arcs().map(|(_, arc)| arc.capacity()).collect::<Vec<_>>()
        };
        assert_eq!(capacities(&first), capacities(&second));
        assert!(capacities(&first).iter().all(|&c| (1.0..=20.0).contains(&c)));
    }
}
