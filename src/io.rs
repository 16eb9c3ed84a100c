//! Comma separated edge lists in and flow tables out.
//!
//! Input lines read `u, v, capacity` or `u, v, capacity, arc_name`. Lines
//! starting with `#` are comments. The first start vertex in the file is taken
//! as the source and the last end vertex as the sink.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::graph::NodeId;
use crate::network::Network;
use crate::result::FlowResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityPolicy {
    /// Zero capacities are loaded; only negative ones are skipped.
    #[default]
    AllowZero,
    /// Zero and negative capacities are skipped.
    RejectZero,
}

#[derive(Debug, Clone)]
pub struct LoadedNetwork {
    pub network: Network,
    pub source: Option<NodeId>,
    pub sink: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct EdgeListReader {
    policy: CapacityPolicy,
}

impl EdgeListReader {
    pub fn new(policy: CapacityPolicy) -> Self {
        EdgeListReader { policy }
    }

    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> io::Result<LoadedNetwork> {
        let path = path.as_ref();
        info!("Read file {}", path.display());
        let file = File::open(path)?;
        self.read(BufReader::new(file), path.display().to_string())
    }

    /// Loads every well-formed line; broken lines are logged and skipped.
    pub fn read<R: BufRead, S: Into<String>>(&self, reader: R, name: S) -> io::Result<LoadedNetwork> {
        let mut network = Network::new(name);
        let mut source = None;
        let mut sink = None;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 3 && fields.len() != 4 {
                warn!(
                    "line {}: expected three or four fields, skipping `{}`",
                    number + 1,
                    line
                );
                continue;
            }
            let capacity = match fields[2].parse::<f64>() {
                Ok(capacity) if capacity.is_finite() => capacity,
                _ => {
                    warn!("line {}: bad capacity `{}`, arc skipped", number + 1, fields[2]);
                    continue;
                }
            };
            if capacity < 0.0 {
                warn!("line {}: negative capacity {}, arc skipped", number + 1, capacity);
                continue;
            }
            if capacity == 0.0 && self.policy == CapacityPolicy::RejectZero {
                warn!("line {}: zero capacity, arc skipped", number + 1);
                continue;
            }

            let (u, v) = (fields[0], fields[1]);
            let from = match network.vertex_id(u) {
                Some(id) => id,
                None => network.add_vertex(u).map_err(invalid_data)?,
            };
            source.get_or_insert(from);
            let into = match network.vertex_id(v) {
                Some(id) => id,
                None => network.add_vertex(v).map_err(invalid_data)?,
            };
            sink = Some(into);

            let added = match fields.get(3) {
                Some(name) => network.add_named_arc(*name, u, v, capacity),
                None => network.add_arc(u, v, capacity),
            };
            if let Err(err) = added {
                warn!("line {}: {}, arc skipped", number + 1, err);
            }
        }

        debug!(
            "loaded {} vertices and {} arcs",
            network.number_of_vertices(),
            network.number_of_arcs()
        );
        Ok(LoadedNetwork {
            network,
            source,
            sink,
        })
    }
}

fn invalid_data<E: std::error::Error + Send + Sync + 'static>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

/// Writes `u, v, flow, capacity` for every arc in id order.
pub fn write_flow<W: Write>(mut out: W, network: &Network, result: &FlowResult) -> io::Result<()> {
    writeln!(out, "# Node u, Node v, Flow on arc uv, Capacity of arc uv")?;
    for (arc_id, arc) in network.arcs() {
        let Some((from, into)) = network.endpoints(arc_id) else {
            continue;
        };
        writeln!(
            out,
            "{}, {}, {:.3}, {:.3}",
            vertex_name(network, from),
            vertex_name(network, into),
            result.flow_of(arc_id),
            arc.capacity()
        )?;
    }
    out.flush()
}

pub fn write_flow_file<P: AsRef<Path>>(
    path: P,
    network: &Network,
    result: &FlowResult,
) -> io::Result<()> {
    let path = path.as_ref();
    write_flow(BufWriter::new(File::create(path)?), network, result)?;
    info!("Flow written to {}", path.display());
    Ok(())
}

/// Writes the network as an edge list the reader loads back with the same
/// source and sink: source arcs first, then inner arcs, then sink arcs.
pub fn write_edge_list<W: Write>(
    mut out: W,
    network: &Network,
    source: NodeId,
    sink: NodeId,
) -> io::Result<()> {
    writeln!(out, "# Node u, Node v, Capacity of uv")?;
    let mut write_arc = |from: NodeId, into: NodeId, capacity: f64| {
        writeln!(
            out,
            "{:>3}, {:>3}, {:7.3}",
            vertex_name(network, from),
            vertex_name(network, into),
            capacity
        )
    };

    let arcs: Vec<(NodeId, NodeId, f64)> = network
        .arcs()
        .filter_map(|(arc_id, arc)| {
            network
                .endpoints(arc_id)
                .map(|(from, into)| (from, into, arc.capacity()))
        })
        .collect();
    for &(from, into, capacity) in &arcs {
        if from == source {
            write_arc(from, into, capacity)?;
        }
    }
    for &(from, into, capacity) in &arcs {
        if from != source && into != sink {
            write_arc(from, into, capacity)?;
        }
    }
    for &(from, into, capacity) in &arcs {
        if into == sink && from != source {
            write_arc(from, into, capacity)?;
        }
    }
    out.flush()
}

fn vertex_name(network: &Network, node: NodeId) -> &str {
    network.vertex_by_id(node).map_or("?", |vertex| vertex.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instances;
    use crate::push_relabel::{solve, SolverConfig};

    const INPUT: &str = "\
# Node u, Node v, Capacity of uv
s, a, 3
s, b, 2.5

a, t, 2, fast
a, b, x
b, b, 1
b, t, -1
b, t, 0
a, t, 1, fast
b, t
";

    #[test]
    fn skips_broken_lines() {
        let loaded = EdgeListReader::default().read(INPUT.as_bytes(), "input").unwrap();
        let network = &loaded.network;
        assert_eq!(network.number_of_vertices(), 4);
        // s->a, s->b, fast, b->t; the self loop and the second `fast` are dropped
        assert_eq!(network.number_of_arcs(), 4);
        assert_eq!(network.arc("fast").unwrap().capacity(), 2.0);
        assert_eq!(network.arc("b->t").unwrap().capacity(), 0.0);
        assert_eq!(loaded.source, network.vertex_id("s"));
        assert_eq!(loaded.sink, network.vertex_id("t"));
    }

    #[test]
    fn reject_zero_policy() {
        let loaded = EdgeListReader::new(CapacityPolicy::RejectZero)
            .read(INPUT.as_bytes(), "input")
            .unwrap();
        assert_eq!(loaded.network.number_of_arcs(), 3);
        assert!(!loaded.network.arc_exists("b->t"));
    }

    #[test]
    fn empty_input_has_no_terminals() {
        let loaded = EdgeListReader::default().read("# nothing\n".as_bytes(), "empty").unwrap();
        assert_eq!(loaded.network.number_of_vertices(), 0);
        assert_eq!(loaded.source, None);
        assert_eq!(loaded.sink, None);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(EdgeListReader::default().read_file("/nonexistent/graph.txt").is_err());
    }

    #[test]
    fn flow_table_format() {
        let network = instances::two_vertex(2.0).unwrap();
        let result = solve(&network, "s", "t", SolverConfig::fifo()).unwrap();
        let mut out = Vec::new();
        write_flow(&mut out, &network, &result).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# Node u, Node v, Flow on arc uv, Capacity of arc uv\ns, t, 2.000, 2.000\n"
        );
    }

    #[test]
    fn edge_list_reloads_with_same_terminals() {
        let network = instances::textbook().unwrap();
        let s = network.vertex_id("s").unwrap();
        let t = network.vertex_id("t").unwrap();
        let mut out = Vec::new();
        write_edge_list(&mut out, &network, s, t).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("  s,   a,  15.000"));

        let loaded = EdgeListReader::default().read(text.as_bytes(), "copy").unwrap();
        let copy = &loaded.network;
        assert_eq!(copy.vertex_by_id(loaded.source.unwrap()).unwrap().name(), "s");
        assert_eq!(copy.vertex_by_id(loaded.sink.unwrap()).unwrap().name(), "t");
        assert_eq!(copy.number_of_arcs(), network.number_of_arcs());
        let result = solve(copy, "s", "t", SolverConfig::fifo()).unwrap();
        assert_eq!(result.max_flow_value(), 14.0);
    }
}
