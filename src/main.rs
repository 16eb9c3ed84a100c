use std::error::Error;
use std::path::Path;

use log::{error, info, warn};
use rustop::opts;
use serde::Serialize;

use pushflow::instances;
use pushflow::io::{write_flow_file, EdgeListReader};
use pushflow::push_relabel::{solve, SolveStats, SolverConfig, Strategy};
use pushflow::utils::{init_logger, set_logging, Timers};
use pushflow::{FlowResult, Network};

#[derive(Debug, Serialize)]
struct Summary<'a> {
    network: &'a str,
    strategy: Strategy,
    value: f64,
    millis: u128,
    stats: &'a SolveStats,
}

struct Runner {
    fifo: SolverConfig,
    json: bool,
    timers: Timers,
}

impl Runner {
    fn solve(
        &mut self,
        network: &Network,
        source: &str,
        sink: &str,
        config: SolverConfig,
    ) -> Result<FlowResult, Box<dyn Error>> {
        let strategy = config.strategy;
        let timer = self.timers.start();
        let result = solve(network, source, sink, config)?;
        let elapsed = self
            .timers
            .stop_and_log(&timer, &format!("{:?} on {}", strategy, network.name()))
            .unwrap_or_default();
        info!(
            "max flow of {} with {:?}: {}",
            network.name(),
            strategy,
            result.max_flow_value()
        );
        if self.json {
            let summary = Summary {
                network: network.name(),
                strategy,
                value: result.max_flow_value(),
                millis: elapsed.as_millis(),
                stats: result.stats(),
            };
            println!("{}", serde_json::to_string(&summary)?);
        }
        Ok(result)
    }

    fn solve_file(&mut self, file: &str, output: &str) -> Result<(), Box<dyn Error>> {
        let loaded = EdgeListReader::default().read_file(file)?;
        let network = &loaded.network;
        let (Some(source), Some(sink)) = (loaded.source, loaded.sink) else {
            return Err(format!("{} holds no arcs", file).into());
        };
        let name = |node| network.vertex_by_id(node).map_or("", |v| v.name());
        let (source, sink) = (name(source), name(sink));
        info!("{}, source {}, sink {}", network, source, sink);
        if !network.check_consistency() {
            warn!("solving an inconsistent network");
        }

        let result = self.solve(network, source, sink, SolverConfig::highest_label())?;
        write_flow_file(Path::new(output).with_extension("hl.txt"), network, &result)?;

        let result = self.solve(network, source, sink, self.fifo.clone())?;
        write_flow_file(output, network, &result)?;
        println!("{}", result.max_flow_value());
        Ok(())
    }

    fn solve_instances(&mut self) -> Result<(), Box<dyn Error>> {
        let networks = [
            (instances::chain(10)?, "1", "10"),
            (instances::complex_network("s", "t", 5)?, "s", "t"),
            (instances::textbook()?, "s", "t"),
            (instances::two_vertex(1.0)?, "s", "t"),
        ];
        for (network, source, sink) in &networks {
            let highest = self.solve(network, source, sink, SolverConfig::highest_label())?;
            let fifo = self.solve(network, source, sink, self.fifo.clone())?;
            println!(
                "{}: {} (highest label), {} (fifo)",
                network.name(),
                highest.max_flow_value(),
                fifo.max_flow_value()
            );
        }
        Ok(())
    }
}

fn main() {
    let (args, _) = opts! {
        synopsis "Compute a maximum flow and a minimum cut with push-relabel.";
        opt quiet:bool, desc:"Disable logging.";
        opt interval:Option<usize>, desc:"Relabels between two global relabels (default: number of vertices).";
        opt gapless:bool, desc:"Disable the gap heuristic.";
        opt json:bool, desc:"Print a JSON summary of every solve.";
        param file:Option<String>, desc:"Edge list with lines `u, v, capacity[, name]`.";
        param output:Option<String>, desc:"Flow output file (default maxflow.txt).";
    }
    .parse_or_exit();

    init_logger();
    set_logging(!args.quiet);

    let mut fifo = SolverConfig::fifo().with_gap_heuristic(!args.gapless);
    if let Some(interval) = args.interval {
        fifo = fifo.with_global_relabel_interval(interval);
    }
    let mut runner = Runner {
        fifo,
        json: args.json,
        timers: Timers::new(),
    };

    let outcome = match args.file {
        Some(file) => {
            let output = args.output.unwrap_or_else(|| "maxflow.txt".to_string());
            runner.solve_file(&file, &output)
        }
        None => runner.solve_instances(),
    };
    if let Err(err) = outcome {
        error!("{}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
