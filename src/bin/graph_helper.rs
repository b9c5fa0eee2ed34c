#![allow(clippy::expect_used)]

use arachnet::graph::{load_graph, NodeType};
use std::path::Path;

fn main() {
    let path = std::env::args().nth(1).expect("graph path");
    match load_graph(Path::new(&path)) {
        Ok(graph) => {
            println!("nodes: {}", graph.nodes.len());
            println!("edges: {}", graph.edges.len());
            for node_type in NodeType::ALL {
                let count = graph.nodes_of(node_type).count();
                if count > 0 {
                    println!("{node_type}: {count}");
                }
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
