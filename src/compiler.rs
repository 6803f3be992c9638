//! Graph → natural-language instruction.
//!
//! Each node becomes `"<title>: <description>"`, suffixed with
//! `" (using data from: <sources>)"` when other nodes feed it. Fragments are
//! joined with `" → "` and wrapped as `"Create a workflow that: …"`. An
//! empty graph compiles to an empty string.

use crate::config::CompileOrder;
use crate::constants::{FRAGMENT_SEPARATOR, INSTRUCTION_PREFIX, SOURCES_PREFIX};
use crate::error::{CompileError, ExecuteError};
use crate::graph::WorkflowGraph;
use crate::models::Node;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstructionCompiler {
    order: CompileOrder,
}

impl InstructionCompiler {
    pub fn new(order: CompileOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> CompileOrder {
        self.order
    }

    pub fn compile(&self, graph: &WorkflowGraph) -> Result<String, CompileError> {
        if graph.is_empty() {
            return Ok(String::new());
        }
        let nodes = match self.order {
            CompileOrder::Insertion => graph.nodes().iter().collect(),
            CompileOrder::Topological => topological_order(graph)?,
        };
        let fragments: Vec<String> = nodes.into_iter().map(|n| fragment(graph, n)).collect();
        Ok(format!(
            "{INSTRUCTION_PREFIX}{}",
            fragments.join(FRAGMENT_SEPARATOR)
        ))
    }

    /// Compile for the execution API, refusing anything that would send an
    /// empty instruction.
    pub fn prepare_instruction(&self, graph: &WorkflowGraph) -> Result<String, ExecuteError> {
        if graph.is_empty() {
            return Err(ExecuteError::EmptyWorkflow);
        }
        let instruction = self.compile(graph)?;
        if instruction.trim().is_empty() {
            return Err(ExecuteError::EmptyWorkflow);
        }
        Ok(instruction)
    }
}

/// Insertion-order compile; never fails.
pub fn compile(graph: &WorkflowGraph) -> String {
    InstructionCompiler::new(CompileOrder::Insertion)
        .compile(graph)
        .unwrap_or_default()
}

fn fragment(graph: &WorkflowGraph, node: &Node) -> String {
    let sources: Vec<&str> = graph
        .incoming_sources(&node.id)
        .into_iter()
        .map(|n| n.title.as_str())
        .collect();
    let mut out = format!("{}: {}", node.title, node.description);
    if !sources.is_empty() {
        out.push_str(SOURCES_PREFIX);
        out.push_str(&sources.join(", "));
        out.push(')');
    }
    out
}

/// Kahn's algorithm over a petgraph view of the workflow. Among nodes that
/// are ready at the same time the earliest inserted goes first, so a graph
/// whose insertion order already respects its edges compiles unchanged.
fn topological_order(graph: &WorkflowGraph) -> Result<Vec<&Node>, CompileError> {
    let mut dag: DiGraph<&Node, ()> = DiGraph::with_capacity(graph.len(), graph.connections().len());
    let index: HashMap<&str, NodeIndex> = graph
        .nodes()
        .iter()
        .map(|n| (n.id.as_str(), dag.add_node(n)))
        .collect();
    for c in graph.connections() {
        if let (Some(&s), Some(&t)) = (
            index.get(c.source_node_id.as_str()),
            index.get(c.target_node_id.as_str()),
        ) {
            dag.add_edge(s, t, ());
        }
    }

    let mut in_degree: Vec<usize> = dag
        .node_indices()
        .map(|i| dag.neighbors_directed(i, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(dag.node_count());
    while let Some(Reverse(i)) = ready.pop() {
        let idx = NodeIndex::new(i);
        order.push(dag[idx]);
        for next in dag.neighbors_directed(idx, Direction::Outgoing) {
            let d = &mut in_degree[next.index()];
            *d -= 1;
            if *d == 0 {
                ready.push(Reverse(next.index()));
            }
        }
    }

    if order.len() < dag.node_count() {
        return Err(CompileError::Cycle(cycle_members(&dag)));
    }
    Ok(order)
}

fn cycle_members(dag: &DiGraph<&Node, ()>) -> Vec<String> {
    let mut members: Vec<NodeIndex> = petgraph::algo::tarjan_scc(dag)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .flatten()
        .collect();
    members.sort();
    members.into_iter().map(|i| dag[i].id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConnectionType, Point, TaskTemplate};
    use proptest::prelude::*;
    use serde_json::json;

    fn template(title: &str, description: &str) -> TaskTemplate {
        serde_json::from_value(json!({
            "templateType": title.to_lowercase(),
            "title": title,
            "description": description,
        }))
        .unwrap()
    }

    fn add(g: &mut WorkflowGraph, title: &str, desc: &str) -> String {
        g.add_node(&template(title, desc), Point::ORIGIN)
    }

    #[test]
    fn empty_graph_compiles_to_empty_string() {
        let g = WorkflowGraph::new();
        assert_eq!(compile(&g), "");
        assert_eq!(
            InstructionCompiler::new(CompileOrder::Topological).compile(&g),
            Ok(String::new())
        );
    }

    #[test]
    fn search_then_analyze() {
        let mut g = WorkflowGraph::new();
        let n1 = add(&mut g, "Search", "desc1");
        let n2 = add(&mut g, "Analyze", "desc2");
        g.add_connection(&n1, &n2, ConnectionType::Data);
        assert_eq!(
            compile(&g),
            "Create a workflow that: Search: desc1 → Analyze: desc2 (using data from: Search)"
        );
    }

    #[test]
    fn single_node_has_no_sources_suffix() {
        let mut g = WorkflowGraph::new();
        add(&mut g, "Notify", "send it");
        assert_eq!(compile(&g), "Create a workflow that: Notify: send it");
    }

    #[test]
    fn multiple_sources_are_comma_joined() {
        let mut g = WorkflowGraph::new();
        let a = add(&mut g, "Search", "s");
        let b = add(&mut g, "Extract", "e");
        let c = add(&mut g, "Summarize", "m");
        g.add_connection(&a, &c, ConnectionType::Data);
        g.add_connection(&b, &c, ConnectionType::Control);
        assert!(compile(&g).ends_with("Summarize: m (using data from: Search, Extract)"));
    }

    #[test]
    fn insertion_order_is_kept_even_when_it_contradicts_edges() {
        let mut g = WorkflowGraph::new();
        let analyze = add(&mut g, "Analyze", "a");
        let search = add(&mut g, "Search", "s");
        g.add_connection(&search, &analyze, ConnectionType::Data);
        assert_eq!(
            compile(&g),
            "Create a workflow that: Analyze: a (using data from: Search) → Search: s"
        );
    }

    #[test]
    fn topological_order_puts_sources_first() {
        let mut g = WorkflowGraph::new();
        let analyze = add(&mut g, "Analyze", "a");
        let search = add(&mut g, "Search", "s");
        add(&mut g, "Notify", "n");
        g.add_connection(&search, &analyze, ConnectionType::Data);
        let out = InstructionCompiler::new(CompileOrder::Topological)
            .compile(&g)
            .unwrap();
        assert_eq!(
            out,
            "Create a workflow that: Search: s → Analyze: a (using data from: Search) → Notify: n"
        );
    }

    #[test]
    fn topological_order_reports_cycles() {
        let mut g = WorkflowGraph::new();
        let a = add(&mut g, "A", "");
        let b = add(&mut g, "B", "");
        let c = add(&mut g, "C", "");
        let d = add(&mut g, "D", "");
        g.add_connection(&a, &b, ConnectionType::Data);
        g.add_connection(&b, &c, ConnectionType::Data);
        g.add_connection(&c, &a, ConnectionType::Data);
        g.add_connection(&c, &d, ConnectionType::Data);
        let err = InstructionCompiler::new(CompileOrder::Topological)
            .compile(&g)
            .unwrap_err();
        assert_eq!(err, CompileError::Cycle(vec![a.clone(), b, c]));
        assert!(err.to_string().contains(&a));

        // Insertion order does not care about cycles.
        assert!(!compile(&g).is_empty());
    }

    #[test]
    fn prepare_refuses_empty_graph() {
        let compiler = InstructionCompiler::default();
        assert_eq!(
            compiler.prepare_instruction(&WorkflowGraph::new()),
            Err(ExecuteError::EmptyWorkflow)
        );
        let mut g = WorkflowGraph::new();
        add(&mut g, "Search", "s");
        assert_eq!(
            compiler.prepare_instruction(&g).unwrap(),
            "Create a workflow that: Search: s"
        );
    }

    proptest! {
        #[test]
        fn compile_is_deterministic(
            titles in proptest::collection::vec("[A-Za-z]{1,8}", 1..6),
            edges in proptest::collection::vec((0usize..6, 0usize..6), 0..10),
        ) {
            let mut g = WorkflowGraph::new();
            let ids: Vec<String> = titles.iter().map(|t| add(&mut g, t, "d")).collect();
            for (s, t) in edges {
                g.add_connection(&ids[s % ids.len()], &ids[t % ids.len()], ConnectionType::Data);
            }
            let first = compile(&g);
            prop_assert_eq!(&first, &compile(&g));
            prop_assert_eq!(first.matches(FRAGMENT_SEPARATOR).count(), ids.len() - 1);

            let topo = InstructionCompiler::new(CompileOrder::Topological);
            prop_assert_eq!(topo.compile(&g), topo.compile(&g));
        }
    }
}
