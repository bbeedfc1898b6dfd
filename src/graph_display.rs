//! Render compiled automata as SVG through graphviz.

use graphviz_rust::attributes::{arrowhead, shape, EdgeAttributes, NodeAttributes};
use graphviz_rust::cmd::{Format, Layout};
use graphviz_rust::dot_generator::{edge, graph, id, node, node_id};
use graphviz_rust::dot_structures::{Edge, EdgeTy, Graph, Id, Node, NodeId, Vertex};
use graphviz_rust::exec_dot;
use graphviz_rust::printer::{DotPrinter, PrinterContext};

use crate::dfa::Dfa;
use crate::nfa::{Nfa, State};

pub struct DiGraph(Graph);

impl From<&Nfa> for DiGraph {
    fn from(nfa: &Nfa) -> Self {
        let mut nodes = vec![];
        let mut edges = vec![];

        for id in 0..nfa.state_count() {
            let state = State(id);
            if state == nfa.accept() {
                nodes.push(node!(state; NodeAttributes::shape(shape::doublecircle)));
            } else {
                nodes.push(node!(state));
            }
            if state == nfa.start() {
                nodes.push(node!("start"; NodeAttributes::shape(shape::none)));
                edges.push(edge!(node_id!("start") => node_id!(state);
                                 EdgeAttributes::arrowhead(arrowhead::normal)));
            }

            for t in &nfa[state] {
                edges.push(edge!(node_id!(state) => node_id!(t.end);
                        EdgeAttributes::arrowhead(arrowhead::normal),
                        EdgeAttributes::label(format!("\"{}\"", t.matcher))
                ));
            }
        }

        Self::assemble(nodes, edges)
    }
}

impl From<&Dfa> for DiGraph {
    fn from(dfa: &Dfa) -> Self {
        let mut nodes = vec![];
        let mut edges = vec![];

        for id in 0..dfa.state_count() {
            let state = State(id);
            if dfa.is_accepting(state) {
                nodes.push(node!(state; NodeAttributes::shape(shape::doublecircle)));
            } else {
                nodes.push(node!(state));
            }
            if state == dfa.start() {
                nodes.push(node!("start"; NodeAttributes::shape(shape::none)));
                edges.push(edge!(node_id!("start") => node_id!(state);
                                 EdgeAttributes::arrowhead(arrowhead::normal)));
            }

            for t in &dfa[state] {
                edges.push(edge!(node_id!(state) => node_id!(t.end);
                        EdgeAttributes::arrowhead(arrowhead::normal),
                        EdgeAttributes::label(format!("\"{}\"", t.matcher))
                ));
            }
        }

        Self::assemble(nodes, edges)
    }
}

impl DiGraph {
    fn assemble(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut graph: Graph = graph!(strict di id!("G"));
        for node in nodes {
            graph.add_stmt(node.into());
        }
        for edge in edges {
            graph.add_stmt(edge.into());
        }
        Self(graph)
    }
}

impl std::fmt::Display for DiGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dot = self.0.print(&mut PrinterContext::default());

        match exec_dot(dot, vec![Format::Svg.into(), Layout::Dot.into()]) {
            Ok(svg) => svg.fmt(f),
            Err(e) => {
                eprintln!("{e}");
                Err(std::fmt::Error)
            }
        }
    }
}
