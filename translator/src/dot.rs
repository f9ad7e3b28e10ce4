//! Graphviz rendering of source formulas.

use std::{collections::HashMap, fmt::Write};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    ops::{ArithOp, OpKind, Unsupported},
    source::SourceExpr,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphStyle {
    pub font: String,
    pub node_color: String,
    pub leaf_color: String,
    pub node_shape: String,
    pub leaf_shape: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            font: "Helvetica,Arial,sans-serif".to_owned(),
            node_color: "lightsteelblue3".to_owned(),
            leaf_color: "steelblue1".to_owned(),
            node_shape: "ellipse".to_owned(),
            leaf_shape: "circle".to_owned(),
        }
    }
}

/// Hands out node ids for one rendering.
#[derive(Debug, Default)]
struct IdAllocator {
    next: usize,
}

impl IdAllocator {
    fn next(&mut self) -> usize {
        self.next += 1;
        self.next
    }
}

struct Renderer<'a, S: SourceExpr> {
    style: &'a GraphStyle,
    ids: IdAllocator,
    drawn: HashMap<S::Id, usize>,
    nodes: String,
    edges: String,
}

/// Renders `root` as a DOT digraph.
/// A node shared by several parents is drawn once, with one edge per use.
pub fn render_dot<S: SourceExpr>(root: &S, style: &GraphStyle) -> Result<String> {
    let mut renderer = Renderer::<S> {
        style,
        ids: IdAllocator::default(),
        drawn: HashMap::new(),
        nodes: String::new(),
        edges: String::new(),
    };
    renderer.visit(root)?;

    let mut out = String::new();
    out.push_str("digraph G {\n");
    let _ = writeln!(
        out,
        "  graph [fontname=\"{}\" bgcolor=transparent];",
        escape_dot(&style.font)
    );
    let _ = writeln!(
        out,
        "  node [fontname=\"{}\" fontsize=12 margin=0.01 shape={} style=filled color=black \
         fillcolor=\"{}\"];",
        escape_dot(&style.font),
        style.node_shape,
        escape_dot(&style.node_color),
    );
    let _ = writeln!(
        out,
        "  edge [fontname=\"{}\" color=black];",
        escape_dot(&style.font)
    );
    out.push('\n');
    out.push_str(&renderer.nodes);
    out.push('\n');
    out.push_str(&renderer.edges);
    out.push_str("}\n");
    Ok(out)
}

impl<S: SourceExpr> Renderer<'_, S> {
    fn visit(&mut self, node: &S) -> Result<usize> {
        if let Some(id) = self.drawn.get(&node.id()) {
            return Ok(*id);
        }

        let kind = node.kind()?;
        let id = self.ids.next();
        self.drawn.insert(node.id(), id);

        let children = node.children();
        if children.is_empty() {
            let _ = writeln!(
                self.nodes,
                "  n{id} [label=\"{}\" shape={} fillcolor=\"{}\"];",
                escape_dot(&label(node, kind)),
                self.style.leaf_shape,
                escape_dot(&self.style.leaf_color),
            );
        } else {
            let _ = writeln!(
                self.nodes,
                "  n{id} [label=\"{}\"];",
                escape_dot(&label(node, kind))
            );
        }

        for (index, child) in children.iter().enumerate() {
            let child_id = self.visit(child)?;
            let edge_label = match (kind, index) {
                (OpKind::Ite, 0) => Some("cond"),
                (OpKind::Ite, 1) => Some("then"),
                (OpKind::Ite, 2) => Some("else"),
                _ => None,
            };
            let _ = match edge_label {
                Some(edge_label) => writeln!(
                    self.edges,
                    "  n{id} -> n{child_id} [label=\"{edge_label}\"];"
                ),
                None => writeln!(self.edges, "  n{id} -> n{child_id};"),
            };
        }

        Ok(id)
    }
}

fn label<S: SourceExpr>(node: &S, kind: OpKind) -> String {
    match kind {
        OpKind::Uninterpreted => node
            .variable()
            .map(|(name, _)| name)
            .unwrap_or_else(|| node.to_string()),
        OpKind::Numeral | OpKind::Unsupported(Unsupported::Arith(ArithOp::Numeral)) => {
            node.literal().unwrap_or_else(|| node.to_string())
        }
        OpKind::Extract | OpKind::Extend(_) | OpKind::RotateBy(_) => {
            let params = node.params();
            if params.is_empty() {
                kind.to_string()
            } else {
                let params = params
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(":");
                format!("{kind}[{params}]")
            }
        }
        _ => kind.to_string(),
    }
}

/// Escape a string for Graphviz DOT labels.
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
