//! Graph export: a plain-text summary and a serializable view for renderers.
//!
//! ```text
//! KnowledgeGraph → write_summary() → "Built KG with N nodes and M edges." + listing
//! KnowledgeGraph → GraphView::from() → to_json() → renderer
//! ```

use std::io::Write;

use serde::Serialize;

use crate::graph::KnowledgeGraph;
use crate::model::*;
use crate::Result;

/// Write the text summary: a header line, one line per node
/// (`<key>, {attrs}`), then one line per edge (`<from> -[<relations>]-> <to>`).
pub fn write_summary(graph: &KnowledgeGraph, writer: &mut dyn Write) -> Result<()> {
    writeln!(
        writer,
        "Built KG with {} nodes and {} edges.",
        graph.node_count(),
        graph.edge_count()
    )?;

    for node in graph.nodes() {
        writeln!(writer, "{}, {}", node.key, format_node_attrs(&node.attrs))?;
    }

    for e in graph.edges() {
        writeln!(writer, "{} -[{}]-> {}", e.from, e.attrs().relation_label(), e.to)?;
    }

    Ok(())
}

/// Summary as a `String`.
pub fn summary(graph: &KnowledgeGraph) -> Result<String> {
    let mut buf = Vec::new();
    write_summary(graph, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Format node attributes as `{lemma: 'x', pos: 'NOUN', ...}`, skipping empty fields.
fn format_node_attrs(attrs: &NodeAttrs) -> String {
    let mut parts = Vec::new();
    if let Some(lemma) = &attrs.lemma {
        parts.push(format!("lemma: {}", quote(lemma)));
    }
    if let Some(pos) = attrs.pos {
        parts.push(format!("pos: {}", quote(pos.as_str())));
    }
    if let Some(types) = attrs.entity_type_label() {
        parts.push(format!("type: {}", quote(&types)));
    }
    if !attrs.aliases.is_empty() {
        parts.push(format!("aliases: {}", format_list(attrs.aliases.iter())));
    }
    if !attrs.sources.is_empty() {
        parts.push(format!("sources: {}", format_list(attrs.sources.iter())));
    }
    format!("{{{}}}", parts.join(", "))
}

fn format_list<T: ToString>(items: impl Iterator<Item = T>) -> String {
    let inner: Vec<String> = items.map(|i| quote(&i.to_string())).collect();
    format!("[{}]", inner.join(", "))
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "\\'"))
}

// ============================================================================
// Renderer view
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<PartOfSpeech>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    pub aliases: Vec<String>,
    pub sources: Vec<SourceTag>,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub from: String,
    pub to: String,
    pub relations: Vec<String>,
    /// Relations joined for use as an edge label.
    pub label: String,
    pub sources: Vec<SourceTag>,
    pub provenance: Provenance,
}

/// Node and edge lists with provenance, in graph iteration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl GraphView {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Nodes contributed by two or more sources.
    pub fn multi_source_nodes(&self) -> impl Iterator<Item = &NodeView> + '_ {
        self.nodes.iter().filter(|n| n.provenance.is_multi_source())
    }
}

impl From<&KnowledgeGraph> for GraphView {
    fn from(graph: &KnowledgeGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|n| NodeView {
                key: n.key.clone(),
                lemma: n.attrs.lemma.clone(),
                pos: n.attrs.pos,
                entity_type: n.attrs.entity_type_label(),
                aliases: n.attrs.aliases.iter().cloned().collect(),
                sources: n.attrs.sources.iter().cloned().collect(),
                provenance: Provenance::of(&n.attrs.sources),
            })
            .collect();
        let edges = graph
            .edges()
            .map(|e| EdgeView {
                from: e.from.to_string(),
                to: e.to.to_string(),
                relations: e.attrs().relations.iter().cloned().collect(),
                label: e.attrs().relation_label(),
                sources: e.attrs().sources.iter().cloned().collect(),
                provenance: Provenance::of(&e.attrs().sources),
            })
            .collect();
        Self { nodes, edges }
    }
}
