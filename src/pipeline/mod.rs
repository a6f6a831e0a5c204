//! # Pipeline
//!
//! Wires the stages together around injected collaborators:
//!
//! ```text
//! SourceQuery → Fetcher → [Translator] → clean → Annotator → sentences
//!   → extract/accumulate → prune → [resolve] → tag source
//!   → (across sources) combine
//! ```
//!
//! Collaborator failures never abort a build: a text that fails to
//! annotate is skipped, a source that fails to fetch or translate
//! contributes an empty graph. Both are logged.

pub mod capabilities;
pub mod text;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::combine::combine;
use crate::config::PipelineConfig;
use crate::extract::{accumulate, DetectedEvents, EventDetector};
use crate::graph::KnowledgeGraph;
use crate::model::{Sentence, SourceTag};
use crate::prune::{PruneReport, Pruner};
use crate::resolve::{EntityResolver, ResolutionReport};
use crate::{Error, Result};

pub use capabilities::{Annotator, Fetcher, SourceQuery, Translator};
pub use text::TextCleaner;

/// A built graph plus what each stage did to it.
#[derive(Debug, Clone, Default)]
pub struct GraphBuild {
    pub graph: KnowledgeGraph,
    pub triples_applied: usize,
    pub prune: PruneReport,
    pub resolution: Option<ResolutionReport>,
}

/// The graph-construction pipeline.
///
/// Cheap to clone: collaborators are shared.
#[derive(Clone)]
pub struct Pipeline {
    annotator: Arc<dyn Annotator>,
    fetcher: Option<Arc<dyn Fetcher>>,
    translator: Option<Arc<dyn Translator>>,
    config: PipelineConfig,
    pruner: Pruner,
    resolver: Option<EntityResolver>,
    events: EventDetector,
    cleaner: TextCleaner,
}

impl Pipeline {
    /// Validate `config` and build a pipeline around `annotator`.
    pub fn new(annotator: Arc<dyn Annotator>, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            annotator,
            fetcher: None,
            translator: None,
            pruner: Pruner::new(&config.prune)?,
            resolver: config.resolve.as_ref().map(EntityResolver::from_config),
            events: EventDetector::new(&config.events)?,
            cleaner: TextCleaner::new()?,
            config,
        })
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // ========================================================================
    // Synchronous core
    // ========================================================================

    /// Extract, accumulate, prune and (if configured) resolve.
    pub fn build(&self, sentences: &[Sentence]) -> GraphBuild {
        let mut graph = KnowledgeGraph::new();
        let triples_applied = accumulate(&mut graph, sentences);
        let prune = self.pruner.prune(&mut graph);
        let resolution = self.resolver.map(|r| r.resolve(&mut graph));
        debug!(
            sentences = sentences.len(),
            triples = triples_applied,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built graph"
        );
        GraphBuild { graph, triples_applied, prune, resolution }
    }

    pub fn build_graph(&self, sentences: &[Sentence]) -> KnowledgeGraph {
        self.build(sentences).graph
    }

    // ========================================================================
    // Text input
    // ========================================================================

    async fn annotate_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<(String, Vec<Sentence>)> {
        let mut out = Vec::new();
        for text in self.cleaner.clean_all(texts) {
            match self.annotator.annotate(&text).await {
                Ok(sentences) => out.push((text, sentences)),
                Err(e) => warn!(error = %e, text = %text, "annotation failed, skipping text"),
            }
        }
        out
    }

    /// Clean and annotate `texts`, then build.
    pub async fn build_from_texts<S: AsRef<str>>(&self, texts: &[S]) -> KnowledgeGraph {
        let sentences: Vec<Sentence> = self
            .annotate_all(texts)
            .await
            .into_iter()
            .flat_map(|(_, sentences)| sentences)
            .collect();
        self.build_graph(&sentences)
    }

    /// Keyword events and entity mentions for each text that annotates.
    pub async fn detect_events<S: AsRef<str>>(&self, texts: &[S]) -> Vec<DetectedEvents> {
        self.annotate_all(texts)
            .await
            .into_iter()
            .map(|(text, sentences)| self.events.detect(&text, &sentences))
            .collect()
    }

    // ========================================================================
    // Sources
    // ========================================================================

    async fn source_texts(&self, query: &SourceQuery) -> Result<Vec<String>> {
        let fetcher = self
            .fetcher
            .as_ref()
            .ok_or_else(|| Error::Config("no fetcher configured".into()))?;

        let texts = match fetcher.fetch(query).await {
            Ok(texts) => texts,
            Err(e) => {
                warn!(source = %query.tag, error = %e, "fetch failed, source contributes nothing");
                return Ok(Vec::new());
            }
        };

        let Some(lang) = query.language.as_deref() else {
            return Ok(texts);
        };
        if lang == self.config.primary_language || texts.is_empty() {
            return Ok(texts);
        }
        let Some(translator) = &self.translator else {
            warn!(source = %query.tag, lang, "no translator configured, skipping source texts");
            return Ok(Vec::new());
        };
        match translator.translate(&texts, lang).await {
            Ok(translated) => Ok(translated),
            Err(e) => {
                warn!(source = %query.tag, lang, error = %e, "translation failed, skipping source texts");
                Ok(Vec::new())
            }
        }
    }

    /// Fetch, translate if needed, build, and tag every node and edge with
    /// the query's source tag. Fails only when no fetcher is configured.
    pub async fn build_source(&self, query: &SourceQuery) -> Result<KnowledgeGraph> {
        let texts = self.source_texts(query).await?;
        let mut graph = self.build_from_texts(texts.as_slice()).await;
        graph.tag_source(&query.tag);
        info!(
            source = %query.tag,
            texts = texts.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built source graph"
        );
        Ok(graph)
    }

    /// Build each source in tag order. A repeated tag is built once.
    pub async fn build_sources(&self, queries: &[SourceQuery]) -> Result<BTreeMap<SourceTag, KnowledgeGraph>> {
        let mut graphs = BTreeMap::new();
        for query in dedupe_by_tag(queries) {
            let graph = self.build_source(query).await?;
            graphs.insert(query.tag.clone(), graph);
        }
        Ok(graphs)
    }

    /// Build all sources concurrently, one task per source.
    #[cfg(feature = "parallel")]
    pub async fn build_sources_parallel(
        &self,
        queries: &[SourceQuery],
    ) -> Result<BTreeMap<SourceTag, KnowledgeGraph>> {
        let handles: Vec<_> = dedupe_by_tag(queries)
            .into_iter()
            .map(|query| {
                let pipeline = self.clone();
                let query = query.clone();
                tokio::spawn(async move {
                    let graph = pipeline.build_source(&query).await;
                    (query.tag, graph)
                })
            })
            .collect();

        let mut graphs = BTreeMap::new();
        for handle in handles {
            let (tag, graph) = handle.await.map_err(|e| Error::Task(e.to_string()))?;
            graphs.insert(tag, graph?);
        }
        Ok(graphs)
    }

    pub fn combine_sources(&self, graphs: &BTreeMap<SourceTag, KnowledgeGraph>) -> KnowledgeGraph {
        combine(graphs)
    }

    /// Build every source and combine them.
    pub async fn run(&self, queries: &[SourceQuery]) -> Result<KnowledgeGraph> {
        let graphs = self.build_sources(queries).await?;
        Ok(self.combine_sources(&graphs))
    }
}

/// Queries sorted by tag, first occurrence of each tag kept.
fn dedupe_by_tag(queries: &[SourceQuery]) -> Vec<&SourceQuery> {
    let mut by_tag: BTreeMap<&SourceTag, &SourceQuery> = BTreeMap::new();
    for q in queries {
        if by_tag.contains_key(&q.tag) {
            warn!(source = %q.tag, "duplicate source tag, ignoring repeat");
            continue;
        }
        by_tag.insert(&q.tag, q);
    }
    by_tag.into_values().collect()
}
