//! Query execution.

use crate::adapter::{Capabilities, NodeAdapter};
use crate::cache::{CacheStats, QueryCache};
use crate::config::EngineConfig;
use crate::error::{SelectError, UnsupportedSelector};
use crate::matcher::MatcherCompiler;
use crate::merge::merge_unique;
use crate::native::{NativePlan, is_native_compatible};
use crate::pseudo::PseudoRegistry;
use crate::strategy::CompiledPart;
use crate::traverse;
use query_selectors::{Combinator, QueryPart, parse, parse_strict, split_groups};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// One comma-free group: parts in source order.
#[derive(Debug)]
pub struct CompiledQuery {
    source: String,
    parts: Vec<Arc<CompiledPart>>,
}

impl CompiledQuery {
    /// A lone descendant part can be tested against a node directly.
    fn simple_part(&self) -> Option<&CompiledPart> {
        match self.parts.as_slice() {
            [part] if part.operator == Combinator::Descendant => Some(part),
            _ => None,
        }
    }
}

/// Every group of a selector string.
#[derive(Debug)]
pub struct CompiledSelector {
    groups: Vec<CompiledQuery>,
    native_compatible: bool,
}

/// Compiles and runs selector queries.
///
/// An engine is independent of any particular document: handles come from
/// the host passed to each call. Compiled selectors are cached for the
/// lifetime of the engine.
#[derive(Debug)]
pub struct SelectorEngine {
    config: EngineConfig,
    capabilities: Capabilities,
    registry: PseudoRegistry,
    cache: QueryCache,
}

impl SelectorEngine {
    pub fn new(config: EngineConfig, capabilities: Capabilities) -> Self {
        Self::with_registry(config, capabilities, PseudoRegistry::builtin())
    }

    pub fn with_registry(
        config: EngineConfig,
        capabilities: Capabilities,
        registry: PseudoRegistry,
    ) -> Self {
        Self {
            config,
            capabilities,
            registry,
            cache: QueryCache::default(),
        }
    }

    /// Build an engine using the capabilities `host` reports.
    pub fn for_host<A: NodeAdapter + ?Sized>(config: EngineConfig, host: &A) -> Self {
        let capabilities = host
            .native()
            .map_or_else(Capabilities::default, |native| native.capabilities());
        log::debug!(target: "query_engine", "engine for host with {capabilities:?}");
        Self::new(config, capabilities)
    }

    #[inline]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[inline]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// All nodes under `root` matching any group of `selector`, groups in
    /// order, each node once.
    ///
    /// Malformed selectors never fail; whatever parsed is used.
    pub fn query<A: NodeAdapter + ?Sized>(
        &self,
        host: &A,
        selector: &str,
        root: A::Handle,
    ) -> Vec<A::Handle> {
        let compiled = self.compiled(selector);
        if compiled.native_compatible {
            match self.native_select(host, selector, &compiled, root) {
                Ok(found) => {
                    log::trace!(target: "query_engine", "`{selector}` answered natively");
                    return found;
                }
                Err(err) => {
                    log::debug!(
                        target: "query_engine",
                        "`{selector}` falls back to the interpreter: {err}"
                    );
                }
            }
        }
        self.execute(host, &compiled, root)
    }

    /// First node [`Self::query`] would return.
    #[inline]
    pub fn query_first<A: NodeAdapter + ?Sized>(
        &self,
        host: &A,
        selector: &str,
        root: A::Handle,
    ) -> Option<A::Handle> {
        self.query(host, selector, root).into_iter().next()
    }

    /// [`Self::query`] for selectors that parse without recovery.
    ///
    /// # Errors
    /// [`SelectError::Parse`] for the first malformed group; offsets are
    /// relative to that group.
    pub fn try_query<A: NodeAdapter + ?Sized>(
        &self,
        host: &A,
        selector: &str,
        root: A::Handle,
    ) -> Result<Vec<A::Handle>, SelectError> {
        for group in split_groups(selector) {
            parse_strict(group)?;
        }
        Ok(self.query(host, selector, root))
    }

    /// Whether `node` matches any group of `selector`.
    pub fn matches<A: NodeAdapter + ?Sized>(
        &self,
        host: &A,
        node: A::Handle,
        selector: &str,
    ) -> bool {
        !self.filter(host, &[node], selector).is_empty()
    }

    /// Keep the nodes that match any group of `selector`, in input order.
    ///
    /// Single-part groups test each node directly; groups with combinators
    /// are evaluated once per tree from its root.
    pub fn filter<A: NodeAdapter + ?Sized>(
        &self,
        host: &A,
        nodes: &[A::Handle],
        selector: &str,
    ) -> Vec<A::Handle> {
        let compiled = self.compiled(selector);
        let mut evaluated: FxHashMap<(usize, A::Handle), FxHashSet<A::Handle>> =
            FxHashMap::default();
        nodes
            .iter()
            .copied()
            .filter(|&node| {
                compiled.groups.iter().enumerate().any(|(index, group)| {
                    if let Some(part) = group.simple_part() {
                        return part.filter.matches(host, node);
                    }
                    let top = traverse::tree_root(host, node);
                    evaluated
                        .entry((index, top))
                        .or_insert_with(|| self.run_group(host, group, top).into_iter().collect())
                        .contains(&node)
                })
            })
            .collect()
    }

    /// Host matchers compare tags ignoring case, so exact-tag documents
    /// always interpret.
    fn native_enabled(&self) -> bool {
        self.config.native_fast_path
            && self.capabilities.selector_matching
            && !self.config.case_sensitive
    }

    fn compiled(&self, selector: &str) -> Arc<CompiledSelector> {
        self.cache
            .interpreted_or_insert_with(selector, || self.compile(selector))
    }

    fn compile(&self, selector: &str) -> CompiledSelector {
        let compiler = MatcherCompiler::new(&self.registry, self.config.case_sensitive);
        let class_bulk = self.config.class_index
            && self.capabilities.class_index
            && !self.capabilities.class_index_case_bug;
        let sources = split_groups(selector);
        let parsed: Vec<Vec<QueryPart>> = sources.iter().copied().map(parse).collect();
        let native_compatible = self.native_enabled()
            && is_native_compatible(selector, &parsed, &self.capabilities.native_pseudos);
        let groups: Vec<CompiledQuery> = sources
            .iter()
            .zip(&parsed)
            .map(|(source, parts)| CompiledQuery {
                source: (*source).to_owned(),
                parts: parts
                    .iter()
                    .map(|part| {
                        self.cache.part_or_insert_with(part.raw(), || {
                            CompiledPart::compile(part, &compiler, class_bulk)
                        })
                    })
                    .collect(),
            })
            .collect();
        log::debug!(
            target: "query_engine",
            "compiled `{selector}` into {} group(s), native: {native_compatible}",
            groups.len()
        );
        CompiledSelector {
            groups,
            native_compatible,
        }
    }

    fn native_select<A: NodeAdapter + ?Sized>(
        &self,
        host: &A,
        selector: &str,
        compiled: &CompiledSelector,
        root: A::Handle,
    ) -> Result<Vec<A::Handle>, UnsupportedSelector> {
        let plan = self.cache.native_or_insert_with(selector, || {
            NativePlan::new(
                compiled.groups.iter().map(|group| group.source.as_str()),
                compiled.groups.iter().all(|group| group.parts.len() == 1),
            )
        });
        if !plan.single_part() && !host.is_document(root) {
            return Err(UnsupportedSelector::ScopedContext);
        }
        let native = host.native().ok_or(UnsupportedSelector::Unavailable)?;
        if let [group] = plan.groups() {
            return native.select_all(root, group);
        }
        // Group by group, so the result keeps group order like the interpreter.
        let mut found = Vec::new();
        for group in plan.groups() {
            found.extend(native.select_all(root, group)?);
        }
        Ok(merge_unique(found))
    }

    fn execute<A: NodeAdapter + ?Sized>(
        &self,
        host: &A,
        compiled: &CompiledSelector,
        root: A::Handle,
    ) -> Vec<A::Handle> {
        // A single group is already ordered and unique.
        if let [group] = compiled.groups.as_slice() {
            return self.run_group(host, group, root);
        }
        merge_unique(
            compiled
                .groups
                .iter()
                .flat_map(|group| self.run_group(host, group, root)),
        )
    }

    /// Thread the candidate set through every part of one group.
    fn run_group<A: NodeAdapter + ?Sized>(
        &self,
        host: &A,
        group: &CompiledQuery,
        root: A::Handle,
    ) -> Vec<A::Handle> {
        if group.parts.is_empty() {
            return Vec::new();
        }
        let case_sensitive = self.config.case_sensitive;
        let mut candidates = vec![root];
        for part in &group.parts {
            candidates = match candidates.as_slice() {
                [] => return Vec::new(),
                [single] => part.select(host, *single, case_sensitive),
                many => {
                    let mut seen = FxHashSet::default();
                    let mut step: Vec<A::Handle> = many
                        .iter()
                        .flat_map(|&context| part.select(host, context, case_sensitive))
                        .filter(|&node| seen.insert(node))
                        .collect();
                    traverse::sort_document_order(host, &mut step);
                    step
                }
            };
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_tree::{TestTree, three_paragraphs};

    fn engine() -> SelectorEngine {
        SelectorEngine::new(EngineConfig::default(), Capabilities::default())
    }

    #[test]
    fn scenarios_on_three_paragraphs() {
        let (tree, [div, first, second, third]) = three_paragraphs();
        let engine = engine();
        assert_eq!(engine.query(&tree, "p.a", 0), vec![first, third]);
        assert_eq!(engine.query(&tree, "div > p:first-child", 0), vec![first]);
        assert_eq!(engine.query(&tree, "p, .b", 0), vec![first, second, third]);
        assert_eq!(engine.query(&tree, ".b, p", 0), vec![second, first, third]);
        assert_eq!(engine.query_first(&tree, "#box", 0), Some(div));
    }

    #[test]
    fn nested_contexts_do_not_duplicate() {
        let mut tree = TestTree::new();
        let outer = tree.element(0, "div", &[]);
        let inner = tree.element(outer, "div", &[]);
        let deep = tree.element(inner, "span", &[]);
        let shallow = tree.element(outer, "span", &[]);
        let engine = engine();
        assert_eq!(engine.query(&tree, "div span", 0), vec![deep, shallow]);
        assert_eq!(engine.query(&tree, "div div span", 0), vec![deep]);
    }

    #[test]
    fn empty_steps_short_circuit() {
        let (tree, _) = three_paragraphs();
        let engine = engine();
        assert!(engine.query(&tree, "ul li", 0).is_empty());
        assert!(engine.query(&tree, "", 0).is_empty());
        assert!(engine.query(&tree, " , ", 0).is_empty());
    }

    #[test]
    fn second_query_hits_the_cache() {
        let (tree, _) = three_paragraphs();
        let engine = engine();
        let once = engine.query(&tree, "div p", 0);
        let twice = engine.query(&tree, "div p", 0);
        assert_eq!(once, twice);
        let stats = engine.cache_stats();
        assert_eq!(stats.interpreted_hits, 1);
        assert_eq!(stats.interpreted_misses, 1);
        assert_eq!(stats.part_entries, 2);
        assert_eq!(stats.native_entries, 0);
    }

    #[test]
    fn filter_handles_simple_and_complex_groups() {
        let (tree, [div, first, second, third]) = three_paragraphs();
        let engine = engine();
        let nodes = [div, first, second, third];
        assert_eq!(engine.filter(&tree, &nodes, ".a"), vec![first, third]);
        assert_eq!(
            engine.filter(&tree, &nodes, "#box > p + p, div"),
            vec![div, second, third]
        );
        assert!(engine.matches(&tree, second, "p:nth-child(2)"));
        assert!(!engine.matches(&tree, second, ":not(p)"));
    }
}
