#![cfg(test)]
#![allow(
    clippy::missing_panics_doc,
    reason = "Assertions in tests are expected"
)]

mod common;

use anyhow::Result;
use common::{engines, init_logging, list, page, paragraphs};
use core::iter;
use query_dom::{Document, NodeId};
use query_engine::{NodeAdapter, SelectorEngine, merge_unique, traverse};

const SIMPLE_SELECTORS: [&str; 15] = [
    "p",
    ".note",
    "li.item",
    "[href]",
    "a[href^=http]",
    "a[href$=example]",
    "#deep",
    "span",
    "*",
    "li:nth-child(odd)",
    "p:empty",
    ":checked",
    "div.nested",
    "[lang|=en]",
    "a:contains(link 2)",
];

fn positions(order: &[NodeId], nodes: &[NodeId]) -> Vec<Option<usize>> {
    nodes
        .iter()
        .map(|node| order.iter().position(|candidate| candidate == node))
        .collect()
}

fn all_elements(engine: &SelectorEngine, doc: &Document) -> Vec<NodeId> {
    engine.query(doc, "*", doc.root())
}

#[test]
fn paragraph_scenarios() -> Result<()> {
    init_logging();
    let fixture = paragraphs()?;
    let doc = &fixture.doc;
    let [first, second, third] = fixture.paragraphs;
    for engine in engines(doc) {
        assert_eq!(engine.query(doc, "p.a", doc.root()), vec![first, third]);
        assert_eq!(
            engine.query(doc, "div > p:first-child", doc.root()),
            vec![first]
        );
        assert_eq!(
            engine.query(doc, "p, .b", doc.root()),
            vec![first, second, third]
        );
        assert_eq!(
            engine.query_first(doc, "div", doc.root()),
            Some(fixture.div)
        );
    }
    Ok(())
}

#[test]
fn simple_selectors_filter_the_universal_result() -> Result<()> {
    init_logging();
    let fixture = page()?;
    let doc = &fixture.doc;
    for engine in engines(doc) {
        let everything = all_elements(&engine, doc);
        for selector in SIMPLE_SELECTORS {
            let expected: Vec<NodeId> = everything
                .iter()
                .copied()
                .filter(|&node| engine.matches(doc, node, selector))
                .collect();
            assert_eq!(
                engine.query(doc, selector, doc.root()),
                expected,
                "{selector}"
            );
        }
    }
    Ok(())
}

#[test]
fn repeated_queries_are_identical_and_cached() -> Result<()> {
    init_logging();
    let fixture = page()?;
    let doc = &fixture.doc;
    for engine in engines(doc) {
        for selector in ["div span", "ul > li a", ".note, p", "#main li:nth-child(2n)"] {
            let before = engine.cache_stats();
            let first = engine.query(doc, selector, doc.root());
            let second = engine.query(doc, selector, doc.root());
            assert_eq!(first, second, "{selector}");
            let after = engine.cache_stats();
            assert_eq!(after.interpreted_misses, before.interpreted_misses + 1);
            assert_eq!(after.interpreted_hits, before.interpreted_hits + 1);
        }
    }
    Ok(())
}

#[test]
fn single_group_results_are_in_document_order() -> Result<()> {
    init_logging();
    let fixture = page()?;
    let doc = &fixture.doc;
    for engine in engines(doc) {
        let everything = all_elements(&engine, doc);
        for selector in [
            "div span",
            "div div span",
            "body *",
            "li a",
            "ul ~ *",
            "li + li",
            "section p",
            "div > *",
        ] {
            let found = engine.query(doc, selector, doc.root());
            assert!(!found.is_empty(), "{selector}");
            let order = positions(&everything, &found);
            assert!(order.iter().all(Option::is_some), "{selector}");
            assert!(
                order.windows(2).all(|pair| pair.first() < pair.get(1)),
                "{selector}"
            );
        }
    }
    Ok(())
}

#[test]
fn overlapping_contexts_yield_each_node_once() -> Result<()> {
    init_logging();
    let fixture = page()?;
    let doc = &fixture.doc;
    for engine in engines(doc) {
        assert_eq!(
            engine.query(doc, "div span", doc.root()),
            vec![fixture.deep, fixture.loose]
        );
        assert_eq!(
            engine.query(doc, "div div span", doc.root()),
            vec![fixture.deep]
        );
        assert_eq!(
            engine.query(doc, "div .nested", doc.root()),
            vec![fixture.outer, fixture.inner]
        );
    }
    Ok(())
}

#[test]
fn groups_concatenate_then_merge() -> Result<()> {
    init_logging();
    let fixture = page()?;
    let doc = &fixture.doc;
    for engine in engines(doc) {
        for (left, right) in [
            ("li.item", ".note"),
            ("span", "div.nested span"),
            ("section > p", "p"),
            ("#deep", "span"),
        ] {
            let combined = engine.query(doc, &format!("{left}, {right}"), doc.root());
            let separate = merge_unique(
                engine
                    .query(doc, left, doc.root())
                    .into_iter()
                    .chain(engine.query(doc, right, doc.root())),
            );
            assert_eq!(combined, separate, "{left}, {right}");
        }
    }
    Ok(())
}

#[test]
fn combinator_results_satisfy_their_relation() -> Result<()> {
    init_logging();
    let fixture = page()?;
    let doc = &fixture.doc;
    for engine in engines(doc) {
        let children = engine.query(doc, "div > span", doc.root());
        assert_eq!(children, vec![fixture.deep, fixture.loose]);
        for node in children {
            assert!(doc
                .parent(node)
                .is_some_and(|parent| engine.matches(doc, parent, "div")));
        }

        let adjacent = engine.query(doc, "li + li", doc.root());
        assert_eq!(
            adjacent.as_slice(),
            fixture.items.get(1..).unwrap_or_default()
        );
        for node in adjacent {
            assert!(traverse::previous_element_sibling(doc, node)
                .is_some_and(|sibling| engine.matches(doc, sibling, "li")));
        }

        let following = engine.query(doc, "ul ~ span", doc.root());
        assert_eq!(following, vec![fixture.loose]);
        for node in following {
            let mut earlier = iter::successors(
                traverse::previous_element_sibling(doc, node),
                |&sibling| traverse::previous_element_sibling(doc, sibling),
            );
            assert!(earlier.any(|sibling| engine.matches(doc, sibling, "ul")));
        }

        for node in engine.query(doc, "div a", doc.root()) {
            let mut ancestors =
                iter::successors(doc.parent(node), |&parent| doc.parent(parent));
            assert!(
                ancestors.any(|ancestor| engine.matches(doc, ancestor, "div"))
            );
        }
    }
    Ok(())
}

#[test]
fn nth_child_counts_element_siblings() -> Result<()> {
    init_logging();
    let (doc, _, items) = list(6)?;
    let pick = |indices: &[usize]| -> Vec<NodeId> {
        indices
            .iter()
            .filter_map(|&index| items.get(index).copied())
            .collect()
    };
    for engine in engines(&doc) {
        let run = |selector: &str| engine.query(&doc, selector, doc.root());
        assert_eq!(run("li:nth-child(odd)"), pick(&[0, 2, 4]));
        assert_eq!(run("li:nth-child(2n+1)"), pick(&[0, 2, 4]));
        assert_eq!(run("li:nth-child(even)"), pick(&[1, 3, 5]));
        assert_eq!(run("li:nth-child(-n+2)"), pick(&[0, 1]));
        assert_eq!(run("li:nth-child(3)"), pick(&[2]));
        assert_eq!(run("li:nth-child( 3n )"), pick(&[2, 5]));
        assert!(run("li:nth-child(bogus)").is_empty());
        assert_eq!(run("li:first-child"), pick(&[0]));
        assert_eq!(run("li:last-child"), pick(&[5]));
    }
    Ok(())
}

#[test]
fn negation_is_the_complement() -> Result<()> {
    init_logging();
    let fixture = page()?;
    let doc = &fixture.doc;
    for engine in engines(doc) {
        let everything = all_elements(&engine, doc);
        for class in [".note", ".item", ".nested", ".missing"] {
            let positive = engine.query(doc, class, doc.root());
            let negative = engine.query(doc, &format!(":not({class})"), doc.root());
            assert!(
                negative.iter().all(|node| !positive.contains(node)),
                "{class}"
            );
            assert_eq!(positive.len() + negative.len(), everything.len(), "{class}");
        }
    }
    Ok(())
}

#[test]
fn contexts_scope_every_part() -> Result<()> {
    init_logging();
    let fixture = page()?;
    let doc = &fixture.doc;
    for engine in engines(doc) {
        assert_eq!(
            engine.query(doc, "div span", fixture.outer),
            vec![fixture.deep]
        );
        assert!(engine.query(doc, "div span", fixture.inner).is_empty());
        assert_eq!(engine.query(doc, "span", fixture.inner), vec![fixture.deep]);
        assert_eq!(engine.query(doc, "> li", fixture.menu), fixture.items);
        assert_eq!(engine.query(doc, "+ p", fixture.menu), vec![fixture.note]);
        assert_eq!(
            engine.query(doc, "~ span, ~ input", fixture.menu),
            vec![fixture.loose, fixture.checkbox]
        );
        assert_eq!(engine.query(doc, "ul >", doc.root()), fixture.items);
        assert!(engine.query(doc, "ul section p", doc.root()).is_empty());
        assert!(engine.query(doc, "p", fixture.deep).is_empty());
    }
    Ok(())
}

#[test]
fn supplementary_pseudo_classes() -> Result<()> {
    init_logging();
    let fixture = page()?;
    let doc = &fixture.doc;
    for engine in engines(doc) {
        assert_eq!(
            engine.query(doc, ":checked", doc.root()),
            vec![fixture.checkbox]
        );
        assert_eq!(
            engine.query(doc, "p:contains('world')", doc.root()),
            vec![fixture.note]
        );
        assert_eq!(
            engine.query(doc, "section p:empty", doc.root()),
            fixture.section_paragraphs.get(2..).unwrap_or_default()
        );
        assert_eq!(
            engine.query(doc, "li:only-child", doc.root()),
            Vec::<NodeId>::new()
        );
        assert_eq!(engine.query(doc, "span:hover", doc.root()).len(), 2);
        assert_eq!(
            engine.query(doc, "a[href*=example]", doc.root()),
            vec![
                fixture.links.first().copied(),
                fixture.links.get(2).copied()
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
        );
    }
    Ok(())
}
