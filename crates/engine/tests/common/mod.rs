#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures")]

use anyhow::Result;
use query_dom::{Document, NodeId};
use query_engine::{EngineConfig, SelectorEngine};

pub fn init_logging() {
    let _init = env_logger::builder().is_test(true).try_init();
}

/// `<div><p class="a">1</p><p class="b">2</p><p class="a">3</p></div>`
pub struct Paragraphs {
    pub doc: Document,
    pub div: NodeId,
    pub paragraphs: [NodeId; 3],
}

pub fn paragraphs() -> Result<Paragraphs> {
    let mut doc = Document::new();
    let div = doc.append_element(doc.root(), "div")?;
    let mut paragraphs = Vec::new();
    for (class, text) in [("a", "1"), ("b", "2"), ("a", "3")] {
        let paragraph = doc.element(div, "p", &[("class", class)])?;
        doc.append_text(paragraph, text)?;
        paragraphs.push(paragraph);
    }
    let paragraphs = <[NodeId; 3]>::try_from(paragraphs)
        .map_err(|_unused| anyhow::anyhow!("expected three paragraphs"))?;
    Ok(Paragraphs {
        doc,
        div,
        paragraphs,
    })
}

/// A small page:
///
/// ```text
/// html > body > div#main.container
///                 ├─ ul.menu > li.item×4 > a[href]
///                 ├─ p.note "hello <b>world</b>"
///                 ├─ div.nested > div.nested > span#deep
///                 ├─ span.loose
///                 └─ input[type=checkbox][checked]
///              section > p "plain" + p.note "second" + p:empty
/// ```
pub struct Page {
    pub doc: Document,
    pub main: NodeId,
    pub menu: NodeId,
    pub items: Vec<NodeId>,
    pub links: Vec<NodeId>,
    pub note: NodeId,
    pub outer: NodeId,
    pub inner: NodeId,
    pub deep: NodeId,
    pub loose: NodeId,
    pub checkbox: NodeId,
    pub section: NodeId,
    pub section_paragraphs: Vec<NodeId>,
}

pub fn page() -> Result<Page> {
    let mut doc = Document::new();
    let html = doc.append_element(doc.root(), "html")?;
    let body = doc.append_element(html, "body")?;
    let main = doc.element(body, "div", &[("id", "main"), ("class", "container")])?;
    let menu = doc.element(main, "ul", &[("class", "menu")])?;
    let mut items = Vec::new();
    let mut links = Vec::new();
    for (index, href) in ["http://a.example", "/local", "https://b.example", "#top"]
        .into_iter()
        .enumerate()
    {
        doc.append_text(menu, "\n  ")?;
        let item = doc.element(
            menu,
            "li",
            &[("class", "item"), ("data-index", index.to_string().as_str())],
        )?;
        let link = doc.element(item, "a", &[("href", href), ("lang", "en-GB")])?;
        doc.append_text(link, &format!("link {index}"))?;
        items.push(item);
        links.push(link);
    }
    let note = doc.element(main, "p", &[("class", "note")])?;
    doc.append_text(note, "hello ")?;
    let bold = doc.append_element(note, "b")?;
    doc.append_text(bold, "world")?;
    let outer = doc.element(main, "div", &[("class", "nested")])?;
    let inner = doc.element(outer, "div", &[("class", "nested")])?;
    let deep = doc.element(inner, "span", &[("id", "deep")])?;
    doc.append_comment(main, "separator")?;
    let loose = doc.element(main, "span", &[("class", "loose")])?;
    let checkbox = doc.element(main, "input", &[("type", "checkbox"), ("checked", "")])?;
    let section = doc.append_element(body, "section")?;
    let mut section_paragraphs = Vec::new();
    for text in ["plain", "second"] {
        let paragraph = doc.append_element(section, "p")?;
        doc.append_text(paragraph, text)?;
        section_paragraphs.push(paragraph);
    }
    if let Some(&second) = section_paragraphs.get(1) {
        doc.set_attr(second, "class", "note")?;
    }
    section_paragraphs.push(doc.append_element(section, "p")?);
    Ok(Page {
        doc,
        main,
        menu,
        items,
        links,
        note,
        outer,
        inner,
        deep,
        loose,
        checkbox,
        section,
        section_paragraphs,
    })
}

/// `<ul>` with `count` `<li>` children separated by text.
pub fn list(count: usize) -> Result<(Document, NodeId, Vec<NodeId>)> {
    let mut doc = Document::new();
    let list = doc.append_element(doc.root(), "ul")?;
    let mut items = Vec::new();
    for index in 0..count {
        doc.append_text(list, " ")?;
        let data_index = index.to_string();
        items.push(doc.element(list, "li", &[("data-index", data_index.as_str())])?);
    }
    Ok((doc, list, items))
}

/// One engine using the document's native matcher and one interpreting
/// everything.
pub fn engines(doc: &Document) -> [SelectorEngine; 2] {
    [
        SelectorEngine::for_host(EngineConfig::default(), doc),
        SelectorEngine::for_host(EngineConfig::new(false, false, false), doc),
    ]
}
