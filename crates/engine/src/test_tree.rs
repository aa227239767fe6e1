//! Minimal vector-backed host for unit tests.

use crate::adapter::NodeAdapter;

#[derive(Default)]
struct TestNode {
    parent: Option<usize>,
    children: Vec<usize>,
    tag: Option<String>,
    attrs: Vec<(String, String)>,
    text: Option<String>,
}

/// Node `0` is the document.
pub struct TestTree {
    nodes: Vec<TestNode>,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![TestNode::default()],
        }
    }

    fn push(&mut self, parent: usize, node: TestNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(TestNode {
            parent: Some(parent),
            ..node
        });
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(index);
        }
        index
    }

    pub fn element(&mut self, parent: usize, tag: &str, attrs: &[(&str, &str)]) -> usize {
        self.push(
            parent,
            TestNode {
                tag: Some(tag.to_owned()),
                attrs: attrs
                    .iter()
                    .map(|&(name, value)| (name.to_owned(), value.to_owned()))
                    .collect(),
                ..TestNode::default()
            },
        )
    }

    pub fn append_text(&mut self, parent: usize, text: &str) -> usize {
        self.push(
            parent,
            TestNode {
                text: Some(text.to_owned()),
                ..TestNode::default()
            },
        )
    }

    fn sibling(&self, node: usize, forward: bool) -> Option<usize> {
        let parent = self.nodes.get(node)?.parent?;
        let siblings = &self.nodes.get(parent)?.children;
        let position = siblings.iter().position(|&child| child == node)?;
        if forward {
            siblings.get(position.checked_add(1)?).copied()
        } else {
            siblings.get(position.checked_sub(1)?).copied()
        }
    }

    fn serialize(&self, node: usize, out: &mut String) {
        let Some(entry) = self.nodes.get(node) else {
            return;
        };
        if let Some(text) = &entry.text {
            out.push_str(text);
            return;
        }
        if let Some(tag) = &entry.tag {
            out.push('<');
            out.push_str(tag);
            out.push('>');
        }
        for &child in &entry.children {
            self.serialize(child, out);
        }
        if let Some(tag) = &entry.tag {
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

impl NodeAdapter for TestTree {
    type Handle = usize;

    fn is_element(&self, node: usize) -> bool {
        self.nodes.get(node).is_some_and(|entry| entry.tag.is_some())
    }

    fn is_document(&self, node: usize) -> bool {
        node == 0
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.nodes.get(node)?.parent
    }

    fn first_child(&self, node: usize) -> Option<usize> {
        self.nodes.get(node)?.children.first().copied()
    }

    fn next_sibling(&self, node: usize) -> Option<usize> {
        self.sibling(node, true)
    }

    fn previous_sibling(&self, node: usize) -> Option<usize> {
        self.sibling(node, false)
    }

    fn tag_name(&self, node: usize) -> Option<&str> {
        self.nodes.get(node)?.tag.as_deref()
    }

    fn element_id(&self, node: usize) -> Option<&str> {
        self.attr(node, "id")
    }

    fn class_name(&self, node: usize) -> Option<&str> {
        self.attr(node, "class")
    }

    fn attr(&self, node: usize, name: &str) -> Option<&str> {
        self.nodes
            .get(node)?
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn text(&self, node: usize) -> Option<&str> {
        self.nodes.get(node)?.text.as_deref()
    }

    fn inner_content(&self, node: usize) -> String {
        let mut out = String::new();
        if let Some(entry) = self.nodes.get(node) {
            for &child in &entry.children {
                self.serialize(child, &mut out);
            }
        }
        out
    }
}

/// `<div id="box"><p class="a">1</p><p class="b">2</p><p class="a">3</p></div>`
pub fn three_paragraphs() -> (TestTree, [usize; 4]) {
    let mut tree = TestTree::new();
    let div = tree.element(0, "div", &[("id", "box")]);
    let first = tree.element(div, "p", &[("class", "a")]);
    tree.append_text(first, "1");
    let second = tree.element(div, "p", &[("class", "b")]);
    tree.append_text(second, "2");
    let third = tree.element(div, "p", &[("class", "a")]);
    tree.append_text(third, "3");
    (tree, [div, first, second, third])
}
