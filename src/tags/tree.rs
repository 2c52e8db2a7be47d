use serde::Serialize;
use std::collections::BTreeMap;

/// One segment of the tag hierarchy. `count` is the number of documents
/// tagged with exactly this path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagNode {
    pub count: usize,
    pub children: BTreeMap<String, TagNode>,
}

impl TagNode {
    /// Documents tagged with this path or anything below it.
    pub fn total(&self) -> usize {
        self.count + self.children.values().map(TagNode::total).sum::<usize>()
    }
}

/// Ordered tag hierarchy rebuilt from every document on each run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagTree {
    pub roots: BTreeMap<String, TagNode>,
}

impl TagTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one tag occurrence, creating intermediate segments as needed.
    /// Empty segments (`a//b`, trailing `/`) are ignored.
    pub fn insert(&mut self, tag: &str) {
        let mut segments = tag.split('/').filter(|s| !s.is_empty());
        let Some(first) = segments.next() else {
            return;
        };

        let mut node = self.roots.entry(first.to_string()).or_default();
        for segment in segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Indented listing, two spaces per level, with subtree totals.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, node) in &self.roots {
            Self::render_node(&mut out, name, node, 0);
        }
        out
    }

    fn render_node(out: &mut String, name: &str, node: &TagNode, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} ({})\n", name, node.total()));
        for (child_name, child) in &node.children {
            Self::render_node(out, child_name, child, depth + 1);
        }
    }
}
