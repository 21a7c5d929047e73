//! Hierarchical CSV outline export.
//!
//! Every root-to-leaf label path becomes one row. Consecutive rows are
//! compressed against the previous path up to the first differing level, so
//! a shared ancestry is written once and later rows only carry the new tail.

use std::collections::{HashMap, HashSet};

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::MindmapError;
use crate::graph::{Edge, Node};

const UTF8_BOM: &[u8] = "\u{feff}".as_bytes();

/// Label paths from `root_id` to every leaf, depth-first over children in
/// edge order.
///
/// Edges pointing at unknown nodes are skipped. A missing root yields no
/// paths.
pub fn outline_paths(nodes: &[Node], edges: &[Edge], root_id: &str) -> Vec<Vec<String>> {
    let labels: HashMap<&str, &str> = nodes
        .iter()
        .map(|node| (node.id.as_str(), node.label.as_str()))
        .collect();
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        children
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut paths = Vec::new();
    let Some(root_label) = labels.get(root_id) else {
        return paths;
    };

    // Depth-first with an explicit stack; `current` holds the labels from the
    // root down to the node being visited.
    let mut current: Vec<String> = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(root_id, *root_label, 0usize)];
    while let Some((id, label, depth)) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        current.truncate(depth);
        current.push(label.to_string());

        let kids = children.get(id).map(Vec::as_slice).unwrap_or_default();
        if kids.is_empty() {
            paths.push(current.clone());
            continue;
        }
        for &child in kids.iter().rev() {
            if let Some(&child_label) = labels.get(child) {
                stack.push((child, child_label, depth + 1));
            }
        }
    }
    paths
}

/// First-divergence compression: cells matching the previous path are blanked
/// until the first position that differs; from there on every cell is kept.
pub fn compress_paths(paths: &[Vec<String>]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(paths.len());
    let mut previous: &[String] = &[];
    for path in paths {
        let shared = path
            .iter()
            .zip(previous)
            .take_while(|(current, prev)| current == prev)
            .count();
        let row = path
            .iter()
            .enumerate()
            .map(|(i, cell)| if i < shared { String::new() } else { cell.clone() })
            .collect();
        rows.push(row);
        previous = path;
    }
    rows
}

/// Compressed outline rows plus the deepest path length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineTable {
    pub max_depth: usize,
    pub rows: Vec<Vec<String>>,
}

impl OutlineTable {
    pub fn from_graph(nodes: &[Node], edges: &[Edge], root_id: &str) -> Self {
        let paths = outline_paths(nodes, edges, root_id);
        let max_depth = paths.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            max_depth,
            rows: compress_paths(&paths),
        }
    }

    /// Header `Level 1..Level N`.
    pub fn header(&self) -> Vec<String> {
        (1..=self.max_depth)
            .map(|level| format!("Level {}", level))
            .collect()
    }

    /// Encode as a BOM-prefixed CSV document with every field quoted and rows
    /// right-padded to `max_depth`.
    pub fn to_csv(&self) -> Result<Vec<u8>, MindmapError> {
        let mut buf = UTF8_BOM.to_vec();
        {
            let mut writer = WriterBuilder::new()
                .quote_style(QuoteStyle::Always)
                .terminator(Terminator::Any(b'\n'))
                .flexible(false)
                .from_writer(&mut buf);
            writer.write_record(self.header())?;
            for row in &self.rows {
                let mut padded = row.clone();
                padded.resize(self.max_depth, String::new());
                writer.write_record(&padded)?;
            }
            writer.flush().map_err(csv::Error::from)?;
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ROOT_ID;
    use crate::test_support::labeled_store;

    fn path(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn compress_blanks_shared_prefix() {
        let rows = compress_paths(&[path(&["A", "B", "C"]), path(&["A", "B", "D"])]);
        assert_eq!(rows[1], path(&["", "", "D"]));
    }

    #[test]
    fn compress_keeps_everything_after_first_divergence() {
        let rows = compress_paths(&[path(&["A", "B", "C"]), path(&["A", "X", "C"])]);
        assert_eq!(rows[1], path(&["", "X", "C"]));

        let rows = compress_paths(&[path(&["A", "B", "C"]), path(&["A", "X", "Y"])]);
        assert_eq!(rows[1], path(&["", "X", "Y"]));
    }

    #[test]
    fn compress_only_looks_at_the_previous_path() {
        let rows = compress_paths(&[
            path(&["A", "B"]),
            path(&["A", "C"]),
            path(&["A", "B", "D"]),
        ]);
        assert_eq!(rows, vec![path(&["A", "B"]), path(&["", "C"]), path(&["", "B", "D"])]);
    }

    #[test]
    fn paths_follow_edge_order_depth_first() {
        let store = labeled_store(
            &[(ROOT_ID, "Root"), ("2", "Work"), ("3", "Home"), ("4", "Email")],
            &[(ROOT_ID, "2"), (ROOT_ID, "3"), ("2", "4")],
        );
        let paths = outline_paths(store.nodes(), store.edges(), ROOT_ID);
        assert_eq!(
            paths,
            vec![path(&["Root", "Work", "Email"]), path(&["Root", "Home"])]
        );
    }

    #[test]
    fn deep_chain_yields_one_full_path() {
        let nodes: Vec<Node> = (1..=50_000)
            .map(|i| Node::new(i.to_string(), format!("n{i}")))
            .collect();
        let edges: Vec<Edge> = (2..=50_000)
            .map(|i| Edge::new(&(i - 1).to_string(), &i.to_string()))
            .collect();

        let paths = outline_paths(&nodes, &edges, ROOT_ID);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 50_000);
        assert_eq!(paths[0].last().map(String::as_str), Some("n50000"));
    }

    #[test]
    fn csv_is_bom_prefixed_quoted_and_padded() {
        let store = labeled_store(
            &[(ROOT_ID, "Root"), ("2", "Say \"hi\""), ("3", "Home"), ("4", "Email")],
            &[(ROOT_ID, "2"), ("2", "4"), (ROOT_ID, "3")],
        );
        let table = OutlineTable::from_graph(store.nodes(), store.edges(), ROOT_ID);
        let bytes = table.to_csv().expect("csv");

        assert!(bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).expect("utf8");
        assert_eq!(
            text,
            "\"Level 1\",\"Level 2\",\"Level 3\"\n\
             \"Root\",\"Say \"\"hi\"\"\",\"Email\"\n\
             \"\",\"Home\",\"\"\n"
        );
    }
}
