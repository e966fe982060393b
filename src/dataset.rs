//! Built-in portfolio dataset for the skills graph.

use std::collections::HashSet;

use log::warn;
use thiserror::Error;

use crate::components::skills_graph::GraphDataset;

const PORTFOLIO_JSON: &str = include_str!("../assets/skills.json");

#[derive(Error, Debug)]
pub enum DatasetError {
	#[error("JSON parsing error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Duplicate node id: {0}")]
	DuplicateId(String),
}

/// The dataset shipped with the site.
pub fn portfolio() -> Result<GraphDataset, DatasetError> {
	parse(PORTFOLIO_JSON)
}

/// Parses a dataset and rejects duplicate node ids.
///
/// References to unknown nodes are only logged; the graph skips them when drawing.
pub fn parse(json: &str) -> Result<GraphDataset, DatasetError> {
	let dataset: GraphDataset = serde_json::from_str(json)?;
	let mut seen = HashSet::new();
	for node in &dataset.nodes {
		if !seen.insert(node.id.as_str()) {
			return Err(DatasetError::DuplicateId(node.id.clone()));
		}
	}
	for gap in dangling_references(&dataset) {
		warn!("{gap}");
	}
	Ok(dataset)
}

pub fn dangling_references(dataset: &GraphDataset) -> Vec<String> {
	let known = |id: &str| dataset.node(id).is_some();
	let mut gaps = Vec::new();
	for edge in &dataset.edges {
		for end in [&edge.from, &edge.to] {
			if !known(end.as_str()) {
				gaps.push(format!("edge {} -> {} references unknown node {end}", edge.from, edge.to));
			}
		}
	}
	for node in &dataset.nodes {
		for id in node.connections.iter().filter(|id| !known(id.as_str())) {
			gaps.push(format!("node {} lists unknown connection {id}", node.id));
		}
	}
	gaps
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn portfolio_dataset_is_consistent() {
		let dataset = portfolio().unwrap();
		assert_eq!(dataset.nodes.len(), 10);
		assert_eq!(dataset.edges.len(), 12);
		assert!(dangling_references(&dataset).is_empty());

		let python = dataset.node("python").unwrap();
		assert_eq!(python.name, "Python");
		assert_eq!(python.position.x, 400.0);
		assert_eq!(python.category.label(), "AI & ML");
	}

	#[test]
	fn links_are_optional() {
		let json = r#"{
			"nodes": [{
				"id": "a", "name": "A", "category": "Web & Deployment",
				"position": {"x": 1, "y": 2},
				"detail": {"title": "t", "summary": "s", "description": "d"}
			}]
		}"#;
		let dataset = parse(json).unwrap();
		let a = &dataset.nodes[0];
		assert!(a.detail.links.is_empty());
		assert!(a.connections.is_empty());
		assert!(dataset.edges.is_empty());
		assert_eq!(a.category.color(), "#d46aff");
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let node = r#"{"id": "a", "name": "A", "category": "AI & ML", "position": {"x": 0, "y": 0},
			"detail": {"title": "t", "summary": "s", "description": "d"}}"#;
		let json = format!(r#"{{"nodes": [{node}, {node}]}}"#);
		assert!(matches!(parse(&json), Err(DatasetError::DuplicateId(id)) if id == "a"));
	}

	#[test]
	fn unknown_category_is_a_parse_error() {
		let json = r#"{"nodes": [{"id": "a", "name": "A", "category": "Design", "position": {"x": 0, "y": 0},
			"detail": {"title": "t", "summary": "s", "description": "d"}}]}"#;
		assert!(matches!(parse(json), Err(DatasetError::Json(_))));
	}

	#[test]
	fn dangling_references_are_reported_not_fatal() {
		let json = r#"{
			"nodes": [{"id": "a", "name": "A", "category": "AI & ML", "position": {"x": 0, "y": 0},
				"connections": ["ghost"],
				"detail": {"title": "t", "summary": "s", "description": "d"}}],
			"edges": [{"from": "a", "to": "missing"}]
		}"#;
		let dataset = parse(json).unwrap();
		let gaps = dangling_references(&dataset);
		assert_eq!(gaps.len(), 2);
		assert!(gaps[0].contains("missing"));
		assert!(gaps[1].contains("ghost"));
	}
}
