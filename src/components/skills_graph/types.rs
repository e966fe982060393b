use serde::Deserialize;

/// A point in container-local (or page) pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum Category {
	#[serde(rename = "AI & ML")]
	AiMl,
	#[serde(rename = "Web & Deployment")]
	WebDeployment,
}

impl Category {
	pub const ALL: [Category; 2] = [Category::AiMl, Category::WebDeployment];

	pub fn label(self) -> &'static str {
		match self {
			Category::AiMl => "AI & ML",
			Category::WebDeployment => "Web & Deployment",
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Category::AiMl => "#3da5f4",
			Category::WebDeployment => "#d46aff",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProjectLink {
	pub label: String,
	pub url: String,
}

/// Immutable project metadata attached to a node.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeDetail {
	pub title: String,
	pub summary: String,
	pub description: String,
	#[serde(default)]
	pub links: Vec<ProjectLink>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SkillNode {
	pub id: String,
	pub name: String,
	pub category: Category,
	pub position: Point,
	#[serde(default)]
	pub connections: Vec<String>,
	pub detail: NodeDetail,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GraphEdge {
	pub from: String,
	pub to: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphDataset {
	pub nodes: Vec<SkillNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

impl GraphDataset {
	pub fn node(&self, id: &str) -> Option<&SkillNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}
