pub mod skills_graph;
