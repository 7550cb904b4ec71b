pub mod category_tree;
pub mod force_graph;
pub mod markdown;
pub mod tabs;
