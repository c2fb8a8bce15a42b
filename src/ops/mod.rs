pub mod progress;
pub mod tree_ops;
