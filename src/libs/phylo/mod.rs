pub mod build;
pub mod error;
pub mod matrix;
pub mod merge;
pub mod node;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::{PhyloError, PhyloResult};
pub use matrix::DistanceMatrix;
pub use merge::MergeTree;
pub use node::{NestedNode, NodeName};
pub use writer::BranchPolicy;
