use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhyloError {
    /// Malformed or non-square matrix, duplicated labels, bad cells
    #[error("Format error: {0}")]
    Format(String),

    /// Not enough leaves to build a tree
    #[error("Input error: {0}")]
    Input(String),

    /// Malformed Newick text
    #[error("Parse error at line {line}, column {column}:\n{message}\nSnippet: \"{snippet}\"")]
    Parse {
        /// A human-readable message explaining the error
        message: String,
        /// The line number (1-based)
        line: usize,
        /// The column number (1-based)
        column: usize,
        /// The snippet of input where the error occurred
        snippet: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type PhyloResult<T> = Result<T, PhyloError>;
