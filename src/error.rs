use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScriptError>;

#[derive(Debug, Error)]
pub enum ScriptError {
    /// Character offset outside `[-len, len)` of the buffered content.
    #[error("offset {offset} is out of range for content of length {len}")]
    OutOfRange { offset: isize, len: usize },

    /// Line index outside `[-len, len)` of the buffered lines.
    #[error("line index {index} is out of range for {len} lines")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("offset {offset} does not fall on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("indent level cannot be set to negative value: {0}")]
    NegativeIndent(i64),

    #[error("line handle refers to a line that is no longer in the buffer")]
    StaleLine,

    #[error("cannot chain an empty statement")]
    EmptyStatement,

    #[error("statement refers to lines that are no longer in the buffer")]
    StaleStatement,

    #[error("chained statement does not immediately follow its target")]
    NotAdjacent,

    #[error("function already defined: {0:?}")]
    DuplicateFunction(String),

    #[error("not a valid shell name: {0:?}")]
    InvalidName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScriptError {
    pub fn out_of_range(offset: isize, len: usize) -> Self {
        ScriptError::OutOfRange { offset, len }
    }

    pub fn index_out_of_range(index: isize, len: usize) -> Self {
        ScriptError::IndexOutOfRange { index, len }
    }
}
