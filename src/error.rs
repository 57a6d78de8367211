use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum Error {
    /// Used when the user pass a logical invalid parameter to a function.
    #[error("Parameter error: {0}")]
    InvalidParameter(String),

    /// A projection matrix with the wrong shape or non-finite entries.
    #[error("Malformed projection matrix: expected {expected}, got {rows}x{cols}")]
    MalformedMatrix {
        expected: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Image dimensions that disagree with the declared viewport.
    #[error("Shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Label {label} is not a valid class index (number of classes: {num_classes})")]
    InvalidLabel { label: i32, num_classes: usize },

    #[error("The volume has an auxiliary channel but the frame has no auxiliary map")]
    MissingAuxiliary,

    #[error("The volume has no auxiliary channel but the frame carries an auxiliary map")]
    UnexpectedAuxiliary,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a error with the kind `InvalidParameter`.
    /// # Arguments
    /// * `msg` - The error message.
    pub fn invalid_parameter<T: ToString>(msg: T) -> Self {
        Error::InvalidParameter(msg.to_string())
    }

    pub(crate) fn shape_mismatch(what: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Error::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
