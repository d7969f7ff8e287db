/// Error type for all matrix and network operations.
///
/// Every variant is a deterministic contract violation detectable from the
/// operand shapes alone; none is transient or worth retrying. Operations
/// validate shapes before mutating anything, so a returned error always
/// leaves the operands untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Element-wise operands (or an input/target vector) whose sizes do not
    /// match the required shape.
    #[error("shape mismatch: expected {expected_rows}x{expected_cols}, got {got_rows}x{got_cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        got_rows: usize,
        got_cols: usize,
    },
    /// Matrix-product operands where the left column count does not equal
    /// the right row count.
    #[error("dimension mismatch: cannot multiply {left_rows}x{left_cols} by {right_rows}x{right_cols}")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
