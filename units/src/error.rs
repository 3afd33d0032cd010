use thiserror::Error;

/// Everything that can go wrong when building units or combining quantities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {

    #[error("unknown unit symbol `{0}`")]
    UnknownUnitSymbol(String),

    #[error("incompatible dimensions: `{left}` is {left_dimension}, `{right}` is {right_dimension}")]
    DimensionMismatch {
        left: String,
        left_dimension: String,
        right: String,
        right_dimension: String,
    },

    #[error("invalid custom unit: {0}")]
    InvalidCustomUnitSpec(String),

    #[error("invalid scale: {0}")]
    InvalidScaleValue(String),

    #[error("exponent must be dimensionless, but has unit `{0}`")]
    NonDimensionlessExponent(String),

    #[error("not a unit representation: {0}")]
    ArgumentType(String),

    #[error("malformed unit expression `{expr}`: {reason}")]
    MalformedExpression { expr: String, reason: String },

    #[error("invalid exponent: {0}")]
    InvalidExponent(String),

    #[error("unit symbol `{0}` would be ambiguous")]
    SymbolCollision(String),
}

impl UnitError {
    pub(crate) fn mismatch(left: &crate::Unit, right: &crate::Unit) -> Self {
        UnitError::DimensionMismatch {
            left           : left .to_string(),
            left_dimension : left .dimension().to_string(),
            right          : right.to_string(),
            right_dimension: right.dimension().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UnitError>;
