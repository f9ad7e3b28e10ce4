use derive_more as dm;

use crate::ops::{OpCode, OpKind};

/// Why a translation was aborted. The first error met during the walk is
/// returned as is; nothing is translated past it.
#[derive(Debug, Clone, PartialEq, Eq, dm::Display, dm::Error)]
pub enum TranslateError {
    /// The operator is known but intentionally not translated.
    #[display("Unsupported operator `{kind}` in: {form}")]
    UnsupportedOperator { kind: OpKind, form: String },
    /// The source representation reported a code missing from its operator map.
    #[display("Unknown operator {code} in: {form}")]
    UnknownOperator { code: OpCode, form: String },
    /// A variable leaf has no entry in the symbol table.
    #[display("Unbound variable `{name}`")]
    UnboundVariable { name: String },
    #[display("Malformed `{kind}` expression ({reason}): {form}")]
    MalformedExpression {
        kind: OpKind,
        reason: String,
        form: String,
    },
}

pub type Result<T, E = TranslateError> = core::result::Result<T, E>;

/// A target constructor rejected its operands, typically for a sort clash.
#[derive(Debug, Clone, PartialEq, Eq, dm::Display, dm::Error)]
#[display("{reason}")]
pub struct SinkError {
    pub reason: String,
}

impl SinkError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type SinkResult<T> = core::result::Result<T, SinkError>;
