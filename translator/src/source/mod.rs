//! Read-only access to the formula being translated.

#[cfg(feature = "z3")]
mod z3;

use core::{fmt, hash::Hash};

use crate::{
    error::{Result, TranslateError},
    ops::{OpCode, OpKind},
    sort::{Numeral, Sort},
};

#[cfg(feature = "z3")]
pub use self::z3::Z3Source;

/// A node of the source formula.
///
/// Implementations are cheap handles: cloning one must not copy the subtree.
/// The `Display` form is used in error messages and should be the
/// representation's own textual syntax.
pub trait SourceExpr: Clone + fmt::Display {
    /// Physical identity of the node. Two handles to the same shared node
    /// have equal ids; structurally equal but separate nodes may not.
    type Id: Copy + Eq + Hash + fmt::Debug;

    fn id(&self) -> Self::Id;

    fn op_code(&self) -> OpCode;

    /// The operator map of this representation.
    /// `None` means the code is not known at all.
    fn classify(code: OpCode) -> Option<OpKind>;

    /// Operands in order.
    fn children(&self) -> Vec<Self>;

    /// Name and sort, if this is a 0-ary uninterpreted constant of a handled sort.
    fn variable(&self) -> Option<(String, Sort)>;

    /// Value and width, if this is a bit-vector numeral.
    fn numeral(&self) -> Option<(Numeral, u32)>;

    /// Integer parameters of the operator, e.g. `[high, low]` for extraction.
    fn params(&self) -> Vec<u32>;

    /// Textual value of a numeral of any sort, integers and reals included.
    fn literal(&self) -> Option<String> {
        self.numeral().map(|(value, _)| value.to_string())
    }

    fn kind(&self) -> Result<OpKind> {
        let code = self.op_code();
        Self::classify(code).ok_or_else(|| TranslateError::UnknownOperator {
            code,
            form: self.to_string(),
        })
    }
}
