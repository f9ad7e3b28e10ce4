//! The closed vocabulary of operators the translator knows about.
//!
//! Source representations map their own (theory, code) pairs onto [`OpKind`];
//! target sinks receive the grouped operator enums below.

use core::fmt;

use derive_more as dm;
use serde::{Deserialize, Serialize};

/// The theory an operator code is declared in.
/// Codes are only meaningful together with their theory, as representations
/// are free to reuse the same number across theories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display)]
pub enum Theory {
    #[display("core")]
    Core,
    #[display("arith")]
    Arith,
    #[display("array")]
    Array,
    #[display("bv")]
    BitVec,
    #[display("uninterpreted")]
    Uninterpreted,
    /// Quantifiers and the variables they bind.
    #[display("binder")]
    Binder,
    #[display("other")]
    Other,
}

/// Operator identity as reported by a source representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display)]
#[display("{theory}:{code:#x}")]
pub struct OpCode {
    pub theory: Theory,
    pub code: u32,
}

impl OpCode {
    pub const fn new(theory: Theory, code: u32) -> Self {
        Self { theory, code }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display, Serialize, Deserialize)]
pub enum BvUnaryOp {
    #[display("bvneg")]
    Neg,
    #[display("bvnot")]
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display, Serialize, Deserialize)]
pub enum BvBinaryOp {
    #[display("bvadd")]
    Add,
    #[display("bvsub")]
    Sub,
    #[display("bvmul")]
    Mul,
    #[display("bvsdiv")]
    SDiv,
    #[display("bvudiv")]
    UDiv,
    #[display("bvsrem")]
    SRem,
    #[display("bvurem")]
    URem,
    #[display("bvsmod")]
    SMod,
    #[display("bvand")]
    And,
    #[display("bvor")]
    Or,
    #[display("bvxor")]
    Xor,
    #[display("bvshl")]
    Shl,
    #[display("bvlshr")]
    LShr,
    #[display("bvashr")]
    AShr,
    /// Rotation by the value of the second operand.
    #[display("ext_rotate_left")]
    RotateLeft,
    #[display("ext_rotate_right")]
    RotateRight,
}

impl BvBinaryOp {
    /// Operators that may appear with more than two operands and are folded left.
    pub fn is_associative(self) -> bool {
        matches!(self, Self::Add | Self::Mul | Self::And | Self::Or | Self::Xor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display, Serialize, Deserialize)]
pub enum BvCompareOp {
    #[display("bvule")]
    ULe,
    #[display("bvuge")]
    UGe,
    #[display("bvult")]
    ULt,
    #[display("bvugt")]
    UGt,
    #[display("bvsle")]
    SLe,
    #[display("bvsge")]
    SGe,
    #[display("bvslt")]
    SLt,
    #[display("bvsgt")]
    SGt,
}

impl BvCompareOp {
    pub fn is_signed(self) -> bool {
        matches!(self, Self::SLe | Self::SGe | Self::SLt | Self::SGt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display, Serialize, Deserialize)]
pub enum Connective {
    #[display("and")]
    And,
    #[display("or")]
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display, Serialize, Deserialize)]
pub enum Extension {
    #[display("sign_extend")]
    Sign,
    #[display("zero_extend")]
    Zero,
}

/// Rotation by a literal amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display, Serialize, Deserialize)]
pub enum Rotation {
    #[display("rotate_left")]
    Left,
    #[display("rotate_right")]
    Right,
}

/// Integer and real arithmetic. Never translated, but named for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display)]
pub enum ArithOp {
    #[display("numeral")]
    Numeral,
    #[display("<=")]
    Le,
    #[display(">=")]
    Ge,
    #[display("<")]
    Lt,
    #[display(">")]
    Gt,
    #[display("+")]
    Add,
    #[display("-")]
    Sub,
    #[display("-")]
    Neg,
    #[display("*")]
    Mul,
    #[display("/")]
    Div,
    #[display("//")]
    IDiv,
    #[display("%")]
    Rem,
    #[display("mod")]
    Mod,
    #[display("^")]
    Power,
    #[display("to_real")]
    ToReal,
    #[display("to_int")]
    ToInt,
    #[display("is_int")]
    IsInt,
}

/// Operators that are recognized but deliberately not translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, dm::Display)]
pub enum Unsupported {
    #[display("bvnand")]
    BvNand,
    #[display("bvnor")]
    BvNor,
    #[display("bvxnor")]
    BvXnor,
    #[display("repeat")]
    Repeat,
    #[display("bvredor")]
    BvRedOr,
    #[display("bvredand")]
    BvRedAnd,
    #[display("bvcomp")]
    BvComp,
    #[display("{_0}")]
    Arith(ArithOp),
    #[display("{_0} operator")]
    Theory(Theory),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    True,
    False,
    Eq,
    Distinct,
    Ite,
    And,
    Or,
    Not,
    Implies,
    Iff,
    Xor,
    /// An uninterpreted symbol: a free variable when it has no arguments.
    Uninterpreted,
    Numeral,
    BvUnary(BvUnaryOp),
    BvBinary(BvBinaryOp),
    BvCompare(BvCompareOp),
    /// Most significant operand first.
    Concat,
    Extend(Extension),
    Extract,
    RotateBy(Rotation),
    Unsupported(Unsupported),
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use OpKind::*;
        match self {
            True => f.write_str("true"),
            False => f.write_str("false"),
            Eq => f.write_str("="),
            Distinct => f.write_str("distinct"),
            Ite => f.write_str("ite"),
            And => f.write_str("and"),
            Or => f.write_str("or"),
            Not => f.write_str("not"),
            Implies => f.write_str("=>"),
            Iff => f.write_str("iff"),
            Xor => f.write_str("xor"),
            Uninterpreted => f.write_str("uninterpreted"),
            Numeral => f.write_str("numeral"),
            BvUnary(op) => op.fmt(f),
            BvBinary(op) => op.fmt(f),
            BvCompare(op) => op.fmt(f),
            Concat => f.write_str("concat"),
            Extend(ext) => ext.fmt(f),
            Extract => f.write_str("extract"),
            RotateBy(rotation) => rotation.fmt(f),
            OpKind::Unsupported(op) => op.fmt(f),
        }
    }
}
