//! Constructors of the target representation.

pub mod smtlib;
#[cfg(feature = "z3")]
mod z3;

use itertools::Itertools;

use crate::{
    error::{SinkError, SinkResult},
    ops::{BvBinaryOp, BvCompareOp, BvUnaryOp, Connective, Extension, Rotation},
    sort::{Numeral, Sort},
};

pub use self::smtlib::{Script, SmtLibSink, Term};
#[cfg(feature = "z3")]
pub use self::z3::Z3Sink;

/// One builder per operator class.
///
/// Builders receive already translated operands and must not keep any state
/// that outlives the call other than what the target representation itself
/// allocates. Operands of the wrong sort are rejected with a [`SinkError`].
pub trait ExprSink {
    type Expr: Clone;

    fn variable(&mut self, name: &str, sort: Sort) -> Self::Expr;

    fn boolean(&mut self, value: bool) -> Self::Expr;

    fn bit_vector(&mut self, value: &Numeral, width: u32) -> SinkResult<Self::Expr>;

    fn equal(&mut self, left: Self::Expr, right: Self::Expr) -> SinkResult<Self::Expr>;

    /// Pairwise inequality of all operands.
    fn distinct(&mut self, args: Vec<Self::Expr>) -> SinkResult<Self::Expr>;

    fn ite(
        &mut self,
        condition: Self::Expr,
        then: Self::Expr,
        otherwise: Self::Expr,
    ) -> SinkResult<Self::Expr>;

    fn connective(&mut self, op: Connective, args: Vec<Self::Expr>) -> SinkResult<Self::Expr>;

    fn not(&mut self, arg: Self::Expr) -> SinkResult<Self::Expr>;

    fn implies(&mut self, left: Self::Expr, right: Self::Expr) -> SinkResult<Self::Expr>;

    fn xor(&mut self, left: Self::Expr, right: Self::Expr) -> SinkResult<Self::Expr>;

    fn bv_unary(&mut self, op: BvUnaryOp, arg: Self::Expr) -> SinkResult<Self::Expr>;

    fn bv_binary(
        &mut self,
        op: BvBinaryOp,
        left: Self::Expr,
        right: Self::Expr,
    ) -> SinkResult<Self::Expr>;

    fn bv_compare(
        &mut self,
        op: BvCompareOp,
        left: Self::Expr,
        right: Self::Expr,
    ) -> SinkResult<Self::Expr>;

    /// Most significant operand first.
    fn concat(&mut self, args: Vec<Self::Expr>) -> SinkResult<Self::Expr>;

    fn extend(&mut self, ext: Extension, bits: u32, arg: Self::Expr) -> SinkResult<Self::Expr>;

    fn extract(&mut self, high: u32, low: u32, arg: Self::Expr) -> SinkResult<Self::Expr>;

    fn rotate(&mut self, rotation: Rotation, amount: u32, arg: Self::Expr)
    -> SinkResult<Self::Expr>;
}

/// Sort rules shared by the sinks. Each returns the sort of the result.
pub(crate) mod typing {
    use super::*;

    pub(crate) fn bool_operand(sort: Sort) -> SinkResult<()> {
        match sort {
            Sort::Bool => Ok(()),
            other => Err(SinkError::new(format!("expected Bool, found {other}"))),
        }
    }

    pub(crate) fn bv_operand(sort: Sort) -> SinkResult<u32> {
        sort.width()
            .ok_or_else(|| SinkError::new(format!("expected a bit vector, found {sort}")))
    }

    pub(crate) fn bit_vector(value: &Numeral, width: u32) -> SinkResult<Sort> {
        if width == 0 {
            return Err(SinkError::new("bit vectors must be at least one bit wide"));
        }
        if !value.fits_in(width) {
            return Err(SinkError::new(format!(
                "{value} does not fit in {width} bits"
            )));
        }
        Ok(Sort::BitVec(width))
    }

    pub(crate) fn same_sort(left: Sort, right: Sort) -> SinkResult<Sort> {
        if left == right {
            Ok(left)
        } else {
            Err(SinkError::new(format!(
                "operands have different sorts: {left} and {right}"
            )))
        }
    }

    pub(crate) fn equal(left: Sort, right: Sort) -> SinkResult<Sort> {
        same_sort(left, right).map(|_| Sort::Bool)
    }

    pub(crate) fn distinct(sorts: &[Sort]) -> SinkResult<Sort> {
        if sorts.len() < 2 {
            return Err(SinkError::new("distinct needs at least two operands"));
        }
        sorts
            .iter()
            .tuple_windows()
            .try_for_each(|(l, r)| same_sort(*l, *r).map(|_| ()))?;
        Ok(Sort::Bool)
    }

    pub(crate) fn ite(condition: Sort, then: Sort, otherwise: Sort) -> SinkResult<Sort> {
        bool_operand(condition)?;
        same_sort(then, otherwise)
    }

    pub(crate) fn connective(sorts: &[Sort]) -> SinkResult<Sort> {
        if sorts.is_empty() {
            return Err(SinkError::new("connective without operands"));
        }
        sorts.iter().try_for_each(|s| bool_operand(*s))?;
        Ok(Sort::Bool)
    }

    pub(crate) fn bool_binary(left: Sort, right: Sort) -> SinkResult<Sort> {
        bool_operand(left)?;
        bool_operand(right)?;
        Ok(Sort::Bool)
    }

    pub(crate) fn bv_unary(arg: Sort) -> SinkResult<Sort> {
        bv_operand(arg).map(Sort::BitVec)
    }

    pub(crate) fn bv_binary(left: Sort, right: Sort) -> SinkResult<Sort> {
        bv_operand(left)?;
        same_sort(left, right)
    }

    pub(crate) fn bv_compare(left: Sort, right: Sort) -> SinkResult<Sort> {
        bv_binary(left, right).map(|_| Sort::Bool)
    }

    pub(crate) fn concat(sorts: &[Sort]) -> SinkResult<Sort> {
        if sorts.is_empty() {
            return Err(SinkError::new("concat without operands"));
        }
        sorts
            .iter()
            .try_fold(0u32, |total, sort| {
                let width = bv_operand(*sort)?;
                total
                    .checked_add(width)
                    .ok_or_else(|| SinkError::new("concatenation is too wide"))
            })
            .map(Sort::BitVec)
    }

    pub(crate) fn extend(bits: u32, arg: Sort) -> SinkResult<Sort> {
        let width = bv_operand(arg)?;
        width
            .checked_add(bits)
            .map(Sort::BitVec)
            .ok_or_else(|| SinkError::new("extension is too wide"))
    }

    pub(crate) fn extract(high: u32, low: u32, arg: Sort) -> SinkResult<Sort> {
        let width = bv_operand(arg)?;
        if low > high || high >= width {
            return Err(SinkError::new(format!(
                "bits [{high}:{low}] are out of range for {arg}"
            )));
        }
        Ok(Sort::BitVec(high - low + 1))
    }
}
