use ::z3::{
    Context,
    ast::{self, Ast},
};

use itertools::Itertools;

use common::z3::AstNode;

use super::{ExprSink, typing};
use crate::{
    error::{SinkError, SinkResult},
    ops::{BvBinaryOp, BvCompareOp, BvUnaryOp, Connective, Extension, Rotation},
    sort::{Numeral, Sort},
};

/// Builds expressions in a Z3 context, typically a different one from the
/// context of the source formula.
#[derive(Clone, Copy)]
pub struct Z3Sink<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> Z3Sink<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }
}

fn sort_of(node: &AstNode<'_>) -> Sort {
    match node.size() {
        Some(width) => Sort::BitVec(width),
        None => Sort::Bool,
    }
}

fn bool_of<'a, 'ctx>(node: &'a AstNode<'ctx>) -> SinkResult<&'a ast::Bool<'ctx>> {
    node.as_bool()
        .ok_or_else(|| SinkError::new(format!("expected Bool, found {}", sort_of(node))))
}

fn bv_of<'a, 'ctx>(node: &'a AstNode<'ctx>) -> SinkResult<&'a ast::BV<'ctx>> {
    node.as_bit_vector().ok_or_else(|| {
        SinkError::new(format!("expected a bit vector, found {}", sort_of(node)))
    })
}

impl<'ctx> ExprSink for Z3Sink<'ctx> {
    type Expr = AstNode<'ctx>;

    fn variable(&mut self, name: &str, sort: Sort) -> Self::Expr {
        match sort {
            Sort::Bool => ast::Bool::new_const(self.context, name).into(),
            Sort::BitVec(width) => ast::BV::new_const(self.context, name, width).into(),
        }
    }

    fn boolean(&mut self, value: bool) -> Self::Expr {
        ast::Bool::from_bool(self.context, value).into()
    }

    fn bit_vector(&mut self, value: &Numeral, width: u32) -> SinkResult<Self::Expr> {
        typing::bit_vector(value, width)?;
        ast::BV::from_str(self.context, width, value.as_str())
            .map(Into::into)
            .ok_or_else(|| SinkError::new(format!("Z3 rejected the numeral {value}")))
    }

    fn equal(&mut self, left: Self::Expr, right: Self::Expr) -> SinkResult<Self::Expr> {
        typing::equal(sort_of(&left), sort_of(&right))?;
        Ok(left.dyn_ast()._eq(&right.dyn_ast()).into())
    }

    fn distinct(&mut self, args: Vec<Self::Expr>) -> SinkResult<Self::Expr> {
        typing::distinct(&args.iter().map(sort_of).collect::<Vec<_>>())?;
        let args = args.iter().map(AstNode::dyn_ast).collect::<Vec<_>>();
        let pairs = args
            .iter()
            .tuple_combinations()
            .map(|(l, r)| l._eq(r).not())
            .collect::<Vec<_>>();
        Ok(ast::Bool::and(self.context, &pairs.iter().collect::<Vec<_>>()).into())
    }

    fn ite(
        &mut self,
        condition: Self::Expr,
        then: Self::Expr,
        otherwise: Self::Expr,
    ) -> SinkResult<Self::Expr> {
        let sort = typing::ite(sort_of(&condition), sort_of(&then), sort_of(&otherwise))?;
        let condition = bool_of(&condition)?;
        match (&then, &otherwise) {
            (AstNode::Bool(then), AstNode::Bool(otherwise)) => {
                Ok(condition.ite(then, otherwise).into())
            }
            (AstNode::BitVector(then), AstNode::BitVector(otherwise)) => {
                Ok(condition.ite(then, otherwise).into())
            }
            _ => Err(SinkError::new(format!("branches of sort {sort} disagree"))),
        }
    }

    fn connective(&mut self, op: Connective, args: Vec<Self::Expr>) -> SinkResult<Self::Expr> {
        typing::connective(&args.iter().map(sort_of).collect::<Vec<_>>())?;
        let args = args.iter().map(bool_of).collect::<SinkResult<Vec<_>>>()?;
        Ok(match op {
            Connective::And => ast::Bool::and(self.context, &args),
            Connective::Or => ast::Bool::or(self.context, &args),
        }
        .into())
    }

    fn not(&mut self, arg: Self::Expr) -> SinkResult<Self::Expr> {
        Ok(bool_of(&arg)?.not().into())
    }

    fn implies(&mut self, left: Self::Expr, right: Self::Expr) -> SinkResult<Self::Expr> {
        Ok(bool_of(&left)?.implies(bool_of(&right)?).into())
    }

    fn xor(&mut self, left: Self::Expr, right: Self::Expr) -> SinkResult<Self::Expr> {
        Ok(bool_of(&left)?.xor(bool_of(&right)?).into())
    }

    fn bv_unary(&mut self, op: BvUnaryOp, arg: Self::Expr) -> SinkResult<Self::Expr> {
        let arg = bv_of(&arg)?;
        Ok(match op {
            BvUnaryOp::Neg => arg.bvneg(),
            BvUnaryOp::Not => arg.bvnot(),
        }
        .into())
    }

    fn bv_binary(
        &mut self,
        op: BvBinaryOp,
        left: Self::Expr,
        right: Self::Expr,
    ) -> SinkResult<Self::Expr> {
        typing::bv_binary(sort_of(&left), sort_of(&right))?;
        let f: fn(&ast::BV<'ctx>, &ast::BV<'ctx>) -> ast::BV<'ctx> = match op {
            BvBinaryOp::Add => ast::BV::bvadd,
            BvBinaryOp::Sub => ast::BV::bvsub,
            BvBinaryOp::Mul => ast::BV::bvmul,
            BvBinaryOp::SDiv => ast::BV::bvsdiv,
            BvBinaryOp::UDiv => ast::BV::bvudiv,
            BvBinaryOp::SRem => ast::BV::bvsrem,
            BvBinaryOp::URem => ast::BV::bvurem,
            BvBinaryOp::SMod => ast::BV::bvsmod,
            BvBinaryOp::And => ast::BV::bvand,
            BvBinaryOp::Or => ast::BV::bvor,
            BvBinaryOp::Xor => ast::BV::bvxor,
            BvBinaryOp::Shl => ast::BV::bvshl,
            BvBinaryOp::LShr => ast::BV::bvlshr,
            BvBinaryOp::AShr => ast::BV::bvashr,
            BvBinaryOp::RotateLeft => ast::BV::bvrotl,
            BvBinaryOp::RotateRight => ast::BV::bvrotr,
        };
        Ok(f(bv_of(&left)?, bv_of(&right)?).into())
    }

    fn bv_compare(
        &mut self,
        op: BvCompareOp,
        left: Self::Expr,
        right: Self::Expr,
    ) -> SinkResult<Self::Expr> {
        typing::bv_compare(sort_of(&left), sort_of(&right))?;
        let f: fn(&ast::BV<'ctx>, &ast::BV<'ctx>) -> ast::Bool<'ctx> = match op {
            BvCompareOp::ULe => ast::BV::bvule,
            BvCompareOp::UGe => ast::BV::bvuge,
            BvCompareOp::ULt => ast::BV::bvult,
            BvCompareOp::UGt => ast::BV::bvugt,
            BvCompareOp::SLe => ast::BV::bvsle,
            BvCompareOp::SGe => ast::BV::bvsge,
            BvCompareOp::SLt => ast::BV::bvslt,
            BvCompareOp::SGt => ast::BV::bvsgt,
        };
        Ok(f(bv_of(&left)?, bv_of(&right)?).into())
    }

    fn concat(&mut self, args: Vec<Self::Expr>) -> SinkResult<Self::Expr> {
        typing::concat(&args.iter().map(sort_of).collect::<Vec<_>>())?;
        let mut args = args.iter().map(bv_of);
        let first = args
            .next()
            .ok_or_else(|| SinkError::new("concat without operands"))??
            .clone();
        args.try_fold(first, |acc, next| -> SinkResult<_> { Ok(acc.concat(next?)) })
            .map(Into::into)
    }

    fn extend(&mut self, ext: Extension, bits: u32, arg: Self::Expr) -> SinkResult<Self::Expr> {
        typing::extend(bits, sort_of(&arg))?;
        let arg = bv_of(&arg)?;
        Ok(match ext {
            Extension::Sign => arg.sign_ext(bits),
            Extension::Zero => arg.zero_ext(bits),
        }
        .into())
    }

    fn extract(&mut self, high: u32, low: u32, arg: Self::Expr) -> SinkResult<Self::Expr> {
        typing::extract(high, low, sort_of(&arg))?;
        Ok(bv_of(&arg)?.extract(high, low).into())
    }

    fn rotate(
        &mut self,
        rotation: Rotation,
        amount: u32,
        arg: Self::Expr,
    ) -> SinkResult<Self::Expr> {
        let arg = bv_of(&arg)?;
        let width = arg.get_size();
        // Rotation is periodic in the width.
        let amount = ast::BV::from_u64(self.context, (amount % width) as u64, width);
        Ok(match rotation {
            Rotation::Left => arg.bvrotl(&amount),
            Rotation::Right => arg.bvrotr(&amount),
        }
        .into())
    }
}
