use core::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use super::{ExprSink, typing};
use crate::{
    error::{SinkError, SinkResult},
    ops::{BvBinaryOp, BvCompareOp, BvUnaryOp, Connective, Extension, Rotation},
    sort::{Numeral, Sort},
    symbols::SymbolTable,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Head {
    Symbol(String),
    Bool(bool),
    BitVec(Numeral, u32),
    /// An operator application, with its indices for indexed operators
    /// such as `(_ extract 7 0)`.
    Apply {
        op: &'static str,
        indices: Vec<u32>,
    },
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TermNode {
    pub head: Head,
    pub args: Vec<Term>,
    pub sort: Sort,
}

/// A solver-agnostic term. Clones share the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term(Rc<TermNode>);

impl Term {
    fn leaf(head: Head, sort: Sort) -> Self {
        Self(Rc::new(TermNode {
            head,
            args: Vec::new(),
            sort,
        }))
    }

    fn apply(op: &'static str, args: Vec<Term>, sort: Sort) -> Self {
        Self::indexed(op, Vec::new(), args, sort)
    }

    fn indexed(op: &'static str, indices: Vec<u32>, args: Vec<Term>, sort: Sort) -> Self {
        Self(Rc::new(TermNode {
            head: Head::Apply { op, indices },
            args,
            sort,
        }))
    }

    pub fn sort(&self) -> Sort {
        self.0.sort
    }

    pub fn head(&self) -> &Head {
        &self.0.head
    }

    pub fn args(&self) -> &[Term] {
        &self.0.args
    }

    /// Whether both handles point to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn is_simple_symbol(name: &str) -> bool {
    const EXTRA: &str = "~!@$%^&*_-+=<>.?/";
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || EXTRA.contains(c))
}

pub(crate) struct SymbolName<'a>(pub &'a str);

impl fmt::Display for SymbolName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_simple_symbol(self.0) {
            f.write_str(self.0)
        } else {
            write!(f, "|{}|", self.0)
        }
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::Symbol(name) => SymbolName(name).fmt(f),
            Head::Bool(value) => value.fmt(f),
            Head::BitVec(value, width) => write!(f, "(_ bv{value} {width})"),
            Head::Apply { op, indices } if indices.is_empty() => f.write_str(op),
            Head::Apply { op, indices } => {
                write!(f, "(_ {op}")?;
                for index in indices {
                    write!(f, " {index}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.args.is_empty() {
            return self.0.head.fmt(f);
        }
        write!(f, "({}", self.0.head)?;
        for arg in &self.0.args {
            write!(f, " {arg}")?;
        }
        f.write_str(")")
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Builds [`Term`]s. Stateless; every variable of the same name and sort
/// renders identically.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtLibSink;

impl SmtLibSink {
    fn expand_rotation(rotation: Rotation, arg: Term, amount: Term, width: u32) -> Term {
        let sort = Sort::BitVec(width);
        let size = Term::leaf(Head::BitVec(Numeral::from(width as u64), width), sort);
        let amount = Term::apply("bvurem", vec![amount, size.clone()], sort);
        let rest = Term::apply("bvsub", vec![size, amount.clone()], sort);
        let (first, second) = match rotation {
            Rotation::Left => ("bvshl", "bvlshr"),
            Rotation::Right => ("bvlshr", "bvshl"),
        };
        Term::apply(
            "bvor",
            vec![
                Term::apply(first, vec![arg.clone(), amount], sort),
                Term::apply(second, vec![arg, rest], sort),
            ],
            sort,
        )
    }
}

impl ExprSink for SmtLibSink {
    type Expr = Term;

    fn variable(&mut self, name: &str, sort: Sort) -> Self::Expr {
        Term::leaf(Head::Symbol(name.to_owned()), sort)
    }

    fn boolean(&mut self, value: bool) -> Self::Expr {
        Term::leaf(Head::Bool(value), Sort::Bool)
    }

    fn bit_vector(&mut self, value: &Numeral, width: u32) -> SinkResult<Self::Expr> {
        let sort = typing::bit_vector(value, width)?;
        Ok(Term::leaf(Head::BitVec(value.clone(), width), sort))
    }

    fn equal(&mut self, left: Self::Expr, right: Self::Expr) -> SinkResult<Self::Expr> {
        let sort = typing::equal(left.sort(), right.sort())?;
        Ok(Term::apply("=", vec![left, right], sort))
    }

    fn distinct(&mut self, args: Vec<Self::Expr>) -> SinkResult<Self::Expr> {
        let sort = typing::distinct(&args.iter().map(Term::sort).collect::<Vec<_>>())?;
        Ok(Term::apply("distinct", args, sort))
    }

    fn ite(
        &mut self,
        condition: Self::Expr,
        then: Self::Expr,
        otherwise: Self::Expr,
    ) -> SinkResult<Self::Expr> {
        let sort = typing::ite(condition.sort(), then.sort(), otherwise.sort())?;
        Ok(Term::apply("ite", vec![condition, then, otherwise], sort))
    }

    fn connective(&mut self, op: Connective, mut args: Vec<Self::Expr>) -> SinkResult<Self::Expr> {
        let sort = typing::connective(&args.iter().map(Term::sort).collect::<Vec<_>>())?;
        if args.len() == 1 {
            return Ok(args.remove(0));
        }
        let op = match op {
            Connective::And => "and",
            Connective::Or => "or",
        };
        Ok(Term::apply(op, args, sort))
    }

    fn not(&mut self, arg: Self::Expr) -> SinkResult<Self::Expr> {
        typing::bool_operand(arg.sort())?;
        Ok(Term::apply("not", vec![arg], Sort::Bool))
    }

    fn implies(&mut self, left: Self::Expr, right: Self::Expr) -> SinkResult<Self::Expr> {
        let sort = typing::bool_binary(left.sort(), right.sort())?;
        Ok(Term::apply("=>", vec![left, right], sort))
    }

    fn xor(&mut self, left: Self::Expr, right: Self::Expr) -> SinkResult<Self::Expr> {
        let sort = typing::bool_binary(left.sort(), right.sort())?;
        Ok(Term::apply("xor", vec![left, right], sort))
    }

    fn bv_unary(&mut self, op: BvUnaryOp, arg: Self::Expr) -> SinkResult<Self::Expr> {
        let sort = typing::bv_unary(arg.sort())?;
        let op = match op {
            BvUnaryOp::Neg => "bvneg",
            BvUnaryOp::Not => "bvnot",
        };
        Ok(Term::apply(op, vec![arg], sort))
    }

    fn bv_binary(
        &mut self,
        op: BvBinaryOp,
        left: Self::Expr,
        right: Self::Expr,
    ) -> SinkResult<Self::Expr> {
        let sort = typing::bv_binary(left.sort(), right.sort())?;
        let op = match op {
            BvBinaryOp::Add => "bvadd",
            BvBinaryOp::Sub => "bvsub",
            BvBinaryOp::Mul => "bvmul",
            BvBinaryOp::SDiv => "bvsdiv",
            BvBinaryOp::UDiv => "bvudiv",
            BvBinaryOp::SRem => "bvsrem",
            BvBinaryOp::URem => "bvurem",
            BvBinaryOp::SMod => "bvsmod",
            BvBinaryOp::And => "bvand",
            BvBinaryOp::Or => "bvor",
            BvBinaryOp::Xor => "bvxor",
            BvBinaryOp::Shl => "bvshl",
            BvBinaryOp::LShr => "bvlshr",
            BvBinaryOp::AShr => "bvashr",
            // QF_BV has no rotation by a term.
            BvBinaryOp::RotateLeft | BvBinaryOp::RotateRight => {
                let rotation = match op {
                    BvBinaryOp::RotateLeft => Rotation::Left,
                    _ => Rotation::Right,
                };
                let width = typing::bv_operand(sort)?;
                return Ok(Self::expand_rotation(rotation, left, right, width));
            }
        };
        Ok(Term::apply(op, vec![left, right], sort))
    }

    fn bv_compare(
        &mut self,
        op: BvCompareOp,
        left: Self::Expr,
        right: Self::Expr,
    ) -> SinkResult<Self::Expr> {
        let sort = typing::bv_compare(left.sort(), right.sort())?;
        let op = match op {
            BvCompareOp::ULe => "bvule",
            BvCompareOp::UGe => "bvuge",
            BvCompareOp::ULt => "bvult",
            BvCompareOp::UGt => "bvugt",
            BvCompareOp::SLe => "bvsle",
            BvCompareOp::SGe => "bvsge",
            BvCompareOp::SLt => "bvslt",
            BvCompareOp::SGt => "bvsgt",
        };
        Ok(Term::apply(op, vec![left, right], sort))
    }

    fn concat(&mut self, args: Vec<Self::Expr>) -> SinkResult<Self::Expr> {
        typing::concat(&args.iter().map(Term::sort).collect::<Vec<_>>())?;
        // `concat` is binary in SMT-LIB.
        let mut args = args.into_iter();
        let first = args
            .next()
            .ok_or_else(|| SinkError::new("concat without operands"))?;
        args.try_fold(first, |acc, next| -> SinkResult<_> {
            let sort = typing::concat(&[acc.sort(), next.sort()])?;
            Ok(Term::apply("concat", vec![acc, next], sort))
        })
    }

    fn extend(&mut self, ext: Extension, bits: u32, arg: Self::Expr) -> SinkResult<Self::Expr> {
        let sort = typing::extend(bits, arg.sort())?;
        let op = match ext {
            Extension::Sign => "sign_extend",
            Extension::Zero => "zero_extend",
        };
        Ok(Term::indexed(op, vec![bits], vec![arg], sort))
    }

    fn extract(&mut self, high: u32, low: u32, arg: Self::Expr) -> SinkResult<Self::Expr> {
        let sort = typing::extract(high, low, arg.sort())?;
        Ok(Term::indexed("extract", vec![high, low], vec![arg], sort))
    }

    fn rotate(
        &mut self,
        rotation: Rotation,
        amount: u32,
        arg: Self::Expr,
    ) -> SinkResult<Self::Expr> {
        let sort = typing::bv_unary(arg.sort())?;
        let op = match rotation {
            Rotation::Left => "rotate_left",
            Rotation::Right => "rotate_right",
        };
        Ok(Term::indexed(op, vec![amount], vec![arg], sort))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub sort: Sort,
}

/// A complete QF_BV problem: declarations of the free variables and a single assertion.
#[derive(Debug, Clone, Serialize)]
pub struct Script {
    pub logic: &'static str,
    pub declarations: Vec<Declaration>,
    pub assertion: Term,
}

impl Script {
    pub fn new(assertion: Term, symbols: &SymbolTable<Term>) -> Self {
        Self {
            logic: "QF_BV",
            // The table is ordered by name.
            declarations: symbols
                .iter()
                .map(|(name, symbol)| Declaration {
                    name: name.to_owned(),
                    sort: symbol.sort,
                })
                .collect(),
            assertion,
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(set-logic {})", self.logic)?;
        for Declaration { name, sort } in &self.declarations {
            writeln!(f, "(declare-fun {} () {sort})", SymbolName(name))?;
        }
        writeln!(f, "(assert {})", self.assertion)?;
        writeln!(f, "(check-sat)")
    }
}
