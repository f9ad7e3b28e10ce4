#![allow(dead_code)]

use std::{fmt, rc::Rc};

use bvxlate::{
    ExprSink, Numeral, OpCode, OpKind, SinkResult, SmtLibSink, Sort, SourceExpr, Term, Theory,
    ops::{ArithOp, BvBinaryOp, BvCompareOp, BvUnaryOp, Connective, Extension, Rotation},
};

/// Operator codes of the in-memory representation.
fn table() -> Vec<(OpCode, OpKind)> {
    use BvBinaryOp as B;
    use BvCompareOp as C;
    use OpKind::*;

    let core = [
        True, False, Eq, Distinct, Ite, And, Or, Not, Implies, Iff, Xor,
    ];
    let bv = [
        OpKind::Numeral,
        BvUnary(BvUnaryOp::Neg),
        BvUnary(BvUnaryOp::Not),
        BvBinary(B::Add),
        BvBinary(B::Sub),
        BvBinary(B::Mul),
        BvBinary(B::SDiv),
        BvBinary(B::UDiv),
        BvBinary(B::SRem),
        BvBinary(B::URem),
        BvBinary(B::SMod),
        BvBinary(B::And),
        BvBinary(B::Or),
        BvBinary(B::Xor),
        BvBinary(B::Shl),
        BvBinary(B::LShr),
        BvBinary(B::AShr),
        BvBinary(B::RotateLeft),
        BvBinary(B::RotateRight),
        BvCompare(C::ULe),
        BvCompare(C::UGe),
        BvCompare(C::ULt),
        BvCompare(C::UGt),
        BvCompare(C::SLe),
        BvCompare(C::SGe),
        BvCompare(C::SLt),
        BvCompare(C::SGt),
        Concat,
        Extend(Extension::Sign),
        Extend(Extension::Zero),
        Extract,
        RotateBy(Rotation::Left),
        RotateBy(Rotation::Right),
        Unsupported(bvxlate::ops::Unsupported::BvXnor),
        Unsupported(bvxlate::ops::Unsupported::Repeat),
    ];

    let arith = [
        Unsupported(bvxlate::ops::Unsupported::Theory(Theory::Arith)),
        Unsupported(bvxlate::ops::Unsupported::Arith(ArithOp::Numeral)),
        Unsupported(bvxlate::ops::Unsupported::Arith(ArithOp::Le)),
        Unsupported(bvxlate::ops::Unsupported::Arith(ArithOp::Add)),
        Unsupported(bvxlate::ops::Unsupported::Arith(ArithOp::Mul)),
        Unsupported(bvxlate::ops::Unsupported::Arith(ArithOp::IDiv)),
        Unsupported(bvxlate::ops::Unsupported::Arith(ArithOp::Mod)),
    ];

    core.into_iter()
        .enumerate()
        .map(|(i, kind)| (OpCode::new(Theory::Core, i as u32), kind))
        .chain(
            bv.into_iter()
                .enumerate()
                .map(|(i, kind)| (OpCode::new(Theory::BitVec, i as u32), kind)),
        )
        .chain(
            arith
                .into_iter()
                .enumerate()
                .map(|(i, kind)| (OpCode::new(Theory::Arith, i as u32), kind)),
        )
        .chain([(OpCode::new(Theory::Uninterpreted, 0), Uninterpreted)])
        .collect()
}

fn code_of(kind: OpKind) -> OpCode {
    table()
        .into_iter()
        .find(|(_, k)| *k == kind)
        .map(|(code, _)| code)
        .unwrap_or_else(|| panic!("No code for {kind}"))
}

#[derive(Debug)]
enum Leaf {
    None,
    Variable(String, Sort),
    Numeral(Numeral, u32),
    /// A constant of a sort the translator does not handle, e.g. an integer.
    Name(String),
    /// A numeral of such a sort.
    Literal(String),
}

#[derive(Debug)]
struct Node {
    code: OpCode,
    children: Vec<Expr>,
    params: Vec<u32>,
    leaf: Leaf,
}

/// A minimal expression DAG. Clones share the node.
#[derive(Debug, Clone)]
pub struct Expr(Rc<Node>);

impl Expr {
    fn new(code: OpCode, children: Vec<Expr>, params: Vec<u32>, leaf: Leaf) -> Self {
        Self(Rc::new(Node {
            code,
            children,
            params,
            leaf,
        }))
    }

    pub fn var(name: &str, sort: Sort) -> Self {
        Self::new(
            code_of(OpKind::Uninterpreted),
            vec![],
            vec![],
            Leaf::Variable(name.to_owned(), sort),
        )
    }

    pub fn bv_var(name: &str, width: u32) -> Self {
        Self::var(name, Sort::BitVec(width))
    }

    pub fn bool_var(name: &str) -> Self {
        Self::var(name, Sort::Bool)
    }

    pub fn bv(value: u64, width: u32) -> Self {
        Self::new(
            code_of(OpKind::Numeral),
            vec![],
            vec![],
            Leaf::Numeral(Numeral::from(value), width),
        )
    }

    pub fn int_var(name: &str) -> Self {
        Self::new(
            code_of(OpKind::Uninterpreted),
            vec![],
            vec![],
            Leaf::Name(name.to_owned()),
        )
    }

    pub fn int(value: i64) -> Self {
        Self::new(
            code_of(OpKind::Unsupported(bvxlate::ops::Unsupported::Arith(
                ArithOp::Numeral,
            ))),
            vec![],
            vec![],
            Leaf::Literal(value.to_string()),
        )
    }

    pub fn arith(op: ArithOp, children: Vec<Expr>) -> Self {
        Self::app(
            OpKind::Unsupported(bvxlate::ops::Unsupported::Arith(op)),
            children,
        )
    }

    pub fn app(kind: OpKind, children: Vec<Expr>) -> Self {
        Self::new(code_of(kind), children, vec![], Leaf::None)
    }

    pub fn indexed(kind: OpKind, params: Vec<u32>, children: Vec<Expr>) -> Self {
        Self::new(code_of(kind), children, params, Leaf::None)
    }

    /// An application with an arbitrary code, known or not.
    pub fn raw(code: OpCode, children: Vec<Expr>) -> Self {
        Self::new(code, children, vec![], Leaf::None)
    }

    pub fn bin(op: BvBinaryOp, left: Expr, right: Expr) -> Self {
        Self::app(OpKind::BvBinary(op), vec![left, right])
    }

    pub fn cmp(op: BvCompareOp, left: Expr, right: Expr) -> Self {
        Self::app(OpKind::BvCompare(op), vec![left, right])
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::app(OpKind::Eq, vec![left, right])
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.leaf {
            Leaf::Variable(name, _) => return f.write_str(name),
            Leaf::Numeral(value, width) => return write!(f, "#{value}:{width}"),
            Leaf::Name(text) | Leaf::Literal(text) => return f.write_str(text),
            Leaf::None => {}
        }
        match <Self as SourceExpr>::classify(self.0.code) {
            Some(kind) => write!(f, "({kind}")?,
            None => write!(f, "({}", self.0.code)?,
        }
        for param in &self.0.params {
            write!(f, " {param}")?;
        }
        for child in &self.0.children {
            write!(f, " {child}")?;
        }
        f.write_str(")")
    }
}

impl SourceExpr for Expr {
    type Id = *const ();

    fn id(&self) -> Self::Id {
        Rc::as_ptr(&self.0) as *const ()
    }

    fn op_code(&self) -> OpCode {
        self.0.code
    }

    fn classify(code: OpCode) -> Option<OpKind> {
        table()
            .into_iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| kind)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.clone()
    }

    fn variable(&self) -> Option<(String, Sort)> {
        match &self.0.leaf {
            Leaf::Variable(name, sort) if self.0.children.is_empty() => {
                Some((name.clone(), *sort))
            }
            _ => None,
        }
    }

    fn numeral(&self) -> Option<(Numeral, u32)> {
        match &self.0.leaf {
            Leaf::Numeral(value, width) => Some((value.clone(), *width)),
            _ => None,
        }
    }

    fn params(&self) -> Vec<u32> {
        self.0.params.clone()
    }

    fn literal(&self) -> Option<String> {
        match &self.0.leaf {
            Leaf::Numeral(value, _) => Some(value.to_string()),
            Leaf::Literal(text) => Some(text.clone()),
            _ => None,
        }
    }
}

/// Forwards to [`SmtLibSink`] and records the name of every builder called.
#[derive(Debug, Default)]
pub struct RecordingSink {
    inner: SmtLibSink,
    pub calls: Vec<&'static str>,
}

impl RecordingSink {
    pub fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| **c == name).count()
    }
}

impl ExprSink for RecordingSink {
    type Expr = Term;

    fn variable(&mut self, name: &str, sort: Sort) -> Term {
        self.calls.push("variable");
        self.inner.variable(name, sort)
    }

    fn boolean(&mut self, value: bool) -> Term {
        self.calls.push("boolean");
        self.inner.boolean(value)
    }

    fn bit_vector(&mut self, value: &Numeral, width: u32) -> SinkResult<Term> {
        self.calls.push("bit_vector");
        self.inner.bit_vector(value, width)
    }

    fn equal(&mut self, left: Term, right: Term) -> SinkResult<Term> {
        self.calls.push("equal");
        self.inner.equal(left, right)
    }

    fn distinct(&mut self, args: Vec<Term>) -> SinkResult<Term> {
        self.calls.push("distinct");
        self.inner.distinct(args)
    }

    fn ite(&mut self, condition: Term, then: Term, otherwise: Term) -> SinkResult<Term> {
        self.calls.push("ite");
        self.inner.ite(condition, then, otherwise)
    }

    fn connective(&mut self, op: Connective, args: Vec<Term>) -> SinkResult<Term> {
        self.calls.push("connective");
        self.inner.connective(op, args)
    }

    fn not(&mut self, arg: Term) -> SinkResult<Term> {
        self.calls.push("not");
        self.inner.not(arg)
    }

    fn implies(&mut self, left: Term, right: Term) -> SinkResult<Term> {
        self.calls.push("implies");
        self.inner.implies(left, right)
    }

    fn xor(&mut self, left: Term, right: Term) -> SinkResult<Term> {
        self.calls.push("xor");
        self.inner.xor(left, right)
    }

    fn bv_unary(&mut self, op: BvUnaryOp, arg: Term) -> SinkResult<Term> {
        self.calls.push("bv_unary");
        self.inner.bv_unary(op, arg)
    }

    fn bv_binary(&mut self, op: BvBinaryOp, left: Term, right: Term) -> SinkResult<Term> {
        self.calls.push("bv_binary");
        self.inner.bv_binary(op, left, right)
    }

    fn bv_compare(&mut self, op: BvCompareOp, left: Term, right: Term) -> SinkResult<Term> {
        self.calls.push("bv_compare");
        self.inner.bv_compare(op, left, right)
    }

    fn concat(&mut self, args: Vec<Term>) -> SinkResult<Term> {
        self.calls.push("concat");
        self.inner.concat(args)
    }

    fn extend(&mut self, ext: Extension, bits: u32, arg: Term) -> SinkResult<Term> {
        self.calls.push("extend");
        self.inner.extend(ext, bits, arg)
    }

    fn extract(&mut self, high: u32, low: u32, arg: Term) -> SinkResult<Term> {
        self.calls.push("extract");
        self.inner.extract(high, low, arg)
    }

    fn rotate(&mut self, rotation: Rotation, amount: u32, arg: Term) -> SinkResult<Term> {
        self.calls.push("rotate");
        self.inner.rotate(rotation, amount, arg)
    }
}
