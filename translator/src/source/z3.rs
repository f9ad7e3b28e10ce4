use derive_more as dm;

use ::z3::ast::{self, Ast};

use z3_sys::AstKind;

use common::z3::{decl_int_params, numeral_string};

use super::SourceExpr;
use crate::{
    ops::{
        self, ArithOp, BvBinaryOp, BvCompareOp, BvUnaryOp, Extension, OpCode, OpKind, Rotation,
        Theory,
    },
    sort::{Numeral, Sort},
};

/// Declaration kinds as plain codes, so they can be matched together with their theory.
mod codes {
    use z3_sys::DeclKind;

    macro_rules! codes {
        ($($name:ident),* $(,)?) => {
            $(pub const $name: u32 = DeclKind::$name as u32;)*
        };
    }

    codes!(
        TRUE, FALSE, EQ, DISTINCT, ITE, AND, OR, IFF, XOR, NOT, IMPLIES, BNUM, BNEG, BADD, BSUB,
        BMUL, BSDIV, BUDIV, BSREM, BUREM, BSMOD, BSDIV_I, BUDIV_I, BSREM_I, BUREM_I, BSMOD_I, ULEQ,
        SLEQ, UGEQ, SGEQ, ULT, SLT, UGT, SGT, BAND, BOR, BNOT, BXOR, BNAND, BNOR, BXNOR, CONCAT,
        SIGN_EXT, ZERO_EXT, EXTRACT, REPEAT, BREDOR, BREDAND, BCOMP, BSHL, BLSHR, BASHR,
        ROTATE_LEFT, ROTATE_RIGHT, EXT_ROTATE_LEFT, EXT_ROTATE_RIGHT, UNINTERPRETED, ANUM, AGNUM,
        LE, GE, LT, GT, ADD, SUB, UMINUS, MUL, DIV, IDIV, REM, MOD, POWER, TO_REAL, TO_INT, IS_INT,
    );
}

const BINDER_VAR: u32 = AstKind::Var as u32;
const BINDER_QUANTIFIER: u32 = AstKind::Quantifier as u32;

/// Z3 groups its declaration kinds by family in the upper bits of the code.
fn theory_of(code: u32) -> Theory {
    if code == codes::UNINTERPRETED {
        return Theory::Uninterpreted;
    }
    match code >> 8 {
        0x1 => Theory::Core,
        0x2 => Theory::Arith,
        0x3 => Theory::Array,
        0x4 => Theory::BitVec,
        _ => Theory::Other,
    }
}

/// A view over a Z3 expression.
/// Z3 hash-conses its ASTs, so the id is the address of the underlying node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, dm::Display)]
#[display("{_0}")]
pub struct Z3Source<'ctx>(pub ast::Dynamic<'ctx>);

impl<'ctx> Z3Source<'ctx> {
    pub fn new(ast: &impl Ast<'ctx>) -> Self {
        Self(ast::Dynamic::from_ast(ast))
    }
}

impl<'ctx> From<ast::Bool<'ctx>> for Z3Source<'ctx> {
    fn from(ast: ast::Bool<'ctx>) -> Self {
        Self::new(&ast)
    }
}

impl<'ctx> From<ast::BV<'ctx>> for Z3Source<'ctx> {
    fn from(ast: ast::BV<'ctx>) -> Self {
        Self::new(&ast)
    }
}

impl<'ctx> SourceExpr for Z3Source<'ctx> {
    type Id = usize;

    fn id(&self) -> Self::Id {
        self.0.get_z3_ast() as usize
    }

    fn op_code(&self) -> OpCode {
        match self.0.safe_decl() {
            Ok(decl) => {
                let code = decl.kind() as u32;
                OpCode::new(theory_of(code), code)
            }
            // Bound variables and quantifiers are not applications.
            Err(_) => OpCode::new(Theory::Binder, self.0.kind() as u32),
        }
    }

    fn classify(code: OpCode) -> Option<OpKind> {
        use ArithOp as A;
        use BvBinaryOp as B;
        use BvCompareOp as C;
        use OpKind::*;
        use codes::*;

        let kind = match (code.theory, code.code) {
            (Theory::Core, TRUE) => True,
            (Theory::Core, FALSE) => False,
            (Theory::Core, EQ) => Eq,
            (Theory::Core, DISTINCT) => Distinct,
            (Theory::Core, ITE) => Ite,
            (Theory::Core, AND) => And,
            (Theory::Core, OR) => Or,
            (Theory::Core, NOT) => Not,
            (Theory::Core, IMPLIES) => Implies,
            (Theory::Core, IFF) => Iff,
            (Theory::Core, XOR) => Xor,

            (Theory::Uninterpreted, UNINTERPRETED) => Uninterpreted,

            (Theory::BitVec, BNUM) => OpKind::Numeral,
            (Theory::BitVec, BNEG) => BvUnary(BvUnaryOp::Neg),
            (Theory::BitVec, BNOT) => BvUnary(BvUnaryOp::Not),
            (Theory::BitVec, BADD) => BvBinary(B::Add),
            (Theory::BitVec, BSUB) => BvBinary(B::Sub),
            (Theory::BitVec, BMUL) => BvBinary(B::Mul),
            // The `_I` variants are produced by the simplifier once the divisor is
            // known to be non-zero.
            (Theory::BitVec, BSDIV | BSDIV_I) => BvBinary(B::SDiv),
            (Theory::BitVec, BUDIV | BUDIV_I) => BvBinary(B::UDiv),
            (Theory::BitVec, BSREM | BSREM_I) => BvBinary(B::SRem),
            (Theory::BitVec, BUREM | BUREM_I) => BvBinary(B::URem),
            (Theory::BitVec, BSMOD | BSMOD_I) => BvBinary(B::SMod),
            (Theory::BitVec, BAND) => BvBinary(B::And),
            (Theory::BitVec, BOR) => BvBinary(B::Or),
            (Theory::BitVec, BXOR) => BvBinary(B::Xor),
            (Theory::BitVec, BSHL) => BvBinary(B::Shl),
            (Theory::BitVec, BLSHR) => BvBinary(B::LShr),
            (Theory::BitVec, BASHR) => BvBinary(B::AShr),
            (Theory::BitVec, EXT_ROTATE_LEFT) => BvBinary(B::RotateLeft),
            (Theory::BitVec, EXT_ROTATE_RIGHT) => BvBinary(B::RotateRight),
            (Theory::BitVec, ULEQ) => BvCompare(C::ULe),
            (Theory::BitVec, UGEQ) => BvCompare(C::UGe),
            (Theory::BitVec, ULT) => BvCompare(C::ULt),
            (Theory::BitVec, UGT) => BvCompare(C::UGt),
            (Theory::BitVec, SLEQ) => BvCompare(C::SLe),
            (Theory::BitVec, SGEQ) => BvCompare(C::SGe),
            (Theory::BitVec, SLT) => BvCompare(C::SLt),
            (Theory::BitVec, SGT) => BvCompare(C::SGt),
            (Theory::BitVec, CONCAT) => Concat,
            (Theory::BitVec, SIGN_EXT) => Extend(Extension::Sign),
            (Theory::BitVec, ZERO_EXT) => Extend(Extension::Zero),
            (Theory::BitVec, EXTRACT) => Extract,
            (Theory::BitVec, ROTATE_LEFT) => RotateBy(Rotation::Left),
            (Theory::BitVec, ROTATE_RIGHT) => RotateBy(Rotation::Right),
            (Theory::BitVec, BNAND) => Unsupported(ops::Unsupported::BvNand),
            (Theory::BitVec, BNOR) => Unsupported(ops::Unsupported::BvNor),
            (Theory::BitVec, BXNOR) => Unsupported(ops::Unsupported::BvXnor),
            (Theory::BitVec, REPEAT) => Unsupported(ops::Unsupported::Repeat),
            (Theory::BitVec, BREDOR) => Unsupported(ops::Unsupported::BvRedOr),
            (Theory::BitVec, BREDAND) => Unsupported(ops::Unsupported::BvRedAnd),
            (Theory::BitVec, BCOMP) => Unsupported(ops::Unsupported::BvComp),

            (Theory::Arith, ANUM | AGNUM) => Unsupported(ops::Unsupported::Arith(A::Numeral)),
            (Theory::Arith, LE) => Unsupported(ops::Unsupported::Arith(A::Le)),
            (Theory::Arith, GE) => Unsupported(ops::Unsupported::Arith(A::Ge)),
            (Theory::Arith, LT) => Unsupported(ops::Unsupported::Arith(A::Lt)),
            (Theory::Arith, GT) => Unsupported(ops::Unsupported::Arith(A::Gt)),
            (Theory::Arith, ADD) => Unsupported(ops::Unsupported::Arith(A::Add)),
            (Theory::Arith, SUB) => Unsupported(ops::Unsupported::Arith(A::Sub)),
            (Theory::Arith, UMINUS) => Unsupported(ops::Unsupported::Arith(A::Neg)),
            (Theory::Arith, MUL) => Unsupported(ops::Unsupported::Arith(A::Mul)),
            (Theory::Arith, DIV) => Unsupported(ops::Unsupported::Arith(A::Div)),
            (Theory::Arith, IDIV) => Unsupported(ops::Unsupported::Arith(A::IDiv)),
            (Theory::Arith, REM) => Unsupported(ops::Unsupported::Arith(A::Rem)),
            (Theory::Arith, MOD) => Unsupported(ops::Unsupported::Arith(A::Mod)),
            (Theory::Arith, POWER) => Unsupported(ops::Unsupported::Arith(A::Power)),
            (Theory::Arith, TO_REAL) => Unsupported(ops::Unsupported::Arith(A::ToReal)),
            (Theory::Arith, TO_INT) => Unsupported(ops::Unsupported::Arith(A::ToInt)),
            (Theory::Arith, IS_INT) => Unsupported(ops::Unsupported::Arith(A::IsInt)),

            // Application codes always come from a declaration kind, so the rest
            // are known to Z3 but not translated, e.g. overflow predicates.
            (
                theory @ (Theory::Core
                | Theory::Arith
                | Theory::Array
                | Theory::BitVec
                | Theory::Other),
                _,
            ) => Unsupported(ops::Unsupported::Theory(theory)),
            (Theory::Binder, BINDER_VAR | BINDER_QUANTIFIER) => {
                Unsupported(ops::Unsupported::Theory(Theory::Binder))
            }
            _ => return None,
        };
        Some(kind)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children().into_iter().map(Self).collect()
    }

    fn variable(&self) -> Option<(String, Sort)> {
        let decl = self.0.safe_decl().ok()?;
        if decl.kind() as u32 != codes::UNINTERPRETED || decl.arity() != 0 {
            return None;
        }
        sort_of(&self.0).map(|sort| (decl.name(), sort))
    }

    fn numeral(&self) -> Option<(Numeral, u32)> {
        let bv = self.0.as_bv()?;
        let digits = numeral_string(&bv)?;
        Some((Numeral::parse(&digits)?, bv.get_size()))
    }

    fn literal(&self) -> Option<String> {
        numeral_string(&self.0)
    }

    fn params(&self) -> Vec<u32> {
        decl_int_params(&self.0)
            .and_then(|params| {
                params
                    .into_iter()
                    .map(|p| u32::try_from(p).ok())
                    .collect::<Option<Vec<_>>>()
            })
            .unwrap_or_default()
    }
}

fn sort_of(ast: &ast::Dynamic<'_>) -> Option<Sort> {
    if let Some(bv) = ast.as_bv() {
        Some(Sort::BitVec(bv.get_size()))
    } else {
        ast.as_bool().map(|_| Sort::Bool)
    }
}
