use derive_more as dm;
use z3::ast;

/* NOTE: Why not using `Dynamic`?
 * Every consumer has to tell booleans and bit vectors apart anyway, and a
 * closed enum lets the compiler check that both are handled.
 */
#[derive(Debug, Clone, PartialEq, Eq, Hash, dm::Display)]
#[display("{_0}")]
pub enum AstNode<'ctx> {
    Bool(ast::Bool<'ctx>),
    BitVector(ast::BV<'ctx>),
}

impl<'ctx> From<ast::Bool<'ctx>> for AstNode<'ctx> {
    fn from(ast: ast::Bool<'ctx>) -> Self {
        Self::Bool(ast)
    }
}

impl<'ctx> From<ast::BV<'ctx>> for AstNode<'ctx> {
    fn from(ast: ast::BV<'ctx>) -> Self {
        Self::BitVector(ast)
    }
}

impl<'ctx> AstNode<'ctx> {
    pub fn as_bool(&self) -> Option<&ast::Bool<'ctx>> {
        match self {
            Self::Bool(ast) => Some(ast),
            _ => None,
        }
    }

    pub fn as_bit_vector(&self) -> Option<&ast::BV<'ctx>> {
        match self {
            Self::BitVector(ast) => Some(ast),
            _ => None,
        }
    }

    /// Bit width, or `None` for booleans.
    pub fn size(&self) -> Option<u32> {
        self.as_bit_vector().map(ast::BV::get_size)
    }
}

impl<'ctx> AstNode<'ctx> {
    pub fn dyn_ast(&self) -> ast::Dynamic<'ctx> {
        match self {
            Self::Bool(ast) => ast::Dynamic::from_ast(ast),
            Self::BitVector(ast) => ast::Dynamic::from_ast(ast),
        }
    }
}
