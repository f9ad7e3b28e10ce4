mod node;
mod parse;
mod solve;

pub use node::*;
pub use parse::parse_smtlib2;
pub use solve::{SolveResult, WrappedSolver, set_global_params};

use std::ffi::CStr;

use z3::ast::Ast;
use z3_sys::{AstKind, ParameterKind};

/// Returns the decimal digits of a numeral AST, whatever its width.
pub fn numeral_string<'ctx>(ast: &impl Ast<'ctx>) -> Option<String> {
    if ast.kind() != AstKind::Numeral {
        return None;
    }
    unsafe {
        Some(z3_sys::Z3_get_numeral_string(
            ast.get_ctx().get_z3_context(),
            ast.get_z3_ast(),
        ))
        .filter(|x| !x.is_null())
        .map(|x| CStr::from_ptr(x))
        .and_then(|s| s.to_str().ok())
        .map(str::to_owned)
    }
}

/// Returns the integer parameters of the declaration applied at the root of
/// `ast`, in declaration order. For example `(_ extract 7 0)` yields `[7, 0]`
/// and `(_ sign_extend 24)` yields `[24]`.
/// Returns `None` if the AST is not an application or a parameter is not an integer.
pub fn decl_int_params<'ctx>(ast: &impl Ast<'ctx>) -> Option<Vec<i32>> {
    if ast.kind() != AstKind::App {
        return None;
    }
    unsafe {
        let ctx = ast.get_ctx().get_z3_context();
        let app = z3_sys::Z3_to_app(ctx, ast.get_z3_ast());
        let decl = z3_sys::Z3_get_app_decl(ctx, app);
        let count = z3_sys::Z3_get_decl_num_parameters(ctx, decl);
        (0..count)
            .map(|idx| {
                (z3_sys::Z3_get_decl_parameter_kind(ctx, decl, idx) == ParameterKind::Int)
                    .then(|| z3_sys::Z3_get_decl_int_parameter(ctx, decl, idx))
            })
            .collect()
    }
}
