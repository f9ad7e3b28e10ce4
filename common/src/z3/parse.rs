use std::ffi::{CStr, CString};

use z3::{Context, ast};
use z3_sys::{
    ErrorCode, Z3_ast_vector_get, Z3_ast_vector_size, Z3_get_error_code, Z3_get_error_msg,
    Z3_parse_smtlib2_string, Z3_set_error_handler,
};

use crate::log_debug;

/// Parses an SMT-LIB v2 script and returns its assertions in order.
/// Declarations are resolved within the script itself.
pub fn parse_smtlib2<'ctx>(
    context: &'ctx Context,
    script: &str,
) -> Result<Vec<ast::Bool<'ctx>>, String> {
    let script = CString::new(script).map_err(|e| e.to_string())?;
    let c = context.get_z3_context();

    unsafe {
        // Record errors instead of exiting the process.
        Z3_set_error_handler(c, None);

        let vec = Z3_parse_smtlib2_string(
            c,
            script.as_ptr(),
            0,
            core::ptr::null(),
            core::ptr::null(),
            0,
            core::ptr::null(),
            core::ptr::null(),
        );

        let code = Z3_get_error_code(c);
        if code != ErrorCode::Ok {
            let message = Z3_get_error_msg(c, code);
            return Err(if message.is_null() {
                format!("{code:?}")
            } else {
                CStr::from_ptr(message).to_string_lossy().into_owned()
            });
        }

        let size = Z3_ast_vector_size(c, vec);
        log_debug!("Parsed {} assertions", size);
        (0..size)
            .map(|i| {
                let assertion = ast::Dynamic::wrap(context, Z3_ast_vector_get(c, vec, i));
                assertion
                    .as_bool()
                    .ok_or_else(|| format!("Assertion is not a formula: {assertion}"))
            })
            .collect()
    }
}
