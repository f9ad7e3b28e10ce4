pub mod dot;
pub mod error;
pub mod ops;
pub mod sink;
pub mod sort;
pub mod source;
pub mod symbols;
pub mod translate;

pub use crate::dot::{GraphStyle, render_dot};
pub use crate::error::{Result, SinkError, SinkResult, TranslateError};
pub use crate::ops::{OpCode, OpKind, Theory};
pub use crate::sink::{ExprSink, Script, SmtLibSink, Term};
pub use crate::sort::{Numeral, Sort};
pub use crate::source::SourceExpr;
pub use crate::symbols::{Symbol, SymbolTable};
pub use crate::translate::{Translation, Translator, translate};

#[cfg(feature = "z3")]
pub use crate::sink::Z3Sink;
#[cfg(feature = "z3")]
pub use crate::source::Z3Source;
