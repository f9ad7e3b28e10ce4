use std::collections::HashMap;

use common::{log_debug, log_trace};

use crate::{
    error::{Result, SinkError, TranslateError},
    ops::{BvBinaryOp, Connective, OpKind},
    sink::ExprSink,
    source::SourceExpr,
    symbols::SymbolTable,
};

const TAG: &str = "translate";

/// The outcome of translating one formula.
#[derive(Debug, Clone)]
pub struct Translation<E> {
    pub expr: E,
    pub symbols: SymbolTable<E>,
}

/// Builds the symbol table of `root` and translates it through `sink`.
pub fn translate<S, K>(root: &S, sink: &mut K) -> Result<Translation<K::Expr>>
where
    S: SourceExpr,
    K: ExprSink,
{
    log_debug!(target: TAG, "Translating: {}", root);
    let symbols = SymbolTable::build(root, sink)?;
    log_debug!(target: TAG, "Found {} free variables", symbols.len());
    let expr = Translator::new(sink, &symbols).translate(root)?;
    Ok(Translation { expr, symbols })
}

enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }

    fn of(kind: OpKind) -> Self {
        use OpKind::*;
        match kind {
            True | False | Uninterpreted | Numeral => Self::Exactly(0),
            Not | BvUnary(_) | Extend(_) | Extract | RotateBy(_) => Self::Exactly(1),
            Eq | Implies | Iff | Xor | BvCompare(_) => Self::Exactly(2),
            BvBinary(op) if op.is_associative() => Self::AtLeast(2),
            BvBinary(_) => Self::Exactly(2),
            Ite => Self::Exactly(3),
            And | Or | Concat => Self::AtLeast(1),
            Distinct => Self::AtLeast(2),
            Unsupported(_) => Self::AtLeast(0),
        }
    }
}

/// Rewrites source nodes into the target in post order.
///
/// Results are remembered per node, so a sub-formula shared in the source is
/// translated once and shared in the target as well.
pub struct Translator<'a, S: SourceExpr, K: ExprSink> {
    sink: &'a mut K,
    symbols: &'a SymbolTable<K::Expr>,
    memo: HashMap<S::Id, K::Expr>,
}

impl<'a, S: SourceExpr, K: ExprSink> Translator<'a, S, K> {
    pub fn new(sink: &'a mut K, symbols: &'a SymbolTable<K::Expr>) -> Self {
        Self {
            sink,
            symbols,
            memo: HashMap::new(),
        }
    }

    pub fn translate(&mut self, node: &S) -> Result<K::Expr> {
        if let Some(expr) = self.memo.get(&node.id()) {
            return Ok(expr.clone());
        }
        let expr = self.translate_node(node)?;
        self.memo.insert(node.id(), expr.clone());
        Ok(expr)
    }

    fn translate_node(&mut self, node: &S) -> Result<K::Expr> {
        let kind = node.kind()?;
        log_trace!(target: TAG, "Translating `{}` node", kind);

        let children = node.children();
        if !Arity::of(kind).accepts(children.len()) {
            // A named symbol with operands is a function application.
            if kind == OpKind::Uninterpreted {
                return Err(TranslateError::UnsupportedOperator {
                    kind,
                    form: node.to_string(),
                });
            }
            return Err(malformed(
                kind,
                node,
                format!("unexpected number of operands: {}", children.len()),
            ));
        }

        use OpKind::*;
        let sink_result = match kind {
            True => Ok(self.sink.boolean(true)),
            False => Ok(self.sink.boolean(false)),
            Uninterpreted => {
                let (name, _) = node.variable().ok_or_else(|| {
                    TranslateError::UnsupportedOperator {
                        kind,
                        form: node.to_string(),
                    }
                })?;
                return self
                    .symbols
                    .get(&name)
                    .map(|symbol| symbol.expr.clone())
                    .ok_or(TranslateError::UnboundVariable { name });
            }
            Numeral => {
                let (value, width) = node
                    .numeral()
                    .ok_or_else(|| malformed(kind, node, "constant without a value"))?;
                self.sink.bit_vector(&value, width)
            }

            Eq => {
                let [left, right] = self.operands(node, kind, &children)?;
                self.sink.equal(left, right)
            }
            // Equivalence of booleans.
            Iff => {
                let [left, right] = self.operands(node, kind, &children)?;
                self.sink.equal(left, right)
            }
            Distinct => {
                let args = self.translate_all(&children)?;
                self.sink.distinct(args)
            }
            Ite => {
                let [condition, then, otherwise] = self.operands(node, kind, &children)?;
                self.sink.ite(condition, then, otherwise)
            }
            And | Or => {
                let op = if kind == And {
                    Connective::And
                } else {
                    Connective::Or
                };
                let args = self.translate_all(&children)?;
                self.sink.connective(op, args)
            }
            Not => {
                let [arg] = self.operands(node, kind, &children)?;
                self.sink.not(arg)
            }
            Implies => {
                let [left, right] = self.operands(node, kind, &children)?;
                self.sink.implies(left, right)
            }
            Xor => {
                let [left, right] = self.operands(node, kind, &children)?;
                self.sink.xor(left, right)
            }

            BvUnary(op) => {
                let [arg] = self.operands(node, kind, &children)?;
                self.sink.bv_unary(op, arg)
            }
            BvBinary(op) => {
                let args = self.translate_all(&children)?;
                self.fold_binary(op, args)
            }
            BvCompare(op) => {
                let [left, right] = self.operands(node, kind, &children)?;
                self.sink.bv_compare(op, left, right)
            }
            Concat => {
                let args = self.translate_all(&children)?;
                self.sink.concat(args)
            }
            Extend(ext) => {
                let [bits] = self.params(node, kind)?;
                let [arg] = self.operands(node, kind, &children)?;
                self.sink.extend(ext, bits, arg)
            }
            Extract => {
                let [high, low] = self.params(node, kind)?;
                let [arg] = self.operands(node, kind, &children)?;
                self.sink.extract(high, low, arg)
            }
            RotateBy(rotation) => {
                let [amount] = self.params(node, kind)?;
                let [arg] = self.operands(node, kind, &children)?;
                self.sink.rotate(rotation, amount, arg)
            }

            Unsupported(_) => {
                return Err(TranslateError::UnsupportedOperator {
                    kind,
                    form: node.to_string(),
                });
            }
        };

        sink_result.map_err(|SinkError { reason }| malformed(kind, node, reason))
    }

    fn translate_all(&mut self, children: &[S]) -> Result<Vec<K::Expr>> {
        children.iter().map(|child| self.translate(child)).collect()
    }

    /// Translates exactly `N` operands. The arity is checked beforehand.
    fn operands<const N: usize>(
        &mut self,
        node: &S,
        kind: OpKind,
        children: &[S],
    ) -> Result<[K::Expr; N]> {
        let args = self.translate_all(children)?;
        let count = args.len();
        args.try_into().map_err(|_| {
            malformed(kind, node, format!("expected {N} operands, found {count}"))
        })
    }

    fn params<const N: usize>(&self, node: &S, kind: OpKind) -> Result<[u32; N]> {
        let params = node.params();
        let count = params.len();
        params.try_into().map_err(|_| {
            malformed(
                kind,
                node,
                format!("expected {N} integer parameters, found {count}"),
            )
        })
    }

    fn fold_binary(&mut self, op: BvBinaryOp, args: Vec<K::Expr>) -> Result<K::Expr, SinkError> {
        let mut args = args.into_iter();
        let first = args
            .next()
            .ok_or_else(|| SinkError::new("missing operands"))?;
        args.try_fold(first, |acc, next| self.sink.bv_binary(op, acc, next))
    }
}

fn malformed<S: SourceExpr>(kind: OpKind, node: &S, reason: impl Into<String>) -> TranslateError {
    TranslateError::MalformedExpression {
        kind,
        reason: reason.into(),
        form: node.to_string(),
    }
}
