use std::collections::BTreeMap;

use z3::{Context, SatResult, Solver, ast};

use crate::log_debug;

use super::node::*;

/// The result of the checking performed by [`WrappedSolver`]
#[derive(Debug)]
pub enum SolveResult<M> {
    Sat(M),
    Unsat,
    Unknown,
}

impl<M> SolveResult<M> {
    pub fn is_sat(&self) -> bool {
        matches!(self, Self::Sat(..))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Self::Unsat)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sat(..) => "sat",
            Self::Unsat => "unsat",
            Self::Unknown => "unknown",
        }
    }
}

/// Values of the named variables in a satisfying assignment, ordered by name.
pub type Model<'ctx> = BTreeMap<String, AstNode<'ctx>>;

pub struct WrappedSolver<'ctx> {
    solver: Solver<'ctx>,
}

impl<'ctx> WrappedSolver<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self {
            solver: Solver::new(context),
        }
    }

    /// Checks the conjunction of `constraints` and, if satisfiable, evaluates
    /// `vars` in the model. Assertions do not persist between calls.
    pub fn check<'a>(
        &self,
        constraints: &[ast::Bool<'ctx>],
        vars: impl IntoIterator<Item = (&'a str, &'a AstNode<'ctx>)>,
    ) -> SolveResult<Model<'ctx>>
    where
        'ctx: 'a,
    {
        log_debug!("Sending constraints to Z3: {:#?}", constraints);

        self.solver.push();

        for constraint in constraints {
            self.solver.assert(constraint);
        }

        let result = match self.solver.check() {
            SatResult::Sat => match self.solver.get_model() {
                Some(model) => SolveResult::Sat(
                    vars.into_iter()
                        .filter_map(|(name, node)| {
                            let value = match node {
                                AstNode::Bool(ast) => model.eval(ast, true).map(AstNode::Bool),
                                AstNode::BitVector(ast) => {
                                    model.eval(ast, true).map(AstNode::BitVector)
                                }
                            };
                            value.map(|value| (name.to_owned(), value))
                        })
                        .collect(),
                ),
                None => SolveResult::Unknown,
            },
            SatResult::Unsat => SolveResult::Unsat,
            SatResult::Unknown => SolveResult::Unknown,
        };

        self.solver.pop(1);
        result
    }
}

pub fn set_global_params<K: AsRef<str>, V: AsRef<str>>(params: impl Iterator<Item = (K, V)>) {
    for (k, v) in params {
        log_debug!("Setting global param: {} = {}", k.as_ref(), v.as_ref());
        z3::set_global_param(k.as_ref(), v.as_ref());
    }
}
