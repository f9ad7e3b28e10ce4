use std::collections::{BTreeMap, HashSet, btree_map::Entry};

use common::log_trace;

use crate::{
    error::{Result, TranslateError},
    ops::OpKind,
    sink::ExprSink,
    sort::Sort,
    source::SourceExpr,
};

const TAG: &str = "symbols";

#[derive(Debug, Clone)]
pub struct Symbol<E> {
    pub sort: Sort,
    pub expr: E,
}

/// Free variables of a formula, mapped to their counterparts in the target.
/// Ordered by name.
#[derive(Debug, Clone)]
pub struct SymbolTable<E> {
    entries: BTreeMap<String, Symbol<E>>,
}

impl<E> Default for SymbolTable<E> {
    fn default() -> Self {
        Self {
            entries: Default::default(),
        }
    }
}

impl<E: Clone> SymbolTable<E> {
    /// Collects every free variable reachable from `root` and creates one
    /// target variable per name.
    ///
    /// Each distinct node is visited once. A name seen again with another sort
    /// is reported as malformed.
    pub fn build<S, K>(root: &S, sink: &mut K) -> Result<Self>
    where
        S: SourceExpr,
        K: ExprSink<Expr = E>,
    {
        let mut table = Self::default();
        let mut visited = HashSet::new();
        let mut stack = vec![root.clone()];

        while let Some(node) = stack.pop() {
            if !visited.insert(node.id()) {
                continue;
            }

            if let Some((name, sort)) = node.variable() {
                table.register(&node, name, sort, sink)?;
                continue;
            }

            // Reversed, so that nodes are visited in operand order.
            let mut children = node.children();
            children.reverse();
            stack.extend(children);
        }

        Ok(table)
    }

    fn register<S: SourceExpr, K: ExprSink<Expr = E>>(
        &mut self,
        node: &S,
        name: String,
        sort: Sort,
        sink: &mut K,
    ) -> Result<()> {
        match self.entries.entry(name) {
            Entry::Occupied(entry) if entry.get().sort != sort => {
                Err(TranslateError::MalformedExpression {
                    kind: OpKind::Uninterpreted,
                    reason: format!(
                        "`{}` is declared as both {} and {sort}",
                        entry.key(),
                        entry.get().sort,
                    ),
                    form: node.to_string(),
                })
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(entry) => {
                log_trace!(target: TAG, "New variable `{}`: {}", entry.key(), sort);
                let expr = sink.variable(entry.key(), sort);
                entry.insert(Symbol { sort, expr });
                Ok(())
            }
        }
    }
}

impl<E> SymbolTable<E> {
    pub fn get(&self, name: &str) -> Option<&Symbol<E>> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol<E>)> {
        self.entries.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }
}
