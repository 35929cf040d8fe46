//! Statement execution.

use kiln_ir::{Block, CatchClause, Constant, Expr, LocalId, Name, Span, Stmt, StmtKind, SwitchCase};
use tracing::trace;

use super::Interpreter;
use crate::rt::{objects_equal, ExecResult, Object, Pointer, Unwind};
use crate::stack::ensure_sufficient_stack;

/// Whether a `break`/`continue` aimed at `target` stops at a loop labeled
/// `label`. Unlabeled jumps stop at the innermost loop.
fn targets_loop(target: Option<&Name>, label: Option<&Name>) -> bool {
    target.is_none() || target == label
}

impl Interpreter<'_> {
    /// Run `block` in a fresh lexical scope.
    pub(crate) fn exec_block(&mut self, block: &Block) -> ExecResult {
        let mut scoped = self.scoped();
        for stmt in &block.stmts {
            scoped.exec_stmt(stmt)?;
        }
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all, fields(kind = stmt.kind.name()))]
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> ExecResult {
        match &stmt.kind {
            StmtKind::Block(block) => self.exec_block(block),
            StmtKind::LocalVariable { local, default } => {
                self.exec_local(stmt.span, *local, default.as_ref());
                Ok(())
            }
            StmtKind::If {
                condition,
                consequent,
                alternate,
            } => {
                if self.eval_expr(condition)?.bool_value() {
                    self.exec_stmt(consequent)
                } else if let Some(alternate) = alternate {
                    self.exec_stmt(alternate)
                } else {
                    Ok(())
                }
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => self.exec_switch(discriminant, cases),
            StmtKind::Labeled { label, body } => {
                let result = match &body.kind {
                    StmtKind::While { condition, body } => {
                        self.exec_loop(condition.as_ref(), body, None, Some(label))
                    }
                    StmtKind::For {
                        init,
                        condition,
                        post,
                        body,
                    } => self.exec_for(
                        init.as_deref(),
                        condition.as_ref(),
                        post.as_deref(),
                        body,
                        Some(label),
                    ),
                    _ => self.exec_stmt(body),
                };
                match result {
                    Err(Unwind::Break(Some(target)) | Unwind::Continue(Some(target)))
                        if target == *label =>
                    {
                        trace!(%label, "jump absorbed by label");
                        Ok(())
                    }
                    other => other,
                }
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                Err(Unwind::Return(value))
            }
            StmtKind::Throw(expr) => {
                let thrown = self.eval_expr(expr)?;
                Err(Unwind::throw(thrown, stmt.span, self.stack.clone()))
            }
            StmtKind::Break(label) => Err(Unwind::Break(label.clone())),
            StmtKind::Continue(label) => Err(Unwind::Continue(label.clone())),
            StmtKind::While { condition, body } => {
                self.exec_loop(condition.as_ref(), body, None, None)
            }
            StmtKind::For {
                init,
                condition,
                post,
                body,
            } => self.exec_for(
                init.as_deref(),
                condition.as_ref(),
                post.as_deref(),
                body,
                None,
            ),
            StmtKind::Try {
                body,
                catches,
                finally,
            } => self.exec_try(body, catches, finally.as_ref()),
            StmtKind::Empty => Ok(()),
            StmtKind::Multi(stmts) => {
                for stmt in stmts {
                    self.exec_stmt(stmt)?;
                }
                Ok(())
            }
            StmtKind::Expression(expr) => self.eval_for_effect(expr),
        }
    }

    /// Declare `local` in the innermost scope. Each execution gets a fresh
    /// cell, so a declaration inside a loop starts over every iteration.
    fn exec_local(&mut self, span: Span, local: LocalId, default: Option<&Constant>) {
        let cell = self.locals.register(local);
        let Some(constant) = default else {
            return;
        };
        let value = self.alloc.new_constant(span, constant);
        if let Some(hooks) = &self.hooks {
            let name = &self.program.local(local).name;
            hooks.on_variable_assign(span, None, name, None, &value);
        }
        cell.set(value);
    }

    /// The discriminant is evaluated once. Clauses are tried in order: a
    /// case matches when its test equals the discriminant, `default`
    /// matches when reached. From the first match on, the remaining bodies
    /// run without testing until an unlabeled `break`.
    fn exec_switch(&mut self, discriminant: &Expr, cases: &[SwitchCase]) -> ExecResult {
        let value = self.eval_expr(discriminant)?;
        let mut scoped = self.scoped();
        let mut matched = false;
        for case in cases {
            if !matched {
                matched = match &case.test {
                    Some(test) => objects_equal(&value, &scoped.eval_expr(test)?),
                    None => true,
                };
            }
            if !matched {
                continue;
            }
            match scoped.exec_stmt(&case.body) {
                Ok(()) => {}
                Err(Unwind::Break(None)) => return Ok(()),
                Err(unwind) => return Err(unwind),
            }
        }
        Ok(())
    }

    /// Run a `while` or the loop part of a `for`.
    ///
    /// A missing condition is true. `continue` still runs `post` before
    /// the condition is re-tested.
    fn exec_loop(
        &mut self,
        condition: Option<&Expr>,
        body: &Stmt,
        post: Option<&Stmt>,
        label: Option<&Name>,
    ) -> ExecResult {
        loop {
            if let Some(condition) = condition {
                if !self.eval_expr(condition)?.bool_value() {
                    break;
                }
            }
            match self.exec_stmt(body) {
                Ok(()) => {}
                Err(Unwind::Break(target)) if targets_loop(target.as_ref(), label) => break,
                Err(Unwind::Continue(target)) if targets_loop(target.as_ref(), label) => {}
                Err(unwind) => return Err(unwind),
            }
            if let Some(post) = post {
                self.exec_stmt(post)?;
            }
        }
        Ok(())
    }

    fn exec_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        post: Option<&Stmt>,
        body: &Stmt,
        label: Option<&Name>,
    ) -> ExecResult {
        let mut scoped = self.scoped();
        if let Some(init) = init {
            scoped.exec_stmt(init)?;
        }
        scoped.exec_loop(condition, body, post, label)
    }

    /// The first catch clause whose declared type accepts the thrown value
    /// handles it. `finally` runs on every path; if it unwinds, that unwind
    /// replaces whatever the body or handler produced.
    fn exec_try(
        &mut self,
        body: &Block,
        catches: &[CatchClause],
        finally: Option<&Block>,
    ) -> ExecResult {
        let result = match self.exec_block(body) {
            Err(Unwind::Throw(exception)) => {
                match self.select_catch(catches, &exception.thrown) {
                    Some(clause) => {
                        trace!("exception caught");
                        let mut scoped = self.scoped();
                        scoped
                            .locals
                            .declare(clause.exception, Pointer::new(exception.thrown, false));
                        scoped.exec_block(&clause.body)
                    }
                    None => Err(Unwind::Throw(exception)),
                }
            }
            other => other,
        };

        if let Some(finally) = finally {
            self.exec_block(finally)?;
        }
        result
    }

    fn select_catch<'c>(&self, catches: &'c [CatchClause], thrown: &Object) -> Option<&'c CatchClause> {
        let program = self.program;
        catches
            .iter()
            .find(|clause| program.can_convert(thrown.ty(), program.local(clause.exception).ty))
    }
}
