//! Expression evaluation.

use kiln_ir::{BinaryOp, Expr, ExprKind, PropertyInit, Span, TypeId, UnaryOp};
use tracing::trace;

use super::{display, operators, Interpreter};
use crate::errors;
use crate::rt::{array_length, objects_equal, EvalResult, Object, Pointer};
use crate::stack::ensure_sufficient_stack;

impl Interpreter<'_> {
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Null => Ok(self.alloc.new_null(span)),
            ExprKind::Bool(value) => Ok(self.alloc.new_bool(span, *value)),
            ExprKind::Number(value) => Ok(self.alloc.new_number(span, *value)),
            ExprKind::String(value) => Ok(self.alloc.new_string(span, value)),
            ExprKind::Array { size, elements } => {
                self.eval_array(expr, size.as_deref(), elements.as_deref())
            }
            ExprKind::Object { properties } => self.eval_object(span, expr.ty, properties),
            ExprKind::LoadLocation { object, symbol } => Ok(self
                .eval_load_location(span, object.as_deref(), *symbol, false)?
                .value()),
            ExprKind::LoadDynamic { object, name } => {
                Ok(self.eval_load_dynamic(span, object, name, false)?.value())
            }
            ExprKind::New { args } => self.eval_new(span, expr.ty, args),
            ExprKind::Invoke { function, args } => {
                let callee = self.eval_expr(function)?;
                self.check_this(function.span, &callee)?;
                let stub = callee.function_value().clone();
                let args = self.eval_args(args)?;
                let returned = self.eval_call(span, stub.function, stub.this, args)?;
                Ok(returned.unwrap_or_else(Object::null))
            }
            ExprKind::Unary {
                op,
                operand,
                postfix,
            } => self.eval_unary(expr, *op, operand, *postfix),
            ExprKind::Binary { op, left, right } => self.eval_binary(span, *op, left, right),
            ExprKind::Cast(operand) => {
                let value = self.eval_expr(operand)?;
                if self.program.can_convert(value.ty(), expr.ty) {
                    Ok(value)
                } else {
                    let from = self.program.type_token(value.ty());
                    let to = self.program.type_token(expr.ty);
                    Err(self.throw_message(span, &errors::invalid_cast(&from, &to)))
                }
            }
            ExprKind::IsInst { expr: operand, target } => {
                let value = self.eval_expr(operand)?;
                let is = if value.is_null() {
                    *target == TypeId::NULL
                } else {
                    self.program.can_convert(value.ty(), *target)
                };
                Ok(self.alloc.new_bool(span, is))
            }
            ExprKind::TypeOf(operand) => {
                let value = self.eval_expr(operand)?;
                let token = self.program.type_token(value.ty());
                Ok(self.alloc.new_string(span, &token))
            }
            ExprKind::Conditional {
                condition,
                consequent,
                alternate,
            } => {
                if self.eval_expr(condition)?.bool_value() {
                    self.eval_expr(consequent)
                } else {
                    self.eval_expr(alternate)
                }
            }
            ExprKind::Sequence(exprs) => {
                let Some((last, init)) = exprs.split_last() else {
                    panic!("empty sequence expression");
                };
                for expr in init {
                    self.eval_for_effect(expr)?;
                }
                self.eval_expr(last)
            }
        }
    }

    /// `new T[size] { elements }`.
    ///
    /// The size, when given, is checked before any element is evaluated;
    /// missing trailing elements are null.
    fn eval_array(
        &mut self,
        expr: &Expr,
        size: Option<&Expr>,
        elements: Option<&[Expr]>,
    ) -> EvalResult {
        let given = elements.map_or(0, <[Expr]>::len);
        let len = match size {
            Some(size) => {
                let requested = self.eval_expr(size)?.number_value();
                let Some(requested) = array_length(requested) else {
                    return Err(self.throw_message(
                        size.span,
                        &errors::invalid_array_size(requested),
                    ));
                };
                if given > requested {
                    return Err(self.throw_message(
                        expr.span,
                        &errors::too_many_array_elements(requested, given),
                    ));
                }
                requested
            }
            None => given,
        };

        let cells = (0..len)
            .map(|_| Pointer::new(Object::null(), false))
            .collect();
        let array = self.alloc.new_array(expr.span, expr.ty, cells);
        for (index, element) in elements.unwrap_or_default().iter().enumerate() {
            let value = self.eval_expr(element)?;
            if let Some(hooks) = &self.hooks {
                hooks.on_variable_assign(
                    element.span,
                    Some(&array),
                    &index.to_string(),
                    None,
                    &value,
                );
            }
            array.array_value().borrow()[index].set(value);
        }
        Ok(array)
    }

    fn eval_object(&mut self, span: Span, ty: TypeId, properties: &[PropertyInit]) -> EvalResult {
        let obj = self.new_object(span, ty);
        for property in properties {
            let value = self.eval_expr(&property.value)?;
            let Some(cell) = obj.property_addr(&property.name, true, true) else {
                unreachable!("property cells are created on demand");
            };
            if let Some(hooks) = &self.hooks {
                let old = cell.obj();
                hooks.on_variable_assign(property.span, Some(&obj), &property.name, Some(&old), &value);
            }
            cell.set(value);
        }
        self.freeze_readonly_properties(&obj);
        Ok(obj)
    }

    /// Allocate an instance and run its constructor, if it declares one.
    fn eval_new(&mut self, span: Span, ty: TypeId, args: &[Expr]) -> EvalResult {
        let obj = self.new_object(span, ty);
        match self.program.constructor(ty) {
            Some(ctor) => {
                let args = self.eval_args(args)?;
                self.eval_call(span, ctor, Some(obj.clone()), args)?;
            }
            None => assert!(
                args.is_empty(),
                "arguments passed to {}, which has no constructor",
                self.program.type_token(ty)
            ),
        }
        self.freeze_readonly_properties(&obj);
        Ok(obj)
    }

    fn eval_unary(&mut self, expr: &Expr, op: UnaryOp, operand: &Expr, postfix: bool) -> EvalResult {
        let span = expr.span;
        match op {
            UnaryOp::AddressOf => {
                let location = self.eval_lvalue(operand)?;
                Ok(self
                    .alloc
                    .new_pointer(span, expr.ty, location.cell().clone()))
            }
            UnaryOp::Dereference => {
                let pointer = self.eval_expr(operand)?;
                self.check_this(operand.span, &pointer)?;
                Ok(pointer.pointer_value().obj())
            }
            UnaryOp::Increment | UnaryOp::Decrement => {
                let location = self.eval_lvalue(operand)?;
                let old = location.value();
                let delta = if op == UnaryOp::Increment { 1.0 } else { -1.0 };
                let new = self.alloc.new_number(span, old.number_value() + delta);
                location.assign(self, operand.span, new.clone());
                Ok(if postfix { old } else { new })
            }
            UnaryOp::Plus => {
                let value = self.eval_expr(operand)?.number_value();
                Ok(self.alloc.new_number(span, value))
            }
            UnaryOp::Minus => {
                let value = self.eval_expr(operand)?.number_value();
                Ok(self.alloc.new_number(span, -value))
            }
            UnaryOp::Not => {
                let value = self.eval_expr(operand)?.bool_value();
                Ok(self.alloc.new_bool(span, !value))
            }
            UnaryOp::BitNot => {
                let value = self.eval_expr(operand)?.number_value();
                Ok(self.alloc.new_number(span, operators::bit_not(value)))
            }
        }
    }

    fn eval_binary(&mut self, span: Span, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        if op.is_assignment() {
            let location = self.eval_lvalue(left)?;
            let rhs = self.eval_expr(right)?;
            let value = match op.compound_operator() {
                Some(arith) => self.apply_binary(span, arith, &location.value(), &rhs),
                None => rhs,
            };
            location.assign(self, left.span, value.clone());
            return Ok(value);
        }

        match op {
            BinaryOp::And | BinaryOp::Or => {
                let lhs = self.eval_expr(left)?.bool_value();
                if lhs == (op == BinaryOp::Or) {
                    trace!(?op, "short-circuit");
                    return Ok(self.alloc.new_bool(span, lhs));
                }
                let rhs = self.eval_expr(right)?.bool_value();
                Ok(self.alloc.new_bool(span, rhs))
            }
            _ => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                Ok(self.apply_binary(span, op, &lhs, &rhs))
            }
        }
    }

    /// Apply a non-assigning, non-logical operator to evaluated operands.
    fn apply_binary(&self, span: Span, op: BinaryOp, lhs: &Object, rhs: &Object) -> Object {
        match op {
            BinaryOp::Add if lhs.as_str().is_some() || rhs.as_str().is_some() => {
                let mut text = display(self.program, lhs);
                text.push_str(&display(self.program, rhs));
                self.alloc.new_string(span, &text)
            }
            BinaryOp::Eq => self.alloc.new_bool(span, objects_equal(lhs, rhs)),
            BinaryOp::NotEq => self.alloc.new_bool(span, !objects_equal(lhs, rhs)),
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                let result = operators::compare(op, lhs.number_value(), rhs.number_value());
                self.alloc.new_bool(span, result)
            }
            _ => {
                let result = operators::arithmetic(op, lhs.number_value(), rhs.number_value());
                self.alloc.new_number(span, result)
            }
        }
    }
}
