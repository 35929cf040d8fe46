//! Function invocation.

use kiln_ir::{FunctionBody, FunctionId, FunctionOwner, Name, Span};
use tracing::trace;

use super::{BindingContext, Interpreter};
use crate::errors;
use crate::hooks::LeaveGuard;
use crate::intrinsics::IntrinsicCall;
use crate::rt::{Object, Pointer, Unwind};

impl Interpreter<'_> {
    /// Call `function` with already evaluated arguments.
    ///
    /// Instance methods need a non-null receiver; a null one faults with
    /// the null-reference exception before the call starts. The callee
    /// runs in a fresh activation frame holding `this`, `super`, and its
    /// parameters. Returns the returned value, `None` for void functions.
    ///
    /// # Panics
    /// Panics on a receiver or argument count the binder should have
    /// rejected, or if `break`/`continue` escapes the body.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn eval_call(
        &mut self,
        caller: Span,
        function: FunctionId,
        this: Option<Object>,
        args: Vec<Object>,
    ) -> Result<Option<Object>, Unwind> {
        let program = self.program;
        let decl = program.function(function);
        trace!(
            function = %program.function_token(function),
            has_this = this.is_some(),
            argc = args.len(),
            "call"
        );

        let (context, receiver_locals) = match decl.owner {
            FunctionOwner::Module(module) => {
                assert!(this.is_none(), "module function called with a receiver");
                (BindingContext { module, class: None }, None)
            }
            FunctionOwner::Class(class) => {
                let owner = program.class(class);
                let context = BindingContext {
                    module: owner.module,
                    class: Some(class),
                };
                if decl.is_static {
                    assert!(this.is_none(), "static method called with a receiver");
                    (context, None)
                } else {
                    let Some(receiver) = &this else {
                        panic!(
                            "instance method {} called without a receiver",
                            program.function_token(function)
                        );
                    };
                    self.check_this(caller, receiver)?;
                    (context, Some((owner.this_local, owner.super_local)))
                }
            }
        };
        assert_eq!(
            args.len(),
            decl.params.len(),
            "argument count mismatch in call to {}",
            program.function_token(function)
        );

        if let Some(max) = self.config.max_call_depth {
            if self.call_depth >= max {
                return Err(self.throw_message(caller, &errors::call_depth_exceeded(max)));
            }
        }

        let mut scoped = self.framed(function, caller, context);
        let _leave = LeaveGuard::new(
            scoped
                .hooks
                .as_ref()
                .and_then(|hooks| hooks.on_enter_function(program, function)),
        );

        if let (Some((this_local, super_local)), Some(receiver)) = (receiver_locals, &this) {
            scoped
                .locals
                .declare(this_local, Pointer::new(receiver.clone(), true));
            scoped
                .locals
                .declare(super_local, Pointer::new(receiver.clone(), true));
        }
        for (&param, arg) in decl.params.iter().zip(&args) {
            assert!(
                program.can_convert(arg.ty(), program.local(param).ty),
                "argument for {} of {} has an incompatible type",
                program.local(param).name,
                program.function_token(function)
            );
            scoped.locals.declare(param, Pointer::new(arg.clone(), false));
        }

        let returned = match &decl.body {
            FunctionBody::Block(body) => match scoped.exec_block(body) {
                Ok(()) => None,
                Err(Unwind::Return(value)) => value,
                Err(unwind @ Unwind::Throw(_)) => {
                    trace!(function = %program.function_token(function), "unhandled exception");
                    return Err(unwind);
                }
                Err(unwind) => panic!(
                    "{} escaped the body of {}",
                    unwind.kind_name(),
                    program.function_token(function)
                ),
            },
            FunctionBody::Intrinsic(token) => {
                scoped.invoke_intrinsic(caller, token, this.as_ref(), &args)?
            }
            FunctionBody::Abstract => panic!(
                "called abstract function {}",
                program.function_token(function)
            ),
        };

        assert_eq!(
            decl.ret.is_some(),
            returned.is_some(),
            "return value of {} does not match its declaration",
            program.function_token(function)
        );
        if let (Some(ret), Some(value)) = (decl.ret, &returned) {
            assert!(
                program.can_convert(value.ty(), ret),
                "{} returned a value of an incompatible type",
                program.function_token(function)
            );
        }
        Ok(returned)
    }

    fn invoke_intrinsic(
        &mut self,
        span: Span,
        token: &Name,
        this: Option<&Object>,
        args: &[Object],
    ) -> Result<Option<Object>, Unwind> {
        let Some(intrinsic) = self.intrinsics.get(token) else {
            panic!("no intrinsic registered for '{token}'");
        };
        trace!(%token, "invoking intrinsic");
        intrinsic(self, IntrinsicCall { span, this, args })
    }
}
