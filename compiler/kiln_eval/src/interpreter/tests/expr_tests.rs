use std::rc::Rc;

use kiln_ir::{
    BinaryOp, CatchClause, Expr, ExprKind, Name, PropertyInit, Span, StmtKind, Symbol, TypeId,
    UnaryOp,
};
use pretty_assertions::assert_eq;

use super::{let_const, single};
use crate::interpreter::InterpreterBuilder;
use crate::test_helpers::{
    assign, binary, block, boolean, declare, eval, expr, index, local, new_object, null, num, ret,
    stmt, string, unary, Harness, RecordingHooks,
};

fn array(ty: TypeId, size: Option<Expr>, elements: Option<Vec<Expr>>) -> Expr {
    expr(
        ExprKind::Array {
            size: size.map(Box::new),
            elements,
        },
        ty,
    )
}

/// `"" + parts[0] + "," + parts[1] + "," ...`, each part followed by a comma.
fn join(parts: Vec<Expr>) -> Expr {
    parts.into_iter().fold(string(""), |acc, part| {
        let acc = binary(BinaryOp::Add, acc, part, TypeId::STRING);
        binary(BinaryOp::Add, acc, string(","), TypeId::STRING)
    })
}

/// `try { body } catch (e: string) { return e; }`
fn catch_message(e: kiln_ir::LocalId, body: Vec<kiln_ir::Stmt>) -> kiln_ir::Stmt {
    stmt(StmtKind::Try {
        body: block(body),
        catches: vec![CatchClause {
            exception: e,
            body: block(vec![ret(local(e, TypeId::STRING))]),
        }],
        finally: None,
    })
}

#[test]
fn plus_concatenates_when_either_side_is_a_string() {
    let (program, f) = single(TypeId::STRING, |_, _| {
        vec![ret(binary(
            BinaryOp::Add,
            string("a"),
            num(1.0),
            TypeId::STRING,
        ))]
    });
    assert_eq!(Harness::new(&program).run_display(f), "a1");

    let (program, f) = single(TypeId::STRING, |_, _| {
        vec![ret(binary(
            BinaryOp::Add,
            num(1.5),
            binary(BinaryOp::Add, string("x"), boolean(true), TypeId::STRING),
            TypeId::STRING,
        ))]
    });
    assert_eq!(Harness::new(&program).run_display(f), "1.5xtrue");
}

#[test]
fn logical_operators_short_circuit() {
    let (program, f) = single(TypeId::BOOL, |b, _| {
        let x = b.local("x", TypeId::BOOL);
        let y = b.local("y", TypeId::BOOL);
        vec![
            declare(x),
            declare(y),
            eval(binary(
                BinaryOp::And,
                boolean(false),
                assign(local(x, TypeId::BOOL), boolean(true)),
                TypeId::BOOL,
            )),
            eval(binary(
                BinaryOp::Or,
                boolean(true),
                assign(local(x, TypeId::BOOL), boolean(true)),
                TypeId::BOOL,
            )),
            ret(binary(
                BinaryOp::And,
                boolean(true),
                assign(local(y, TypeId::BOOL), boolean(false)),
                TypeId::BOOL,
            )),
        ]
    });
    let hooks = Rc::new(RecordingHooks::default());
    let mut h = Harness::with(InterpreterBuilder::new(&program).hooks(hooks.clone()));
    assert_eq!(h.run_display(f), "false");

    let assigns: Vec<String> = hooks
        .events()
        .into_iter()
        .filter(|event| event.starts_with("assign"))
        .collect();
    assert_eq!(assigns, vec!["assign var y = Bool(false)".to_owned()]);
}

#[test]
fn increments_and_compound_assignments() {
    let (program, f) = single(TypeId::NUMBER, |b, _| {
        let x = b.local("x", TypeId::NUMBER);
        let y = b.local("y", TypeId::NUMBER);
        let z = b.local("z", TypeId::NUMBER);
        let n = |id| local(id, TypeId::NUMBER);
        vec![
            let_const(x, 1.0),
            declare(y),
            declare(z),
            eval(assign(
                n(y),
                unary(UnaryOp::Increment, n(x), true, TypeId::NUMBER),
            )),
            eval(assign(
                n(z),
                unary(UnaryOp::Increment, n(x), false, TypeId::NUMBER),
            )),
            ret(binary(
                BinaryOp::Add,
                binary(
                    BinaryOp::Add,
                    binary(BinaryOp::Mul, n(y), num(100.0), TypeId::NUMBER),
                    binary(BinaryOp::Mul, n(z), num(10.0), TypeId::NUMBER),
                    TypeId::NUMBER,
                ),
                n(x),
                TypeId::NUMBER,
            )),
        ]
    });
    assert_eq!(Harness::new(&program).run_number(f), 133.0);

    let (program, f) = single(TypeId::NUMBER, |b, _| {
        let x = b.local("x", TypeId::NUMBER);
        let n = || local(x, TypeId::NUMBER);
        let update = |op, rhs| eval(binary(op, n(), num(rhs), TypeId::NUMBER));
        vec![
            let_const(x, 7.0),
            update(BinaryOp::RemAssign, 4.0),
            update(BinaryOp::PowAssign, 2.0),
            update(BinaryOp::ShlAssign, 1.0),
            update(BinaryOp::SubAssign, 3.0),
            ret(n()),
        ]
    });
    assert_eq!(Harness::new(&program).run_number(f), 15.0);
}

#[test]
fn pointers_alias_their_cell() {
    let (program, f) = single(TypeId::NUMBER, |b, _| {
        let ptr_ty = b.pointer_type(TypeId::NUMBER);
        let x = b.local("x", TypeId::NUMBER);
        let p = b.local("p", ptr_ty);
        vec![
            let_const(x, 1.0),
            declare(p),
            eval(assign(
                local(p, ptr_ty),
                unary(UnaryOp::AddressOf, local(x, TypeId::NUMBER), false, ptr_ty),
            )),
            eval(assign(
                unary(UnaryOp::Dereference, local(p, ptr_ty), false, TypeId::NUMBER),
                num(5.0),
            )),
            ret(binary(
                BinaryOp::Add,
                local(x, TypeId::NUMBER),
                unary(UnaryOp::Dereference, local(p, ptr_ty), false, TypeId::NUMBER),
                TypeId::NUMBER,
            )),
        ]
    });
    assert_eq!(Harness::new(&program).run_number(f), 10.0);
}

#[test]
fn writing_past_the_end_grows_an_array() {
    let (program, f) = single(TypeId::DYNAMIC, |b, _| {
        let a = b.local("a", TypeId::DYNAMIC_ARRAY);
        vec![
            declare(a),
            eval(assign(
                local(a, TypeId::DYNAMIC_ARRAY),
                array(TypeId::DYNAMIC_ARRAY, Some(num(2.0)), Some(vec![num(7.0)])),
            )),
            eval(assign(index(local(a, TypeId::DYNAMIC_ARRAY), num(4.0)), num(1.0))),
            ret(local(a, TypeId::DYNAMIC_ARRAY)),
        ]
    });
    assert_eq!(
        Harness::new(&program).run_display(f),
        "[7, null, null, null, 1]"
    );
}

fn infinity() -> Expr {
    binary(BinaryOp::Div, num(1.0), num(0.0), TypeId::NUMBER)
}

fn one_element_array() -> Expr {
    array(TypeId::DYNAMIC_ARRAY, None, Some(vec![num(1.0)]))
}

#[test]
fn array_faults_are_catchable() {
    let cases = [
        (
            index(one_element_array(), num(-1.0)),
            "Array index -1 is out of range (must be in 0..16777216)",
        ),
        (
            index(one_element_array(), infinity()),
            "Array index Infinity is out of range (must be in 0..16777216)",
        ),
        (
            index(one_element_array(), num(16_777_216.0)),
            "Array index 16777216 is out of range (must be in 0..16777216)",
        ),
        (
            array(TypeId::DYNAMIC_ARRAY, Some(num(-2.0)), None),
            "Invalid array size -2 (must be in 0..=16777216)",
        ),
        (
            array(TypeId::DYNAMIC_ARRAY, Some(infinity()), None),
            "Invalid array size Infinity (must be in 0..=16777216)",
        ),
        (
            array(TypeId::DYNAMIC_ARRAY, Some(num(1e12)), None),
            "Invalid array size 1000000000000 (must be in 0..=16777216)",
        ),
        (
            array(
                TypeId::DYNAMIC_ARRAY,
                Some(num(1.0)),
                Some(vec![num(1.0), num(2.0)]),
            ),
            "Invalid number of array elements; expected <=1, got 2",
        ),
    ];
    for (faulting, message) in cases {
        let (program, f) = single(TypeId::STRING, |b, _| {
            let e = b.local("e", TypeId::STRING);
            vec![
                catch_message(e, vec![eval(faulting)]),
                ret(string("unreachable")),
            ]
        });
        assert_eq!(Harness::new(&program).run_display(f), message);
    }
}

#[test]
fn storing_through_a_null_pointer_is_catchable() {
    let (program, f) = single(TypeId::STRING, |b, _| {
        let ptr_ty = b.pointer_type(TypeId::NUMBER);
        let p = b.local("p", ptr_ty);
        let e = b.local("e", TypeId::STRING);
        vec![
            declare(p),
            catch_message(
                e,
                vec![eval(assign(
                    unary(UnaryOp::Dereference, local(p, ptr_ty), false, TypeId::NUMBER),
                    num(5.0),
                ))],
            ),
            ret(string("unreachable")),
        ]
    });
    assert_eq!(
        Harness::new(&program).run_display(f),
        "Target object is null"
    );
}

#[test]
fn self_containing_array_concatenates() {
    let (program, f) = single(TypeId::STRING, |b, _| {
        let a = b.local("a", TypeId::DYNAMIC_ARRAY);
        let a_ref = || local(a, TypeId::DYNAMIC_ARRAY);
        vec![
            declare(a),
            eval(assign(
                a_ref(),
                array(TypeId::DYNAMIC_ARRAY, Some(num(1.0)), None),
            )),
            eval(assign(index(a_ref(), num(0.0)), a_ref())),
            ret(binary(BinaryOp::Add, string("a="), a_ref(), TypeId::STRING)),
        ]
    });
    assert_eq!(Harness::new(&program).run_display(f), "a=[[...]]");
}

#[test]
fn object_literals_and_dynamic_keys() {
    let (program, f) = single(TypeId::STRING, |b, _| {
        let id = b.local("o", TypeId::DYNAMIC);
        let literal = expr(
            ExprKind::Object {
                properties: vec![
                    PropertyInit {
                        name: Name::new("k"),
                        value: num(5.0),
                        span: Span::DUMMY,
                    },
                    PropertyInit {
                        name: Name::new("1"),
                        value: string("one"),
                        span: Span::DUMMY,
                    },
                ],
            },
            TypeId::DYNAMIC,
        );
        let o = || local(id, TypeId::DYNAMIC);
        let concat = |l, r| binary(BinaryOp::Add, l, r, TypeId::STRING);
        vec![
            declare(id),
            eval(assign(o(), literal)),
            ret(concat(
                concat(index(o(), string("k")), index(o(), num(1.0))),
                index(o(), string("missing")),
            )),
        ]
    });
    assert_eq!(Harness::new(&program).run_display(f), "5onenull");
}

#[test]
fn equality_rule() {
    let (program, f) = single(TypeId::STRING, |b, _| {
        let p = b.local("p", TypeId::DYNAMIC);
        let eq = |l, r| binary(BinaryOp::Eq, l, r, TypeId::BOOL);
        let obj = || expr(ExprKind::Object { properties: Vec::new() }, TypeId::DYNAMIC);
        vec![
            declare(p),
            eval(assign(local(p, TypeId::DYNAMIC), obj())),
            ret(join(vec![
                eq(null(), null()),
                eq(string("a"), string("a")),
                eq(num(1.0), num(1.0)),
                eq(obj(), obj()),
                eq(local(p, TypeId::DYNAMIC), local(p, TypeId::DYNAMIC)),
                binary(BinaryOp::NotEq, num(1.0), string("1"), TypeId::BOOL),
            ])),
        ]
    });
    assert_eq!(
        Harness::new(&program).run_display(f),
        "true,true,true,false,true,true,"
    );
}

#[test]
fn cast_isinst_and_typeof() {
    let (program, f) = single(TypeId::STRING, |b, m| {
        let animal = b.class(m, "Animal");
        let dog = b.class(m, "Dog");
        b.set_extends(dog, animal);
        let animal_ty = b.class_type(animal);
        let dog_ty = b.class_type(dog);
        let is = |value: Expr, target| {
            expr(
                ExprKind::IsInst {
                    expr: Box::new(value),
                    target,
                },
                TypeId::BOOL,
            )
        };
        let type_of = |value: Expr| expr(ExprKind::TypeOf(Box::new(value)), TypeId::STRING);
        let summary = join(vec![
            is(new_object(dog_ty, Vec::new()), animal_ty),
            is(new_object(animal_ty, Vec::new()), dog_ty),
            is(null(), animal_ty),
            is(null(), TypeId::NULL),
            type_of(expr(
                ExprKind::Cast(Box::new(new_object(dog_ty, Vec::new()))),
                animal_ty,
            )),
            type_of(num(1.0)),
        ]);
        vec![ret(summary)]
    });
    assert_eq!(
        Harness::new(&program).run_display(f),
        "true,false,false,true,main:Dog,number,"
    );
}

#[test]
fn failed_cast_throws() {
    let (program, f) = single(TypeId::STRING, |b, _| {
        let e = b.local("e", TypeId::STRING);
        vec![
            catch_message(
                e,
                vec![eval(expr(
                    ExprKind::Cast(Box::new(num(1.0))),
                    TypeId::STRING,
                ))],
            ),
            ret(string("no fault")),
        ]
    });
    assert_eq!(
        Harness::new(&program).run_display(f),
        "Cannot cast object of type 'number' to 'string'"
    );
}

#[test]
fn conditional_and_sequence() {
    let (program, f) = single(TypeId::NUMBER, |b, _| {
        let x = b.local("x", TypeId::NUMBER);
        let sequence = expr(
            ExprKind::Sequence(vec![
                assign(local(x, TypeId::NUMBER), num(4.0)),
                binary(
                    BinaryOp::Mul,
                    local(x, TypeId::NUMBER),
                    num(2.0),
                    TypeId::NUMBER,
                ),
            ]),
            TypeId::NUMBER,
        );
        let conditional = expr(
            ExprKind::Conditional {
                condition: Box::new(boolean(false)),
                consequent: Box::new(num(1.0)),
                alternate: Box::new(sequence),
            },
            TypeId::NUMBER,
        );
        vec![declare(x), ret(conditional)]
    });
    assert_eq!(Harness::new(&program).run_number(f), 8.0);
}

#[test]
fn unary_arithmetic() {
    let (program, f) = single(TypeId::STRING, |_, _| {
        vec![ret(join(vec![
            unary(UnaryOp::Minus, num(3.0), false, TypeId::NUMBER),
            unary(UnaryOp::BitNot, num(0.0), false, TypeId::NUMBER),
            unary(UnaryOp::Not, boolean(true), false, TypeId::BOOL),
            unary(UnaryOp::Plus, num(2.0), false, TypeId::NUMBER),
        ]))]
    });
    assert_eq!(Harness::new(&program).run_display(f), "-3,-1,false,2,");
}

#[test]
fn member_symbols_resolve_by_name() {
    let (program, f) = single(TypeId::NUMBER, |b, m| {
        let point = b.class(m, "Point");
        let point_ty = b.class_type(point);
        let x = b.variable(
            kiln_ir::VariableDecl::new(
                kiln_ir::VariableOwner::Class(point),
                "x",
                TypeId::NUMBER,
            )
            .default_value(3.0),
        );
        let p = b.local("p", point_ty);
        let px = || {
            crate::test_helpers::member(local(p, point_ty), Symbol::Variable(x), TypeId::NUMBER)
        };
        vec![
            declare(p),
            eval(assign(local(p, point_ty), new_object(point_ty, Vec::new()))),
            eval(binary(BinaryOp::AddAssign, px(), num(1.0), TypeId::NUMBER)),
            ret(px()),
        ]
    });
    assert_eq!(Harness::new(&program).run_number(f), 4.0);
}
