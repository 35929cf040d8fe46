use kiln_ir::{Name, ProgramBuilder, TypeId};
use pretty_assertions::assert_eq;

use super::{details, display, format_number};
use crate::rt::{Object, ObjectValue, Pointer};

fn number(n: f64) -> Object {
    Object::new(TypeId::NUMBER, ObjectValue::Number(n), None)
}

fn string(s: &str) -> Object {
    Object::new(TypeId::STRING, ObjectValue::String(s.into()), None)
}

#[test]
fn numbers() {
    assert_eq!(format_number(1.0), "1");
    assert_eq!(format_number(-42.0), "-42");
    assert_eq!(format_number(2.5), "2.5");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::INFINITY), "Infinity");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn primitives_and_arrays() {
    let program = ProgramBuilder::new("fmt").finish();
    assert_eq!(display(&program, &Object::null()), "null");
    assert_eq!(
        display(
            &program,
            &Object::new(TypeId::BOOL, ObjectValue::Bool(true), None)
        ),
        "true"
    );
    assert_eq!(display(&program, &string("hi")), "hi");

    let array = Object::new(
        TypeId::DYNAMIC_ARRAY,
        ObjectValue::Array(
            vec![
                Pointer::new(number(1.0), false),
                Pointer::new(string("two"), false),
                Pointer::new(Object::null(), false),
            ]
            .into(),
        ),
        None,
    );
    assert_eq!(display(&program, &array), "[1, two, null]");
}

#[test]
fn plain_objects_show_their_type() {
    let mut builder = ProgramBuilder::new("fmt");
    let module = builder.module("shapes");
    let class = builder.class(module, "Point");
    let ty = builder.class_type(class);
    let program = builder.finish();

    let obj = Object::new(ty, ObjectValue::None, None);
    assert_eq!(display(&program, &obj), "[object shapes:Point]");
}

#[test]
fn details_lists_own_properties() {
    let mut builder = ProgramBuilder::new("fmt");
    let module = builder.module("shapes");
    let class = builder.class(module, "Point");
    let ty = builder.class_type(class);
    let program = builder.finish();

    let obj = Object::new(ty, ObjectValue::None, None);
    obj.properties().init_addr(Name::new("x"), number(3.0), false);
    obj.properties().init_addr(Name::new("label"), string("origin"), false);
    assert_eq!(
        details(&program, &obj, "\t"),
        "shapes:Point\n\tx = 3\n\tlabel = origin"
    );
    assert_eq!(details(&program, &number(7.0), "\t"), "number: 7");
}

#[test]
fn self_containing_arrays_elide_the_repeat() {
    let program = ProgramBuilder::new("fmt").finish();
    let inner = Object::new(
        TypeId::DYNAMIC_ARRAY,
        ObjectValue::Array(
            vec![
                Pointer::new(number(1.0), false),
                Pointer::new(Object::null(), false),
            ]
            .into(),
        ),
        None,
    );
    assert!(inner.array_value().borrow()[1].set(inner.clone()));
    assert_eq!(display(&program, &inner), "[1, [...]]");

    // Siblings are not cycles; only the path being rendered is.
    let outer = Object::new(
        TypeId::DYNAMIC_ARRAY,
        ObjectValue::Array(
            vec![
                Pointer::new(inner.clone(), false),
                Pointer::new(inner.clone(), false),
            ]
            .into(),
        ),
        None,
    );
    assert_eq!(display(&program, &outer), "[[1, [...]], [1, [...]]]");
}
