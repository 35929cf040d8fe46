use super::*;
use pretty_assertions::assert_eq;

fn hierarchy() -> (Program, ClassId, ClassId, ClassId, ClassId) {
    let mut b = ProgramBuilder::new("test");
    let m = b.module("shapes");
    let drawable = b.interface(m, "Drawable");
    let shape = b.class(m, "Shape");
    let circle = b.class(m, "Circle");
    let other = b.class(m, "Other");
    b.add_implements(shape, drawable);
    b.set_extends(circle, shape);
    (b.finish(), drawable, shape, circle, other)
}

#[test]
fn top_types_accept_everything() {
    let (program, _, shape, _, _) = hierarchy();
    let shape_ty = program.class(shape).ty;
    for from in [TypeId::NUMBER, TypeId::STRING, shape_ty] {
        assert!(program.can_convert(from, TypeId::OBJECT));
        assert!(program.can_convert(from, TypeId::DYNAMIC));
    }
    assert!(program.can_convert(TypeId::DYNAMIC, shape_ty));
    assert!(program.can_convert(TypeId::NULL, shape_ty));
    assert!(!program.can_convert(TypeId::NUMBER, TypeId::STRING));
}

#[test]
fn classes_convert_along_extends_and_implements() {
    let (program, drawable, shape, circle, other) = hierarchy();
    let ty = |c: ClassId| program.class(c).ty;
    assert!(program.can_convert(ty(circle), ty(shape)));
    assert!(program.can_convert(ty(circle), ty(drawable)));
    assert!(program.can_convert(ty(shape), ty(drawable)));
    assert!(!program.can_convert(ty(shape), ty(circle)));
    assert!(!program.can_convert(ty(other), ty(drawable)));
}

#[test]
fn function_types_are_contravariant_in_parameters() {
    let mut b = ProgramBuilder::new("test");
    let m = b.module("m");
    let base = b.class(m, "Base");
    let derived = b.class(m, "Derived");
    b.set_extends(derived, base);
    let base_ty = b.class_type(base);
    let derived_ty = b.class_type(derived);
    let takes_base = b.function_type(vec![base_ty], Some(derived_ty));
    let takes_derived = b.function_type(vec![derived_ty], Some(base_ty));
    let program = b.finish();
    assert!(program.can_convert(takes_base, takes_derived));
    assert!(!program.can_convert(takes_derived, takes_base));
}

#[test]
fn tokens() {
    let mut b = ProgramBuilder::new("test");
    let m = b.module("geo");
    let point = b.class(m, "Point");
    let x = b.local("x", TypeId::NUMBER);
    let norm = b.function(
        FunctionDecl::new(FunctionOwner::Class(point), "norm", FunctionBody::Abstract)
            .params(vec![x])
            .returns(TypeId::NUMBER),
    );
    let numbers = b.array_type(TypeId::NUMBER);
    let point_ty = b.class_type(point);
    let program = b.finish();

    assert_eq!(program.type_token(point_ty), "geo:Point");
    assert_eq!(program.type_token(numbers), "number[]");
    assert_eq!(program.function_token(norm), "geo:Point.norm");
    assert_eq!(
        program.type_token(program.function(norm).ty),
        "(number)number"
    );
    assert_eq!(
        program.type_token(program.prototype_type(point_ty)),
        "prototype<geo:Point>"
    );
}

#[test]
fn builder_registers_members_in_order() {
    let mut b = ProgramBuilder::new("test");
    let m = b.module("m");
    let main = b.function(FunctionDecl::new(
        FunctionOwner::Module(m),
        "main",
        FunctionBody::Abstract,
    ));
    let counter = b.variable(VariableDecl::new(
        VariableOwner::Module(m),
        "counter",
        TypeId::NUMBER,
    ));
    let export = b.export(m, "entry", Symbol::Function(main));
    let init = b.module_initializer(m, Block::new(Vec::new(), Span::DUMMY));
    let program = b.finish();

    assert_eq!(
        program.module(m).members,
        vec![
            ModuleMember::Function(main),
            ModuleMember::Variable(counter),
            ModuleMember::Export(export),
        ]
    );
    assert_eq!(program.module(m).init, Some(init));
    assert_eq!(program.entry_point(m), Some(main));
    assert_eq!(
        program.resolve_export(Symbol::Export(export)),
        Symbol::Function(main)
    );
}

#[test]
fn constructor_is_found_among_own_members() {
    let mut b = ProgramBuilder::new("test");
    let m = b.module("m");
    let base = b.class(m, "Base");
    let derived = b.class(m, "Derived");
    b.set_extends(derived, base);
    let ctor = b.constructor(base, Vec::new(), Block::new(Vec::new(), Span::DUMMY));
    let program = b.finish();

    assert_eq!(program.constructor(program.class(base).ty), Some(ctor));
    assert_eq!(program.constructor(program.class(derived).ty), None);
    let super_local = program.class(derived).super_local;
    assert_eq!(program.local(super_local).ty, program.class(base).ty);
    assert_eq!(program.local(super_local).role, LocalRole::Super);
}
