//! Per-type prototype objects.
//!
//! A prototype holds the instance members of one type: methods as unbound
//! closures, variables as cells holding their defaults, nested classes as
//! their own prototypes. Instances fall back to it, and it falls back to
//! the prototype of the base type. Prototypes are mutable and shared, so a
//! change to one is visible through every instance that has not shadowed
//! the member.

use kiln_ir::{ClassMember, Span, TypeId};
use tracing::trace;

use super::Interpreter;
use crate::rt::Object;

impl Interpreter<'_> {
    /// The prototype of `ty`, built on first request and cached.
    ///
    /// The type's own members are always installed. Members of implemented
    /// interfaces, their bases, and the interfaces those implement are
    /// installed only where no member of that name is visible yet, so
    /// concrete members and earlier interfaces take precedence.
    pub fn get_prototype(&mut self, ty: TypeId) -> Object {
        if let Some(proto) = self.prototypes.get(&ty) {
            return proto.clone();
        }
        let program = self.program;
        trace!(ty = %program.type_token(ty), "building prototype");

        let base = program.base_type(ty).map(|base| self.get_prototype(base));
        let span = program
            .class_of(ty)
            .map_or(Span::DUMMY, |class| program.class(class).span);
        let proto = self
            .alloc
            .new_object(span, program.prototype_type(ty), base);
        // Cached before populating: a nested class may name its parent.
        self.prototypes.insert(ty, proto.clone());

        self.add_prototype_members(&proto, ty, true);
        if let Some(class) = program.class_of(ty) {
            for &interface in &program.class(class).implements {
                self.add_interface_members(&proto, interface);
            }
        }
        proto
    }

    fn add_prototype_members(&mut self, proto: &Object, ty: TypeId, must: bool) {
        let program = self.program;
        for &member in program.type_members(ty) {
            if program.member_is_static(member) {
                continue;
            }
            if !must && proto.has_property(program.member_name(member)) {
                continue;
            }
            self.init_property(proto.properties(), member);
        }
    }

    fn add_interface_members(&mut self, proto: &Object, interface: TypeId) {
        let program = self.program;
        self.add_prototype_members(proto, interface, false);
        if let Some(base) = program.base_type(interface) {
            self.add_interface_members(proto, base);
        }
        if let Some(class) = program.class_of(interface) {
            for &inherited in &program.class(class).implements {
                self.add_interface_members(proto, inherited);
            }
        }
    }

    /// Allocate an instance of `ty` wired to its prototype.
    pub(crate) fn new_object(&mut self, span: Span, ty: TypeId) -> Object {
        let proto = self.get_prototype(ty);
        self.alloc.new_object(span, ty, Some(proto))
    }

    /// Freeze every read-only instance variable declared on the type of
    /// `obj` or its bases, giving `obj` its own cell for each first.
    pub(crate) fn freeze_readonly_properties(&self, obj: &Object) {
        let program = self.program;
        let mut current = Some(obj.ty());
        while let Some(ty) = current {
            for &member in program.type_members(ty) {
                let ClassMember::Property(variable) = member else {
                    continue;
                };
                let decl = program.variable(variable);
                if !decl.readonly || decl.is_static {
                    continue;
                }
                if let Some(cell) = obj.property_addr(&decl.name, false, true) {
                    cell.freeze();
                }
            }
            current = program.base_type(ty);
        }
    }
}
