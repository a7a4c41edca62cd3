//! Target-syntax rendering of type descriptors.
//!
//! Used for diagnostics and driver reports. Descriptors the database does
//! not know render as `<unknown>` instead of failing, so a report can show
//! the descriptor that caused an error.

use crate::db::TypeDatabase;
use crate::decl::DeclId;
use crate::queries::is_implicit_upper_bound;
use crate::types::{PrimitiveKind, TypeData, TypeId, TypeVarId};
use rustc_hash::FxHashSet;

/// Renders descriptors in target syntax (`List<out T>?`, `T & Any`, `*`).
pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
    /// Wildcards whose bounds are being rendered.
    visiting: FxHashSet<TypeVarId>,
    qualified: bool,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        TypeFormatter {
            db,
            visiting: FxHashSet::default(),
            qualified: false,
        }
    }

    /// Render declarations by qualified instead of simple name.
    pub fn with_qualified_names(mut self) -> Self {
        self.qualified = true;
        self
    }

    pub fn format(&mut self, id: TypeId) -> String {
        let mut out = String::new();
        self.write(id, &mut out);
        out
    }

    fn write(&mut self, id: TypeId, out: &mut String) {
        let Some(data) = self.db.lookup(id) else {
            out.push_str("<unknown>");
            return;
        };

        match data {
            TypeData::Primitive(kind) => out.push_str(kind.target_name()),
            TypeData::Array {
                component,
                nullable,
            } => {
                self.write_array(component, out);
                push_nullable(out, nullable);
            }
            TypeData::Declared {
                declaration,
                arguments,
                nullable,
            } => {
                self.write_declaration_name(declaration, out);
                let arguments = self.db.type_list(arguments);
                if !arguments.is_empty() {
                    out.push('<');
                    self.write_joined(&arguments, ", ", out);
                    out.push('>');
                }
                push_nullable(out, nullable);
            }
            TypeData::TypeVariable { variable, nullable } => {
                self.write_variable(variable, out);
                push_nullable(out, nullable);
            }
            TypeData::Intersection(members) => {
                let members = self.db.type_list(members);
                self.write_joined(&members, " & ", out);
            }
            TypeData::Union(members) => {
                let members = self.db.type_list(members);
                self.write_joined(&members, " | ", out);
            }
        }
    }

    fn write_array(&mut self, component: Option<TypeId>, out: &mut String) {
        let Some(component) = component else {
            out.push_str("Array<*>");
            return;
        };
        if let Some(name) = PrimitiveKind::from_type_id(component).and_then(PrimitiveKind::target_array_name) {
            out.push_str(name);
            return;
        }
        out.push_str("Array<");
        self.write(component, out);
        out.push('>');
    }

    fn write_declaration_name(&self, declaration: DeclId, out: &mut String) {
        if declaration == DeclId::OBJECT {
            out.push_str("Any");
            return;
        }
        let Some(name) = self.db.declaration_name(declaration) else {
            out.push_str("<unknown>");
            return;
        };
        let name = self.db.resolve_atom_ref(name);
        if self.qualified {
            out.push_str(&name);
        } else {
            out.push_str(simple_name(&name));
        }
    }

    fn write_variable(&mut self, variable: TypeVarId, out: &mut String) {
        let Some(info) = self.db.type_variable(variable) else {
            out.push_str("<unbound>");
            return;
        };
        if !info.is_wildcard_or_capture {
            out.push_str(&self.db.resolve_atom_ref(info.name));
            return;
        }

        if !self.visiting.insert(variable) {
            out.push_str(&self.db.resolve_atom_ref(info.name));
            return;
        }
        match info.lower_bound {
            Some(lower) => {
                out.push_str("in ");
                self.write(lower, out);
            }
            None if is_implicit_upper_bound(info.upper_bound) => out.push('*'),
            None => {
                out.push_str("out ");
                self.write(info.upper_bound, out);
            }
        }
        self.visiting.remove(&variable);
    }

    fn write_joined(&mut self, ids: &[TypeId], separator: &str, out: &mut String) {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write(id, out);
        }
    }
}

#[inline]
fn push_nullable(out: &mut String, nullable: bool) {
    if nullable {
        out.push('?');
    }
}

/// Last segment of a qualified name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit(['.', '$']).next().unwrap_or(qualified)
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
