//! JSON program models.
//!
//! A model lists declarations (type parameters, supertypes, methods) and
//! named type expressions over them. Building a model into a descriptor
//! database runs in two phases: every declaration, method and type
//! parameter is reserved first, then bounds are bound and declarations are
//! completed. Declarations and bounds may therefore refer to each other in
//! any order, including cyclically.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};
use xlt_solver::queries::is_recursive;
use xlt_solver::type_factory::{self, type_parameter_key};
use xlt_solver::{
    DeclId, DescriptorError, MethodId, MethodInfo, OBJECT_NAME, PrimitiveKind, TypeDeclaration,
    TypeId, TypeInterner, TypeVarId, TypeVariableBounds,
};

/// Errors raised while parsing or building a program model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid program model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("declaration `{0}` is declared more than once")]
    DuplicateDeclaration(String),

    #[error("unknown declaration `{0}`")]
    UnknownDeclaration(String),

    #[error("unknown type parameter `{name}` of `{declaring}`")]
    UnknownTypeParameter { declaring: String, name: String },

    #[error("unknown primitive `{0}`")]
    UnknownPrimitive(String),

    #[error("declaration `{0}` is enclosed in itself")]
    EnclosingCycle(String),

    #[error("method `{0}` is not of the form `Declaration.method`")]
    InvalidMethodPath(String),

    #[error("unknown method `{name}` in `{declaration}`")]
    UnknownMethod { declaration: String, name: String },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramModel {
    #[serde(default)]
    pub declarations: Vec<DeclarationModel>,
    /// Type expressions reported by `describe`.
    #[serde(default)]
    pub types: Vec<NamedType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    #[default]
    Class,
    Interface,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationModel {
    /// Qualified name, `$` separating nested declarations.
    pub name: String,
    #[serde(default)]
    pub kind: DeclarationKind,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterModel>,
    /// Enclosing generic declaration whose type parameters are in scope.
    #[serde(default)]
    pub enclosing: Option<String>,
    #[serde(default)]
    pub super_types: Vec<TypeRef>,
    #[serde(default)]
    pub methods: Vec<MethodModel>,
    #[serde(default)]
    pub anonymous: bool,
    /// Inferred from the type parameters' bounds when absent.
    #[serde(default)]
    pub recursive: Option<bool>,
    #[serde(default = "default_true")]
    pub nullable_as_bound: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypeParameterModel {
    pub name: String,
    /// `Any?` when absent.
    #[serde(default)]
    pub bound: Option<TypeRef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MethodModel {
    pub name: String,
    /// Erased signature; methods override only when signatures match.
    #[serde(default = "default_signature")]
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NamedType {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// A type expression in a model.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive {
        name: String,
    },
    Declared {
        name: String,
        #[serde(default)]
        arguments: Vec<TypeRef>,
        #[serde(default)]
        nullable: bool,
    },
    Array {
        component: Box<TypeRef>,
        #[serde(default)]
        nullable: bool,
    },
    Parameter {
        declaring: String,
        name: String,
        #[serde(default)]
        nullable: bool,
    },
    Wildcard {
        #[serde(default)]
        upper: Option<Box<TypeRef>>,
        #[serde(default)]
        lower: Option<Box<TypeRef>>,
    },
    Intersection {
        members: Vec<TypeRef>,
    },
    Union {
        members: Vec<TypeRef>,
    },
}

const fn default_true() -> bool {
    true
}

fn default_signature() -> String {
    "()V".to_string()
}

impl ProgramModel {
    pub fn parse(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the model into a fresh descriptor database.
    pub fn build(&self) -> Result<LoadedModel, ModelError> {
        let mut builder = ModelBuilder::new(self);
        builder.reserve()?;
        builder.bind_type_parameters()?;
        builder.complete_declarations()?;
        let types = self
            .types
            .iter()
            .map(|named| Ok((named.name.clone(), builder.resolve(&named.ty)?)))
            .collect::<Result<Vec<_>, ModelError>>()?;

        debug!(
            declarations = builder.declarations.len(),
            types = types.len(),
            "program model built"
        );
        Ok(LoadedModel {
            db: builder.db,
            declarations: builder.declarations,
            methods: builder.methods,
            types,
        })
    }
}

/// A model built into its own descriptor database.
pub struct LoadedModel {
    pub db: TypeInterner,
    declarations: FxHashMap<String, DeclId>,
    methods: FxHashMap<(DeclId, String), MethodId>,
    /// Named types in model order.
    pub types: Vec<(String, TypeId)>,
}

impl LoadedModel {
    pub fn declaration(&self, name: &str) -> Result<DeclId, ModelError> {
        lookup_declaration(&self.declarations, name)
    }

    /// Method named by `Declaration.method`.
    pub fn method(&self, path: &str) -> Result<MethodId, ModelError> {
        let (declaration, name) = path
            .rsplit_once('.')
            .filter(|(declaration, name)| !declaration.is_empty() && !name.is_empty())
            .ok_or_else(|| ModelError::InvalidMethodPath(path.to_string()))?;
        let id = self.declaration(declaration)?;
        self.methods
            .get(&(id, name.to_string()))
            .copied()
            .ok_or_else(|| ModelError::UnknownMethod {
                declaration: declaration.to_string(),
                name: name.to_string(),
            })
    }

    /// The declaration applied to its own type parameters (`C<T>` in `C`).
    pub fn self_type(&self, declaration: DeclId) -> Result<TypeId, ModelError> {
        let parameters = self
            .db
            .declaration(declaration)
            .map(|declaration| declaration.type_parameters.clone())
            .ok_or(DescriptorError::UnknownDeclaration(declaration))?;
        Ok(self.db.declared(declaration, parameters, false))
    }
}

fn lookup_declaration(declarations: &FxHashMap<String, DeclId>, name: &str) -> Result<DeclId, ModelError> {
    if name == OBJECT_NAME {
        return Ok(DeclId::OBJECT);
    }
    declarations
        .get(name)
        .copied()
        .ok_or_else(|| ModelError::UnknownDeclaration(name.to_string()))
}

struct ModelBuilder<'m> {
    model: &'m ProgramModel,
    db: TypeInterner,
    declarations: FxHashMap<String, DeclId>,
    methods: FxHashMap<(DeclId, String), MethodId>,
    /// Every method of a declaration, overloads included, in model order.
    declared_methods: FxHashMap<DeclId, Vec<MethodId>>,
    /// Keyed by `declaring::name`.
    parameters: FxHashMap<String, TypeVarId>,
}

impl<'m> ModelBuilder<'m> {
    fn new(model: &'m ProgramModel) -> Self {
        ModelBuilder {
            model,
            db: TypeInterner::new(),
            declarations: FxHashMap::default(),
            methods: FxHashMap::default(),
            declared_methods: FxHashMap::default(),
            parameters: FxHashMap::default(),
        }
    }

    /// Phase one: ids for every declaration, method and type parameter.
    fn reserve(&mut self) -> Result<(), ModelError> {
        for declaration in &self.model.declarations {
            if declaration.name == OBJECT_NAME || self.declarations.contains_key(&declaration.name) {
                return Err(ModelError::DuplicateDeclaration(declaration.name.clone()));
            }
            let id = self.db.declarations().reserve(self.db.intern_string(&declaration.name));
            self.declarations.insert(declaration.name.clone(), id);

            for method in &declaration.methods {
                let info = MethodInfo::new(
                    self.db.intern_string(&method.name),
                    id,
                    self.db.intern_string(&method.signature),
                );
                let method_id = self.db.declarations().add_method(info);
                self.declared_methods.entry(id).or_default().push(method_id);
                // Overloads share a name; a path resolves to the first.
                self.methods.entry((id, method.name.clone())).or_insert(method_id);
            }

            let declaring = self.db.intern_string(&declaration.name);
            for parameter in &declaration.type_parameters {
                let name = self.db.intern_string(&parameter.name);
                let variable = type_factory::declare_type_parameter(&self.db, Some(declaring), name);
                self.parameters.insert(
                    type_parameter_key(Some(&declaration.name), &parameter.name),
                    variable,
                );
            }
        }
        Ok(())
    }

    /// Phase two: bounds of every type parameter.
    fn bind_type_parameters(&self) -> Result<(), ModelError> {
        for declaration in &self.model.declarations {
            let declaring = self.db.intern_string(&declaration.name);
            for parameter in &declaration.type_parameters {
                let variable = self.parameter(&declaration.name, &parameter.name)?;
                let upper_bound = match &parameter.bound {
                    Some(bound) => self.resolve(bound)?,
                    None => TypeId::NULLABLE_ANY,
                };
                self.db.bind_type_variable(
                    variable,
                    TypeVariableBounds::parameter(
                        self.db.intern_string(&parameter.name),
                        Some(declaring),
                        upper_bound,
                    ),
                )?;
            }
        }
        Ok(())
    }

    /// Phase three: complete declarations now that every bound is bound.
    fn complete_declarations(&self) -> Result<(), ModelError> {
        for declaration in &self.model.declarations {
            let id = lookup_declaration(&self.declarations, &declaration.name)?;
            let own = self.own_parameters(declaration)?;

            let recursive = match declaration.recursive {
                Some(recursive) => recursive,
                None => self.any_recursive(&own)?,
            };
            let mut enclosing_seen = FxHashSet::default();
            let enclosing = self.enclosing_parameters(declaration, &mut enclosing_seen)?;
            let super_types = declaration
                .super_types
                .iter()
                .map(|super_type| self.resolve(super_type))
                .collect::<Result<Vec<_>, _>>()?;
            let methods = self.declared_methods.get(&id).cloned().unwrap_or_default();

            let name = self.db.intern_string(&declaration.name);
            let mut built = match declaration.kind {
                DeclarationKind::Class => TypeDeclaration::class(name),
                DeclarationKind::Interface => TypeDeclaration::interface(name),
            }
            .with_type_parameters(own.iter().map(|&(_, id)| id).collect())
            .with_enclosing_type_parameters(enclosing)
            .with_super_types(super_types)
            .with_methods(methods)
            .recursive(recursive)
            .nullable_as_bound(declaration.nullable_as_bound);
            if declaration.anonymous {
                built = built.anonymous();
            }

            trace!(declaration = %declaration.name, recursive, "complete declaration");
            self.db.declarations().complete(id, built)?;
        }
        Ok(())
    }

    fn own_parameters(&self, declaration: &DeclarationModel) -> Result<Vec<(TypeVarId, TypeId)>, ModelError> {
        declaration
            .type_parameters
            .iter()
            .map(|parameter| {
                let variable = self.parameter(&declaration.name, &parameter.name)?;
                Ok((variable, self.db.variable(variable, false)))
            })
            .collect()
    }

    fn any_recursive(&self, parameters: &[(TypeVarId, TypeId)]) -> Result<bool, ModelError> {
        for &(variable, _) in parameters {
            if is_recursive(&self.db, variable)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Type parameters of the enclosing declarations, innermost first.
    fn enclosing_parameters(
        &self,
        declaration: &'m DeclarationModel,
        seen: &mut FxHashSet<&'m str>,
    ) -> Result<Vec<TypeId>, ModelError> {
        let Some(enclosing) = &declaration.enclosing else {
            return Ok(Vec::new());
        };
        if !seen.insert(declaration.name.as_str()) {
            return Err(ModelError::EnclosingCycle(declaration.name.clone()));
        }
        let enclosing = self
            .model
            .declarations
            .iter()
            .find(|candidate| &candidate.name == enclosing)
            .ok_or_else(|| ModelError::UnknownDeclaration(enclosing.clone()))?;

        let mut parameters: Vec<TypeId> = self
            .own_parameters(enclosing)?
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        parameters.extend(self.enclosing_parameters(enclosing, seen)?);
        Ok(parameters)
    }

    fn parameter(&self, declaring: &str, name: &str) -> Result<TypeVarId, ModelError> {
        self.parameters
            .get(&type_parameter_key(Some(declaring), name))
            .copied()
            .ok_or_else(|| ModelError::UnknownTypeParameter {
                declaring: declaring.to_string(),
                name: name.to_string(),
            })
    }

    fn resolve(&self, ty: &TypeRef) -> Result<TypeId, ModelError> {
        Ok(match ty {
            TypeRef::Primitive { name } => {
                let kind = PrimitiveKind::from_keyword(name)
                    .ok_or_else(|| ModelError::UnknownPrimitive(name.clone()))?;
                self.db.primitive(kind)
            }
            TypeRef::Declared {
                name,
                arguments,
                nullable,
            } => {
                let declaration = lookup_declaration(&self.declarations, name)?;
                let arguments = self.resolve_all(arguments)?;
                self.db.declared(declaration, arguments, *nullable)
            }
            TypeRef::Array { component, nullable } => self.db.array(self.resolve(component)?, *nullable),
            TypeRef::Parameter {
                declaring,
                name,
                nullable,
            } => self.db.variable(self.parameter(declaring, name)?, *nullable),
            TypeRef::Wildcard { upper, lower } => {
                let upper = match upper {
                    Some(upper) => self.resolve(upper)?,
                    None => TypeId::NULLABLE_ANY,
                };
                let lower = lower.as_deref().map(|lower| self.resolve(lower)).transpose()?;
                type_factory::wildcard(&self.db, upper, lower)?
            }
            TypeRef::Intersection { members } => self.db.intersection(self.resolve_all(members)?),
            TypeRef::Union { members } => self.db.union(self.resolve_all(members)?),
        })
    }

    fn resolve_all(&self, types: &[TypeRef]) -> Result<Vec<TypeId>, ModelError> {
        types.iter().map(|ty| self.resolve(ty)).collect()
    }
}

#[cfg(test)]
#[path = "../tests/model_tests.rs"]
mod tests;
