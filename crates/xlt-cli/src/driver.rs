//! Per-unit processing for the `xlt` commands.
//!
//! Every model is an independent compilation unit with its own descriptor
//! database. A failing unit is reported and the others still run.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};
use xlt_solver::projection::{directly_declared_non_raw_type_arguments, is_raw};
use xlt_solver::queries::{has_nullable_bounds, is_denotable, is_nullable, is_recursive};
use xlt_solver::supertype::direct_super_type_for_method_call;
use xlt_solver::{DescriptorResult, TypeData, TypeDatabase, TypeFormatter, TypeId, make_non_null};

use crate::model::{LoadedModel, ProgramModel};
use crate::report::{SuperCallReport, TypeReport, UnitReport};

pub fn load_model(path: &Path) -> Result<LoadedModel> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let model = ProgramModel::parse(&json).with_context(|| format!("failed to parse {}", path.display()))?;
    model
        .build()
        .with_context(|| format!("failed to build {}", path.display()))
}

/// Describe every model, in parallel, reporting in input order.
pub fn run_describe(paths: &[PathBuf]) -> Vec<UnitReport> {
    paths
        .par_iter()
        .map(|path| {
            let unit_path = path.display().to_string();
            let _span = info_span!("describe", unit = %unit_path).entered();
            match describe_unit(path) {
                Ok(types) => UnitReport {
                    path: unit_path,
                    types,
                    super_call: None,
                    error: None,
                },
                Err(error) => UnitReport::failed(unit_path, &error),
            }
        })
        .collect()
}

fn describe_unit(path: &Path) -> Result<Vec<TypeReport>> {
    let model = load_model(path)?;
    model
        .types
        .iter()
        .map(|(name, id)| {
            describe_type(&model.db, name, *id).with_context(|| format!("failed to describe `{name}`"))
        })
        .collect()
}

/// Classification and normal forms of one descriptor.
pub fn describe_type(db: &dyn TypeDatabase, name: &str, id: TypeId) -> DescriptorResult<TypeReport> {
    let non_null = make_non_null(db, id)?;
    let (recursive, nullable_bounds) = match db.require_type(id)? {
        TypeData::TypeVariable { variable, .. } => (
            Some(is_recursive(db, variable)?),
            Some(has_nullable_bounds(db, variable)?),
        ),
        TypeData::Primitive(_)
        | TypeData::Array { .. }
        | TypeData::Declared { .. }
        | TypeData::Intersection(_)
        | TypeData::Union(_) => (None, None),
    };
    let projected_arguments = if is_raw(db, id)? {
        let arguments = directly_declared_non_raw_type_arguments(db, id, false)?;
        Some(arguments.into_iter().map(|argument| format(db, argument)).collect())
    } else {
        None
    };

    debug!(type_name = name, type_id = id.0, non_null = non_null.0, "described type");
    Ok(TypeReport {
        name: name.to_string(),
        rendering: format(db, id),
        nullable: is_nullable(db, id)?,
        denotable: is_denotable(db, id)?,
        non_null: format(db, non_null),
        recursive,
        nullable_bounds,
        projected_arguments,
    })
}

pub fn run_super_call(path: &Path, class: &str, method: &str) -> UnitReport {
    let unit_path = path.display().to_string();
    let _span = info_span!("super_call", unit = %unit_path).entered();
    match super_call_unit(path, class, method) {
        Ok(report) => UnitReport {
            path: unit_path,
            types: Vec::new(),
            super_call: Some(report),
            error: None,
        },
        Err(error) => UnitReport::failed(unit_path, &error),
    }
}

fn super_call_unit(path: &Path, class: &str, method: &str) -> Result<SuperCallReport> {
    let model = load_model(path)?;
    super_call(&model, class, method)
}

/// Qualification of a super call to `method` from inside `class`.
pub fn super_call(model: &LoadedModel, class: &str, method: &str) -> Result<SuperCallReport> {
    let declaration = model.declaration(class)?;
    let method_id = model.method(method)?;
    let declared = model.self_type(declaration)?;
    let super_type = direct_super_type_for_method_call(&model.db, declared, method_id)
        .with_context(|| format!("failed to resolve super call to `{method}` in `{class}`"))?;

    Ok(SuperCallReport {
        class: class.to_string(),
        method: method.to_string(),
        super_type: super_type.map(|id| format(&model.db, id)),
    })
}

fn format(db: &dyn TypeDatabase, id: TypeId) -> String {
    TypeFormatter::new(db).format(id)
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
