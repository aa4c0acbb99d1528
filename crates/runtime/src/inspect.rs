//! Static conformance checks on a guest, without instantiating it.

use bytecall_sys::{IMPORT_MODULE, MEMORY_EXPORT, SEND_RESULT_TO_HOST, WRITE_ARGS_TO_BUFFER};
use serde::Serialize;
use wasmer::{ExternType, FunctionType, Module, Store, Type};

use crate::errors::VMRuntimeError;

#[derive(Debug, Default, Serialize)]
#[non_exhaustive]
pub struct Inspection {
    /// Exports callable over the protocol.
    pub functions: Vec<ExportedFunction>,
    /// Exported functions whose signature does not fit the protocol.
    pub nonconforming: Vec<Nonconforming>,
    /// Protocol primitives the guest imports.
    pub primitives: Vec<String>,
    /// Imports no protocol host provides.
    pub foreign_imports: Vec<ForeignImport>,
    pub exports_memory: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportedFunction {
    pub name: String,
    /// Number of byte arguments.
    pub arity: usize,
}

#[derive(Debug, Serialize)]
pub struct Nonconforming {
    pub name: String,
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct ForeignImport {
    pub module: String,
    pub name: String,
    pub ty: String,
}

impl Inspection {
    /// Whether a host could instantiate the guest and call into it.
    #[must_use]
    pub fn is_conforming(&self) -> bool {
        self.exports_memory && self.foreign_imports.is_empty()
    }
}

/// Reports how `code` fits the protocol.
pub fn inspect(code: &[u8]) -> Result<Inspection, VMRuntimeError> {
    let store = Store::default();
    let module = Module::new(&store, code)?;

    let mut inspection = Inspection::default();

    for export in module.exports() {
        match export.ty() {
            ExternType::Function(ty) => match arity(ty) {
                Some(arity) => inspection.functions.push(ExportedFunction {
                    name: export.name().to_owned(),
                    arity,
                }),
                None => inspection.nonconforming.push(Nonconforming {
                    name: export.name().to_owned(),
                    signature: ty.to_string(),
                }),
            },
            ExternType::Memory(_) if export.name() == MEMORY_EXPORT => {
                inspection.exports_memory = true;
            }
            _ => {}
        }
    }

    for import in module.imports() {
        let primitive = match import.ty() {
            ExternType::Function(ty) if import.module() == IMPORT_MODULE => {
                primitive(import.name(), ty)
            }
            _ => None,
        };

        match primitive {
            Some(name) => inspection.primitives.push(name.to_owned()),
            None => inspection.foreign_imports.push(ForeignImport {
                module: import.module().to_owned(),
                name: import.name().to_owned(),
                ty: format!("{:?}", import.ty()),
            }),
        }
    }

    Ok(inspection)
}

fn arity(ty: &FunctionType) -> Option<usize> {
    (ty.params().iter().all(|param| *param == Type::I32) && ty.results() == [Type::I32])
        .then_some(ty.params().len())
}

fn primitive<'a>(name: &'a str, ty: &FunctionType) -> Option<&'a str> {
    let expected: &[Type] = match name {
        WRITE_ARGS_TO_BUFFER => &[Type::I32],
        SEND_RESULT_TO_HOST => &[Type::I32, Type::I32],
        _ => return None,
    };

    (ty.params() == expected && ty.results().is_empty()).then_some(name)
}
