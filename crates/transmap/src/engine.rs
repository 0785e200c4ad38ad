mod compile;
pub(crate) use compile::{compile_class_map, Compiler};

mod conversion;
pub(crate) use conversion::{Conversion, EntryClass, Multi, Shape};

mod describe;
pub(crate) use describe::Describe;

mod exec;
pub(crate) use exec::Exec;

mod plan;
pub(crate) use plan::{
    CompiledMapper, FieldStep, GroupDestination, GroupSource, GroupStep, Origin, Plan, Step,
};

mod spec;
pub(crate) use spec::{Case, Chain, Specification};
