use super::{CompiledMapper, Plan, Step};
use std::fmt;
use transmap_core::Schema;

/// Human-readable listing of a compiled mapper's steps, followed by what
/// the plans depend on.
///
/// ```text
/// Order -> OrderDto
///   id -> id via PrimitiveToWrapper
///   each lines -> items
///     sku -> code via CopyByReference
/// OrderDto -> Order
///   ...
/// used mappers: Line -> LineDto
/// used types: i64, Option<i64>, List<Line>, List<LineDto>
/// ```
pub(crate) struct Describe<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) unit: &'a CompiledMapper,
}

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.plan(f, &self.unit.a_to_b)?;
        self.plan(f, &self.unit.b_to_a)?;
        self.used(f)
    }
}

impl Describe<'_> {
    fn plan(&self, f: &mut fmt::Formatter<'_>, plan: &Plan) -> fmt::Result {
        writeln!(
            f,
            "{} -> {}",
            self.schema.class_name(plan.source),
            self.schema.class_name(plan.destination)
        )?;

        for key in &plan.used {
            writeln!(
                f,
                "  uses {} -> {}",
                self.schema.class_name(key.a),
                self.schema.class_name(key.b)
            )?;
        }

        steps(f, &plan.steps, 1)
    }

    fn used(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.unit;

        if !unit.used_mappers.is_empty() {
            let mappers: Vec<_> = unit
                .used_mappers
                .iter()
                .map(|key| {
                    format!(
                        "{} -> {}",
                        self.schema.class_name(key.a),
                        self.schema.class_name(key.b)
                    )
                })
                .collect();
            writeln!(f, "used mappers: {}", mappers.join(", "))?;
        }

        if !unit.used_converters.is_empty() {
            writeln!(f, "used converters: {}", unit.used_converters.len())?;
        }

        if !unit.used_types.is_empty() {
            let types: Vec<_> = unit
                .used_types
                .iter()
                .map(|ty| self.schema.type_name(ty))
                .collect();
            writeln!(f, "used types: {}", types.join(", "))?;
        }

        Ok(())
    }
}

fn steps(f: &mut fmt::Formatter<'_>, steps: &[Step], depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);

    for step in steps {
        match step {
            Step::Field(step) => {
                write!(
                    f,
                    "{indent}{} -> {} via {}",
                    step.source, step.destination, step.rule
                )?;
                if step.constructor_arg {
                    write!(f, " (constructor)")?;
                }
                writeln!(f)?;
            }
            Step::Group(group) => {
                let sources: Vec<_> = group
                    .sources
                    .iter()
                    .map(|source| source.container.to_string())
                    .collect();
                let destinations: Vec<_> = group
                    .destinations
                    .iter()
                    .map(|destination| destination.container.to_string())
                    .collect();

                writeln!(
                    f,
                    "{indent}each {} -> {}",
                    list(&sources),
                    list(&destinations)
                )?;
                self::steps(f, &group.steps, depth + 1)?;
            }
        }
    }

    Ok(())
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "()".to_string()
    } else {
        items.join(", ")
    }
}
