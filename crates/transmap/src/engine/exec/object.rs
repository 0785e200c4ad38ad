use super::{Exec, Frames};
use crate::{
    engine::{CompiledMapper, Plan, Step},
    Result,
};
use tracing::trace;
use transmap_core::{schema::ClassId, Error, ObjectRef, Value};

impl Exec<'_> {
    /// Maps `source` to an instance of `requested`.
    ///
    /// With `existing`, the source is merged into that instance instead of
    /// a new one. Within one context, a source already mapped to
    /// `requested` resolves to the instance produced the first time.
    pub(crate) fn map_object(
        &mut self,
        source: &ObjectRef,
        requested: ClassId,
        existing: Option<&ObjectRef>,
    ) -> Result<ObjectRef> {
        let result = match self.cx.enter() {
            Ok(()) => {
                let result = self.map_object_at_depth(source, requested, existing);
                self.cx.leave();
                result
            }
            Err(err) => Err(err),
        };

        result.map_err(|err| {
            err.context(Error::mapping(
                source.class_name(),
                self.schema().class_name(requested),
            ))
        })
    }

    fn map_object_at_depth(
        &mut self,
        source: &ObjectRef,
        requested: ClassId,
        existing: Option<&ObjectRef>,
    ) -> Result<ObjectRef> {
        if let Some(mapped) = self.cx.mapped_object(source, requested) {
            trace!(
                source = source.class_name(),
                destination = mapped.class_name(),
                "reusing object mapped earlier in this call"
            );
            return Ok(mapped.clone());
        }

        let (destination, unit, fresh) = match existing {
            Some(existing) => {
                let unit = self.shared().unit(source.class_id(), existing.class_id())?;
                (existing.clone(), unit, false)
            }
            None => {
                let concrete =
                    self.shared()
                        .resolve_concrete(Some(source.class_id()), requested, self.cx)?;
                let unit = self.shared().unit(source.class_id(), concrete)?;
                let instance = self.instantiate(concrete, &Value::Object(source.clone()))?;
                (instance, unit, true)
            }
        };

        trace!(
            source = source.class_name(),
            destination = destination.class_name(),
            fresh,
            "mapping object"
        );

        // Recorded before the fields are mapped, so references back to
        // `source` deeper in the graph resolve to this instance.
        self.cx.cache_mapped_object(source, requested, &destination);
        if destination.class_id() != requested {
            self.cx
                .cache_mapped_object(source, destination.class_id(), &destination);
        }

        let plan = unit.plan_for(self.schema(), source.class_id());
        self.run(&unit, plan, source, &destination, fresh)?;

        Ok(destination)
    }

    /// Runs `plan`, after the plans of the more general pairs it uses.
    fn run(
        &mut self,
        unit: &CompiledMapper,
        plan: &Plan,
        source: &ObjectRef,
        destination: &ObjectRef,
        fresh: bool,
    ) -> Result<()> {
        for key in &plan.used {
            let parent = self.shared().unit(key.a, key.b)?;
            let parent_plan = parent.plan_for(self.schema(), key.a);
            self.run(&parent, parent_plan, source, destination, fresh)?;
        }

        let mut frames = Frames::new(
            Value::Object(source.clone()),
            Value::Object(destination.clone()),
        );

        // Constructor arguments first; on an existing instance only those
        // that are also writable.
        for step in plan.field_steps().filter(|step| step.constructor_arg) {
            if fresh || step.destination.is_writable() {
                self.field(step, &mut frames)?;
            }
        }

        for step in &plan.steps {
            match step {
                Step::Field(step) if step.constructor_arg => {}
                Step::Field(step) => self.field(step, &mut frames)?,
                Step::Group(step) => self.group(step, &mut frames)?,
            }
        }

        if let Some(customizer) = &unit.customizer {
            if plan.forward {
                customizer.customize_a_to_b(source, destination, self.facade, self.cx)?;
            } else {
                customizer.customize_b_to_a(source, destination, self.facade, self.cx)?;
            }
        }

        Ok(())
    }

    /// Creates an instance of `class` through its registered object factory,
    /// or with default field values.
    pub(super) fn instantiate(&mut self, class: ClassId, source: &Value) -> Result<ObjectRef> {
        let shared = self.shared();

        match shared.object_factories.get(&class) {
            Some(factory) => {
                let class = shared.schema.expect_class(class)?;
                factory.create(class, source, self.facade, self.cx)
            }
            None => shared.schema.instantiate(class),
        }
    }
}
