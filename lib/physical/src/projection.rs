use crate::{Processor, ProcessorContext, ProcessorError, ProcessorResult, Record};
use rdf_streams_functions::projection::ProjectionFunction;
use rdf_streams_model::Side;

#[derive(Debug)]
pub struct ProjectionProcessor {
    id: String,
    function: ProjectionFunction,
    side: Option<Side>,
}

impl ProjectionProcessor {
    pub fn new(id: String, function: ProjectionFunction, side: Option<Side>) -> Self {
        Self { id, function, side }
    }
}

impl Processor for ProjectionProcessor {
    fn process(
        &mut self,
        context: &mut dyn ProcessorContext,
        record: Record,
    ) -> Result<(), ProcessorError> {
        let Record::Result(result) = record else {
            return Err(ProcessorError::UnexpectedRecord {
                processor: self.id.clone(),
                record: record.kind_name(),
            });
        };

        let projected = self.function.project(result.result());
        context.forward(Record::Result(ProcessorResult::new(self.side, projected)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;
    use rdf_streams_functions::projection::{ProjectionElement, ProjectionSource};
    use rdf_streams_model::{BindingSet, Literal, Term, VisibilityBindingSet};

    #[derive(Default)]
    struct CollectingContext(Vec<Record>);

    impl ProcessorContext for CollectingContext {
        fn forward(&mut self, record: Record) {
            self.0.push(record);
        }

        fn state_store(&mut self, _name: &str) -> Option<&mut dyn KeyValueStore> {
            None
        }
    }

    #[test]
    fn projects_and_tags_with_own_side() {
        let function = ProjectionFunction::new(vec![ProjectionElement::new(
            ProjectionSource::Binding("name".to_owned()),
            "label",
        )]);
        let mut processor =
            ProjectionProcessor::new("PROJECTION".to_owned(), function, Some(Side::Right));
        let mut context = CollectingContext::default();
        let bindings: BindingSet = [
            ("name", Term::from(Literal::new_simple_literal("Alice"))),
            ("age", Term::from(Literal::from(42))),
        ]
        .into_iter()
        .collect();

        processor
            .process(
                &mut context,
                Record::Result(ProcessorResult::Unary(VisibilityBindingSet::new(bindings, "a"))),
            )
            .unwrap();

        let expected: BindingSet = [("label", Term::from(Literal::new_simple_literal("Alice")))]
            .into_iter()
            .collect();
        assert_eq!(
            context.0,
            vec![Record::Result(ProcessorResult::Binary {
                side: Side::Right,
                result: VisibilityBindingSet::new(expected, "a"),
            })]
        );
    }
}
