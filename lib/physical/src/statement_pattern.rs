use crate::{Processor, ProcessorContext, ProcessorError, ProcessorResult, Record};
use rdf_streams_functions::pattern::StatementPatternMatcher;
use rdf_streams_model::Side;
use tracing::trace;

/// Emits the bindings of every input statement that matches a triple pattern.
#[derive(Debug)]
pub struct StatementPatternProcessor {
    id: String,
    matcher: StatementPatternMatcher,
    side: Option<Side>,
}

impl StatementPatternProcessor {
    pub fn new(id: String, matcher: StatementPatternMatcher, side: Option<Side>) -> Self {
        Self { id, matcher, side }
    }
}

impl Processor for StatementPatternProcessor {
    fn process(
        &mut self,
        context: &mut dyn ProcessorContext,
        record: Record,
    ) -> Result<(), ProcessorError> {
        let Record::Statement(statement) = record else {
            return Err(ProcessorError::UnexpectedRecord {
                processor: self.id.clone(),
                record: record.kind_name(),
            });
        };

        if let Some(bindings) = self.matcher.match_statement(&statement) {
            trace!(id = %self.id, bindings = %bindings, "statement_pattern.match");
            context.forward(Record::Result(ProcessorResult::new(self.side, bindings)));
        }
        Ok(())
    }
}
