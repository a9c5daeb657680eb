use crate::{Processor, ProcessorContext, ProcessorError, Record};

/// Unwraps the results of the root stage into the binding sets that are written to the result
/// topic.
#[derive(Debug)]
pub struct OutputFormatterProcessor {
    id: String,
}

impl OutputFormatterProcessor {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

impl Processor for OutputFormatterProcessor {
    fn process(
        &mut self,
        context: &mut dyn ProcessorContext,
        record: Record,
    ) -> Result<(), ProcessorError> {
        match record {
            Record::Result(result) => {
                context.forward(Record::Binding(result.into_result()));
                Ok(())
            }
            record => Err(ProcessorError::UnexpectedRecord {
                processor: self.id.clone(),
                record: record.kind_name(),
            }),
        }
    }
}
