use crate::join::JoinStateLayout;
use crate::{Processor, ProcessorContext, ProcessorError, ProcessorResult, Record};
use rdf_streams_functions::join::IterativeJoin;
use rdf_streams_model::Side;
use tracing::trace;

/// Joins the binding sets that arrive on its left and right input.
///
/// Every binding set is first stored and then joined with the binding sets that have previously
/// arrived on the other side. A binding set that has already arrived on the same side is dropped.
/// Hence, each compatible pair is emitted exactly once, regardless of the arrival order.
#[derive(Debug)]
pub struct JoinProcessor {
    id: String,
    join: Box<dyn IterativeJoin>,
    layout: JoinStateLayout,
    side: Option<Side>,
    store: String,
}

impl JoinProcessor {
    pub fn new(
        id: String,
        join: Box<dyn IterativeJoin>,
        layout: JoinStateLayout,
        side: Option<Side>,
        store: String,
    ) -> Self {
        Self {
            id,
            join,
            layout,
            side,
            store,
        }
    }
}

impl Processor for JoinProcessor {
    fn process(
        &mut self,
        context: &mut dyn ProcessorContext,
        record: Record,
    ) -> Result<(), ProcessorError> {
        let Record::Result(ProcessorResult::Binary { side, result }) = record else {
            return Err(ProcessorError::UnexpectedRecord {
                processor: self.id.clone(),
                record: record.kind_name(),
            });
        };

        let store =
            context
                .state_store(&self.store)
                .ok_or_else(|| ProcessorError::MissingStateStore {
                    processor: self.id.clone(),
                    store: self.store.clone(),
                })?;

        if !self.layout.insert(store, side, &result) {
            trace!(id = %self.id, side = %side, "join.duplicate");
            return Ok(());
        }

        let candidates = self.layout.candidates(store, side, &result);
        let joined = match side {
            Side::Left => self.join.new_left_result(&result, &candidates),
            Side::Right => self.join.new_right_result(&candidates, &result),
        };
        trace!(
            id = %self.id,
            side = %side,
            candidates = candidates.len(),
            joined = joined.len(),
            "join.process"
        );

        for binding_set in joined {
            context.forward(Record::Result(ProcessorResult::new(self.side, binding_set)));
        }
        Ok(())
    }
}
