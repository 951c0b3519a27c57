//! Fluent construction of [`Response`] payloads for `response.created` and
//! `response.done` events.

use crate::realtime::{
    ConversationItem, Modality, Response, ResponseStatus, ResponseStatusDetails, ResponseUsage,
};

#[must_use = "Builder does nothing until .build() is called"]
#[derive(Clone, Debug)]
pub struct RealtimeResponseBuilder {
    response: Response,
}

impl RealtimeResponseBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            response: Response::new(id),
        }
    }

    pub fn status(mut self, status: ResponseStatus) -> Self {
        self.response.status = status;
        self
    }

    pub fn status_details(mut self, details: ResponseStatusDetails) -> Self {
        self.response.status_details = Some(details);
        self
    }

    /// Mark the response `cancelled` with the given reason.
    pub fn cancelled(self, reason: impl Into<String>) -> Self {
        self.status(ResponseStatus::Cancelled)
            .status_details(ResponseStatusDetails::Cancelled {
                reason: Some(reason.into()),
            })
    }

    pub fn add_output(mut self, item: ConversationItem) -> Self {
        self.response.output.push(item);
        self
    }

    pub fn usage(mut self, input_tokens: u32, output_tokens: u32) -> Self {
        self.response.usage = Some(ResponseUsage {
            total_tokens: input_tokens + output_tokens,
            input_tokens,
            output_tokens,
        });
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.response.instructions = Some(instructions.into());
        self
    }

    pub fn modalities(mut self, modalities: impl IntoIterator<Item = Modality>) -> Self {
        self.response.modalities = Some(modalities.into_iter().collect());
        self
    }

    pub fn build(self) -> Response {
        self.response
    }
}

impl Response {
    pub fn builder(id: impl Into<String>) -> RealtimeResponseBuilder {
        RealtimeResponseBuilder::new(id)
    }
}
