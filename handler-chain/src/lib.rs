//! # Handler chain
//!
//! Runs a sequence of handlers for each incoming message. All `before` run in order (any false
//! stops the chain); then `handle` runs until a handler returns Stop or Reply; then all `after`
//! run in reverse. A failing `handle` still lets the `after` phase run before the error is returned.

use keybot_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Chain of handlers: before (all) → handle (until Stop/Reply) → after (reverse).
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs all before → handle until Stop/Reply → all after in reverse.
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = %message.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        debug!(
            user_id = message.user.id,
            message_type = %message.message_type,
            "step: handler_chain started"
        );

        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            if !h.before(message).await? {
                info!(handler = %name, "step: before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        let mut failure = None;

        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let response = match h.handle(message).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(handler = %name, error = %e, "step: handler failed");
                    failure = Some(e);
                    break;
                }
            };
            debug!(handler = %name, response = ?response, "step: handler handle done");

            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    debug!(handler = %name, "step: handler chain stopped by handler");
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => {}
            }
        }

        for h in self.handlers.iter().rev() {
            h.after(message, &final_response).await?;
        }

        if let Some(e) = failure {
            return Err(e);
        }

        debug!(response = ?final_response, "step: handler_chain finished");
        Ok(final_response)
    }
}

// Unit/integration tests live in tests/handler_chain_test.rs
