use crate::handler::RequestHandler;
use std::sync::Arc;

pub(crate) struct ServerState {
    handler: Arc<RequestHandler>,
}

impl ServerState {
    pub(crate) fn new(handler: Arc<RequestHandler>) -> Self {
        Self { handler }
    }

    pub(crate) fn handler(&self) -> &RequestHandler {
        &self.handler
    }
}
