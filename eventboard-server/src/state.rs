use std::sync::Arc;

use eventboard_core::EventBoard;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // The board reloads its document on every call, so edits made to the
    // file between requests are picked up
    board: Arc<EventBoard>,
}

impl AppState {
    pub fn new(board: EventBoard) -> Self {
        AppState {
            board: Arc::new(board),
        }
    }

    pub fn board(&self) -> &EventBoard {
        &self.board
    }
}
