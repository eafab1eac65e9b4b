//! Runs one engine search on a dedicated thread.
//!
//! The engine moves into the thread with an owned snapshot and comes back
//! with the reply, so the caller never shares game state with a search.
//! Dropping the worker raises its cancellation token.

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::engines::engine_trait::{Engine, EngineReply, SearchRequest};
use crate::game_state::errors::{ChessError, ChessResult};
use crate::game_state::snapshot::BoardSnapshot;
use crate::search::cancellation::CancellationToken;

/// What a finished worker hands back: the reply and the engine itself.
pub struct WorkerResult {
    pub reply: EngineReply,
    pub engine: Box<dyn Engine>,
}

pub struct SearchWorker {
    cancel: CancellationToken,
    receiver: Receiver<WorkerResult>,
    handle: Option<JoinHandle<()>>,
    started: Instant,
}

impl SearchWorker {
    pub fn spawn(mut engine: Box<dyn Engine>, snapshot: BoardSnapshot, request: SearchRequest) -> Self {
        let request_depth = request.depth;
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();
        let (result_tx, result_rx) = channel::<WorkerResult>();
        let side = snapshot.side_to_move();

        let handle = thread::spawn(move || {
            let reply = engine.choose_move(&snapshot, &request, &worker_cancel);
            // The owner may have gone away; nothing left to report to then.
            let _ = result_tx.send(WorkerResult { reply, engine });
        });
        info!(?side, depth = ?request_depth, "search worker started");

        Self {
            cancel,
            receiver: result_rx,
            handle: Some(handle),
            started: Instant::now(),
        }
    }

    /// Non-blocking check for the result.
    pub fn poll(&mut self) -> ChessResult<Option<WorkerResult>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join();
                debug!(elapsed_ms = self.elapsed().as_millis() as u64, "search worker finished");
                Ok(Some(result))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.join();
                Err(ChessError::WorkerDisconnected)
            }
        }
    }

    /// Block until the worker reports.
    pub fn wait(&mut self) -> ChessResult<WorkerResult> {
        let result = self
            .receiver
            .recv()
            .map_err(|_| ChessError::WorkerDisconnected);
        self.join();
        result
    }

    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            info!("search worker cancelled");
        }
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
