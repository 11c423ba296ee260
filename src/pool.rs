//! Fixed-size worker thread pool.
//!
//! Work items are queued on an unbounded MPMC channel and dequeued in FIFO
//! order; completion order across workers is unordered. One work item wraps
//! one connection's whole request-response cycle.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::Error;
use crate::log::error;

type Work = Box<dyn FnOnce() + Send + 'static>;

pub(crate) struct ThreadPool {
    tx: Option<Sender<Work>>,
    rx: Receiver<Work>,
    active: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("workers", &self.workers.len())
            .field("active", &self.active)
            .finish()
    }
}

impl ThreadPool {
    /// Spawn `size` workers.
    ///
    /// Failing to spawn any worker tears down the ones already created and
    /// fails the construction.
    pub(crate) fn new(size: usize) -> Result<Self, Error> {
        let (tx, rx) = unbounded::<Work>();
        let active = Arc::new(AtomicBool::new(true));
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let worker_rx = rx.clone();
            let worker_active = Arc::clone(&active);
            let spawned = std::thread::Builder::new()
                .name(format!("loam-worker-{id}"))
                .spawn(move || worker(worker_rx, worker_active));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    let mut pool = Self { tx: Some(tx), rx, active, workers };
                    pool.stop();
                    return Err(Error::Pool(err));
                }
            }
        }

        Ok(Self { tx: Some(tx), rx, active, workers })
    }

    /// Queue a work item at the tail.
    ///
    /// Rejected once the pool has stopped. An accepted item runs exactly
    /// once, unless [`stop`][Self::stop] discards it before a worker picked
    /// it up.
    pub(crate) fn submit(&self, work: impl FnOnce() + Send + 'static) -> Result<(), Error> {
        if !self.active.load(Ordering::Acquire) {
            return Err(Error::PoolClosed);
        }

        match &self.tx {
            Some(tx) => tx.send(Box::new(work)).map_err(|_| Error::PoolClosed),
            None => Err(Error::PoolClosed),
        }
    }

    /// Stop the pool.
    ///
    /// Discards queued-but-unstarted work without running it, wakes idle
    /// workers, then blocks until every worker finished its current item and
    /// exited.
    pub(crate) fn stop(&mut self) {
        self.active.store(false, Ordering::Release);

        while self.rx.try_recv().is_ok() {}

        // disconnect the channel so blocked workers wake up and exit
        drop(self.tx.take());

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if self.tx.is_some() {
            self.stop();
        }
    }
}

fn worker(rx: Receiver<Work>, active: Arc<AtomicBool>) {
    while let Ok(work) = rx.recv() {
        // an item handed out while stop() is draining is discarded too
        if !active.load(Ordering::Acquire) {
            break;
        }

        if catch_unwind(AssertUnwindSafe(work)).is_err() {
            error!("a connection handler panicked");
        }
    }
}
