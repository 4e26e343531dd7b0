use anyhow::{Context, anyhow, bail};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use tracing::{debug, error};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    id: usize,
    thread: thread::JoinHandle<()>,
}

impl Worker {
    fn new(id: usize, receiver: Arc<Mutex<Receiver<Job>>>) -> anyhow::Result<Worker> {
        let thread = thread::Builder::new()
            .name(format!("http-worker-{}", id))
            .spawn(move || loop {
                let message = match receiver.lock() {
                    Ok(rx) => rx.recv(),
                    Err(_) => {
                        error!(worker = id, "job queue lock poisoned, stopping");
                        break;
                    }
                };
                match message {
                    Ok(job) => {
                        // A panicking job must not take the worker down with it.
                        if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                            error!(worker = id, "job panicked: {}", panic_message(payload.as_ref()));
                        }
                    }
                    Err(_) => break,
                }
            })
            .with_context(|| format!("Can't spawn worker {}", id))?;

        Ok(Worker { id, thread })
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// Fixed-size pool of threads pulling jobs off a shared queue.
///
/// Dropping the pool closes the queue and waits for every worker to finish
/// the job it is on.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<Sender<Job>>,
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        drop(self.sender.take());

        for worker in self.workers.drain(..) {
            debug!(worker = worker.id, "shutting down worker");
            if worker.thread.join().is_err() {
                error!(worker = worker.id, "worker panicked");
            }
        }
    }
}

impl ThreadPool {
    pub fn new(size: usize) -> anyhow::Result<Self> {
        if size == 0 {
            bail!("Thread pool needs at least one worker");
        }

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(id, Arc::clone(&receiver))?);
        }

        Ok(ThreadPool {
            workers,
            sender: Some(sender),
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn execute<F>(&self, f: F) -> anyhow::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Box::new(f) as Job;
        self.sender
            .as_ref()
            .ok_or(anyhow!("Thread pool is shutting down"))?
            .send(job)
            .map_err(|_| anyhow!("All workers have stopped"))
    }
}
