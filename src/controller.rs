//! Owned main context for a road manager.
//!
//! A [`MapController`] runs one manager on a dedicated thread and feeds it
//! host calls one at a time. Callers never block on route fetches: each
//! call's outcome is handed to a reply callback once the manager is done.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use serde_json::Value;

use crate::channel::{self, MethodCall};
use crate::error::ChannelError;
use crate::manager::RoadManager;
use crate::traits::{MapSurface, RoutingClient};

pub type Reply = Box<dyn FnOnce(Result<Value, ChannelError>) + Send>;

enum Command {
    Call(MethodCall, Reply),
    Shutdown,
}

pub struct MapController {
    sender: mpsc::Sender<Command>,
    handle: Option<JoinHandle<()>>,
}

impl MapController {
    /// Starts the main context thread.
    ///
    /// The manager is built on that thread, so the map surface never has
    /// to cross threads. If `build` fails every call is answered with an
    /// `unavailable` error.
    pub fn spawn<R, M, E, F>(build: F) -> std::io::Result<Self>
    where
        R: RoutingClient + 'static,
        M: MapSurface + 'static,
        E: std::fmt::Display,
        F: FnOnce() -> Result<RoadManager<R, M>, E> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Command>();

        let handle = thread::Builder::new()
            .name("map-main".to_string())
            .spawn(move || {
                let mut manager = match build() {
                    Ok(manager) => manager,
                    Err(err) => {
                        tracing::error!("failed to start road manager: {}", err);
                        refuse_all(receiver, &err.to_string());
                        return;
                    }
                };

                for command in receiver {
                    match command {
                        Command::Call(call, reply) => {
                            tracing::debug!("handling `{}`", call.method);
                            reply(channel::dispatch(&mut manager, &call));
                        }
                        Command::Shutdown => break,
                    }
                }
                manager.clear_all();
            })?;

        Ok(Self {
            sender,
            handle: Some(handle),
        })
    }

    /// Queues `call`; `reply` runs on the main context thread.
    pub fn call<F>(&self, call: MethodCall, reply: F)
    where
        F: FnOnce(Result<Value, ChannelError>) + Send + 'static,
    {
        if let Err(mpsc::SendError(Command::Call(call, reply))) =
            self.sender.send(Command::Call(call, Box::new(reply)))
        {
            reply(Err(ChannelError::new(
                ChannelError::UNAVAILABLE,
                format!("map controller stopped before `{}`", call.method),
            )));
        }
    }

    /// Queues `call` and waits for its result.
    pub fn call_blocking(&self, call: MethodCall) -> Result<Value, ChannelError> {
        let method = call.method.clone();
        let (sender, receiver) = mpsc::sync_channel(1);
        self.call(call, move |result| {
            let _ = sender.send(result);
        });
        receiver.recv().unwrap_or_else(|_| {
            Err(ChannelError::new(
                ChannelError::UNAVAILABLE,
                format!("map controller dropped `{}`", method),
            ))
        })
    }

    /// Stops the main context after the calls already queued; remaining
    /// roads are released from the surface.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.sender.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("map main context panicked");
            }
        }
    }
}

/// Answers every call with `unavailable` until the controller stops.
fn refuse_all(receiver: mpsc::Receiver<Command>, cause: &str) {
    for command in receiver {
        match command {
            Command::Call(call, reply) => reply(Err(ChannelError::new(
                ChannelError::UNAVAILABLE,
                format!("road manager unavailable for `{}`: {}", call.method, cause),
            ))),
            Command::Shutdown => break,
        }
    }
}

impl Drop for MapController {
    fn drop(&mut self) {
        self.stop();
    }
}
