//! Background asset loading with pollable handles.
//!
//! A load runs on its own thread and reports back through a channel. The frame
//! loop polls the handle each frame and installs the result once it resolves,
//! so a slow or failing load never stalls rendering.

mod model;
mod texture;

pub use model::{compute_normals, load_gltf, MeshVertex, ModelData};
pub use texture::{load_texture, TextureData};

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::error::AssetError;

/// Where a load currently stands
#[derive(Debug)]
pub enum AssetState<T> {
    Pending,
    Ready(T),
    Failed(AssetError),
    /// Result already handed to the owner
    Taken,
}

/// Non-blocking handle to an asset loading in the background
pub struct AssetHandle<T> {
    label: String,
    receiver: Option<Receiver<Result<T, AssetError>>>,
    state: AssetState<T>,
}

impl<T: Send + 'static> AssetHandle<T> {
    /// Run `loader` on a background thread
    pub fn spawn<F>(label: impl Into<String>, loader: F) -> Self
    where
        F: FnOnce() -> Result<T, AssetError> + Send + 'static,
    {
        let label = label.into();
        let (sender, receiver) = mpsc::channel();

        let thread_label = label.clone();
        let spawned = thread::Builder::new()
            .name(format!("load-{}", label))
            .spawn(move || {
                log::debug!("Loading {}", thread_label);
                // Receiver may be gone if the app already exited
                let _ = sender.send(loader());
            });

        let mut handle = Self::from_receiver(label, receiver);
        if let Err(e) = spawned {
            handle.receiver = None;
            handle.state = AssetState::Failed(AssetError::Io(e));
        }
        handle
    }
}

impl<T> AssetHandle<T> {
    /// Wrap an existing result channel
    pub fn from_receiver(
        label: impl Into<String>,
        receiver: Receiver<Result<T, AssetError>>,
    ) -> Self {
        Self {
            label: label.into(),
            receiver: Some(receiver),
            state: AssetState::Pending,
        }
    }

    /// Check for a delivered result without blocking
    pub fn poll(&mut self) -> &AssetState<T> {
        let received = match &self.receiver {
            Some(receiver) => receiver.try_recv(),
            None => return &self.state,
        };

        match received {
            Ok(Ok(asset)) => {
                log::info!("Loaded {}", self.label);
                self.state = AssetState::Ready(asset);
            }
            Ok(Err(e)) => {
                log::warn!("Failed to load {}: {}", self.label, e);
                self.state = AssetState::Failed(e);
            }
            Err(TryRecvError::Empty) => return &self.state,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Loader for {} stopped without a result", self.label);
                self.state = AssetState::Failed(AssetError::Disconnected);
            }
        }
        self.receiver = None;
        &self.state
    }

    pub fn is_pending(&mut self) -> bool {
        matches!(self.poll(), AssetState::Pending)
    }

    /// Take the resolved outcome once; `None` while pending and after taking
    pub fn take(&mut self) -> Option<Result<T, AssetError>> {
        if matches!(self.poll(), AssetState::Pending | AssetState::Taken) {
            return None;
        }
        match std::mem::replace(&mut self.state, AssetState::Taken) {
            AssetState::Ready(asset) => Some(Ok(asset)),
            AssetState::Failed(e) => Some(Err(e)),
            AssetState::Pending | AssetState::Taken => None,
        }
    }
}
