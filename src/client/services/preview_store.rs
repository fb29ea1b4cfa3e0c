use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use iced::widget::{image, svg};
use log::debug;
use uuid::Uuid;

use crate::client::models::upload::UploadFile;

/// Owning reference to a preview image held by a [`PreviewStore`].
///
/// Not `Clone`: the only way to give it up is [`PreviewStore::release`],
/// which consumes it, so a preview cannot be released twice.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PreviewHandle(Uuid);

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// Running totals, shared so callers can check for leaks after the store is gone.
#[derive(Debug, Default)]
pub struct PreviewStats {
    created: AtomicUsize,
    released: AtomicUsize,
}

impl PreviewStats {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.created() - self.released()
    }
}

/// Preview content: SVG goes to the svg widget, everything else to the image widget.
#[derive(Debug, Clone)]
pub enum Preview {
    Raster(image::Handle),
    Vector(svg::Handle),
}

impl Preview {
    fn for_file(file: &UploadFile) -> Self {
        if file.mime_type() == "image/svg+xml" {
            Preview::Vector(svg::Handle::from_memory(file.bytes().to_vec()))
        } else {
            Preview::Raster(image::Handle::from_memory(file.bytes().to_vec()))
        }
    }
}

#[derive(Debug, Default)]
pub struct PreviewStore {
    images: HashMap<Uuid, Preview>,
    stats: Arc<PreviewStats>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, file: &UploadFile) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.images.insert(id, Preview::for_file(file));
        self.stats.created.fetch_add(1, Ordering::SeqCst);
        debug!("preview {} created for {}", id, file.name());
        PreviewHandle(id)
    }

    pub fn release(&mut self, handle: PreviewHandle) {
        if self.images.remove(&handle.0).is_some() {
            self.stats.released.fetch_add(1, Ordering::SeqCst);
            debug!("preview {} released", handle.0);
        }
    }

    pub fn image(&self, handle: &PreviewHandle) -> Option<&Preview> {
        self.images.get(&handle.0)
    }

    pub fn live(&self) -> usize {
        self.images.len()
    }

    pub fn stats(&self) -> Arc<PreviewStats> {
        self.stats.clone()
    }
}
