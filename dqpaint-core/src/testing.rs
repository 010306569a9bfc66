//! Recording fakes shared by the unit tests.

use crate::memory::MemoryMesh;
use crate::progress::ProgressSink;
use crate::store::{MeshStore, StoreError};
use glam::Vec4;
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListChannels,
    Create(String),
    Delete(String),
    SetActive(String),
    Write(Vec<u32>),
    SetVisible(bool),
}

/// A [`MemoryMesh`] that records every store call.
pub struct RecordingMesh {
    pub inner: MemoryMesh,
    calls: RefCell<Vec<Call>>,
    /// Zero-based write call that fails with a backend error.
    pub fail_write: Option<usize>,
    writes: usize,
}

impl RecordingMesh {
    pub fn new(vertex_count: usize) -> Self {
        Self::wrap(MemoryMesh::new("recorded", vertex_count))
    }

    pub fn wrap(inner: MemoryMesh) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
            fail_write: None,
            writes: 0,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn writes(&self) -> Vec<Vec<u32>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Write(indices) => Some(indices.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl MeshStore for RecordingMesh {
    fn channel_names(&self) -> Vec<String> {
        self.record(Call::ListChannels);
        self.inner.channel_names()
    }

    fn create_channel(&mut self, name: &str) -> Result<(), StoreError> {
        self.record(Call::Create(name.to_string()));
        self.inner.create_channel(name)
    }

    fn delete_channel(&mut self, name: &str) -> Result<(), StoreError> {
        self.record(Call::Delete(name.to_string()));
        self.inner.delete_channel(name)
    }

    fn set_active_channel(&mut self, name: &str) -> Result<(), StoreError> {
        self.record(Call::SetActive(name.to_string()));
        self.inner.set_active_channel(name)
    }

    fn write_colors(&mut self, indices: &[u32], colors: &[Vec4]) -> Result<(), StoreError> {
        self.record(Call::Write(indices.to_vec()));
        let call = self.writes;
        self.writes += 1;
        if self.fail_write == Some(call) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        self.inner.write_colors(indices, colors)
    }

    fn set_channel_visible(&mut self, visible: bool) -> Result<(), StoreError> {
        self.record(Call::SetVisible(visible));
        self.inner.set_channel_visible(visible)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin(usize),
    Report(usize, usize),
    End,
}

/// Records progress events and cancels after a set number of reports.
#[derive(Debug, Default)]
pub struct ScriptedProgress {
    pub events: Vec<Event>,
    pub cancel_after: Option<usize>,
    reports: usize,
}

impl ScriptedProgress {
    pub fn cancel_after(reports: usize) -> Self {
        Self {
            cancel_after: Some(reports),
            ..Self::default()
        }
    }
}

impl ProgressSink for ScriptedProgress {
    fn begin(&mut self, max: usize) {
        self.events.push(Event::Begin(max));
    }

    fn report(&mut self, current: usize, max: usize) {
        self.reports += 1;
        self.events.push(Event::Report(current, max));
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_after.is_some_and(|n| self.reports >= n)
    }

    fn end(&mut self) {
        self.events.push(Event::End);
    }
}
