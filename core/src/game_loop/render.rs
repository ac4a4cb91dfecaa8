//! Redraw requests
//!
//! The loop never draws. Each owed frame hands the latest simulation
//! snapshot to a [`RenderSink`]; the renderer reads it on its own schedule.

use tokio::sync::watch;

pub trait RenderSink<S> {
    fn request_redraw(&mut self, frame: u64, snapshot: S);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame<S> {
    pub number: u64,
    pub snapshot: S,
}

/// Latest-frame handoff to a renderer on another thread
#[derive(Debug)]
pub struct WatchRenderSink<S> {
    tx: watch::Sender<Option<Frame<S>>>,
}

pub fn render_channel<S>() -> (WatchRenderSink<S>, watch::Receiver<Option<Frame<S>>>) {
    let (tx, rx) = watch::channel(None);
    (WatchRenderSink { tx }, rx)
}

impl<S> RenderSink<S> for WatchRenderSink<S> {
    fn request_redraw(&mut self, frame: u64, snapshot: S) {
        self.tx.send_replace(Some(Frame {
            number: frame,
            snapshot,
        }));
    }
}

/// Sink that only counts requests
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingSink {
    pub requests: u64,
    pub last_frame: u64,
}

impl<S> RenderSink<S> for CountingSink {
    fn request_redraw(&mut self, frame: u64, _snapshot: S) {
        self.requests += 1;
        self.last_frame = frame;
    }
}
