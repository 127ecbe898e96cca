use std::collections::VecDeque;

use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::core::{AxisDependency, Point, ViewportTransform};
use crate::interaction::ChartEvents;

use super::job::{ViewportJob, ViewportJobKind};
use super::pool::{JobHandle, JobPool, JobPoolConfig};

/// Deferred and animated viewport mutations.
///
/// Jobs wait in `pending` until the content rect is valid. One-shot jobs then
/// run and release their slot; animated jobs move to `running` and advance on
/// every `tick` until their phase reaches 1.
#[derive(Debug, Clone, Default)]
pub struct ViewportJobQueue {
    pool: JobPool<ViewportJob>,
    pending: VecDeque<JobHandle>,
    running: IndexSet<JobHandle>,
}

impl ViewportJobQueue {
    #[must_use]
    pub fn new(config: JobPoolConfig) -> Self {
        Self {
            pool: JobPool::new(config),
            pending: VecDeque::new(),
            running: IndexSet::new(),
        }
    }

    pub fn post_move(&mut self, axis: AxisDependency, value: Point) -> JobHandle {
        self.post(ViewportJob::new(ViewportJobKind::Move { value }, axis, 0))
    }

    pub fn post_zoom(
        &mut self,
        axis: AxisDependency,
        scale_x: f64,
        scale_y: f64,
        value: Point,
    ) -> JobHandle {
        self.post(ViewportJob::new(
            ViewportJobKind::Zoom {
                scale_x,
                scale_y,
                value,
            },
            axis,
            0,
        ))
    }

    pub fn post_animated_move(
        &mut self,
        axis: AxisDependency,
        origin: Point,
        target: Point,
        duration_millis: u64,
    ) -> JobHandle {
        self.post(ViewportJob::new(
            ViewportJobKind::AnimatedMove { origin, target },
            axis,
            duration_millis,
        ))
    }

    pub fn post_animated_zoom(
        &mut self,
        axis: AxisDependency,
        origin_scale: Point,
        target_scale: Point,
        zoom_origin: Point,
        zoom_center: Point,
        duration_millis: u64,
    ) -> JobHandle {
        self.post(ViewportJob::new(
            ViewportJobKind::AnimatedZoom {
                origin_scale,
                target_scale,
                zoom_origin,
                zoom_center,
            },
            axis,
            duration_millis,
        ))
    }

    fn post(&mut self, job: ViewportJob) -> JobHandle {
        let kind = job.kind;
        let handle = self.pool.acquire(job);
        self.pending.push_back(handle);
        debug!(?handle, ?kind, "viewport job posted");
        handle
    }

    /// Runs pending one-shot jobs and starts pending animations. Does nothing
    /// while the content rect is empty.
    pub fn run_pending(&mut self, now_millis: u64, viewport: &mut ViewportTransform) -> ChartEvents {
        let mut events = ChartEvents::new();
        if !viewport.has_content() {
            if !self.pending.is_empty() {
                trace!(pending = self.pending.len(), "viewport jobs wait for content");
            }
            return events;
        }

        while let Some(handle) = self.pending.pop_front() {
            let Some(job) = self.pool.get_mut(handle) else {
                continue;
            };
            if job.kind.is_animated() {
                job.start(now_millis);
                self.running.insert(handle);
                debug!(?handle, duration_millis = job.duration_millis, "viewport animation started");
            } else {
                let job = *job;
                job.run_once(viewport, &mut events);
                self.pool.release(handle);
                debug!(?handle, "viewport job finished");
            }
        }
        events
    }

    /// Advances running animations to `now_millis`. Finished animations are
    /// released.
    pub fn tick(&mut self, now_millis: u64, viewport: &mut ViewportTransform) -> ChartEvents {
        let mut events = ChartEvents::new();
        let mut finished = Vec::new();

        for &handle in &self.running {
            let Some(job) = self.pool.get_mut(handle) else {
                finished.push(handle);
                continue;
            };
            let phase = job.advance(now_millis);
            let job = *job;
            trace!(?handle, phase, "viewport animation step");
            job.apply_phase(phase, viewport, &mut events);
            if phase >= 1.0 {
                job.complete(&mut events);
                finished.push(handle);
            }
        }

        for handle in finished {
            self.running.shift_remove(&handle);
            if self.pool.release(handle).is_some() {
                debug!(?handle, "viewport animation finished");
            }
        }
        events
    }

    /// Drops a pending or running job. Returns `false` for a handle that is
    /// already released.
    pub fn cancel(&mut self, handle: JobHandle) -> bool {
        if self.pool.release(handle).is_none() {
            return false;
        }
        self.pending.retain(|pending| *pending != handle);
        self.running.shift_remove(&handle);
        debug!(?handle, "viewport job cancelled");
        true
    }

    pub fn cancel_all(&mut self) {
        let handles: Vec<_> = self
            .pending
            .drain(..)
            .chain(self.running.drain(..))
            .collect();
        let count = handles.len();
        for handle in handles {
            self.pool.release(handle);
        }
        if count > 0 {
            debug!(count, "viewport jobs cancelled");
        }
    }

    #[must_use]
    pub fn has_work(&self) -> bool {
        !self.pending.is_empty() || !self.running.is_empty()
    }

    #[must_use]
    pub fn has_running_animations(&self) -> bool {
        !self.running.is_empty()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    #[must_use]
    pub fn is_live(&self, handle: JobHandle) -> bool {
        self.pool.is_live(handle)
    }

    #[must_use]
    pub fn phase(&self, handle: JobHandle) -> Option<f64> {
        self.pool.get(handle).map(ViewportJob::phase)
    }

    #[must_use]
    pub fn job(&self, handle: JobHandle) -> Option<&ViewportJob> {
        self.pool.get(handle)
    }

    #[must_use]
    pub fn pool(&self) -> &JobPool<ViewportJob> {
        &self.pool
    }
}
