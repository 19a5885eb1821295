use std::sync::Arc;
use std::time::Duration;

use crate::backend::{Backend, BufferRequest};
use crate::error::{AcquireError, AllocationError};
use crate::math::Matrix4;
use crate::sync::TokenPool;

use super::lease::{CancelHandle, InFlightLease, SlotHandle};

/// Triple buffering unless configured otherwise.
pub const DEFAULT_INFLIGHT_COUNT: usize = 3;

/// Byte offset of the model-view matrix inside a slot.
pub const MODEL_VIEW_OFFSET: u64 = 0;

/// Byte offset of the projection matrix inside a slot.
///
/// Derived from the matrix size so it follows the documented `Matrix4` layout.
pub const PROJECTION_OFFSET: u64 = MODEL_VIEW_OFFSET + Matrix4::BYTE_SIZE;

/// Smallest valid slot: model-view + projection, no padding.
pub const MIN_SLOT_SIZE: u64 = 2 * Matrix4::BYTE_SIZE;

/// Fixed ring of N uniform slots guarded by an N-token pool.
///
/// Ordering: slots are handed out strictly round-robin (`0, 1, …, N-1, 0, …`).
/// A slot index is only handed out again after a token came back, and tokens
/// only come back when a submission completes, so the data in a slot is never
/// overwritten while the GPU may still read it.
///
/// Dropping the provider closes its pool. Nothing can be waiting on `&mut self`
/// at that point, but leases still in flight release into the closed pool
/// harmlessly.
pub struct BufferProvider<B: Backend> {
    slots: Vec<B::Buffer>,
    next: usize,
    slot_size: u64,
    pool: Arc<TokenPool>,
}

impl<B: Backend> BufferProvider<B> {
    /// Allocates `inflight_count` CPU-writable slots of `slot_size` bytes.
    ///
    /// Panics if `inflight_count == 0` or `slot_size < MIN_SLOT_SIZE`.
    pub fn new(
        backend: &B,
        label: &str,
        inflight_count: usize,
        slot_size: u64,
    ) -> Result<Self, AllocationError> {
        assert!(inflight_count > 0, "BufferProvider needs at least one slot");
        assert!(
            slot_size >= MIN_SLOT_SIZE,
            "uniform slot of {slot_size} bytes cannot hold two matrices ({MIN_SLOT_SIZE} bytes)"
        );

        let slots = (0..inflight_count)
            .map(|i| {
                let slot_label = format!("{label} uniforms #{i}");
                backend.allocate_buffer(&BufferRequest::uniform(&slot_label, slot_size))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("{label}: allocated {inflight_count} uniform slots of {slot_size} bytes");

        Ok(Self {
            slots,
            next: 0,
            slot_size,
            pool: Arc::new(TokenPool::new(inflight_count)),
        })
    }

    /// Blocks until a slot is free, then hands out the slot at the cursor.
    ///
    /// Waits indefinitely. Returns [`AcquireError::Closed`] only if the
    /// provider was cancelled through a [`CancelHandle`].
    pub fn acquire_next_slot(&mut self) -> Result<SlotHandle, AcquireError> {
        self.pool.acquire()?;
        Ok(self.hand_out())
    }

    /// Like [`acquire_next_slot`](Self::acquire_next_slot) but gives up after
    /// `timeout` with [`AcquireError::Timeout`].
    pub fn acquire_next_slot_timeout(&mut self, timeout: Duration) -> Result<SlotHandle, AcquireError> {
        self.pool.acquire_timeout(timeout)?;
        Ok(self.hand_out())
    }

    fn hand_out(&mut self) -> SlotHandle {
        let index = self.next;
        self.next = (self.next + 1) % self.slots.len();
        log::trace!("uniform slot {index} acquired ({} free)", self.pool.available());

        SlotHandle {
            index,
            lease: InFlightLease::new(Arc::clone(&self.pool)),
        }
    }

    /// Writes `model_view` at offset 0 and `projection` right after it.
    pub fn write_uniforms(
        &self,
        backend: &B,
        handle: &SlotHandle,
        model_view: &Matrix4,
        projection: &Matrix4,
    ) {
        let slot = self.slot(handle);
        backend.write_buffer(slot, MODEL_VIEW_OFFSET, model_view.as_bytes());
        backend.write_buffer(slot, PROJECTION_OFFSET, projection.as_bytes());
    }

    /// Returns the slot's token immediately.
    ///
    /// Normally the lease travels with the submission instead and is released
    /// by its completion callback.
    pub fn release_slot(&self, handle: SlotHandle) {
        log::trace!("uniform slot {} released", handle.index);
        handle.into_lease().release();
    }

    /// Device buffer behind `handle`.
    pub fn slot(&self, handle: &SlotHandle) -> &B::Buffer {
        debug_assert!(
            handle.lease.belongs_to(&self.pool),
            "slot handle belongs to a different BufferProvider"
        );
        &self.slots[handle.index]
    }

    #[inline]
    pub fn inflight_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slot_size(&self) -> u64 {
        self.slot_size
    }

    /// Index the next acquisition will return.
    #[inline]
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Slots not claimed by an unfinished submission.
    pub fn available_slots(&self) -> usize {
        self.pool.available()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            pool: Arc::clone(&self.pool),
        }
    }
}

impl<B: Backend> Drop for BufferProvider<B> {
    fn drop(&mut self) {
        self.pool.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use std::sync::mpsc;
    use std::thread;

    const SETTLE: Duration = Duration::from_millis(50);

    fn provider(backend: &RecordingBackend, n: usize) -> BufferProvider<RecordingBackend> {
        BufferProvider::new(backend, "test", n, MIN_SLOT_SIZE).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn allocates_one_buffer_per_slot() {
        let backend = RecordingBackend::new();
        let p = provider(&backend, 3);
        assert_eq!(p.inflight_count(), 3);
        assert_eq!(p.available_slots(), 3);
        assert_eq!(backend.allocated_bytes(), 3 * 128);
    }

    #[test]
    fn allocation_failure_propagates() {
        let backend = RecordingBackend::with_memory_limit(2 * MIN_SLOT_SIZE);
        let err = BufferProvider::new(&backend, "node", 3, MIN_SLOT_SIZE).err().unwrap();
        assert_eq!(err.label, "node uniforms #2");
    }

    #[test]
    #[should_panic(expected = "cannot hold two matrices")]
    fn undersized_slot_panics() {
        let backend = RecordingBackend::new();
        let _ = BufferProvider::new(&backend, "node", 3, 31 * 4);
    }

    #[test]
    #[should_panic(expected = "at least one slot")]
    fn zero_inflight_count_panics() {
        let backend = RecordingBackend::new();
        let _ = BufferProvider::new(&backend, "node", 0, MIN_SLOT_SIZE);
    }

    // ── rotation ──────────────────────────────────────────────────────────

    #[test]
    fn slots_rotate_round_robin() {
        let backend = RecordingBackend::new();
        let mut p = provider(&backend, 3);

        let mut order = Vec::new();
        for _ in 0..7 {
            let h = p.acquire_next_slot().unwrap();
            order.push(h.index());
            p.release_slot(h);
        }
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn fourth_acquire_blocks_until_a_release() {
        let backend = RecordingBackend::new();
        let mut p = provider(&backend, 3);

        let handles: Vec<_> = (0..3).map(|_| p.acquire_next_slot().unwrap()).collect();
        assert_eq!(handles.iter().map(SlotHandle::index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(p.available_slots(), 0);

        let leases: Vec<_> = handles.into_iter().map(SlotHandle::into_lease).collect();
        let (tx, rx) = mpsc::channel();
        let waiter = thread::spawn(move || {
            let h = p.acquire_next_slot().unwrap();
            tx.send(h.index()).unwrap();
            (p, h)
        });

        assert!(rx.recv_timeout(SETTLE).is_err(), "fourth acquire did not block");

        let mut leases = leases.into_iter();
        leases.next().unwrap().release();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 0);
        let (p, h) = waiter.join().unwrap();
        assert_eq!(p.next_index(), 1);

        p.release_slot(h);
        leases.for_each(InFlightLease::release);
        assert_eq!(p.available_slots(), 3);
    }

    #[test]
    fn end_to_end_acquire_release_scenario() {
        let backend = RecordingBackend::new();
        let mut p = provider(&backend, 3);

        let a = p.acquire_next_slot().unwrap();
        let b = p.acquire_next_slot().unwrap();
        let c = p.acquire_next_slot().unwrap();
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));

        p.release_slot(a);
        let again = p.acquire_next_slot().unwrap();
        assert_eq!(again.index(), 0);

        // No token left: a bounded attempt must time out rather than succeed.
        let waited = Duration::from_millis(20);
        assert_eq!(
            p.acquire_next_slot_timeout(waited).unwrap_err(),
            AcquireError::Timeout { waited }
        );

        let cancel = p.cancel_handle();
        let (tx, rx) = mpsc::channel();
        let waiter = thread::spawn(move || {
            let r = p.acquire_next_slot().map(|h| h.index());
            tx.send(()).unwrap();
            (p, r)
        });
        assert!(rx.recv_timeout(SETTLE).is_err(), "acquire without a release did not block");

        b.into_lease().release();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let (_p, r) = waiter.join().unwrap();
        assert_eq!(r, Ok(1));

        drop(c);
        drop(again);
        assert!(!cancel.is_cancelled());
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn uniform_layout_round_trip() {
        let backend = RecordingBackend::new();
        let mut p = provider(&backend, 3);

        let mut model = Matrix4::identity();
        model.translate(1.0, 2.0, 3.0).rotate(0.4, 0.5, 0.6);
        let projection = Matrix4::perspective(1.2, 1.5, 0.1, 50.0);

        let h = p.acquire_next_slot().unwrap();
        p.write_uniforms(&backend, &h, &model, &projection);

        let slot = p.slot(&h);
        assert_eq!(slot.read_matrix(0).raw(), model.raw());
        assert_eq!(slot.read_matrix(64).raw(), projection.raw());
        assert_eq!(slot.read(0, 64), model.as_bytes());
        assert_eq!(slot.read(64, 64), projection.as_bytes());
        p.release_slot(h);
    }

    #[test]
    fn slot_is_never_overwritten_while_in_flight() {
        let backend = RecordingBackend::new();
        let mut p = provider(&backend, 3);

        // Simulated GPU: verifies each slot still holds the bytes written for
        // its acquisition, then completes it.
        let (tx, rx) = mpsc::channel::<(usize, crate::backend::RecordedBuffer, Vec<u8>, InFlightLease)>();
        let gpu = thread::spawn(move || {
            let mut checked = 0;
            for (frame, slot, expected, lease) in rx {
                thread::sleep(Duration::from_micros(((frame * 7) % 5) as u64 * 200));
                assert_eq!(slot.read(0, MIN_SLOT_SIZE as usize), expected, "frame {frame} corrupted");
                lease.release();
                checked += 1;
            }
            checked
        });

        let projection = Matrix4::perspective(1.0, 1.0, 0.1, 10.0);
        for frame in 0..60usize {
            let h = p.acquire_next_slot().unwrap();
            let model = Matrix4::from_translation(frame as f32, 0.0, 0.0);
            p.write_uniforms(&backend, &h, &model, &projection);

            let slot = p.slot(&h).clone();
            let expected = slot.read(0, MIN_SLOT_SIZE as usize);
            assert_eq!(slot.read_matrix(0), model);
            tx.send((frame, slot, expected, h.into_lease())).unwrap();
        }
        drop(tx);

        assert_eq!(gpu.join().unwrap(), 60);
        assert_eq!(p.available_slots(), 3);
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn dropped_lease_returns_token() {
        let backend = RecordingBackend::new();
        let mut p = provider(&backend, 1);
        let h = p.acquire_next_slot().unwrap();
        drop(h);
        assert_eq!(p.available_slots(), 1);
        assert_eq!(p.acquire_next_slot().unwrap().index(), 0);
    }

    #[test]
    fn cancel_wakes_blocked_acquire() {
        let backend = RecordingBackend::new();
        let mut p = provider(&backend, 1);
        let held = p.acquire_next_slot().unwrap();
        let cancel = p.cancel_handle();

        let waiter = thread::spawn(move || {
            let r = p.acquire_next_slot().map(|h| h.index());
            (p, r)
        });
        thread::sleep(SETTLE);
        cancel.cancel();

        let (_p, r) = waiter.join().unwrap();
        assert_eq!(r, Err(AcquireError::Closed));
        drop(held);
    }

    #[test]
    fn lease_outliving_provider_is_harmless() {
        let backend = RecordingBackend::new();
        let mut p = provider(&backend, 2);
        let lease = p.acquire_next_slot().unwrap().into_lease();
        let cancel = p.cancel_handle();
        drop(p);
        assert!(cancel.is_cancelled());
        lease.release();
    }
}
