//! Async particle-count readback.
//!
//! The host asks for a count, the live buffer is copied into a mappable
//! staging buffer, and the count is published once the map callback fires.
//! At most one readback is in flight; a failed map clears the in-flight flag
//! and leaves the previous count in place.

use std::sync::mpsc;

/// One staging buffer plus the channel carrying its map result.
pub(crate) struct CountReadback {
    staging: wgpu::Buffer,
    rx: Option<mpsc::Receiver<Result<(), wgpu::BufferAsyncError>>>,
    count: u32,
    size: u64,
}

impl CountReadback {
    pub fn new(device: &wgpu::Device, cell_count: u32) -> Self {
        let size = cell_count as u64 * std::mem::size_of::<u32>() as u64;
        CountReadback {
            staging: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Particle Count Staging"),
                size,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            rx: None,
            count: 0,
            size,
        }
    }

    /// Copy `src` into the staging buffer and start the async map.
    ///
    /// Returns false (and does nothing) if a readback is already pending.
    pub fn schedule(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, src: &wgpu::Buffer) -> bool {
        if self.rx.is_some() {
            return false;
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Particle Count Copy Encoder"),
        });
        encoder.copy_buffer_to_buffer(src, 0, &self.staging, 0, self.size);
        queue.submit(std::iter::once(encoder.finish()));

        let (tx, rx) = mpsc::channel();
        self.staging
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                let _ = tx.send(result);
            });
        self.rx = Some(rx);
        true
    }

    /// Poll the pending map, if any, and refresh the cached count when the
    /// staging data is ready. Safe to call every frame.
    pub fn poll(&mut self) {
        let Some(rx) = &self.rx else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(())) => {
                {
                    let data = self.staging.slice(..).get_mapped_range();
                    let words: &[u32] = bytemuck::cast_slice(&data);
                    self.count = words.iter().filter(|w| *w & 0xff != 0).count() as u32;
                }
                self.staging.unmap();
                self.rx = None;
            }
            Ok(Err(e)) => {
                // dropped readback: keep the previous count
                log::error!("particle count map failed: {e:?}");
                self.rx = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                log::error!("particle count map channel disconnected - possible device loss");
                self.rx = None;
            }
        }
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.rx.is_some()
    }
}
