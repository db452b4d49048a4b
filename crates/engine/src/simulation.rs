//! The device-side simulation: buffers, pipelines, and per-frame recording.
//!
//! Layout per frame: an optional brush-merge pass, then `passes_per_frame`
//! block passes alternating over the ping-pong cell buffers. Every pass slot
//! owns its own uniform buffer and two pre-built bind groups (one per
//! ping-pong direction); a single shared uniform would be overwritten before
//! earlier passes execute on the device.
//!
//! `step` records into the host's encoder and writes the frame's uniforms
//! through the queue; the host must submit that encoder to the same queue
//! before recording the next frame.

use bytemuck::{Pod, Zeroable};

use crate::readback::CountReadback;
use crate::EngineError;

const WORKGROUP_SIZE: u32 = 8;
const BRUSH_WORKGROUP_SIZE: u32 = 256;

/// Per-pass uniform record, mirrored by `Params` in `update_blocks.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct PassUniforms {
    width: u32,
    height: u32,
    offset_x: u32,
    offset_y: u32,
    tick: u32,
    lateral_only: u32,
    _pad0: u32,
    _pad1: u32,
}

pub struct Simulation {
    width: u32,
    height: u32,
    passes_per_frame: u32,
    frame: u32,

    cell_buffers: [wgpu::Buffer; 2],
    pending_buffer: wgpu::Buffer,
    pass_uniforms: Vec<wgpu::Buffer>,
    /// `pass_bind_groups[slot][dir]`: read `cells[dir]`, write `cells[dir ^ 1]`.
    pass_bind_groups: Vec<[wgpu::BindGroup; 2]>,
    /// Brush merge into `cells[i]`, one per ping-pong side.
    brush_bind_groups: [wgpu::BindGroup; 2],

    update_pipeline: wgpu::ComputePipeline,
    brush_pipeline: wgpu::ComputePipeline,

    any_pending: bool,
    readback: CountReadback,
}

impl Simulation {
    /// Allocate buffers, compile pipelines, and pre-build every bind group.
    ///
    /// Fails with `InvalidConfig` for bad dimensions or pass counts and with
    /// `DeviceInitFailure` if the device rejects any resource.
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        passes_per_frame: u32,
    ) -> Result<Self, EngineError> {
        sim::world::validate_config(width, height, passes_per_frame)?;

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let simulation = Self::build(device, width, height, passes_per_frame);

        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());
        if let Some(e) = validation.or(out_of_memory) {
            return Err(EngineError::DeviceInitFailure(e.to_string()));
        }

        log::info!(
            "powder simulation ready: {width}x{height}, {passes_per_frame} passes/frame"
        );
        Ok(simulation)
    }

    fn build(device: &wgpu::Device, width: u32, height: u32, passes_per_frame: u32) -> Self {
        let cell_count = width * height;
        let cell_bytes = cell_count as u64 * std::mem::size_of::<u32>() as u64;

        let cell_buffers = [
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Cells Buffer A"),
                size: cell_bytes,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Cells Buffer B"),
                size: cell_bytes,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        ];

        let pending_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pending Brush Buffer"),
            size: cell_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pass_uniforms: Vec<wgpu::Buffer> = (0..passes_per_frame)
            .map(|i| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("Pass Uniforms {i}")),
                    size: std::mem::size_of::<PassUniforms>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();

        let update_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Block Update Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/update_blocks.wgsl").into()),
        });
        let brush_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Brush Apply Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/apply_brush.wgsl").into()),
        });

        let update_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Block Update Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: false },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let pass_bind_groups: Vec<[wgpu::BindGroup; 2]> = (0..passes_per_frame)
            .map(|slot| {
                let make = |dir: usize| {
                    device.create_bind_group(&wgpu::BindGroupDescriptor {
                        label: Some(&format!("Block Update Bind Group {slot} dir {dir}")),
                        layout: &update_bind_group_layout,
                        entries: &[
                            wgpu::BindGroupEntry {
                                binding: 0,
                                resource: pass_uniforms[slot as usize].as_entire_binding(),
                            },
                            wgpu::BindGroupEntry {
                                binding: 1,
                                resource: cell_buffers[dir].as_entire_binding(),
                            },
                            wgpu::BindGroupEntry {
                                binding: 2,
                                resource: cell_buffers[dir ^ 1].as_entire_binding(),
                            },
                        ],
                    })
                };
                [make(0), make(1)]
            })
            .collect();

        let brush_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Brush Apply Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: false },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: false },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let brush_bind_groups = [0usize, 1].map(|i| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Brush Apply Bind Group {i}")),
                layout: &brush_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: pending_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: cell_buffers[i].as_entire_binding(),
                    },
                ],
            })
        });

        let update_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Block Update Pipeline Layout"),
                bind_group_layouts: &[&update_bind_group_layout],
                push_constant_ranges: &[],
            });
        let update_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Block Update Pipeline"),
            layout: Some(&update_pipeline_layout),
            module: &update_shader,
            entry_point: Some("update_blocks"),
            compilation_options: Default::default(),
            cache: None,
        });

        let brush_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Brush Apply Pipeline Layout"),
            bind_group_layouts: &[&brush_bind_group_layout],
            push_constant_ranges: &[],
        });
        let brush_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Brush Apply Pipeline"),
            layout: Some(&brush_pipeline_layout),
            module: &brush_shader,
            entry_point: Some("apply_brush"),
            compilation_options: Default::default(),
            cache: None,
        });

        let readback = CountReadback::new(device, cell_count);

        Simulation {
            width,
            height,
            passes_per_frame,
            frame: 0,
            cell_buffers,
            pending_buffer,
            pass_uniforms,
            pass_bind_groups,
            brush_bind_groups,
            update_pipeline,
            brush_pipeline,
            any_pending: false,
            readback,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn frame_counter(&self) -> u32 {
        self.frame
    }

    /// Which live buffer the colorizer should read this frame. The pass
    /// count is even, so every completed frame lands back where it started.
    #[inline]
    pub fn current_buffer_index(&self) -> u32 {
        self.frame.wrapping_mul(self.passes_per_frame) % 2
    }

    #[inline]
    pub fn current_cell_buffer(&self) -> &wgpu::Buffer {
        &self.cell_buffers[self.current_buffer_index() as usize]
    }

    /// Stage brush cells into the pending buffer. Out-of-bounds entries are
    /// dropped silently; an entry whose element byte is 0 is an eraser. The
    /// sentinel bit is set here, so hosts pass plain cell words.
    pub fn write_cells(&mut self, queue: &wgpu::Queue, cells: &[(u32, u32, u32)]) {
        for &(x, y, word) in cells {
            if x >= self.width || y >= self.height {
                continue;
            }
            let staged = (word & !sim::PENDING_BIT) | sim::PENDING_BIT;
            let offset = (y * self.width + x) as u64 * std::mem::size_of::<u32>() as u64;
            queue.write_buffer(&self.pending_buffer, offset, bytemuck::bytes_of(&staged));
            self.any_pending = true;
        }
    }

    /// Record one frame: the brush merge (if anything is staged) followed by
    /// the frame's scheduled block passes. Submit the encoder to `queue`
    /// before recording another frame.
    pub fn step(&mut self, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder) {
        if self.any_pending {
            let cur = self.current_buffer_index() as usize;
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("Brush Apply Pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&self.brush_pipeline);
                pass.set_bind_group(0, &self.brush_bind_groups[cur], &[]);
                let cell_count = self.width * self.height;
                pass.dispatch_workgroups(cell_count.div_ceil(BRUSH_WORKGROUP_SIZE), 1, 1);
            }
            self.any_pending = false;
        }

        for (slot, params) in sim::schedule::frame_passes(self.frame, self.passes_per_frame)
            .iter()
            .enumerate()
        {
            let uniforms = PassUniforms {
                width: self.width,
                height: self.height,
                offset_x: params.offset.0,
                offset_y: params.offset.1,
                tick: params.tick,
                lateral_only: params.lateral_only as u32,
                _pad0: 0,
                _pad1: 0,
            };
            queue.write_buffer(
                &self.pass_uniforms[slot],
                0,
                bytemuck::bytes_of(&uniforms),
            );

            let dir = (params.tick % 2) as usize;
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Block Update Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.update_pipeline);
            pass.set_bind_group(0, &self.pass_bind_groups[slot][dir], &[]);
            // extended tiling: one thread per block, orphan edges included
            let nbx = (self.width + params.offset.0 + 1) / 2;
            let nby = (self.height + params.offset.1 + 1) / 2;
            pass.dispatch_workgroups(
                nbx.div_ceil(WORKGROUP_SIZE),
                nby.div_ceil(WORKGROUP_SIZE),
                1,
            );
        }

        self.frame = self.frame.wrapping_add(1);
    }

    /// Zero both live buffers and the pending buffer; restart the frame
    /// counter.
    pub fn clear(&mut self, encoder: &mut wgpu::CommandEncoder) {
        encoder.clear_buffer(&self.cell_buffers[0], 0, None);
        encoder.clear_buffer(&self.cell_buffers[1], 0, None);
        encoder.clear_buffer(&self.pending_buffer, 0, None);
        self.any_pending = false;
        self.frame = 0;
    }

    /// Kick off an async copy of the live buffer for counting. No-op if a
    /// readback is already in flight; returns whether one was started.
    pub fn request_particle_count(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> bool {
        let index = self.current_buffer_index() as usize;
        self.readback
            .schedule(device, queue, &self.cell_buffers[index])
    }

    /// The most recently completed count (0 until the first readback lands).
    /// Polls the in-flight readback, so call it after the device has had a
    /// chance to finish the copy.
    pub fn particle_count(&mut self) -> u32 {
        self.readback.poll();
        self.readback.count()
    }

    /// True while a count copy is in flight.
    pub fn readback_pending(&self) -> bool {
        self.readback.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_the_shader_struct() {
        // Params in update_blocks.wgsl is eight u32s
        assert_eq!(std::mem::size_of::<PassUniforms>(), 32);
    }
}
