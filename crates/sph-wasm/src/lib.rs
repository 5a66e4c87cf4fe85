use bytemuck::Zeroable;
use glam::Vec3;
use sph_core::palette::speed_color;
use sph_core::{Arrangement, Dimension, FluidSimulation, PointerMode, PointerParams};
use wasm_bindgen::prelude::*;

/// GPU-compatible particle struct: 32 bytes, matches WGSL FluidParticle
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuParticle {
    position: [f32; 4], // xyz + point size
    color: [f32; 4],    // speed gradient, rgba
}

fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

fn arrangement_from(kind: u32, seed: u32) -> Arrangement {
    match kind {
        1 => Arrangement::Random { seed: seed as u64 },
        2 => Arrangement::Circle,
        _ => Arrangement::Grid,
    }
}

#[wasm_bindgen]
pub struct FluidWorld {
    sim: FluidSimulation,
    gpu_buffer: Vec<GpuParticle>,
}

#[wasm_bindgen]
impl FluidWorld {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FluidWorld {
        log("WASM FluidWorld created");
        FluidWorld {
            sim: FluidSimulation::default(),
            gpu_buffer: Vec::new(),
        }
    }

    /// `arrangement`: 0 = grid, 1 = random (seeded), 2 = circle.
    /// Returns false and leaves the world empty when the input is rejected.
    #[wasm_bindgen]
    pub fn initialize(
        &mut self,
        particle_count: usize,
        arrangement: u32,
        seed: u32,
        bound_x: f32,
        bound_y: f32,
        bound_z: f32,
    ) -> bool {
        let result = self.sim.initialize(
            particle_count,
            arrangement_from(arrangement, seed),
            Vec3::new(bound_x, bound_y, bound_z),
        );
        self.write_gpu_output();
        match result {
            Ok(()) => {
                log(&format!("FluidWorld initialized: {} particles", particle_count));
                true
            }
            Err(err) => {
                log(&format!("FluidWorld initialize failed: {}", err));
                false
            }
        }
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) -> bool {
        let ok = self.sim.reset().is_ok();
        self.write_gpu_output();
        ok
    }

    /// Advance one step and return the elapsed wall time in milliseconds.
    #[wasm_bindgen]
    pub fn step(&mut self, dt: f32) -> f32 {
        let start = js_sys::Date::now();
        self.sim.update(dt);
        self.write_gpu_output();
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_ptr(&self) -> *const f32 {
        self.gpu_buffer.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_byte_length(&self) -> usize {
        bytemuck::cast_slice::<GpuParticle, u8>(&self.gpu_buffer).len()
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.sim.particle_count()
    }

    #[wasm_bindgen]
    pub fn simulation_time(&self) -> f32 {
        self.sim.simulation_time()
    }

    #[wasm_bindgen]
    pub fn set_fluid_config(
        &mut self,
        target_density: f32,
        pressure_multiplier: f32,
        near_pressure_multiplier: f32,
        viscosity_strength: f32,
    ) -> bool {
        self.sim.set_pressure_multiplier(pressure_multiplier);
        self.sim.set_near_pressure_multiplier(near_pressure_multiplier);
        self.sim.set_viscosity_strength(viscosity_strength);
        self.sim.set_target_density(target_density).is_ok()
    }

    #[wasm_bindgen]
    pub fn set_interaction_radius(&mut self, radius: f32) -> bool {
        self.sim.set_interaction_radius(radius).is_ok()
    }

    #[wasm_bindgen]
    pub fn set_bounds(&mut self, x: f32, y: f32, z: f32, collision_damping: f32) -> bool {
        self.sim.set_collision_damping(collision_damping);
        self.sim.set_bound_size(Vec3::new(x, y, z)).is_ok()
    }

    #[wasm_bindgen]
    pub fn set_gravity(&mut self, enabled: bool, scale: f32) {
        self.sim.set_gravity_enabled(enabled);
        self.sim.set_gravity_scale(scale);
    }

    /// Applied on the next `initialize` or `reset`.
    #[wasm_bindgen]
    pub fn set_two_dimensional(&mut self, two_dimensional: bool) {
        self.sim.set_dimension(if two_dimensional {
            Dimension::Two
        } else {
            Dimension::Three
        });
    }

    /// `mode`: 0 = attract, 1 = repel.
    #[wasm_bindgen]
    pub fn set_pointer(
        &mut self,
        active: bool,
        mode: u32,
        x: f32, y: f32, z: f32,
        strength: f32,
        radius: f32,
    ) {
        self.sim.set_pointer(PointerParams {
            active,
            mode: if mode == 1 { PointerMode::Repel } else { PointerMode::Attract },
            position: Vec3::new(x, y, z),
            strength,
            radius,
        });
    }
}

impl Default for FluidWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl FluidWorld {
    fn write_gpu_output(&mut self) {
        let count = self.sim.particle_count();
        self.gpu_buffer.resize(count, GpuParticle::zeroed());
        let output = self.sim.output_positions();
        for (i, gpu) in self.gpu_buffer.iter_mut().enumerate() {
            *gpu = GpuParticle {
                position: output[i].to_array(),
                color: speed_color(self.sim.normalized_speed(i)).to_array(),
            };
        }
    }
}
