// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! System integration module
//!
//! Ties the CPU, memory bus and GPU together, forwards the GPU draw queue
//! to a [`Renderer`] and drives the frame loop.

use std::path::Path;

use super::cpu::CPU;
use super::error::Result;
use super::gpu::{Renderer, GPU};
use super::loader::PsxExecutable;
use super::memory::Bus;

/// PlayStation System
///
/// Owns every emulated component. The GPU lives beside the bus rather than
/// inside it and is lent to each CPU step.
///
/// # Example
/// ```no_run
/// use psxcore::core::system::System;
/// use psxcore::frontend::HeadlessRenderer;
///
/// let mut system = System::new(Box::new(HeadlessRenderer::new()));
/// system.load_bios("SCPH1001.BIN")?;
/// system.run_frame()?;
/// # Ok::<(), psxcore::EmulatorError>(())
/// ```
pub struct System {
    /// CPU instance
    cpu: CPU,
    /// Memory bus
    bus: Bus,
    /// GPU command processor
    gpu: GPU,
    /// Draw command consumer
    renderer: Box<dyn Renderer>,
    /// CPU steps per call to [`System::run_frame`]
    steps_per_frame: u32,
    /// Total instructions executed
    steps: u64,
    /// Frames completed
    frames: u64,
}

impl System {
    /// CPU clock in Hz
    pub const CPU_CLOCK_HZ: u32 = 33_868_800;

    /// One NTSC frame worth of steps at one instruction per cycle
    pub const DEFAULT_STEPS_PER_FRAME: u32 = Self::CPU_CLOCK_HZ / 60;

    /// Create a new System instance
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self {
            cpu: CPU::new(),
            bus: Bus::new(),
            gpu: GPU::new(),
            renderer,
            steps_per_frame: Self::DEFAULT_STEPS_PER_FRAME,
            steps: 0,
            frames: 0,
        }
    }

    /// Load a BIOS image from disk
    ///
    /// # Errors
    ///
    /// See [`Bus::load_bios`].
    pub fn load_bios(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.bus.load_bios(path)
    }

    /// Load a BIOS image from memory
    pub fn load_bios_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.bus.load_bios_bytes(data)
    }

    /// Reset all components
    ///
    /// The loaded BIOS is preserved.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        self.gpu.reset();
        self.steps = 0;
        self.frames = 0;
        log::info!("System reset");
    }

    /// Load a PS-X EXE from disk and point the CPU at it
    ///
    /// Copies the payload to its destination, sets PC and GP, and the
    /// stack and frame pointers when the header carries a stack base.
    ///
    /// # Errors
    ///
    /// I/O errors, [`crate::EmulatorError::InvalidExecutable`] for a
    /// malformed image, or [`crate::EmulatorError::UnmappedAddress`] when
    /// the payload does not fit in RAM.
    pub fn sideload_executable(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let image = std::fs::read(path)?;
        let exe = PsxExecutable::parse(&image)?;
        self.install_executable(&exe)?;

        log::info!(
            "Sideloaded {} ({} bytes at 0x{:08X}, entry 0x{:08X})",
            path.display(),
            exe.data.len(),
            exe.load_address,
            exe.pc
        );
        Ok(())
    }

    /// Copy a parsed executable into RAM and set the start registers
    pub fn install_executable(&mut self, exe: &PsxExecutable) -> Result<()> {
        self.bus.write_ram_slice(exe.load_address, &exe.data)?;

        self.cpu.set_pc(exe.pc);
        self.cpu.set_reg(28, exe.gp);
        if let Some(sp) = exe.initial_sp() {
            self.cpu.set_reg(29, sp);
            self.cpu.set_reg(30, sp);
        }

        log::debug!(
            "Executable registers: PC=0x{:08X} GP=0x{:08X} SP=0x{:08X}",
            exe.pc,
            exe.gp,
            self.cpu.reg(29)
        );
        Ok(())
    }

    /// Execute one CPU instruction
    ///
    /// A DMA interrupt raised by the instruction is reported afterwards.
    ///
    /// # Errors
    ///
    /// Any error from [`CPU::step`]; the session cannot continue.
    pub fn step(&mut self) -> Result<()> {
        self.cpu.step(&mut self.bus, &mut self.gpu)?;
        self.steps += 1;

        if self.bus.dma_mut().take_pending_irq() {
            log::debug!(
                "DMA interrupt pending (DICR=0x{:08X})",
                self.bus.dma().read_interrupt()
            );
        }
        Ok(())
    }

    /// Execute multiple instructions
    ///
    /// Stops at the first error.
    pub fn step_n(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Execute one frame worth of instructions
    ///
    /// Runs [`System::steps_per_frame`] steps, hands the queued draw
    /// commands to the renderer in issue order and presents the frame.
    /// Commands queued before a failing step are still delivered.
    pub fn run_frame(&mut self) -> Result<()> {
        let result = self.step_n(self.steps_per_frame as usize);
        self.flush_commands();
        result?;

        self.renderer.present(&self.gpu.display_state());
        self.frames += 1;
        log::trace!("Frame {} complete ({} steps)", self.frames, self.steps);
        Ok(())
    }

    fn flush_commands(&mut self) {
        for command in self.gpu.drain_commands() {
            self.renderer.submit(&command);
        }
    }

    pub fn steps_per_frame(&self) -> u32 {
        self.steps_per_frame
    }

    /// Set the frame length; zero is clamped to one step
    pub fn set_steps_per_frame(&mut self, steps: u32) {
        self.steps_per_frame = steps.max(1);
    }

    /// Get current PC value
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    /// Total instructions executed since reset
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Frames completed since reset
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn gpu(&self) -> &GPU {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut GPU {
        &mut self.gpu
    }
}
