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

//! Core emulation components
//!
//! | Module     | Hardware                                   |
//! |------------|--------------------------------------------|
//! | [`cpu`]    | MIPS R3000A CPU and coprocessor 0          |
//! | [`memory`] | Memory bus, address decoding, regions      |
//! | [`dma`]    | 7-channel DMA controller                   |
//! | [`gpu`]    | GPU command processor (GP0/GP1)            |
//! | [`loader`] | PS-X EXE executable parsing                |
//! | [`system`] | Orchestrator owning CPU, bus, GPU          |

pub mod bits;
pub mod cpu;
pub mod dma;
pub mod error;
pub mod gpu;
pub mod loader;
pub mod memory;
pub mod system;

pub use cpu::CPU;
pub use gpu::GPU;
pub use memory::Bus;
