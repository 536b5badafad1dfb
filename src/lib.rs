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

//! psxcore: PlayStation (PSX) core emulation
//!
//! This crate emulates the four tightly coupled parts of the PlayStation that
//! define whether software runs correctly: the R3000A CPU, the memory bus with
//! its address decoding, the DMA engine and the GPU command processor.
//!
//! # Architecture
//!
//! - [`core`]: Emulated hardware (CPU, memory bus, DMA, GPU, loader, system)
//! - [`config`]: Runtime configuration (TOML file, environment, CLI)
//! - [`frontend`]: Renderer collaborators shipped with the crate
//!
//! # Example
//!
//! ```no_run
//! use psxcore::core::system::System;
//! use psxcore::frontend::HeadlessRenderer;
//!
//! let mut system = System::new(Box::new(HeadlessRenderer::new()));
//! system.load_bios("SCPH1001.BIN")?;
//! system.run_frame()?;
//! # Ok::<(), psxcore::core::error::EmulatorError>(())
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an alias for
//! `Result<T, EmulatorError>`. Every error value is a fatal emulation stop;
//! defined hardware quirks and accesses to unimplemented peripherals never surface
//! as errors.

pub mod config;
pub mod core;
pub mod frontend;

// Re-export commonly used types
pub use core::error::{EmulatorError, Result};
