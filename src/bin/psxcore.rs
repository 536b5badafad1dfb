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

//! psxcore command-line runner
//!
//! Boots a BIOS, optionally sideloads a PS-X EXE, and runs frames against
//! the headless renderer until a frame limit or a fatal error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use psxcore::config::Config;
use psxcore::core::system::System;
use psxcore::frontend::HeadlessRenderer;

#[derive(Parser)]
#[command(version, about = "PlayStation core emulator (headless)", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// BIOS image (512KB)
    #[arg(long, value_name = "FILE")]
    bios: Option<PathBuf>,

    /// PS-X EXE to sideload after the BIOS is in place
    #[arg(long, value_name = "FILE")]
    exe: Option<PathBuf>,

    /// Stop after N frames
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// Default log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Resolve configuration: CLI > environment > file > defaults
    fn resolve(&self) -> psxcore::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.apply_env()?;

        if let Some(bios) = &self.bios {
            config.bios_path = Some(bios.clone());
        }
        if let Some(exe) = &self.exe {
            config.exe_path = Some(exe.clone());
        }
        if let Some(frames) = self.frames {
            config.max_frames = Some(frames);
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("psxcore: {}", e);
            return ExitCode::from(2);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn run(config: &Config) -> Result<(), ()> {
    let Some(bios_path) = &config.bios_path else {
        log::error!(
            "No BIOS given (use --bios, {} or bios_path in the config file)",
            Config::ENV_BIOS
        );
        return Err(());
    };

    let mut system = System::new(Box::new(HeadlessRenderer::new()));
    system.set_steps_per_frame(config.steps_per_frame);

    system.load_bios(bios_path).map_err(|e| {
        log::error!("Failed to load BIOS: {}", e);
    })?;

    if let Some(exe_path) = &config.exe_path {
        system.sideload_executable(exe_path).map_err(|e| {
            log::error!("Failed to sideload {}: {}", exe_path.display(), e);
        })?;
    }

    log::info!(
        "Running {} steps per frame{}",
        system.steps_per_frame(),
        config
            .max_frames
            .map(|n| format!(", {} frames", n))
            .unwrap_or_default()
    );

    while config.max_frames.is_none_or(|max| system.frames() < max) {
        if let Err(e) = system.run_frame() {
            log::error!(
                "Emulation stopped after {} instructions: {}",
                system.steps(),
                e
            );
            if config.dump_registers_on_error {
                log::error!("CPU state:\n{}", system.cpu().dump_registers());
            }
            return Err(());
        }
    }

    log::info!(
        "Finished {} frames ({} instructions, PC=0x{:08X})",
        system.frames(),
        system.steps(),
        system.pc()
    );
    Ok(())
}
