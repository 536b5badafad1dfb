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

//! GPU command-stream scenario tests

use super::*;
use crate::core::error::EmulatorError;
use proptest::prelude::*;

#[test]
fn test_new_gpu_is_idle_with_ready_bits() {
    let gpu = GPU::new();
    assert_eq!(gpu.gp0_state(), Gp0State::Idle);
    assert_eq!(gpu.status(), 0x1C00_0000);
    assert_eq!(gpu.read_gpuread(), 0);
    assert_eq!(gpu.pending_commands(), 0);
}

#[test]
fn test_quad_dispatches_on_fifth_word() {
    let mut gpu = GPU::new();
    let words = [0x2800_00FF, 0x0000_0000, 0x0000_0010, 0x0010_0000, 0x0010_0010];

    for (i, &word) in words.iter().enumerate().take(4) {
        gpu.write_gp0(word).unwrap();
        assert_eq!(gpu.gp0_state(), Gp0State::BufferingParams, "after word {}", i);
        assert_eq!(gpu.pending_commands(), 0);
    }

    gpu.write_gp0(words[4]).unwrap();
    assert_eq!(gpu.gp0_state(), Gp0State::Idle);
    assert_eq!(gpu.pending_commands(), 2, "quad becomes two triangles");
}

#[test]
fn test_parameter_words_are_not_decoded_as_opcodes() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0x2000_0000).unwrap();
    // 0xE5 as a vertex must not touch the drawing offset
    gpu.write_gp0(0xE500_0005).unwrap();
    gpu.write_gp0(0x0000_0000).unwrap();
    gpu.write_gp0(0x0000_0000).unwrap();

    assert_eq!(gpu.drawing_offset(), (0, 0));
    assert_eq!(gpu.pending_commands(), 1);
}

#[test]
fn test_commands_drain_in_order() {
    let mut gpu = GPU::new();
    for word in [0x0200_0000, 0x0000_0000, 0x0001_0010] {
        gpu.write_gp0(word).unwrap();
    }
    for word in [0x2000_0000, 0x0000_0000, 0x0000_0000, 0x0000_0000] {
        gpu.write_gp0(word).unwrap();
    }

    let commands = gpu.drain_commands();
    assert!(matches!(
        commands.as_slice(),
        [DrawCommand::FillRect(_), DrawCommand::Triangle(_)]
    ));
    assert!(gpu.drain_commands().is_empty());
}

#[test]
fn test_unknown_opcode_leaves_state_idle() {
    let mut gpu = GPU::new();
    let err = gpu.write_gp0(0x6000_0000).unwrap_err();
    assert!(matches!(err, EmulatorError::UnknownGp0Command { opcode: 0x60, .. }));
    assert_eq!(gpu.gp0_state(), Gp0State::Idle);
}

#[test]
fn test_gp1_works_mid_command() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0x3000_0000).unwrap();
    gpu.write_gp1(0x0300_0001).unwrap();

    assert_eq!(gpu.gp0_state(), Gp0State::BufferingParams);
    assert!(!gpu.display_state().enabled);
}

#[test]
fn test_soft_reset_keeps_queued_commands() {
    let mut gpu = GPU::new();
    for word in [0x2000_0000, 0x0000_0000, 0x0000_0000, 0x0000_0000] {
        gpu.write_gp0(word).unwrap();
    }
    gpu.write_gp1(0x0000_0000).unwrap();
    assert_eq!(gpu.pending_commands(), 1);

    gpu.reset();
    assert_eq!(gpu.pending_commands(), 0);
}

const BUFFERED_OPCODES: [u8; 15] = [
    0x02, 0x20, 0x22, 0x28, 0x2A, 0x2C, 0x2D, 0x2E, 0x2F, 0x30, 0x32, 0x38, 0x3A, 0xA0, 0xC0,
];

proptest! {
    #[test]
    fn prop_command_buffers_until_length(index in 0usize..BUFFERED_OPCODES.len(), params in prop::collection::vec(any::<u32>(), 8)) {
        let opcode = BUFFERED_OPCODES[index];
        let length = gp0::command_length(opcode);
        let mut gpu = GPU::new();

        gpu.write_gp0((opcode as u32) << 24).unwrap();
        for &word in params.iter().take(length - 2) {
            gpu.write_gp0(word).unwrap();
            prop_assert_eq!(gpu.gp0_state(), Gp0State::BufferingParams);
        }

        // 1x1 image so the A0 upload completes in one more word
        let last = if opcode == 0xA0 { 0x0001_0001 } else { params[length - 2] };
        gpu.write_gp0(last).unwrap();

        if opcode == 0xA0 {
            prop_assert_eq!(gpu.gp0_state(), Gp0State::BufferingTextureData);
            gpu.write_gp0(params[7]).unwrap();
        }
        prop_assert_eq!(gpu.gp0_state(), Gp0State::Idle);
    }
}
