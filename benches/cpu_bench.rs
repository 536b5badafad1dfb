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

//! CPU step loop benchmarks

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use psxcore::core::memory::Bus;
use psxcore::core::system::System;
use psxcore::frontend::HeadlessRenderer;

/// BIOS image with `program` at the reset vector
fn bios_with(program: &[u32]) -> Vec<u8> {
    let mut bios = vec![0u8; Bus::BIOS_SIZE];
    for (i, word) in program.iter().enumerate() {
        bios[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    bios
}

/// Arithmetic loop with a taken branch every three instructions
const LOOP_PROGRAM: [u32; 3] = [
    0x2421_0001, // addiu r1, r1, 1
    0x1000_FFFE, // beq r0, r0, -2
    0x0041_1021, // addu r2, r2, r1
];

/// Loop storing a word to RAM and loading it back
const MEMORY_PROGRAM: [u32; 5] = [
    0x3C03_8000, // lui r3, 0x8000
    0xAC61_0100, // sw r1, 0x100(r3)
    0x8C62_0100, // lw r2, 0x100(r3)
    0x1000_FFFD, // beq r0, r0, -3
    0x2421_0001, // addiu r1, r1, 1
];

const STEPS: u64 = 10_000;

fn system_running(program: &[u32]) -> System {
    let mut system = System::new(Box::new(HeadlessRenderer::new()));
    system
        .load_bios_bytes(&bios_with(program))
        .expect("BIOS image is 512KB");
    system
}

fn bench_step_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_step");
    group.throughput(Throughput::Elements(STEPS));

    for (name, program) in [("alu_branch", &LOOP_PROGRAM[..]), ("load_store", &MEMORY_PROGRAM[..])] {
        group.bench_function(name, |b| {
            b.iter_batched_ref(
                || system_running(program),
                |system| {
                    system.step_n(STEPS as usize).expect("program loops forever");
                    black_box(system.cpu().reg(2))
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_run_frame(c: &mut Criterion) {
    c.bench_function("run_frame_1000_steps", |b| {
        let mut system = system_running(&LOOP_PROGRAM);
        system.set_steps_per_frame(1000);
        b.iter(|| {
            system.run_frame().expect("program loops forever");
            black_box(system.frames())
        })
    });
}

criterion_group!(benches, bench_step_loop, bench_run_frame);
criterion_main!(benches);
