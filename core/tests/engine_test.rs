//! Engine-level behavior over synthetic data files: input reflection,
//! part transitions, frame pacing, and the render pipeline.

mod common;

use common::{PART_ID, build_data_files, part_resources};
use otherworld_core::audio::Audio;
use otherworld_core::engine::{Engine, EngineOptions};
use otherworld_core::input::{INPUT_ACTION, INPUT_LEFT, INPUT_RIGHT, INPUT_UP};
use otherworld_core::res::BankSet;

fn options() -> EngineOptions {
    EngineOptions {
        part: PART_ID,
        skip_protection: false,
        rng_seed: 1,
    }
}

fn engine_with_bytecode(bytecode: &[u8]) -> Engine {
    let palettes = common::black_palettes();
    let table = part_resources(bytecode, &[], &palettes);
    let banks = build_data_files(&table);
    Engine::new(banks, Audio::new(44_100), options()).expect("engine should start")
}

/// YIELD / JUMP 0x0000: a thread that idles forever.
const IDLE: &[u8] = &[0x06, 0x07, 0x00, 0x00];

#[test]
fn test_left_input_reflects_into_vm_registers() {
    let mut engine = engine_with_bytecode(IDLE);
    engine.set_input(INPUT_LEFT, true);
    engine.run_frame().unwrap();

    // Sign-extended -1 plus the LEFT mask bit.
    assert_eq!(engine.vm_reg(0xFC) as u16, 0xFFFF);
    assert_eq!(engine.vm_reg(0xFD) & 2, 2);
    assert_eq!(engine.vm_reg(0xFE) & 2, 2);

    engine.set_input(INPUT_LEFT, false);
    engine.set_input(INPUT_RIGHT, true);
    engine.run_frame().unwrap();
    assert_eq!(engine.vm_reg(0xFC), 1);
    assert_eq!(engine.vm_reg(0xFD), 1);
}

#[test]
fn test_up_also_means_jump() {
    let mut engine = engine_with_bytecode(IDLE);
    engine.set_input(INPUT_UP, true);
    engine.run_frame().unwrap();

    assert_eq!(engine.vm_reg(0xE5), -1);
    assert_eq!(engine.vm_reg(0xFB), -1);
    assert_eq!(engine.vm_reg(0xFD), 8);
}

#[test]
fn test_action_button_sets_flag_and_mask_bit() {
    let mut engine = engine_with_bytecode(IDLE);
    engine.set_input(INPUT_ACTION, true);
    engine.run_frame().unwrap();

    assert_eq!(engine.vm_reg(0xFA), 1);
    assert_eq!(engine.vm_reg(0xFE) as u16 & 0x80, 0x80);
    // The action bit belongs to the combined mask only.
    assert_eq!(engine.vm_reg(0xFD), 0);

    engine.set_input(INPUT_ACTION, false);
    engine.run_frame().unwrap();
    assert_eq!(engine.vm_reg(0xFA), 0);
}

#[test]
fn test_typed_character_is_latched_once() {
    let mut engine = engine_with_bytecode(IDLE);
    engine.key_char(b'j');
    engine.run_frame().unwrap();
    assert_eq!(engine.vm_reg(0xDA), b'J' as i16);

    // The register keeps its value, but only one latch happened; a new
    // key overwrites it on the next frame.
    engine.key_char(b'K');
    engine.run_frame().unwrap();
    assert_eq!(engine.vm_reg(0xDA), b'K' as i16);
}

#[test]
fn test_pause_slices_drive_frame_delay() {
    // SETI regs[0xFF], 3 / YIELD / JUMP 0x0004
    let mut engine = engine_with_bytecode(&[
        0x00, 0xFF, 0x00, 0x03, //
        0x06, //
        0x07, 0x00, 0x04,
    ]);
    assert_eq!(engine.frame_delay_ms(), 20);
    engine.run_frame().unwrap();
    assert_eq!(engine.frame_delay_ms(), 60);
}

#[test]
fn test_load_opcode_switches_parts_next_frame() {
    // Part A bytecode requests part 0x3E81, then idles.
    let part_a = [
        0x19, 0x3E, 0x81, // LOAD 0x3E81
        0x06, // YIELD
        0x07, 0x00, 0x03, // JUMP 0x0003
    ];
    let palettes = common::black_palettes();
    let mut table = part_resources(&part_a, &[], &palettes);
    // Part 0x3E81 uses ids 0x17..=0x19.
    table.push(Some((3, &palettes))); // 0x17 palettes
    table.push(Some((4, IDLE))); // 0x18 bytecode
    table.push(Some((5, &[]))); // 0x19 cinematic

    let banks = build_data_files(&table);
    let mut engine = Engine::new(banks, Audio::new(44_100), options()).unwrap();
    assert_eq!(engine.current_part(), Some(PART_ID));

    engine.run_frame().unwrap();
    // Requested, not yet applied.
    assert_eq!(engine.current_part(), Some(PART_ID));

    engine.run_frame().unwrap();
    assert_eq!(engine.current_part(), Some(0x3E81));
}

#[test]
fn test_show_fade_and_render() {
    // FADE 0 / PAGE 0 / FILL page 0 color 1 / SHOW page 0 / YIELD / loop
    let mut engine = engine_with_bytecode_and_palette(
        &[
            0x0B, 0x00, 0x00, // FADE palette 0
            0x0D, 0x00, // PAGE 0
            0x0E, 0x00, 0x01, // FILL 0, color 1
            0x10, 0x00, // SHOW page 0
            0x06, // YIELD
            0x07, 0x00, 0x0A, // JUMP to the YIELD
        ],
        {
            // Palette 0, color 1 = pure green.
            let mut palettes = common::black_palettes();
            palettes[2] = 0x00;
            palettes[3] = 0xF0;
            palettes
        },
    );

    engine.run_frame().unwrap();

    let (w, h) = engine.display_size();
    let mut frame = vec![0u8; (w * h * 3) as usize];
    engine.render_frame(&mut frame);
    assert_eq!(&frame[..3], &[0x00, 0xFF, 0x00]);
    assert!(frame.chunks_exact(3).all(|px| px == [0x00, 0xFF, 0x00]));
}

fn engine_with_bytecode_and_palette(bytecode: &[u8], palettes: Vec<u8>) -> Engine {
    let table = part_resources(bytecode, &[], &palettes);
    let banks = build_data_files(&table);
    Engine::new(banks, Audio::new(44_100), options()).expect("engine should start")
}

#[test]
fn test_show_clears_the_frame_counter_register() {
    // SETI regs[0xF7], 9 / SHOW 0xFE / YIELD / loop
    let mut engine = engine_with_bytecode(&[
        0x00, 0xF7, 0x00, 0x09, //
        0x10, 0xFE, //
        0x06, //
        0x07, 0x00, 0x06,
    ]);
    engine.run_frame().unwrap();
    assert_eq!(engine.vm_reg(0xF7), 0);
}

#[test]
fn test_reset_restarts_the_initial_part() {
    // SETI r0, 7 / YIELD / loop
    let mut engine = engine_with_bytecode(&[
        0x00, 0x00, 0x00, 0x07, //
        0x06, //
        0x07, 0x00, 0x04,
    ]);
    engine.run_frame().unwrap();
    assert_eq!(engine.vm_reg(0), 7);

    engine.reset().unwrap();
    assert_eq!(engine.vm_reg(0), 0);
    engine.run_frame().unwrap();
    assert_eq!(engine.vm_reg(0), 7);
}
