//! Integration tests for typed memory access against an in-memory target

use overlay_bridge::memory::{MemoryImage, STRING_READ_SIZE};
use overlay_bridge::{Address, Matrix4x4, MemoryAccessor, MemoryError, Vector3, WriteStrategy};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const BASE: Address = Address::new(0x10_0000);

fn accessor(image: &MemoryImage) -> MemoryAccessor {
    MemoryAccessor::new(Box::new(image.clone()), WriteStrategy::Standard)
}

#[test]
fn test_scalar_write_then_read() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 64]);
    let memory = accessor(&image);

    assert!(memory.write_i32(BASE, -12345).unwrap());
    assert!(memory.write_u32(BASE.offset(4), 0xDEAD_BEEF).unwrap());
    assert!(memory.write_i64(BASE.offset(8), i64::MIN + 1).unwrap());
    assert!(memory.write_f32(BASE.offset(16), 1.5).unwrap());
    assert!(memory.write_f64(BASE.offset(24), -0.25).unwrap());
    assert!(memory.write_byte(BASE.offset(32), 0xAB).unwrap());

    assert_eq!(memory.read_i32(BASE).unwrap(), -12345);
    assert_eq!(memory.read_u32(BASE.offset(4)).unwrap(), 0xDEAD_BEEF);
    assert_eq!(memory.read_i64(BASE.offset(8)).unwrap(), i64::MIN + 1);
    assert_eq!(memory.read_f32(BASE.offset(16)).unwrap(), 1.5);
    assert_eq!(memory.read_f64(BASE.offset(24)).unwrap(), -0.25);
    assert_eq!(memory.read_byte(BASE.offset(32)).unwrap(), 0xAB);
}

#[test]
fn test_values_are_little_endian() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 8]);
    let memory = accessor(&image);

    memory.write_u32(BASE, 0x0102_0304).unwrap();
    assert_eq!(image.peek(BASE, 4).unwrap(), vec![0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn test_vector_and_matrix_layout() {
    let mut bytes = Vec::new();
    for value in [1.0f32, 2.0, 3.0] {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    for i in 0..16 {
        bytes.extend_from_slice(&(i as f32).to_le_bytes());
    }
    let image = MemoryImage::new(7).with_region(BASE, bytes);
    let memory = accessor(&image);

    assert_eq!(memory.read_vector3(BASE).unwrap(), Vector3::new(1.0, 2.0, 3.0));

    let matrix = memory.read_matrix(BASE.offset(12)).unwrap();
    // M14 is the fourth float, M41 the thirteenth
    assert_eq!(matrix.m[0][3], 3.0);
    assert_eq!(matrix.m[3][0], 12.0);
    assert_eq!(matrix.m[3][3], 15.0);
}

#[test]
fn test_struct_round_trip_through_memory() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 128]);
    let memory = accessor(&image);

    assert!(memory.write_struct(BASE, &Matrix4x4::IDENTITY).unwrap());
    let read: Matrix4x4 = memory.read_struct(BASE).unwrap();
    assert_eq!(read, Matrix4x4::IDENTITY);
}

#[test]
fn test_short_read_reports_count() {
    let image = MemoryImage::new(7).with_region(BASE, vec![9u8; 6]);
    let memory = accessor(&image);

    let outcome = memory.read_bytes(BASE.offset(2), 10).unwrap();
    assert_eq!(outcome.bytes_read, 4);
    assert!(!outcome.is_complete());
    assert_eq!(outcome.filled(), &[9, 9, 9, 9]);
    assert_eq!(outcome.bytes.len(), 10);
}

#[test]
fn test_typed_read_across_end_is_partial() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 6]);
    let memory = accessor(&image);

    let err = memory.read_i64(BASE).unwrap_err();
    assert!(matches!(
        err,
        MemoryError::PartialTransfer {
            expected: 8,
            actual: 6,
            ..
        }
    ));
}

#[test]
fn test_unmapped_read_is_zero_count_not_error() {
    let image = MemoryImage::new(7);
    let memory = accessor(&image);

    let outcome = memory.read_bytes(Address::new(0xDEAD_0000), 16).unwrap();
    assert_eq!(outcome.bytes_read, 0);
}

#[test]
fn test_short_write_returns_false() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 4]);
    let memory = accessor(&image);

    assert!(!memory.write_i64(BASE, 1).unwrap());
    assert_eq!(image.writes()[0].len, 4);
}

#[test]
fn test_read_only_region_rejects_write() {
    let image = MemoryImage::new(7);
    image.map_read_only(BASE, vec![1u8; 8]);
    let memory = accessor(&image);

    assert!(!memory.write_u32(BASE, 0).unwrap());
    assert_eq!(memory.read_u32(BASE).unwrap(), 0x0101_0101);
}

#[test]
fn test_string_stops_at_terminator() {
    let mut bytes = b"hello\0world".to_vec();
    bytes.resize(STRING_READ_SIZE, 0);
    let image = MemoryImage::new(7).with_region(BASE, bytes);
    let memory = accessor(&image);

    assert_eq!(memory.read_string(BASE).unwrap(), "hello");
}

#[test]
fn test_string_truncated_by_mapping() {
    let image = MemoryImage::new(7).with_region(BASE, b"abc".to_vec());
    let memory = accessor(&image);

    assert_eq!(memory.read_string(BASE).unwrap(), "abc");
}

#[test]
fn test_string_non_ascii_decodes_as_question_mark() {
    let image = MemoryImage::new(7).with_region(BASE, vec![b'a', 0xE9, b'b', 0]);
    let memory = accessor(&image);

    assert_eq!(memory.read_string(BASE).unwrap(), "a?b");
}

#[test]
fn test_write_string_has_no_terminator() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0xFFu8; 8]);
    let memory = accessor(&image);

    assert!(memory.write_string(BASE, "hi").unwrap());
    assert_eq!(image.peek(BASE, 3).unwrap(), vec![b'h', b'i', 0xFF]);
}

#[test]
fn test_strategy_reaches_source() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 8]);
    let mut memory = accessor(&image);

    memory.write_byte(BASE, 1).unwrap();
    memory.set_strategy(WriteStrategy::Fast);
    memory.write_byte(BASE, 2).unwrap();

    let strategies: Vec<_> = image.writes().iter().map(|w| w.strategy).collect();
    assert_eq!(strategies, vec![WriteStrategy::Standard, WriteStrategy::Fast]);
}

#[test]
fn test_exited_target_is_an_error() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 8]);
    let memory = accessor(&image);
    image.terminate();

    assert!(matches!(
        memory.read_u32(BASE).unwrap_err(),
        MemoryError::TargetGone(7)
    ));
    assert!(matches!(
        memory.write_u32(BASE, 1).unwrap_err(),
        MemoryError::TargetGone(7)
    ));
    assert!(!memory.is_valid(BASE));
}

#[test]
fn test_denied_access_is_an_error() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 8]);
    let memory = accessor(&image);
    image.deny_access();

    assert!(matches!(
        memory.read_bytes(BASE, 4).unwrap_err(),
        MemoryError::AccessDenied { pid: 7, .. }
    ));
}

#[test]
fn test_region_validity() {
    let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 0x100]);
    let memory = accessor(&image);

    assert!(memory.is_valid(BASE.offset(0x80)));
    assert!(!memory.is_valid(Address::new(0x5000)));

    let region = memory.query_region(BASE.offset(0x10)).unwrap();
    assert_eq!(region.base_address, BASE);
    assert_eq!(region.region_size, 0x100);
}

proptest! {
    #[test]
    fn prop_written_bytes_read_back(
        data in proptest::collection::vec(any::<u8>(), 1..256),
        offset in 0isize..256,
        fast in any::<bool>(),
    ) {
        let image = MemoryImage::new(7).with_region(BASE, vec![0u8; 512]);
        let strategy = WriteStrategy::from_fast_write(fast);
        let memory = MemoryAccessor::new(Box::new(image.clone()), strategy);
        let address = BASE.offset(offset);

        prop_assert!(memory.write_bytes(address, &data).unwrap());
        let outcome = memory.read_bytes(address, data.len()).unwrap();
        prop_assert!(outcome.is_complete());
        prop_assert_eq!(outcome.filled(), data.as_slice());
        prop_assert_eq!(image.writes()[0].strategy, strategy);
    }
}
