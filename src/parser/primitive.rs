//! Big-endian fixed-width reads. The names follow the class file format, where `uN` is an
//! unsigned quantity of `N` bytes.

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u32, be_u64, be_u8};

use super::nom_support::{Input, ParseResult};

pub fn read_u1(input: Input) -> ParseResult<u8> {
    be_u8(input)
}

pub fn read_u2(input: Input) -> ParseResult<u16> {
    be_u16(input)
}

pub fn read_u4(input: Input) -> ParseResult<u32> {
    be_u32(input)
}

pub fn read_u8(input: Input) -> ParseResult<u64> {
    be_u64(input)
}

/// Takes exactly `length` bytes.
pub fn read_bytes(input: Input, length: usize) -> ParseResult<Input> {
    take(length)(input)
}
