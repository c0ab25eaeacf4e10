/**
 * Every multi-byte integer in shortcut data is little-endian. These helpers
 * collapse the usual two-step nom dance (`take` N bytes, then `le_uX`) into
 * one call so parsers read as a list of fields
 */
use nom::bytes::complete::take;
use nom::number::complete::{le_i16, le_i32, le_i64, le_u16, le_u32, le_u64, le_u8};
use std::mem::size_of;

/// Nom one (1) byte to u8
pub(crate) fn nom_unsigned_one_byte(data: &[u8]) -> nom::IResult<&[u8], u8> {
    let (input, value_data) = take(size_of::<u8>())(data)?;
    let (_, value) = le_u8(value_data)?;
    Ok((input, value))
}

/// Nom two (2) bytes to u16
pub(crate) fn nom_unsigned_two_bytes(data: &[u8]) -> nom::IResult<&[u8], u16> {
    let (input, value_data) = take(size_of::<u16>())(data)?;
    let (_, value) = le_u16(value_data)?;
    Ok((input, value))
}

/// Nom four (4) bytes to u32
pub(crate) fn nom_unsigned_four_bytes(data: &[u8]) -> nom::IResult<&[u8], u32> {
    let (input, value_data) = take(size_of::<u32>())(data)?;
    let (_, value) = le_u32(value_data)?;
    Ok((input, value))
}

/// Nom eight (8) bytes to u64
pub(crate) fn nom_unsigned_eight_bytes(data: &[u8]) -> nom::IResult<&[u8], u64> {
    let (input, value_data) = take(size_of::<u64>())(data)?;
    let (_, value) = le_u64(value_data)?;
    Ok((input, value))
}

/// Nom two (2) bytes to i16
pub(crate) fn nom_signed_two_bytes(data: &[u8]) -> nom::IResult<&[u8], i16> {
    let (input, value_data) = take(size_of::<u16>())(data)?;
    let (_, value) = le_i16(value_data)?;
    Ok((input, value))
}

/// Nom four (4) bytes to i32
pub(crate) fn nom_signed_four_bytes(data: &[u8]) -> nom::IResult<&[u8], i32> {
    let (input, value_data) = take(size_of::<u32>())(data)?;
    let (_, value) = le_i32(value_data)?;
    Ok((input, value))
}

/// Nom eight (8) bytes to i64
pub(crate) fn nom_signed_eight_bytes(data: &[u8]) -> nom::IResult<&[u8], i64> {
    let (input, value_data) = take(size_of::<u64>())(data)?;
    let (_, value) = le_i64(value_data)?;
    Ok((input, value))
}

/// Nom an arbitrary amount of data and return the bytes remaining and bytes nom'd
pub(crate) fn nom_data(data: &[u8], count: u64) -> nom::IResult<&[u8], &[u8]> {
    let (input, value) = take(count)(data)?;

    Ok((input, value))
}
