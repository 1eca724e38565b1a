use std::io::{self, Read, Write};

/// Postings encoded in one byte carry a delta below this value
const SHORT_FORM_LIMIT: u32 = 0x80;

/// Largest lid representable in the two-byte absolute form
pub const MAX_ABSOLUTE_LID: u32 = 0x7fff;

/// Encode an ascending posting list.
///
/// The first lid is always written in the two-byte absolute form
/// (`1xxxxxxx xxxxxxxx`, 15-bit lid). Later lids use one byte
/// (`0ddddddd`, 7-bit delta from the previous lid) when the delta fits and
/// fall back to the absolute form otherwise.
pub fn encode_postings(lids: &[u32], buf: &mut Vec<u8>) {
    let mut last: Option<u32> = None;
    for &lid in lids {
        match last {
            Some(prev) if lid >= prev && lid - prev < SHORT_FORM_LIMIT => {
                buf.push((lid - prev) as u8);
            }
            _ => {
                let abs = (lid & MAX_ABSOLUTE_LID) as u16 | 0x8000;
                buf.extend_from_slice(&abs.to_be_bytes());
            }
        }
        last = Some(lid);
    }
}

/// Decode `count` postings from `reader`, calling `emit` for each lid in
/// stream order.
pub fn decode_postings<R: Read>(
    reader: &mut R,
    count: usize,
    mut emit: impl FnMut(u32),
) -> io::Result<()> {
    let mut last = 0u32;
    for _ in 0..count {
        let h = read_u8(reader)?;
        let lid = if u32::from(h) < SHORT_FORM_LIMIT {
            last + u32::from(h)
        } else {
            let l = read_u8(reader)?;
            ((u32::from(h) << 8) | u32::from(l)) & MAX_ABSOLUTE_LID
        };
        last = lid;
        emit(lid);
    }
    Ok(())
}

/// Read a single byte
pub fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Write a u16 in big-endian format
pub fn write_u16_be<W: Write>(writer: &mut W, value: u16) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

/// Read a u16 in big-endian format
pub fn read_u16_be<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

/// Write an i32 in big-endian format
pub fn write_i32_be<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

/// Read an i32 in big-endian format
pub fn read_i32_be<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}
