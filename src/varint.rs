use std::io::Read;

use crate::QueryErr;

const SEGMENT_BITS: u32 = 0x7F;
const CHECKER_BIT: u8 = 0x80;
const MAX_VARINT_LEN: usize = 5;

/// Encode the given number as a [VarInt](https://wiki.vg/Protocol#VarInt_and_VarLong).
///
/// ```
/// # use mcstatus_query::encode_varint;
/// assert_eq!(encode_varint(300), vec![0xAC, 0x02]);
/// assert_eq!(encode_varint(-1), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
/// ```
pub fn encode_varint(num: i32) -> Vec<u8> {
    // Negative values always use the maximum number of bytes, which is what
    // encoding the two's complement bits as u32 gives us.
    let mut num = num as u32;
    let mut result = Vec::<u8>::with_capacity(MAX_VARINT_LEN);

    loop {
        if (num & !SEGMENT_BITS) == 0 {
            result.push(num as u8);

            return result;
        }

        result.push(((num & SEGMENT_BITS) as u8) | CHECKER_BIT);
        num >>= 7;
    }
}

/// Decode a complete VarInt held in `arr`.
pub fn decode_varint(arr: &[u8]) -> Result<i32, QueryErr> {
    if arr.len() > MAX_VARINT_LEN {
        return Err(QueryErr::DataErr(format!(
            "VarInts are never longer than 5 bytes, but got {}",
            arr.len()
        )));
    }

    match arr.last() {
        Some(&n) if n & CHECKER_BIT == 0 => {
            let mut result = 0u32;

            for (i, &n) in arr.iter().enumerate() {
                result |= ((n as u32) & SEGMENT_BITS) << (i * 7);
            }

            Ok(result as i32)
        }
        Some(_) => Err(QueryErr::DataErr(format!(
            "Invalid VarInt data: [{}]",
            arr.iter()
                .map(|x| format!("0x{:02X}", x))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
        None => Err(QueryErr::DataErr("VarInt is empty".into())),
    }
}

/// Read one VarInt from `reader`, returning the number of bytes consumed and the value.
pub fn read_varint<R: Read>(reader: &mut R) -> Result<(usize, i32), QueryErr> {
    let mut buffer = Vec::<u8>::with_capacity(MAX_VARINT_LEN);
    let mut byte = [0u8; 1];

    loop {
        reader.read_exact(&mut byte)?;
        buffer.push(byte[0]);

        if byte[0] & CHECKER_BIT == 0 {
            break;
        }

        if buffer.len() == MAX_VARINT_LEN {
            return Err(QueryErr::DataErr(
                "VarInt is too big, it never exceeds 5 bytes".into(),
            ));
        }
    }

    Ok((buffer.len(), decode_varint(&buffer)?))
}
