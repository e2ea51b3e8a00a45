//! Little-endian primitives over `Read`/`Write`

use super::{RawIoError, RawIoResult};
use std::io::{Read, Write};

pub(crate) fn write_u8<W: Write>(w: &mut W, v: u8) -> RawIoResult<()> {
    w.write_all(&[v])?;
    Ok(())
}

pub(crate) fn write_u32<W: Write>(w: &mut W, v: u32) -> RawIoResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Length-prefixed byte string
pub(crate) fn write_bytes<W: Write>(w: &mut W, bytes: &[u8]) -> RawIoResult<()> {
    write_u32(w, len_u32(bytes.len())?)?;
    w.write_all(bytes)?;
    Ok(())
}

pub(crate) fn read_u8<R: Read>(r: &mut R) -> RawIoResult<u8> {
    let mut b = [0u8; 1];
    r.read_exact(&mut b)?;
    Ok(b[0])
}

pub(crate) fn read_u32<R: Read>(r: &mut R) -> RawIoResult<u32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(u32::from_le_bytes(b))
}

/// Read a length-prefixed byte string into `buf`, reusing its allocation
///
/// The buffer grows with the bytes actually read, not with the declared
/// length.
pub(crate) fn read_bytes_into<R: Read>(r: &mut R, buf: &mut Vec<u8>) -> RawIoResult<()> {
    let len = read_u32(r)?;
    buf.clear();
    let got = r.by_ref().take(u64::from(len)).read_to_end(buf)?;
    if got != len as usize {
        return Err(RawIoError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, stream ended after {}", len, got),
        )));
    }
    Ok(())
}

pub(crate) fn read_string<R: Read>(r: &mut R) -> RawIoResult<String> {
    let mut buf = Vec::new();
    read_bytes_into(r, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Lengths and counts are u32 on the wire
pub(crate) fn len_u32(len: usize) -> RawIoResult<u32> {
    u32::try_from(len).map_err(|_| {
        RawIoError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("length {} does not fit the stream format", len),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_primitives() {
        let mut out = Vec::new();
        write_u8(&mut out, 7).unwrap();
        write_u32(&mut out, 0xdead_beef).unwrap();
        write_bytes(&mut out, "spot".as_bytes()).unwrap();
        assert_eq!(&out[1..5], &[0xef, 0xbe, 0xad, 0xde]);

        let mut r = Cursor::new(out);
        assert_eq!(read_u8(&mut r).unwrap(), 7);
        assert_eq!(read_u32(&mut r).unwrap(), 0xdead_beef);
        assert_eq!(read_string(&mut r).unwrap(), "spot");
    }

    #[test]
    fn test_truncated_read_is_io_error() {
        let mut r = Cursor::new(vec![1u8, 2]);
        assert!(matches!(read_u32(&mut r), Err(RawIoError::Io(_))));
    }

    #[test]
    fn test_oversized_length_prefix() {
        let mut bytes = u32::MAX.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"cell");
        let mut buf = Vec::new();
        let err = read_bytes_into(&mut Cursor::new(bytes), &mut buf).unwrap_err();
        assert!(matches!(err, RawIoError::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
        assert_eq!(buf, b"cell");
    }

    #[test]
    fn test_invalid_utf8() {
        let mut out = Vec::new();
        write_bytes(&mut out, &[0xff, 0xfe]).unwrap();
        let mut r = Cursor::new(out);
        assert!(matches!(read_string(&mut r), Err(RawIoError::InvalidUtf8(_))));
    }
}
