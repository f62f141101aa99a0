//! The `macros` module provides macros for internal use.

/// A macro for conveniently writing bytes to a `Write` object and converting the error.
macro_rules! write_u8 {
    ($w:expr, $val:expr) => {
        $w.write_all(&[$val]).context(wr!())
    };
}

/// Writes a `u32` as four big-endian bytes and converts the error.
macro_rules! write_u32 {
    ($w:expr, $val:expr) => {
        $w.write_all(&u32::to_be_bytes($val)).context(wr!())
    };
}

#[test]
fn write_macros_test() {
    use snafu::ResultExt;
    use std::io::Write;
    fn foo(w: &mut Vec<u8>) -> crate::error::LibResult<()> {
        write_u8!(w, 0x4d)?;
        write_u32!(w, 0x0102_0304)?;
        Ok(())
    }
    let mut bytes = Vec::new();
    foo(&mut bytes).unwrap();
    assert_eq!(&[0x4d, 0x01, 0x02, 0x03, 0x04], bytes.as_slice());
}
