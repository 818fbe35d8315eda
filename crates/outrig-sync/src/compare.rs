//! Byte-wise file comparison

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 8 * 1024;

/// Whether two files have identical contents
pub fn files_equal(a: &Path, b: &Path) -> io::Result<bool> {
    let file_a = File::open(a)?;
    let file_b = File::open(b)?;

    if file_a.metadata()?.len() != file_b.metadata()?.len() {
        return Ok(false);
    }

    let mut reader_a = BufReader::new(file_a);
    let mut reader_b = BufReader::new(file_b);
    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];

    loop {
        let read_a = read_full(&mut reader_a, &mut buf_a)?;
        let read_b = read_full(&mut reader_b, &mut buf_b)?;
        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }
        if read_a == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows; short only at end of file
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
