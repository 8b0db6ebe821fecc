use std::io::{self, Write};

/// Data bytes per S1 record.
const CHUNK: usize = 32;

/// Buffered Motorola S-record emitter. Bytes accumulate until a full
/// record's worth is available or the address jumps, then a single `S1`
/// line is written. `finish` appends the `S9` termination record.
pub struct SrecWriter<W: Write> {
    out: W,
    buf: Vec<u8>,
    /// Load address of `buf[0]`.
    addr: u16,
}

impl<W: Write> SrecWriter<W> {
    pub fn new(out: W) -> Self {
        SrecWriter {
            out,
            buf: Vec::with_capacity(CHUNK),
            addr: 0,
        }
    }

    /// Flushes pending bytes and restarts the stream at `addr`.
    pub fn set_origin(&mut self, addr: u16) -> io::Result<()> {
        self.flush()?;
        self.addr = addr;
        Ok(())
    }

    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.buf.push(byte);
        if self.buf.len() == CHUNK {
            self.flush()?;
        }
        Ok(())
    }

    /// Words are stored little-endian.
    pub fn write_word(&mut self, word: u16) -> io::Result<()> {
        self.write_byte(word as u8)?;
        self.write_byte((word >> 8) as u8)
    }

    /// Writes the buffered bytes as one S1 record. Empty buffers produce
    /// no output.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let count = (self.buf.len() + 3) as u8;
        let mut sum = count as u32 + (self.addr >> 8) as u32 + (self.addr & 0xFF) as u32;
        write!(self.out, "S1{:02X}{:04X}", count, self.addr)?;
        for byte in &self.buf {
            sum += *byte as u32;
            write!(self.out, "{byte:02X}")?;
        }
        writeln!(self.out, "{:02X}", !sum as u8)?;
        self.addr = self.addr.wrapping_add(self.buf.len() as u16);
        self.buf.clear();
        Ok(())
    }

    /// Flushes and writes the S9 termination record carrying the program's
    /// start address.
    pub fn finish(&mut self, start: u16) -> io::Result<()> {
        self.flush()?;
        let sum = 3 + (start >> 8) as u32 + (start & 0xFF) as u32;
        writeln!(self.out, "S903{:04X}{:02X}", start, !sum as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(buf: &[u8]) -> Vec<String> {
        String::from_utf8(buf.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Every field of an S-record after the type, checksum included, sums
    /// to 0xFF modulo 256.
    fn assert_checksum(line: &str) {
        let sum: u32 = (2..line.len())
            .step_by(2)
            .map(|i| u32::from_str_radix(&line[i..i + 2], 16).unwrap())
            .sum();
        assert_eq!(sum & 0xFF, 0xFF, "bad checksum in {line}");
    }

    #[test]
    fn single_record_with_checksum() {
        let mut buf = Vec::new();
        let mut w = SrecWriter::new(&mut buf);
        w.set_origin(0x0200).unwrap();
        w.write_word(0x4305).unwrap();
        w.finish(0x0200).unwrap();
        let lines = lines(&buf);
        assert_eq!(lines[0], "S10502000543B0");
        assert_eq!(lines[1], "S9030200FA");
        for line in &lines {
            assert_checksum(line);
        }
    }

    #[test]
    fn buffer_splits_at_32_bytes() {
        let mut buf = Vec::new();
        let mut w = SrecWriter::new(&mut buf);
        for i in 0..40u8 {
            w.write_byte(i).unwrap();
        }
        w.finish(0).unwrap();
        let lines = lines(&buf);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("S1230000"));
        // second record picks up at the next address
        assert!(lines[1].starts_with("S10B0020"));
        assert_eq!(lines[2], "S9030000FC");
        for line in &lines {
            assert_checksum(line);
        }
    }

    #[test]
    fn origin_change_flushes_and_rebases() {
        let mut buf = Vec::new();
        let mut w = SrecWriter::new(&mut buf);
        w.write_byte(0xAA).unwrap();
        w.set_origin(0x1000).unwrap();
        w.write_byte(0xBB).unwrap();
        w.finish(0).unwrap();
        let lines = lines(&buf);
        assert!(lines[0].starts_with("S1040000AA"));
        assert!(lines[1].starts_with("S1041000BB"));
    }

    #[test]
    fn empty_stream_emits_only_termination() {
        let mut buf = Vec::new();
        let mut w = SrecWriter::new(&mut buf);
        w.set_origin(0x0200).unwrap();
        w.finish(0).unwrap();
        assert_eq!(lines(&buf), vec!["S9030000FC".to_string()]);
    }
}
