use std::io::{self, Write};

/// Accepts `fail_after` bytes, then fails every write.
pub struct FailingWriter {
    pub written: Vec<u8>,
    pub fail_after: usize,
    pub flushes: usize,
}

impl FailingWriter {
    pub fn new(fail_after: usize) -> Self {
        Self {
            written: Vec::new(),
            fail_after,
            flushes: 0,
        }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() >= self.fail_after {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "Simulated I/O error",
            ));
        }
        let n = (self.fail_after - self.written.len()).min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Fails exactly one write call, the `fail_on`-th (1-based), with `kind`,
/// and accepts every other write in full.
pub struct FlakyWriter {
    pub written: Vec<u8>,
    pub fail_on: usize,
    pub kind: io::ErrorKind,
    pub calls: usize,
}

impl FlakyWriter {
    pub fn new(fail_on: usize, kind: io::ErrorKind) -> Self {
        Self {
            written: Vec::new(),
            fail_on,
            kind,
            calls: 0,
        }
    }
}

impl Write for FlakyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.calls == self.fail_on {
            return Err(io::Error::new(self.kind, "Simulated transient I/O error"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
