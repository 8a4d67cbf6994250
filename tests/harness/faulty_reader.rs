use std::io::{Read, Result};

/// Wraps a source and misbehaves in a scripted way.
pub struct FaultyReader<R: Read> {
    inner: R,
    mode: FaultMode,
    counter: usize,
}

pub enum FaultMode {
    OneByteChunks,
    InterruptedEvery(usize),
    PrematureEofAt(usize),
    FailAt(usize),
}

impl<R: Read> FaultyReader<R> {
    pub fn new(inner: R, mode: FaultMode) -> Self {
        Self {
            inner,
            mode,
            counter: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.counter
    }
}

impl<R: Read> Read for FaultyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.counter += 1;
        match self.mode {
            FaultMode::OneByteChunks => {
                let end = buf.len().min(1);
                self.inner.read(&mut buf[..end])
            }
            FaultMode::InterruptedEvery(n) if n != 0 && self.counter % n == 0 => {
                Err(std::io::Error::from(std::io::ErrorKind::Interrupted))
            }
            FaultMode::PrematureEofAt(n) if self.counter >= n => Ok(0),
            FaultMode::FailAt(n) if self.counter >= n => Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "simulated read failure",
            )),
            _ => self.inner.read(buf),
        }
    }
}
