use super::Container;
use crate::error::Result;
use std::io::{Read, Seek, SeekFrom, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// ZIP-backed container in Stored mode: payloads are near-incompressible
/// binary geometry, so write throughput wins over entropy coding.
pub struct ZipSink<W: Write + Seek> {
    inner: ZipWriter<W>,
}

impl<W: Write + Seek> ZipSink<W> {
    pub fn new(w: W) -> Self {
        Self {
            inner: ZipWriter::new(w),
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .large_file(true)
    }
}

impl<W: Write + Seek> Container for ZipSink<W> {
    fn add_file(&mut self, name: &str, src: &mut dyn Read) -> Result<u64> {
        self.inner.start_file(name, Self::options())?;
        Ok(std::io::copy(src, &mut self.inner)?)
    }

    fn add_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.inner.start_file(name, Self::options())?;
        self.inner.write_all(data)?;
        Ok(())
    }

    fn finish(self) -> Result<u64> {
        let mut w = self.inner.finish()?;
        Ok(w.seek(SeekFrom::End(0))?)
    }
}
