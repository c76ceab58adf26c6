use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read-only access to the content of a file
pub trait Buffer: Send + Sync {
    fn data(&'_ self) -> &'_ [u8];
}

/// Stores the data in memory
pub struct MemoryBuffer {
    data: Vec<u8>,
}

impl MemoryBuffer {
    pub fn new(path: &Path) -> std::io::Result<Self> {
        let mut file = File::options().read(true).open(path)?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        Ok(Self { data: data })
    }
}

impl Buffer for MemoryBuffer {
    fn data(&'_ self) -> &'_ [u8] {
        &self.data
    }
}

/// Uses a memory map
pub struct MmapBuffer {
    // Empty files cannot be mapped
    mmap: Option<Mmap>,
}

impl MmapBuffer {
    pub fn new(path: &Path) -> std::io::Result<Self> {
        let file = File::options().read(true).open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Self { mmap: None });
        }

        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(Self { mmap: Some(mmap) })
    }
}

impl Buffer for MmapBuffer {
    fn data(&'_ self) -> &'_ [u8] {
        match &self.mmap {
            Some(mmap) => &mmap[..],
            None => &[],
        }
    }
}

/// Opens a file either in memory or through a memory map
pub fn open_buffer(path: &Path, in_memory: bool) -> std::io::Result<Box<dyn Buffer>> {
    if in_memory {
        Ok(Box::new(MemoryBuffer::new(path)?))
    } else {
        Ok(Box::new(MmapBuffer::new(path)?))
    }
}
