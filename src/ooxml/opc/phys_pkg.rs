//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! A revision pass touches only a handful of members, so the whole archive
//! is decompressed once into shared [`Bytes`] buffers and written back in
//! the original member order. Untouched members are never re-encoded as
//! XML; they are only recompressed with their original method.

use crate::ooxml::opc::error::{OpcError, Result};
use bytes::Bytes;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// One archive member, decompressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member name without a leading slash (`word/document.xml`)
    pub name: String,
    /// Decompressed content
    pub data: Bytes,
    /// Compression method the member was stored with
    pub compression: CompressionMethod,
}

impl Member {
    /// A deflated member.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            compression: CompressionMethod::Deflated,
        }
    }

    /// The OPC part name (`/word/document.xml`).
    pub fn partname(&self) -> String {
        format!("/{}", self.name)
    }
}

/// Physical package reader.
pub struct PhysPkgReader;

impl PhysPkgReader {
    /// Read every member of an OPC package file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist, isn't a valid ZIP file,
    /// or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Vec<Member>> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Read every member from an in-memory archive.
    pub fn from_bytes(data: &[u8]) -> Result<Vec<Member>> {
        Self::from_seekable(Cursor::new(data))
    }

    /// Read every member from a stream.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Vec<Member>> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_seekable<R: Read + Seek>(reader: R) -> Result<Vec<Member>> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut members = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            members.push(Member {
                name: file.name().to_string(),
                data: Bytes::from(data),
                compression: file.compression(),
            });
        }
        Ok(members)
    }
}

/// Physical package writer for creating OPC packages in memory.
pub struct PhysPkgWriter {
    /// The underlying ZIP archive writer
    archive: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self {
            archive: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write a member with its recorded compression method.
    pub fn write(&mut self, member: &Member) -> Result<()> {
        let method = match member.compression {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default().compression_method(method);
        self.archive.start_file(member.name.as_str(), options)?;
        self.archive.write_all(&member.data)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}
