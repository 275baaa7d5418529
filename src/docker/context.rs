//! In-memory tar build context assembly
//!
//! The build context is never written to the host filesystem: the
//! Dockerfile, the embedded entrypoint script and the copied marker files
//! are streamed to the daemon as one tar archive built in memory.

use crate::detect::SourceFile;
use crate::image::{ImageDescriptor, AGENT_ENTRYPOINT, ENTRYPOINT_CONTEXT_PATH};
use anyhow::{Context, Result};
use tar::{Builder, Header};

fn append_entry(builder: &mut Builder<Vec<u8>>, path: &str, mode: u32, data: &[u8]) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(mode);
    header.set_cksum();
    builder
        .append_data(&mut header, path, data)
        .with_context(|| format!("failed to add {} to build context", path))
}

/// Packs the descriptor and marker files into a tar archive.
pub fn build_context_tar(descriptor: &ImageDescriptor, files: &[SourceFile]) -> Result<Vec<u8>> {
    let mut builder = Builder::new(Vec::new());

    append_entry(
        &mut builder,
        "Dockerfile",
        0o644,
        descriptor.dockerfile.as_bytes(),
    )?;
    append_entry(
        &mut builder,
        ENTRYPOINT_CONTEXT_PATH,
        0o755,
        AGENT_ENTRYPOINT.as_bytes(),
    )?;
    for file in files {
        append_entry(&mut builder, &file.rel_path, 0o644, &file.content)?;
    }

    builder.finish().context("failed to finish build context")?;
    builder
        .into_inner()
        .context("failed to take build context buffer")
}
