//! Raw capture files: data packets stored back to back with no framing.

use anyhow::{bail, Context};
use puckcore::packet::layout::PACKET_SIZE;
use std::fs;
use std::path::Path;

pub fn read_capture<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Vec<u8>>> {
    let path_ref = path.as_ref();
    let bytes = fs::read(path_ref)
        .with_context(|| format!("reading capture {}", path_ref.display()))?;

    let chunks = bytes.chunks_exact(PACKET_SIZE);
    let trailing = chunks.remainder().len();
    if trailing != 0 {
        bail!(
            "capture {} ends with a partial packet of {} bytes",
            path_ref.display(),
            trailing
        );
    }
    Ok(chunks.map(<[u8]>::to_vec).collect())
}

pub fn write_capture<P, B>(path: P, packets: &[B]) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    B: AsRef<[u8]>,
{
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let bytes: Vec<u8> = packets
        .iter()
        .flat_map(|packet| packet.as_ref().iter().copied())
        .collect();
    fs::write(path_ref, bytes).with_context(|| format!("writing capture {}", path_ref.display()))
}
