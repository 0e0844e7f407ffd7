//! Frame listing via skip traversal.

use anyhow::{Context, Result};
use qg8::{CodecConfig, FrameInfo, Qg8Reader};

/// Walk every frame header of `path` and print one line per chunk.
pub fn run(path: &str, config: CodecConfig) -> Result<()> {
    let mut reader = Qg8Reader::open_with(path, config)
        .with_context(|| format!("Failed to open: {}", path))?;
    println!("{}: QG8 version {}", path, reader.version());
    println!("{:>10}  {:<18} {:>5}  {:<16}  {:>12}", "offset", "type", "flags", "label", "skip");

    let mut count = 0usize;
    let mut cursor = reader.chunks();
    while let Some(info) = cursor
        .advance_frame()
        .with_context(|| format!("Failed to read chunk frame at offset {}", cursor.offset()))?
    {
        println!("{}", format_frame(&info));
        count += 1;
    }

    println!("{} chunk(s)", count);
    Ok(())
}

fn format_frame(info: &FrameInfo) -> String {
    let header = &info.header;
    let label = header
        .label
        .map(|l| l.as_str_lossy().into_owned())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>10}  {:<18} {:#04x}  {:<16}  {:>12}",
        info.offset,
        header.chunk_type.to_string(),
        header.flags,
        label,
        header.skip
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use qg8::{ChunkType, FrameHeader, Label, FLAG_LABEL};

    #[test]
    fn test_format_labeled_frame() {
        let info = FrameInfo {
            offset: 16,
            header: FrameHeader {
                chunk_type: ChunkType::KET,
                flags: FLAG_LABEL,
                label: Some(Label::new("chunk1")),
                skip: 51,
            },
        };
        let line = format_frame(&info);
        assert!(line.contains("ket"));
        assert!(line.contains("0x01"));
        assert!(line.contains("chunk1"));
        assert!(line.trim_end().ends_with("51"));
    }

    #[test]
    fn test_format_unknown_type_without_label() {
        let info = FrameInfo {
            offset: 99,
            header: FrameHeader {
                chunk_type: ChunkType(300),
                flags: 0,
                label: None,
                skip: 0,
            },
        };
        let line = format_frame(&info);
        assert!(line.contains("type#300"));
        assert!(line.contains(" - "));
    }
}
