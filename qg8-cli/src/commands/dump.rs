//! Full decode of every chunk with a per-chunk tensor summary.

use anyhow::{Context, Result};
use qg8::{Chunk, CodecConfig, Qg8Reader, Tensor};
use serde::Serialize;

/// Summary of one decoded chunk.
#[derive(Debug, Serialize)]
pub struct ChunkSummary {
    pub index: usize,
    pub offset: u64,
    pub chunk_type: u16,
    pub type_name: Option<String>,
    pub flags: u8,
    pub label: Option<String>,
    pub tensor: Option<TensorSummary>,
}

/// Shape and type information of a decoded tensor.
#[derive(Debug, Serialize)]
pub struct TensorSummary {
    pub packing: String,
    pub itype: String,
    pub dtype: String,
    pub rank: usize,
    pub dimensions: Vec<u64>,
    pub num_elements: u64,
}

impl TensorSummary {
    fn from_tensor(tensor: &Tensor) -> Self {
        Self {
            packing: tensor.packing().to_string(),
            itype: tensor.itype().to_string(),
            dtype: tensor.dtype().to_string(),
            rank: tensor.rank(),
            dimensions: tensor.dimensions().to_vec(),
            num_elements: tensor.num_elements(),
        }
    }
}

impl ChunkSummary {
    fn from_chunk(index: usize, offset: u64, chunk: &Chunk) -> Self {
        Self {
            index,
            offset,
            chunk_type: chunk.chunk_type().0,
            type_name: chunk.chunk_type().name().map(str::to_string),
            flags: chunk.flags(),
            label: chunk.label().map(|l| l.as_str_lossy().into_owned()),
            tensor: chunk.tensor().map(TensorSummary::from_tensor),
        }
    }
}

/// Decode every chunk of `path` in file order.
pub fn summarize(path: &str, config: CodecConfig) -> Result<Vec<ChunkSummary>> {
    let mut reader = Qg8Reader::open_with(path, config)
        .with_context(|| format!("Failed to open: {}", path))?;

    let mut summaries = Vec::new();
    let mut cursor = reader.chunks();
    while cursor.has_next()? {
        let offset = cursor.offset();
        let chunk = cursor
            .extract()
            .with_context(|| format!("Failed to decode chunk {} at offset {}", summaries.len(), offset))?;
        summaries.push(ChunkSummary::from_chunk(summaries.len(), offset, &chunk));
    }
    Ok(summaries)
}

pub fn run(path: &str, config: CodecConfig, json: bool) -> Result<()> {
    let summaries = summarize(path, config)?;

    if json {
        let out = serde_json::to_string_pretty(&summaries).context("Failed to serialize summary")?;
        println!("{out}");
        return Ok(());
    }

    for s in &summaries {
        let type_name = s.type_name.clone().unwrap_or_else(|| format!("type#{}", s.chunk_type));
        let label = s.label.as_deref().unwrap_or("-");
        println!("chunk {} @ {}: {} flags={:#04x} label={}", s.index, s.offset, type_name, s.flags, label);
        match &s.tensor {
            Some(t) => println!(
                "  {} {} itype={} rank={} dims={:?} elements={}",
                t.packing, t.dtype, t.itype, t.rank, t.dimensions, t.num_elements
            ),
            None => println!("  (no tensor)"),
        }
    }
    println!("{} chunk(s)", summaries.len());
    Ok(())
}
