use std::collections::VecDeque;

use crate::config::Config;
use crate::load_document::Document;

/// Separators tried in order before falling back to single characters.
pub const SEPARATORS: [&str; 2] = ["\n\n", "\n"];

#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub source: String,
    pub page: Option<usize>,
    pub chunk_index: usize,
    /// Char offset of the chunk inside the document text.
    pub start_index: usize,
}

pub fn chunk_text(text: &str, cfg: &Config) -> Vec<String> {
    let size = cfg.chunk_size;
    let mut overlap = cfg.chunk_overlap;

    if size == 0 {
        return vec![text.to_string()];
    }
    if overlap >= size {
        overlap = size / 4;
    }

    split_recursive(text, &SEPARATORS, size, overlap)
}

/// Split every document and tag each chunk with its source and position.
/// `chunk_index` counts per source file, across pages.
pub fn split_documents(docs: &[Document], cfg: &Config) -> Vec<Chunk> {
    let mut out = Vec::new();
    let mut next_index = 0usize;
    let mut current_source: Option<&str> = None;

    for doc in docs {
        if current_source != Some(doc.metadata.source.as_str()) {
            current_source = Some(doc.metadata.source.as_str());
            next_index = 0;
        }
        let pieces = chunk_text(&doc.text, cfg);
        for (piece, start_index) in pieces.iter().zip(start_indexes(&doc.text, &pieces)) {
            out.push(Chunk {
                text: piece.clone(),
                metadata: ChunkMetadata {
                    source: doc.metadata.source.clone(),
                    page: doc.metadata.page,
                    chunk_index: next_index,
                    start_index,
                },
            });
            next_index += 1;
        }
    }

    out
}

/// Char offsets of each chunk, searched forward so repeated text gets increasing offsets.
/// A chunk that is not a verbatim substring keeps the previous offset.
pub fn start_indexes(text: &str, chunks: &[String]) -> Vec<usize> {
    let mut out = Vec::with_capacity(chunks.len());
    let mut search_from = 0usize;
    let mut last = 0usize;

    for chunk in chunks {
        let found = text[search_from..]
            .find(chunk.as_str())
            .map(|pos| search_from + pos);
        if let Some(byte_pos) = found {
            last = text[..byte_pos].chars().count();
            search_from = next_boundary(text, byte_pos);
        }
        out.push(last);
    }

    out
}

fn next_boundary(text: &str, byte_pos: usize) -> usize {
    text[byte_pos..]
        .chars()
        .next()
        .map(|c| byte_pos + c.len_utf8())
        .unwrap_or(text.len())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_recursive(text: &str, separators: &[&str], size: usize, overlap: usize) -> Vec<String> {
    let position = separators.iter().position(|sep| text.contains(sep));
    let (separator, rest): (&str, &[&str]) = match position {
        Some(i) => (separators[i], &separators[i + 1..]),
        None => ("", &[]),
    };

    let pieces: Vec<&str> = if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).filter(|s| !s.is_empty()).collect()
    };

    let mut chunks = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    for piece in pieces {
        if char_len(piece) < size {
            pending.push(piece);
            continue;
        }
        if !pending.is_empty() {
            chunks.extend(merge_pieces(&pending, separator, size, overlap));
            pending.clear();
        }
        if separator.is_empty() {
            push_joined(&mut chunks, &VecDeque::from([piece]), separator);
        } else {
            chunks.extend(split_recursive(piece, rest, size, overlap));
        }
    }
    if !pending.is_empty() {
        chunks.extend(merge_pieces(&pending, separator, size, overlap));
    }

    chunks
}

fn merge_pieces(pieces: &[&str], separator: &str, size: usize, overlap: usize) -> Vec<String> {
    let sep_len = char_len(separator);
    let mut chunks = Vec::new();
    let mut current: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    let joiner = |current: &VecDeque<&str>| if current.is_empty() { 0 } else { sep_len };

    for &piece in pieces {
        let len = char_len(piece);
        if total + len + joiner(&current) > size && !current.is_empty() {
            push_joined(&mut chunks, &current, separator);
            while total > overlap || (total > 0 && total + len + joiner(&current) > size) {
                let Some(first) = current.pop_front() else {
                    break;
                };
                total -= char_len(first) + joiner(&current);
            }
        }
        total += len + joiner(&current);
        current.push_back(piece);
    }
    push_joined(&mut chunks, &current, separator);

    chunks
}

fn push_joined(chunks: &mut Vec<String>, current: &VecDeque<&str>, separator: &str) {
    let joined = current.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
