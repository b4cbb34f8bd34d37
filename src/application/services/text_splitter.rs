pub trait TextSplitter {
    fn split_text(&self, text: &str) -> Vec<String>;
}

/// Splits on paragraphs, then lines, then words, then characters until every
/// piece fits, and repeats the tail of each chunk at the head of the next.
///
/// Sizes are in characters. Every chunk, overlap included, is at most
/// `chunk_size` long.
#[derive(Debug, Clone)]
pub struct RecursiveTextSplitter {
    separators: Vec<&'static str>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for RecursiveTextSplitter {
    fn default() -> Self {
        Self::new(1000, 250)
    }
}

impl RecursiveTextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let max_overlap = chunk_size / 2;
        if chunk_overlap > max_overlap {
            tracing::warn!(
                chunk_size,
                requested = chunk_overlap,
                applied = max_overlap,
                "chunk overlap capped at half the chunk size"
            );
        }

        Self {
            separators: vec![
                "\n\n", // Double newline (paragraphs)
                "\n",   // Single newline
                " ",    // Space
                "",     // Character level
            ],
            chunk_size,
            chunk_overlap: chunk_overlap.min(max_overlap),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Room left for fresh text once the overlap prefix and its joining
    /// space are accounted for.
    fn window(&self) -> usize {
        if self.chunk_overlap == 0 {
            self.chunk_size
        } else {
            self.chunk_size
                .saturating_sub(self.chunk_overlap + 1)
                .max(1)
        }
    }

    fn split_by_length(&self, text: &str, max_chunk_size: usize) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(max_chunk_size)
            .map(|piece| piece.iter().collect())
            .collect()
    }

    fn recursive_split(
        &self,
        text: &str,
        max_chunk_size: usize,
        separator_index: usize,
    ) -> Vec<String> {
        if char_len(text) <= max_chunk_size {
            return vec![text.to_string()];
        }

        let separator = match self.separators.get(separator_index) {
            Some(sep) if !sep.is_empty() => *sep,
            _ => return self.split_by_length(text, max_chunk_size),
        };

        let parts: Vec<&str> = text.split(separator).collect();

        if parts.len() == 1 {
            return self.recursive_split(text, max_chunk_size, separator_index + 1);
        }

        let mut chunks = Vec::new();
        let mut current_chunk = String::new();

        for part in parts {
            let candidate = if current_chunk.is_empty() {
                part.to_string()
            } else {
                format!("{}{}{}", current_chunk, separator, part)
            };

            if char_len(&candidate) <= max_chunk_size {
                current_chunk = candidate;
                continue;
            }

            if !current_chunk.is_empty() {
                chunks.push(std::mem::take(&mut current_chunk));
            }
            current_chunk = part.to_string();

            if char_len(&current_chunk) > max_chunk_size {
                chunks.extend(self.recursive_split(
                    &current_chunk,
                    max_chunk_size,
                    separator_index + 1,
                ));
                current_chunk.clear();
            }
        }

        if !current_chunk.is_empty() {
            chunks.push(current_chunk);
        }

        chunks
    }
}

impl TextSplitter for RecursiveTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        let pieces: Vec<String> = self
            .recursive_split(text, self.window(), 0)
            .into_iter()
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect();

        if self.chunk_overlap == 0 || pieces.len() < 2 {
            return pieces;
        }

        let mut chunks = Vec::with_capacity(pieces.len());
        let mut previous: Option<&str> = None;

        for piece in &pieces {
            let chunk = match previous.map(|prev| overlap_tail(prev, self.chunk_overlap)) {
                Some(tail) if !tail.is_empty() => format!("{} {}", tail, piece),
                _ => piece.clone(),
            };
            chunks.push(chunk);
            previous = Some(piece);
        }

        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The last `overlap` characters of `previous`, moved forward to a word
/// boundary when one exists.
fn overlap_tail(previous: &str, overlap: usize) -> &str {
    let total = char_len(previous);
    if total <= overlap {
        return previous;
    }

    let start = previous
        .char_indices()
        .nth(total - overlap)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let tail = &previous[start..];

    match tail.find(char::is_whitespace) {
        Some(pos) => tail[pos..].trim_start(),
        None => tail,
    }
}
