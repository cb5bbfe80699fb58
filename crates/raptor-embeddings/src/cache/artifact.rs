//! Binary layout of the on-disk embedding artifact.
//!
//! ```text
//! magic "RPEC" | version u32 | rows u64 | dims u64
//! rows * dims f32 (little-endian, row-major)
//! trailer_len u64 | trailer JSON (model id, node ids, node info)
//! blake3 checksum (32 bytes) over everything before it
//! ```

use serde::{Deserialize, Serialize};

use super::{CachedEmbeddings, NodeInfo};

pub const MAGIC: &[u8; 4] = b"RPEC";
pub const FORMAT_VERSION: u32 = 1;
const CHECKSUM_LEN: usize = 32;

#[derive(Serialize, Deserialize)]
struct Trailer {
    model_id: String,
    node_ids: Vec<String>,
    node_info: Vec<NodeInfo>,
}

pub fn encode(cached: &CachedEmbeddings) -> Result<Vec<u8>, String> {
    let rows = cached.vectors.len();
    let dims = cached.dimensions;
    if cached.node_ids.len() != rows || cached.node_info.len() != rows {
        return Err("node ids and node info must parallel the matrix".into());
    }

    let mut buf = Vec::with_capacity(28 + rows * dims * 4 + CHECKSUM_LEN);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&(rows as u64).to_le_bytes());
    buf.extend_from_slice(&(dims as u64).to_le_bytes());
    for row in &cached.vectors {
        if row.len() != dims {
            return Err(format!("row has {} values, expected {dims}", row.len()));
        }
        for v in row {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    let trailer = Trailer {
        model_id: cached.model_id.clone(),
        node_ids: cached.node_ids.clone(),
        node_info: cached.node_info.clone(),
    };
    let trailer = serde_json::to_vec(&trailer).map_err(|e| e.to_string())?;
    buf.extend_from_slice(&(trailer.len() as u64).to_le_bytes());
    buf.extend_from_slice(&trailer);

    let checksum = blake3::hash(&buf);
    buf.extend_from_slice(checksum.as_bytes());
    Ok(buf)
}

pub fn decode(bytes: &[u8]) -> Result<CachedEmbeddings, String> {
    if bytes.len() < CHECKSUM_LEN {
        return Err("file too short".into());
    }
    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if blake3::hash(payload).as_bytes() != checksum {
        return Err("checksum mismatch".into());
    }

    let mut cursor = payload;
    if take(&mut cursor, 4)? != MAGIC {
        return Err("bad magic".into());
    }
    let version = u32::from_le_bytes(array(take(&mut cursor, 4)?)?);
    if version != FORMAT_VERSION {
        return Err(format!("unsupported format version {version}"));
    }
    let rows = read_len(&mut cursor)?;
    let dims = read_len(&mut cursor)?;

    let matrix_bytes = rows
        .checked_mul(dims)
        .and_then(|n| n.checked_mul(4))
        .ok_or("matrix size overflow")?;
    let matrix = take(&mut cursor, matrix_bytes)?;
    let vectors: Vec<Vec<f32>> = if dims == 0 {
        vec![Vec::new(); rows]
    } else {
        matrix
            .chunks_exact(dims * 4)
            .map(|row| {
                row.chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect()
            })
            .collect()
    };

    let trailer_len = read_len(&mut cursor)?;
    let trailer: Trailer =
        serde_json::from_slice(take(&mut cursor, trailer_len)?).map_err(|e| e.to_string())?;
    if !cursor.is_empty() {
        return Err("trailing bytes after trailer".into());
    }
    if trailer.node_ids.len() != rows || trailer.node_info.len() != rows {
        return Err("trailer does not parallel the matrix".into());
    }

    Ok(CachedEmbeddings {
        model_id: trailer.model_id,
        dimensions: dims,
        node_ids: trailer.node_ids,
        node_info: trailer.node_info,
        vectors,
    })
}

fn take<'a>(cursor: &mut &'a [u8], n: usize) -> Result<&'a [u8], String> {
    if cursor.len() < n {
        return Err(format!("unexpected end of file: wanted {n} bytes"));
    }
    let (head, tail) = cursor.split_at(n);
    *cursor = tail;
    Ok(head)
}

fn array<const N: usize>(bytes: &[u8]) -> Result<[u8; N], String> {
    bytes.try_into().map_err(|_| format!("expected {N} bytes"))
}

fn read_len(cursor: &mut &[u8]) -> Result<usize, String> {
    let value = u64::from_le_bytes(array(take(cursor, 8)?)?);
    usize::try_from(value).map_err(|_| format!("length {value} does not fit in memory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CachedEmbeddings {
        CachedEmbeddings {
            model_id: "hashed-tfidf-3".into(),
            dimensions: 3,
            node_ids: vec!["doc_0".into(), "doc_1".into()],
            node_info: vec![NodeInfo::document("doc_0", 5), NodeInfo::document("doc_1", 6)],
            vectors: vec![vec![0.1, 0.2, 0.3], vec![-1.0, 0.0, f32::MIN_POSITIVE]],
        }
    }

    #[test]
    fn encoded_artifact_decodes_bit_exact() {
        let bytes = encode(&sample()).unwrap();
        assert_eq!(decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn flipped_byte_fails_checksum() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[20] ^= 0x01;
        assert_eq!(decode(&bytes).unwrap_err(), "checksum mismatch");
    }

    #[test]
    fn truncated_file_is_rejected() {
        let bytes = encode(&sample()).unwrap();
        assert!(decode(&bytes[..10]).is_err());
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn ragged_rows_cannot_be_encoded() {
        let mut cached = sample();
        cached.vectors[1].pop();
        assert!(encode(&cached).is_err());
    }
}
