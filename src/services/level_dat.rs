// level.dat reader
//
// level.dat is a gzip-compressed NBT document. Only a handful of fields are
// needed, so this is a small tree reader rather than a full serde format.

use crate::models::LevelData;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const MAX_DEPTH: usize = 512;

#[derive(Debug, Error)]
pub enum NbtError {
    #[error("decompression failed: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("unknown tag type {0}")]
    UnknownTag(u8),

    #[error("negative length {0}")]
    NegativeLength(i32),

    #[error("nesting deeper than {MAX_DEPTH} levels")]
    TooDeep,

    #[error("root tag is not a compound")]
    RootNotCompound,

    #[error("missing field {0}")]
    MissingField(&'static str),
}

/// A decoded NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(HashMap<String, Tag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    fn get(&self, key: &str) -> Option<&Tag> {
        match self {
            Tag::Compound(map) => map.get(key),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match *self {
            Tag::Byte(v) => Some(v as i64),
            Tag::Short(v) => Some(v as i64),
            Tag::Int(v) => Some(v as i64),
            Tag::Long(v) => Some(v),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Parse a (possibly gzip-compressed) `level.dat`.
pub fn parse_level_dat(bytes: &[u8]) -> Result<LevelData, NbtError> {
    let root = read_root(bytes)?;
    let data = root.get("Data").ok_or(NbtError::MissingField("Data"))?;

    // Pre-1.16 worlds store the seed directly, newer ones under WorldGenSettings.
    let seed = data
        .get("RandomSeed")
        .and_then(Tag::as_i64)
        .or_else(|| {
            data.get("WorldGenSettings")
                .and_then(|settings| settings.get("seed"))
                .and_then(Tag::as_i64)
        })
        .ok_or(NbtError::MissingField("RandomSeed"))?;

    // Spawn coordinates outside the i32 range are treated as absent.
    let int_field = |key: &str| {
        data.get(key)
            .and_then(Tag::as_i64)
            .and_then(|value| i32::try_from(value).ok())
            .unwrap_or(0)
    };
    let string_field = |key: &str| data.get(key).and_then(Tag::as_str).map(String::from);

    Ok(LevelData {
        level_name: string_field("LevelName"),
        seed,
        spawn_x: int_field("SpawnX"),
        spawn_z: int_field("SpawnZ"),
        generator_name: string_field("generatorName"),
    })
}

/// Decode the root compound of an NBT document.
pub fn read_root(bytes: &[u8]) -> Result<Tag, NbtError> {
    let raw = if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut decoded)?;
        decoded
    } else {
        bytes.to_vec()
    };

    let mut reader = NbtReader {
        cursor: Cursor::new(raw.as_slice()),
    };
    let tag_type = reader.u8()?;
    if tag_type != 10 {
        return Err(NbtError::RootNotCompound);
    }
    let _name = reader.string()?;
    reader.payload(tag_type, 0)
}

struct NbtReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl NbtReader<'_> {
    fn bytes<const N: usize>(&mut self) -> Result<[u8; N], NbtError> {
        let mut buf = [0u8; N];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| NbtError::UnexpectedEof)?;
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8, NbtError> {
        Ok(self.bytes::<1>()?[0])
    }

    fn i16(&mut self) -> Result<i16, NbtError> {
        Ok(i16::from_be_bytes(self.bytes()?))
    }

    fn i32(&mut self) -> Result<i32, NbtError> {
        Ok(i32::from_be_bytes(self.bytes()?))
    }

    fn i64(&mut self) -> Result<i64, NbtError> {
        Ok(i64::from_be_bytes(self.bytes()?))
    }

    fn length(&mut self) -> Result<usize, NbtError> {
        let len = self.i32()?;
        let len = usize::try_from(len).map_err(|_| NbtError::NegativeLength(len))?;
        let remaining = self.cursor.get_ref().len() as u64 - self.cursor.position();
        if len as u64 > remaining {
            return Err(NbtError::UnexpectedEof);
        }
        Ok(len)
    }

    fn string(&mut self) -> Result<String, NbtError> {
        let len = self.i16()? as u16 as usize;
        let mut buf = vec![0u8; len];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| NbtError::UnexpectedEof)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn payload(&mut self, tag_type: u8, depth: usize) -> Result<Tag, NbtError> {
        if depth > MAX_DEPTH {
            return Err(NbtError::TooDeep);
        }

        let tag = match tag_type {
            1 => Tag::Byte(self.u8()? as i8),
            2 => Tag::Short(self.i16()?),
            3 => Tag::Int(self.i32()?),
            4 => Tag::Long(self.i64()?),
            5 => Tag::Float(f32::from_be_bytes(self.bytes()?)),
            6 => Tag::Double(f64::from_be_bytes(self.bytes()?)),
            7 => {
                let len = self.length()?;
                let values = (0..len)
                    .map(|_| self.u8().map(|b| b as i8))
                    .collect::<Result<_, _>>()?;
                Tag::ByteArray(values)
            }
            8 => Tag::String(self.string()?),
            9 => {
                let element_type = self.u8()?;
                let len = self.length()?;
                let mut items = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    items.push(self.payload(element_type, depth + 1)?);
                }
                Tag::List(items)
            }
            10 => {
                let mut map = HashMap::new();
                loop {
                    let child_type = self.u8()?;
                    if child_type == 0 {
                        break;
                    }
                    let name = self.string()?;
                    let value = self.payload(child_type, depth + 1)?;
                    map.insert(name, value);
                }
                Tag::Compound(map)
            }
            11 => {
                let len = self.length()?;
                let values = (0..len).map(|_| self.i32()).collect::<Result<_, _>>()?;
                Tag::IntArray(values)
            }
            12 => {
                let len = self.length()?;
                let values = (0..len).map(|_| self.i64()).collect::<Result<_, _>>()?;
                Tag::LongArray(values)
            }
            other => return Err(NbtError::UnknownTag(other)),
        };

        Ok(tag)
    }
}
