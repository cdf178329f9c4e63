//! Typed option structures for filesystem calls.
//!
//! Engines written against Node-style APIs pass loosely-typed option bags.
//! Each recognized key is a field here; deserializing a bag with any other
//! key fails with [`Error::InvalidOptions`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Text encoding applied when reading or writing file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[serde(alias = "utf-8")]
    Utf8,
    Base64,
    Hex,
    #[serde(alias = "binary")]
    Latin1,
}

impl Encoding {
    /// Name as the engine spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf8",
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
            Encoding::Latin1 => "latin1",
        }
    }

    /// Decode raw bytes into text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::sandbox(format!("invalid utf-8 content: {}", e))),
            Encoding::Base64 => Ok(BASE64.encode(bytes)),
            Encoding::Hex => Ok(bytes.iter().map(|b| format!("{:02x}", b)).collect()),
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    /// Encode text back into raw bytes.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Base64 => BASE64
                .decode(text)
                .map_err(|e| Error::InvalidOptions(format!("invalid base64 content: {}", e))),
            Encoding::Hex => decode_hex(text),
            Encoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        Error::InvalidOptions(format!("character {:?} is not latin1", c))
                    })
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn decode_hex(text: &str) -> Result<Vec<u8>> {
    if text.len() % 2 != 0 {
        return Err(Error::InvalidOptions("hex content has odd length".to_string()));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            text.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| Error::InvalidOptions(format!("invalid hex at offset {}", i)))
        })
        .collect()
}

/// File contents as the engine hands them over: raw bytes or decoded text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileData {
    Text(String),
    Bytes(Vec<u8>),
}

impl FileData {
    /// Raw bytes, encoding text with `encoding` (UTF-8 when absent).
    pub fn to_bytes(&self, encoding: Option<Encoding>) -> Result<Vec<u8>> {
        match self {
            FileData::Bytes(bytes) => Ok(bytes.clone()),
            FileData::Text(text) => encoding.unwrap_or(Encoding::Utf8).encode(text),
        }
    }

    /// Byte length of the stored representation.
    pub fn len(&self) -> usize {
        match self {
            FileData::Bytes(bytes) => bytes.len(),
            FileData::Text(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<u8>> for FileData {
    fn from(bytes: Vec<u8>) -> Self {
        FileData::Bytes(bytes)
    }
}

impl From<&[u8]> for FileData {
    fn from(bytes: &[u8]) -> Self {
        FileData::Bytes(bytes.to_vec())
    }
}

impl From<String> for FileData {
    fn from(text: String) -> Self {
        FileData::Text(text)
    }
}

impl From<&str> for FileData {
    fn from(text: &str) -> Self {
        FileData::Text(text.to_string())
    }
}

/// Options for `read_file`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ReadOptions {
    /// Decode to text with this encoding; raw bytes when absent.
    pub encoding: Option<Encoding>,
}

impl ReadOptions {
    pub fn encoding(encoding: Encoding) -> Self {
        Self {
            encoding: Some(encoding),
        }
    }
}

/// Options for `write_file`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct WriteOptions {
    /// Encoding of text data; UTF-8 when absent.
    pub encoding: Option<Encoding>,
    /// Accepted for compatibility with Node's option bag; the sandbox has no
    /// permission bits so the value is ignored.
    pub mode: Option<u32>,
}

impl WriteOptions {
    pub fn encoding(encoding: Encoding) -> Self {
        Self {
            encoding: Some(encoding),
            mode: None,
        }
    }
}

/// Options for `mkdir`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct MkdirOptions {
    pub recursive: bool,
    /// Ignored; see [`WriteOptions::mode`].
    pub mode: Option<u32>,
}

impl MkdirOptions {
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            mode: None,
        }
    }
}

/// Options for `readdir`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ReadDirOptions {
    /// Return typed entries instead of bare names.
    pub with_file_types: bool,
}

impl ReadDirOptions {
    pub fn with_file_types() -> Self {
        Self {
            with_file_types: true,
        }
    }
}

/// Options for `rm`, `rmdir` and `unlink`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RmOptions {
    pub recursive: bool,
    /// Missing paths are not an error.
    pub force: bool,
}

impl RmOptions {
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            force: false,
        }
    }
}

/// Parse a host-supplied option bag, rejecting unknown keys.
///
/// `null` yields the default options.
pub fn parse_options<T>(bag: serde_json::Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match bag {
        serde_json::Value::Null => Ok(T::default()),
        // Node accepts a bare encoding string in place of `{ encoding }`
        serde_json::Value::String(s) => {
            serde_json::from_value(serde_json::json!({ "encoding": s }))
                .map_err(|e| Error::InvalidOptions(e.to_string()))
        }
        other => serde_json::from_value(other).map_err(|e| Error::InvalidOptions(e.to_string())),
    }
}
