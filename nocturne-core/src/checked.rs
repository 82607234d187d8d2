//! Address keyed write buffer. Later writes replace earlier entries that
//! start inside the written range; the buffer can be rendered as a PPF
//! patch or applied to an image in memory.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::codec::MIN_WRITE_ADDRESS;
use crate::constants::{SECTOR_DATA_END, SECTOR_NEXT_DATA, SECTOR_SIZE};
use crate::{RandomiserError, Result};

const PPF_MAGIC: &[u8] = b"PPF30";
const PPF_ENCODING: u8 = 0x02;
const PPF_DESCRIPTION_LEN: usize = 50;
const PPF_RECORD_MAX: usize = 0xff;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckedValue {
    Char(u8),
    Short(u16),
    Word(u32),
    Long(u64),
    Bytes(Vec<u8>),
}

impl CheckedValue {
    pub fn len(&self) -> usize {
        match self {
            CheckedValue::Char(_) => 1,
            CheckedValue::Short(_) => 2,
            CheckedValue::Word(_) => 4,
            CheckedValue::Long(_) => 8,
            CheckedValue::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Little endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            CheckedValue::Char(v) => vec![*v],
            CheckedValue::Short(v) => v.to_le_bytes().to_vec(),
            CheckedValue::Word(v) => v.to_le_bytes().to_vec(),
            CheckedValue::Long(v) => v.to_le_bytes().to_vec(),
            CheckedValue::Bytes(bytes) => bytes.clone(),
        }
    }

    fn to_json(&self) -> Value {
        let val = match self {
            CheckedValue::Char(v) => json!(v),
            CheckedValue::Short(v) => json!(v),
            CheckedValue::Word(v) => json!(v),
            CheckedValue::Long(v) => json!(v),
            CheckedValue::Bytes(bytes) => json!(bytes),
        };
        json!({ "len": self.len(), "val": val })
    }
}

/// Address following a numeric write, stepping over the sector trailer.
pub fn next_address(address: u32, len: u32) -> u32 {
    let next = address + len;
    if next % SECTOR_SIZE > SECTOR_DATA_END {
        (next / SECTOR_SIZE) * SECTOR_SIZE + SECTOR_NEXT_DATA
    } else {
        next
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Checked {
    writes: BTreeMap<u32, CheckedValue>,
}

impl Checked {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn get(&self, address: u32) -> Option<&CheckedValue> {
        self.writes.get(&address)
    }

    pub fn entries(&self) -> impl Iterator<Item = (u32, &CheckedValue)> + '_ {
        self.writes.iter().map(|(address, value)| (*address, value))
    }

    fn check_address(address: u32) -> Result<()> {
        if address < MIN_WRITE_ADDRESS {
            return Err(RandomiserError::Config(format!("bad address: 0x{:08x}", address)));
        }
        Ok(())
    }

    /// Record `value` at `address` and return the address after it.
    pub fn write(&mut self, address: u32, value: CheckedValue) -> Result<u32> {
        Self::check_address(address)?;
        let len = value.len() as u32;
        let end = address.saturating_add(len.max(1));
        let stale: Vec<u32> = self.writes.range(address..end).map(|(a, _)| *a).collect();
        for key in stale {
            self.writes.remove(&key);
        }
        let numeric = !matches!(value, CheckedValue::Bytes(_));
        self.writes.insert(address, value);
        Ok(if numeric {
            next_address(address, len)
        } else {
            address + len
        })
    }

    pub fn write_char(&mut self, address: u32, value: u8) -> Result<u32> {
        self.write(address, CheckedValue::Char(value))
    }

    pub fn write_short(&mut self, address: u32, value: u16) -> Result<u32> {
        self.write(address, CheckedValue::Short(value))
    }

    pub fn write_word(&mut self, address: u32, value: u32) -> Result<u32> {
        self.write(address, CheckedValue::Word(value))
    }

    pub fn write_long(&mut self, address: u32, value: u64) -> Result<u32> {
        self.write(address, CheckedValue::Long(value))
    }

    pub fn write_string(&mut self, address: u32, bytes: &[u8]) -> Result<u32> {
        self.write(address, CheckedValue::Bytes(bytes.to_vec()))
    }

    /// Replay every write of `other` on top of this buffer.
    pub fn apply(&mut self, other: &Checked) -> Result<()> {
        for (address, value) in &other.writes {
            self.write(*address, value.clone())?;
        }
        Ok(())
    }

    pub fn apply_to_image(&self, image: &mut [u8]) -> Result<()> {
        for (address, value) in &self.writes {
            let start = *address as usize;
            let bytes = value.to_bytes();
            let end = start + bytes.len();
            let target = image.get_mut(start..end).ok_or_else(|| {
                RandomiserError::Config(format!(
                    "write at 0x{:08x} runs past the end of the image",
                    address
                ))
            })?;
            target.copy_from_slice(&bytes);
        }
        Ok(())
    }

    /// PPF 3.0 patch: magic, encoding, padded description, four zero bytes,
    /// then `(u64 address, u8 length, data)` records.
    pub fn to_patch(&self, seed: &str, preset: Option<&str>, tournament: bool) -> Vec<u8> {
        let mut description = format!("SotN randomized: {}", seed);
        let mut info = Vec::new();
        if let Some(preset) = preset {
            info.push(preset);
        }
        if tournament {
            info.push("tournament");
        }
        if !info.is_empty() {
            description.push_str(&format!(" ({})", info.join(" ")));
        }
        let mut patch = Vec::with_capacity(60 + self.writes.len() * 13);
        patch.extend_from_slice(PPF_MAGIC);
        patch.push(PPF_ENCODING);
        let mut text: Vec<u8> = description.bytes().take(PPF_DESCRIPTION_LEN).collect();
        text.resize(PPF_DESCRIPTION_LEN, b' ');
        patch.extend_from_slice(&text);
        patch.extend_from_slice(&[0, 0, 0, 0]);
        for (address, value) in &self.writes {
            let bytes = value.to_bytes();
            for (index, chunk) in bytes.chunks(PPF_RECORD_MAX).enumerate() {
                let offset = (index * PPF_RECORD_MAX) as u64;
                patch.extend_from_slice(&(*address as u64 + offset).to_le_bytes());
                patch.push(chunk.len() as u8);
                patch.extend_from_slice(chunk);
            }
        }
        patch
    }

    /// Short verification code: hash the write set and keep three hex
    /// digits past any leading zeros.
    pub fn sum(&self) -> u32 {
        let digest = Sha256::digest(self.state_json().as_bytes());
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        let digits = hex.trim_start_matches('0');
        u32::from_str_radix(&digits[..3.min(digits.len())], 16).unwrap_or(0)
    }

    /// Write set as a JSON object keyed by address in ascending numeric order.
    fn state_json(&self) -> String {
        let entries: Vec<String> = self
            .writes
            .iter()
            .map(|(address, value)| {
                format!("{}:{}", Value::String(address.to_string()), value.to_json())
            })
            .collect();
        format!("{{{}}}", entries.join(","))
    }
}
