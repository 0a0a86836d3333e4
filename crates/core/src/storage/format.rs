use crate::errors::CoreError;
use super::encryption::{KdfParams, SealedPayload, NONCE_LEN, SALT_LEN};

/// Magic bytes identifying a ledger file.
pub const MAGIC: &[u8; 4] = b"PLDG";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8)
pub const HEADER_SIZE: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN + 8;

/// Frame a sealed payload into file bytes.
///
/// Layout (integers little-endian):
/// ```text
/// [PLDG: 4B] [version: 2B] [memory_cost: 4B] [time_cost: 4B] [parallelism: 4B]
/// [salt: 16B] [nonce: 12B] [ciphertext_len: 8B] [ciphertext]
/// ```
pub fn encode(payload: &SealedPayload) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
    buf.extend_from_slice(&payload.kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&payload.kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&payload.kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(&payload.salt);
    buf.extend_from_slice(&payload.nonce);
    buf.extend_from_slice(&(payload.ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(&payload.ciphertext);
    buf
}

/// Parse file bytes back into a sealed payload.
///
/// KDF parameters are range-checked so a crafted header cannot make key
/// derivation allocate unbounded memory. Trailing bytes are rejected.
pub fn decode(data: &[u8]) -> Result<SealedPayload, CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a ledger file".into(),
        ));
    }

    let mut reader = Reader { data, offset: 0 };

    if reader.take::<4>()? != *MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not a ledger file".into(),
        ));
    }

    let version = u16::from_le_bytes(reader.take()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(reader.take()?),
        time_cost: u32::from_le_bytes(reader.take()?),
        parallelism: u32::from_le_bytes(reader.take()?),
    };
    check_range("memory_cost", kdf_params.memory_cost, 8, 1_048_576)?;
    check_range("time_cost", kdf_params.time_cost, 1, 20)?;
    check_range("parallelism", kdf_params.parallelism, 1, 16)?;

    let salt = reader.take::<SALT_LEN>()?;
    let nonce = reader.take::<NONCE_LEN>()?;
    let ciphertext_len = u64::from_le_bytes(reader.take()?);

    let remaining = data.len() - reader.offset;
    if ciphertext_len != remaining as u64 {
        return Err(CoreError::InvalidFileFormat(format!(
            "Ciphertext length mismatch: header says {ciphertext_len} bytes, file has {remaining}"
        )));
    }

    Ok(SealedPayload {
        kdf_params,
        salt,
        nonce,
        ciphertext: data[reader.offset..].to_vec(),
    })
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), CoreError> {
    if !(min..=max).contains(&value) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF {field} out of safe range: {value} (expected {min}..={max})"
        )));
    }
    Ok(())
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let end = self.offset + N;
        let bytes: [u8; N] = self
            .data
            .get(self.offset..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat("Truncated header".into()))?;
        self.offset = end;
        Ok(bytes)
    }
}
