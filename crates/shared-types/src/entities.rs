//! # Core Domain Entities
//!
//! Transactions, block headers and blocks together with their canonical
//! little-endian wire encodings.
//!
//! ## Transaction layout
//!
//! ```text
//! version i32 | varint #in | { prev_tx_id 32 | prev_out_index u32 | varbytes unlock | sequence u32 }
//!             | varint #out | { value i64 | varbytes lock } | lock_time u32
//! ```
//!
//! ## Header layout (80 bytes)
//!
//! ```text
//! version u32 | prev_block_hash 32 | merkle_root 32 | timestamp u32 | bits u32 | nonce u32
//! ```

use std::collections::HashMap;

use crate::codec::{put_var_bytes, put_var_int, ByteReader};
use crate::errors::{CodecError, CodecResult};
use crate::hashing::sha256d;

// =============================================================================
// PRIMITIVES
// =============================================================================

/// A 32-byte digest (double SHA-256 throughout this workspace).
pub type Hash = [u8; 32];

/// The all-zero digest: genesis parent and coinbase previous-tx reference.
pub const ZERO_HASH: Hash = [0u8; 32];

/// `prev_out_index` value marking a coinbase input.
pub const COINBASE_OUT_INDEX: u32 = 0xffff_ffff;

/// Serialized header size.
pub const HEADER_SIZE: usize = 80;

/// Offset of the nonce inside a serialized header.
pub const NONCE_OFFSET: usize = 76;

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// A reference to a previous output plus the data unlocking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    pub prev_tx_id: Hash,
    pub prev_out_index: u32,
    /// Signature material, or arbitrary data for a coinbase.
    pub unlock_script: Vec<u8>,
    pub sequence: u32,
}

impl TxIn {
    /// The reward input: no real previous output, `data` as unlock script.
    pub fn coinbase(data: Vec<u8>) -> Self {
        Self {
            prev_tx_id: ZERO_HASH,
            prev_out_index: COINBASE_OUT_INDEX,
            unlock_script: data,
            sequence: u32::MAX,
        }
    }

    pub fn is_coinbase(&self) -> bool {
        self.prev_tx_id == ZERO_HASH && self.prev_out_index == COINBASE_OUT_INDEX
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.prev_tx_id);
        buf.extend_from_slice(&self.prev_out_index.to_le_bytes());
        put_var_bytes(buf, &self.unlock_script);
        buf.extend_from_slice(&self.sequence.to_le_bytes());
    }

    fn decode(reader: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            prev_tx_id: reader.read_array()?,
            prev_out_index: reader.read_u32_le()?,
            unlock_script: reader.read_var_bytes()?,
            sequence: reader.read_u32_le()?,
        })
    }
}

/// An amount locked to a recipient commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    pub value: i64,
    pub lock_script: Vec<u8>,
}

impl TxOut {
    pub fn new(value: i64, lock_script: Vec<u8>) -> Self {
        Self { value, lock_script }
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.value.to_le_bytes());
        put_var_bytes(buf, &self.lock_script);
    }

    fn decode(reader: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            value: reader.read_i64_le()?,
            lock_script: reader.read_var_bytes()?,
        })
    }
}

/// An immutable transaction.
///
/// The id is `sha256d(serialize())`, computed once here and used everywhere
/// an identity is needed: merkle leaves, input references and fee lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    version: i32,
    inputs: Vec<TxIn>,
    outputs: Vec<TxOut>,
    lock_time: u32,
    id: Hash,
}

impl Transaction {
    pub fn new(version: i32, inputs: Vec<TxIn>, outputs: Vec<TxOut>, lock_time: u32) -> Self {
        let mut tx = Self {
            version,
            inputs,
            outputs,
            lock_time,
            id: ZERO_HASH,
        };
        tx.id = sha256d(&tx.serialize());
        tx
    }

    pub fn id(&self) -> Hash {
        self.id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn inputs(&self) -> &[TxIn] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    pub fn lock_time(&self) -> u32 {
        self.lock_time
    }

    /// A single input carrying the coinbase marker.
    pub fn is_coinbase(&self) -> bool {
        matches!(self.inputs.as_slice(), [input] if input.is_coinbase())
    }

    /// Canonical encoding.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + 48 * self.inputs.len() + 32 * self.outputs.len());
        self.encode_into(&mut buf);
        buf
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.version.to_le_bytes());
        put_var_int(buf, self.inputs.len() as u64);
        for input in &self.inputs {
            input.encode_into(buf);
        }
        put_var_int(buf, self.outputs.len() as u64);
        for output in &self.outputs {
            output.encode_into(buf);
        }
        buf.extend_from_slice(&self.lock_time.to_le_bytes());
    }

    /// Decode one transaction from `reader`, leaving any following bytes.
    pub fn decode(reader: &mut ByteReader<'_>) -> CodecResult<Self> {
        let version = reader.read_i32_le()?;

        let input_count = reader.read_length()?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TxIn::decode(reader)?);
        }

        let output_count = reader.read_length()?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TxOut::decode(reader)?);
        }

        let lock_time = reader.read_u32_le()?;
        Ok(Self::new(version, inputs, outputs, lock_time))
    }

    /// Decode exactly one transaction; trailing bytes are an error.
    pub fn deserialize(bytes: &[u8]) -> CodecResult<Self> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(tx)
    }

    /// Sum of all output values.
    pub fn output_total(&self) -> CodecResult<i64> {
        self.outputs
            .iter()
            .try_fold(0i64, |acc, out| acc.checked_add(out.value))
            .ok_or(CodecError::ValueOverflow)
    }

    /// Consumed input value minus produced output value.
    ///
    /// `resolved` maps previous transaction ids to the transactions they name
    /// and must cover every non-coinbase input. Coinbase inputs consume
    /// nothing.
    pub fn calculate_fee(&self, resolved: &HashMap<Hash, Transaction>) -> CodecResult<i64> {
        let mut input_total: i64 = 0;
        for input in self.inputs.iter().filter(|input| !input.is_coinbase()) {
            let prev = resolved
                .get(&input.prev_tx_id)
                .ok_or(CodecError::MissingResolution {
                    tx_id: input.prev_tx_id,
                })?;
            let spent = prev
                .outputs
                .get(input.prev_out_index as usize)
                .ok_or(CodecError::OutputIndexOutOfRange {
                    tx_id: input.prev_tx_id,
                    index: input.prev_out_index,
                })?;
            input_total = input_total
                .checked_add(spent.value)
                .ok_or(CodecError::ValueOverflow)?;
        }

        input_total
            .checked_sub(self.output_total()?)
            .ok_or(CodecError::ValueOverflow)
    }
}

// =============================================================================
// BLOCK HEADER
// =============================================================================

/// Check that externally supplied hash fields are exactly 32 bytes.
pub fn validate_structure(prev_block_hash: &[u8], merkle_root: &[u8]) -> CodecResult<()> {
    if prev_block_hash.len() != 32 {
        return Err(CodecError::MalformedHeader {
            reason: format!("prev_block_hash is {} bytes, expected 32", prev_block_hash.len()),
        });
    }
    if merkle_root.len() != 32 {
        return Err(CodecError::MalformedHeader {
            reason: format!("merkle_root is {} bytes, expected 32", merkle_root.len()),
        });
    }
    Ok(())
}

/// The fixed 80-byte block header.
///
/// Two headers are the same header iff their hashes are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u32,
    pub prev_block_hash: Hash,
    pub merkle_root: Hash,
    /// Seconds since the Unix epoch.
    pub timestamp: u32,
    /// Compact difficulty target.
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// Build a header from untyped hash slices, rejecting wrong lengths
    /// with [`CodecError::MalformedHeader`].
    pub fn from_parts(
        version: u32,
        prev_block_hash: &[u8],
        merkle_root: &[u8],
        timestamp: u32,
        bits: u32,
        nonce: u32,
    ) -> CodecResult<Self> {
        validate_structure(prev_block_hash, merkle_root)?;
        let mut header = Self {
            version,
            prev_block_hash: ZERO_HASH,
            merkle_root: ZERO_HASH,
            timestamp,
            bits,
            nonce,
        };
        header.prev_block_hash.copy_from_slice(prev_block_hash);
        header.merkle_root.copy_from_slice(merkle_root);
        Ok(header)
    }

    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.prev_block_hash);
        out[36..68].copy_from_slice(&self.merkle_root);
        out[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[NONCE_OFFSET..HEADER_SIZE].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Header identity: double SHA-256 of the serialized form.
    pub fn hash(&self) -> Hash {
        sha256d(&self.serialize())
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_block_hash == ZERO_HASH
    }

    pub fn decode(reader: &mut ByteReader<'_>) -> CodecResult<Self> {
        let available = reader.remaining();
        if available < HEADER_SIZE {
            return Err(CodecError::TruncatedInput {
                needed: HEADER_SIZE,
                remaining: available,
            });
        }
        Ok(Self {
            version: reader.read_u32_le()?,
            prev_block_hash: reader.read_array()?,
            merkle_root: reader.read_array()?,
            timestamp: reader.read_u32_le()?,
            bits: reader.read_u32_le()?,
            nonce: reader.read_u32_le()?,
        })
    }

    /// Decode the header from the first 80 bytes of `bytes`.
    pub fn deserialize(bytes: &[u8]) -> CodecResult<Self> {
        Self::decode(&mut ByteReader::new(bytes))
    }
}

// =============================================================================
// BLOCK
// =============================================================================

/// A header, its transactions and the height assigned by the chain store.
///
/// Height never appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
    pub height: u64,
}

impl Block {
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    pub fn is_genesis(&self) -> bool {
        self.header.is_genesis()
    }

    pub fn transaction_ids(&self) -> Vec<Hash> {
        self.transactions.iter().map(Transaction::id).collect()
    }

    /// `header | varint #tx | transactions`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE + 9 + 128 * self.transactions.len());
        buf.extend_from_slice(&self.header.serialize());
        put_var_int(&mut buf, self.transactions.len() as u64);
        for tx in &self.transactions {
            tx.encode_into(&mut buf);
        }
        buf
    }

    /// Decode a stored block, attaching the `height` the caller knows it at.
    pub fn deserialize(bytes: &[u8], height: u64) -> CodecResult<Self> {
        let mut reader = ByteReader::new(bytes);
        let header = BlockHeader::decode(&mut reader)?;
        let count = reader.read_length()?;
        let mut transactions = Vec::with_capacity(count);
        for _ in 0..count {
            transactions.push(Transaction::decode(&mut reader)?);
        }
        reader.finish()?;
        Ok(Self {
            header,
            transactions,
            height,
        })
    }
}
