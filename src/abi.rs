// src/abi.rs
//! Minimal ABI plumbing for the two fixed contract interfaces. Every
//! argument and return value in either ABI is static (uint256, address,
//! bool), so calldata is a 4-byte selector followed by 32-byte words and
//! return data is a flat run of words.

use crate::error::AppError;
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

pub const WORD: usize = 32;

fn keccak(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// First four bytes of keccak-256 of the canonical function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address([u8; 20]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case rendering.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = keccak(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                digest[i / 2] >> 4
            } else {
                digest[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = AppError;

    /// Accepts `0x` + 40 hex characters. A mixed-case body must carry a
    /// valid EIP-55 checksum; uniform case is accepted as-is.
    fn from_str(s: &str) -> Result<Self, AppError> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("address must start with 0x: {}", trimmed))
            })?;
        if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::InvalidInput(format!(
                "address must be 40 hex characters: {}",
                trimmed
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(body.to_ascii_lowercase(), &mut bytes)
            .map_err(|e| AppError::InvalidInput(format!("undecodable address: {}", e)))?;
        let address = Address(bytes);

        let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
        if has_upper && has_lower && address.to_checksum()[2..] != *body {
            return Err(AppError::InvalidInput(format!(
                "address checksum mismatch: {}",
                trimmed
            )));
        }
        Ok(address)
    }
}

/// Calldata builder: selector followed by left-padded static words.
pub struct CallBuilder {
    data: Vec<u8>,
}

impl CallBuilder {
    pub fn new(signature: &str) -> Self {
        Self {
            data: selector(signature).to_vec(),
        }
    }

    pub fn uint(mut self, value: u128) -> Self {
        self.data.extend_from_slice(&[0u8; 16]);
        self.data.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn address(mut self, address: &Address) -> Self {
        self.data.extend_from_slice(&[0u8; 12]);
        self.data.extend_from_slice(address.as_bytes());
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

/// Word-indexed view over the return payload of a contract query.
#[derive(Debug, Clone)]
pub struct ReturnData {
    words: Vec<[u8; WORD]>,
}

impl ReturnData {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.len() % WORD != 0 {
            return Err(AppError::Remote(format!(
                "call result is not word aligned: {} bytes",
                bytes.len()
            )));
        }
        let words = bytes
            .chunks_exact(WORD)
            .map(|chunk| {
                let mut word = [0u8; WORD];
                word.copy_from_slice(chunk);
                word
            })
            .collect();
        Ok(Self { words })
    }

    pub fn parse(payload: &str) -> Result<Self, AppError> {
        let trimmed = payload.trim();
        let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(body)
            .map_err(|e| AppError::Remote(format!("undecodable call result: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn word(&self, index: usize) -> Result<&[u8; WORD], AppError> {
        self.words
            .get(index)
            .ok_or_else(|| AppError::Remote(format!("missing return word {}", index)))
    }

    pub fn uint(&self, index: usize) -> Result<u128, AppError> {
        let word = self.word(index)?;
        if word[..16].iter().any(|&b| b != 0) {
            return Err(AppError::Remote(format!(
                "uint256 return value at word {} exceeds 128 bits",
                index
            )));
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&word[16..]);
        Ok(u128::from_be_bytes(low))
    }

    pub fn boolean(&self, index: usize) -> Result<bool, AppError> {
        Ok(self.word(index)?[WORD - 1] != 0)
    }

    pub fn address(&self, index: usize) -> Result<Address, AppError> {
        let word = self.word(index)?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Ok(Address(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_match_the_published_token_abi() {
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(selector("allowance(address,address)"), [0xdd, 0x62, 0xed, 0x3e]);
        assert_eq!(selector("approve(address,uint256)"), [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(selector("decimals()"), [0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn call_builder_pads_static_words() {
        let owner: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        let data = CallBuilder::new("approve(address,uint256)")
            .address(&owner)
            .uint(7)
            .build();
        assert_eq!(data.len(), 4 + 2 * WORD);
        assert_eq!(&data[..4], &selector("approve(address,uint256)"));
        assert!(data[4..16].iter().all(|&b| b == 0));
        assert_eq!(&data[16..36], owner.as_bytes());
        assert!(data[36..67].iter().all(|&b| b == 0));
        assert_eq!(data[67], 7);
    }

    #[test]
    fn checksummed_address_round_trips() {
        // Test vector from EIP-55.
        let text = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let address: Address = text.parse().unwrap();
        assert_eq!(address.to_checksum(), text);
    }

    #[test]
    fn uniform_case_addresses_are_accepted() {
        let lower: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(lower.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn bad_checksum_is_rejected() {
        let err = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
            .parse::<Address>()
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for input in ["", "0x", "0x1234", "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", "0xzz..."] {
            assert!(input.parse::<Address>().is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn return_data_decodes_words() {
        let mut bytes = vec![0u8; 3 * WORD];
        bytes[31] = 1; // bool true
        bytes[2 * WORD - 1] = 42; // uint 42
        bytes[2 * WORD + 12..3 * WORD].copy_from_slice(&[0xaa; 20]); // address
        let data = ReturnData::from_bytes(&bytes).unwrap();
        assert!(data.boolean(0).unwrap());
        assert_eq!(data.uint(1).unwrap(), 42);
        assert_eq!(data.address(2).unwrap().as_bytes(), &[0xaa; 20]);
    }

    #[test]
    fn oversized_uint_is_an_error() {
        let mut bytes = vec![0u8; WORD];
        bytes[0] = 1;
        let data = ReturnData::from_bytes(&bytes).unwrap();
        assert!(matches!(data.uint(0), Err(AppError::Remote(_))));
    }

    #[test]
    fn missing_word_is_an_error() {
        let data = ReturnData::parse("0x").unwrap();
        assert!(data.is_empty());
        assert!(matches!(data.uint(0), Err(AppError::Remote(_))));
    }

    #[test]
    fn unaligned_payload_is_an_error() {
        assert!(ReturnData::parse("0x0102").is_err());
    }
}
