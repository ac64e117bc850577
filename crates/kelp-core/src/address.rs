//! Bech32m address encoding for puzzle hashes.
//!
//! A Kelp address is the Bech32m ([BIP-350]) encoding of a version byte
//! (currently 0) and a 32-byte puzzle hash:
//! - Mainnet: `kelp1...`
//! - Testnet: `tkelp1...`
//!
//! Addresses are a display-layer convenience — the ledger only ever sees
//! puzzle hashes.
//!
//! [BIP-350]: https://github.com/bitcoin/bips/blob/master/bip-0350.mediawiki

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;
use crate::types::Hash256;

/// Bech32m checksum constant (BIP-350).
const BECH32M_CONST: u32 = 0x2bc8_30a3;

/// Character set for encoding 5-bit groups.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Current address version.
pub const ADDRESS_VERSION: u8 = 0;

/// Network identifier determining the address prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Mainnet (addresses start with `kelp1`).
    Mainnet,
    /// Testnet (addresses start with `tkelp1`).
    Testnet,
}

impl Network {
    /// Human-readable prefix for this network.
    pub fn hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "kelp",
            Network::Testnet => "tkelp",
        }
    }

    /// Look up a network from its human-readable prefix.
    pub fn from_hrp(hrp: &str) -> Result<Self, AddressError> {
        match hrp {
            "kelp" => Ok(Network::Mainnet),
            "tkelp" => Ok(Network::Testnet),
            _ => Err(AddressError::UnknownNetwork(hrp.to_string())),
        }
    }
}

/// A puzzle-hash address with its network tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    puzzle_hash: Hash256,
    network: Network,
}

impl Address {
    /// Wrap a puzzle hash for the given network.
    pub fn from_puzzle_hash(puzzle_hash: Hash256, network: Network) -> Self {
        Self {
            puzzle_hash,
            network,
        }
    }

    /// The encoded puzzle hash.
    pub fn puzzle_hash(&self) -> Hash256 {
        self.puzzle_hash
    }

    /// The network this address belongs to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Encode as a Bech32m string.
    pub fn encode(&self) -> String {
        let hrp = self.network.hrp();
        let mut payload = vec![ADDRESS_VERSION];
        payload.extend(convert_bits(self.puzzle_hash.as_bytes(), 8, 5, true));

        let checksum = create_checksum(hrp, &payload);
        let mut out = String::with_capacity(hrp.len() + 1 + payload.len() + 6);
        out.push_str(hrp);
        out.push('1');
        for v in payload.iter().chain(checksum.iter()) {
            out.push(CHARSET[*v as usize] as char);
        }
        out
    }

    /// Decode a Bech32m address string.
    pub fn decode(s: &str) -> Result<Self, AddressError> {
        if s.chars().any(|c| c.is_ascii_uppercase())
            && s.chars().any(|c| c.is_ascii_lowercase())
        {
            return Err(AddressError::MixedCase);
        }
        let s = s.to_ascii_lowercase();

        let (hrp, data_part) = s.rsplit_once('1').ok_or(AddressError::MissingSeparator)?;
        let network = Network::from_hrp(hrp)?;

        let mut data = Vec::with_capacity(data_part.len());
        for c in data_part.chars() {
            let idx = CHARSET
                .iter()
                .position(|&b| b as char == c)
                .ok_or(AddressError::InvalidCharacter(c))?;
            data.push(idx as u8);
        }

        if !verify_checksum(hrp, &data) {
            return Err(AddressError::InvalidChecksum);
        }

        // Strip the 6 checksum groups, then the version byte.
        if data.len() < 7 {
            return Err(AddressError::InvalidLength);
        }
        let payload = &data[..data.len() - 6];
        let version = payload[0];
        if version != ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion(version));
        }

        let bytes = convert_bits_checked(&payload[1..], 5, 8)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength)?;

        Ok(Self {
            puzzle_hash: Hash256(bytes),
            network,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Regroup bits, padding the tail when `pad` is set.
///
/// Only used with (8, 5) on encode; the decode path goes through
/// [`convert_bits_checked`] which rejects invalid padding.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Vec<u8> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::new();
    let maxv: u32 = (1 << to) - 1;
    for &b in data {
        acc = (acc << from) | b as u32;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad && bits > 0 {
        out.push(((acc << (to - bits)) & maxv) as u8);
    }
    out
}

/// Regroup 5-bit groups back to bytes, rejecting non-zero padding.
fn convert_bits_checked(data: &[u8], from: u32, to: u32) -> Result<Vec<u8>, AddressError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::new();
    let maxv: u32 = (1 << to) - 1;
    for &b in data {
        if (b as u32) >> from != 0 {
            return Err(AddressError::InvalidPadding);
        }
        acc = (acc << from) | b as u32;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & maxv) as u8);
        }
    }
    if bits >= from || ((acc << (to - bits)) & maxv) != 0 {
        return Err(AddressError::InvalidPadding);
    }
    Ok(out)
}

fn polymod(values: &[u8]) -> u32 {
    const GEN: [u32; 5] = [
        0x3b6a_57b2,
        0x2650_8e6d,
        0x1ea1_19fa,
        0x3d42_33dd,
        0x2a14_62b3,
    ];
    let mut chk: u32 = 1;
    for &v in values {
        let b = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ v as u32;
        for (i, g) in GEN.iter().enumerate() {
            if (b >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut out: Vec<u8> = hrp.bytes().map(|b| b >> 5).collect();
    out.push(0);
    out.extend(hrp.bytes().map(|b| b & 0x1f));
    out
}

fn create_checksum(hrp: &str, data: &[u8]) -> Vec<u8> {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0; 6]);
    let m = polymod(&values) ^ BECH32M_CONST;
    (0..6).map(|i| ((m >> (5 * (5 - i))) & 0x1f) as u8).collect()
}

fn verify_checksum(hrp: &str, data: &[u8]) -> bool {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    polymod(&values) == BECH32M_CONST
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hash() -> Hash256 {
        Hash256([0x7F; 32])
    }

    #[test]
    fn encode_has_expected_prefix() {
        let addr = Address::from_puzzle_hash(sample_hash(), Network::Mainnet);
        assert!(addr.encode().starts_with("kelp1"));

        let addr = Address::from_puzzle_hash(sample_hash(), Network::Testnet);
        assert!(addr.encode().starts_with("tkelp1"));
    }

    #[test]
    fn round_trip_mainnet() {
        let addr = Address::from_puzzle_hash(sample_hash(), Network::Mainnet);
        let decoded = Address::decode(&addr.encode()).unwrap();
        assert_eq!(decoded, addr);
        assert_eq!(decoded.puzzle_hash(), sample_hash());
    }

    #[test]
    fn round_trip_testnet() {
        let addr = Address::from_puzzle_hash(Hash256([0x01; 32]), Network::Testnet);
        assert_eq!(Address::decode(&addr.encode()).unwrap(), addr);
    }

    #[test]
    fn round_trip_all_byte_patterns() {
        for fill in [0x00u8, 0x01, 0x55, 0xAA, 0xFF] {
            let addr = Address::from_puzzle_hash(Hash256([fill; 32]), Network::Mainnet);
            assert_eq!(Address::decode(&addr.encode()).unwrap(), addr);
        }
    }

    #[test]
    fn decode_rejects_bad_checksum() {
        let mut s = Address::from_puzzle_hash(sample_hash(), Network::Mainnet).encode();
        // Flip the last data character to another charset member.
        let last = s.pop().unwrap();
        s.push(if last == 'q' { 'p' } else { 'q' });
        assert_eq!(Address::decode(&s), Err(AddressError::InvalidChecksum));
    }

    #[test]
    fn decode_rejects_unknown_hrp() {
        let addr = Address::from_puzzle_hash(sample_hash(), Network::Mainnet).encode();
        let swapped = addr.replacen("kelp1", "xch1", 1);
        assert!(matches!(
            Address::decode(&swapped),
            Err(AddressError::UnknownNetwork(_)) | Err(AddressError::InvalidChecksum)
        ));
    }

    #[test]
    fn decode_rejects_mixed_case() {
        let addr = Address::from_puzzle_hash(sample_hash(), Network::Mainnet).encode();
        let mixed = format!("KELP1{}", &addr[5..]);
        assert_eq!(Address::decode(&mixed), Err(AddressError::MixedCase));
    }

    #[test]
    fn decode_accepts_uppercase() {
        let addr = Address::from_puzzle_hash(sample_hash(), Network::Mainnet).encode();
        assert!(Address::decode(&addr.to_ascii_uppercase()).is_ok());
    }

    #[test]
    fn decode_rejects_missing_separator() {
        assert_eq!(
            Address::decode("kelpqqqq"),
            Err(AddressError::MissingSeparator)
        );
    }

    #[test]
    fn decode_rejects_invalid_character() {
        let addr = Address::from_puzzle_hash(sample_hash(), Network::Mainnet).encode();
        let broken = format!("{}b", &addr[..addr.len() - 1]);
        assert!(matches!(
            Address::decode(&broken),
            Err(AddressError::InvalidCharacter('b')) | Err(AddressError::InvalidChecksum)
        ));
    }

    #[test]
    fn from_str_round_trip() {
        let addr = Address::from_puzzle_hash(sample_hash(), Network::Testnet);
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(parsed, addr);
    }
}
