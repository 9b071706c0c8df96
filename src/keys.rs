//! Private key format detection
//!
//! Keys are offered to an ordered list of parsers, one per supported
//! algorithm. The first parser that accepts the file decides its
//! algorithm. OpenSSH-format keys are decoded with `ssh-key`; legacy
//! PKCS#1 RSA and SEC1 EC keys are decoded with the RustCrypto key crates.
//! A file is only accepted when its body decodes, never on its armor alone.

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::RsaPrivateKey;
use ssh_key::{Algorithm, PrivateKey};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AnalyzerError, Result};

/// Key algorithms accepted for authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Ed25519,
    Rsa,
    Ecdsa,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyAlgorithm::Ed25519 => "ed25519",
            KeyAlgorithm::Rsa => "rsa",
            KeyAlgorithm::Ecdsa => "ecdsa",
        };
        f.write_str(name)
    }
}

type KeyParser = fn(&str) -> bool;

/// Parser attempts in the order they are tried
const KEY_PARSERS: [(KeyAlgorithm, KeyParser); 3] = [
    (KeyAlgorithm::Ed25519, parses_as_ed25519),
    (KeyAlgorithm::Rsa, parses_as_rsa),
    (KeyAlgorithm::Ecdsa, parses_as_ecdsa),
];

/// A private key file whose algorithm has been identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKeyFile {
    pub path: PathBuf,
    pub algorithm: KeyAlgorithm,
}

fn openssh_algorithm(contents: &str) -> Option<Algorithm> {
    PrivateKey::from_openssh(contents)
        .ok()
        .filter(|key| !key.is_encrypted())
        .map(|key| key.algorithm())
}

fn decodes_as_pkcs1_rsa(contents: &str) -> bool {
    RsaPrivateKey::from_pkcs1_pem(contents).is_ok()
}

/// SEC1 keys carry their curve, so each supported curve is tried in turn
fn decodes_as_sec1_ecdsa(contents: &str) -> bool {
    p256::SecretKey::from_sec1_pem(contents).is_ok()
        || p384::SecretKey::from_sec1_pem(contents).is_ok()
        || p521::SecretKey::from_sec1_pem(contents).is_ok()
}

fn parses_as_ed25519(contents: &str) -> bool {
    matches!(openssh_algorithm(contents), Some(Algorithm::Ed25519))
}

fn parses_as_rsa(contents: &str) -> bool {
    matches!(openssh_algorithm(contents), Some(Algorithm::Rsa { .. }))
        || decodes_as_pkcs1_rsa(contents)
}

fn parses_as_ecdsa(contents: &str) -> bool {
    matches!(openssh_algorithm(contents), Some(Algorithm::Ecdsa { .. }))
        || decodes_as_sec1_ecdsa(contents)
}

/// Detect the algorithm of key material already read into memory
pub fn detect_algorithm(contents: &str) -> Option<KeyAlgorithm> {
    KEY_PARSERS
        .iter()
        .find(|(_, parses)| parses(contents))
        .map(|(algorithm, _)| *algorithm)
}

/// Load a private key file, trying each supported algorithm in order
pub fn load_private_key(path: &Path) -> Result<PrivateKeyFile> {
    let contents = fs::read_to_string(path).map_err(|source| AnalyzerError::KeyFile {
        path: path.to_path_buf(),
        source,
    })?;

    match detect_algorithm(&contents) {
        Some(algorithm) => {
            debug!(path = %path.display(), %algorithm, "detected private key format");
            Ok(PrivateKeyFile {
                path: path.to_path_buf(),
                algorithm,
            })
        }
        None => Err(AnalyzerError::UnsupportedKeyFormat {
            path: path.to_path_buf(),
            tried: KEY_PARSERS
                .iter()
                .map(|(algorithm, _)| algorithm.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}
