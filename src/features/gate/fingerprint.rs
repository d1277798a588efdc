//! Cache keys for normalized requests.
//! Key: blake3 hash of (lang | text), so the target language or caller locale is part
//! of the key.

use super::validation::NormalizedRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(request: &NormalizedRequest) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(request.lang.as_bytes());
        hasher.update(b"|");
        hasher.update(request.text.as_bytes());
        Fingerprint(*hasher.finalize().as_bytes())
    }
}
