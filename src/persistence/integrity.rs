//! Signed best-score payloads
//!
//! Not cryptography. The salt is derived from game constants and the hashes
//! are FNV/Murmur mixes, which only raises the bar against casual edits of
//! saved data. All arithmetic is wrapping `u32` so signatures stay
//! compatible with saves written by the web build.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_PLAUSIBLE_SCORE;

/// Constants the salt is derived from (grid size, line points, jackpot,
/// canvas width/height, drag depth, board and glow colors)
const ENTROPY_FACTORS: [u32; 8] = [8, 100, 500, 450, 700, 100, 0x1e0b36, 0xbc13fe];

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const MURMUR_M: u32 = 0x5bd1_e995;
const MURMUR_C2: u32 = 0x1b87_3593;

/// Signature bucket width
const BUCKET_MS: i64 = 60_000;
/// Buckets either side of the stored timestamp that still verify
const BUCKET_TOLERANCE: i64 = 5;

/// Why a payload was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("score {0} is not plausible")]
    Implausible(i64),
    #[error("version fingerprint mismatch")]
    FingerprintMismatch,
    #[error("signature verification failed")]
    BadSignature,
    #[error("checksum chain broken")]
    BrokenChecksum,
}

/// Persisted best score with its integrity fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePayload {
    pub high_score: i64,
    /// Primary signature
    pub sig: String,
    /// Signing timestamp (ms)
    pub ts: u64,
    /// Chain checksum
    pub cs: String,
    /// Version fingerprint
    pub gv: String,
    #[serde(default)]
    pub last_played: u64,
}

fn entropy() -> [u32; 8] {
    let mut out = [0u32; 8];
    for (i, &f) in ENTROPY_FACTORS.iter().enumerate() {
        // f64 product: the web build rounds the last factor past 2^53 and
        // existing saves depend on that value.
        let spread = ((f as f64 * 2_654_435_761.0) as u64) as u32;
        let salt = ((i as u32) + 1).wrapping_mul(2_246_822_519);
        out[i] = spread ^ salt;
    }
    out
}

/// Lowercase base-36 rendering
fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(7);
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

/// FNV-1a over UTF-16 code units followed by `rounds` Murmur-style mixes
fn multi_round_hash(input: &str, rounds: usize) -> u32 {
    let mut h = FNV_OFFSET;
    for unit in input.encode_utf16() {
        h ^= unit as u32;
        h = h.wrapping_mul(FNV_PRIME);
    }

    let e = entropy();
    for r in 0..rounds {
        h ^= e[r % e.len()];
        h = h.wrapping_mul(MURMUR_M);
        h ^= h >> 13;
        h = h.wrapping_mul(MURMUR_M);
        h ^= h >> 15;
    }
    h
}

/// Fingerprint of the constants the salt is built from
pub fn version_fingerprint() -> String {
    let fp = entropy()
        .iter()
        .fold(0u32, |fp, &e| fp.rotate_left(7) ^ e);
    to_base36(fp)
}

fn chain_checksum(score: i64, ts: u64) -> String {
    let ts_bits = (ts as u32) >> 8;
    let folded = (score as i32) ^ (0xA5A5_A5A5u32 as i32);
    let combined = format!("{}:{}:{}", score, to_base36(ts_bits), folded);
    to_base36(multi_round_hash(&combined, 3))
}

fn signature_for_bucket(score: i64, bucket: i64) -> String {
    let vfp = version_fingerprint();
    let layer1 = multi_round_hash(&format!("{vfp}|{score}|{vfp}"), 4);
    let layer2 = multi_round_hash(&format!("{layer1}|{bucket}"), 3);

    let e = entropy();
    let mut h = layer2 ^ e[score.rem_euclid(e.len() as i64) as usize];
    h = h.wrapping_mul(MURMUR_C2);
    h ^= h >> 16;
    to_base36(h)
}

/// Signature binding `score` to the minute containing `ts`
pub fn generate_signature(score: i64, ts: u64) -> String {
    signature_for_bucket(score, ts as i64 / BUCKET_MS)
}

/// Accepts signatures made up to five minutes either side of `ts`
pub fn verify_signature(score: i64, sig: &str, ts: u64) -> bool {
    let bucket = ts as i64 / BUCKET_MS;
    (-BUCKET_TOLERANCE..=BUCKET_TOLERANCE)
        .any(|offset| signature_for_bucket(score, bucket + offset) == sig)
}

/// Rejects negative and absurdly large scores
pub fn is_score_plausible(score: i64) -> bool {
    (0..=MAX_PLAUSIBLE_SCORE as i64).contains(&score)
}

/// Build a signed payload for `score` at time `now_ms`
pub fn create_payload(score: u64, now_ms: u64) -> ScorePayload {
    let score = score as i64;
    ScorePayload {
        high_score: score,
        sig: generate_signature(score, now_ms),
        ts: now_ms,
        cs: chain_checksum(score, now_ms),
        gv: version_fingerprint(),
        last_played: now_ms,
    }
}

/// Check every layer of a payload and return its score
pub fn validate_payload(payload: &ScorePayload) -> Result<u64, IntegrityError> {
    if payload.sig.is_empty() || payload.ts == 0 || payload.cs.is_empty() || payload.gv.is_empty()
    {
        return Err(IntegrityError::Malformed("missing integrity field".into()));
    }

    let score = payload.high_score;
    if !is_score_plausible(score) {
        log::warn!("[Integrity] Score failed sanity check: {}", score);
        return Err(IntegrityError::Implausible(score));
    }

    if payload.gv != version_fingerprint() {
        log::warn!("[Integrity] Version fingerprint mismatch");
        return Err(IntegrityError::FingerprintMismatch);
    }

    if !verify_signature(score, &payload.sig, payload.ts) {
        log::warn!("[Integrity] Signature verification failed");
        return Err(IntegrityError::BadSignature);
    }

    if payload.cs != chain_checksum(score, payload.ts) {
        log::warn!("[Integrity] Checksum chain broken");
        return Err(IntegrityError::BrokenChecksum);
    }

    Ok(score as u64)
}

/// Parse and validate a JSON payload
pub fn validate_json(json: &str) -> Result<u64, IntegrityError> {
    let payload: ScorePayload =
        serde_json::from_str(json).map_err(|e| IntegrityError::Malformed(e.to_string()))?;
    validate_payload(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: u64 = 1_700_000_000_000;

    #[test]
    fn test_entropy_matches_web_build() {
        assert_eq!(
            entropy(),
            [
                1951401983, 3330022858, 2509959889, 170705150, 36326319, 3995940846, 2917060375,
                1481683736
            ]
        );
        assert_eq!(version_fingerprint(), "gvgbw6");
    }

    #[test]
    fn test_hash_vectors() {
        assert_eq!(multi_round_hash("abc", 4), 1299682437);
        assert_eq!(multi_round_hash("", 3), 824963601);
    }

    #[test]
    fn test_signature_vectors() {
        assert_eq!(generate_signature(0, TS), "pwuyea");
        assert_eq!(chain_checksum(0, TS), "e3f4b0");
        assert_eq!(generate_signature(1234, TS), "1ozl67l");
        assert_eq!(chain_checksum(1234, TS), "n3f2nq");
        assert_eq!(generate_signature(999_999, TS), "qven6");
        assert_eq!(chain_checksum(999_999, TS), "j28hby");
    }

    #[test]
    fn test_signature_time_window() {
        let sig = generate_signature(1234, TS);
        assert!(verify_signature(1234, &sig, TS + 5 * 60_000));
        assert!(verify_signature(1234, &sig, TS - 5 * 60_000));
        assert!(!verify_signature(1234, &sig, TS + 6 * 60_000 + 1));
        assert!(!verify_signature(1235, &sig, TS));
    }

    #[test]
    fn test_payload_roundtrip_validates() {
        let payload = create_payload(4321, TS);
        assert_eq!(validate_payload(&payload), Ok(4321));

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"highScore\":4321"));
        assert!(json.contains("\"lastPlayed\""));
        assert_eq!(validate_json(&json), Ok(4321));
    }

    #[test]
    fn test_tampering_is_detected() {
        let payload = create_payload(4321, TS);

        let mut bumped = payload.clone();
        bumped.high_score = 9999;
        assert_eq!(validate_payload(&bumped), Err(IntegrityError::BadSignature));

        let mut bad_sig = payload.clone();
        bad_sig.sig = "zzzzzz".into();
        assert_eq!(validate_payload(&bad_sig), Err(IntegrityError::BadSignature));

        let mut bad_cs = payload.clone();
        bad_cs.cs = "0".into();
        assert_eq!(validate_payload(&bad_cs), Err(IntegrityError::BrokenChecksum));

        let mut bad_gv = payload.clone();
        bad_gv.gv = "abc".into();
        assert_eq!(
            validate_payload(&bad_gv),
            Err(IntegrityError::FingerprintMismatch)
        );

        let mut negative = payload;
        negative.high_score = -5;
        assert_eq!(validate_payload(&negative), Err(IntegrityError::Implausible(-5)));
    }

    #[test]
    fn test_plausibility_bounds() {
        assert!(is_score_plausible(0));
        assert!(is_score_plausible(999_999));
        assert!(!is_score_plausible(1_000_000));
        assert!(!is_score_plausible(-1));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            validate_json("{\"highScore\": 10}"),
            Err(IntegrityError::Malformed(_))
        ));
        assert!(matches!(validate_json("nope"), Err(IntegrityError::Malformed(_))));
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(u32::MAX), "1z141z3");
    }
}
