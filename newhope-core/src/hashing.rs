use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake128, Shake256};

/// Expands `data` into `output_len` bytes of SHAKE-256 output
pub fn shake256(data: &[u8], output_len: usize) -> Vec<u8> {
    let mut hasher = Shake256::default();
    Update::update(&mut hasher, data);
    let mut reader = hasher.finalize_xof();

    let mut output = vec![0u8; output_len];
    reader.read(&mut output);

    output
}

/// Unbounded SHAKE-128 stream over `seed`
pub fn shake128_stream(seed: &[u8]) -> impl XofReader {
    let mut hasher = Shake128::default();
    Update::update(&mut hasher, seed);
    hasher.finalize_xof()
}

/// PRF(seed, nonce, len) = SHAKE-256(seed || nonce)
pub fn prf(seed: &[u8], nonce: u8, len: usize) -> Vec<u8> {
    let mut hasher = Shake256::default();
    Update::update(&mut hasher, seed);
    Update::update(&mut hasher, &[nonce]);
    let mut reader = hasher.finalize_xof();

    let mut output = vec![0u8; len];
    reader.read(&mut output);

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake256() {
        let data = b"test data";
        let hash1 = shake256(data, 32);
        let hash2 = shake256(data, 32);

        assert_eq!(hash1, hash2);

        // Longer output extends the shorter one
        let hash3 = shake256(data, 64);
        assert_eq!(hash3[..32], hash1);
    }

    #[test]
    fn test_shake256_known_vector() {
        let expected = hex::decode(
            "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f",
        )
        .unwrap();
        assert_eq!(shake256(b"", 32), expected);
    }

    #[test]
    fn test_shake128_stream_is_continuous() {
        let mut whole = [0u8; 336];
        shake128_stream(b"seed").read(&mut whole);

        let mut reader = shake128_stream(b"seed");
        let mut first = [0u8; 168];
        let mut second = [0u8; 168];
        reader.read(&mut first);
        reader.read(&mut second);

        assert_eq!(&whole[..168], &first[..]);
        assert_eq!(&whole[168..], &second[..]);
    }

    #[test]
    fn test_prf() {
        let seed = b"test seed";

        let out1 = prf(seed, 1, 32);
        let out2 = prf(seed, 1, 32);
        let out3 = prf(seed, 2, 32);

        assert_eq!(out1, out2);
        assert_ne!(out1, out3);
    }

    #[test]
    fn test_prf_appends_nonce() {
        let mut input = b"test seed".to_vec();
        input.push(7);
        assert_eq!(prf(b"test seed", 7, 48), shake256(&input, 48));
    }
}
