use rand::Rng;

pub const ACCESS_CODE_LEN: usize = 8;

/// No 0/O or 1/I, codes are read aloud and copied from paper.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Parents type codes in any case and with stray whitespace.
pub fn normalize_access_code(code: &str) -> String {
    code.trim().to_uppercase()
}
