use super::hasher::sha256_hex;

/// Check whether `proof` solves the puzzle for `reference`:
/// `sha256(reference ++ decimal(proof))` must start with `difficulty`
/// hex `'0'` characters.
pub fn is_valid(reference: &str, proof: u64, difficulty: usize) -> bool {
    let guess = format!("{reference}{proof}");
    let hash = sha256_hex(guess.as_bytes());
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}

/// Brute-force the first proof at or after `start`. Workers outside the
/// ledger do this for real; tests use it at low difficulty.
#[cfg(test)]
pub fn find_proof(reference: &str, difficulty: usize, start: u64) -> u64 {
    let mut proof = start;
    while !is_valid(reference, proof, difficulty) {
        proof = proof.wrapping_add(1);
    }
    proof
}

/// First proof at or after `start` that does NOT solve the puzzle.
#[cfg(test)]
pub fn find_invalid_proof(reference: &str, difficulty: usize, start: u64) -> u64 {
    let mut proof = start;
    while is_valid(reference, proof, difficulty) {
        proof = proof.wrapping_add(1);
    }
    proof
}
