use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn random_dna(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
}

/// Replace the base at `pos` with a different one.
pub fn substitute(seq: &mut [u8], pos: usize) {
    seq[pos] = match seq[pos] {
        b'A' => b'C',
        b'C' => b'G',
        b'G' => b'T',
        _ => b'A',
    };
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    trapseg::sequence::reverse_complement_into(seq, &mut out);
    out
}
