//! Nucleotide symbol coding and reverse-complement helpers.
//!
//! Symbols outside {A,C,G,T} (case-insensitive) are "invalid": they never
//! match anything, they break k-mer window continuity in the index and the
//! hit finder, and long runs of them split trapezoids.

use bio::alphabets::dna;

/// 2-bit code for a nucleotide, `None` for ambiguous/invalid symbols.
#[inline]
pub fn base_code(b: u8) -> Option<usize> {
    match b {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

/// Whether a symbol is an unambiguous nucleotide.
#[inline]
pub fn is_valid(b: u8) -> bool {
    base_code(b).is_some()
}

/// Whether two symbols are an identical, unambiguous nucleotide pair.
/// Ambiguous symbols match nothing, including themselves.
#[inline]
pub fn bases_match(a: u8, b: u8) -> bool {
    match (base_code(a), base_code(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Rebuild `out` as the reverse complement of `seq`, reusing its capacity.
pub fn reverse_complement_into(seq: &[u8], out: &mut Vec<u8>) {
    out.clear();
    out.extend(seq.iter().rev().map(|&b| dna::complement(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_code() {
        assert_eq!(base_code(b'A'), Some(0));
        assert_eq!(base_code(b'g'), Some(2));
        assert_eq!(base_code(b'N'), None);
        assert_eq!(base_code(b'-'), None);
    }

    #[test]
    fn test_bases_match_ambiguous() {
        assert!(bases_match(b'a', b'A'));
        assert!(!bases_match(b'N', b'N'));
        assert!(!bases_match(b'A', b'C'));
    }

    #[test]
    fn test_reverse_complement() {
        let mut out = Vec::new();
        reverse_complement_into(b"ACGTN", &mut out);
        assert_eq!(&out, b"NACGT");
    }
}
