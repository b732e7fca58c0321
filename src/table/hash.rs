//! Hashing and bucket sizing
//!
//! FNV-1a (64-bit) over the raw key bytes, reduced modulo a prime bucket
//! count. Not cryptographic.

/// FNV-1a 64-bit offset basis
pub const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;

/// FNV-1a 64-bit prime
pub const FNV_PRIME: u64 = 1_099_511_628_211;

/// FNV-1a: XOR each byte into the accumulator, then multiply
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Bucket for `key` in a table of `bucket_count` buckets
pub fn bucket_index(key: &str, bucket_count: usize) -> usize {
    (fnv1a(key.as_bytes()) % bucket_count as u64) as usize
}

/// Trial division by odd candidates up to √n
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Smallest prime ≥ n
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}
