use rand::Rng;

/// Uniformly random offset into a collection of `len` items.
pub fn random_offset(len: u64) -> Option<u64> {
    if len == 0 {
        None
    } else {
        Some(rand::rng().random_range(0..len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_offset_empty() {
        assert_eq!(random_offset(0), None);
    }

    #[test]
    fn test_random_offset_in_range() {
        for _ in 0..100 {
            let offset = random_offset(7).unwrap();
            assert!(offset < 7);
        }
        assert_eq!(random_offset(1), Some(0));
    }
}
