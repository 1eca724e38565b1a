/// Intersect two ascending, duplicate-free sequences with a two-pointer merge.
///
/// Both inputs must already be sorted ascending without duplicates; this is
/// not checked. The output keeps the same invariant and runs in
/// `O(a.len() + b.len())`.
pub fn intersect_sorted<T: Ord + Copy>(a: &[T], b: &[T]) -> Vec<T> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let (av, bv) = (a[i], b[j]);
        if av == bv {
            result.push(av);
            i += 1;
            j += 1;
        } else if av > bv {
            j += 1;
        } else {
            i += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_intersect_basic() {
        let a = [1, 3, 5, 7, 9];
        let b = [2, 3, 4, 7, 10];
        assert_eq!(intersect_sorted(&a, &b), vec![3, 7]);
    }

    #[test]
    fn test_intersect_commutative() {
        let a = [0x10101, 0x10102, 0x20305, 0x30101];
        let b = [0x10102, 0x30101, 0x30102];
        assert_eq!(intersect_sorted(&a, &b), intersect_sorted(&b, &a));
    }

    #[test]
    fn test_intersect_identity_and_empty() {
        let a = [2u32, 4, 8, 16];
        assert_eq!(intersect_sorted(&a, &a), a.to_vec());
        assert!(intersect_sorted(&a, &[]).is_empty());
        assert!(intersect_sorted::<u32>(&[], &a).is_empty());
    }

    #[test]
    fn test_intersect_matches_set_semantics() {
        // Deterministic pseudo-random sets
        let mut seed = 0x2545_f491_u32;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed % 500
        };

        for _ in 0..20 {
            let a: BTreeSet<u32> = (0..120).map(|_| next()).collect();
            let b: BTreeSet<u32> = (0..120).map(|_| next()).collect();
            let av: Vec<u32> = a.iter().copied().collect();
            let bv: Vec<u32> = b.iter().copied().collect();

            let expected: Vec<u32> = a.intersection(&b).copied().collect();
            assert_eq!(intersect_sorted(&av, &bv), expected);
        }
    }
}
