//! Deterministic content checksums
//!
//! Server and clients compare these values to confirm they parsed the same
//! content. Values must not depend on platform, process or hash seeds, so
//! everything here is plain modular arithmetic over stable encodings.
//!
//! Sequences (strings, `Vec`s, slices, ordered maps) are order sensitive.
//! Sets are order insensitive: element sums are added without mixing.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::{EmpireId, ObjectId};

use super::planet::{PlanetEnvironment, PlanetType};

pub const CHECKSUM_MODULUS: u32 = 10_000_000;

const MIX: u64 = 31;

/// Fold `value` into `sum`, position sensitive
pub fn combine(sum: &mut u32, value: u32) {
    *sum = ((*sum as u64 * MIX + value as u64) % CHECKSUM_MODULUS as u64) as u32;
}

/// Add `value` to `sum`, position insensitive
pub fn accumulate(sum: &mut u32, value: u32) {
    *sum = ((*sum as u64 + value as u64) % CHECKSUM_MODULUS as u64) as u32;
}

/// Types that contribute to a content checksum
pub trait CheckSum {
    fn check_sum(&self) -> u32;
}

impl<T: CheckSum + ?Sized> CheckSum for &T {
    fn check_sum(&self) -> u32 {
        (**self).check_sum()
    }
}

impl CheckSum for str {
    fn check_sum(&self) -> u32 {
        let mut sum = 0;
        for byte in self.bytes() {
            combine(&mut sum, byte as u32);
        }
        combine(&mut sum, self.len() as u32);
        sum
    }
}

impl CheckSum for String {
    fn check_sum(&self) -> u32 {
        self.as_str().check_sum()
    }
}

impl CheckSum for bool {
    fn check_sum(&self) -> u32 {
        u32::from(*self)
    }
}

impl CheckSum for u32 {
    fn check_sum(&self) -> u32 {
        *self % CHECKSUM_MODULUS
    }
}

impl CheckSum for i32 {
    fn check_sum(&self) -> u32 {
        (*self as i64).rem_euclid(CHECKSUM_MODULUS as i64) as u32
    }
}

impl CheckSum for f32 {
    fn check_sum(&self) -> u32 {
        self.to_bits() % CHECKSUM_MODULUS
    }
}

impl CheckSum for f64 {
    fn check_sum(&self) -> u32 {
        let bits = self.to_bits();
        ((bits ^ (bits >> 32)) % CHECKSUM_MODULUS as u64) as u32
    }
}

impl CheckSum for EmpireId {
    fn check_sum(&self) -> u32 {
        self.0.check_sum()
    }
}

impl CheckSum for ObjectId {
    fn check_sum(&self) -> u32 {
        self.0.check_sum()
    }
}

impl CheckSum for PlanetType {
    fn check_sum(&self) -> u32 {
        *self as u32 + 1
    }
}

impl CheckSum for PlanetEnvironment {
    fn check_sum(&self) -> u32 {
        *self as u32 + 1
    }
}

impl<T: CheckSum> CheckSum for Option<T> {
    fn check_sum(&self) -> u32 {
        match self {
            Some(value) => {
                let mut sum = 1;
                combine(&mut sum, value.check_sum());
                sum
            }
            None => 0,
        }
    }
}

impl<A: CheckSum, B: CheckSum> CheckSum for (A, B) {
    fn check_sum(&self) -> u32 {
        let mut sum = self.0.check_sum();
        combine(&mut sum, self.1.check_sum());
        sum
    }
}

impl<T: CheckSum> CheckSum for [T] {
    fn check_sum(&self) -> u32 {
        let mut sum = 0;
        for item in self {
            combine(&mut sum, item.check_sum());
        }
        combine(&mut sum, self.len() as u32);
        sum
    }
}

impl<T: CheckSum> CheckSum for Vec<T> {
    fn check_sum(&self) -> u32 {
        self.as_slice().check_sum()
    }
}

impl<T: CheckSum> CheckSum for BTreeSet<T> {
    fn check_sum(&self) -> u32 {
        let mut sum = 0;
        for item in self {
            accumulate(&mut sum, item.check_sum());
        }
        combine(&mut sum, self.len() as u32);
        sum
    }
}

impl<K: CheckSum, V: CheckSum> CheckSum for BTreeMap<K, V> {
    fn check_sum(&self) -> u32 {
        let mut sum = 0;
        for (key, value) in self {
            let mut entry = key.check_sum();
            combine(&mut entry, value.check_sum());
            accumulate(&mut sum, entry);
        }
        combine(&mut sum, self.len() as u32);
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_checksum_is_order_sensitive() {
        assert_ne!("ab".check_sum(), "ba".check_sum());
        assert_eq!("SP_HUMAN".check_sum(), "SP_HUMAN".to_string().check_sum());
    }

    #[test]
    fn test_vec_order_sensitive_set_order_insensitive() {
        let forward = vec!["a".to_string(), "b".to_string()];
        let backward = vec!["b".to_string(), "a".to_string()];
        assert_ne!(forward.check_sum(), backward.check_sum());

        let set_a: BTreeSet<String> = forward.iter().cloned().collect();
        let set_b: BTreeSet<String> = backward.iter().cloned().collect();
        assert_eq!(set_a.check_sum(), set_b.check_sum());
    }

    #[test]
    fn test_map_values_bound_to_keys() {
        let mut a = BTreeMap::new();
        a.insert(PlanetType::Ocean, PlanetEnvironment::Good);
        a.insert(PlanetType::Tundra, PlanetEnvironment::Poor);

        let mut b = BTreeMap::new();
        b.insert(PlanetType::Ocean, PlanetEnvironment::Poor);
        b.insert(PlanetType::Tundra, PlanetEnvironment::Good);

        assert_ne!(a.check_sum(), b.check_sum());
    }

    #[test]
    fn test_values_stay_below_modulus() {
        assert!(u32::MAX.check_sum() < CHECKSUM_MODULUS);
        assert!((-5i32).check_sum() < CHECKSUM_MODULUS);
        assert!(f64::MAX.check_sum() < CHECKSUM_MODULUS);
        assert!("a much longer string than usual".check_sum() < CHECKSUM_MODULUS);
    }
}
