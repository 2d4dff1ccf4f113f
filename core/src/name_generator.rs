//! Deterministic account-holder names for synthetic batches.
//!
//! Same RNG seed = same names.

use crate::{rng::SampleRng, types::AccountId};

pub struct NameGenerator;

impl NameGenerator {
    /// "First Last", drawn from the curated lists.
    pub fn full_name(rng: &mut SampleRng) -> AccountId {
        format!("{} {}", rng.pick(Self::first_names()), rng.pick(Self::last_names()))
    }

    /// `n` pairwise-distinct names. Falls back to a numeric suffix if the
    /// lists run dry, so the result is always exactly `n` long.
    pub fn distinct_names(rng: &mut SampleRng, n: usize) -> Vec<AccountId> {
        let mut names: Vec<AccountId> = Vec::with_capacity(n);
        let mut attempts = 0;
        while names.len() < n {
            let mut candidate = Self::full_name(rng);
            attempts += 1;
            if attempts > n * 8 {
                candidate = format!("{candidate} {}", names.len() + 1);
            }
            if !names.contains(&candidate) {
                names.push(candidate);
            }
        }
        names
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "James", "Emma", "Liam", "Olivia", "Noah", "Ava", "William", "Sophia",
            "Benjamin", "Isabella", "Lucas", "Mia", "Henry", "Charlotte", "Alexander",
            "Amelia", "Sebastian", "Harper", "Jack", "Evelyn", "Mateo", "Aria",
            "Daniel", "Chloe", "Samuel", "Layla", "David", "Nora", "Joseph", "Zoe",
            "Owen", "Hazel", "Levi", "Aurora", "Elijah", "Priya", "Kenji", "Fatima",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller",
            "Davis", "Rodriguez", "Martinez", "Nguyen", "Patel", "Kim", "Chen",
            "Okafor", "Silva", "Kowalski", "Haddad", "Novak", "Tanaka", "Rossi",
            "Dubois", "Schmidt", "Murphy", "Cohen", "Singh", "Moreau", "Larsen",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_names() {
        let mut a = SampleRng::new(7, 0);
        let mut b = SampleRng::new(7, 0);
        assert_eq!(NameGenerator::full_name(&mut a), NameGenerator::full_name(&mut b));
    }

    #[test]
    fn distinct_names_are_unique() {
        let mut rng = SampleRng::new(99, 0);
        let names = NameGenerator::distinct_names(&mut rng, 6);
        assert_eq!(names.len(), 6);
        for (i, n) in names.iter().enumerate() {
            assert!(!names[i + 1..].contains(n), "duplicate name {n}");
        }
    }
}
