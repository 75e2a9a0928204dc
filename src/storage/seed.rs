//! Fixture records for first-run population.

use crate::models::{Person, PersonId};

/// Supplies the records written to an absent or empty store file.
///
/// Implementations must be pure: every call returns an equal list.
pub trait SeedProvider: Send + Sync {
    /// Returns the fixture records.
    fn people(&self) -> Vec<Person>;
}

/// A fixed list is its own seed.
impl SeedProvider for Vec<Person> {
    fn people(&self) -> Vec<Person> {
        self.clone()
    }
}

/// Default roster of 26 people, one per letter.
///
/// Ids are `"NN000000-0000-0000-0000-000000000000"` with `NN` running from
/// `01` (Arne Arndt) to `26` (Zoe Zimmermann).
#[derive(Debug, Clone, Copy, Default)]
pub struct Seed;

const ROSTER: [(&str, &str); 26] = [
    ("Arne", "Arndt"),
    ("Berta", "Bauer"),
    ("Cord", "Conrad"),
    ("Dagmar", "Diehl"),
    ("Ernst", "Engel"),
    ("Frieda", "Fischer"),
    ("Gerd", "Geiger"),
    ("Hanna", "Hoffmann"),
    ("Ingo", "Imhoff"),
    ("Johanna", "Jung"),
    ("Klaus", "Kaiser"),
    ("Luise", "Lehmann"),
    ("Martin", "Meier"),
    ("Norbert", "Neumann"),
    ("Ottilie", "Ott"),
    ("Peter", "Peters"),
    ("Quirin", "Quast"),
    ("Rebecca", "Richter"),
    ("Sarah", "Schmidt"),
    ("Tom", "Termann"),
    ("Ulrike", "Ulrich"),
    ("Volker", "Vogel"),
    ("Walter", "Wagner"),
    ("Xaver", "Xander"),
    ("Yvonne", "Yildiz"),
    ("Zoe", "Zimmermann"),
];

impl Seed {
    /// Id of the `n`-th seeded person (1-based).
    #[must_use]
    pub fn id(n: usize) -> PersonId {
        PersonId::new(format!("{n:02}000000-0000-0000-0000-000000000000"))
    }
}

impl SeedProvider for Seed {
    fn people(&self) -> Vec<Person> {
        ROSTER
            .iter()
            .enumerate()
            .map(|(i, (first, last))| {
                let n = i + 1;
                Person::with_id(Seed::id(n), first, last)
                    .with_email(format!(
                        "{}.{}@example.com",
                        first.to_lowercase(),
                        last.to_lowercase()
                    ))
                    .with_phone(format!("05826 4711 {n:02}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_is_deterministic() {
        assert_eq!(Seed.people(), Seed.people());
    }

    #[test]
    fn test_seed_ids_are_unique_and_well_known() {
        let people = Seed.people();
        assert_eq!(people.len(), 26);

        let ids: HashSet<_> = people.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 26);

        let arne = &people[0];
        assert_eq!(arne.id, "01000000-0000-0000-0000-000000000000");
        assert_eq!(arne.first_name, "Arne");
        assert_eq!(people[25].id, Seed::id(26));
    }

    #[test]
    fn test_seed_records_are_complete() {
        for person in Seed.people() {
            assert!(person.is_complete(), "{person:?}");
            assert!(person.email.is_some());
        }
    }

    #[test]
    fn test_seed_contains_mann_family() {
        let count = Seed
            .people()
            .iter()
            .filter(|p| p.last_name.to_lowercase().contains("mann"))
            .count();
        assert_eq!(count, 5);
    }

    #[test]
    fn test_vec_seed() {
        let fixed = vec![Person::with_id("1", "A", "B")];
        assert_eq!(fixed.people(), fixed);
    }
}
