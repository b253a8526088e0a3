//! Derived directory views over the member store.
//!
//! Everything here is computed from members at read time and never written
//! back. Households in particular are a grouping, not a collection: the
//! `head_of_house` string on each member is the only thing that ties a
//! household together.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use rollbook_records::{Member, RecordStore, digits_only};

/// A household grouped out of the roster.
///
/// `created_at` is the earliest member timestamp and `updated_at` the
/// latest, so a household reads as old as its oldest record and as fresh
/// as its most recent import.
#[derive(Debug, Clone, Serialize)]
pub struct Household {
    pub head_of_house: String,
    pub address: String,
    pub members: Vec<Member>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Members bucketed by age band: children under 18, youth 18 to 29,
/// adults 30 and up.
#[derive(Debug, Clone, Serialize)]
pub struct AgeGroups<'a> {
    pub children: Vec<&'a Member>,
    pub youth: Vec<&'a Member>,
    pub adults: Vec<&'a Member>,
}

/// In-memory directory projection hydrated from canonical member state.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    members: BTreeMap<String, Member>,
    households: Vec<Household>,
}

impl DirectoryIndex {
    /// Hydrate directory views from the member store.
    pub fn hydrate(store: &RecordStore<Member>) -> Self {
        let mut members = BTreeMap::new();
        for member in store.records() {
            members.insert(member.id.clone(), member.clone());
        }

        let mut by_house: BTreeMap<String, Vec<Member>> = BTreeMap::new();
        for member in members.values() {
            by_house
                .entry(member.head_of_house.clone())
                .or_default()
                .push(member.clone());
        }

        let mut households = Vec::new();
        for (head_of_house, mut group) in by_house {
            group.sort_by(|a, b| a.preferred_name.cmp(&b.preferred_name));
            let address = group
                .iter()
                .find(|m| !m.address_street_1.trim().is_empty())
                .map(|m| m.address_street_1.clone())
                .unwrap_or_default();
            let created_at = group
                .iter()
                .map(|m| m.created_at)
                .min()
                .unwrap_or_else(Utc::now);
            let updated_at = group
                .iter()
                .map(|m| m.updated_at)
                .max()
                .unwrap_or_else(Utc::now);
            households.push(Household {
                head_of_house,
                address,
                members: group,
                created_at,
                updated_at,
            });
        }

        Self {
            members,
            households,
        }
    }

    /// Lookup one member by id.
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    /// All member ids in deterministic order.
    pub fn member_ids(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Households sorted by head-of-house.
    pub fn households(&self) -> &[Household] {
        &self.households
    }

    /// One household by its head-of-house key.
    pub fn household(&self, head_of_house: &str) -> Option<&Household> {
        self.households
            .iter()
            .find(|h| h.head_of_house == head_of_house)
    }

    /// Members bucketed into children / youth / adults, each bucket sorted
    /// by preferred name.
    pub fn age_groups(&self) -> AgeGroups<'_> {
        let mut groups = AgeGroups {
            children: Vec::new(),
            youth: Vec::new(),
            adults: Vec::new(),
        };
        for member in self.members_by_name() {
            if member.age < 18 {
                groups.children.push(member);
            } else if member.age < 30 {
                groups.youth.push(member);
            } else {
                groups.adults.push(member);
            }
        }
        groups
    }

    /// Members holding at least one calling, sorted by preferred name.
    pub fn members_with_callings(&self) -> Vec<&Member> {
        self.members_by_name()
            .into_iter()
            .filter(|m| !m.callings.is_empty())
            .collect()
    }

    /// Members grouped by priesthood office. Members without an office are
    /// absent from the map.
    pub fn members_by_priesthood(&self) -> BTreeMap<String, Vec<&Member>> {
        let mut by_office: BTreeMap<String, Vec<&Member>> = BTreeMap::new();
        for member in self.members_by_name() {
            if let Some(office) = member.priesthood_office.as_deref()
                && !office.trim().is_empty()
            {
                by_office.entry(office.to_string()).or_default().push(member);
            }
        }
        by_office
    }

    /// Case-insensitive substring search over name, head-of-house, address
    /// and email. Phone matches on digits only, so `555-1234` finds
    /// `(555) 1234`. An empty term matches everyone.
    pub fn search(&self, term: &str) -> Vec<&Member> {
        let needle = term.trim().to_lowercase();
        let needle_digits = digits_only(&needle);

        self.members_by_name()
            .into_iter()
            .filter(|m| {
                if m.preferred_name.to_lowercase().contains(&needle)
                    || m.head_of_house.to_lowercase().contains(&needle)
                    || m.address_street_1.to_lowercase().contains(&needle)
                {
                    return true;
                }
                if let Some(email) = m.individual_email.as_deref()
                    && email.to_lowercase().contains(&needle)
                {
                    return true;
                }
                if !needle_digits.is_empty()
                    && let Some(phone) = m.individual_phone.as_deref()
                    && digits_only(phone).contains(&needle_digits)
                {
                    return true;
                }
                false
            })
            .collect()
    }

    fn members_by_name(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by(|a, b| a.preferred_name.cmp(&b.preferred_name));
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn member(id: &str, name: &str, house: &str, age: u8) -> Member {
        let mut m = Member::new(id, name, house);
        m.age = age;
        m
    }

    fn store(members: Vec<Member>) -> RecordStore<Member> {
        RecordStore::from_records(members)
    }

    #[test]
    fn households_group_and_sort_by_head() {
        let mut a = member("mbr-1", "Smith, Jane", "Smith, John", 34);
        a.address_street_1 = "12 Elm St".to_string();
        let b = member("mbr-2", "Smith, John", "Smith, John", 36);
        let c = member("mbr-3", "Adams, Rex", "Adams, Rex", 71);

        let index = DirectoryIndex::hydrate(&store(vec![a, b, c]));
        let households = index.households();

        assert_eq!(households.len(), 2);
        assert_eq!(households[0].head_of_house, "Adams, Rex");
        assert_eq!(households[1].head_of_house, "Smith, John");
        let names: Vec<&str> = households[1]
            .members
            .iter()
            .map(|m| m.preferred_name.as_str())
            .collect();
        assert_eq!(names, vec!["Smith, Jane", "Smith, John"]);
        assert_eq!(households[1].address, "12 Elm St");
    }

    #[test]
    fn household_timestamps_span_members() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let mut a = member("mbr-1", "Lee, Ada", "Lee, Ada", 40);
        a.created_at = early;
        a.updated_at = early;
        let mut b = member("mbr-2", "Lee, Ben", "Lee, Ada", 12);
        b.created_at = late;
        b.updated_at = late;

        let index = DirectoryIndex::hydrate(&store(vec![a, b]));
        let household = index.household("Lee, Ada").expect("should group");
        assert_eq!(household.created_at, early);
        assert_eq!(household.updated_at, late);
    }

    #[test]
    fn age_groups_use_18_and_30_boundaries() {
        let members = vec![
            member("mbr-1", "A", "h", 17),
            member("mbr-2", "B", "h", 18),
            member("mbr-3", "C", "h", 29),
            member("mbr-4", "D", "h", 30),
        ];
        let index = DirectoryIndex::hydrate(&store(members));
        let groups = index.age_groups();

        assert_eq!(groups.children.len(), 1);
        assert_eq!(groups.youth.len(), 2);
        assert_eq!(groups.adults.len(), 1);
        assert_eq!(groups.adults[0].preferred_name, "D");
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let members = vec![
            member("mbr-1", "Smith, Jane", "Smith, John", 34),
            member("mbr-2", "Adams, Rex", "Adams, Rex", 71),
        ];
        let index = DirectoryIndex::hydrate(&store(members));

        let hits = index.search("smith");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].preferred_name, "Smith, Jane");
    }

    #[test]
    fn search_matches_phone_on_digits_only() {
        let mut m = member("mbr-1", "Smith, Jane", "Smith, John", 34);
        m.individual_phone = Some("(555) 123-4567".to_string());
        let index = DirectoryIndex::hydrate(&store(vec![m]));

        assert_eq!(index.search("5551234").len(), 1);
        assert_eq!(index.search("555-1234").len(), 1);
        assert!(index.search("9999").is_empty());
    }

    #[test]
    fn search_empty_term_returns_everyone_sorted() {
        let members = vec![
            member("mbr-1", "Zed, Max", "Zed, Max", 50),
            member("mbr-2", "Abel, Kim", "Abel, Kim", 50),
        ];
        let index = DirectoryIndex::hydrate(&store(members));

        let hits = index.search("");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].preferred_name, "Abel, Kim");
    }

    #[test]
    fn priesthood_grouping_skips_members_without_office() {
        let mut a = member("mbr-1", "Smith, John", "Smith, John", 36);
        a.priesthood_office = Some("Elder".to_string());
        let b = member("mbr-2", "Smith, Jane", "Smith, John", 34);

        let index = DirectoryIndex::hydrate(&store(vec![a, b]));
        let by_office = index.members_by_priesthood();

        assert_eq!(by_office.len(), 1);
        assert_eq!(by_office["Elder"].len(), 1);
    }
}
