//! Match members against a target date and resolve who to text.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use rollbook_records::{Member, RecordStore};

use crate::dates::matches_month_day;

/// Everyone celebrating an anniversary in one household. One greeting goes
/// to the couple, keyed by head-of-house.
#[derive(Debug, Clone)]
pub struct AnniversaryGroup<'a> {
    pub head_of_house: String,
    pub members: Vec<&'a Member>,
}

/// Members whose birth date lands on `on` (month and day, any year).
pub fn birthdays_on(store: &RecordStore<Member>, on: NaiveDate) -> Vec<&Member> {
    store
        .records()
        .filter(|member| {
            member
                .birth_date
                .as_deref()
                .is_some_and(|raw| matches_month_day(raw, on))
        })
        .collect()
}

/// Households with an anniversary on `on`, grouped by head-of-house.
pub fn anniversaries_on(store: &RecordStore<Member>, on: NaiveDate) -> Vec<AnniversaryGroup<'_>> {
    let mut by_house: BTreeMap<String, Vec<&Member>> = BTreeMap::new();
    for member in store.records() {
        let matches = member
            .marriage_date
            .as_deref()
            .is_some_and(|raw| matches_month_day(raw, on));
        if matches {
            by_house
                .entry(member.head_of_house.clone())
                .or_default()
                .push(member);
        }
    }
    by_house
        .into_iter()
        .map(|(head_of_house, members)| AnniversaryGroup {
            head_of_house,
            members,
        })
        .collect()
}

/// The household head: the member whose preferred name equals the
/// head-of-house key.
pub fn household_head<'a>(
    store: &'a RecordStore<Member>,
    head_of_house: &str,
) -> Option<&'a Member> {
    store
        .records()
        .find(|m| m.head_of_house == head_of_house && m.preferred_name == head_of_house)
}

/// Phone to text for a member's birthday. Minors get the head's phone;
/// adults their own. Whitespace-only phones count as absent.
pub fn birthday_phone(member: &Member, store: &RecordStore<Member>) -> Option<String> {
    if member.age < 18 {
        return household_head(store, &member.head_of_house).and_then(trimmed_phone);
    }
    trimmed_phone(member)
}

/// Phone to text for a household's anniversary: the head's phone, else any
/// member of the household with one.
pub fn anniversary_phone(head_of_house: &str, store: &RecordStore<Member>) -> Option<String> {
    if let Some(head) = household_head(store, head_of_house)
        && let Some(phone) = trimmed_phone(head)
    {
        return Some(phone);
    }
    store
        .records()
        .filter(|m| m.head_of_house == head_of_house)
        .find_map(trimmed_phone)
}

fn trimmed_phone(member: &Member) -> Option<String> {
    member
        .individual_phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, name: &str, house: &str, age: u8) -> Member {
        let mut m = Member::new(id, name, house);
        m.age = age;
        m
    }

    fn on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 5).expect("date should build")
    }

    #[test]
    fn birthdays_match_month_and_day_only() {
        let mut a = member("mbr-1", "Lee, Ada", "Lee, Ada", 41);
        a.birth_date = Some("5 Mar 1985".to_string());
        let mut b = member("mbr-2", "Lee, Ben", "Lee, Ada", 9);
        b.birth_date = Some("6 Mar 2017".to_string());
        let c = member("mbr-3", "Ng, Kim", "Ng, Kim", 55);

        let store = RecordStore::from_records(vec![a, b, c]);
        let hits = birthdays_on(&store, on());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].preferred_name, "Lee, Ada");
    }

    #[test]
    fn anniversaries_group_one_entry_per_household() {
        let mut a = member("mbr-1", "Lee, Ada", "Lee, Ada", 41);
        a.marriage_date = Some("5 Mar 2010".to_string());
        let mut b = member("mbr-2", "Lee, Sam", "Lee, Ada", 43);
        b.marriage_date = Some("5 Mar 2010".to_string());

        let store = RecordStore::from_records(vec![a, b]);
        let groups = anniversaries_on(&store, on());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].head_of_house, "Lee, Ada");
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn minor_birthday_uses_head_phone() {
        let mut head = member("mbr-1", "Lee, Ada", "Lee, Ada", 41);
        head.individual_phone = Some("555-0100".to_string());
        let kid = member("mbr-2", "Lee, Ben", "Lee, Ada", 9);

        let store = RecordStore::from_records(vec![head, kid]);
        let kid = store.get("mbr-2").expect("should exist");
        assert_eq!(birthday_phone(kid, &store).as_deref(), Some("555-0100"));
    }

    #[test]
    fn adult_birthday_uses_own_phone_and_blank_counts_as_absent() {
        let mut adult = member("mbr-1", "Ng, Kim", "Ng, Kim", 55);
        adult.individual_phone = Some("   ".to_string());
        let store = RecordStore::from_records(vec![adult]);
        let adult = store.get("mbr-1").expect("should exist");
        assert_eq!(birthday_phone(adult, &store), None);
    }

    #[test]
    fn anniversary_phone_falls_back_to_any_household_member() {
        let head = member("mbr-1", "Lee, Ada", "Lee, Ada", 41);
        let mut spouse = member("mbr-2", "Lee, Sam", "Lee, Ada", 43);
        spouse.individual_phone = Some("555-0199".to_string());

        let store = RecordStore::from_records(vec![head, spouse]);
        assert_eq!(
            anniversary_phone("Lee, Ada", &store).as_deref(),
            Some("555-0199")
        );
    }

    #[test]
    fn anniversary_phone_prefers_head() {
        let mut head = member("mbr-1", "Lee, Ada", "Lee, Ada", 41);
        head.individual_phone = Some("555-0100".to_string());
        let mut spouse = member("mbr-2", "Lee, Sam", "Lee, Ada", 43);
        spouse.individual_phone = Some("555-0199".to_string());

        let store = RecordStore::from_records(vec![head, spouse]);
        assert_eq!(
            anniversary_phone("Lee, Ada", &store).as_deref(),
            Some("555-0100")
        );
    }
}
