//! UX composition layer.
//!
//! This crate defines the read-side query contract over roster storage.
//! Backends stay adapters (the JSONL files are one of them); this crate
//! owns the interaction shape used by frontends: the CLI's read commands
//! and the HTTP API in [`http`].

pub mod http;

use chrono::NaiveDate;
use rollbook_directory::{
    DirectoryIndex, FamilyWithMembers, Household, PlotWithFamily, families_with_members,
    plots_with_families,
};
use rollbook_import::ImportSummary;
use rollbook_records::{
    DataDir, Family, Gender, Member, PlotLocation, Record, RecordStore, RecordStoreError,
};
use rollbook_reminders::{ReminderDraft, build_reminder_drafts};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

pub trait RosterBackend {
    fn members(&self) -> &RecordStore<Member>;
    fn families(&self) -> &RecordStore<Family>;
    fn plots(&self) -> &RecordStore<PlotLocation>;
}

/// Backend over the JSONL collections of a data directory.
///
/// Collections load once at construction; an absent file reads as an
/// empty collection, so a fresh layout serves empty lists instead of
/// erroring.
#[derive(Debug, Clone)]
pub struct JsonlRosterBackend {
    members: RecordStore<Member>,
    families: RecordStore<Family>,
    plots: RecordStore<PlotLocation>,
}

impl JsonlRosterBackend {
    pub fn load(data_dir: &DataDir) -> Result<Self, RecordStoreError> {
        Ok(Self {
            members: load_collection(&data_dir.members_file())?,
            families: load_collection(&data_dir.families_file())?,
            plots: load_collection(&data_dir.plots_file())?,
        })
    }
}

fn load_collection<T>(path: &Path) -> Result<RecordStore<T>, RecordStoreError>
where
    T: Record + DeserializeOwned,
{
    if !path.exists() {
        return Ok(RecordStore::default());
    }
    RecordStore::load_jsonl(path)
}

impl RosterBackend for JsonlRosterBackend {
    fn members(&self) -> &RecordStore<Member> {
        &self.members
    }

    fn families(&self) -> &RecordStore<Family> {
        &self.families
    }

    fn plots(&self) -> &RecordStore<PlotLocation> {
        &self.plots
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RosterQuery {
    Summary,
    Members { q: Option<String> },
    Member { id: String },
    Households,
    Families,
    Reminders { date: NaiveDate },
    Plots,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterQueryError {
    #[error("member not found: {0}")]
    MemberNotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone)]
pub struct RosterService<B: RosterBackend> {
    backend: B,
}

impl<B: RosterBackend> RosterService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Roster summary in the same shape the import preview reports.
    pub fn summary(&self) -> ImportSummary {
        let index = DirectoryIndex::hydrate(self.backend.members());
        let groups = index.age_groups();
        let mut male = 0;
        let mut female = 0;
        for member in self.backend.members().records() {
            match member.gender {
                Gender::M => male += 1,
                Gender::F => female += 1,
            }
        }
        ImportSummary {
            total_records: index.len(),
            households: index.households().len(),
            children: groups.children.len(),
            youth: groups.youth.len(),
            adults: groups.adults.len(),
            male,
            female,
        }
    }

    /// Members sorted by preferred name, optionally filtered by a search
    /// term.
    pub fn members(&self, q: Option<&str>) -> Vec<Member> {
        let index = DirectoryIndex::hydrate(self.backend.members());
        index
            .search(q.unwrap_or(""))
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn member(&self, id: &str) -> Option<Member> {
        self.backend.members().get(id).cloned()
    }

    pub fn households(&self) -> Vec<Household> {
        DirectoryIndex::hydrate(self.backend.members())
            .households()
            .to_vec()
    }

    /// Families joined with their members. Stale id lists self-heal in the
    /// returned views; this read path never writes the fix back.
    pub fn families(&self) -> Vec<FamilyWithMembers> {
        let mut families = self.backend.families().clone();
        let (views, _changed) = families_with_members(&mut families, self.backend.members());
        views
    }

    pub fn reminders(&self, date: NaiveDate) -> Vec<ReminderDraft> {
        build_reminder_drafts(self.backend.members(), date)
    }

    pub fn plots(&self) -> Vec<PlotWithFamily> {
        let views = self.families();
        let plots: Vec<PlotLocation> = self.backend.plots().records().cloned().collect();
        plots_with_families(&plots, &views)
    }

    pub fn query_json(&self, query: RosterQuery) -> Result<Value, RosterQueryError> {
        match query {
            RosterQuery::Summary => to_json(self.summary()),
            RosterQuery::Members { q } => to_json(self.members(q.as_deref())),
            RosterQuery::Member { id } => {
                let member = self
                    .member(&id)
                    .ok_or(RosterQueryError::MemberNotFound(id))?;
                to_json(member)
            }
            RosterQuery::Households => to_json(self.households()),
            RosterQuery::Families => to_json(self.families()),
            RosterQuery::Reminders { date } => to_json(self.reminders(date)),
            RosterQuery::Plots => to_json(self.plots()),
        }
    }
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Value, RosterQueryError> {
    serde_json::to_value(value).map_err(|e| RosterQueryError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_directory::init_families;

    struct MockBackend {
        members: RecordStore<Member>,
        families: RecordStore<Family>,
        plots: RecordStore<PlotLocation>,
    }

    impl MockBackend {
        fn seeded() -> Self {
            let mut ada = Member::new("mbr-1", "Lee, Ada", "Lee, Ada");
            ada.age = 41;
            ada.individual_phone = Some("555-0100".to_string());
            ada.birth_date = Some("5 Mar 1985".to_string());
            ada.address_street_1 = "4 Oak Ave".to_string();
            let mut ben = Member::new("mbr-2", "Lee, Ben", "Lee, Ada");
            ben.age = 9;
            let mut kim = Member::new("mbr-3", "Ng, Kim", "Ng, Kim");
            kim.age = 25;
            kim.gender = Gender::F;

            let members = RecordStore::from_records(vec![ada, ben, kim]);
            let mut families = RecordStore::default();
            init_families(&members, &mut families);

            let mut plot = PlotLocation::new("4 Oak Ave", 10.0, 20.0);
            plot.family_id = Some("family-lee,-ada".to_string());
            let plots = RecordStore::from_records(vec![plot]);

            Self {
                members,
                families,
                plots,
            }
        }
    }

    impl RosterBackend for MockBackend {
        fn members(&self) -> &RecordStore<Member> {
            &self.members
        }

        fn families(&self) -> &RecordStore<Family> {
            &self.families
        }

        fn plots(&self) -> &RecordStore<PlotLocation> {
            &self.plots
        }
    }

    #[test]
    fn summary_counts_households_and_age_groups() {
        let service = RosterService::new(MockBackend::seeded());
        let summary = service.summary();
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.households, 2);
        assert_eq!(summary.children, 1);
        assert_eq!(summary.youth, 1);
        assert_eq!(summary.adults, 1);
        assert_eq!(summary.male, 2);
        assert_eq!(summary.female, 1);
    }

    #[test]
    fn members_respects_the_search_term() {
        let service = RosterService::new(MockBackend::seeded());
        assert_eq!(service.members(None).len(), 3);

        let hits = service.members(Some("ng"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].preferred_name, "Ng, Kim");
    }

    #[test]
    fn families_come_back_joined() {
        let service = RosterService::new(MockBackend::seeded());
        let families = service.families();
        assert_eq!(families.len(), 2);
        assert_eq!(families[0].head_of_household, "Lee, Ada");
        assert_eq!(families[0].members.len(), 2);
        assert_eq!(families[0].members[0].preferred_name, "Lee, Ada");
    }

    #[test]
    fn reminders_match_the_given_date() {
        let service = RosterService::new(MockBackend::seeded());
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).expect("date should build");
        let drafts = service.reminders(date);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].body, "Lee, Ada");

        let other = NaiveDate::from_ymd_opt(2026, 7, 1).expect("date should build");
        assert!(service.reminders(other).is_empty());
    }

    #[test]
    fn plots_resolve_their_family() {
        let service = RosterService::new(MockBackend::seeded());
        let plots = service.plots();
        assert_eq!(plots.len(), 1);
        let family = plots[0].family.as_ref().expect("should resolve");
        assert_eq!(family.name, "Lee, Ada");
        assert_eq!(family.address, "4 Oak Ave");
    }

    #[test]
    fn query_json_reports_missing_member() {
        let service = RosterService::new(MockBackend::seeded());
        let err = service
            .query_json(RosterQuery::Member {
                id: "missing".to_string(),
            })
            .expect_err("missing member should error");
        assert!(matches!(err, RosterQueryError::MemberNotFound(_)));
    }

    #[test]
    fn query_json_summary_roundtrip() {
        let service = RosterService::new(MockBackend::seeded());
        let value = service
            .query_json(RosterQuery::Summary)
            .expect("summary should serialize");
        assert_eq!(value["total_records"], 3);
        assert_eq!(value["households"], 2);
    }
}
