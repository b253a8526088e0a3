//! Plot locations joined with family details for the map view.

use serde::Serialize;

use rollbook_records::PlotLocation;

use crate::families::FamilyWithMembers;

/// Family fields shown on a plot popup.
#[derive(Debug, Clone, Serialize)]
pub struct PlotFamily {
    pub id: String,
    pub name: String,
    pub members: Vec<PlotFamilyMember>,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlotFamilyMember {
    pub name: String,
    pub age: u8,
    pub birthdate: Option<String>,
}

/// A plot with its assigned family resolved, when the id still matches.
#[derive(Debug, Clone, Serialize)]
pub struct PlotWithFamily {
    #[serde(flatten)]
    pub plot: PlotLocation,
    pub family: Option<PlotFamily>,
}

/// Join plots against family views. Contact details come from the first
/// (oldest) member of the joined family.
pub fn plots_with_families(
    plots: &[PlotLocation],
    families: &[FamilyWithMembers],
) -> Vec<PlotWithFamily> {
    plots
        .iter()
        .map(|plot| {
            let family = plot
                .family_id
                .as_deref()
                .and_then(|family_id| families.iter().find(|f| f.id == family_id))
                .map(|family| PlotFamily {
                    id: family.id.clone(),
                    name: family.head_of_household.clone(),
                    members: family
                        .members
                        .iter()
                        .map(|m| PlotFamilyMember {
                            name: m.preferred_name.clone(),
                            age: m.age,
                            birthdate: m.birth_date.clone(),
                        })
                        .collect(),
                    address: family.address.clone().unwrap_or_default(),
                    phone: family.members.first().and_then(|m| m.individual_phone.clone()),
                    email: family.members.first().and_then(|m| m.individual_email.clone()),
                });
            PlotWithFamily {
                plot: plot.clone(),
                family,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_records::{Member, RecordStore};

    use crate::families::{families_with_members, init_families};

    fn member(id: &str, name: &str, house: &str, age: u8) -> Member {
        let mut m = Member::new(id, name, house);
        m.age = age;
        m
    }

    fn lee_family_views() -> Vec<FamilyWithMembers> {
        let mut ada = member("mbr-1", "Lee, Ada", "Lee, Ada", 41);
        ada.individual_phone = Some("555-0100".to_string());
        ada.address_street_1 = "4 Oak Ave".to_string();
        let ben = member("mbr-2", "Lee, Ben", "Lee, Ada", 9);

        let members = RecordStore::from_records(vec![ada, ben]);
        let mut families = RecordStore::default();
        init_families(&members, &mut families);
        let (views, _) = families_with_members(&mut families, &members);
        views
    }

    #[test]
    fn join_resolves_family_and_oldest_member_contact() {
        let views = lee_family_views();
        let mut plot = PlotLocation::new("4 Oak Ave", 10.0, 20.0);
        plot.family_id = Some("family-lee,-ada".to_string());

        let joined = plots_with_families(&[plot], &views);
        assert_eq!(joined.len(), 1);
        let family = joined[0].family.as_ref().expect("should resolve");
        assert_eq!(family.name, "Lee, Ada");
        assert_eq!(family.members.len(), 2);
        assert_eq!(family.address, "4 Oak Ave");
        assert_eq!(family.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn unassigned_and_dangling_plots_carry_no_family() {
        let views = lee_family_views();
        let unassigned = PlotLocation::new("1 Elm St", 0.0, 0.0);
        let mut dangling = PlotLocation::new("2 Elm St", 0.0, 0.0);
        dangling.family_id = Some("family-gone".to_string());

        let joined = plots_with_families(&[unassigned, dangling], &views);
        assert!(joined[0].family.is_none());
        assert!(joined[1].family.is_none());
    }

    #[test]
    fn empty_family_list_still_joins_plots() {
        let plot = PlotLocation::new("1 Elm St", 50.0, 50.0);
        let joined = plots_with_families(&[plot], &[]);
        assert_eq!(joined.len(), 1);
        assert!(joined[0].family.is_none());
    }
}
