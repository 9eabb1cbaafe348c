use serde::{Deserialize, Serialize};

/// One member of a household, as far as pricing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdMember {
    pub age: u32,
    #[serde(default)]
    pub cremation: bool,
}

impl HouseholdMember {
    pub fn new(age: u32, cremation: bool) -> Self {
        Self { age, cremation }
    }
}

/// The household facts the price rules depend on.
///
/// # Examples
///
/// ```
/// use billing_rules::pricing::group::{GroupComposition, HouseholdMember};
///
/// let group = GroupComposition::from_members(&[
///     HouseholdMember::new(52, true),
///     HouseholdMember::new(49, false),
///     HouseholdMember::new(17, false),
/// ]);
/// assert_eq!(group.member_count, 3);
/// assert_eq!(group.cremation_count, 1);
/// assert_eq!(group.max_age, 52);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupComposition {
    pub member_count: u32,
    pub cremation_count: u32,
    pub max_age: u32,
}

impl GroupComposition {
    pub fn new(member_count: u32, cremation_count: u32, max_age: u32) -> Self {
        Self {
            member_count,
            cremation_count,
            max_age,
        }
    }

    /// Derive the composition from the household's member list.
    pub fn from_members(members: &[HouseholdMember]) -> Self {
        let member_count = u32::try_from(members.len()).unwrap_or(u32::MAX);
        let cremation_count =
            u32::try_from(members.iter().filter(|m| m.cremation).count()).unwrap_or(u32::MAX);
        let max_age = members.iter().map(|m| m.age).max().unwrap_or(0);

        Self {
            member_count,
            cremation_count,
            max_age,
        }
    }

    /// Household size used for pricing: never less than one.
    pub fn priced_members(&self) -> u32 {
        self.member_count.max(1)
    }
}
