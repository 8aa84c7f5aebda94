use serde::Serialize;

use super::{
    Activity, Award, BookChapter, Conference, Experience, FinancialSupport, Item, Lab, Profile,
    Publication, ResearchInterest, TeachingInterest, Talk,
};

/// Everything shown on the site, one field per partition.
///
/// Singletons are `None` until their document has been seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub profile: Option<Profile>,
    pub research_interests: Vec<Item<ResearchInterest>>,
    pub teaching_interests: Vec<Item<TeachingInterest>>,
    pub experiences: Vec<Item<Experience>>,
    pub publications: Vec<Item<Publication>>,
    pub book_chapters: Vec<Item<BookChapter>>,
    pub talks: Vec<Item<Talk>>,
    pub activities: Vec<Item<Activity>>,
    pub conferences: Vec<Item<Conference>>,
    pub lab: Option<Lab>,
    pub awards: Vec<Item<Award>>,
    pub financial_supports: Vec<Item<FinancialSupport>>,
}
