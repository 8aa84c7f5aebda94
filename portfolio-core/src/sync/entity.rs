//! Binding between list entity types and their partitions.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

use crate::models::{
    Activity, Award, BookChapter, Conference, Experience, FinancialSupport, Item, Portfolio,
    Publication, ResearchInterest, TeachingInterest, Talk,
};
use crate::partition::Partition;

/// An entity stored as an ordered list inside one partition document.
///
/// Implementing this is all it takes for the sync layer to mirror the list
/// and offer add/update/remove over it.
pub trait ListEntity:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    const PARTITION: Partition;

    /// Lowercase singular name used in notifications, e.g. "book chapter".
    const NOUN: &'static str;

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>>;

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>>;
}

impl ListEntity for ResearchInterest {
    const PARTITION: Partition = Partition::ResearchInterests;
    const NOUN: &'static str = "research interest";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.research_interests
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.research_interests
    }
}

impl ListEntity for TeachingInterest {
    const PARTITION: Partition = Partition::TeachingInterests;
    const NOUN: &'static str = "teaching interest";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.teaching_interests
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.teaching_interests
    }
}

impl ListEntity for Experience {
    const PARTITION: Partition = Partition::Experiences;
    const NOUN: &'static str = "experience";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.experiences
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.experiences
    }
}

impl ListEntity for Publication {
    const PARTITION: Partition = Partition::Publications;
    const NOUN: &'static str = "publication";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.publications
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.publications
    }
}

impl ListEntity for BookChapter {
    const PARTITION: Partition = Partition::BookChapters;
    const NOUN: &'static str = "book chapter";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.book_chapters
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.book_chapters
    }
}

impl ListEntity for Talk {
    const PARTITION: Partition = Partition::Talks;
    const NOUN: &'static str = "talk";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.talks
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.talks
    }
}

impl ListEntity for Activity {
    const PARTITION: Partition = Partition::Activities;
    const NOUN: &'static str = "activity";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.activities
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.activities
    }
}

impl ListEntity for Conference {
    const PARTITION: Partition = Partition::Conferences;
    const NOUN: &'static str = "conference";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.conferences
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.conferences
    }
}

impl ListEntity for Award {
    const PARTITION: Partition = Partition::Awards;
    const NOUN: &'static str = "award";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.awards
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.awards
    }
}

impl ListEntity for FinancialSupport {
    const PARTITION: Partition = Partition::FinancialSupports;
    const NOUN: &'static str = "financial support";

    fn items(portfolio: &Portfolio) -> &Vec<Item<Self>> {
        &portfolio.financial_supports
    }

    fn items_mut(portfolio: &mut Portfolio) -> &mut Vec<Item<Self>> {
        &mut portfolio.financial_supports
    }
}
