//! Per-entity operations, spelled out for hosts that prefer named calls over
//! the generic `add::<T>` family.

use serde_json::Value;

use super::{LabSet, Outcome, PortfolioSync};
use crate::models::{
    Activity, Award, BookChapter, Conference, Experience, FinancialSupport, Publication,
    ResearchInterest, TeachingInterest, Talk,
};

impl PortfolioSync {
    pub async fn add_research_interest(&self, title: impl Into<String>) -> Outcome {
        self.add(ResearchInterest::new(title)).await
    }

    pub async fn remove_research_interest(&self, id: &str) -> Outcome {
        self.remove::<ResearchInterest>(id).await
    }

    pub async fn add_teaching_interest(&self, title: impl Into<String>) -> Outcome {
        self.add(TeachingInterest::new(title)).await
    }

    pub async fn remove_teaching_interest(&self, id: &str) -> Outcome {
        self.remove::<TeachingInterest>(id).await
    }

    pub async fn add_experience(&self, experience: Experience) -> Outcome {
        self.add(experience).await
    }

    pub async fn update_experience(&self, id: &str, patch: Value) -> Outcome {
        self.update::<Experience>(id, patch).await
    }

    pub async fn remove_experience(&self, id: &str) -> Outcome {
        self.remove::<Experience>(id).await
    }

    pub async fn add_publication(&self, publication: Publication) -> Outcome {
        self.add(publication).await
    }

    pub async fn update_publication(&self, id: &str, patch: Value) -> Outcome {
        self.update::<Publication>(id, patch).await
    }

    pub async fn remove_publication(&self, id: &str) -> Outcome {
        self.remove::<Publication>(id).await
    }

    pub async fn add_book_chapter(&self, chapter: BookChapter) -> Outcome {
        self.add(chapter).await
    }

    pub async fn update_book_chapter(&self, id: &str, patch: Value) -> Outcome {
        self.update::<BookChapter>(id, patch).await
    }

    pub async fn remove_book_chapter(&self, id: &str) -> Outcome {
        self.remove::<BookChapter>(id).await
    }

    pub async fn add_talk(&self, talk: Talk) -> Outcome {
        self.add(talk).await
    }

    pub async fn update_talk(&self, id: &str, patch: Value) -> Outcome {
        self.update::<Talk>(id, patch).await
    }

    pub async fn remove_talk(&self, id: &str) -> Outcome {
        self.remove::<Talk>(id).await
    }

    pub async fn add_activity(&self, activity: Activity) -> Outcome {
        self.add(activity).await
    }

    pub async fn update_activity(&self, id: &str, patch: Value) -> Outcome {
        self.update::<Activity>(id, patch).await
    }

    pub async fn remove_activity(&self, id: &str) -> Outcome {
        self.remove::<Activity>(id).await
    }

    pub async fn add_conference(&self, conference: Conference) -> Outcome {
        self.add(conference).await
    }

    pub async fn update_conference(&self, id: &str, patch: Value) -> Outcome {
        self.update::<Conference>(id, patch).await
    }

    pub async fn remove_conference(&self, id: &str) -> Outcome {
        self.remove::<Conference>(id).await
    }

    pub async fn add_award(&self, award: Award) -> Outcome {
        self.add(award).await
    }

    pub async fn update_award(&self, id: &str, patch: Value) -> Outcome {
        self.update::<Award>(id, patch).await
    }

    pub async fn remove_award(&self, id: &str) -> Outcome {
        self.remove::<Award>(id).await
    }

    pub async fn add_financial_support(&self, support: FinancialSupport) -> Outcome {
        self.add(support).await
    }

    pub async fn update_financial_support(&self, id: &str, patch: Value) -> Outcome {
        self.update::<FinancialSupport>(id, patch).await
    }

    pub async fn remove_financial_support(&self, id: &str) -> Outcome {
        self.remove::<FinancialSupport>(id).await
    }

    pub async fn add_lab_member(&self, member: impl Into<String>) -> Outcome {
        self.add_to_lab(LabSet::Members, member).await
    }

    pub async fn remove_lab_member(&self, member: &str) -> Outcome {
        self.remove_from_lab(LabSet::Members, member).await
    }

    pub async fn add_lab_research(&self, area: impl Into<String>) -> Outcome {
        self.add_to_lab(LabSet::Research, area).await
    }

    pub async fn remove_lab_research(&self, area: &str) -> Outcome {
        self.remove_from_lab(LabSet::Research, area).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryAuth, User};
    use crate::notify::ChannelNotifier;
    use crate::partition::Partition;
    use crate::store::{DocumentStore, MemoryStore};
    use crate::sync::SyncOptions;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_named_calls_target_their_partition() {
        let store = Arc::new(MemoryStore::new());
        let (notifier, mut notifications) = ChannelNotifier::new();
        let sync = PortfolioSync::start(
            store.clone(),
            Arc::new(MemoryAuth::signed_in(User::new("u1"))),
            Arc::new(notifier),
            SyncOptions::default(),
        )
        .await;

        assert!(sync
            .add_teaching_interest("Digital Signal Processing")
            .await
            .is_written());
        assert!(sync
            .add_financial_support(FinancialSupport::new("DST Grant", "INR 20 Lakh", "2021-2024"))
            .await
            .is_written());

        let teaching = store
            .get(&Partition::TeachingInterests.path())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(teaching["items"][0]["title"], "Digital Signal Processing");
        let support = store
            .get(&Partition::FinancialSupports.path())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(support["items"][0]["fundReceived"], "INR 20 Lakh");

        let first = notifications.try_recv().unwrap();
        let second = notifications.try_recv().unwrap();
        assert_eq!(first.title, "Teaching interest added");
        assert_eq!(second.title, "Financial support added");
    }
}
