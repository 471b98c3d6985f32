//! Replays the saved search without a terminal and mails what it finds.

use crate::format;
use crate::notify::{DealsEmail, EmailError, Mailer};
use crate::preferences::{PreferenceStore, StoreError};
use crate::search::{DealFinder, SearchError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, PartialEq, Eq)]
pub enum HeadlessOutcome {
    /// No notification was pending
    NothingSaved,
    /// The search found nothing under the target, the preference is kept
    NoDeals,
    /// Deals were mailed and the preference removed
    Notified { email: String },
}

#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Search(#[from] SearchError),

    /// The preference is kept so the next run retries
    #[error(transparent)]
    Email(#[from] EmailError),
}

pub async fn run(
    store: &PreferenceStore,
    finder: &DealFinder,
    mailer: &dyn Mailer,
) -> Result<HeadlessOutcome, HeadlessError> {
    let Some(saved) = store.load().await? else {
        return Ok(HeadlessOutcome::NothingSaved);
    };

    info!(
        "Replaying search in {} for {} (target {})",
        saved.criteria.city, saved.email, saved.target_price
    );
    let hotels = finder
        .find_deals(&saved.criteria, saved.target_price)
        .await?;
    if hotels.is_empty() {
        return Ok(HeadlessOutcome::NoDeals);
    }

    let listing = format::render(&hotels, saved.criteria.currency);
    mailer.send(&DealsEmail::new(&saved, &listing)).await?;
    store.clear().await?;

    Ok(HeadlessOutcome::Notified { email: saved.email })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChildAges, Currency, SavedPreference, SearchCriteria, TargetPrice};
    use crate::search::testing::FakeApi;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<DealsEmail>>,
        refuse_login: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &DealsEmail) -> Result<(), EmailError> {
            if self.refuse_login {
                return Err(EmailError::Authentication("535 5.7.8".to_string()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn temp_store(name: &str) -> PreferenceStore {
        let path = std::env::temp_dir().join(format!(
            "hotel-deal-finder-headless-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        PreferenceStore::new(path)
    }

    fn saved(target: u64) -> SavedPreference {
        SavedPreference {
            criteria: SearchCriteria {
                city: "Lisbon".to_string(),
                wanted_hotel: String::new(),
                currency: Currency::Usd,
                adults: 2,
                children: ChildAges::default(),
                check_in: NaiveDate::from_ymd_opt(2027, 5, 10).unwrap(),
                check_out: NaiveDate::from_ymd_opt(2027, 5, 13).unwrap(),
            },
            name: "Ines".to_string(),
            email: "ines@example.com".to_string(),
            target_price: TargetPrice(target),
        }
    }

    fn finder() -> DealFinder {
        FakeApi::new()
            .with_hotel("Alfama Inn", &[("Agoda", 100.0, 0.0)])
            .into_finder()
    }

    #[tokio::test]
    async fn nothing_saved_is_reported() {
        let store = temp_store("nothing");
        let mailer = RecordingMailer::default();

        let outcome = run(&store, &finder(), &mailer).await.unwrap();

        assert_eq!(outcome, HeadlessOutcome::NothingSaved);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mails_deals_and_clears_preference() {
        let store = temp_store("notified");
        store.save(&saved(300)).await.unwrap();
        let mailer = RecordingMailer::default();

        let outcome = run(&store, &finder(), &mailer).await.unwrap();

        assert_eq!(
            outcome,
            HeadlessOutcome::Notified {
                email: "ines@example.com".to_string()
            }
        );
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Alfama Inn:"));
        assert!(sent[0].body.contains("Price: 300$"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn keeps_preference_when_nothing_under_target() {
        let store = temp_store("no-deals");
        store.save(&saved(299)).await.unwrap();
        let mailer = RecordingMailer::default();

        let outcome = run(&store, &finder(), &mailer).await.unwrap();

        assert_eq!(outcome, HeadlessOutcome::NoDeals);
        assert_eq!(store.load().await.unwrap(), Some(saved(299)));
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn keeps_preference_when_mail_fails() {
        let store = temp_store("auth-failed");
        store.save(&saved(0)).await.unwrap();
        let mailer = RecordingMailer {
            refuse_login: true,
            ..RecordingMailer::default()
        };

        let result = run(&store, &finder(), &mailer).await;

        assert!(matches!(
            result,
            Err(HeadlessError::Email(EmailError::Authentication(_)))
        ));
        assert_eq!(store.load().await.unwrap(), Some(saved(0)));
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn keeps_preference_when_search_fails() {
        let store = temp_store("search-failed");
        store.save(&saved(0)).await.unwrap();
        let mut api = FakeApi::new();
        api.usd_rate = None;

        let result = run(&store, &api.into_finder(), &RecordingMailer::default()).await;

        assert!(matches!(result, Err(HeadlessError::Search(_))));
        assert!(store.load().await.unwrap().is_some());
        store.clear().await.unwrap();
    }
}
