//! Line oriented front end.
//!
//! Each search runs on its own task and reports back over a channel, so the
//! prompt keeps answering while the APIs are slow. Only one search may be in
//! flight at a time.

use crate::format;
use crate::models::{HotelDeals, SearchCriteria, TargetPrice};
use crate::preferences::PreferenceStore;
use crate::search::{DealFinder, SearchError};
use crate::validation::{ContactForm, SearchForm};
use chrono::NaiveDate;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{error, info};

const HELP: &str = "Commands:
  search  look for hotel deals
  notify  get an e-mail when the last search drops below your target price
  help    show this message
  quit    leave
";

struct Finished {
    criteria: SearchCriteria,
    /// `Err` when the search task panicked before producing a result
    result: Result<Result<Vec<HotelDeals>, SearchError>, JoinError>,
}

pub struct Shell<R, W> {
    input: Lines<R>,
    output: W,
    finder: Arc<DealFinder>,
    store: PreferenceStore,
    today: NaiveDate,
    searching: bool,
    /// Last search that produced results, `notify` is only offered for it
    last_found: Option<SearchCriteria>,
    finished_tx: mpsc::UnboundedSender<Finished>,
    finished_rx: mpsc::UnboundedReceiver<Finished>,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        input: R,
        output: W,
        finder: Arc<DealFinder>,
        store: PreferenceStore,
        today: NaiveDate,
    ) -> Self {
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        Self {
            input: input.lines(),
            output,
            finder,
            store,
            today,
            searching: false,
            last_found: None,
            finished_tx,
            finished_rx,
        }
    }

    pub async fn run(mut self) -> io::Result<()> {
        self.say("🏨 Hotel Deal Finder\n").await?;
        self.say(HELP).await?;

        loop {
            self.say("> ").await?;
            tokio::select! {
                biased;
                Some(finished) = self.finished_rx.recv() => {
                    self.show(finished).await?;
                }
                line = self.input.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.command(line.trim()).await? {
                        break;
                    }
                }
            }
        }

        if self.searching {
            self.say("Waiting for the running search to finish...\n").await?;
            if let Some(finished) = self.finished_rx.recv().await {
                self.show(finished).await?;
            }
        }
        Ok(())
    }

    /// Returns `false` once the user asked to leave
    async fn command(&mut self, command: &str) -> io::Result<bool> {
        match command.to_ascii_lowercase().as_str() {
            "" => {}
            "search" => self.search().await?,
            "notify" => self.notify().await?,
            "help" => self.say(HELP).await?,
            "quit" | "exit" => return Ok(false),
            other => {
                self.say(&format!("Unknown command `{other}`, type `help`.\n"))
                    .await?
            }
        }
        Ok(true)
    }

    async fn search(&mut self) -> io::Result<()> {
        if self.searching {
            return self.say("A search is already running, please wait.\n").await;
        }

        let Some(form) = self.search_form().await? else {
            return Ok(());
        };
        let criteria = match form.validate(self.today) {
            Ok(criteria) => criteria,
            Err(e) => return self.say(&format!("Input error: {e}\n")).await,
        };

        self.searching = true;
        self.last_found = None;

        let finder = Arc::clone(&self.finder);
        let query = criteria.clone();
        let worker = tokio::spawn(async move {
            finder.find_deals(&query, TargetPrice::UNLIMITED).await
        });

        // Reports even a panicked worker, otherwise `searching` would never clear
        let finished = self.finished_tx.clone();
        tokio::spawn(async move {
            let result = worker.await;
            _ = finished.send(Finished { criteria, result });
        });

        self.say("Searching...\n").await
    }

    async fn show(&mut self, finished: Finished) -> io::Result<()> {
        self.searching = false;
        let Finished { criteria, result } = finished;

        match result {
            Ok(Ok(hotels)) if hotels.is_empty() => {
                self.say(&format!(
                    "No hotels found in {} for your chosen dates.\n",
                    criteria.city
                ))
                .await
            }
            Ok(Ok(hotels)) => {
                let listing = format::render(&hotels, criteria.currency);
                self.last_found = Some(criteria);
                self.say(&listing).await?;
                self.say("Type `notify` to get an e-mail when we find deals within your budget.\n")
                    .await
            }
            Ok(Err(e)) => {
                error!("Search failed: {e}");
                self.say(&format!("Search error: {e}\n")).await
            }
            Err(e) => {
                error!("Search task stopped: {e}");
                self.say("Search error: the search stopped unexpectedly.\n")
                    .await
            }
        }
    }

    async fn notify(&mut self) -> io::Result<()> {
        if self.searching {
            return self.say("Please wait for the running search to finish.\n").await;
        }
        let Some(criteria) = self.last_found.clone() else {
            return self.say("Run a search that finds hotels first.\n").await;
        };

        self.say("Enter your contact info and target price below.\n").await?;
        let Some(name) = self.ask("Name").await? else {
            return Ok(());
        };
        let Some(email) = self.ask("E-Mail").await? else {
            return Ok(());
        };
        let Some(target_price) = self.ask("Target Price (0 for any)").await? else {
            return Ok(());
        };

        let contact = ContactForm {
            name,
            email,
            target_price,
        };
        let preference = match contact.into_preference(criteria) {
            Ok(preference) => preference,
            Err(e) => return self.say(&format!("Validation error: {e}\n")).await,
        };

        match self.store.save(&preference).await {
            Ok(()) => {
                info!("Notification requested by {}", preference.email);
                self.say(
                    "Your details have been saved.\n\
                     We will keep you updated via e-mail when we find deals within your budget.\n",
                )
                .await
            }
            Err(e) => self.say(&format!("Failed to save preferences: {e}\n")).await,
        }
    }

    async fn search_form(&mut self) -> io::Result<Option<SearchForm>> {
        let mut form = SearchForm::default();
        let fields: [(&str, &mut String); 8] = [
            ("City", &mut form.city),
            ("Hotel Name (optional)", &mut form.wanted_hotel),
            ("Currency [ILS/USD/EUR/GBP]", &mut form.currency),
            ("Number of Adults", &mut form.adults),
            ("Number of Children", &mut form.children),
            ("Children under 2 years", &mut form.babies),
            ("Check-in Date (YYYY-MM-DD)", &mut form.check_in),
            ("Check-out Date (YYYY-MM-DD)", &mut form.check_out),
        ];

        for (label, field) in fields {
            self.say(&format!("{label}: ")).await?;
            match self.input.next_line().await? {
                Some(value) => *field = value,
                None => return Ok(None),
            }
        }
        Ok(Some(form))
    }

    async fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        self.say(&format!("{label}: ")).await?;
        self.input.next_line().await
    }

    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await
    }
}
