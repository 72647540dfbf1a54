use std::{path::PathBuf, sync::Arc, time::Instant};

use folio_store::PortfolioStore;
use folio_ui::NavOptions;

use crate::{config::MailSettings, mailer::Mailer};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PortfolioStore>,
    pub mailer: Arc<dyn Mailer>,
    pub mail: Arc<MailSettings>,
    pub static_dir: PathBuf,
    pub nav_options: NavOptions,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn PortfolioStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            store,
            mailer,
            mail: Arc::new(MailSettings::default()),
            static_dir: PathBuf::from("public"),
            nav_options: NavOptions::default(),
            started_at: Instant::now(),
        }
    }

    pub fn with_mail(mut self, mail: MailSettings) -> Self {
        self.mail = Arc::new(mail);
        self
    }

    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = static_dir.into();
        self
    }

    pub fn with_nav_options(mut self, nav_options: NavOptions) -> Self {
        self.nav_options = nav_options;
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
