use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::mail::{Mailer, SmtpMailer, UnconfiguredMailer};
use crate::settings::SettingsRepo;
use crate::storage::FileStore;
use crate::db;
use crate::teachers::TeacherRepo;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub teachers: Arc<dyn TeacherRepo>,
    pub settings: Arc<dyn SettingsRepo>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let (teachers, settings): (Arc<dyn TeacherRepo>, Arc<dyn SettingsRepo>) =
            match config.database_url.as_deref() {
                Some(url) => {
                    let pool = db::connect(url).await?;
                    info!("using postgres store");
                    (
                        Arc::new(pool.clone()) as Arc<dyn TeacherRepo>,
                        Arc::new(pool) as Arc<dyn SettingsRepo>,
                    )
                }
                None => {
                    let store = Arc::new(FileStore::new(&config.data_dir));
                    info!(dir = %store.dir().display(), "DATABASE_URL not set; using json file store");
                    (
                        store.clone() as Arc<dyn TeacherRepo>,
                        store as Arc<dyn SettingsRepo>,
                    )
                }
            };

        let mailer: Arc<dyn Mailer> = match config.smtp.as_ref() {
            Some(smtp) => Arc::new(SmtpMailer::new(smtp)?),
            None => {
                warn!("SMTP settings missing; message submissions will fail");
                Arc::new(UnconfiguredMailer)
            }
        };

        Ok(Self::from_parts(config, teachers, settings, mailer))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        teachers: Arc<dyn TeacherRepo>,
        settings: Arc<dyn SettingsRepo>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            teachers,
            settings,
            mailer,
        }
    }
}
