use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::RepoError;
use crate::settings::{repo_types::SETTINGS_ID, Settings, SettingsRepo};
use crate::teachers::{NewTeacher, Teacher, TeacherRepo};

const TEACHERS_FILE: &str = "teachers.json";
const SETTINGS_FILE: &str = "settings.json";

/// Flat JSON files under one directory, used when no database is configured.
pub struct FileStore {
    dir: PathBuf,
    // held across every read-modify-write of either file
    lock: Mutex<()>,
}

/// On-disk teacher shape; hand-edited files may omit the id or carry a blank or non-UUID one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTeacher {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    surname: String,
    #[serde(default)]
    email: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    created_at: Option<OffsetDateTime>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn teachers_path(&self) -> PathBuf {
        self.dir.join(TEACHERS_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// Reads the teacher file, creating it empty when missing and backfilling missing or unusable ids.
    /// Callers must hold `lock`.
    async fn load_teachers(&self) -> Result<Vec<Teacher>, RepoError> {
        let path = self.teachers_path();
        let stored: Vec<StoredTeacher> = read_json_or_init(&path, Vec::<Teacher>::new()).await?;

        let mut backfilled = 0usize;
        let teachers: Vec<Teacher> = stored
            .into_iter()
            .map(|t| {
                let raw = t.id.as_deref().map(str::trim).unwrap_or_default();
                let id = match Uuid::parse_str(raw) {
                    Ok(id) => id,
                    Err(_) => {
                        if !raw.is_empty() {
                            warn!(old_id = raw, "replacing non-uuid teacher id");
                        }
                        backfilled += 1;
                        Uuid::new_v4()
                    }
                };
                Teacher {
                    id,
                    name: t.name,
                    surname: t.surname,
                    email: t.email,
                    created_at: t.created_at,
                }
            })
            .collect();

        if backfilled > 0 {
            write_json(&path, &teachers).await?;
            info!(count = backfilled, path = %path.display(), "backfilled teacher ids");
        }
        Ok(teachers)
    }
}

async fn read_json_or_init<T, F>(path: &Path, fallback: F) -> Result<T, RepoError>
where
    T: DeserializeOwned,
    F: Serialize,
{
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            write_json(path, &fallback).await?;
            debug!(path = %path.display(), "initialized data file");
            Ok(serde_json::from_value(serde_json::to_value(&fallback)?)?)
        }
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), RepoError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let raw = serde_json::to_string_pretty(data)?;
    tokio::fs::write(path, raw).await?;
    Ok(())
}

#[async_trait]
impl TeacherRepo for FileStore {
    async fn list(&self) -> Result<Vec<Teacher>, RepoError> {
        let _guard = self.lock.lock().await;
        let mut teachers = self.load_teachers().await?;
        // stable: undated records keep file order, after the dated ones
        teachers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(teachers)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Teacher>, RepoError> {
        let _guard = self.lock.lock().await;
        let teachers = self.load_teachers().await?;
        Ok(teachers.into_iter().find(|t| t.id == id))
    }

    async fn insert(&self, new: NewTeacher) -> Result<Teacher, RepoError> {
        let _guard = self.lock.lock().await;
        let mut teachers = self.load_teachers().await?;

        let mut id = Uuid::new_v4();
        while teachers.iter().any(|t| t.id == id) {
            id = Uuid::new_v4();
        }
        let teacher = new.into_teacher(id, OffsetDateTime::now_utc());
        teachers.push(teacher.clone());
        write_json(&self.teachers_path(), &teachers).await?;
        Ok(teacher)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let _guard = self.lock.lock().await;
        let mut teachers = self.load_teachers().await?;
        let before = teachers.len();
        teachers.retain(|t| t.id != id);
        if teachers.len() == before {
            return Ok(false);
        }
        write_json(&self.teachers_path(), &teachers).await?;
        Ok(true)
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        let _guard = self.lock.lock().await;
        let removed = self.load_teachers().await?.len() as u64;
        write_json(&self.teachers_path(), &Vec::<Teacher>::new()).await?;
        Ok(removed)
    }
}

#[async_trait]
impl SettingsRepo for FileStore {
    async fn get(&self) -> Result<Option<Settings>, RepoError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::read_to_string(self.settings_path()).await {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, settings: &Settings) -> Result<Settings, RepoError> {
        let _guard = self.lock.lock().await;
        let stored = Settings {
            id: SETTINGS_ID,
            ..settings.clone()
        };
        write_json(&self.settings_path(), &stored).await?;
        Ok(stored)
    }

    async fn clear(&self) -> Result<(), RepoError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(self.settings_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
