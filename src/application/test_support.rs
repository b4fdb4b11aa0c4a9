//! Wiring for service tests: migrated in-memory SQLite, temp upload dir,
//! recording mailer.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::{
    AppointmentService, GuestProvisioner, ListingService, Notifier, QuoteService, UserService,
};
use crate::domain::{CreateUserDto, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{JwtConfig, DEFAULT_ISSUER};
use crate::infrastructure::database::connect_in_memory;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::mail::{EmailMessage, RecordingMailer};
use crate::infrastructure::storage::MediaStorage;

pub struct TestContext {
    pub repos: Arc<dyn RepositoryProvider>,
    pub mailer: Arc<RecordingMailer>,
    pub media: MediaStorage,
    pub provisioner: Arc<GuestProvisioner>,
    pub users: UserService,
    pub listings: ListingService,
    pub appointments: AppointmentService,
    pub quotes: QuoteService,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = connect_in_memory().await.expect("in-memory database");
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        let mailer = Arc::new(RecordingMailer::new());
        let notifier = Arc::new(Notifier::new(mailer.clone(), "https://dealer.test/", 72));
        let provisioner = Arc::new(GuestProvisioner::new(repos.clone(), 72));
        let media = MediaStorage::new(
            std::env::temp_dir().join(format!("dealership-test-{}", uuid::Uuid::new_v4())),
            "/uploads",
        );
        let jwt = JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: DEFAULT_ISSUER.into(),
        };

        Self {
            users: UserService::new(repos.clone(), jwt, notifier.clone(), 72),
            listings: ListingService::new(repos.clone(), media.clone()),
            appointments: AppointmentService::new(
                repos.clone(),
                provisioner.clone(),
                notifier.clone(),
            ),
            quotes: QuoteService::new(repos.clone(), provisioner.clone(), notifier),
            repos,
            mailer,
            media,
            provisioner,
        }
    }

    async fn insert(&self, email: &str, role: UserRole) -> User {
        self.repos
            .users()
            .create_user(CreateUserDto {
                email: email.to_string(),
                password_hash: "not-a-real-hash".into(),
                first_name: "Test".into(),
                last_name: "Gebruiker".into(),
                phone: None,
                role,
                is_active: true,
                activation: None,
            })
            .await
            .expect("insert user")
    }

    pub async fn customer(&self, email: &str) -> User {
        self.insert(email, UserRole::Klant).await
    }

    pub async fn admin(&self) -> User {
        self.insert("admin@dealer.test", UserRole::Admin).await
    }

    /// Poll until `count` emails arrived; dispatch runs on a spawned task.
    pub async fn wait_for_mail(&self, count: usize) -> Vec<EmailMessage> {
        for _ in 0..100 {
            let sent = self.mailer.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.mailer.sent()
    }

    pub fn media_path(&self, url: &str) -> PathBuf {
        let name = url.rsplit('/').next().unwrap_or_default();
        self.media.root().join(name)
    }

    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.media.root())
            .map(|dir| dir.count())
            .unwrap_or(0)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(self.media.root());
    }
}
