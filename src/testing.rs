//! In-memory fakes of the repositories and the signing service

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DbErr;

use crate::domain::{
    AuditEntry, AuditRepository, CreateUserDto, Document, DocumentRepository, DomainError,
    DomainResult, ESignError, ESignService, NewAuditEntry, RepositoryProvider, Signer,
    SignerStatus, SigningSession, SigningStatus, UserAccount, UserFilters, UserItem, UserQuery,
    UserRepository, UserRole,
};
use crate::shared::{InfraError, PaginatedResult};

pub fn sample_user(id: &str, tenant: &str, name: &str, role: UserRole) -> UserItem {
    UserItem {
        id: id.into(),
        tenant_id: tenant.into(),
        name: Some(name.into()),
        email: format!("{}@{tenant}.io", name.to_lowercase()),
        role,
        status: None,
        company: None,
        department: None,
        created_at: Utc::now(),
    }
}

pub fn sample_document(id: &str, tenant: &str, name: Option<&str>) -> Document {
    Document {
        id: id.into(),
        tenant_id: tenant.into(),
        name: name.map(String::from),
        content_type: Some("application/pdf".into()),
        size_bytes: None,
        uploaded_by: None,
        created_at: Utc::now(),
    }
}

fn db_failure(what: &str) -> DomainError {
    DomainError::Infra(InfraError::Database(DbErr::Custom(what.to_string())))
}

#[derive(Default)]
pub struct InMemoryRepos {
    users: Mutex<Vec<UserAccount>>,
    documents: Mutex<Vec<Document>>,
    audit: Mutex<Vec<AuditEntry>>,
    fail_role_updates: AtomicBool,
    fail_audit: AtomicBool,
    fail_listing: AtomicBool,
}

impl InMemoryRepos {
    pub fn add_user(&self, user: UserItem) {
        self.add_account(user, String::new());
    }

    pub fn add_account(&self, user: UserItem, password_hash: String) {
        self.users.lock().unwrap().push(UserAccount {
            user,
            password_hash,
        });
    }

    pub fn add_document(&self, document: Document) {
        self.documents.lock().unwrap().push(document);
    }

    pub fn fail_role_updates(&self, fail: bool) {
        self.fail_role_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    pub fn fail_audit(&self, fail: bool) {
        self.fail_audit.store(fail, Ordering::SeqCst);
    }

    pub fn audit_actions(&self) -> Vec<String> {
        self.audit
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.action.clone())
            .collect()
    }

    fn filtered(&self, tenant_id: &str, filters: &UserFilters) -> Vec<UserItem> {
        let now = Utc::now();
        let mut users: Vec<UserItem> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.user.clone())
            .filter(|u| u.tenant_id == tenant_id && filters.matches(u, now))
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        users
    }
}

impl RepositoryProvider for InMemoryRepos {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn documents(&self) -> &dyn DocumentRepository {
        self
    }

    fn audit(&self) -> &dyn AuditRepository {
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryRepos {
    async fn list_users(&self, tenant_id: &str, query: UserQuery) -> DomainResult<PaginatedResult<UserItem>> {
        let all = self.filtered(tenant_id, &query.filters);
        let total = all.len() as u64;
        let page_size = query.page_size.max(1);
        let skip = (query.page.max(1) as usize - 1).saturating_mul(page_size as usize);
        let items = all.into_iter().skip(skip).take(page_size as usize).collect();
        Ok(PaginatedResult::new(items, total, query.page.max(1), page_size))
    }

    async fn list_all(&self, tenant_id: &str, filters: &UserFilters) -> DomainResult<Vec<UserItem>> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(db_failure("listing unavailable"));
        }
        Ok(self.filtered(tenant_id, filters))
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> DomainResult<Option<UserItem>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user.id == id && a.user.tenant_id == tenant_id)
            .map(|a| a.user.clone()))
    }

    async fn find_account_by_email(&self, email: &str) -> DomainResult<Option<UserAccount>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_role(&self, tenant_id: &str, id: &str, role: UserRole) -> DomainResult<Option<UserItem>> {
        if self.fail_role_updates.load(Ordering::SeqCst) {
            return Err(db_failure("role update failed"));
        }
        let mut users = self.users.lock().unwrap();
        Ok(users
            .iter_mut()
            .find(|a| a.user.id == id && a.user.tenant_id == tenant_id)
            .map(|a| {
                a.user.role = role;
                a.user.clone()
            }))
    }

    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<UserItem> {
        let user = UserItem {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: dto.tenant_id,
            name: dto.name,
            email: dto.email,
            role: dto.role,
            status: Some(dto.status),
            company: dto.company,
            department: dto.department,
            created_at: Utc::now(),
        };
        self.add_account(user.clone(), dto.password_hash);
        Ok(user)
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.lock().unwrap().len() as u64)
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepos {
    async fn find_for_tenant(&self, id: &str, tenant_id: &str) -> DomainResult<Option<Document>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id && d.tenant_id == tenant_id)
            .cloned())
    }

    async fn save(&self, document: Document) -> DomainResult<Document> {
        self.add_document(document.clone());
        Ok(document)
    }
}

#[async_trait]
impl AuditRepository for InMemoryRepos {
    async fn record(&self, entry: NewAuditEntry) -> DomainResult<AuditEntry> {
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(db_failure("audit insert failed"));
        }
        let stored = AuditEntry {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: entry.tenant_id,
            actor_id: entry.actor_id,
            action: entry.action,
            details: entry.details,
            created_at: Utc::now(),
        };
        self.audit.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_for_tenant(&self, tenant_id: &str, limit: u64) -> DomainResult<Vec<AuditEntry>> {
        Ok(self
            .audit
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.tenant_id.as_deref() == Some(tenant_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Signing service double that counts calls
pub struct FakeESign {
    status: Mutex<SigningStatus>,
    fail_download: AtomicBool,
    fail_status: AtomicBool,
    status_calls: AtomicUsize,
    download_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
}

impl FakeESign {
    pub const PDF_BYTES: &'static [u8] = b"%PDF-1.7 signed";

    pub fn with_status(status: SigningStatus) -> Self {
        Self {
            status: Mutex::new(status),
            fail_download: AtomicBool::new(false),
            fail_status: AtomicBool::new(false),
            status_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_download(&self, fail: bool) {
        self.fail_download.store(fail, Ordering::SeqCst);
    }

    pub fn fail_status(&self, fail: bool) {
        self.fail_status.store(fail, Ordering::SeqCst);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ESignService for FakeESign {
    async fn get_signing_status(&self, session_id: &str) -> Result<SigningSession, ESignError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(ESignError::Unavailable("connection refused".into()));
        }
        let status = *self.status.lock().unwrap();
        Ok(SigningSession {
            session_id: session_id.to_string(),
            overall_status: status,
            signers: vec![Signer {
                email: "signer@acme.io".into(),
                name: Some("Signer".into()),
                status: if status.is_completed() {
                    SignerStatus::Signed
                } else {
                    SignerStatus::Pending
                },
                signed_at: None,
            }],
            completed_at: status.is_completed().then(Utc::now),
            signed_document_url: None,
        })
    }

    async fn download_signed_document(&self, _session_id: &str) -> Result<Vec<u8>, ESignError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(ESignError::Unavailable("storage timeout".into()));
        }
        Ok(Self::PDF_BYTES.to_vec())
    }

    async fn cancel_signing_flow(&self, _session_id: &str) -> Result<(), ESignError> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
