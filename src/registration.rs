//! Employee registration workflow.
//!
//! Creating an employee is a two-service sequence: persist the record, then
//! provision its authentication account. The steps are not transactional
//! across services, so a provisioning failure compensates by deleting the
//! record it just wrote. Each failure is tagged with the step it came from
//! and the orchestrator picks the compensation from that tag.

use crate::auth::AuthClient;
use crate::config::AppConfig;
use crate::db;
use crate::entities::empleados;
use crate::error::{AppError, Result};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

/// Fallback password when the email has an empty local part.
const FALLBACK_PASSWORD: &str = "password";

/// Warning shown when the account exists but the session fixup failed.
const SESSION_WARNING: &str = "Usuario creado, pero hubo un problema al iniciar sesión automáticamente.";

/// Derive the initial account password from the email's local part.
///
/// Predictable on purpose; kept as existing behavior.
pub fn derive_password(email: &str) -> String {
    let local = email.split('@').next().unwrap_or("");
    if local.is_empty() {
        FALLBACK_PASSWORD.to_string()
    } else {
        local.to_string()
    }
}

/// Compensating action for a failed workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// Abort; nothing was written that needs undoing.
    Abort,
    /// Delete the just-persisted record, then surface the original error.
    DeleteRecord,
    /// Keep record and account; surface a warning only.
    WarnOnly,
}

/// A workflow step failure carrying the original error.
#[derive(Debug)]
pub enum StepFailure {
    /// The record write failed.
    Persist(AppError),
    /// Account creation failed after the record was persisted.
    Provision(AppError),
    /// Sign-out/sign-in after a successful account creation failed.
    SessionFixup(AppError),
}

impl StepFailure {
    /// Compensation the orchestrator applies for this failure.
    pub fn compensation(&self) -> Compensation {
        match self {
            StepFailure::Persist(_) => Compensation::Abort,
            StepFailure::Provision(_) => Compensation::DeleteRecord,
            StepFailure::SessionFixup(_) => Compensation::WarnOnly,
        }
    }

    /// Extract the original error.
    pub fn into_error(self) -> AppError {
        match self {
            StepFailure::Persist(e) | StepFailure::Provision(e) | StepFailure::SessionFixup(e) => e,
        }
    }
}

/// Result of a completed registration.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// Set when the account was created but the session fixup failed.
    pub session_warning: Option<String>,
}

/// Orchestrates record persistence and account provisioning.
pub struct RegistrationService {
    db: DatabaseConnection,
    auth: AuthClient,
}

impl RegistrationService {
    /// Create a new service against the configured auth endpoint.
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db,
            auth: AuthClient::new(&config.auth.url, config.auth.timeout_secs),
        }
    }

    /// Create path: persist the record, provision its account, then force a
    /// clean session.
    ///
    /// There is a window between the persist and provision steps: a crash
    /// there leaves a record with no account and no reconciliation.
    pub async fn register(&mut self, record: empleados::Model) -> Result<RegistrationOutcome> {
        let id = record.id.clone();
        let email = record.email.clone();
        let password = derive_password(&email);

        if let Err(e) = db::employee::save(&self.db, record).await {
            return self
                .compensate(StepFailure::Persist(e.into()), &id)
                .await
                .map(|w| RegistrationOutcome { session_warning: w });
        }
        info!("Persisted employee {id}");

        if let Err(e) = self.auth.create_account(&email, &password).await {
            return self
                .compensate(StepFailure::Provision(e), &id)
                .await
                .map(|w| RegistrationOutcome { session_warning: w });
        }
        info!("Provisioned account for employee {id}");

        // The service signed the creator in as the new account; sign out and
        // back in with the same credentials to leave a clean session.
        let session_warning = match self.session_fixup(&email, &password).await {
            Ok(()) => None,
            Err(e) => self.compensate(StepFailure::SessionFixup(e), &id).await?,
        };

        Ok(RegistrationOutcome { session_warning })
    }

    /// Edit path: persist only. Never touches the auth service.
    pub async fn update(&self, record: empleados::Model) -> Result<empleados::Model> {
        let updated = db::employee::save(&self.db, record).await?;
        info!("Updated employee {}", updated.id);
        Ok(updated)
    }

    /// Sign out, then sign back in with the given credentials.
    async fn session_fixup(&mut self, email: &str, password: &str) -> Result<()> {
        self.auth.sign_out().await?;
        self.auth.sign_in(email, password).await?;
        Ok(())
    }

    /// Apply the compensation for a step failure.
    ///
    /// Returns the session warning for warn-only failures; every other
    /// compensation re-raises the original error after undoing what it must.
    async fn compensate(&self, failure: StepFailure, id: &str) -> Result<Option<String>> {
        match failure.compensation() {
            Compensation::Abort => Err(failure.into_error()),
            Compensation::DeleteRecord => {
                // Rollback failure is logged but must not mask the original error
                match db::employee::delete(&self.db, id).await {
                    Ok(true) => info!("Rolled back employee {id} after failed provisioning"),
                    Ok(false) => warn!("Rollback found no employee {id} to delete"),
                    Err(e) => error!("Rollback of employee {id} failed: {e}"),
                }
                Err(failure.into_error())
            }
            Compensation::WarnOnly => {
                warn!("Session fixup failed for employee {id}; account and record kept");
                Ok(Some(SESSION_WARNING.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_password_from_local_part() {
        assert_eq!(derive_password("ana@example.com"), "ana");
        assert_eq!(derive_password("ana.torres@restaurante.co"), "ana.torres");
    }

    #[test]
    fn test_derive_password_fallback() {
        assert_eq!(derive_password("@example.com"), "password");
        assert_eq!(derive_password(""), "password");
    }

    #[test]
    fn test_persist_failure_aborts_without_rollback() {
        let failure = StepFailure::Persist(AppError::parse("write failed"));
        assert_eq!(failure.compensation(), Compensation::Abort);
    }

    #[test]
    fn test_provision_failure_rolls_back_record() {
        let failure = StepFailure::Provision(AppError::AccountCreation("email already in use".to_string()));
        assert_eq!(failure.compensation(), Compensation::DeleteRecord);
    }

    #[test]
    fn test_session_fixup_failure_warns_only() {
        let failure = StepFailure::SessionFixup(AppError::session("sign-in rejected"));
        assert_eq!(failure.compensation(), Compensation::WarnOnly);
    }

    #[test]
    fn test_into_error_keeps_original() {
        let failure = StepFailure::Provision(AppError::AccountCreation("rejected".to_string()));
        match failure.into_error() {
            AppError::AccountCreation(msg) => assert_eq!(msg, "rejected"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
