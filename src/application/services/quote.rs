//! Quotes ("offertes"): admins draft them, the customer answers

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::application::access::Actor;
use crate::application::notifications::Notifier;
use crate::application::provisioning::{GuestDetails, GuestProvisioner, ProvisionOutcome};
use crate::domain::{DomainError, DomainResult, Quote, QuoteFilter, QuoteStatus, RepositoryProvider};
use crate::shared::{PageRequest, PaginatedResult};

use super::appointment::resolve_customer;
use super::required_text;

#[derive(Debug, Clone)]
pub struct NewQuote {
    pub user_id: Option<String>,
    pub guest: Option<GuestDetails>,
    pub subject: String,
    pub amount_cents: i64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteChanges {
    pub subject: Option<String>,
    pub amount_cents: Option<i64>,
    pub description: Option<String>,
    pub status: Option<QuoteStatus>,
}

pub struct QuoteService {
    repos: Arc<dyn RepositoryProvider>,
    provisioner: Arc<GuestProvisioner>,
    notifier: Arc<Notifier>,
}

impl QuoteService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        provisioner: Arc<GuestProvisioner>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            repos,
            provisioner,
            notifier,
        }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        user_id: Option<String>,
        status: Option<QuoteStatus>,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Quote>> {
        self.repos
            .quotes()
            .list(QuoteFilter {
                user_id: actor.scope(user_id),
                status,
                page,
            })
            .await
    }

    async fn find(&self, id: &str) -> DomainResult<Quote> {
        self.repos
            .quotes()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Quote", id))
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Quote> {
        let quote = self.find(id).await?;
        actor.ensure_can_access(&quote.user_id)?;
        Ok(quote)
    }

    pub async fn create(&self, actor: &Actor, input: NewQuote) -> DomainResult<Quote> {
        actor.require_admin()?;
        let subject = required_text("subject", &input.subject)?;

        let customer = resolve_customer(
            self.repos.as_ref(),
            &self.provisioner,
            input.user_id,
            input.guest,
        )
        .await?;

        let now = Utc::now();
        let quote = self
            .repos
            .quotes()
            .save(Quote {
                id: uuid::Uuid::new_v4().to_string(),
                user_id: customer.user().id.clone(),
                subject,
                amount_cents: input.amount_cents,
                description: input.description.filter(|d| !d.trim().is_empty()),
                status: QuoteStatus::InAfwachting,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(
            quote_id = %quote.id,
            user_id = %quote.user_id,
            amount_cents = quote.amount_cents,
            "Quote created"
        );

        match &customer {
            ProvisionOutcome::Provisioned {
                user,
                activation_token,
            } => self.notifier.account_activation(user, activation_token),
            ProvisionOutcome::Existing(user) => self.notifier.quote_created(user, &quote),
        }

        Ok(quote)
    }

    /// Admin edit. Accepting or rejecting is left to the customer.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        changes: QuoteChanges,
    ) -> DomainResult<Quote> {
        actor.require_admin()?;

        if changes.status.is_some_and(|s| s.is_customer_response()) {
            return Err(DomainError::Forbidden(
                "Only the customer can accept or reject a quote".into(),
            ));
        }

        let mut quote = self.find(id).await?;
        if let Some(subject) = changes.subject {
            quote.subject = required_text("subject", &subject)?;
        }
        if let Some(amount) = changes.amount_cents {
            quote.amount_cents = amount;
        }
        if let Some(description) = changes.description {
            quote.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(status) = changes.status {
            quote.status = status;
        }

        let updated = self.repos.quotes().update(quote).await?;
        info!(quote_id = %updated.id, "Quote updated");
        Ok(updated)
    }

    /// The owning customer accepts or rejects a pending quote.
    pub async fn respond(
        &self,
        actor: &Actor,
        id: &str,
        status: QuoteStatus,
    ) -> DomainResult<Quote> {
        let mut quote = self.find(id).await?;

        if !actor.is(&quote.user_id) {
            return Err(DomainError::Forbidden(
                "Only the customer can answer this quote".into(),
            ));
        }
        if !status.is_customer_response() {
            return Err(DomainError::Validation(
                "Status must be geaccepteerd or geweigerd".into(),
            ));
        }
        if quote.status != QuoteStatus::InAfwachting {
            return Err(DomainError::Conflict(format!(
                "Quote has already been answered ({})",
                quote.status
            )));
        }

        quote.status = status;
        let updated = self.repos.quotes().update(quote).await?;
        info!(quote_id = %updated.id, status = %updated.status, "Quote answered");
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        actor.require_admin()?;
        self.repos.quotes().delete(id).await?;
        info!(quote_id = %id, "Quote deleted");
        Ok(())
    }
}
