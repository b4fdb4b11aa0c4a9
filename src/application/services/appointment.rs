//! Service appointments: customer self-service and admin booking

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::application::access::Actor;
use crate::application::notifications::Notifier;
use crate::application::provisioning::{GuestDetails, GuestProvisioner, ProvisionOutcome};
use crate::domain::{
    Appointment, AppointmentFilter, AppointmentStatus, DomainError, DomainResult,
    RepositoryProvider, User,
};
use crate::shared::{PageRequest, PaginatedResult};

use super::required_text;

#[derive(Debug, Clone)]
pub struct NewAppointment {
    /// Existing customer (admin only)
    pub user_id: Option<String>,
    /// Customer by email, provisioned when unknown (admin only)
    pub guest: Option<GuestDetails>,
    pub service_type: String,
    pub requested_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentChanges {
    pub service_type: Option<String>,
    pub requested_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentChanges {
    fn touches_details(&self) -> bool {
        self.service_type.is_some() || self.requested_date.is_some() || self.notes.is_some()
    }
}

/// Who an admin-created record belongs to.
pub(crate) async fn resolve_customer(
    repos: &dyn RepositoryProvider,
    provisioner: &GuestProvisioner,
    user_id: Option<String>,
    guest: Option<GuestDetails>,
) -> DomainResult<ProvisionOutcome> {
    match (user_id, guest) {
        (Some(id), _) => repos
            .users()
            .get_user_by_id(&id)
            .await?
            .map(ProvisionOutcome::Existing)
            .ok_or_else(|| DomainError::not_found("User", &id)),
        (None, Some(guest)) => provisioner.provision(guest).await,
        (None, None) => Err(DomainError::Validation(
            "Either userId or email is required".into(),
        )),
    }
}

pub struct AppointmentService {
    repos: Arc<dyn RepositoryProvider>,
    provisioner: Arc<GuestProvisioner>,
    notifier: Arc<Notifier>,
}

impl AppointmentService {
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
        status: Option<AppointmentStatus>,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Appointment>> {
        self.repos
            .appointments()
            .list(AppointmentFilter {
                user_id: actor.scope(user_id),
                status,
                page,
            })
            .await
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Appointment> {
        let appointment = self
            .repos
            .appointments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Appointment", id))?;
        actor.ensure_can_access(&appointment.user_id)?;
        Ok(appointment)
    }

    async fn own_account(&self, actor: &Actor) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(&actor.user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Account no longer exists".into()))
    }

    pub async fn create(&self, actor: &Actor, input: NewAppointment) -> DomainResult<Appointment> {
        let service_type = required_text("service_type", &input.service_type)?;
        let customer = if actor.is_admin() {
            resolve_customer(
                self.repos.as_ref(),
                &self.provisioner,
                input.user_id,
                input.guest,
            )
            .await?
        } else {
            ProvisionOutcome::Existing(self.own_account(actor).await?)
        };

        let now = Utc::now();
        let appointment = self
            .repos
            .appointments()
            .save(Appointment {
                id: uuid::Uuid::new_v4().to_string(),
                user_id: customer.user().id.clone(),
                service_type,
                requested_date: input.requested_date,
                notes: input.notes.filter(|n| !n.trim().is_empty()),
                status: AppointmentStatus::InAfwachting,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(
            appointment_id = %appointment.id,
            user_id = %appointment.user_id,
            created_by = %actor.user_id,
            "Appointment created"
        );

        match &customer {
            ProvisionOutcome::Provisioned {
                user,
                activation_token,
            } => self.notifier.account_activation(user, activation_token),
            ProvisionOutcome::Existing(user) => {
                self.notifier.appointment_confirmation(user, &appointment)
            }
        }

        Ok(appointment)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        changes: AppointmentChanges,
    ) -> DomainResult<Appointment> {
        let mut appointment = self.get(actor, id).await?;

        if !actor.is_admin() {
            if let Some(status) = changes.status {
                if status != AppointmentStatus::Geannuleerd {
                    return Err(DomainError::Forbidden(
                        "Customers can only cancel an appointment".into(),
                    ));
                }
                if matches!(
                    appointment.status,
                    AppointmentStatus::Geannuleerd | AppointmentStatus::Voltooid
                ) {
                    return Err(DomainError::Conflict(format!(
                        "Appointment is already {}",
                        appointment.status
                    )));
                }
            }
            if changes.touches_details() && appointment.status != AppointmentStatus::InAfwachting {
                return Err(DomainError::Forbidden(
                    "Only pending appointments can be changed".into(),
                ));
            }
        }

        if let Some(service_type) = changes.service_type {
            appointment.service_type = required_text("service_type", &service_type)?;
        }
        if let Some(date) = changes.requested_date {
            appointment.requested_date = date;
        }
        if let Some(notes) = changes.notes {
            appointment.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        if let Some(status) = changes.status {
            appointment.status = status;
        }

        let updated = self.repos.appointments().update(appointment).await?;
        info!(appointment_id = %updated.id, status = %updated.status, "Appointment updated");
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        self.get(actor, id).await?;
        self.repos.appointments().delete(id).await?;
        info!(appointment_id = %id, deleted_by = %actor.user_id, "Appointment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::application::test_support::TestContext;
    use crate::domain::UserRole;

    fn booking(user_id: Option<String>, guest: Option<GuestDetails>) -> NewAppointment {
        NewAppointment {
            user_id,
            guest,
            service_type: "APK keuring".into(),
            requested_date: Utc::now() + Duration::days(3),
            notes: Some("Graag 's ochtends".into()),
        }
    }

    #[tokio::test]
    async fn customer_books_for_self_even_when_naming_someone_else() {
        let ctx = TestContext::new().await;
        let me = ctx.customer("ik@example.nl").await;
        let other = ctx.customer("ander@example.nl").await;
        let actor = Actor::new(me.id.clone(), UserRole::Klant);

        let appointment = ctx
            .appointments
            .create(&actor, booking(Some(other.id.clone()), None))
            .await
            .unwrap();
        assert_eq!(appointment.user_id, me.id);
        assert_eq!(appointment.status, AppointmentStatus::InAfwachting);

        let mail = ctx.wait_for_mail(1).await;
        assert_eq!(mail[0].to, "ik@example.nl");
        assert_eq!(mail[0].subject, "Bevestiging van uw afspraak");
    }

    #[tokio::test]
    async fn admin_booking_for_unknown_email_provisions_and_invites() {
        let ctx = TestContext::new().await;
        let admin = Actor::new(ctx.admin().await.id, UserRole::Admin);

        let appointment = ctx
            .appointments
            .create(
                &admin,
                booking(
                    None,
                    Some(GuestDetails {
                        email: "Nieuw@Example.nl".into(),
                        first_name: Some("Nina".into()),
                        ..Default::default()
                    }),
                ),
            )
            .await
            .unwrap();

        let guest = ctx
            .repos
            .users()
            .get_user_by_email("nieuw@example.nl")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(appointment.user_id, guest.id);
        assert!(!guest.is_active);

        let mail = ctx.wait_for_mail(1).await;
        assert_eq!(mail[0].subject, "Activeer uw account");
        assert!(mail[0].text_body.contains("https://dealer.test/activeren?token="));
    }

    #[tokio::test]
    async fn admin_must_name_a_customer() {
        let ctx = TestContext::new().await;
        let admin = Actor::new(ctx.admin().await.id, UserRole::Admin);
        let err = ctx
            .appointments
            .create(&admin, booking(None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_customer() {
        let ctx = TestContext::new().await;
        let admin = Actor::new(ctx.admin().await.id, UserRole::Admin);
        let a = ctx.customer("a@example.nl").await;
        let b = ctx.customer("b@example.nl").await;
        for user in [&a, &b] {
            ctx.appointments
                .create(&admin, booking(Some(user.id.clone()), None))
                .await
                .unwrap();
        }

        let klant = Actor::new(a.id.clone(), UserRole::Klant);
        let mine = ctx
            .appointments
            .list(&klant, Some(b.id.clone()), None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(mine.total, 1);
        assert_eq!(mine.items[0].user_id, a.id);

        let all = ctx
            .appointments
            .list(&admin, None, None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total, 2);
    }

    #[tokio::test]
    async fn customer_may_only_cancel_and_edit_pending() {
        let ctx = TestContext::new().await;
        let me = ctx.customer("ik@example.nl").await;
        let klant = Actor::new(me.id.clone(), UserRole::Klant);
        let admin = Actor::new(ctx.admin().await.id, UserRole::Admin);
        let appointment = ctx
            .appointments
            .create(&klant, booking(None, None))
            .await
            .unwrap();

        let err = ctx
            .appointments
            .update(
                &klant,
                &appointment.id,
                AppointmentChanges {
                    status: Some(AppointmentStatus::Bevestigd),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        ctx.appointments
            .update(
                &admin,
                &appointment.id,
                AppointmentChanges {
                    status: Some(AppointmentStatus::Bevestigd),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = ctx
            .appointments
            .update(
                &klant,
                &appointment.id,
                AppointmentChanges {
                    notes: Some("later".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let cancelled = ctx
            .appointments
            .update(
                &klant,
                &appointment.id,
                AppointmentChanges {
                    status: Some(AppointmentStatus::Geannuleerd),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Geannuleerd);
    }

    #[tokio::test]
    async fn strangers_cannot_read_or_delete() {
        let ctx = TestContext::new().await;
        let owner = ctx.customer("eigen@example.nl").await;
        let stranger = ctx.customer("vreemd@example.nl").await;
        let appointment = ctx
            .appointments
            .create(
                &Actor::new(owner.id.clone(), UserRole::Klant),
                booking(None, None),
            )
            .await
            .unwrap();

        let intruder = Actor::new(stranger.id, UserRole::Klant);
        assert!(matches!(
            ctx.appointments.get(&intruder, &appointment.id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            ctx.appointments.delete(&intruder, &appointment.id).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn blank_service_type_is_rejected_without_provisioning() {
        let ctx = TestContext::new().await;
        let admin = Actor::new(ctx.admin().await.id, UserRole::Admin);

        let mut input = booking(
            None,
            Some(GuestDetails {
                email: "leeg@example.nl".into(),
                ..Default::default()
            }),
        );
        input.service_type = "   ".into();

        let err = ctx.appointments.create(&admin, input).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(ctx
            .repos
            .users()
            .get_user_by_email("leeg@example.nl")
            .await
            .unwrap()
            .is_none());
    }
}
