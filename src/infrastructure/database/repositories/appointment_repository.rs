//! SeaORM implementation of AppointmentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::{
    Appointment, AppointmentFilter, AppointmentRepository, AppointmentStatus, DomainError,
    DomainResult,
};
use crate::infrastructure::database::entities::appointment;
use crate::shared::PaginatedResult;

fn status_to_entity(s: AppointmentStatus) -> appointment::AppointmentStatus {
    match s {
        AppointmentStatus::InAfwachting => appointment::AppointmentStatus::InAfwachting,
        AppointmentStatus::Bevestigd => appointment::AppointmentStatus::Bevestigd,
        AppointmentStatus::Geannuleerd => appointment::AppointmentStatus::Geannuleerd,
        AppointmentStatus::Voltooid => appointment::AppointmentStatus::Voltooid,
    }
}

fn entity_to_domain(m: appointment::Model) -> Appointment {
    Appointment {
        id: m.id,
        user_id: m.user_id,
        service_type: m.service_type,
        requested_date: m.requested_date,
        notes: m.notes,
        status: match m.status {
            appointment::AppointmentStatus::InAfwachting => AppointmentStatus::InAfwachting,
            appointment::AppointmentStatus::Bevestigd => AppointmentStatus::Bevestigd,
            appointment::AppointmentStatus::Geannuleerd => AppointmentStatus::Geannuleerd,
            appointment::AppointmentStatus::Voltooid => AppointmentStatus::Voltooid,
        },
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn to_active_model(a: Appointment) -> appointment::ActiveModel {
    appointment::ActiveModel {
        id: Set(a.id),
        user_id: Set(a.user_id),
        service_type: Set(a.service_type),
        requested_date: Set(a.requested_date),
        notes: Set(a.notes),
        status: Set(status_to_entity(a.status)),
        created_at: Set(a.created_at),
        updated_at: Set(a.updated_at),
    }
}

pub struct SeaOrmAppointmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAppointmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for SeaOrmAppointmentRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Appointment>> {
        let model = appointment::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(entity_to_domain))
    }

    async fn list(&self, filter: AppointmentFilter) -> DomainResult<PaginatedResult<Appointment>> {
        let mut query = appointment::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(appointment::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(appointment::Column::Status.eq(status_to_entity(status)));
        }

        let total = query.clone().count(&self.db).await?;

        let models = query
            .order_by_desc(appointment::Column::RequestedDate)
            .offset(filter.page.offset())
            .limit(u64::from(filter.page.limit))
            .all(&self.db)
            .await?;

        let items = models.into_iter().map(entity_to_domain).collect();
        Ok(PaginatedResult::new(items, total, filter.page))
    }

    async fn save(&self, a: Appointment) -> DomainResult<Appointment> {
        let result = to_active_model(a).insert(&self.db).await?;
        Ok(entity_to_domain(result))
    }

    async fn update(&self, mut a: Appointment) -> DomainResult<Appointment> {
        let existing = appointment::Entity::find_by_id(a.id.as_str())
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Appointment", &a.id))?;

        a.created_at = existing.created_at;
        a.updated_at = Utc::now();

        let result = to_active_model(a).update(&self.db).await?;
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = appointment::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Appointment", id));
        }

        Ok(())
    }
}
