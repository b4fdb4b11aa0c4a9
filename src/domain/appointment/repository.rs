use async_trait::async_trait;

use super::model::{Appointment, AppointmentFilter};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Appointment>>;
    async fn list(&self, filter: AppointmentFilter) -> DomainResult<PaginatedResult<Appointment>>;
    async fn save(&self, appointment: Appointment) -> DomainResult<Appointment>;
    async fn update(&self, appointment: Appointment) -> DomainResult<Appointment>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
