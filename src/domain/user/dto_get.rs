use super::UserRole;
use crate::shared::PageRequest;

#[derive(Debug, Clone, Default)]
pub struct GetUserDto {
    /// Matches email, first name or last name
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub page: PageRequest,
}
