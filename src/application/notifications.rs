//! Emails sent as a side effect of business operations

use std::sync::Arc;

use crate::domain::{Appointment, Quote, User};
use crate::infrastructure::mail::{dispatch, templates, Mailer};

/// Renders and dispatches customer emails. Every send is detached from the
/// caller; see [`dispatch`].
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    public_base_url: String,
    activation_ttl_hours: i64,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, public_base_url: &str, activation_ttl_hours: i64) -> Self {
        Self {
            mailer,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            activation_ttl_hours,
        }
    }

    pub fn activation_link(&self, token: &str) -> String {
        format!("{}/activeren?token={}", self.public_base_url, token)
    }

    pub fn account_activation(&self, user: &User, token: &str) {
        let link = self.activation_link(token);
        let message = templates::activation_email(user, &link, self.activation_ttl_hours);
        dispatch(self.mailer.clone(), message);
    }

    pub fn appointment_confirmation(&self, user: &User, appointment: &Appointment) {
        dispatch(
            self.mailer.clone(),
            templates::appointment_confirmation(user, appointment),
        );
    }

    pub fn quote_created(&self, user: &User, quote: &Quote) {
        dispatch(
            self.mailer.clone(),
            templates::quote_notification(user, quote),
        );
    }
}
