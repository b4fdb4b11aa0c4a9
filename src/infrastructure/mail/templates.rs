//! Dutch-language email bodies

use crate::domain::{Appointment, Quote, User};

use super::EmailMessage;

/// Format euro cents the Dutch way: `€ 1.234,50`.
pub fn format_euro(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let euros = (cents / 100).to_string();

    let mut grouped = String::with_capacity(euros.len() + euros.len() / 3);
    for (i, ch) in euros.chars().enumerate() {
        if i > 0 && (euros.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}€ {},{:02}", sign, grouped, cents % 100)
}

fn html_page(title: &str, paragraphs: &[String], button: Option<(&str, &str)>) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<p style=\"font-size:15px;line-height:1.6\">{}</p>", p))
        .collect();
    let button = button
        .map(|(href, label)| {
            format!(
                "<p style=\"text-align:center;margin:32px 0\"><a href=\"{}\" \
                 style=\"padding:14px 24px;background:#1d4ed8;color:#fff;text-decoration:none\">{}</a></p>",
                href, label
            )
        })
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"></head>\
         <body style=\"font-family:Helvetica,Arial,sans-serif;color:#333\">\
         <div style=\"max-width:600px;margin:0 auto;padding:40px 20px\">\
         <h2 style=\"font-weight:400\">{}</h2>{}{}</div></body></html>",
        title, body, button
    )
}

/// Invitation to set a password on a provisioned account.
pub fn activation_email(user: &User, link: &str, valid_hours: i64) -> EmailMessage {
    let greeting = format!("Beste {},", user.display_name());
    let intro = "Er is een account voor u aangemaakt. Kies een wachtwoord om uw afspraken \
                 en offertes online te bekijken."
        .to_string();
    let expiry = format!("Deze link is {} uur geldig.", valid_hours);

    let text = format!("{}\n\n{}\n\n{}\n\n{}\n", greeting, intro, link, expiry);
    let html = html_page(
        "Activeer uw account",
        &[greeting, intro, expiry],
        Some((link, "Account activeren")),
    );

    EmailMessage::new(&user.email, "Activeer uw account", text).with_html_body(html)
}

pub fn appointment_confirmation(user: &User, appointment: &Appointment) -> EmailMessage {
    let greeting = format!("Beste {},", user.display_name());
    let detail = format!(
        "Wij hebben uw afspraak voor \"{}\" op {} ontvangen. De status is: {}.",
        appointment.service_type,
        appointment.requested_date.format("%d-%m-%Y %H:%M"),
        appointment.status
    );

    let text = format!("{}\n\n{}\n", greeting, detail);
    let html = html_page("Bevestiging van uw afspraak", &[greeting, detail], None);

    EmailMessage::new(&user.email, "Bevestiging van uw afspraak", text).with_html_body(html)
}

pub fn quote_notification(user: &User, quote: &Quote) -> EmailMessage {
    let greeting = format!("Beste {},", user.display_name());
    let detail = format!(
        "Er staat een nieuwe offerte voor u klaar: \"{}\" ter waarde van {}. \
         U kunt deze accepteren of weigeren in uw account.",
        quote.subject,
        format_euro(quote.amount_cents)
    );

    let text = format!("{}\n\n{}\n", greeting, detail);
    let html = html_page("Nieuwe offerte", &[greeting, detail], None);

    EmailMessage::new(&user.email, "Nieuwe offerte", text).with_html_body(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euro_formatting_groups_thousands() {
        assert_eq!(format_euro(0), "€ 0,00");
        assert_eq!(format_euro(5), "€ 0,05");
        assert_eq!(format_euro(123_450), "€ 1.234,50");
        assert_eq!(format_euro(1_500_000_00), "€ 1.500.000,00");
        assert_eq!(format_euro(-250), "-€ 2,50");
    }
}
