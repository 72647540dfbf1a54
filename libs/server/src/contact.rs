//! Contact form validation and the persist-then-relay pipeline.

use axum::http::{HeaderMap, header::ACCEPT};
use folio_store::{ContactMessage, NewContactMessage, PortfolioStore, RelayStatus};
use folio_ui::render::escape_html;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    config::MailSettings,
    error::{ContactError, FieldError},
    mailer::{Mailer, OutgoingMail},
};

pub const INVALID_MESSAGE: &str = "Please fill all fields correctly";
pub const SENT_MESSAGE: &str = "Message sent successfully!";
pub const RECEIVED_TEXT: &str = "Message received. Thank you!";
pub const FAILED_MESSAGE: &str = "Error sending message";

static EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    match Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    ) {
        Ok(re) => Some(re),
        Err(error) => {
            warn!(%error, "failed to compile email regex");
            None
        }
    }
});

/// Raw form fields as posted; absent fields are empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, _domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.len() > 64 || local.starts_with('.') || local.ends_with('.') || email.contains("..")
    {
        return false;
    }

    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Entity-escapes free text before it is stored or relayed: the markup
/// characters [`escape_html`] handles, plus `/`, `\` and backticks.
pub fn sanitize_text(input: &str) -> String {
    escape_html(input.trim())
        .replace('/', "&#x2F;")
        .replace('\\', "&#x5C;")
        .replace('`', "&#96;")
}

pub fn validate(form: &ContactForm) -> Result<NewContactMessage, Vec<FieldError>> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Name is required",
        });
    }
    if !is_valid_email(form.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "A valid email address is required",
        });
    }
    if form.message.trim().is_empty() {
        errors.push(FieldError {
            field: "message",
            message: "Message is required",
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewContactMessage::new(
        sanitize_text(&form.name),
        normalize_email(&form.email),
        sanitize_text(&form.message),
    ))
}

/// Whether the client accepts a JSON response. A missing `Accept` header
/// accepts anything.
pub fn wants_json(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT).and_then(|value| value.to_str().ok()) else {
        return true;
    };
    if accept.trim().is_empty() {
        return true;
    }

    accept.split(',').any(|range| {
        let mut params = range.split(';');
        let media = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        let refused = params.any(|param| {
            param
                .trim()
                .strip_prefix("q=")
                .and_then(|q| q.trim().parse::<f32>().ok())
                .is_some_and(|q| q <= 0.0)
        });

        !refused && matches!(media.as_str(), "application/json" | "application/*" | "*/*")
    })
}

pub async fn submit(
    store: &dyn PortfolioStore,
    mailer: &dyn Mailer,
    mail: &MailSettings,
    form: &ContactForm,
) -> Result<ContactMessage, ContactError> {
    let submission = validate(form).map_err(ContactError::Invalid)?;
    let stored = store.insert_contact(&submission).await?;

    let notification = OutgoingMail::contact_notification(&stored, &mail.from, &mail.recipient);
    if let Err(error) = mailer.send(&notification).await {
        if let Err(mark_error) = store
            .mark_contact_relay(stored.id, RelayStatus::Failed)
            .await
        {
            warn!(contact_id = stored.id, %mark_error, "failed to record relay failure");
        }
        return Err(error.into());
    }

    store
        .mark_contact_relay(stored.id, RelayStatus::Sent)
        .await?;
    info!(contact_id = stored.id, "contact message relayed");

    Ok(ContactMessage {
        relay_status: RelayStatus::Sent,
        ..stored
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "ada",
            "ada@",
            "@example.com",
            "ada@example",
            "ada..b@example.com",
            ".ada@example.com",
            "ada@exa mple.com",
        ] {
            assert!(!is_valid_email(email), "{email} should be rejected");
        }
    }

    #[test]
    fn valid_form_is_trimmed_escaped_and_normalized() {
        let submission = match validate(&form(
            "  Ada <Lovelace> ",
            " Ada@Example.COM ",
            "Hi & bye\n",
        )) {
            Ok(submission) => submission,
            Err(errors) => panic!("form should validate: {errors:?}"),
        };

        assert_eq!(submission.name, "Ada &lt;Lovelace&gt;");
        assert_eq!(submission.email, "ada@example.com");
        assert_eq!(submission.message, "Hi &amp; bye");
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let errors = match validate(&form("  ", "nope", "")) {
            Ok(_) => panic!("form should be rejected"),
            Err(errors) => errors,
        };
        let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }

    #[test]
    fn sanitize_matches_html_escaping_for_markup() {
        let input = "<b class=\"x\">Tom & Jerry's</b>";
        assert_eq!(sanitize_text(input), escape_html(input).replace('/', "&#x2F;"));
        assert_eq!(sanitize_text("  plain text  "), "plain text");
    }

    #[test]
    fn sanitize_escapes_slashes_and_backticks() {
        assert_eq!(sanitize_text("a/b\\c`d"), "a&#x2F;b&#x5C;c&#96;d");
    }

    #[test]
    fn missing_accept_header_wants_json() {
        assert!(wants_json(&HeaderMap::new()));
    }

    #[test]
    fn accept_negotiation() {
        assert!(wants_json(&accept("application/json")));
        assert!(wants_json(&accept("text/html, */*;q=0.8")));
        assert!(!wants_json(&accept("text/html")));
        assert!(!wants_json(&accept("text/plain, application/json;q=0")));
    }
}
