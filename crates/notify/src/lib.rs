//! Outbound mail: share a to-do list by email.
//!
//! [`ListMailer`] renders the nested `{name, items: [{actionItem, nextSteps}]}`
//! structure as a plain-text and HTML alternative and sends it over SMTP
//! with `lettre`. If `SMTP_HOST` is not set, [`MailConfig::from_env`]
//! returns `None` and sharing is disabled.

use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use taskvox_core::structure::StructureCategory;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// MailConfig
// ---------------------------------------------------------------------------

const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_ADDRESS: &str = "noreply@taskvox.local";

/// Default subject when the caller gives none.
pub const DEFAULT_SUBJECT: &str = "My to-do list";

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl MailConfig {
    /// Load configuration from environment variables, or `None` when
    /// `SMTP_HOST` is unset.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      |                          |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@taskvox.local`  |
    /// | `SMTP_USER`     | no       |                          |
    /// | `SMTP_PASSWORD` | no       |                          |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.trim().is_empty())?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// ListMailer
// ---------------------------------------------------------------------------

pub struct ListMailer {
    config: MailConfig,
}

impl ListMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Assemble the message without sending it.
    pub fn build_message(
        &self,
        to_email: &str,
        subject: &str,
        categories: &[StructureCategory],
    ) -> Result<Message, MailError> {
        Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                render_plain(categories),
                render_html(subject, categories),
            ))
            .map_err(|e| MailError::Build(e.to_string()))
    }

    /// Email `categories` to `to_email`.
    pub async fn send_list(
        &self,
        to_email: &str,
        subject: &str,
        categories: &[StructureCategory],
    ) -> Result<(), MailError> {
        let email = self.build_message(to_email, subject, categories)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport_builder.build().send(email).await?;

        tracing::info!(to = to_email, categories = categories.len(), "List email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Plain-text body: one block per category, numbered items, dashed steps.
pub fn render_plain(categories: &[StructureCategory]) -> String {
    if categories.is_empty() {
        return "(empty list)\n".to_string();
    }

    let mut out = String::new();
    for category in categories {
        out.push_str(&category.name);
        out.push('\n');
        for (i, item) in category.items.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, item.action_item));
            for step in &item.next_steps {
                out.push_str(&format!("     - {step}\n"));
            }
        }
        out.push('\n');
    }
    out
}

/// HTML body with the same nesting as [`render_plain`]. All text is escaped.
pub fn render_html(title: &str, categories: &[StructureCategory]) -> String {
    let mut out = format!("<html><body><h1>{}</h1>", escape_html(title));
    for category in categories {
        out.push_str(&format!("<h2>{}</h2><ol>", escape_html(&category.name)));
        for item in &category.items {
            out.push_str(&format!("<li>{}", escape_html(&item.action_item)));
            if !item.next_steps.is_empty() {
                out.push_str("<ul>");
                for step in &item.next_steps {
                    out.push_str(&format!("<li>{}</li>", escape_html(step)));
                }
                out.push_str("</ul>");
            }
            out.push_str("</li>");
        }
        out.push_str("</ol>");
    }
    out.push_str("</body></html>");
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
