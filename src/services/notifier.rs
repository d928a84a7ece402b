// src/services/notifier.rs

//! New-post notification.
//!
//! Formatting the digest is ours; transport and authentication belong to the
//! [`Notifier`] implementation.

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{SmtpCredentials, SmtpSecret};
use crate::error::{AppError, Result};
use crate::models::{EmailConfig, Post, parse_mailbox};

/// Delivers a plain-text message to a recipient list.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<()>;
}

/// Render the digest body: one numbered entry per post, blank line between.
pub fn format_digest(posts: &[Post]) -> String {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let mut entry = format!("{}. {}\n{}", i + 1, post.title, post.link);
            if let Some(date) = &post.date {
                entry.push_str(&format!("\nDate: {date}"));
            }
            if let Some(contents) = &post.contents {
                entry.push('\n');
                entry.push_str(contents);
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the `{count}` placeholder of a subject template.
pub fn format_subject(template: &str, count: usize) -> String {
    template.replace("{count}", &count.to_string())
}

/// SMTP notifier over implicit TLS.
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl EmailNotifier {
    /// Build the SMTP transport. Nothing is sent or connected yet.
    pub fn new(config: &EmailConfig, credentials: SmtpCredentials) -> Result<Self> {
        let sender = parse_mailbox("email.sender", &config.sender)?;
        for recipient in &config.recipients {
            parse_mailbox("email.recipients", recipient)?;
        }

        let builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| AppError::config(format!("Invalid SMTP host: {e}")))?
            .port(config.smtp_port);

        let builder = match credentials.secret {
            SmtpSecret::Password(password) => {
                builder.credentials(Credentials::new(credentials.username, password))
            }
            SmtpSecret::OAuthToken(token) => builder
                .credentials(Credentials::new(credentials.username, token))
                .authentication(vec![Mechanism::Xoauth2]),
        };

        Ok(Self {
            mailer: builder.build(),
            sender,
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<()> {
        let message = build_message(&self.sender, recipients, subject, body)?;
        self.mailer
            .send(message)
            .await
            .map_err(AppError::notification)?;
        log::info!("Sent digest to {} recipient(s)", recipients.len());
        Ok(())
    }
}

fn build_message(
    sender: &Mailbox,
    recipients: &[String],
    subject: &str,
    body: &str,
) -> Result<Message> {
    if recipients.is_empty() {
        return Err(AppError::notification("No recipients to send to"));
    }

    let mut builder = Message::builder()
        .from(sender.clone())
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);

    for recipient in recipients {
        let mailbox: Mailbox = recipient.parse().map_err(|e| {
            AppError::notification(format!("Invalid recipient '{recipient}': {e}"))
        })?;
        builder = builder.to(mailbox);
    }

    builder
        .body(body.to_string())
        .map_err(AppError::notification)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> Mailbox {
        "watcher@example.org".parse().unwrap()
    }

    #[test]
    fn test_format_digest() {
        let posts = vec![
            Post::new("Rekrutacja", "https://pollub.pl/a/1")
                .with_date("12.10.2026")
                .with_contents("Ruszyła rekrutacja."),
            Post::new("Stypendia", "https://pollub.pl/a/2"),
            Post::new("Konferencja", "https://weii.pollub.pl/n/3").with_contents("Zapraszamy."),
        ];

        let expected = "1. Rekrutacja\nhttps://pollub.pl/a/1\nDate: 12.10.2026\nRuszyła rekrutacja.\n\n\
                        2. Stypendia\nhttps://pollub.pl/a/2\n\n\
                        3. Konferencja\nhttps://weii.pollub.pl/n/3\nZapraszamy.";
        assert_eq!(format_digest(&posts), expected);
    }

    #[test]
    fn test_format_digest_empty() {
        assert_eq!(format_digest(&[]), "");
    }

    #[test]
    fn test_format_subject() {
        assert_eq!(format_subject("New posts ({count})", 4), "New posts (4)");
        assert_eq!(format_subject("New posts", 4), "New posts");
    }

    #[test]
    fn test_build_message_lists_all_recipients() {
        let recipients = vec!["a@example.org".to_string(), "b@example.org".to_string()];
        let message = build_message(&sender(), &recipients, "New posts (1)", "1. Title").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("a@example.org"));
        assert!(raw.contains("b@example.org"));
        assert!(raw.contains("watcher@example.org"));
        assert!(raw.contains("Content-Type: text/plain; charset=utf-8"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let recipients = vec!["not an address".to_string()];
        let err = build_message(&sender(), &recipients, "s", "b").unwrap_err();
        assert!(matches!(err, AppError::Notification(_)));
    }

    #[test]
    fn test_build_message_requires_recipients() {
        assert!(build_message(&sender(), &[], "s", "b").is_err());
    }

    #[test]
    fn test_email_notifier_rejects_bad_sender() {
        let config = EmailConfig {
            sender: "nobody".to_string(),
            recipients: vec!["a@example.org".to_string()],
            ..EmailConfig::default()
        };
        let credentials = SmtpCredentials {
            username: "watcher".to_string(),
            secret: SmtpSecret::Password("secret".to_string()),
        };
        assert!(matches!(
            EmailNotifier::new(&config, credentials),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_email_notifier_rejects_bad_recipient_up_front() {
        let config = EmailConfig {
            sender: "watcher@example.org".to_string(),
            recipients: vec!["student at example dot org".to_string()],
            ..EmailConfig::default()
        };
        let credentials = SmtpCredentials {
            username: "watcher".to_string(),
            secret: SmtpSecret::Password("secret".to_string()),
        };
        assert!(matches!(
            EmailNotifier::new(&config, credentials),
            Err(AppError::Config(_))
        ));
    }
}
