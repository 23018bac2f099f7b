//! Notification service: builds the verification link and dispatches it by
//! email. Delivery is best-effort; a failed send is logged and never rolls
//! back the registration that triggered it.

use anyhow::Result;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

#[derive(Clone)]
pub struct Mailer {
    /// None when SMTP is unconfigured; the link is logged instead so the
    /// flow stays testable in development.
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    public_url: String,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("smtp", &self.transport.is_some())
            .field("from", &self.from)
            .finish()
    }
}

impl Mailer {
    /// Build from SMTP_HOST/SMTP_USERNAME/SMTP_PASSWORD/SMTP_FROM. Without
    /// SMTP_HOST the mailer runs in log-only mode.
    pub fn from_env(public_url: &str) -> Result<Self> {
        let Ok(host) = std::env::var("SMTP_HOST") else {
            info!("SMTP_HOST not set; verification links will be logged, not mailed");
            return Ok(Self::disabled(public_url));
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)?;
        if let (Ok(username), Ok(password)) =
            (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD"))
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: Some(builder.build()),
            from: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "Mainstage <no-reply@mainstage.local>".to_string()),
            public_url: public_url.to_string(),
        })
    }

    pub fn disabled(public_url: &str) -> Self {
        Self {
            transport: None,
            from: "Mainstage <no-reply@mainstage.local>".to_string(),
            public_url: public_url.to_string(),
        }
    }

    pub fn verification_link(&self, token: &str) -> String {
        format!("{}/verification?token={}", self.public_url, token)
    }

    /// Send the single-use verification link to a fresh account.
    pub async fn send_verification(
        &self,
        recipient: &str,
        username: &str,
        token: &str,
    ) -> Result<()> {
        let link = self.verification_link(token);

        let Some(transport) = &self.transport else {
            info!("Verification link for {recipient}: {link}");
            return Ok(());
        };

        let message = Message::builder()
            .from(self.from.parse()?)
            .to(recipient.parse()?)
            .subject("Verify your Mainstage account")
            .header(ContentType::TEXT_HTML)
            .body(format!(
                "<p>Hi {username},</p>\
                 <p>Welcome to Mainstage. Please <a href=\"{link}\">verify your \
                 account</a> to finish setting up your festival.</p>\
                 <p>If you did not register, ignore this message.</p>"
            ))?;

        transport.send(message).await?;
        debug!("Verification email dispatched to {recipient}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_embeds_token_and_base_url() {
        let mailer = Mailer::disabled("http://localhost:3000");
        assert_eq!(
            mailer.verification_link("abc.def.ghi"),
            "http://localhost:3000/verification?token=abc.def.ghi"
        );
    }

    #[tokio::test]
    async fn disabled_mailer_send_is_a_no_op() {
        let mailer = Mailer::disabled("http://localhost:3000");
        mailer
            .send_verification("alice@example.com", "alice", "tok")
            .await
            .unwrap();
    }
}
