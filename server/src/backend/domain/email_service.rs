use anyhow::{Context, Result};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use log::info;
use serde::{Deserialize, Serialize};

/// The mail-sending capability the notification sweep depends on.
///
/// The sweep only ever asks for "send this message to this address"; the
/// transport behind it is swappable, and tests substitute a recording or
/// failing double.
pub trait MailSender: Send + Sync {
    fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_email: String::new(),
        }
    }
}

impl EmailConfig {
    /// Whether enough settings are present to build a transport
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.from_email.is_empty()
    }
}

/// SMTP-backed mail sender.
///
/// When SMTP is not configured the service stays uninitialized and sends
/// become logged no-ops, so a development instance can run sweeps without
/// a mail account.
pub struct EmailService {
    config: EmailConfig,
    transport: Option<SmtpTransport>,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Build and initialize the SMTP transport if the config allows it
    pub fn initialize(config: EmailConfig) -> Result<Self> {
        let mut service = Self::new(config);
        if !service.config.is_configured() {
            info!("📧 SMTP not configured, birthday mails will be logged only");
            return Ok(service);
        }

        info!(
            "📧 Initializing email service for SMTP server: {}:{}",
            service.config.smtp_server, service.config.smtp_port
        );

        let tls_params = TlsParameters::new(service.config.smtp_server.clone())
            .context("Failed to create TLS parameters")?;

        let transport = SmtpTransport::relay(&service.config.smtp_server)
            .context("Failed to create SMTP relay")?
            .port(service.config.smtp_port)
            .tls(Tls::Required(tls_params))
            .credentials(Credentials::new(
                service.config.username.clone(),
                service.config.password.clone(),
            ))
            .build();

        service.transport = Some(transport);
        info!("📧 Email service initialized successfully");
        Ok(service)
    }
}

impl MailSender for EmailService {
    fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let transport = match self.transport.as_ref() {
            Some(transport) => transport,
            None => {
                info!("📧 SMTP not configured, skipping mail to {}: {}", to, subject);
                return Ok(());
            }
        };

        let email = Message::builder()
            .from(
                self.config
                    .from_email
                    .parse::<Mailbox>()
                    .context("Failed to parse from email")?,
            )
            .to(to.parse::<Mailbox>().context("Failed to parse recipient email")?)
            .subject(subject)
            .body(body.to_string())
            .context("Failed to build email")?;

        transport.send(&email).context("Failed to send email")?;
        info!("📧 Sent birthday notification to {}", to);
        Ok(())
    }
}
