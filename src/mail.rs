use async_trait::async_trait;
use lettre::{
    address::AddressError,
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("smtp is not configured")]
    NotConfigured,

    #[error("invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp transport: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A single plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Stands in when the SMTP environment is incomplete; every send fails.
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, _mail: OutgoingMail) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> Result<Self, MailError> {
        let from = cfg.from.parse::<Mailbox>()?;
        let credentials = Credentials::new(cfg.user.clone(), cfg.pass.clone());

        let transport = if cfg.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)?
                .port(cfg.port)
                .credentials(credentials)
                .build()
        } else {
            let tls = TlsParameters::new(cfg.host.clone())?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.host)
                .port(cfg.port)
                .tls(Tls::Opportunistic(tls))
                .credentials(credentials)
                .build()
        };

        debug!(host = %cfg.host, port = cfg.port, "smtp transport ready");
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let to = mail.to.parse::<Mailbox>()?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)?;

        let response = self.transport.send(message).await?;
        info!(to = %mail.to, code = %response.code(), "mail sent");
        Ok(())
    }
}
