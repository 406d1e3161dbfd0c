//! Outbound email delivery.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use hustings_common::{AppError, AppResult, config::EmailConfig};

/// How mail leaves the platform.
#[derive(Clone, Debug)]
enum Delivery {
    /// Log each message instead of sending it.
    Disabled,
    /// Relay through an SMTP server.
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    },
}

/// Sends transactional mail (verification codes, government IDs, password
/// change notices) over SMTP.
#[derive(Clone, Debug)]
pub struct EmailService {
    delivery: Delivery,
}

impl EmailService {
    /// Create an email service from configuration.
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|e| AppError::Config(format!("invalid sender address: {e}")))?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| AppError::Config(format!("invalid SMTP relay: {e}")))?
                .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            delivery: Delivery::Smtp {
                transport: builder.build(),
                from,
            },
        })
    }

    /// Create a service that only logs messages. Used when outbound mail is
    /// disabled and in tests.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            delivery: Delivery::Disabled,
        }
    }

    /// Check whether outbound mail is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self.delivery, Delivery::Smtp { .. })
    }

    /// Send a plain text email.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let (transport, from) = match &self.delivery {
            Delivery::Disabled => {
                tracing::info!(%to, %subject, %body, "Outbound email disabled, logging message");
                return Ok(());
            }
            Delivery::Smtp { transport, from } => (transport, from),
        };

        let recipient: Mailbox = to
            .parse()
            .map_err(|e| AppError::BadRequest(format!("invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::DeliveryError(format!("failed to build message: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::DeliveryError(format!("SMTP delivery failed: {e}")))?;

        tracing::debug!(%to, %subject, "Email sent");
        Ok(())
    }

    /// Send a verification code to a registrant.
    pub async fn send_verification_code(&self, to: &str, code: &str) -> AppResult<()> {
        self.send(to, "Your OTP", &format!("Your OTP is: {code}"))
            .await
    }

    /// Send a newly issued government ID to a registered voter.
    pub async fn send_gov_id(&self, to: &str, gov_id: &str) -> AppResult<()> {
        self.send(
            to,
            "Your Government ID",
            &format!("Your Government ID is: {gov_id}"),
        )
        .await
    }

    /// Notify a voter that their password was changed.
    pub async fn send_password_changed(&self, to: &str) -> AppResult<()> {
        self.send(
            to,
            "Password Change",
            "Hi, your password has been changed on the Online Election System",
        )
        .await
    }
}
