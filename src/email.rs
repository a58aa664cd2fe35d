//! Outbound email behind a trait seam so handlers and tests never talk to
//! SMTP directly. Delivery is at-most-effort: callers spawn sends and log
//! failures, they never fail a request over a mail problem.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::SmtpConfig;
use crate::reservations::repo_types::Reservation;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, name: &str, code: &str) -> anyhow::Result<()>;
    async fn send_reservation_confirmation(&self, reservation: &Reservation)
        -> anyhow::Result<()>;
    async fn send_reservation_notification(&self, reservation: &Reservation)
        -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    admin_to: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();
        Ok(Self {
            transport,
            from: config.from.parse::<Mailbox>()?,
            admin_to: config.admin_to.parse::<Mailbox>()?,
        })
    }

    async fn send_plain(&self, to: Mailbox, subject: String, body: String) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;
        self.transport.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_otp(&self, to: &str, name: &str, code: &str) -> anyhow::Result<()> {
        let body = format!(
            "Dear {name},\n\n\
             Your Boho Bistro verification code is: {code}\n\n\
             The code expires in a few minutes. If you did not request it,\n\
             you can safely ignore this email.\n\n\
             Best regards,\nThe Boho Bistro Team"
        );
        self.send_plain(
            to.parse::<Mailbox>()?,
            "Boho Bistro - Your Verification Code".into(),
            body,
        )
        .await
    }

    async fn send_reservation_confirmation(
        &self,
        reservation: &Reservation,
    ) -> anyhow::Result<()> {
        let body = format!(
            "Dear {},\n\n\
             Thank you for choosing Boho Bistro! Your reservation for {} people \
             on {} at {} has been confirmed.\n\n\
             Reservation ID: {}\n\n\
             We look forward to serving you!\n\n\
             Best regards,\nThe Boho Bistro Team",
            reservation.name,
            reservation.people,
            reservation.date,
            reservation.time,
            reservation.id,
        );
        self.send_plain(
            reservation.email.parse::<Mailbox>()?,
            format!("Boho Bistro - Reservation Confirmation #{}", reservation.id),
            body,
        )
        .await
    }

    async fn send_reservation_notification(
        &self,
        reservation: &Reservation,
    ) -> anyhow::Result<()> {
        let special = if reservation.special_requests.is_empty() {
            "None"
        } else {
            reservation.special_requests.as_str()
        };
        let body = format!(
            "New reservation from {} ({}, {}) for {} people on {} at {}.\n\
             Special requests: {}\nReservation ID: {}",
            reservation.name,
            reservation.email,
            reservation.phone,
            reservation.people,
            reservation.date,
            reservation.time,
            special,
            reservation.id,
        );
        self.send_plain(
            self.admin_to.clone(),
            format!(
                "New Reservation - {} - {} at {}",
                reservation.name, reservation.date, reservation.time
            ),
            body,
        )
        .await
    }
}

/// Fallback used when SMTP is not configured; also handy in tests.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_otp(&self, to: &str, _name: &str, _code: &str) -> anyhow::Result<()> {
        info!(%to, "smtp disabled; otp email not sent");
        Ok(())
    }

    async fn send_reservation_confirmation(
        &self,
        reservation: &Reservation,
    ) -> anyhow::Result<()> {
        info!(to = %reservation.email, id = %reservation.id, "smtp disabled; confirmation not sent");
        Ok(())
    }

    async fn send_reservation_notification(
        &self,
        reservation: &Reservation,
    ) -> anyhow::Result<()> {
        info!(id = %reservation.id, "smtp disabled; admin notification not sent");
        Ok(())
    }
}

/// Dispatch the OTP email off the request path. A delivery failure is logged
/// and never fails the originating request.
pub fn spawn_otp_email(mailer: std::sync::Arc<dyn Mailer>, to: String, name: String, code: String) {
    tokio::spawn(async move {
        if let Err(e) = mailer.send_otp(&to, &name, &code).await {
            warn!(error = %e, %to, "failed to send otp email");
        }
    });
}

/// Dispatch both reservation emails after the row is committed.
pub fn spawn_reservation_emails(mailer: std::sync::Arc<dyn Mailer>, reservation: Reservation) {
    tokio::spawn(async move {
        if let Err(e) = mailer.send_reservation_confirmation(&reservation).await {
            warn!(error = %e, id = %reservation.id, "failed to send reservation confirmation");
        }
        if let Err(e) = mailer.send_reservation_notification(&reservation).await {
            warn!(error = %e, id = %reservation.id, "failed to send reservation notification");
        }
    });
}
