//! Email service for order notifications.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Sending
//! is always off the request's critical path: callers spawn it and only
//! log failures.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Order;

/// HTML template for the new-order notification email.
#[derive(Template)]
#[template(path = "email/order_notification.html")]
struct OrderNotificationHtml<'a> {
    order_id: i64,
    customer_name: &'a str,
    customer_phone: &'a str,
    customer_email: &'a str,
    product_name: &'a str,
    quantity: i64,
    comments: &'a str,
}

/// Plain text template for the new-order notification email.
#[derive(Template)]
#[template(path = "email/order_notification.txt")]
struct OrderNotificationText<'a> {
    order_id: i64,
    customer_name: &'a str,
    customer_phone: &'a str,
    customer_email: &'a str,
    product_name: &'a str,
    quantity: i64,
    comments: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for order notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    notify_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP transport cannot be built.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            notify_address: config.notify_address.clone(),
        })
    }

    /// Send the new-order notification to the configured address.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_order_notification(&self, order: &Order) -> Result<(), EmailError> {
        let order_id = order.id.as_i64();
        let customer_email = order.customer_email.as_deref().unwrap_or("-");

        let html = OrderNotificationHtml {
            order_id,
            customer_name: &order.customer_name,
            customer_phone: &order.customer_phone,
            customer_email,
            product_name: &order.product_name,
            quantity: order.quantity,
            comments: &order.comments,
        }
        .render()?;
        let text = OrderNotificationText {
            order_id,
            customer_name: &order.customer_name,
            customer_phone: &order.customer_phone,
            customer_email,
            product_name: &order.product_name,
            quantity: order.quantity,
            comments: &order.comments,
        }
        .render()?;

        let subject = format!("Nuevo pedido #{order_id}");
        self.send_multipart_email(&self.notify_address, &subject, &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
