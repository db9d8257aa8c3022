use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::model::saved_search::SearchFilters;
use crate::util::ai::{parse_generated_copy, CompletionRequest, TextGenerator};
use crate::util::email::{EmailMessage, EmailSender, SendReceipt};
use crate::util::email_templates::{self, AlertItem, RenderedEmail};
use crate::util::error::ServiceError;

const COPYWRITER_PROMPT: &str = "You write warm, concise emails for Domy v Itálii, a platform helping Czech and \
international buyers find property in Italy. Reply with JSON {\"subject\": string, \"body\": string}. \
The body is plain text paragraphs without a greeting line for the call to action.";

#[derive(Debug, Clone)]
pub struct PropertyAlert {
    pub to: String,
    pub user_name: String,
    pub search_name: String,
    pub filters: SearchFilters,
    pub items: Vec<AlertItem>,
}

#[derive(Debug, Clone)]
pub struct InquiryConfirmation {
    pub to: String,
    pub user_name: String,
    pub property_title: String,
    pub message: String,
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send_property_alert(&self, alert: PropertyAlert) -> Result<SendReceipt, ServiceError>;
    async fn send_inquiry_confirmation(&self, confirmation: InquiryConfirmation) -> Result<SendReceipt, ServiceError>;
    async fn send_welcome(&self, to: &str, user_name: &str) -> Result<SendReceipt, ServiceError>;
    async fn send_follow_up(&self, to: &str, user_name: &str, days: u32) -> Result<SendReceipt, ServiceError>;
    async fn send_test(&self, to: &str) -> Result<SendReceipt, ServiceError>;
    /// True when generated copy is attempted before the static templates.
    fn ai_enabled(&self) -> bool;
}

pub struct NotificationServiceImpl {
    pub mailer: Arc<dyn EmailSender>,
    pub ai: Option<Arc<dyn TextGenerator>>,
    pub base_url: String,
}

impl NotificationServiceImpl {
    pub fn new(mailer: Arc<dyn EmailSender>, ai: Option<Arc<dyn TextGenerator>>, base_url: String) -> Self {
        Self { mailer, ai, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// Generated copy in the house layout, or `fallback` when the model is
    /// absent or fails.
    async fn personalize(
        &self,
        prompt: String,
        fallback: RenderedEmail,
        items: &[AlertItem],
        cta_url: &str,
        cta_label: &str,
    ) -> RenderedEmail {
        let Some(ai) = &self.ai else {
            return fallback;
        };
        let request = CompletionRequest {
            system: COPYWRITER_PROMPT.to_string(),
            prompt,
            max_tokens: 500,
            temperature: 0.7,
        };
        match ai.complete(request).await {
            Ok(raw) => {
                let copy = parse_generated_copy(&raw);
                let subject = copy.subject.unwrap_or_else(|| fallback.subject.clone());
                email_templates::from_generated_copy(subject, &copy.body, items, cta_url, cta_label)
            }
            Err(e) => {
                warn!("Generated copy failed, using static template: {e}");
                fallback
            }
        }
    }

    async fn deliver(&self, to: &str, email: RenderedEmail) -> Result<SendReceipt, ServiceError> {
        let message = EmailMessage::new(to, email.subject)
            .with_text_body(email.text)
            .with_html_body(email.html);
        match self.mailer.send_email(message).await {
            Ok(receipt) => {
                info!(provider = %receipt.provider, "Email delivered");
                Ok(receipt)
            }
            Err(e) => {
                error!("Email delivery failed: {e}");
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl NotificationService for NotificationServiceImpl {
    #[instrument(skip(self, alert), fields(to = %alert.to, matches = alert.items.len()))]
    async fn send_property_alert(&self, alert: PropertyAlert) -> Result<SendReceipt, ServiceError> {
        let fallback = email_templates::property_alert(
            &self.base_url,
            &alert.user_name,
            &alert.search_name,
            &alert.items,
            &alert.filters,
        );
        let titles = alert
            .items
            .iter()
            .map(|i| i.title.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let prompt = format!(
            "Write a property alert for {} about {} new listings matching the saved search \"{}\": {}.",
            alert.user_name,
            alert.items.len(),
            alert.search_name,
            titles
        );
        let cta = format!("{}/dashboard/recommendations", self.base_url);
        let email = self.personalize(prompt, fallback, &alert.items, &cta, "View Your Matches").await;
        self.deliver(&alert.to, email).await
    }

    #[instrument(skip(self, confirmation), fields(to = %confirmation.to))]
    async fn send_inquiry_confirmation(&self, confirmation: InquiryConfirmation) -> Result<SendReceipt, ServiceError> {
        let fallback = email_templates::inquiry_confirmation(
            &self.base_url,
            &confirmation.user_name,
            &confirmation.property_title,
            &confirmation.message,
        );
        let prompt = format!(
            "Confirm to {} that we received their inquiry about \"{}\" and will reply within 24 hours. Their message: {}",
            confirmation.user_name, confirmation.property_title, confirmation.message
        );
        let cta = format!("{}/dashboard/inquiries", self.base_url);
        let email = self.personalize(prompt, fallback, &[], &cta, "View Your Inquiries").await;
        self.deliver(&confirmation.to, email).await
    }

    #[instrument(skip(self))]
    async fn send_welcome(&self, to: &str, user_name: &str) -> Result<SendReceipt, ServiceError> {
        self.deliver(to, email_templates::welcome(&self.base_url, user_name)).await
    }

    #[instrument(skip(self))]
    async fn send_follow_up(&self, to: &str, user_name: &str, days: u32) -> Result<SendReceipt, ServiceError> {
        self.deliver(to, email_templates::follow_up(&self.base_url, user_name, days)).await
    }

    #[instrument(skip(self))]
    async fn send_test(&self, to: &str) -> Result<SendReceipt, ServiceError> {
        self.deliver(to, email_templates::test_message()).await
    }

    fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::util::ai::AiError;
    use crate::util::email::EmailError;

    struct CannedCopy(&'static str);

    #[async_trait]
    impl TextGenerator for CannedCopy {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, AiError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct Outbox(Mutex<Vec<EmailMessage>>);

    #[async_trait]
    impl EmailSender for Outbox {
        async fn send_email(&self, message: EmailMessage) -> Result<SendReceipt, EmailError> {
            self.0.lock().unwrap().push(message);
            Ok(SendReceipt { success: true, provider: "outbox".to_string() })
        }

        fn is_simulation(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_generated_alert_still_lists_matches() {
        let outbox = Arc::new(Outbox::default());
        let ai: Arc<dyn TextGenerator> =
            Arc::new(CannedCopy(r#"{"subject": "Jana, Tuscany has news", "body": "Two homes caught our eye."}"#));
        let service = NotificationServiceImpl::new(outbox.clone(), Some(ai), "https://domy.example/".to_string());

        let alert = PropertyAlert {
            to: "jana@example.cz".to_string(),
            user_name: "Jana".to_string(),
            search_name: "Tuscany villas".to_string(),
            filters: SearchFilters::default(),
            items: vec![AlertItem {
                title: "Villa Chianti".to_string(),
                url: Some("https://domy.example/properties/villa-chianti".to_string()),
                price: Some(300000.0),
                city: Some("Siena".to_string()),
            }],
        };
        service.send_property_alert(alert).await.unwrap();

        let sent = outbox.0.lock().unwrap();
        assert_eq!(sent[0].subject, "Jana, Tuscany has news");
        let html = sent[0].html_body.as_deref().unwrap();
        assert!(html.contains("Two homes caught our eye."));
        assert!(html.contains("https://domy.example/properties/villa-chianti"));
        assert!(sent[0].text_body.as_deref().unwrap().contains("Villa Chianti (€300 000)"));
    }
}
