use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use crate::dto::email_dto::{
    GenerateEmailContentRequest, GeneratePropertyDescriptionRequest, GenerateSubjectRequest, TranslateRequest,
    TranslationResponse,
};
use crate::util::ai::{strip_quotes, CompletionRequest, TextGenerator};
use crate::util::error::ServiceError;

const SUBJECT_PROMPT: &str = "You write email subject lines for Domy v Itálii, an Italian real-estate \
platform for Czech and international buyers. Reply with the subject line only, under 60 characters.";

const CONTENT_PROMPT: &str = "You write emails for Domy v Itálii, an Italian real-estate platform for \
Czech and international buyers. Reply with the email body only, in plain paragraphs.";

const DESCRIPTION_PROMPT: &str = "You are a real-estate copywriter for Italian properties. Write an \
engaging listing description of two or three paragraphs. Do not invent facts that were not given.";

const TRANSLATE_PROMPT: &str = "You are a professional translator for a real-estate platform. Translate \
faithfully, keep names and numbers unchanged and reply with the translation only.";

pub const SUPPORTED_LANGUAGES: [&str; 3] = ["en", "cs", "it"];

fn language_name(code: &str) -> &'static str {
    match code {
        "cs" => "Czech",
        "it" => "Italian",
        _ => "English",
    }
}

#[async_trait]
pub trait CopyService: Send + Sync {
    async fn generate_subject(&self, request: GenerateSubjectRequest) -> Result<String, ServiceError>;
    async fn generate_email_content(&self, request: GenerateEmailContentRequest) -> Result<String, ServiceError>;
    async fn generate_property_description(
        &self,
        request: GeneratePropertyDescriptionRequest,
    ) -> Result<String, ServiceError>;
    async fn translate(&self, request: TranslateRequest) -> Result<TranslationResponse, ServiceError>;
}

pub struct CopyServiceImpl {
    pub ai: Option<Arc<dyn TextGenerator>>,
}

impl CopyServiceImpl {
    pub fn new(ai: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { ai }
    }

    async fn complete(&self, system: &str, prompt: String, max_tokens: u32, temperature: f32) -> Result<String, ServiceError> {
        let ai = self
            .ai
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("AI service not configured".to_string()))?;
        let request = CompletionRequest { system: system.to_string(), prompt, max_tokens, temperature };
        match ai.complete(request).await {
            Ok(text) => Ok(text),
            Err(e) => {
                error!("Text generation failed: {e}");
                Err(e.into())
            }
        }
    }
}

fn describe_property(request: &GeneratePropertyDescriptionRequest) -> String {
    let mut facts = vec![format!("Type: {}", request.property_type), format!("Location: {}", request.location)];
    if let Some(bedrooms) = request.bedrooms {
        facts.push(format!("Bedrooms: {}", bedrooms));
    }
    if let Some(bathrooms) = request.bathrooms {
        facts.push(format!("Bathrooms: {}", bathrooms));
    }
    if let Some(size) = request.square_meters {
        facts.push(format!("Size: {} m²", size));
    }
    if let Some(price) = request.price {
        facts.push(format!("Price: €{:.0}", price));
    }
    if !request.features.is_empty() {
        facts.push(format!("Features: {}", request.features.join(", ")));
    }
    if let Some(audience) = &request.target_audience {
        facts.push(format!("Target buyers: {}", audience));
    }
    facts.join("\n")
}

#[async_trait]
impl CopyService for CopyServiceImpl {
    #[instrument(skip(self, request), fields(email_type = %request.email_type))]
    async fn generate_subject(&self, request: GenerateSubjectRequest) -> Result<String, ServiceError> {
        let prompt = format!(
            "Write a subject line for a {} email to {}.\nProperty: {}\nContext: {}",
            request.email_type,
            request.recipient_name,
            request.property_details.as_deref().unwrap_or("none"),
            request.additional_context.as_deref().unwrap_or("none"),
        );
        let subject = strip_quotes(&self.complete(SUBJECT_PROMPT, prompt, 50, 0.7).await?);
        info!("Subject line generated");
        Ok(subject)
    }

    #[instrument(skip(self, request), fields(email_type = %request.email_type, tone = %request.tone))]
    async fn generate_email_content(&self, request: GenerateEmailContentRequest) -> Result<String, ServiceError> {
        let prompt = format!(
            "Write a {} email in a {} tone to {}.\nProperty: {}\nContext: {}",
            request.email_type,
            request.tone,
            request.recipient_name,
            request.property_details.as_deref().unwrap_or("none"),
            request.additional_context.as_deref().unwrap_or("none"),
        );
        self.complete(CONTENT_PROMPT, prompt, 500, 0.7).await
    }

    #[instrument(skip(self, request), fields(property_type = %request.property_type))]
    async fn generate_property_description(
        &self,
        request: GeneratePropertyDescriptionRequest,
    ) -> Result<String, ServiceError> {
        let prompt = format!("Describe this property:\n{}", describe_property(&request));
        self.complete(DESCRIPTION_PROMPT, prompt, 300, 0.7).await
    }

    #[instrument(skip(self, request), fields(from = %request.source_lang, to = %request.target_lang))]
    async fn translate(&self, request: TranslateRequest) -> Result<TranslationResponse, ServiceError> {
        let source = request.source_lang.trim().to_lowercase();
        let target = request.target_lang.trim().to_lowercase();
        if request.text.trim().is_empty() || source.is_empty() || target.is_empty() {
            return Err(ServiceError::InvalidInput("Missing required fields".to_string()));
        }
        for lang in [&source, &target] {
            if !SUPPORTED_LANGUAGES.contains(&lang.as_str()) {
                return Err(ServiceError::InvalidInput(format!("Unsupported language: {}", lang)));
            }
        }
        if source == target {
            return Ok(TranslationResponse { translated_text: request.text, source_lang: source, target_lang: target });
        }

        let mut prompt = format!(
            "Translate from {} to {}:\n\n{}",
            language_name(&source),
            language_name(&target),
            request.text
        );
        if let Some(context) = request.context.as_deref().filter(|c| !c.trim().is_empty()) {
            prompt = format!("Context: {}\n\n{}", context, prompt);
        }
        let translated_text = self.complete(TRANSLATE_PROMPT, prompt, 2000, 0.3).await?;
        info!("Text translated");
        Ok(TranslationResponse { translated_text, source_lang: source, target_lang: target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ai::AiError;
    use std::sync::Mutex;

    struct Scripted {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn complete(&self, request: CompletionRequest) -> Result<String, AiError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    fn service(reply: &str) -> (CopyServiceImpl, Arc<Scripted>) {
        let ai = Arc::new(Scripted { reply: reply.to_string(), seen: Mutex::new(Vec::new()) });
        (CopyServiceImpl::new(Some(ai.clone())), ai)
    }

    fn translate_request(text: &str, from: &str, to: &str) -> TranslateRequest {
        TranslateRequest {
            text: text.to_string(),
            source_lang: from.to_string(),
            target_lang: to.to_string(),
            context: None,
        }
    }

    #[tokio::test]
    async fn test_subject_is_unquoted() {
        let (svc, ai) = service("\"Your Tuscan dream awaits\"");
        let subject = svc
            .generate_subject(GenerateSubjectRequest {
                recipient_name: "Jana".into(),
                email_type: "welcome".into(),
                property_details: None,
                additional_context: None,
            })
            .await
            .unwrap();
        assert_eq!(subject, "Your Tuscan dream awaits");
        assert_eq!(ai.seen.lock().unwrap()[0].max_tokens, 50);
    }

    #[tokio::test]
    async fn test_translate_uses_low_temperature() {
        let (svc, ai) = service("Ahoj");
        let result = svc.translate(translate_request("Ciao", "it", "cs")).await.unwrap();
        assert_eq!(result.translated_text, "Ahoj");
        let seen = ai.seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, 2000);
        assert!((seen[0].temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_translate_rejects_unknown_language() {
        let (svc, _) = service("x");
        let result = svc.translate(translate_request("Hallo", "de", "cs")).await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
        let missing = svc.translate(translate_request("Hallo", "", "cs")).await;
        assert!(matches!(missing, Err(ServiceError::InvalidInput(m)) if m == "Missing required fields"));
    }

    #[tokio::test]
    async fn test_unconfigured_is_unavailable() {
        let svc = CopyServiceImpl::new(None);
        let result = svc.translate(translate_request("Ciao", "it", "en")).await;
        assert!(matches!(result, Err(ServiceError::NotConfigured(_))));
    }
}
