//! Remote inference against a Hugging Face compatible endpoint.
//!
//! Calls block and carry a per-request timeout; run them off the async
//! executor (`spawn_blocking`) when serving HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::model::{GenreClassifier, LabelScore, LoadedModels, ModelLoader, SentimentModel};
use crate::result::AiError;

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "facebook/bart-large-mnli";

#[derive(Debug, Clone)]
pub struct HfSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub sentiment_model: String,
    pub classifier_model: String,
}

impl Default for HfSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(10),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            classifier_model: DEFAULT_CLASSIFIER_MODEL.to_string(),
        }
    }
}

/// Blocking client for the sentiment and zero-shot pipelines.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HfInferenceClient {
    http: Client,
    settings: HfSettings,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SentimentResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

impl HfInferenceClient {
    pub fn new(settings: HfSettings) -> Result<Self, AiError> {
        reqwest::Url::parse(&settings.base_url)
            .map_err(|e| AiError::unavailable(format!("invalid inference base url {:?}: {e}", settings.base_url)))?;

        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AiError::unavailable(format!("failed to build inference client: {e}")))?;

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &HfSettings {
        &self.settings
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.settings.base_url.trim_end_matches('/'), model)
    }

    fn post<T: serde::de::DeserializeOwned>(&self, model: &str, body: serde_json::Value) -> Result<T, AiError> {
        let mut req = self.http.post(self.model_url(model)).json(&body);
        if let Some(token) = &self.settings.token {
            req = req.bearer_auth(token);
        }

        let res = req
            .send()
            .map_err(|e| AiError::inference(format!("{model}: request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AiError::inference(format!("{model}: {e}")))?;

        res.json::<T>()
            .map_err(|e| AiError::inference(format!("{model}: unexpected response: {e}")))
    }
}

impl SentimentModel for HfInferenceClient {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, AiError> {
        let model = &self.settings.sentiment_model;
        let body = json!({ "inputs": text, "options": { "wait_for_model": true } });

        match self.post::<SentimentResponse>(model, body)? {
            SentimentResponse::Flat(scores) => Ok(scores),
            SentimentResponse::Batched(mut batches) => {
                if batches.is_empty() {
                    return Err(AiError::inference(format!("{model}: empty response")));
                }
                Ok(batches.swap_remove(0))
            }
        }
    }
}

impl GenreClassifier for HfInferenceClient {
    fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<Vec<LabelScore>, AiError> {
        let model = &self.settings.classifier_model;
        let body = json!({
            "inputs": text,
            "parameters": { "candidate_labels": candidate_labels },
            "options": { "wait_for_model": true },
        });

        let res: ZeroShotResponse = self.post(model, body)?;
        if res.labels.len() != res.scores.len() {
            return Err(AiError::inference(format!(
                "{model}: {} labels but {} scores",
                res.labels.len(),
                res.scores.len()
            )));
        }

        Ok(res
            .labels
            .into_iter()
            .zip(res.scores)
            .map(|(label, score)| LabelScore { label, score })
            .collect())
    }
}

/// Builds an `HfInferenceClient` and serves it as both models.
#[derive(Debug, Clone, Default)]
pub struct HfModelLoader {
    settings: HfSettings,
}

impl HfModelLoader {
    pub fn new(settings: HfSettings) -> Self {
        Self { settings }
    }
}

impl ModelLoader for HfModelLoader {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn load(&self) -> Result<LoadedModels, AiError> {
        let client = HfInferenceClient::new(self.settings.clone())?;
        Ok(LoadedModels::new(client.clone(), client))
    }
}
