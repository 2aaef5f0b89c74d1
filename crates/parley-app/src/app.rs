//! Command dispatch for the interactive loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parley_ai::{Attachment, Session, SubmitOutcome, WhisperClient, WhisperConfig};
use parley_common::{ParleyError, Result};
use parley_config::ParleyConfig;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::commands::{Command, HELP};

/// Environment variable consulted for the Whisper key.
const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

pub struct App {
    session: Arc<Session>,
    config: ParleyConfig,
    config_path: PathBuf,
    /// Spawned submissions not yet joined.
    tasks: JoinSet<()>,
}

/// Whether the loop should keep reading input.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl App {
    pub fn new(session: Arc<Session>, config: ParleyConfig, config_path: PathBuf) -> Self {
        Self {
            session,
            config,
            config_path,
            tasks: JoinSet::new(),
        }
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match Command::parse(line) {
            Command::Chat(text) => {
                let session = self.session.clone();
                self.spawn(async move { session.submit(&text).await });
            }
            Command::Search(query) => {
                let session = self.session.clone();
                self.spawn(async move { session.search(&query).await });
            }
            Command::Attach(paths) => self.attach(&paths),
            Command::Voice(path) => {
                if let Err(e) = self.voice(&path).await {
                    error!("voice input failed: {e}");
                    eprintln!("voice input failed: {e}");
                }
            }
            Command::Key(key) => {
                let prompt = self.session.settings().system_prompt;
                self.save(&key, &prompt);
            }
            Command::Prompt(prompt) => {
                let key = self.session.settings().api_key;
                self.save(&key, &prompt);
            }
            Command::Settings => println!("{}\n", self.describe_settings()),
            Command::Usage => println!("{}\n", self.describe_usage()),
            Command::Reset => {
                if self.session.reset() {
                    println!("Conversation cleared.\n");
                } else {
                    println!("Still waiting for a reply; try again in a moment.\n");
                }
            }
            Command::Help => println!("{HELP}\n"),
            Command::Quit => return Flow::Quit,
            Command::Invalid(msg) => eprintln!("{msg}"),
        }
        Flow::Continue
    }

    /// Wait for every spawned submission to finish.
    pub async fn finish(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                warn!("submission task ended abnormally: {e}");
            }
        }
    }

    /// Run a submission in the background so input stays responsive.
    ///
    /// Lines entered meanwhile reach the session and are dropped there
    /// while it is busy.
    fn spawn<F>(&mut self, submission: F)
    where
        F: std::future::Future<Output = SubmitOutcome> + Send + 'static,
    {
        if self.session.is_busy() {
            eprintln!("(still waiting for the previous reply; message dropped)");
        }
        // Reap tasks that already finished so the set stays small.
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result {
                warn!("submission task ended abnormally: {e}");
            }
        }
        self.tasks.spawn(async move {
            let outcome = submission.await;
            tracing::debug!(?outcome, "submission finished");
        });
    }

    fn attach(&mut self, paths: &[PathBuf]) {
        let mut attachments = Vec::with_capacity(paths.len());
        for path in paths {
            match Attachment::from_path(path) {
                Ok(attachment) => attachments.push(attachment),
                Err(e) => eprintln!("cannot attach {}: {e}", path.display()),
            }
        }
        if attachments.is_empty() {
            return;
        }
        let session = self.session.clone();
        self.spawn(async move {
            session
                .submit_attachments(&attachments)
                .await
                .pop()
                .unwrap_or(SubmitOutcome::Ignored)
        });
    }

    async fn voice(&mut self, path: &Path) -> Result<()> {
        let api_key = if self.config.voice.api_key.trim().is_empty() {
            std::env::var(OPENAI_KEY_ENV).unwrap_or_default()
        } else {
            self.config.voice.api_key.clone()
        };
        if api_key.trim().is_empty() {
            return Err(ParleyError::Other(format!(
                "voice input needs voice.api_key in the config or {OPENAI_KEY_ENV}"
            )));
        }

        let mut whisper_config = WhisperConfig::new(api_key).with_model(&self.config.voice.model);
        if let Some(lang) = &self.config.voice.language {
            whisper_config = whisper_config.with_language(lang);
        }
        let whisper = WhisperClient::new(whisper_config).map_err(ai_error)?;

        let audio = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let transcript = whisper.transcribe(audio, &filename).await.map_err(ai_error)?;
        info!(chars = transcript.len(), "voice input transcribed");

        let session = self.session.clone();
        self.spawn(async move { session.submit(&transcript).await });
        Ok(())
    }

    /// Apply settings to the session and persist them.
    fn save(&mut self, api_key: &str, system_prompt: &str) {
        let saved = self.session.save_settings(api_key, system_prompt);
        self.config.openrouter_api_key = saved.api_key;
        self.config.system_prompt = saved.system_prompt;

        if let Err(e) = parley_config::save_config_to_path(&self.config, &self.config_path) {
            error!("failed to save settings: {e}");
            eprintln!("failed to save settings to {}: {e}", self.config_path.display());
        }
    }

    fn describe_settings(&self) -> String {
        let settings = self.session.settings();
        let key = if settings.has_api_key() {
            mask_key(&settings.api_key)
        } else {
            "(not set)".to_string()
        };
        format!(
            "config:        {}\nmodel:         {}\napi key:       {key}\nsystem prompt: {}",
            self.config_path.display(),
            self.config.provider.model,
            settings.system_prompt,
        )
    }

    fn describe_usage(&self) -> String {
        let usage = self.session.usage();
        let mut out = format!(
            "{} calls, {} input + {} output tokens",
            usage.call_count(),
            usage.total().input_tokens,
            usage.total().output_tokens,
        );
        for (model, model_usage) in usage.models() {
            out.push_str(&format!(
                "\n  {model}: {} tokens",
                model_usage.total_tokens()
            ));
        }
        out
    }
}

fn ai_error(e: parley_ai::AiError) -> ParleyError {
    ParleyError::Ai(e.to_string())
}

/// Show only the first and last four characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
