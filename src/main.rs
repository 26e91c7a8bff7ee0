#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use mediarelay::channels::{self, CliMessage, InboundMessage};
use mediarelay::media::{BinaryFetcher, MediaFetcher};
use mediarelay::tts::{MIN_VOICE_CHARS, SpeechSynthesizer, should_generate_voice};
use mediarelay::{Config, MediaExtractor};

const SAY_COMMAND: &str = "/say ";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // Initialize logging
    let level: Level = config.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    if let Some(path) = &config.config_path {
        tracing::info!(path = %path.display(), "config loaded");
    }

    let extractor = Arc::new(MediaExtractor::from_config(&config)?);
    let speech = if config.speech.enabled {
        let fetcher: Arc<dyn MediaFetcher> = Arc::new(BinaryFetcher::new(&config.fetch)?);
        Some(Arc::new(SpeechSynthesizer::new(&config.speech, fetcher)?))
    } else {
        None
    };

    let (tx, rx) = tokio::sync::mpsc::channel::<CliMessage>(32);
    let listener = tokio::spawn(channels::cli::listen(tx));

    channels::cli::dispatch(rx, move |message| {
        let extractor = Arc::clone(&extractor);
        let speech = speech.clone();
        async move {
            if let Some(text) = message.content.strip_prefix(SAY_COMMAND) {
                speak(speech.as_deref(), &message, text).await;
                return;
            }
            let result = extractor.handle(&message).await;
            match serde_json::to_string(&result) {
                Ok(json) => println!("#{} {json}", message.id),
                Err(e) => tracing::warn!(error = %e, "failed to render result"),
            }
        }
    })
    .await;

    listener.await.context("stdin listener panicked")??;
    Ok(())
}

async fn speak(speech: Option<&SpeechSynthesizer>, message: &CliMessage, text: &str) {
    let Some(speech) = speech else {
        println!("#{} speech synthesis is disabled", message.id);
        return;
    };
    if !should_generate_voice(text) {
        println!(
            "#{} text is shorter than {MIN_VOICE_CHARS} characters, not voicing it",
            message.id
        );
        return;
    }
    match speech.text_to_speech(text).await {
        Ok(audio) => {
            if let Err(e) = message.reply(&audio).await {
                tracing::warn!(error = %e, "failed to deliver audio");
            }
        }
        Err(e) => println!("#{} {e}", message.id),
    }
}
