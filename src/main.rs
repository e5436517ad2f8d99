use std::borrow::Cow;
use std::sync::Arc;

use historyquizbot::{
    commands::Command,
    config::Config,
    database::{builtin::BuiltinBank, connection::Connection, QuestionBank},
    engine::QuizEngine,
    schema::schema,
    state::QuizState,
    BoxedError,
};
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use teloxide::utils::command::BotCommands;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), BoxedError> {
    let config = Config::from_env()?;

    tracing_log::LogTracer::init()?;
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.log_level).into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_line_number(true)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let bank = match &config.database_url {
        Some(database_url) => {
            let connection = Connection::connect(Cow::Borrowed(database_url.as_str())).await?;
            connection.run_migrations().await?;
            let seeded = connection.seed_if_empty(&BuiltinBank.questions()).await?;
            if seeded > 0 {
                tracing::info!("Seeded database with {} built-in questions", seeded);
            }
            QuestionBank::load(&connection).await?
        }
        None => QuestionBank::load(&BuiltinBank).await?,
    };
    if bank.is_empty() {
        tracing::warn!("Question bank is empty, every quiz will fail to start");
    }

    let engine = QuizEngine::new(config.session);
    tracing::info!("Starting bot with {:?}", engine.settings());

    let bot = Bot::new(config.teloxide_token.clone());
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![
            InMemStorage::<QuizState>::new(),
            Arc::new(bank),
            Arc::new(engine)
        ])
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            tracing::info!("Receiving updates via webhook at {}", webhook.url);
            let listener = webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        }
        None => {
            tracing::info!("Receiving updates via long polling");
            dispatcher.dispatch().await
        }
    }

    Ok(())
}
