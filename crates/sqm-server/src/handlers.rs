//! Per-invocation handlers.
//!
//! Every trigger runs through [`invoke`], the single error boundary: typed
//! errors are handled inside the handlers, and a panic is caught and logged
//! so the transport can always acknowledge.

use crate::commands::{help_text, no_ids_hint, Command};
use crate::context::BotContext;
use crate::update::{InboundMessage, Update};
use chrono::Utc;
use futures::FutureExt;
use sqm_core::chunk::chunk;
use sqm_core::notify::notify;
use sqm_core::report::{build_lookup_reply, build_report};
use sqm_core::{BotError, DeliveryReport, ParseMode};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, warn};

const REPORT_CONTEXT: &str = "hourly report";
const LOOKUP_CONTEXT: &str = "ticket lookup";

/// Run one invocation to completion, swallowing panics.
pub async fn invoke<F>(trigger: &str, work: F)
where
    F: Future<Output = ()>,
{
    if let Err(panic) = AssertUnwindSafe(work).catch_unwind().await {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(trigger, panic = %message, "invocation panicked");
    }
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// Handle a raw webhook body.
pub async fn handle_webhook(ctx: &BotContext, body: &[u8]) {
    let update = match Update::from_slice(body) {
        Ok(update) => update,
        Err(err) => {
            warn!(error = %err, bytes = body.len(), "ignoring unparseable update");
            return;
        }
    };
    let update_id = update.update_id;
    match update.into_inbound() {
        Some(message) => handle_message(ctx, message).await,
        None => debug!(?update_id, "update carries no text message"),
    }
}

/// Scheduler tick: send the report to the configured report chat.
pub async fn handle_scheduled_report(ctx: &BotContext) {
    match ctx.settings.report_chat_id() {
        Ok(destination) => send_report(ctx, destination).await,
        Err(err) => report_failure(ctx, None, REPORT_CONTEXT, &err).await,
    }
}

pub async fn handle_message(ctx: &BotContext, message: InboundMessage) {
    let InboundMessage { chat_id, text } = message;
    info!(chat_id = %chat_id, chars = text.chars().count(), "inbound message");

    match Command::parse(&text) {
        Command::Help => {
            let help = help_text(&ctx.settings.id_prefix, ctx.settings.threshold_umur);
            deliver(ctx, &chat_id, &help).await;
        }
        Command::Report => send_report(ctx, &chat_id).await,
        Command::Lookup(text) => match lookup_reply(ctx, &text).await {
            Ok(reply) => {
                deliver(ctx, &chat_id, &reply).await;
            }
            Err(err) => report_failure(ctx, Some(&chat_id), LOOKUP_CONTEXT, &err).await,
        },
    }
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

async fn send_report(ctx: &BotContext, destination: &str) {
    match report_text(ctx).await {
        Ok(text) => {
            let delivery = deliver(ctx, destination, &text).await;
            info!(destination, sent = delivery.sent, failed = delivery.failures.len(), "report dispatched");
        }
        Err(err) => report_failure(ctx, Some(destination), REPORT_CONTEXT, &err).await,
    }
}

async fn report_text(ctx: &BotContext) -> Result<String, BotError> {
    let pipeline = ctx.pipeline()?;
    let source = ctx.source()?;
    let dataset = source.fetch_table(&ctx.settings.sheet_name).await?;
    build_report(&dataset, &pipeline.report, Utc::now())
}

async fn lookup_reply(ctx: &BotContext, text: &str) -> Result<String, BotError> {
    let pipeline = ctx.pipeline()?;
    let ids = pipeline.ids.extract(text);
    if ids.is_empty() {
        return Ok(no_ids_hint(pipeline.ids.prefix()));
    }
    debug!(?ids, "looking up tickets");
    let dataset = ctx.source()?.fetch_table(&ctx.settings.sheet_name).await?;
    build_lookup_reply(&dataset, &ids, &pipeline.report)
}

/// Chunk and send `text`. Delivery failures are logged and forwarded to the
/// admin chat, never returned.
async fn deliver(ctx: &BotContext, destination: &str, text: &str) -> DeliveryReport {
    let sender = match ctx.sender() {
        Ok(sender) => sender,
        Err(err) => {
            error!(destination, error = %err, "cannot deliver: sender unavailable");
            return DeliveryReport::default();
        }
    };
    let chunk_size = ctx
        .pipeline()
        .map(|p| p.chunk_size)
        .unwrap_or(ctx.settings.chunk_size);
    let chunks = chunk(text, chunk_size);
    let delivery = notify(sender.as_ref(), destination, &chunks).await;

    if !delivery.is_complete() {
        let reasons: Vec<String> = delivery
            .failures
            .iter()
            .map(|(index, err)| format!("chunk {}: {}", index + 1, err.reason))
            .collect();
        alert_admin(
            ctx,
            destination,
            &format!(
                "{} of {} message(s) to {} failed: {}",
                delivery.failures.len(),
                chunks.len(),
                destination,
                reasons.join("; ")
            ),
        )
        .await;
    }
    delivery
}

// ---------------------------------------------------------------------------
// Error reporting
// ---------------------------------------------------------------------------

/// Apply the per-kind policy for an error that ended an invocation.
async fn report_failure(ctx: &BotContext, chat: Option<&str>, context: &str, err: &BotError) {
    match err {
        BotError::Configuration(_) => {
            error!(context, error = %err, "configuration error");
            alert_admin(ctx, chat.unwrap_or_default(), &format!("{context}: {err}")).await;
        }
        BotError::Schema { .. } => {
            warn!(context, error = %err, "schema error");
            notify_chat(ctx, chat, context, err).await;
        }
        BotError::Source(_) => {
            error!(context, error = %err, "data source error");
            notify_chat(ctx, chat, context, err).await;
            alert_admin(ctx, chat.unwrap_or_default(), &format!("{context}: {err}")).await;
        }
        BotError::NotFound { .. } => debug!(context, error = %err, "not found"),
    }
}

async fn notify_chat(ctx: &BotContext, chat: Option<&str>, context: &str, err: &BotError) {
    let (Some(chat), Some(notice)) = (chat, err.user_notice(context)) else {
        return;
    };
    let Ok(sender) = ctx.sender() else {
        return;
    };
    if let Err(delivery) = sender
        .send_text(chat, &notice, ParseMode::Plain)
        .await
    {
        warn!(chat, error = %delivery, "error notice not delivered");
    }
}

/// Best-effort message to the admin chat. Skipped when no admin chat is
/// configured, when it is the chat already being answered, or when there is
/// no sender.
async fn alert_admin(ctx: &BotContext, origin: &str, message: &str) {
    let Some(admin) = ctx.settings.admin_chat_id() else {
        return;
    };
    if admin == origin {
        return;
    }
    let Ok(sender) = ctx.sender() else {
        return;
    };
    let text = format!("⚠️ sqm-bot: {message}");
    if let Err(err) = sender.send_text(admin, &text, ParseMode::Plain).await {
        warn!(admin, error = %err, "admin alert not delivered");
    }
}
