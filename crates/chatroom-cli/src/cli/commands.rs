use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chatroom_core::constants::RESPONSE_DELAY_MAX;
use chatroom_core::models::{Chatroom, Identity, Message, Theme};
use chatroom_core::{CoreRuntime, StoreEvent};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::{self, error::RecvError};

use super::validation;

/// Extra slack on top of the longest thinking time before giving up on a reply
const REPLY_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

/// Command parsed from arguments
#[derive(Debug, Clone)]
pub enum CliCommand {
    /// Create a chatroom (default title when none given)
    Create { title: Option<String> },
    /// List chatrooms, optionally filtered by title
    List { search: Option<String> },
    /// One page of a chatroom's messages
    Messages {
        chatroom_id: String,
        page: usize,
        limit: usize,
    },
    /// Post a user message and wait for the assistant reply
    Send { chatroom_id: String, text: String },
    Delete { chatroom_id: String },
    /// Show or change the theme
    Theme { choice: Option<ThemeChoice> },
    Login {
        phone_number: String,
        country_code: String,
        otp: Option<String>,
    },
    Logout,
    WhoAmI,
}

pub fn render(value: &Value, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

pub async fn execute(runtime: &mut CoreRuntime, command: CliCommand) -> Result<Value> {
    match command {
        CliCommand::Create { title } => {
            if let Some(ref title) = title {
                validation::validate_title(title)?;
            }
            let id = runtime.chat().create_chatroom(title.as_deref());
            let room = runtime
                .chat()
                .chatroom(&id)
                .context("chatroom vanished right after creation")?;
            Ok(chatroom_json(&room))
        }

        CliCommand::List { search } => {
            let rooms = runtime.chat().search_chatrooms(search.as_deref().unwrap_or(""));
            Ok(chatrooms_json(&rooms))
        }

        CliCommand::Messages {
            chatroom_id,
            page,
            limit,
        } => Ok(json!(runtime.chat().get_messages(&chatroom_id, page, limit))),

        CliCommand::Send { chatroom_id, text } => {
            validation::validate_message(&text)?;

            // Subscribe first so the reply cannot slip past us
            let mut events = runtime.chat().subscribe();
            let message = runtime.send_user_message(&chatroom_id, &text)?;
            let reply = wait_for_reply(&mut events, &chatroom_id).await?;
            Ok(json!({ "message": message, "reply": reply }))
        }

        CliCommand::Delete { chatroom_id } => {
            let existed = runtime.chat().chatroom(&chatroom_id).is_some();
            runtime.chat().delete_chatroom(&chatroom_id);
            Ok(json!({ "deleted": existed }))
        }

        CliCommand::Theme { choice } => {
            let theme = match choice {
                None => runtime.theme().theme(),
                Some(ThemeChoice::Toggle) => runtime.theme_mut().toggle_theme(),
                Some(ThemeChoice::Light) => {
                    runtime.theme_mut().set_theme(Theme::Light);
                    Theme::Light
                }
                Some(ThemeChoice::Dark) => {
                    runtime.theme_mut().set_theme(Theme::Dark);
                    Theme::Dark
                }
            };
            Ok(json!({ "theme": theme }))
        }

        CliCommand::Login {
            phone_number,
            country_code,
            otp,
        } => {
            validation::validate_phone(&country_code, &phone_number)?;
            // Verification is stubbed: any well-formed code is accepted
            if let Some(ref otp) = otp {
                validation::validate_otp(otp)?;
            }
            let identity = runtime.auth_mut().login(&phone_number, &country_code)?;
            Ok(json!(identity))
        }

        CliCommand::Logout => {
            runtime.auth_mut().logout();
            Ok(json!({ "authenticated": false }))
        }

        CliCommand::WhoAmI => {
            let identity = runtime.auth().identity();
            Ok(json!({
                "authenticated": runtime.auth().is_authenticated(),
                "identity": identity,
                "displayNumber": identity.map(Identity::display_number),
            }))
        }
    }
}

/// Chatroom as stored, plus when it last saw activity
fn chatroom_json(room: &Chatroom) -> Value {
    let mut value = json!(room);
    value["lastActivity"] = json!(room.last_activity());
    value
}

fn chatrooms_json(rooms: &[Chatroom]) -> Value {
    Value::Array(rooms.iter().map(chatroom_json).collect())
}

async fn wait_for_reply(
    events: &mut broadcast::Receiver<StoreEvent>,
    chatroom_id: &str,
) -> Result<Message> {
    let wait = async {
        loop {
            match events.recv().await {
                Ok(StoreEvent::MessageAppended {
                    chatroom_id: id,
                    message,
                }) if id == chatroom_id && !message.is_from_user() => {
                    return Ok(message);
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream lagged while waiting for reply");
                }
                Err(RecvError::Closed) => bail!("store closed before the reply arrived"),
            }
        }
    };

    tokio::time::timeout(RESPONSE_DELAY_MAX + REPLY_GRACE, wait)
        .await
        .context("Timed out waiting for the assistant reply")?
}

/// Interactive search: each input line replaces the query, and results are
/// printed once typing settles. A final result is printed at end of input.
pub async fn run_browse<R, W>(runtime: &CoreRuntime, reader: R, mut out: W, pretty: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (input, mut query) = runtime.search_input()?;
    let mut lines = reader.lines();

    print_matches(runtime, "", &mut out, pretty)?;

    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("Failed to read input")? {
                Some(line) => input.set(line),
                None => break,
            },
            changed = query.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = query.borrow_and_update().clone();
                print_matches(runtime, &current, &mut out, pretty)?;
            }
        }
    }

    // Closing the input flushes whatever was still settling
    drop(input);
    if query.changed().await.is_ok() {
        let current = query.borrow_and_update().clone();
        print_matches(runtime, &current, &mut out, pretty)?;
    }
    Ok(())
}

fn print_matches<W: Write>(runtime: &CoreRuntime, query: &str, out: &mut W, pretty: bool) -> Result<()> {
    let value = json!({
        "query": query,
        "chatrooms": chatrooms_json(&runtime.chat().search_chatrooms(query)),
    });
    writeln!(out, "{}", render(&value, pretty)?)?;
    out.flush()?;
    Ok(())
}
