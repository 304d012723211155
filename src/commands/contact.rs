use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use stellarview_site::contact::{
    ContactIntent, ContactTrigger, PropertyType, QuoteRequest, StdoutSink,
};

use crate::cli::{ContactAction, ContactArgs, TextArgs};

/// Execute the contact command
///
/// Runs the same flow as the site's call/text buttons against a running
/// server and prints the resulting link.
pub async fn execute(args: ContactArgs) -> Result<()> {
    let mut trigger = ContactTrigger::new(&args.url, Arc::new(StdoutSink))?;
    if let Some(ua) = &args.user_agent {
        trigger = trigger.with_user_agent(ua.clone(), args.touch_points);
    }

    let (intent, body) = match &args.action {
        ContactAction::Call => (ContactIntent::Call, None),
        ContactAction::Text(text) => (ContactIntent::Text, message_body(text)?),
    };

    match trigger.activate(intent, body.as_deref()).await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{}", e.user_message().red());
            Err(e.into())
        }
    }
}

/// Explicit body, else the composed quote request when asked for
fn message_body(args: &TextArgs) -> Result<Option<String>> {
    if let Some(body) = &args.body {
        return Ok(Some(body.clone()));
    }
    if !args.quote {
        return Ok(None);
    }

    let property_type = match &args.property_type {
        Some(raw) => Some(raw.parse::<PropertyType>().map_err(anyhow::Error::msg)?),
        None => Some(PropertyType::default()),
    };

    let request = QuoteRequest {
        name: args.name.clone(),
        address: args.address.clone(),
        property_type,
        windows: args.windows.clone(),
        timing: args.timing.clone(),
        notes: args.notes.clone(),
    };
    Ok(Some(request.sms_body()))
}
