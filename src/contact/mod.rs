//! Contact actions: turning a revealed phone number into `tel:`/`sms:` links

mod client;
mod quote;
mod uri;

pub use client::{
    ContactError, ContactIntent, ContactTrigger, NavigationSink, RecordingSink, StdoutSink,
};
pub use quote::{PropertyType, QuoteRequest};
pub use uri::{encode_uri_component, sms_uri, tel_uri, Platform};
