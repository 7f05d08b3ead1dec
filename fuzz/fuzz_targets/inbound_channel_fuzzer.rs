//! Fuzz target for the [`FormController`] messaging path
//!
//! Prevent results leaking to the wrong window via hostile inbound messages
//!
//! # Strategy
//!
//! - Raw payloads: Arbitrary bytes as message data, plus near-valid JSON
//! - Raw origins: Arbitrary origin strings next to well-formed ones
//! - Interleaving: Messages mixed with typing, submits and fetch results
//!
//! # Invariants
//!
//! - `handle` NEVER returns an error and NEVER panics
//! - Every post targets the currently bound endpoint, scoped to its origin
//! - A rejected origin unbinds the page until the next accepted sender
//! - No post before the first accepted message
//! - A `result` envelope only follows a submit with both fields filled

#![no_main]

use arbitrary::Arbitrary;
use genpass_core::{
    Envelope, Environment, Field, FormController, GenPass, InboundEvent, MessageSource,
    PageAction, PageEvent, PersistedConfig, Status,
};
use genpass_proto::Origin;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, PartialEq, Eq)]
struct FuzzSource(u8);

impl MessageSource for FuzzSource {
    fn post_message(&self, _data: &str, _target_origin: &Origin) {}
}

struct FixedHeight;

impl Environment for FixedHeight {
    fn content_height(&self) -> u32 {
        480
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzEvent {
    Message { source: u8, origin: FuzzedOrigin, data: FuzzedPayload },
    Type { field: u8, value: String },
    KeyDown { code: u32 },
    Submit,
    Reveal,
    UpdateFetched { body: String },
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzedOrigin {
    Https { host: u8 },
    Raw(String),
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzedPayload {
    Version(f64),
    VersionString(String),
    Object { key: String, value: i64 },
    RandomBytes(Vec<u8>),
}

fn origin_string(origin: &FuzzedOrigin) -> String {
    match origin {
        FuzzedOrigin::Https { host } => format!("https://host{}.example", host % 8),
        FuzzedOrigin::Raw(raw) => raw.clone(),
    }
}

fn payload_string(payload: &FuzzedPayload) -> String {
    match payload {
        FuzzedPayload::Version(v) => format!("{{\"version\":{v}}}"),
        FuzzedPayload::VersionString(v) => format!("{{\"version\":{v:?}}}"),
        FuzzedPayload::Object { key, value } => format!("{{{key:?}:{value}}}"),
        FuzzedPayload::RandomBytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fuzz_target!(|events: Vec<FuzzEvent>| {
    let mut form: FormController<FixedHeight, GenPass, FuzzSource> =
        FormController::new(FixedHeight, GenPass::default(), PersistedConfig::default());
    let mut bound: Option<(u8, String)> = None;

    for event in events {
        let previous = bound.clone();
        let (page_event, was_submit) = match &event {
            FuzzEvent::Message { source, origin, data } => {
                let origin = origin_string(origin);
                bound = Origin::parse(&origin)
                    .ok()
                    .map(|parsed| (*source, parsed.as_str().to_string()));
                let event = InboundEvent {
                    source: FuzzSource(*source),
                    origin,
                    data: payload_string(data),
                };
                (PageEvent::MessageReceived(event), false)
            },
            FuzzEvent::Type { field, value } => {
                let field = match field % 3 {
                    0 => Field::MasterPassword,
                    1 => Field::Domain,
                    _ => Field::Length,
                };
                (PageEvent::Input { field, value: value.clone() }, false)
            },
            FuzzEvent::KeyDown { code } => (PageEvent::KeyDown { code: *code }, *code == 13),
            FuzzEvent::Submit => (PageEvent::Submit, true),
            FuzzEvent::Reveal => (PageEvent::Reveal, false),
            FuzzEvent::UpdateFetched { body } => {
                (PageEvent::UpdateFetched { body: body.clone() }, false)
            },
        };

        let actions = form.handle(page_event).unwrap_or_else(|e| {
            panic!("controller failed on {event:?}: {e}");
        });

        let endpoint = form.channel().endpoint().map(|e| (e.source().0, e.origin().to_string()));
        assert_eq!(endpoint, bound, "binding diverged after {event:?} (was {previous:?})");

        for action in &actions {
            let PageAction::Post(post) = action else {
                continue;
            };
            let Some((source, origin)) = &bound else {
                panic!("post while unbound: {post:?}");
            };
            assert_eq!(post.endpoint.source().0, *source);
            assert_eq!(post.endpoint.origin().as_str(), origin);

            if let Envelope::Result(_) = post.envelope {
                assert!(was_submit, "result envelope outside a submit: {event:?}");
                assert!(form.state().is_ready());
                assert_eq!(form.state().status(), Status::Revealed { masked: true });
            }
        }
    }
});
