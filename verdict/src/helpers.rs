// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::TestAbort;
use std::{any::Any, fmt, time::Duration};

/// Extracts a human-readable message from a panic payload.
///
/// Payloads are almost always `&str` or `String`; escalation aborts carry a
/// [`TestAbort`].
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(abort) = payload.downcast_ref::<TestAbort>() {
        abort.to_string()
    } else if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "(opaque panic payload)".to_owned()
    }
}

/// Displays a duration as fractional seconds, e.g. `0.512s`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DisplaySecs(pub(crate) Duration);

impl fmt::Display for DisplaySecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0.as_secs_f64())
    }
}

/// Shortens long rendered values for use inside call signatures.
pub(crate) fn ellipsize(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Joins a caller message with extra context, dropping the separator when
/// the message is empty.
pub(crate) fn join_message(message: String, extra: &str) -> String {
    if message.is_empty() {
        extra.to_owned()
    } else {
        format!("{message}; {extra}")
    }
}

/// Appends panic text to an element's message.
pub(crate) fn panicked_message(message: String, text: &str) -> String {
    join_message(message, &format!("panicked: {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_recovers_common_payloads() {
        let str_payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(str_payload.as_ref()), "boom");

        let string_payload: Box<dyn Any + Send> = Box::new("dynamic".to_owned());
        assert_eq!(panic_message(string_payload.as_ref()), "dynamic");

        let other_payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(other_payload.as_ref()), "(opaque panic payload)");
    }

    #[test]
    fn display_secs_keeps_three_decimals() {
        assert_eq!(DisplaySecs(Duration::from_millis(512)).to_string(), "0.512s");
        assert_eq!(DisplaySecs(Duration::ZERO).to_string(), "0.000s");
        assert_eq!(DisplaySecs(Duration::from_secs(2)).to_string(), "2.000s");
    }

    #[test]
    fn ellipsize_cuts_on_char_boundaries() {
        assert_eq!(ellipsize("short", 50), "short");
        assert_eq!(ellipsize("abcdef", 6), "abcdef");
        assert_eq!(ellipsize("abcdefg", 6), "abcdef...");
        // é is two bytes; the cut must not split it.
        assert_eq!(ellipsize("ééééé", 3), "ééé...");
    }
}
