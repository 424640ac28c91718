// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Total rendering of values through a fixed chain of fallbacks.

use crate::value::Value;

/// The stringifier slot that produced a [`Rendering`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderSource {
    /// The value's own display rendering.
    Display,
    /// A boolean rendered as `true` or `false`.
    BoolLiteral,
    /// The value's fallback description.
    Described,
    /// The identity placeholder of last resort.
    Identity,
}

/// A rendered value plus the slot that produced it.
///
/// The slot matters to the comparator: a pass decided by two [`Identity`]
/// renderings is an alias candidate.
///
/// [`Identity`]: RenderSource::Identity
#[derive(Clone, Debug)]
pub struct Rendering {
    pub text: String,
    pub source: RenderSource,
}

impl Rendering {
    pub(crate) fn is_identity(&self) -> bool {
        self.source == RenderSource::Identity
    }
}

/// Renders a value through the stringifier chain.
///
/// Slots are consulted in order: display, bool literal, description,
/// identity placeholder. The chain is total; the placeholder applies to any
/// value, rendering as `<label @ 0xADDR>` with the value's address.
pub fn rendering<T: Value>(value: &T) -> Rendering {
    if let Some(text) = value.display() {
        return Rendering {
            text,
            source: RenderSource::Display,
        };
    }
    if let Some(flag) = value.as_bool() {
        return Rendering {
            text: if flag { "true" } else { "false" }.to_owned(),
            source: RenderSource::BoolLiteral,
        };
    }
    if let Some(text) = value.describe() {
        return Rendering {
            text,
            source: RenderSource::Described,
        };
    }
    Rendering {
        text: format!("<{} @ {:p}>", T::label(), value as *const T),
        source: RenderSource::Identity,
    }
}

/// Renders a value to a plain string.
pub fn show<T: Value>(value: &T) -> String {
    rendering(value).text
}
