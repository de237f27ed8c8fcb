//! # Decoder Module
//!
//! Turns one raw record into zero or one event.
//!
//! ## Contract
//! - `Ok(Some(event))` - the record produced an event
//! - `Ok(None)` - nothing to dispatch (e.g., a blank line)
//! - `Err(DecodeError)` - malformed record or unknown code
//!
//! Decoders take `&self` and never see the dispatcher, so decoding is a
//! pure function of the record.

use crate::error::DecodeError;
use crate::events::{Event, EventCode, VariantRegistry};

/// Trait for record decoders
pub trait Decoder {
    type Record: ?Sized;
    type Event: Event;

    /// Decode a single record
    fn decode(&self, record: &Self::Record) -> Result<Option<Self::Event>, DecodeError>;
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    type Record = D::Record;
    type Event = D::Event;

    fn decode(&self, record: &Self::Record) -> Result<Option<Self::Event>, DecodeError> {
        (**self).decode(record)
    }
}

/// Adapts a closure into a [`Decoder`]
pub struct FnDecoder<R: ?Sized, E, F> {
    decode: F,
    _marker: std::marker::PhantomData<fn(&R) -> E>,
}

impl<R, E, F> FnDecoder<R, E, F>
where
    R: ?Sized,
    E: Event,
    F: Fn(&R) -> Result<Option<E>, DecodeError>,
{
    pub fn new(decode: F) -> Self {
        Self {
            decode,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<R, E, F> Decoder for FnDecoder<R, E, F>
where
    R: ?Sized,
    E: Event,
    F: Fn(&R) -> Result<Option<E>, DecodeError>,
{
    type Record = R;
    type Event = E;

    fn decode(&self, record: &R) -> Result<Option<E>, DecodeError> {
        (self.decode)(record)
    }
}

/// Decodes by extracting a code from the record, then resolving the
/// variant through a [`VariantRegistry`]
///
/// The extractor returns `Ok(None)` for records that carry no event
/// at all, and an error for records that should but don't.
pub struct RegistryDecoder<R: ?Sized, E, C> {
    extract_code: C,
    registry: VariantRegistry<R, E>,
}

impl<R, E, C> RegistryDecoder<R, E, C>
where
    R: ?Sized,
    E: Event,
    C: Fn(&R) -> Result<Option<EventCode>, DecodeError>,
{
    pub fn new(extract_code: C, registry: VariantRegistry<R, E>) -> Self {
        Self {
            extract_code,
            registry,
        }
    }

    /// The variant table this decoder resolves against
    pub fn registry(&self) -> &VariantRegistry<R, E> {
        &self.registry
    }
}

impl<R, E, C> Decoder for RegistryDecoder<R, E, C>
where
    R: ?Sized,
    E: Event,
    C: Fn(&R) -> Result<Option<EventCode>, DecodeError>,
{
    type Record = R;
    type Event = E;

    fn decode(&self, record: &R) -> Result<Option<E>, DecodeError> {
        match (self.extract_code)(record)? {
            Some(code) => self.registry.construct(&code, record).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Tick(u32);

    impl Event for Tick {
        fn code(&self) -> EventCode {
            EventCode::from_static("tick")
        }
    }

    fn tick(record: &str) -> Result<Tick, DecodeError> {
        let value = record
            .split_once(':')
            .map(|(_, v)| v)
            .ok_or_else(|| DecodeError::missing("value"))?;
        value
            .parse()
            .map(Tick)
            .map_err(|e| DecodeError::invalid("value", value, e))
    }

    fn code_of(record: &str) -> Result<Option<EventCode>, DecodeError> {
        if record.trim().is_empty() {
            return Ok(None);
        }
        let code = record.split(':').next().unwrap_or_default();
        Ok(Some(EventCode::new(code)))
    }

    fn tick_decoder() -> RegistryDecoder<str, Tick, impl Fn(&str) -> Result<Option<EventCode>, DecodeError>> {
        let registry: VariantRegistry<str, Tick> =
            VariantRegistry::new().with_variant(EventCode::from("tick"), tick);
        RegistryDecoder::new(code_of, registry)
    }

    #[test]
    fn fn_decoder_calls_closure() {
        let decoder = FnDecoder::<str, Tick, _>::new(|record: &str| tick(record).map(Some));
        assert_eq!(decoder.decode("tick:5").unwrap(), Some(Tick(5)));
    }

    #[test]
    fn registry_decoder_skips_blank_records() {
        let decoder = tick_decoder();
        assert_eq!(decoder.decode("   ").unwrap(), None);
    }

    #[test]
    fn registry_decoder_resolves_variant() {
        let decoder = tick_decoder();
        assert_eq!(decoder.decode("tick:9").unwrap(), Some(Tick(9)));
        assert!(decoder.registry().contains(&EventCode::from("tick")));
    }

    #[test]
    fn registry_decoder_rejects_unknown_code() {
        let decoder = tick_decoder();
        let error = decoder.decode("tock:9").unwrap_err();
        assert!(error.is_unknown_code());
    }

    #[test]
    fn decoding_is_repeatable() {
        let decoder = tick_decoder();
        let first = decoder.decode("tick:12").unwrap();
        let second = decoder.decode("tick:12").unwrap();
        assert_eq!(first, second);
    }
}
