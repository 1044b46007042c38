use crate::{Key, KeyValue, SpanId, TraceFlags, TraceId};
use std::{borrow::Cow, collections::HashMap, time::SystemTime};

/// Value types for representing arbitrary values in a log record.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    /// An integer value
    Int(i64),
    /// A double value
    Double(f64),
    /// A string value
    String(Cow<'static, str>),
    /// A boolean value
    Boolean(bool),
    /// A byte array
    Bytes(Vec<u8>),
    /// An array of `Any` values
    ListAny(Vec<AnyValue>),
    /// A map of string keys to `Any` values, arbitrarily nested.
    Map(HashMap<Key, AnyValue>),
}

macro_rules! impl_trivial_from {
    ($t:ty, $variant:path) => {
        impl From<$t> for AnyValue {
            fn from(val: $t) -> AnyValue {
                $variant(val.into())
            }
        }
    };
}

impl_trivial_from!(i8, AnyValue::Int);
impl_trivial_from!(i16, AnyValue::Int);
impl_trivial_from!(i32, AnyValue::Int);
impl_trivial_from!(i64, AnyValue::Int);

impl_trivial_from!(u8, AnyValue::Int);
impl_trivial_from!(u16, AnyValue::Int);
impl_trivial_from!(u32, AnyValue::Int);

impl_trivial_from!(f64, AnyValue::Double);
impl_trivial_from!(f32, AnyValue::Double);

impl_trivial_from!(String, AnyValue::String);
impl_trivial_from!(Cow<'static, str>, AnyValue::String);
impl_trivial_from!(&'static str, AnyValue::String);

impl_trivial_from!(bool, AnyValue::Boolean);

impl From<usize> for AnyValue {
    /// Values that do not fit in an `i64` are kept as their decimal string.
    fn from(val: usize) -> AnyValue {
        i64::try_from(val)
            .map(AnyValue::Int)
            .unwrap_or_else(|_| AnyValue::String(val.to_string().into()))
    }
}

impl<T: Into<AnyValue>> FromIterator<T> for AnyValue {
    /// Creates an [`AnyValue::ListAny`] value from a sequence of `Into<AnyValue>` values.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        AnyValue::ListAny(iter.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Key>, V: Into<AnyValue>> FromIterator<(K, V)> for AnyValue {
    /// Creates an [`AnyValue::Map`] value from a sequence of key-value pairs
    /// that can be converted into a `Key` and `AnyValue` respectively.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        AnyValue::Map(HashMap::from_iter(
            iter.into_iter().map(|(k, v)| (k.into(), v.into())),
        ))
    }
}

/// A normalized severity value.
///
/// The numeric value of each variant is the severity number of the
/// OpenTelemetry logs data model, and is what exporters render.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub enum Severity {
    /// TRACE
    Trace = 1,
    /// TRACE2
    Trace2 = 2,
    /// TRACE3
    Trace3 = 3,
    /// TRACE4
    Trace4 = 4,
    /// DEBUG
    Debug = 5,
    /// DEBUG2
    Debug2 = 6,
    /// DEBUG3
    Debug3 = 7,
    /// DEBUG4
    Debug4 = 8,
    /// INFO
    Info = 9,
    /// INFO2
    Info2 = 10,
    /// INFO3
    Info3 = 11,
    /// INFO4
    Info4 = 12,
    /// WARN
    Warn = 13,
    /// WARN2
    Warn2 = 14,
    /// WARN3
    Warn3 = 15,
    /// WARN4
    Warn4 = 16,
    /// ERROR
    Error = 17,
    /// ERROR2
    Error2 = 18,
    /// ERROR3
    Error3 = 19,
    /// ERROR4
    Error4 = 20,
    /// FATAL
    Fatal = 21,
    /// FATAL2
    Fatal2 = 22,
    /// FATAL3
    Fatal3 = 23,
    /// FATAL4
    Fatal4 = 24,
}

impl Default for Severity {
    /// Records logged without an explicit severity are `INFO`.
    fn default() -> Self {
        Severity::Info
    }
}

impl Severity {
    /// Return the string representing the short name for the `Severity`
    /// value as specified by the OpenTelemetry logs data model.
    pub const fn name(&self) -> &'static str {
        match &self {
            Severity::Trace => "TRACE",
            Severity::Trace2 => "TRACE2",
            Severity::Trace3 => "TRACE3",
            Severity::Trace4 => "TRACE4",

            Severity::Debug => "DEBUG",
            Severity::Debug2 => "DEBUG2",
            Severity::Debug3 => "DEBUG3",
            Severity::Debug4 => "DEBUG4",

            Severity::Info => "INFO",
            Severity::Info2 => "INFO2",
            Severity::Info3 => "INFO3",
            Severity::Info4 => "INFO4",

            Severity::Warn => "WARN",
            Severity::Warn2 => "WARN2",
            Severity::Warn3 => "WARN3",
            Severity::Warn4 => "WARN4",

            Severity::Error => "ERROR",
            Severity::Error2 => "ERROR2",
            Severity::Error3 => "ERROR3",
            Severity::Error4 => "ERROR4",

            Severity::Fatal => "FATAL",
            Severity::Fatal2 => "FATAL2",
            Severity::Fatal3 => "FATAL3",
            Severity::Fatal4 => "FATAL4",
        }
    }

    /// The severity number of this level.
    pub const fn number(&self) -> i32 {
        *self as i32
    }
}

/// A structured log record, produced once per emission and immutable once
/// handed to a log processor.
///
/// The trace context fields are always present. A record emitted outside of
/// any trace carries the all-zero ids and flags.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct LogRecord {
    /// Wall-clock time of the event.
    pub timestamp: SystemTime,
    /// Normalized severity of the event.
    pub severity: Severity,
    /// Event name.
    pub name: Cow<'static, str>,
    /// Record body.
    pub body: Cow<'static, str>,
    /// Id of the trace the record was emitted in.
    pub trace_id: TraceId,
    /// Id of the span the record was emitted in.
    pub span_id: SpanId,
    /// Flags of the trace the record was emitted in.
    pub trace_flags: TraceFlags,
    /// Resource describing the entity that produced the record.
    pub resource: Vec<KeyValue>,
    /// Additional attributes associated with this record.
    pub attributes: Vec<KeyValue>,
}

impl Default for LogRecord {
    fn default() -> Self {
        LogRecord::new()
    }
}

impl LogRecord {
    /// Create a record stamped with the current time, the default severity
    /// and an empty trace context.
    pub fn new() -> Self {
        LogRecord {
            timestamp: crate::time::now(),
            severity: Severity::default(),
            name: Cow::Borrowed(""),
            body: Cow::Borrowed(""),
            trace_id: TraceId::INVALID,
            span_id: SpanId::INVALID,
            trace_flags: TraceFlags::default(),
            resource: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Sets the time of the event.
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the event name.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Cow<'static, str>>) -> Self {
        self.body = body.into();
        self
    }

    /// Associates the record with a trace context.
    pub fn with_trace_context(
        mut self,
        trace_id: TraceId,
        span_id: SpanId,
        trace_flags: TraceFlags,
    ) -> Self {
        self.trace_id = trace_id;
        self.span_id = span_id;
        self.trace_flags = trace_flags;
        self
    }

    /// Replaces the resource.
    pub fn with_resource<I>(mut self, resource: I) -> Self
    where
        I: IntoIterator<Item = KeyValue>,
    {
        self.resource = resource.into_iter().collect();
        self
    }

    /// Adds multiple attributes.
    pub fn with_attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<AnyValue>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| KeyValue::new(k, v)));
        self
    }

    /// Adds a single attribute.
    pub fn add_attribute<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Key>,
        V: Into<AnyValue>,
    {
        self.attributes.push(KeyValue::new(key, value));
    }

    /// Returns true if the record carries a valid trace context.
    pub fn has_trace_context(&self) -> bool {
        self.trace_id != TraceId::INVALID && self.span_id != SpanId::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn new_record_has_empty_trace_context_and_default_severity() {
        let record = LogRecord::new();
        assert_eq!(record.severity, Severity::Info);
        assert_eq!(record.trace_id, TraceId::INVALID);
        assert_eq!(record.span_id, SpanId::INVALID);
        assert_eq!(record.trace_flags.to_u8(), 0);
        assert!(!record.has_trace_context());
        assert!(record.attributes.is_empty());
    }

    #[test]
    fn builder_sets_all_fields() {
        let ts = UNIX_EPOCH + Duration::from_secs(10);
        let record = LogRecord::new()
            .with_timestamp(ts)
            .with_severity(Severity::Error)
            .with_name("checkout")
            .with_body(String::from("payment declined"))
            .with_trace_context(TraceId::from(1), SpanId::from(2), TraceFlags::SAMPLED)
            .with_attributes([("attempt", 2)]);

        assert_eq!(record.timestamp, ts);
        assert_eq!(record.severity.number(), 17);
        assert_eq!(record.name, "checkout");
        assert_eq!(record.body, "payment declined");
        assert!(record.has_trace_context());
        assert_eq!(record.attributes, vec![KeyValue::new("attempt", 2)]);
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Warn < Severity::Error);
        assert_eq!(Severity::Fatal4.number(), 24);
        assert_eq!(Severity::Warn.name(), "WARN");
    }

    #[test]
    fn any_value_from_iterators() {
        let list: AnyValue = vec![1, 2].into_iter().collect();
        assert_eq!(list, AnyValue::ListAny(vec![AnyValue::Int(1), AnyValue::Int(2)]));

        let map: AnyValue = [("k", "v")].into_iter().collect();
        match map {
            AnyValue::Map(m) => assert_eq!(m.get("k"), Some(&AnyValue::String("v".into()))),
            other => panic!("expected map, got {other:?}"),
        }
    }
}
