//! Identifiers of the trace a log record was emitted in.
//!
//! Records only carry and render these values; nothing in this crate creates
//! or samples traces. All three render as fixed-width lowercase hex.
use std::fmt;

macro_rules! trace_identifier {
    ($(#[$doc:meta])* $name:ident($repr:ty; $bytes:literal, $width:literal)) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name($repr);

        impl $name {
            /// The all-zero id of a record emitted outside any trace.
            pub const INVALID: $name = $name(0);

            /// Builds the id from its big-endian bytes.
            pub const fn from_bytes(bytes: [u8; $bytes]) -> Self {
                $name(<$repr>::from_be_bytes(bytes))
            }

            /// The big-endian bytes of the id.
            pub const fn to_bytes(self) -> [u8; $bytes] {
                self.0.to_be_bytes()
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                $name(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:0width$x}", self.0, width = $width)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }
    };
}

trace_identifier!(
    /// A 16-byte trace id.
    TraceId(u128; 16, 32)
);

trace_identifier!(
    /// An 8-byte span id.
    SpanId(u64; 8, 16)
);

/// The one-byte W3C trace flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TraceFlags(u8);

impl TraceFlags {
    /// Flags with only the `sampled` bit set.
    pub const SAMPLED: TraceFlags = TraceFlags(0x01);

    /// Wraps raw flag bits.
    pub const fn new(flags: u8) -> Self {
        TraceFlags(flags)
    }

    /// The raw flag bits.
    pub const fn to_u8(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TraceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}
