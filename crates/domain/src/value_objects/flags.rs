//! Closed flag enums accepted by the AMap web service
//!
//! Callers are allowed to hand in booleans, integers or strings for most of
//! these switches. Every flag resolves that loose input through
//! [`WireFlag::from_loose`] and renders back through [`WireFlag::wire_value`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Loosely-typed flag input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LooseInput<'a> {
    /// Boolean switch
    Bool(bool),
    /// Numeric code
    Int(i64),
    /// Free text, matched case-insensitively
    Text(&'a str),
}

impl From<bool> for LooseInput<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for LooseInput<'_> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<'a> From<&'a str> for LooseInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for LooseInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Shared behaviour of every wire flag
pub trait WireFlag: Copy + Sized {
    /// Flag type name used in diagnostics
    const NAME: &'static str;

    /// Resolve loose input, `None` if it names no variant
    fn from_loose(input: LooseInput<'_>) -> Option<Self>;

    /// Value sent on the wire
    fn wire_value(self) -> &'static str;

    /// Resolve loose input or fail with [`DomainError::UnknownFlag`]
    ///
    /// # Errors
    ///
    /// Returns an error when the input does not name any variant.
    fn choose<'a>(input: impl Into<LooseInput<'a>>) -> Result<Self, DomainError> {
        let input = input.into();
        Self::from_loose(input).ok_or_else(|| DomainError::unknown_flag(Self::NAME, input.to_string()))
    }
}

macro_rules! wire_flag {
    (@bool $flag:ident) => {{
        let _ = $flag;
        None
    }};
    (@bool $flag:ident, $off:ident, $on:ident) => {
        Some(if $flag { Self::$on } else { Self::$off })
    };
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, $wire:literal, $label:literal; )+
        }
        $( bool($off:ident, $on:ident) )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl WireFlag for $name {
            const NAME: &'static str = stringify!($name);

            fn from_loose(input: LooseInput<'_>) -> Option<Self> {
                match input {
                    LooseInput::Bool(flag) => wire_flag!(@bool flag $(, $off, $on)?),
                    LooseInput::Int(code) => match code {
                        $( $code => Some(Self::$variant), )+
                        _ => None,
                    },
                    LooseInput::Text(text) => {
                        let text = text.trim();
                        $(
                            if text.eq_ignore_ascii_case($wire) || text.eq_ignore_ascii_case($label) {
                                return Some(Self::$variant);
                            }
                        )+
                        None
                    },
                }
            }

            fn wire_value(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.wire_value())
            }
        }
    };
}

wire_flag! {
    /// Web service API generation
    ApiVersion {
        /// Classic `status`/`info` payloads
        V3 => 3, "v3", "3";
        /// `errcode`/`errmsg` payloads
        V4 => 4, "v4", "4";
    }
}

wire_flag! {
    /// Envelope status
    StatusFlag {
        /// Vendor reported an error
        Err => 0, "0", "err";
        /// Vendor reported success
        Ok => 1, "1", "ok";
    }
    bool(Err, Ok)
}

wire_flag! {
    /// Amount of detail requested from the service
    ExtensionFlag {
        /// Basic fields only
        Base => 0, "base", "false";
        /// All fields
        All => 1, "all", "true";
    }
    bool(Base, All)
}

wire_flag! {
    /// Whether a multi-value query runs as one batch
    BatchFlag {
        /// Single query
        Off => 0, "false", "off";
        /// Batch query
        On => 1, "true", "on";
    }
    bool(Off, On)
}

wire_flag! {
    /// Road filter for reverse geocoding
    RoadLevel {
        /// Every road
        All => 0, "0", "all";
        /// Main roads only
        Direct => 1, "1", "direct";
    }
    bool(All, Direct)
}

wire_flag! {
    /// Home or company address optimisation for reverse geocoding
    HomeOrCorp {
        /// No optimisation
        Off => 0, "0", "off";
        /// Prefer home addresses
        Home => 1, "1", "home";
        /// Prefer company addresses
        Corp => 2, "2", "corp";
    }
}

wire_flag! {
    /// Restrict POI search to the given city
    CityLimitFlag {
        /// Search beyond the city
        Off => 0, "false", "off";
        /// Only inside the city
        On => 1, "true", "on";
    }
    bool(Off, On)
}

wire_flag! {
    /// Whether child POIs are returned
    ChildrenFlag {
        /// Parent POIs only
        Off => 0, "0", "off";
        /// Include children
        On => 1, "1", "on";
    }
    bool(Off, On)
}

wire_flag! {
    /// Ordering of POI search results
    SortRule {
        /// Nearest first
        Distance => 0, "0", "distance";
        /// Weighted relevance
        Weight => 1, "1", "weight";
    }
}

wire_flag! {
    /// Suggestion data categories
    DataType {
        /// All categories
        All => 0, "all", "all";
        /// Points of interest
        Poi => 1, "poi", "poi";
        /// Bus stops
        Bus => 2, "bus", "bus";
        /// Bus lines
        BusLine => 3, "busline", "bus_line";
    }
}

wire_flag! {
    /// Measurement mode for the distance endpoint
    DistanceType {
        /// Straight line
        Straight => 0, "0", "straight";
        /// Driving route
        Driving => 1, "1", "driving";
        /// Walking route
        Walking => 3, "3", "walking";
    }
}
