//! Per-backend classification rules.
//!
//! The classifier never branches on backend names; everything that differs
//! between backends is listed here as type families and switches.

/// Type families and behaviour switches used by column classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRules {
    /// Integer types that may carry an `unsigned` modifier
    pub signed_integer_types: &'static [&'static str],
    /// Character types whose length becomes a size
    pub string_types: &'static [&'static str],
    pub temporal_types: &'static [&'static str],
    /// Any type starting with one of these is temporal as well
    pub temporal_prefixes: &'static [&'static str],
    /// Fixed-point types with `(digits,scale)`
    pub decimal_types: &'static [&'static str],
    pub binary_types: &'static [&'static str],
    pub bit_types: &'static [&'static str],
    /// Types passed through verbatim as the native type
    pub opaque_types: &'static [&'static str],
    /// Remap `unsigned` integers to their unsigned target type
    pub unsigned_remap: bool,
    /// Mark temporal columns defaulting to the current time as set on insert
    pub auto_now_on_create: bool,
}

impl ClassificationRules {
    pub fn is_signed_integer(&self, data_type: &str) -> bool {
        self.signed_integer_types.contains(&data_type)
    }

    pub fn is_string(&self, data_type: &str) -> bool {
        self.string_types.contains(&data_type)
    }

    pub fn is_temporal(&self, data_type: &str) -> bool {
        self.temporal_types.contains(&data_type)
            || self
                .temporal_prefixes
                .iter()
                .any(|prefix| data_type.starts_with(prefix))
    }

    pub fn is_decimal(&self, data_type: &str) -> bool {
        self.decimal_types.contains(&data_type)
    }

    pub fn is_binary(&self, data_type: &str) -> bool {
        self.binary_types.contains(&data_type)
    }

    pub fn is_bit(&self, data_type: &str) -> bool {
        self.bit_types.contains(&data_type)
    }

    pub fn is_opaque(&self, data_type: &str) -> bool {
        self.opaque_types.contains(&data_type)
    }
}
