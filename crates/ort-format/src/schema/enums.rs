// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Wire enumerations.
//!
//! These are open newtypes rather than Rust enums: a buffer can carry a
//! value this build has never heard of, and the reader must be able to
//! report it instead of failing to represent it.

use std::fmt;

macro_rules! wire_enum {
    (
        $(#[$doc:meta])*
        $name:ident($repr:ty) { $($variant:ident = $value:literal),+ $(,)? }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub $repr);

        impl $name {
            $(pub const $variant: Self = Self($value);)+

            /// Every value known to this build, in code order.
            pub const KNOWN: &'static [Self] = &[$(Self::$variant),+];

            /// Name of a known value; `None` for anything else.
            pub fn variant_name(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => Some(stringify!($variant)),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.variant_name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "<unknown {}>", self.0),
                }
            }
        }
    };
}

wire_enum! {
    /// Which field of a `DimensionValue` is meaningful.
    DimensionValueType(u8) {
        UNKNOWN = 0,
        VALUE = 1,
        PARAM = 2,
    }
}

wire_enum! {
    /// Tag of the `TypeInfo.value` union.
    TypeInfoValue(u8) {
        NONE = 0,
        TENSOR_TYPE = 1,
    }
}

wire_enum! {
    /// Element type codes, matching ONNX `TensorProto.DataType`.
    TensorDataType(i32) {
        UNDEFINED = 0,
        FLOAT = 1,
        UINT8 = 2,
        INT8 = 3,
        UINT16 = 4,
        INT16 = 5,
        INT32 = 6,
        INT64 = 7,
        STRING = 8,
        BOOL = 9,
        FLOAT16 = 10,
        DOUBLE = 11,
        UINT32 = 12,
        UINT64 = 13,
        COMPLEX64 = 14,
        COMPLEX128 = 15,
        BFLOAT16 = 16,
    }
}

wire_enum! {
    /// Attribute kind codes, matching ONNX `AttributeProto.AttributeType`.
    AttributeType(i32) {
        UNDEFINED = 0,
        FLOAT = 1,
        INT = 2,
        STRING = 3,
        TENSOR = 4,
        GRAPH = 5,
        FLOATS = 6,
        INTS = 7,
        STRINGS = 8,
        TENSORS = 9,
        GRAPHS = 10,
        SPARSE_TENSOR = 11,
        SPARSE_TENSORS = 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(DimensionValueType::default(), DimensionValueType::UNKNOWN);
        assert_eq!(AttributeType::KNOWN.len(), 13);
        assert_eq!(TensorDataType::KNOWN.last(), Some(&TensorDataType::BFLOAT16));
        assert_eq!(AttributeType::INTS.variant_name(), Some("INTS"));
    }

    #[test]
    fn test_unknown_value_is_observable() {
        let t = AttributeType(42);
        assert!(t.variant_name().is_none());
        assert_eq!(t.to_string(), "<unknown 42>");
        assert!(matches!(TypeInfoValue(7), v if v != TypeInfoValue::TENSOR_TYPE));
    }
}
